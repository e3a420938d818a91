//! # ICO Client State Controller
//!
//! The engine is the only writer of chain-derived state. It consumes
//! [`GuiEvent`]s from the control panel one at a time, so within a user action
//! the order submit → wait for inclusion → refresh is strictly sequential and
//! two refresh cycles can never interleave.
//!
//! ## Responsibilities
//!
//! 1.  **Session:** connects the wallet through the [`Gateway`] and mirrors the
//!     session into [`AppState`].
//! 2.  **Refresh:** reads balance, supply and the claimable count as one
//!     [`Snapshot`](crate::core::ledger::Snapshot) and applies it atomically.
//!     A failed read leaves the previous values in place.
//! 3.  **Actions:** mint and claim, each followed by a success notice and a
//!     refresh.
//! 4.  **Errors:** every failure is logged and ends the action. A wrong network
//!     additionally raises a notice. Nothing is retried.
//! 5.  **Deduplication:** each mint or claim event names the action epoch the
//!     panel saw. Once an action has run the epoch moves on, so a second click
//!     queued behind the first is dropped instead of paying twice.

use alloy::primitives::U256;
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{error, info, warn};

use crate::{
    config::Settings,
    core::{chain::{TxReceipt, WalletProvider}, gateway::Gateway, ledger, transactions},
    error::IcoError,
    state::{NoticeLevel, SharedState},
    ui::GuiEvent,
};

pub struct Engine {
    settings: Settings,
    app_state: SharedState,
    gateway: Gateway,
    ui_event_rx: mpsc::Receiver<GuiEvent>,
}

impl Engine {
    pub fn new(
        settings: Settings,
        app_state: SharedState,
        provider: Arc<dyn WalletProvider>,
        ui_event_rx: mpsc::Receiver<GuiEvent>,
    ) -> Self {
        let gateway = Gateway::new(provider, settings.network.clone());
        Self {
            settings,
            app_state,
            gateway,
            ui_event_rx,
        }
    }

    /// Spawns the main engine loop as a background task.
    pub fn spawn_engine_task(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("⚙️ Engine task started.");
            self.run().await;
        })
    }

    /// Connects and refreshes once, then serves UI events until the panel closes.
    async fn run(&mut self) {
        if self.connect_wallet().await.is_ok() {
            let _ = self.refresh().await;
        }
        while let Some(event) = self.ui_event_rx.recv().await {
            self.handle_event(event).await;
        }
        info!("UI channel closed. Engine stopping.");
    }

    pub async fn handle_event(&self, event: GuiEvent) {
        match event {
            GuiEvent::Connect => {
                if self.connect_wallet().await.is_ok() {
                    let _ = self.refresh().await;
                }
            }
            GuiEvent::Refresh => {
                let _ = self.refresh().await;
            }
            GuiEvent::Mint { amount, epoch } => {
                if self.accepts_action("Mint", epoch) {
                    let _ = self.mint(amount).await;
                    self.finish_action();
                }
            }
            GuiEvent::Claim { epoch } => {
                if self.accepts_action("Claim", epoch) {
                    let _ = self.claim().await;
                    self.finish_action();
                }
            }
            GuiEvent::DismissNotices => self.app_state.write().dismiss_notices(),
        }
    }

    pub async fn connect_wallet(&self) -> Result<(), IcoError> {
        let result = self.gateway.acquire_handle(false).await.map(|_| ());
        self.sync_session();
        result.map_err(|e| self.report("Wallet connection", e))
    }

    /// Re-reads every derived value from the chain.
    pub async fn refresh(&self) -> Result<(), IcoError> {
        let result = ledger::read_snapshot(&self.gateway, self.settings.claim_scan_concurrency).await;
        self.sync_session();
        let snapshot = result.map_err(|e| self.report("Refresh", e))?;
        info!(
            "🔄 Refreshed: balance={} supply={} claimable_nfts={}",
            snapshot.token_balance, snapshot.total_minted, snapshot.claimable_nfts
        );
        self.app_state.write().apply_snapshot(snapshot);
        Ok(())
    }

    pub async fn mint(&self, amount: U256) -> Result<TxReceipt, IcoError> {
        let result = transactions::mint(
            &self.gateway,
            &self.app_state,
            &self.settings.pricing,
            amount,
            self.settings.confirmations,
        )
        .await;
        self.sync_session();
        let receipt = result.map_err(|e| self.report("Mint", e))?;

        self.app_state.write().push_notice(
            NoticeLevel::Success,
            format!(
                "Congratulations! You Have Successfully Minted {}s!",
                self.settings.token_name
            ),
        );
        let _ = self.refresh().await;
        Ok(receipt)
    }

    pub async fn claim(&self) -> Result<TxReceipt, IcoError> {
        let result = transactions::claim(&self.gateway, &self.app_state, self.settings.confirmations).await;
        self.sync_session();
        let receipt = result.map_err(|e| self.report("Claim", e))?;

        self.app_state.write().push_notice(
            NoticeLevel::Success,
            format!("You Have Successfully Claimed {}s!", self.settings.token_name),
        );
        let _ = self.refresh().await;
        Ok(receipt)
    }

    fn accepts_action(&self, action: &str, epoch: u64) -> bool {
        let state = self.app_state.read();
        if state.loading || epoch != state.action_epoch {
            warn!(
                "{} ignored: already handled (event epoch {}, current {})",
                action, epoch, state.action_epoch
            );
            return false;
        }
        true
    }

    fn finish_action(&self) {
        self.app_state.write().action_epoch += 1;
    }

    fn sync_session(&self) {
        let session = self.gateway.session();
        let mut state = self.app_state.write();
        state.wallet_connected = session.connected;
        state.address = session.address;
    }

    fn report(&self, action: &str, e: IcoError) -> IcoError {
        match &e {
            IcoError::WrongNetwork { network, .. } => {
                error!("❌ {} aborted: {}", action, e);
                self.app_state
                    .write()
                    .push_notice(NoticeLevel::Error, format!("Change the network to {}", network));
            }
            IcoError::InvalidAmount(_) => warn!("{} refused: {}", action, e),
            IcoError::Provider(_) | IcoError::Transaction(_) => error!("❌ {} failed: {}", action, e),
        }
        e
    }
}
