//! # User Interface - ICO Control Panel
//!
//! A small `eframe`/`egui` window that shows the sale state and lets the user
//! connect, claim and mint.
//!
//! ## Core Functionality
//!
//! 1.  **State Display:** token balance, global mint progress against the cap,
//!     the connected address and recent notices.
//!
//! 2.  **Actions:** exactly one of three views, picked by
//!     [`AppState::view`]: a disabled "Loading..." button, the claim offer, or
//!     the mint form. The mint button is enabled only for a positive integer.
//!     After a click both actions stay disabled until the engine has finished
//!     with it, so a double click sends one transaction.
//!
//! 3.  **Asynchronous Communication:** the panel never touches the chain. Each
//!     action is a [`GuiEvent`] sent over an `mpsc` channel to the engine; the
//!     panel only reads the shared state.

use alloy::primitives::U256;
use eframe::{
    egui::{self, CentralPanel, Color32, RichText, Sense, Ui, Vec2},
    App, Frame,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use crate::{
    state::{claim_message, AppState, NoticeLevel, SharedState, View},
    units::{format_ether, parse_mint_amount, Pricing},
};

/// Events sent from the UI to the engine.
///
/// Actions carry the [`AppState::action_epoch`] the panel saw when the button
/// was clicked; the engine drops any whose epoch is already spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiEvent {
    Connect,
    Refresh,
    Mint { amount: U256, epoch: u64 },
    Claim { epoch: u64 },
    DismissNotices,
}

struct IcoApp {
    app_state: SharedState,
    ui_event_tx: mpsc::Sender<GuiEvent>,
    token_name: String,
    pricing: Pricing,
    amount_input: String,
    /// Epoch of the last action sent and not yet run by the engine.
    awaiting_epoch: Option<u64>,
}

impl IcoApp {
    fn send(&self, event: GuiEvent) {
        let _ = self.ui_event_tx.try_send(event);
    }

    fn send_action(&mut self, event: GuiEvent, epoch: u64) {
        if self.ui_event_tx.try_send(event).is_ok() {
            self.awaiting_epoch = Some(epoch);
        }
    }

    fn draw_main_view(&mut self, ui: &mut Ui, state: &AppState) {
        ui.heading(
            RichText::new(format!("Welcome to the {} ICO!", self.token_name))
                .size(22.0)
                .strong(),
        );
        ui.label(format!(
            "NFT holders receive {} free {}s! Claim/Mint {}s Below",
            self.pricing.claim_reward_per_nft, self.token_name, self.token_name
        ));
        ui.separator();

        if !state.wallet_connected {
            if ui
                .add_sized(Vec2::new(200.0, 30.0), egui::Button::new("Connect your wallet"))
                .clicked()
            {
                self.send(GuiEvent::Connect);
            }
            self.draw_notices(ui, state);
            return;
        }

        // --- Status Panel ---
        ui.group(|ui| {
            if let Some(address) = state.address {
                let label = ui.add(egui::Label::new(format!("Wallet: {}", address)).sense(Sense::click()));
                if label.clicked() {
                    ui.output_mut(|o| o.copied_text = address.to_string());
                }
                label.on_hover_text("Click to copy");
            }
            ui.label(format!(
                "You have minted {} {}",
                format_ether(state.token_balance),
                self.token_name
            ));
            ui.label(format!(
                "Overall {}/{} have been minted!",
                format_ether(state.total_minted),
                self.pricing.max_supply
            ));
            if ui.small_button("Refresh").clicked() {
                self.send(GuiEvent::Refresh);
            }
        });

        ui.add_space(10.0);

        // --- Action Panel ---
        match state.view() {
            View::Loading => {
                ui.add_enabled(false, egui::Button::new("Loading..."));
            }
            View::ClaimAvailable => {
                ui.label(RichText::new(claim_message(state.claimable_nfts, &self.pricing)).strong());
                if ui
                    .add_enabled(state.action_ready(self.awaiting_epoch), egui::Button::new("Claim Tokens"))
                    .clicked()
                {
                    let epoch = state.action_epoch;
                    self.send_action(GuiEvent::Claim { epoch }, epoch);
                }
            }
            View::MintForm => self.draw_mint_form(ui, state),
        }

        self.draw_notices(ui, state);
    }

    fn draw_mint_form(&mut self, ui: &mut Ui, state: &AppState) {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.amount_input)
                    .hint_text(format!("Amount of {}s", self.token_name))
                    .desired_width(160.0),
            );
        });
        let amount = parse_mint_amount(&self.amount_input);
        let enabled = state.can_mint(amount, self.awaiting_epoch);
        if ui
            .add_enabled(enabled, egui::Button::new(format!("Mint {}s", self.token_name)))
            .clicked()
        {
            if let Some(amount) = amount {
                let epoch = state.action_epoch;
                self.send_action(GuiEvent::Mint { amount, epoch }, epoch);
            }
        }
    }

    fn draw_notices(&self, ui: &mut Ui, state: &AppState) {
        if state.notices.is_empty() {
            return;
        }
        ui.add_space(10.0);
        ui.group(|ui| {
            for notice in &state.notices {
                let color = match notice.level {
                    NoticeLevel::Info => Color32::LIGHT_BLUE,
                    NoticeLevel::Success => Color32::GREEN,
                    NoticeLevel::Error => Color32::RED,
                };
                ui.label(RichText::new(&notice.message).color(color));
            }
            if ui.small_button("Dismiss").clicked() {
                self.send(GuiEvent::DismissNotices);
            }
        });
    }
}

impl App for IcoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        CentralPanel::default().show(ctx, |ui| {
            // Engine writes are short and never span an await.
            let state = self.app_state.read().clone();
            self.draw_main_view(ui, &state);

            ctx.request_repaint_after(Duration::from_millis(100));
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("👋 GUI closed by user.");
    }
}

/// Launches the GUI. This function will block the main thread.
pub fn launch_gui(
    token_name: String,
    pricing: Pricing,
    app_state: SharedState,
    ui_event_tx: mpsc::Sender<GuiEvent>,
) -> anyhow::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 360.0]),
        ..Default::default()
    };
    let title = format!("{} ICO", token_name);
    let app = IcoApp {
        app_state,
        ui_event_tx,
        token_name,
        pricing,
        amount_input: String::new(),
        awaiting_epoch: None,
    };

    eframe::run_native(&title, native_options, Box::new(|_cc| Box::new(app)))
        .map_err(|e| anyhow::anyhow!("GUI Error: {}", e))
}
