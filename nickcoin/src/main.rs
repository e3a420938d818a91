//! # NickCoin ICO Client - Main Entrypoint
//!
//! Wires the application together:
//! 1. Initializes logging and loads `config.toml`.
//! 2. Loads the wallet and builds the RPC-backed wallet provider.
//! 3. Creates the UI → engine channel and spawns the engine task.
//! 4. Launches the blocking GUI main loop.
//! 5. Stops the engine when the window closes.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use nickcoin_ico::{
    config::Config,
    core::rpc_client::RpcWalletProvider,
    engine::Engine,
    state::AppState,
    ui,
    wallet::WalletManager,
};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging infrastructure.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    info!("🚀 Initializing NickCoin ICO client...");

    // 2. Load configuration and the wallet.
    let settings = Config::load().validate()?;
    let wallet = WalletManager::from_path(&settings.keystore_path)?;
    let provider = Arc::new(RpcWalletProvider::new(&settings, &wallet)?);

    // 3. Shared state and the UI → engine channel.
    let app_state = AppState::shared();
    let (ui_event_tx, ui_event_rx) = mpsc::channel(64);

    let token_name = settings.token_name.clone();
    let pricing = settings.pricing;
    let engine = Engine::new(settings, app_state.clone(), provider, ui_event_rx);
    let engine_handle = engine.spawn_engine_task();

    // 4. Launch the GUI (this is a blocking call).
    info!("Launching User Interface...");
    ui::launch_gui(token_name, pricing, app_state, ui_event_tx)?;

    // 5. Shutdown on GUI exit.
    info!("GUI closed. Shutting down engine...");
    engine_handle.abort();

    info!("✅ Shutdown complete.");
    Ok(())
}
