mod cli;
mod commands;
pub mod core;
mod menu;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::core::console;
use crate::core::error::LauncherResult;
use crate::core::state::{AppState, LauncherSettings};

pub use menu::{Flow, MenuChoice, Session};

pub fn run() -> ExitCode {
    let args = cli::Args::parse();

    // Diagnostics go to stderr so they never mix with the menu.
    let default_filter = if args.verbose {
        "info,server_launcher_lib=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("server-launcher {} starting...", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("[ERROR] No se pudo iniciar el runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run_session(args.settings()));
    // A stdin read abandoned mid-supervision would otherwise hold shutdown.
    runtime.shutdown_timeout(Duration::from_millis(200));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Session ended with error: {}", e);
            eprintln!("[ERROR] {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_session(settings: LauncherSettings) -> LauncherResult<()> {
    let state = AppState::new(settings)?;
    tracing::debug!(
        "workspace = {}, config = {}",
        state.workspace.root().display(),
        state.config_store.path().display()
    );
    let mut session = Session::new(state, console::stdio());
    session.run().await
}
