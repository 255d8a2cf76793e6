use std::sync::Arc;

use tokio::sync::Notify;

/// Resolves on Ctrl-C. If the handler cannot be installed it never resolves.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Where operator interrupts come from: Ctrl-C in the terminal, or a
/// handle fired by the embedding code.
#[derive(Debug, Clone)]
pub enum Interrupt {
    CtrlC,
    Manual(Arc<Notify>),
}

impl Interrupt {
    pub fn manual() -> (Self, Arc<Notify>) {
        let notify = Arc::new(Notify::new());
        (Interrupt::Manual(notify.clone()), notify)
    }

    /// Resolves on the next interrupt after this call.
    pub async fn wait(&self) {
        match self {
            Interrupt::CtrlC => interrupted().await,
            Interrupt::Manual(notify) => notify.notified().await,
        }
    }
}
