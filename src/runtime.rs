//! Runtime - shutdown broadcast shared by background services

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// One-shot shutdown signal. Cloning shares the same signal.
#[derive(Clone)]
pub struct Shutdown {
    sender: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl Default for Shutdown {
    fn default() -> Self { Self::new() }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender, triggered: Arc::new(AtomicBool::new(false)) }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> { self.sender.subscribe() }

    /// Fire once; later calls are no-ops
    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            tracing::debug!(listeners = self.sender.receiver_count(), "shutdown triggered");
            let _ = self.sender.send(());
        }
    }

    pub fn is_triggered(&self) -> bool { self.triggered.load(Ordering::SeqCst) }
}

/// Trigger `shutdown` on SIGINT/SIGTERM (Ctrl+C elsewhere)
#[cfg(feature = "native")]
pub fn install_signal_handlers(shutdown: &Shutdown) {
    let handle = shutdown.clone();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(mut sigterm), Ok(mut sigint)) => {
                    tokio::select! {
                        _ = sigterm.recv() => tracing::info!("received SIGTERM"),
                        _ = sigint.recv() => tracing::info!("received SIGINT"),
                    }
                }
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!(error = %e, "signal handler install failed");
                    return;
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "ctrl-c handler install failed");
                return;
            }
            tracing::info!("received Ctrl+C");
        }

        handle.trigger();
    });
}
