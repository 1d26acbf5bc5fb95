//! Stores: UI-bound state derived from the wallet service and the router.
//!
//! Every mutation publishes an immutable snapshot through a
//! `tokio::sync::watch` channel; views subscribe instead of reading shared
//! state directly.

mod wallets;

pub use wallets::{DialogState, WalletsSnapshot, WalletsStore};

use std::sync::atomic::{AtomicBool, Ordering};

/// Connection state of the wallet service node
#[derive(Debug, Default)]
pub struct NetworkStatus {
    connected: AtomicBool,
}

impl NetworkStatus {
    pub fn new(connected: bool) -> Self { Self { connected: AtomicBool::new(connected) } }
    pub fn connected() -> Self { Self::new(true) }

    pub fn is_connected(&self) -> bool { self.connected.load(Ordering::SeqCst) }

    pub fn set_connected(&self, connected: bool) {
        let was = self.connected.swap(connected, Ordering::SeqCst);
        if was != connected {
            tracing::info!(connected, "wallet service connection changed");
        }
    }
}
