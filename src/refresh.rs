//! Refresh - periodic wallet list polling
//!
//! ```text
//! RefreshService::spawn
//!     │
//!     └── every interval (default 5 s):
//!           WalletsStore::refresh_wallets_data()
//!               ├── invalidate wallet cache
//!               ├── re-fetch list
//!               └── reconcile active wallet
//! ```
//!
//! A refresh is awaited before the next tick is taken and missed ticks are
//! skipped, so two refreshes never run at once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::store::WalletsStore;

/// Counters shared between the service task and its owner
#[derive(Debug, Default)]
pub struct RefreshStats {
    refreshed: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl RefreshStats {
    pub fn refreshed(&self) -> u64 { self.refreshed.load(Ordering::Relaxed) }
    /// Ticks that found the wallet service disconnected
    pub fn skipped(&self) -> u64 { self.skipped.load(Ordering::Relaxed) }
    pub fn failed(&self) -> u64 { self.failed.load(Ordering::Relaxed) }
}

pub struct RefreshService {
    store: Arc<WalletsStore>,
    interval: Duration,
    stats: Arc<RefreshStats>,
}

impl RefreshService {
    pub fn new(store: Arc<WalletsStore>) -> Self {
        let interval = store.config().refresh_interval();
        Self { store, interval, stats: Arc::new(RefreshStats::default()) }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self { self.interval = interval; self }

    pub fn stats(&self) -> Arc<RefreshStats> { self.stats.clone() }

    pub fn interval(&self) -> Duration { self.interval }

    /// Run one refresh and record its outcome
    pub async fn tick(&self) {
        match self.store.refresh_wallets_data().await {
            Ok(true) => { self.stats.refreshed.fetch_add(1, Ordering::Relaxed); }
            Ok(false) => { self.stats.skipped.fetch_add(1, Ordering::Relaxed); }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "wallet refresh failed");
            }
        }
    }

    /// Spawn the polling loop. The first refresh happens one interval after start.
    pub fn spawn(self, mut shutdown: broadcast::Receiver<()>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!(interval_ms = self.interval.as_millis() as u64, "wallet refresh started");

            loop {
                tokio::select! {
                    _ = shutdown.recv() => {
                        tracing::info!(refreshed = self.stats.refreshed(), failed = self.stats.failed(), "wallet refresh stopped");
                        break;
                    }
                    _ = ticker.tick() => self.tick().await,
                }
            }
        })
    }
}

/// Start polling when the config enables it (a wallet service is configured).
pub fn start_refresh(
    store: Arc<WalletsStore>,
    shutdown: broadcast::Receiver<()>,
) -> Option<tokio::task::JoinHandle<()>> {
    if !store.config().refresh_enabled {
        tracing::debug!("no wallet service configured, refresh disabled");
        return None;
    }
    Some(RefreshService::new(store).spawn(shutdown))
}
