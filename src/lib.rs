//! Walletstate: the state layer behind a wallet front end.
//!
//! # Architecture
//!
//! ```text
//! App (controller)
//!   │   location updates
//!   ▼
//! WalletsStore ──────────────┬── WalletRoutes::reconcile (active wallet + redirect)
//!   │                        ├── CachedRequest  → WalletApi::get_wallets
//!   │                        └── Request        → create / send / restore / phrase
//!   │ redirects
//!   ▼
//! Router (Navigator)
//!
//! RefreshService (tokio interval, 5 s) ──► WalletsStore::refresh_wallets_data
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use walletstate::{App, MemoryWalletApi, NetworkStatus, Router, StoreConfig, WalletsStore};
//!
//! let router = Arc::new(Router::default());
//! let store = Arc::new(WalletsStore::new(
//!     StoreConfig::from_env(),
//!     Arc::new(MemoryWalletApi::new()),
//!     router.clone(),
//!     Arc::new(NetworkStatus::connected()),
//! )?);
//!
//! let app = App::new(store.clone(), router);
//! app.initialize("/wallets").await;
//! let active = store.active();
//! ```
//!
//! # Features
//!
//! - `native` - tokio timers and signals, refresh service, log subscriber

pub mod api;
pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod request;
pub mod router;
pub mod runtime;
pub mod store;
pub mod wallet;

#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod refresh;

pub use api::{MemoryWalletApi, WalletApi};
pub use app::{App, Page};
pub use config::StoreConfig;
pub use crate::core::route::{RouteParams, RoutePattern};
pub use error::{StoreError, StoreResult};
pub use request::{CachedRequest, Request};
pub use router::{Navigator, Router};
pub use runtime::Shutdown;
pub use store::{DialogState, NetworkStatus, WalletsSnapshot, WalletsStore};
pub use wallet::{Reconciliation, Wallet, WalletRoutes};

#[cfg(feature = "native")]
pub use refresh::{start_refresh, RefreshService};
#[cfg(feature = "native")]
pub use runtime::install_signal_handlers;
