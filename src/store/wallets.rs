//! WalletsStore - wallet list, active wallet, dialogs and wallet actions
//!
//! # Operations
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `refresh_wallets_data` | invalidate + re-fetch list, reconcile active wallet |
//! | `on_route_change` | reconcile active wallet, redirect if needed |
//! | `create_personal_wallet` | remember details, fetch recovery phrase |
//! | `finish_wallet_creation` | create wallet, append to cache, open it |
//! | `send_money` | send from active wallet, refresh, open wallet |
//! | `restore_wallet` | restore from phrase, close dialog, refresh, open wallet |
//! | `toggle_*` | dialog flags |

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::NetworkStatus;
use crate::api::{RestoreRequest, SendMoney, Transaction, TransactionRequest, WalletApi, WalletDetails, NewWallet};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::request::{CachedRequest, Request};
use crate::router::Navigator;
use crate::wallet::{Reconciliation, Wallet, WalletRoutes};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DialogState {
    pub add_wallet: bool,
    pub create_wallet: bool,
    pub restore_wallet: bool,
}

/// Immutable view of the store, published after every change
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalletsSnapshot {
    pub wallets: Vec<Wallet>,
    pub active: Option<String>,
    pub dialogs: DialogState,
    pub loading: bool,
    /// Unix millis of the last successful list fetch
    pub refreshed_at: Option<i64>,
}

#[derive(Debug, Default)]
struct WalletsState {
    wallets: Vec<Wallet>,
    active: Option<String>,
    dialogs: DialogState,
    pending_wallet: Option<WalletDetails>,
    refreshed_at: Option<DateTime<Utc>>,
}

pub struct WalletsStore {
    config: StoreConfig,
    routes: WalletRoutes,
    api: Arc<dyn WalletApi>,
    navigator: Arc<dyn Navigator>,
    network: Arc<NetworkStatus>,
    state: RwLock<WalletsState>,
    snapshots: watch::Sender<WalletsSnapshot>,

    wallets_request: CachedRequest<(), Vec<Wallet>>,
    create_wallet_request: Request<Wallet>,
    send_money_request: Request<Transaction>,
    recovery_phrase_request: Request<Vec<String>>,
    restore_request: Request<Wallet>,
}

impl WalletsStore {
    pub fn new(
        config: StoreConfig,
        api: Arc<dyn WalletApi>,
        navigator: Arc<dyn Navigator>,
        network: Arc<NetworkStatus>,
    ) -> StoreResult<Self> {
        let routes = WalletRoutes::new(&config.base_route, &config.default_screen)?;
        let (snapshots, _) = watch::channel(WalletsSnapshot::default());
        Ok(Self {
            config,
            routes,
            api,
            navigator,
            network,
            state: RwLock::new(WalletsState::default()),
            snapshots,
            wallets_request: CachedRequest::new("getWallets"),
            create_wallet_request: Request::new("createWallet"),
            send_money_request: Request::new("createTransaction"),
            recovery_phrase_request: Request::new("getWalletRecoveryPhrase"),
            restore_request: Request::new("restoreWallet"),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, WalletsState> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, WalletsState> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    pub fn config(&self) -> &StoreConfig { &self.config }
    pub fn routes(&self) -> &WalletRoutes { &self.routes }
    pub fn network(&self) -> &NetworkStatus { &self.network }

    pub fn all(&self) -> Vec<Wallet> { self.read().wallets.clone() }

    pub fn active(&self) -> Option<Wallet> {
        let s = self.read();
        let id = s.active.as_deref()?;
        s.wallets.iter().find(|w| w.id == id).cloned()
    }

    pub fn active_wallet_route(&self) -> Option<String> {
        self.read().active.as_deref().map(|id| self.routes.default_route(id))
    }

    pub fn has_any_loaded(&self) -> bool { !self.read().wallets.is_empty() }

    pub fn wallet_route(&self, wallet_id: &str, screen: &str) -> String {
        self.routes.wallet_route(wallet_id, screen)
    }

    pub fn dialogs(&self) -> DialogState { self.read().dialogs }

    /// True while the wallet list fetch is in flight
    pub fn is_loading(&self) -> bool { self.wallets_request.is_executing() }

    pub fn wallets_request(&self) -> &CachedRequest<(), Vec<Wallet>> { &self.wallets_request }
    pub fn send_money_request(&self) -> &Request<Transaction> { &self.send_money_request }

    pub fn is_valid_address(&self, address: &str) -> bool {
        self.api.is_valid_address(&self.config.currency, address)
    }

    pub fn is_valid_mnemonic(&self, mnemonic: &str) -> bool { self.api.is_valid_mnemonic(mnemonic) }

    pub fn snapshot(&self) -> WalletsSnapshot { self.snapshots.borrow().clone() }

    pub fn subscribe(&self) -> watch::Receiver<WalletsSnapshot> { self.snapshots.subscribe() }

    fn publish(&self) {
        let snapshot = {
            let s = self.read();
            WalletsSnapshot {
                wallets: s.wallets.clone(),
                active: s.active.clone(),
                dialogs: s.dialogs,
                loading: self.wallets_request.is_executing(),
                refreshed_at: s.refreshed_at.map(|t| t.timestamp_millis()),
            }
        };
        self.snapshots.send_replace(snapshot);
    }

    // =========================================================================
    // Wallet list
    // =========================================================================

    /// Fetch the wallet list through the cache (no invalidation) and reconcile.
    /// Publishes `loading` while the fetch runs and the settled state once it returns.
    pub async fn load_wallets(&self) -> StoreResult<Vec<Wallet>> {
        let api = self.api.clone();
        let fetched = self
            .wallets_request
            .execute((), || {
                // in flight by the time the fetch is built
                self.publish();
                async move { api.get_wallets().await }
            })
            .await;
        match fetched {
            Ok(wallets) => {
                self.replace_wallets(wallets.clone());
                Ok(wallets)
            }
            Err(e) => {
                self.publish();
                Err(e)
            }
        }
    }

    /// Invalidate the cached list, re-fetch it and reconcile against the
    /// current route. Skipped while the wallet service is disconnected.
    /// A failed fetch leaves the current list untouched.
    pub async fn refresh_wallets_data(&self) -> StoreResult<bool> {
        if !self.network.is_connected() {
            debug!("wallet service disconnected, refresh skipped");
            return Ok(false);
        }
        self.wallets_request.invalidate(true);
        self.load_wallets().await?;
        Ok(true)
    }

    fn replace_wallets(&self, wallets: Vec<Wallet>) {
        {
            let mut s = self.write();
            debug!(count = wallets.len(), "wallet list replaced");
            s.wallets = wallets;
            if let Some(fetched_at) = self.wallets_request.fetched_at(&()) {
                s.refreshed_at = Some(fetched_at);
            }
        }
        self.reconcile(&self.navigator.current_route());
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Reaction to a location change. Returns the redirect that was issued.
    pub fn on_route_change(&self, route: &str) -> Option<String> { self.reconcile(route) }

    fn reconcile(&self, route: &str) -> Option<String> {
        let Reconciliation { active, redirect } = {
            let mut s = self.write();
            let outcome = self.routes.reconcile(route, &s.wallets, s.active.as_deref());
            if s.active != outcome.active {
                debug!(route, from = ?s.active, to = ?outcome.active, "active wallet changed");
            }
            s.active = outcome.active.clone();
            outcome
        };
        debug!(route, ?active, "reconciled");
        self.publish();
        if let Some(ref target) = redirect {
            info!(from = route, to = %target, "redirecting to wallet");
            self.navigator.go_to_route(target);
        }
        redirect
    }

    pub fn go_to_wallet_route(&self, wallet_id: &str) {
        let route = self.routes.default_route(wallet_id);
        self.navigator.go_to_route(&route);
        self.reconcile(&route);
    }

    // =========================================================================
    // Dialogs
    // =========================================================================

    pub fn toggle_add_wallet(&self) {
        let mut s = self.write();
        s.dialogs.add_wallet = !s.dialogs.add_wallet;
        drop(s);
        self.publish();
    }

    /// Opening closes the add-wallet dialog
    pub fn toggle_create_wallet_dialog(&self) {
        let mut s = self.write();
        if s.dialogs.create_wallet {
            s.dialogs.create_wallet = false;
        } else {
            s.dialogs.add_wallet = false;
            s.dialogs.create_wallet = true;
        }
        drop(s);
        self.publish();
    }

    /// Opening closes the add-wallet dialog
    pub fn toggle_wallet_restore(&self) {
        let mut s = self.write();
        if s.dialogs.restore_wallet {
            s.dialogs.restore_wallet = false;
        } else {
            s.dialogs.add_wallet = false;
            s.dialogs.restore_wallet = true;
        }
        drop(s);
        self.publish();
    }

    // =========================================================================
    // Wallet actions
    // =========================================================================

    /// First step of wallet creation: remember the details and fetch the
    /// recovery phrase the user must back up.
    pub async fn create_personal_wallet(&self, details: WalletDetails) -> StoreResult<Vec<String>> {
        self.write().pending_wallet = Some(details);
        let api = self.api.clone();
        self.recovery_phrase_request
            .execute(async move { api.get_wallet_recovery_phrase().await })
            .await
    }

    /// Second step, after the backup is confirmed: create the wallet with
    /// the backed-up phrase, add it to the list and open it.
    pub async fn finish_wallet_creation(&self, recovery_phrase: &[String]) -> StoreResult<Wallet> {
        let details = self.write().pending_wallet.take().ok_or(StoreError::NoPendingWallet)?;
        let request = NewWallet { name: details.name, currency: details.currency, mnemonic: recovery_phrase.join(" ") };
        let api = self.api.clone();
        let wallet = self.create_wallet_request.execute(async move { api.create_wallet(request).await }).await?;

        let created = wallet.clone();
        self.wallets_request.patch(&(), |list| list.push(created));
        {
            let mut s = self.write();
            if !s.wallets.iter().any(|w| w.id == wallet.id) {
                s.wallets.push(wallet.clone());
            }
        }
        info!(id = %wallet.id, "wallet created");
        self.go_to_wallet_route(&wallet.id);
        Ok(wallet)
    }

    pub async fn send_money(&self, details: SendMoney) -> StoreResult<Transaction> {
        let wallet = self.active().ok_or(StoreError::NoActiveWallet)?;
        let amount = parse_amount(&details.amount)?;
        let request = TransactionRequest {
            wallet_id: wallet.id.clone(),
            sender: wallet.address.clone(),
            receiver: details.receiver,
            amount,
            currency: wallet.currency.clone(),
            title: details.title,
            description: details.description,
        };
        let api = self.api.clone();
        let tx = self.send_money_request.execute(async move { api.create_transaction(request).await }).await?;
        info!(wallet = %wallet.id, tx = %tx.id, amount, "money sent");

        if let Err(e) = self.refresh_wallets_data().await {
            warn!(error = %e, "refresh after send failed");
        }
        self.go_to_wallet_route(&wallet.id);
        Ok(tx)
    }

    pub async fn restore_wallet(&self, request: RestoreRequest) -> StoreResult<Wallet> {
        let api = self.api.clone();
        let wallet = self.restore_request.execute(async move { api.restore_wallet(request).await }).await?;
        self.toggle_wallet_restore();
        if let Err(e) = self.refresh_wallets_data().await {
            warn!(error = %e, "refresh after restore failed");
        }
        info!(id = %wallet.id, "wallet restored");
        self.go_to_wallet_route(&wallet.id);
        Ok(wallet)
    }
}

fn parse_amount(raw: &str) -> StoreResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(|| StoreError::InvalidAmount(raw.to_string()))
}
