//! App controller: feeds location changes to the stores and decides which
//! top-level page the shell shows.
//!
//! | Condition | Page |
//! |-----------|------|
//! | not initialized | `Loading` |
//! | logged out | `Login` (location forced to `/login`) |
//! | wallet list loading | `Loading` |
//! | wallets present | `Wallets` (`/` resolves to the active wallet) |
//! | no wallets | `CreateWallet` |

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::paths::app as routes;
use crate::router::{Navigator, Router};
use crate::store::WalletsStore;

/// Redirect chains longer than this are cut off
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Loading,
    Login,
    CreateWallet,
    Wallets { active: Option<String>, route: String },
}

pub struct App {
    wallets: Arc<WalletsStore>,
    router: Arc<Router>,
    initialized: AtomicBool,
    logged_in: AtomicBool,
}

impl App {
    pub fn new(wallets: Arc<WalletsStore>, router: Arc<Router>) -> Self {
        Self { wallets, router, initialized: AtomicBool::new(false), logged_in: AtomicBool::new(true) }
    }

    pub fn wallets(&self) -> &Arc<WalletsStore> { &self.wallets }
    pub fn router(&self) -> &Arc<Router> { &self.router }

    pub fn is_initialized(&self) -> bool { self.initialized.load(Ordering::SeqCst) }
    pub fn is_logged_in(&self) -> bool { self.logged_in.load(Ordering::SeqCst) }

    pub fn log_in(&self) {
        self.logged_in.store(true, Ordering::SeqCst);
        self.update_location(routes::ROOT);
    }

    pub fn log_out(&self) {
        self.logged_in.store(false, Ordering::SeqCst);
        self.update_location(&self.router.current_route());
    }

    /// First location broadcast: load wallets, then route.
    /// A failed load leaves the app on the create-wallet page until the next refresh.
    pub async fn initialize(&self, location: &str) -> Vec<String> {
        self.router.set_location(location);
        if let Err(e) = self.wallets.load_wallets().await {
            tracing::warn!(error = %e, "initial wallet load failed");
        }
        // Load redirects are re-issued when the requested location is routed below
        self.router.clear_pending();
        self.initialized.store(true, Ordering::SeqCst);
        tracing::info!(location, wallets = self.wallets.all().len(), "app initialized");
        self.update_location(location)
    }

    /// Location broadcast after initialization. Returns every redirect issued
    /// while settling on a final route.
    pub fn update_location(&self, location: &str) -> Vec<String> {
        self.router.set_location(location);
        let mut redirects = Vec::new();

        if !self.is_logged_in() {
            if location != routes::LOGIN {
                self.router.go_to_route(routes::LOGIN);
            }
        } else if location == routes::ROOT && self.wallets.has_any_loaded() {
            if let Some(target) = self.wallets.active_wallet_route().or_else(|| {
                self.wallets.all().first().map(|w| self.wallets.routes().default_route(&w.id))
            }) {
                self.router.go_to_route(&target);
            }
        } else {
            self.wallets.on_route_change(location);
        }

        while let Some(route) = self.router.take_pending() {
            if redirects.len() >= MAX_REDIRECTS {
                tracing::warn!(route, "redirect limit reached, dropping");
                continue;
            }
            redirects.push(route.clone());
            if self.is_logged_in() {
                self.wallets.on_route_change(&route);
            }
        }
        redirects
    }

    pub fn page(&self) -> Page {
        if !self.is_initialized() {
            return Page::Loading;
        }
        if !self.is_logged_in() {
            return Page::Login;
        }
        if self.wallets.is_loading() {
            return Page::Loading;
        }
        if self.wallets.has_any_loaded() {
            return Page::Wallets {
                active: self.wallets.active().map(|w| w.id),
                route: self.router.current_route(),
            };
        }
        Page::CreateWallet
    }
}
