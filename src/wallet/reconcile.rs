//! Active-wallet reconciliation: route + wallet list → active wallet + redirect
//!
//! | Route | Wallet list | Result |
//! |-------|-------------|--------|
//! | `<base>/<id>/…`, id known | any | that wallet, no redirect |
//! | `<base>/<id>/…`, id unknown | non-empty | first wallet, redirect to its home |
//! | `<base>` | non-empty | previous active (else first), redirect to its home |
//! | anything else | any | previous active, no redirect |
//! | any | empty | nothing, no redirect |
//!
//! The previous active wallet is a weak reference: an id no longer present in
//! the list is treated as no active wallet at all.

use serde::Serialize;

use super::Wallet;
use crate::core::paths::wallets as paths;
use crate::core::route::{wallet_route, RoutePattern};
use crate::error::StoreResult;

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Id of the wallet that should be active
    pub active: Option<String>,
    /// Route the UI must navigate to, if any
    pub redirect: Option<String>,
}

impl Reconciliation {
    fn keep(active: Option<&str>) -> Self {
        Self { active: active.map(str::to_string), redirect: None }
    }
}

/// Wallet route table: the base route, the per-wallet pattern and the
/// screen a wallet opens on.
#[derive(Debug, Clone)]
pub struct WalletRoutes {
    base: String,
    default_screen: String,
    base_pattern: RoutePattern,
    wallet_pattern: RoutePattern,
}

impl WalletRoutes {
    pub fn new(base: &str, default_screen: &str) -> StoreResult<Self> {
        let base = base.trim_end_matches('/').to_string();
        Ok(Self {
            base_pattern: RoutePattern::parse(&base)?,
            wallet_pattern: RoutePattern::parse(&format!("{}/:id(*page)", base))?,
            default_screen: default_screen.to_string(),
            base,
        })
    }

    pub fn with_defaults() -> StoreResult<Self> { Self::new(paths::BASE, paths::DEFAULT_SCREEN) }

    pub fn base(&self) -> &str { &self.base }
    pub fn default_screen(&self) -> &str { &self.default_screen }

    pub fn wallet_route(&self, wallet_id: &str, screen: &str) -> String {
        wallet_route(&self.base, wallet_id, screen)
    }

    /// Route a wallet lands on: `<base>/<id>/<default screen>`
    pub fn default_route(&self, wallet_id: &str) -> String {
        self.wallet_route(wallet_id, &self.default_screen)
    }

    /// Wallet id addressed by `route`, if it is wallet-scoped
    pub fn wallet_id(&self, route: &str) -> Option<String> {
        self.wallet_pattern.matches(route)?.get("id").map(str::to_string)
    }

    pub fn is_base(&self, route: &str) -> bool { self.base_pattern.is_match(route) }

    pub fn reconcile(&self, route: &str, wallets: &[Wallet], previous: Option<&str>) -> Reconciliation {
        let previous = previous.filter(|id| wallets.iter().any(|w| w.id == *id));
        let Some(first) = wallets.first() else {
            return Reconciliation::default();
        };

        if let Some(id) = self.wallet_id(route) {
            if wallets.iter().any(|w| w.id == id) {
                return Reconciliation { active: Some(id), redirect: None };
            }
            return Reconciliation {
                active: Some(first.id.clone()),
                redirect: Some(self.default_route(&first.id)),
            };
        }

        if self.is_base(route) {
            let active = previous.unwrap_or(&first.id);
            return Reconciliation {
                active: Some(active.to_string()),
                redirect: Some(self.default_route(active)),
            };
        }

        Reconciliation::keep(previous)
    }
}
