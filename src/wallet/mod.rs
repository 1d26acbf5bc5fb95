//! Wallet module - wallet records and active-wallet reconciliation
//!
//! # Architecture
//!
//! ```text
//! location path ──► WalletRoutes::reconcile(route, wallets, previous)
//!                        │
//!                        ├── RoutePattern "<base>/:id(*page)"  → wallet id
//!                        ├── RoutePattern "<base>"             → bare base
//!                        │
//!                        ▼
//!                  Reconciliation { active, redirect }
//! ```
//!
//! # Routes
//!
//! | Route | Screen |
//! |-------|--------|
//! | `/wallets` | resolves to the active (or first) wallet |
//! | `/wallets/{id}` | wallet, default screen |
//! | `/wallets/{id}/{screen}` | `home`, `send`, `receive`, `transactions` |

mod reconcile;

pub use reconcile::{Reconciliation, WalletRoutes};

use serde::{Deserialize, Serialize};

/// Wallet as reported by the wallet service. Replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub address: String,
    pub currency: String,
    pub balance: f64,
}

impl Wallet {
    pub fn new(id: impl Into<String>, address: impl Into<String>, currency: impl Into<String>, balance: f64) -> Self {
        Self { id: id.into(), name: String::new(), address: address.into(), currency: currency.into(), balance }
    }
    pub fn with_name(mut self, name: impl Into<String>) -> Self { self.name = name.into(); self }
}
