//! Route constants for wallet screens
//!
//! Centralized registry for every route the store reads or produces.

/// Wallet-scoped routes
pub mod wallets {
    /// Prefix under which every wallet screen is nested
    pub const BASE: &str = "/wallets";
    /// Screen a wallet opens on when no screen is requested
    pub const DEFAULT_SCREEN: &str = "home";

    pub const HOME: &str = "home";
    pub const SEND: &str = "send";
    pub const RECEIVE: &str = "receive";
    pub const TRANSACTIONS: &str = "transactions";

    pub const SCREENS: &[&str] = &[HOME, SEND, RECEIVE, TRANSACTIONS];
}

/// Top-level app routes
pub mod app {
    pub const ROOT: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const SETTINGS: &str = "/settings";
    pub const STAKING: &str = "/staking";
}

/// Wallet list refresh cadence
pub const WALLET_REFRESH_INTERVAL_MS: u64 = 5000;

/// Currency code the wallet service validates addresses against
pub const DEFAULT_CURRENCY: &str = "ADA";
