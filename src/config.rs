//! Store configuration - passed from the app shell

use std::time::Duration;

use crate::core::paths;

/// Environment variable naming the wallet service endpoint. Refresh polling
/// only runs when it is set.
pub const ENV_API: &str = "WALLETSTATE_API";
pub const ENV_REFRESH_MS: &str = "WALLETSTATE_REFRESH_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub base_route: String,
    pub default_screen: String,
    pub currency: String,
    pub refresh_interval_ms: u64,
    pub refresh_enabled: bool,
    pub api_url: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_route: paths::wallets::BASE.into(),
            default_screen: paths::wallets::DEFAULT_SCREEN.into(),
            currency: paths::DEFAULT_CURRENCY.into(),
            refresh_interval_ms: paths::WALLET_REFRESH_INTERVAL_MS,
            refresh_enabled: false,
            api_url: None,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self { Self::default() }

    /// Defaults overridden by `WALLETSTATE_API` / `WALLETSTATE_REFRESH_MS`
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = get(ENV_API).filter(|v| !v.trim().is_empty()) {
            config = config.with_api(url);
        }
        if let Some(ms) = get(ENV_REFRESH_MS).and_then(|v| v.trim().parse::<u64>().ok()).filter(|ms| *ms > 0) {
            config.refresh_interval_ms = ms;
        }
        config
    }

    pub fn with_base_route(mut self, base: impl Into<String>) -> Self { self.base_route = base.into(); self }
    pub fn with_default_screen(mut self, screen: impl Into<String>) -> Self { self.default_screen = screen.into(); self }
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self { self.currency = currency.into(); self }
    pub fn with_refresh_interval_ms(mut self, ms: u64) -> Self { self.refresh_interval_ms = ms; self }
    pub fn with_api(mut self, url: impl Into<String>) -> Self { self.api_url = Some(url.into()); self.refresh_enabled = true; self }
    pub fn without_refresh(mut self) -> Self { self.refresh_enabled = false; self }

    pub fn refresh_interval(&self) -> Duration { Duration::from_millis(self.refresh_interval_ms) }
}
