//! MemoryWalletApi - in-process wallet service for the demo binary and tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use super::{NewWallet, RestoreRequest, Transaction, TransactionRequest, WalletApi};
use crate::error::{StoreError, StoreResult};
use crate::wallet::Wallet;

const PHRASE: [&str; 12] = [
    "abandon", "ability", "able", "about", "above", "absent",
    "absorb", "abstract", "absurd", "abuse", "access", "accident",
];
const PHRASE_LENGTHS: [usize; 2] = [12, 24];

#[derive(Debug, Default)]
pub struct MemoryWalletApi {
    wallets: Mutex<Vec<Wallet>>,
    next_id: AtomicU64,
    offline: AtomicBool,
    fetches: AtomicU64,
}

impl MemoryWalletApi {
    pub fn new() -> Self { Self::default() }

    pub fn with_wallets(wallets: Vec<Wallet>) -> Self {
        Self { wallets: Mutex::new(wallets), ..Default::default() }
    }

    /// While offline every call fails with an API error
    pub fn set_offline(&self, offline: bool) { self.offline.store(offline, Ordering::SeqCst); }

    /// Number of `get_wallets` calls served
    pub fn fetch_count(&self) -> u64 { self.fetches.load(Ordering::SeqCst) }

    pub fn insert(&self, wallet: Wallet) -> StoreResult<()> {
        self.wallets()?.push(wallet);
        Ok(())
    }

    pub fn remove(&self, wallet_id: &str) -> StoreResult<Option<Wallet>> {
        let mut wallets = self.wallets()?;
        Ok(wallets.iter().position(|w| w.id == wallet_id).map(|i| wallets.remove(i)))
    }

    fn wallets(&self) -> StoreResult<std::sync::MutexGuard<'_, Vec<Wallet>>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::api("wallet service unreachable"));
        }
        self.wallets.lock().map_err(|_| StoreError::Lock)
    }

    fn add(&self, name: String, currency: String) -> StoreResult<Wallet> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let address = format!("{}addr{:08x}", currency.to_ascii_lowercase(), n);
        let wallet = Wallet::new(format!("wallet-{}", n), address, currency, 0.0).with_name(name);
        self.wallets()?.push(wallet.clone());
        tracing::debug!(id = %wallet.id, "wallet created");
        Ok(wallet)
    }
}

#[async_trait]
impl WalletApi for MemoryWalletApi {
    async fn get_wallets(&self) -> StoreResult<Vec<Wallet>> {
        let wallets = self.wallets()?.clone();
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(wallets)
    }

    async fn create_wallet(&self, request: NewWallet) -> StoreResult<Wallet> {
        if !self.is_valid_mnemonic(&request.mnemonic) {
            return Err(StoreError::api("invalid mnemonic"));
        }
        self.add(request.name, request.currency)
    }

    async fn create_transaction(&self, request: TransactionRequest) -> StoreResult<Transaction> {
        if !self.is_valid_address(&request.currency, &request.receiver) {
            return Err(StoreError::api(format!("invalid receiver address: {}", request.receiver)));
        }
        let mut wallets = self.wallets()?;
        let sender = wallets
            .iter_mut()
            .find(|w| w.id == request.wallet_id)
            .ok_or_else(|| StoreError::api(format!("unknown wallet: {}", request.wallet_id)))?;
        if sender.balance < request.amount {
            return Err(StoreError::api("insufficient funds"));
        }
        sender.balance -= request.amount;
        if let Some(receiver) = wallets.iter_mut().find(|w| w.address == request.receiver) {
            receiver.balance += request.amount;
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Transaction {
            id: format!("tx-{}", n),
            wallet_id: request.wallet_id,
            receiver: request.receiver,
            amount: request.amount,
        })
    }

    async fn get_wallet_recovery_phrase(&self) -> StoreResult<Vec<String>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::api("wallet service unreachable"));
        }
        Ok(PHRASE.iter().map(|w| (*w).to_string()).collect())
    }

    async fn restore_wallet(&self, request: RestoreRequest) -> StoreResult<Wallet> {
        if !self.is_valid_mnemonic(&request.recovery_phrase) {
            return Err(StoreError::api("invalid recovery phrase"));
        }
        self.add(request.name, crate::core::paths::DEFAULT_CURRENCY.to_string())
    }

    fn is_valid_address(&self, currency: &str, address: &str) -> bool {
        address.len() >= 10
            && address.chars().all(|c| c.is_ascii_alphanumeric())
            && (currency.is_empty() || address.to_ascii_lowercase().starts_with(&currency.to_ascii_lowercase()))
    }

    fn is_valid_mnemonic(&self, mnemonic: &str) -> bool {
        let words: Vec<&str> = mnemonic.split_whitespace().collect();
        PHRASE_LENGTHS.contains(&words.len()) && words.iter().all(|w| w.chars().all(|c| c.is_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_list() {
        let api = MemoryWalletApi::new();
        let w = api
            .create_wallet(NewWallet { name: "Main".into(), currency: "ADA".into(), mnemonic: PHRASE.join(" ") })
            .await
            .unwrap();
        assert_eq!(w.name, "Main");
        assert!(api.is_valid_address("ADA", &w.address));
        assert_eq!(api.get_wallets().await.unwrap(), vec![w]);
        assert_eq!(api.fetch_count(), 1);
    }

    #[tokio::test]
    async fn transaction_moves_balance() {
        let api = MemoryWalletApi::with_wallets(vec![
            Wallet::new("a", "adaaddr00000001", "ADA", 10.0),
            Wallet::new("b", "adaaddr00000002", "ADA", 0.0),
        ]);
        let tx = TransactionRequest {
            wallet_id: "a".into(),
            sender: "adaaddr00000001".into(),
            receiver: "adaaddr00000002".into(),
            amount: 4.0,
            currency: "ADA".into(),
            title: None,
            description: None,
        };
        api.create_transaction(tx.clone()).await.unwrap();
        let wallets = api.get_wallets().await.unwrap();
        assert_eq!(wallets[0].balance, 6.0);
        assert_eq!(wallets[1].balance, 4.0);

        let too_much = TransactionRequest { amount: 100.0, ..tx };
        assert!(api.create_transaction(too_much).await.is_err());
    }

    #[tokio::test]
    async fn offline_fails_fetch() {
        let api = MemoryWalletApi::new();
        api.set_offline(true);
        assert!(matches!(api.get_wallets().await, Err(StoreError::Api(_))));
    }

    #[test]
    fn mnemonic_rules() {
        let api = MemoryWalletApi::new();
        assert!(api.is_valid_mnemonic(&PHRASE.join(" ")));
        assert!(!api.is_valid_mnemonic("too short"));
        assert!(!api.is_valid_mnemonic(&PHRASE.join(" ").to_uppercase()));
    }
}
