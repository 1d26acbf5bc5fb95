//! Wallet service API: the remote side the stores talk to.

mod memory;

pub use memory::MemoryWalletApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::wallet::Wallet;

/// Details collected by the create-wallet dialog, before a recovery phrase exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletDetails {
    pub name: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWallet {
    pub name: String,
    pub currency: String,
    pub mnemonic: String,
}

/// Send-money form input. `amount` is the raw text the user typed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SendMoney {
    pub receiver: String,
    pub amount: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub wallet_id: String,
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    pub currency: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub wallet_id: String,
    pub receiver: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreRequest {
    pub name: String,
    pub recovery_phrase: String,
}

#[async_trait]
pub trait WalletApi: Send + Sync {
    async fn get_wallets(&self) -> StoreResult<Vec<Wallet>>;
    async fn create_wallet(&self, request: NewWallet) -> StoreResult<Wallet>;
    async fn create_transaction(&self, request: TransactionRequest) -> StoreResult<Transaction>;
    async fn get_wallet_recovery_phrase(&self) -> StoreResult<Vec<String>>;
    async fn restore_wallet(&self, request: RestoreRequest) -> StoreResult<Wallet>;
    fn is_valid_address(&self, currency: &str, address: &str) -> bool;
    fn is_valid_mnemonic(&self, mnemonic: &str) -> bool;
}
