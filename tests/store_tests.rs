//! Store + app controller flows against the in-memory wallet service
//!
//! These tests verify:
//! 1. App initialization loads wallets and settles the route
//! 2. Refresh replaces the wallet list and re-reconciles
//! 3. Wallet creation, restore and send flows navigate to the wallet
//! 4. Page selection follows login and wallet-loading state
//! 5. Snapshots reach subscribers
//! 6. Loading state is visible while the list fetch is in flight

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use walletstate::api::{
    NewWallet, RestoreRequest, SendMoney, Transaction, TransactionRequest, WalletDetails,
};
use walletstate::{
    App, MemoryWalletApi, Navigator, NetworkStatus, Page, Router, StoreConfig, StoreError, StoreResult, Wallet,
    WalletApi, WalletsStore,
};

const PHRASE: &str = "abandon ability able about above absent absorb abstract absurd abuse access accident";

struct Harness {
    api: Arc<MemoryWalletApi>,
    router: Arc<Router>,
    network: Arc<NetworkStatus>,
    store: Arc<WalletsStore>,
    app: App,
}

fn harness(wallets: Vec<Wallet>) -> Harness {
    let api = Arc::new(MemoryWalletApi::with_wallets(wallets));
    let router = Arc::new(Router::default());
    let network = Arc::new(NetworkStatus::connected());
    let store = Arc::new(
        WalletsStore::new(StoreConfig::default(), api.clone(), router.clone(), network.clone()).expect("store"),
    );
    let app = App::new(store.clone(), router.clone());
    Harness { api, router, network, store, app }
}

fn wallet(id: &str, balance: f64) -> Wallet {
    Wallet::new(id, format!("adaaddr{:0>8}", id), "ADA", balance).with_name(id)
}

/// Test: Initializing on the bare base route lands on the first wallet
#[tokio::test]
async fn initialize_settles_on_first_wallet() {
    let h = harness(vec![wallet("a1", 5.0), wallet("b2", 0.0)]);
    assert_eq!(h.app.page(), Page::Loading);

    let redirects = h.app.initialize("/wallets").await;
    assert_eq!(redirects, vec!["/wallets/a1/home"]);
    assert_eq!(h.router.current_route(), "/wallets/a1/home");
    assert_eq!(
        h.app.page(),
        Page::Wallets { active: Some("a1".into()), route: "/wallets/a1/home".into() }
    );
}

/// Test: Root route resolves to the active wallet's home
#[tokio::test]
async fn root_route_resolves_to_wallet() {
    let h = harness(vec![wallet("a1", 0.0), wallet("b2", 0.0)]);
    h.app.initialize("/wallets/b2/send").await;
    assert_eq!(h.store.active().map(|w| w.id).as_deref(), Some("b2"));

    let redirects = h.app.update_location("/");
    assert_eq!(redirects, vec!["/wallets/b2/home"]);
    assert_eq!(h.store.active().map(|w| w.id).as_deref(), Some("b2"));
}

/// Test: Unknown wallet in the url falls back to the first wallet
#[tokio::test]
async fn unknown_wallet_url_redirects() {
    let h = harness(vec![wallet("a1", 0.0)]);
    h.app.initialize("/settings").await;
    assert_eq!(h.store.active(), None);

    let redirects = h.app.update_location("/wallets/zz/home");
    assert_eq!(redirects, vec!["/wallets/a1/home"]);
    assert_eq!(h.store.active().map(|w| w.id).as_deref(), Some("a1"));

    let redirects = h.app.update_location("/settings");
    assert!(redirects.is_empty());
    assert_eq!(h.store.active().map(|w| w.id).as_deref(), Some("a1"));
}

/// Test: No wallets → create-wallet page; wallets appear after refresh
#[tokio::test]
async fn empty_service_then_refresh() {
    let h = harness(vec![]);
    let redirects = h.app.initialize("/wallets").await;
    assert!(redirects.is_empty());
    assert_eq!(h.app.page(), Page::CreateWallet);

    h.api.insert(wallet("late", 1.0)).expect("insert");
    assert!(h.store.refresh_wallets_data().await.expect("refresh"));
    assert_eq!(h.store.all().len(), 1);
    assert_eq!(h.store.active().map(|w| w.id).as_deref(), Some("late"));
    assert_eq!(h.router.current_route(), "/wallets/late/home");
}

/// Test: Refresh drops a removed active wallet when the route no longer resolves
#[tokio::test]
async fn refresh_after_removal_moves_to_first_wallet() {
    let h = harness(vec![wallet("a1", 0.0), wallet("b2", 0.0)]);
    h.app.initialize("/wallets/b2/home").await;

    h.api.remove("b2").expect("remove");
    h.store.refresh_wallets_data().await.expect("refresh");
    assert_eq!(h.store.active().map(|w| w.id).as_deref(), Some("a1"));
    assert_eq!(h.router.current_route(), "/wallets/a1/home");
}

/// Test: Refresh is skipped while disconnected and errors keep the old list
#[tokio::test]
async fn refresh_respects_connection_and_failures() {
    let h = harness(vec![wallet("a1", 0.0)]);
    h.app.initialize("/wallets").await;
    let fetches = h.api.fetch_count();

    h.network.set_connected(false);
    assert!(!h.store.refresh_wallets_data().await.expect("skip"));
    assert_eq!(h.api.fetch_count(), fetches);

    h.network.set_connected(true);
    h.api.set_offline(true);
    assert!(matches!(h.store.refresh_wallets_data().await, Err(StoreError::Api(_))));
    assert_eq!(h.store.all().len(), 1);
    assert!(h.store.wallets_request().error().is_some());
}

/// Test: Two-step wallet creation appends and opens the new wallet
#[tokio::test]
async fn create_wallet_flow() {
    let h = harness(vec![wallet("a1", 0.0)]);
    h.app.initialize("/wallets").await;
    h.store.toggle_create_wallet_dialog();

    let phrase = h
        .store
        .create_personal_wallet(WalletDetails { name: "Savings".into(), currency: "ADA".into() })
        .await
        .expect("phrase");
    assert_eq!(phrase.len(), 12);

    let created = h.store.finish_wallet_creation(&phrase).await.expect("create");
    assert_eq!(created.name, "Savings");
    assert_eq!(h.store.all().len(), 2);
    assert_eq!(h.store.wallets_request().cached(&()).map(|l| l.len()), Some(2));
    assert_eq!(h.store.active().map(|w| w.id), Some(created.id.clone()));
    assert_eq!(h.router.current_route(), format!("/wallets/{}/home", created.id));

    assert!(matches!(h.store.finish_wallet_creation(&phrase).await, Err(StoreError::NoPendingWallet)));
}

/// Test: Restore closes the dialog, refreshes and opens the restored wallet
#[tokio::test]
async fn restore_wallet_flow() {
    let h = harness(vec![wallet("a1", 0.0)]);
    h.app.initialize("/wallets").await;
    h.store.toggle_add_wallet();
    h.store.toggle_wallet_restore();
    assert!(h.store.dialogs().restore_wallet);
    assert!(!h.store.dialogs().add_wallet);

    let restored = h
        .store
        .restore_wallet(RestoreRequest { name: "Old".into(), recovery_phrase: PHRASE.into() })
        .await
        .expect("restore");
    assert!(!h.store.dialogs().restore_wallet);
    assert!(h.store.all().iter().any(|w| w.id == restored.id));
    assert_eq!(h.store.active().map(|w| w.id), Some(restored.id));

    let bad = h
        .store
        .restore_wallet(RestoreRequest { name: "Bad".into(), recovery_phrase: "nope".into() })
        .await;
    assert!(bad.is_err());
}

/// Test: Sending money debits the active wallet and returns to it
#[tokio::test]
async fn send_money_flow() {
    let h = harness(vec![wallet("a1", 10.0), wallet("b2", 0.0)]);
    h.app.initialize("/wallets/a1/send").await;

    let receiver = h.store.all()[1].address.clone();
    assert!(h.store.is_valid_address(&receiver));

    let tx = h
        .store
        .send_money(SendMoney { receiver, amount: "2.5".into(), ..Default::default() })
        .await
        .expect("send");
    assert_eq!(tx.amount, 2.5);
    assert_eq!(h.store.active().map(|w| w.balance), Some(7.5));
    assert_eq!(h.router.current_route(), "/wallets/a1/home");

    let bad = h.store.send_money(SendMoney { receiver: "x".into(), amount: "abc".into(), ..Default::default() }).await;
    assert!(matches!(bad, Err(StoreError::InvalidAmount(_))));
}

/// Test: Logged-out users are sent to the login page
#[tokio::test]
async fn logout_forces_login() {
    let h = harness(vec![wallet("a1", 0.0)]);
    h.app.initialize("/wallets").await;

    h.app.log_out();
    assert_eq!(h.app.page(), Page::Login);
    assert_eq!(h.router.current_route(), "/login");

    h.app.log_in();
    assert_eq!(h.router.current_route(), "/wallets/a1/home");
    assert!(matches!(h.app.page(), Page::Wallets { .. }));
}

/// Test: Subscribers see the snapshot after reconciliation
#[tokio::test]
async fn snapshot_subscription() {
    let h = harness(vec![wallet("a1", 0.0)]);
    let mut rx = h.store.subscribe();

    h.app.initialize("/wallets").await;
    assert!(rx.has_changed().expect("sender alive"));
    let snap = rx.borrow_and_update().clone();
    assert_eq!(snap.active.as_deref(), Some("a1"));
    assert_eq!(snap.wallets.len(), 1);
    assert!(!snap.loading);
    assert!(h.store.is_valid_mnemonic(PHRASE));
}

/// Wallet service whose list fetch waits for a release while held
struct HeldApi {
    inner: MemoryWalletApi,
    hold: AtomicBool,
    release: Notify,
}

#[async_trait]
impl WalletApi for HeldApi {
    async fn get_wallets(&self) -> StoreResult<Vec<Wallet>> {
        if self.hold.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        self.inner.get_wallets().await
    }
    async fn create_wallet(&self, request: NewWallet) -> StoreResult<Wallet> { self.inner.create_wallet(request).await }
    async fn create_transaction(&self, request: TransactionRequest) -> StoreResult<Transaction> {
        self.inner.create_transaction(request).await
    }
    async fn get_wallet_recovery_phrase(&self) -> StoreResult<Vec<String>> {
        self.inner.get_wallet_recovery_phrase().await
    }
    async fn restore_wallet(&self, request: RestoreRequest) -> StoreResult<Wallet> {
        self.inner.restore_wallet(request).await
    }
    fn is_valid_address(&self, currency: &str, address: &str) -> bool { self.inner.is_valid_address(currency, address) }
    fn is_valid_mnemonic(&self, mnemonic: &str) -> bool { self.inner.is_valid_mnemonic(mnemonic) }
}

/// Test: Store, app page and snapshot all report loading while the fetch is pending
#[tokio::test]
async fn loading_visible_while_fetch_pending() {
    let api = Arc::new(HeldApi {
        inner: MemoryWalletApi::with_wallets(vec![wallet("a1", 1.0)]),
        hold: AtomicBool::new(false),
        release: Notify::new(),
    });
    let router = Arc::new(Router::default());
    let store = Arc::new(
        WalletsStore::new(StoreConfig::default(), api.clone(), router.clone(), Arc::new(NetworkStatus::connected()))
            .expect("store"),
    );
    let app = App::new(store.clone(), router);
    app.initialize("/wallets").await;

    api.hold.store(true, Ordering::SeqCst);
    let mut rx = store.subscribe();
    let _ = rx.borrow_and_update();

    let refresh = store.refresh_wallets_data();
    let observe = async {
        tokio::task::yield_now().await;
        assert!(store.is_loading());
        assert!(store.wallets_request().is_executing());
        assert_eq!(app.page(), Page::Loading);
        assert!(rx.has_changed().expect("sender alive"));
        assert!(rx.borrow_and_update().loading);
        assert!(store.snapshot().loading);
        api.release.notify_one();
    };
    let (refreshed, ()) = tokio::join!(refresh, observe);

    assert!(refreshed.expect("refresh"));
    assert!(!store.is_loading());
    assert!(!store.snapshot().loading);
    assert!(matches!(app.page(), Page::Wallets { .. }));
}

/// Test: A failed fetch publishes the settled, non-loading state
#[tokio::test]
async fn failed_fetch_publishes_settled_snapshot() {
    let h = harness(vec![wallet("a1", 0.0)]);
    h.app.initialize("/wallets").await;
    let refreshed_at = h.store.snapshot().refreshed_at;

    h.api.set_offline(true);
    let mut rx = h.store.subscribe();
    let _ = rx.borrow_and_update();
    assert!(h.store.refresh_wallets_data().await.is_err());

    assert!(rx.has_changed().expect("sender alive"));
    let snap = rx.borrow_and_update().clone();
    assert!(!snap.loading);
    assert_eq!(snap.wallets.len(), 1);
    assert!(refreshed_at.is_some());
    assert_eq!(snap.refreshed_at, refreshed_at);
}
