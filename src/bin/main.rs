//! Walletstate CLI
//!
//!   walletstate resolve <route> --wallets W1,W2 [--active W2]
//!       → {"active": "W1", "redirect": "/wallets/W1/home"}
//!
//!   walletstate demo [--wallets 3] [--interval-ms 5000]
//!       → runs the wallet store against the in-memory service with the
//!         refresh poller, printing a snapshot after every store update (Ctrl+C stops)
//!
//! Output format:
//!   --json     Compact JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::env;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use walletstate::logging::init_logging;
use walletstate::{
    install_signal_handlers, App, MemoryWalletApi, NetworkStatus, RefreshService, Router, Shutdown,
    StoreConfig, Wallet, WalletRoutes, WalletsStore,
};

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }
    if opts.version {
        println!("walletstate {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("resolve") => cmd_resolve(&opts),
        Some("demo") => cmd_demo(&opts),
        Some(cmd) => Err(anyhow!("unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("{}", render(&serde_json::json!({"error": format!("{:#}", e)}), &opts));
        std::process::exit(1);
    }
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    route: Option<String>,
    wallets: Vec<String>,
    wallet_count: Option<usize>,
    active: Option<String>,
    base: Option<String>,
    interval_ms: Option<u64>,
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let value = args.get(i + 1);
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--wallets" | "-w" => {
                    if let Some(v) = value {
                        match v.parse::<usize>() {
                            Ok(n) => opts.wallet_count = Some(n),
                            Err(_) => opts.wallets = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
                        }
                        i += 1;
                    }
                }
                "--active" | "-a" => {
                    if let Some(v) = value {
                        opts.active = Some(v.clone());
                        i += 1;
                    }
                }
                "--base" | "-b" => {
                    if let Some(v) = value {
                        opts.base = Some(v.clone());
                        i += 1;
                    }
                }
                "--interval-ms" | "-i" => {
                    if let Some(v) = value {
                        opts.interval_ms = v.parse().ok();
                        i += 1;
                    }
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {}
            }
            i += 1;
        }

        let mut positional = positional.into_iter();
        opts.command = positional.next();
        opts.route = positional.next();
        opts
    }

    fn config(&self) -> StoreConfig {
        let mut config = StoreConfig::from_env();
        if let Some(base) = &self.base {
            config = config.with_base_route(base.clone());
        }
        if let Some(ms) = self.interval_ms {
            config = config.with_refresh_interval_ms(ms);
        }
        config
    }
}

fn print_usage() {
    println!(
        r#"walletstate - wallet routing and state

USAGE:
    walletstate <command> [route] [options]

COMMANDS:
    resolve <route>         Reconcile a route against a wallet list
    demo                    Run the store with the in-memory wallet service

OPTIONS:
    --wallets, -w <ids|n>   Comma-separated wallet ids (resolve) or count (demo)
    --active, -a <id>       Previously active wallet (resolve)
    --base, -b <route>      Wallet base route (default: /wallets)
    --interval-ms, -i <ms>  Refresh interval (default: 5000, env: WALLETSTATE_REFRESH_MS)
    --json                  Compact JSON output
    --pretty                Pretty-print JSON
    --version, -V           Print version

EXAMPLES:
    walletstate resolve /wallets/Wx --wallets W1,W2
    walletstate resolve /wallets --wallets W1 --active W1
    walletstate demo --wallets 2 --interval-ms 1000"#
    );
}

fn render<T: Serialize>(value: &T, opts: &ParsedArgs) -> String {
    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());
    let out = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    out.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

fn cmd_resolve(opts: &ParsedArgs) -> Result<()> {
    let route = opts.route.as_deref().context("resolve needs a route")?;
    let config = opts.config();
    let routes = WalletRoutes::new(&config.base_route, &config.default_screen)?;
    let wallets: Vec<Wallet> = opts
        .wallets
        .iter()
        .map(|id| Wallet::new(id.as_str(), format!("adaaddr{}", id), config.currency.as_str(), 0.0))
        .collect();

    let outcome = routes.reconcile(route, &wallets, opts.active.as_deref());
    println!("{}", render(&outcome, opts));
    Ok(())
}

fn cmd_demo(opts: &ParsedArgs) -> Result<()> {
    let count = opts.wallet_count.unwrap_or(2);
    if count == 0 {
        bail!("demo needs at least one wallet");
    }
    let config = opts.config();
    let interval = config.refresh_interval();
    let api = Arc::new(MemoryWalletApi::with_wallets(
        (1..=count)
            .map(|n| Wallet::new(format!("wallet-{}", n), format!("adaaddr{:08x}", n), config.currency.as_str(), 100.0 * n as f64).with_name(format!("Wallet {}", n)))
            .collect(),
    ));
    let router = Arc::new(Router::default());
    let store = Arc::new(WalletsStore::new(config, api, router.clone(), Arc::new(NetworkStatus::connected()))?);

    let rt = tokio::runtime::Runtime::new().context("failed to create runtime")?;
    rt.block_on(async {
        let shutdown = Shutdown::new();
        install_signal_handlers(&shutdown);

        let app = App::new(store.clone(), router);
        let redirects = app.initialize("/wallets").await;
        info!(?redirects, "initial route settled");
        println!("{}", render(&app.page(), opts));

        let refresh = RefreshService::new(store.clone()).with_interval(interval).spawn(shutdown.subscribe());

        let mut snapshots = store.subscribe();
        let mut stop = shutdown.subscribe();
        loop {
            tokio::select! {
                _ = stop.recv() => break,
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    println!("{}", render(&snapshot, opts));
                }
            }
        }

        tokio::time::timeout(Duration::from_secs(2), refresh)
            .await
            .context("refresh service did not stop")?
            .context("refresh service panicked")?;
        Ok(())
    })
}
