//! futlink CLI
//!
//! Logs into the FIFA Ultimate Team web app and queries account state.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use futlink_cli::account_cmd::{self, AccountCommand};
use futlink_cli::config::CliState;
use futlink_client::{CancellationToken, ClientConfig, FutClient};
use futlink_core::config::load_config;
use futlink_core::tracing_init::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "futlink")]
#[command(version, about = "FIFA Ultimate Team web app client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: AccountCommand,

    /// Settings file (defaults to the global settings.json)
    #[arg(long, global = true, env = "FUTLINK_CONFIG")]
    config: Option<PathBuf>,

    /// Account state file (defaults to ~/.futlink/accounts.json)
    #[arg(long, global = true, env = "FUTLINK_STATE")]
    state: Option<PathBuf>,

    /// FUT web app origin
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Game year (e.g. 17)
    #[arg(long, global = true)]
    game_version: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Map a platform to a shard platform, e.g. `xone=xbox` (repeatable)
    #[arg(long = "platform-alias", global = true, value_parser = parse_alias)]
    platform_aliases: Vec<(String, String)>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    log_json: bool,
}

fn parse_alias(raw: &str) -> Result<(String, String), String> {
    let (from, to) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FROM=TO, got `{raw}`"))?;
    if from.is_empty() || to.is_empty() {
        return Err(format!("expected FROM=TO, got `{raw}`"));
    }
    Ok((from.to_string(), to.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        config.client.base_url = url;
    }
    if let Some(version) = cli.game_version {
        config.client.game_version = version;
    }
    if let Some(secs) = cli.timeout_secs {
        config.client.request_timeout_secs = secs;
    }
    config
        .client
        .platform_aliases
        .extend(cli.platform_aliases.into_iter().collect::<BTreeMap<_, _>>());

    let filter = format!(
        "futlink_client={level},futlink_cli={level},futlink={level}",
        level = config.log.level
    );
    init_tracing(&filter, cli.log_json || config.log.json);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting futlink CLI");

    let client = FutClient::new(&ClientConfig::from(&config.client))?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            on_signal.cancel();
        }
    });

    let state_path = CliState::resolve_path(cli.state.as_deref())?;
    let mut state = CliState::load_from(&state_path);

    let mut out = io::stdout();
    let result = account_cmd::run(cli.command, &client, &mut state.store, &cancel, &mut out).await;

    // Failed commands leave the store untouched.
    state.save_to(&state_path)?;
    result
}
