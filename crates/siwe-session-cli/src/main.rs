/*
[INPUT]:  CLI arguments, YAML configuration file, private key environment variable
[OUTPUT]: Clock estimates, session cookies, authenticated responses on stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or subcommands
*/

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use reqwest::{Method, Request};
use siwe_session::{
    Clock, EvmWalletSigner, LoginParams, MessageSigner, MockMessageSigner, SessionManager,
    SystemClock,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use siwe_session_cli::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "siwe-session-cli", version, about = "Sign-in session client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the offset between local and server clocks
    Clock,
    /// Sign in and print the session cookies
    Login,
    /// Send a request, signing in first when needed
    Fetch {
        url: String,
        #[arg(long, default_value = "GET")]
        method: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = CliConfig::from_file(&args.config_path).context("load config")?;
    info!(
        config_path = %args.config_path.display(),
        base_url = %config.provider.base_url,
        "configuration loaded"
    );

    let signer = load_signer(&config, &args.command)?;
    let manager = SessionManager::new(config.session_config()?, signer)
        .context("create session manager")?;

    match args.command {
        Command::Clock => {
            let diff = manager
                .get_clock_diff_approx()
                .await
                .context("query server clock")?;
            let server_time = diff.server_time(SystemClock.now());
            println!("diff_ms={} max_error_ms={}", diff.diff, diff.max_error);
            println!("server_time={}", server_time.to_rfc3339());
        }
        Command::Login => {
            manager
                .login(LoginParams::default())
                .await
                .context("login")?;
            if let Some(expiry) = manager.session_expiry() {
                println!("expires_at={}", expiry.to_rfc3339());
            }
            for (name, value) in manager.get_cookies() {
                println!("{name}={value}");
            }
        }
        Command::Fetch { url, method } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .context("invalid HTTP method")?;
            let url: reqwest::Url = url.parse().context("invalid URL")?;
            let response = manager
                .fetch(Request::new(method, url))
                .await
                .context("fetch")?;
            println!("status={}", response.status());
            println!("{}", response.text().await.context("read response body")?);
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_signer(config: &CliConfig, command: &Command) -> Result<Arc<dyn MessageSigner>> {
    if matches!(command, Command::Clock) {
        // Clock queries never sign.
        return Ok(Arc::new(MockMessageSigner::failing("no signer configured")));
    }

    let private_key = std::env::var(&config.private_key_env)
        .with_context(|| format!("read private key from ${}", config.private_key_env))?;
    let wallet = EvmWalletSigner::new(&private_key).context("load private key")?;
    wallet
        .ensure_address(&config.provider.account_address)
        .context("verify account address")?;
    Ok(Arc::new(wallet))
}
