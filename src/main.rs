use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ayd_mcp::ayd::{self, Client};
use ayd_mcp::mcp::{handlers, AydHandlers, Codec, Dispatcher, Server};
use ayd_mcp::Config;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "MCP server for Ayd monitoring over stdio", long_about = None)]
struct Cli {
    /// Base URL of the Ayd server (e.g. http://localhost:9000)
    #[arg(value_name = "AYD_URL")]
    ayd_url: String,

    /// Timeout for each request to Ayd, in seconds
    #[arg(long, default_value_t = ayd::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

fn main() {
    // Logs go to stderr; stdout carries JSON-RPC
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Usage errors exit 1 like every other startup failure
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::new(&cli.ayd_url, cli.timeout)?;

    let client = Client::new(config.ayd_url.clone(), config.timeout)
        .context("Failed to create HTTP client")?;
    let ayd_handlers = AydHandlers::new(
        Box::new(client),
        config.ayd_url.as_str(),
        config.server_info.clone(),
    );

    let mut dispatcher = Dispatcher::new();
    handlers::register(&mut dispatcher, ayd_handlers);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut server = Server::new(Codec::new(stdin.lock(), stdout.lock()), dispatcher);

    info!("Ayd Server for {} is running on stdio!", config.ayd_url);
    server.serve().context("Serve loop stopped")?;
    info!("stdin closed, shutting down");

    Ok(())
}
