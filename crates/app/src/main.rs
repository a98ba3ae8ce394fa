//! Buddy - chat and buddy-list presence
//!
//! `buddy serve` runs the HTTP server backed by SQLite.
//! `buddy client --user NAME` opens an interactive terminal session.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod console;
mod error;
mod poller;
mod serve;
mod session;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "buddy", version, about = "Chat and buddy-list presence")]
struct Cli {
    /// Config file (defaults to ./buddy.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<IpAddr>,
        #[arg(long, short)]
        port: Option<u16>,
        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Open a chat session
    Client {
        /// Your screen name
        #[arg(long, short)]
        user: String,
        /// Server base URL
        #[arg(long)]
        server: Option<String>,
        /// Roster seed; replaces the configured list when given
        #[arg(long = "buddy", value_name = "NAME")]
        buddies: Vec<String>,
        /// Seconds between status polls
        #[arg(long)]
        poll_interval: Option<u64>,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config
    fn apply(&self, config: &mut Config) {
        match &self.command {
            Command::Serve {
                host,
                port,
                database,
            } => {
                if let Some(host) = host {
                    config.server.host = *host;
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(database) = database {
                    config.server.database = Some(database.clone());
                }
            }
            Command::Client {
                server,
                buddies,
                poll_interval,
                ..
            } => {
                if let Some(server) = server {
                    config.client.server_url = server.clone();
                }
                if !buddies.is_empty() {
                    config.client.buddies = buddies.clone();
                }
                if let Some(secs) = poll_interval {
                    config.client.poll_interval_secs = *secs;
                }
            }
        }
    }
}

/// File and environment first, then flags; validated once all layers are in
fn resolve_config(cli: &Cli) -> error::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> error::Result<()> {
    let config = resolve_config(&cli)?;

    match &cli.command {
        Command::Serve { .. } => serve::run_server(&config).await,
        Command::Client { user, .. } => session::run_client(&config, user).await,
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
