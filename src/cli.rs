use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::eval::Scoring;
use crate::gateway;
use crate::store::{SqliteHitStore, TierHitStore};

#[derive(Parser)]
#[command(name = "phodo", about = "AI photo quality scoring service", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP evaluation gateway (the default command).
    Serve {
        /// Bind host, overrides the config file.
        #[arg(long)]
        host: Option<String>,

        /// Bind port, overrides the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the persisted per-tier award counters.
    Hits,
}

pub async fn dispatch(cli: Cli, mut config: Config) -> Result<()> {
    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.gateway.host = host;
            }
            if let Some(port) = port {
                config.gateway.port = port;
            }
            gateway::run_gateway(config).await?;
        }
        Command::Hits => {
            let scoring = Scoring::reference()?;
            let tier_keys: Vec<&str> = scoring.tiers.keys().collect();
            let db_path = config.store.resolve_db_path(&config.workspace_dir);
            let store = SqliteHitStore::open(&db_path, &tier_keys).await?;

            for tier in scoring.tiers.iter() {
                let hits = store.hits(&tier.key).await?.unwrap_or(0);
                println!("{hits:>8}  {}", tier.label);
            }
        }
    }
    Ok(())
}
