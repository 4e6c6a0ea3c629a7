use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use todo_graphql::config::{Config, StorageBackend};
use todo_graphql::storage::{InMemoryStorage, Storage};
use todo_graphql::{graphql, logging, server};

#[derive(Parser)]
#[command(name = "todo-graphql")]
#[command(about = "GraphQL API for todo items")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the GraphQL HTTP server
    Serve {
        /// Port to run the server on
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
    },
    /// Print the GraphQL schema (SDL) and exit
    Schema,
}

async fn build_storage(config: &Config) -> anyhow::Result<Arc<dyn Storage>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(InMemoryStorage::new()))
        }
        #[cfg(feature = "db")]
        StorageBackend::Libsql => {
            let storage = todo_graphql::db::LibsqlStorage::connect(&config.storage.database)
                .await
                .context("failed to initialize libSQL storage")?;
            info!("Database storage initialized successfully");
            Ok(Arc::new(storage))
        }
        #[cfg(not(feature = "db"))]
        StorageBackend::Libsql => {
            anyhow::bail!("storage backend \"libsql\" requires building with the `db` feature")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    match cli.command {
        Commands::Schema => {
            println!("{}", graphql::schema_sdl());
        }
        Commands::Serve { port, host } => {
            let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }

            let _log_guard = logging::init_logging(&config.logging);
            info!("Starting todo GraphQL server");

            let metrics_handle = if config.metrics.enabled {
                todo_graphql::metrics::init_metrics()
            } else {
                None
            };

            let storage = build_storage(&config).await?;
            let addr = config.bind_addr()?;
            server::start_server(storage, metrics_handle, addr).await?;
        }
    }

    Ok(())
}
