//! Collo server
//!
//! Hosts the portal API (and optionally the built UI) in front of the
//! hosted backend.
//!
//! ```text
//! collo serve                     # config from default locations + COLLO_* env
//! collo serve --config collo.toml --port 9000
//! collo serve --demo              # in-memory backend with sample rows
//! collo config -o config.toml     # write a default config file
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use collo::api::{serve, AppState};
use collo::backend::{Backend, MemoryBackend, SupabaseBackend};
use collo::config::{generate_default_config, BackendKind, Config, LoggingConfig};
use collo::websocket::HubConfig;

#[derive(Parser)]
#[command(name = "collo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Campus services portal for students")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server
    Serve {
        /// Config file (default: search the usual locations)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the bind port
        #[arg(short, long)]
        port: Option<u16>,
        /// Use the in-memory backend with demo data
        #[arg(long)]
        demo: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            demo,
        } => {
            let mut config = match config {
                Some(path) => Config::load_with_env(&path)?,
                None => Config::load_default(),
            };
            if let Some(host) = host {
                config.api.host = host;
            }
            if let Some(port) = port {
                config.api.port = port;
            }
            if demo {
                config.backend.kind = BackendKind::Memory;
            }

            init_logging(&config.logging);
            run_server(config).await?;
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("collo={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Collo v{}", env!("CARGO_PKG_VERSION"));

    let backend: Arc<dyn Backend> = match config.backend.kind {
        BackendKind::Memory => {
            tracing::warn!("Using the in-memory backend, nothing is persisted");
            Arc::new(MemoryBackend::with_demo_data().await)
        }
        BackendKind::Supabase => {
            if config.backend.anon_key.is_empty() {
                tracing::warn!("backend.anon_key is empty, requests will likely be rejected");
            }
            let mut supabase = config.backend.supabase();
            supabase.event_capacity = config.realtime.broadcast_capacity;

            let client = SupabaseBackend::new(supabase).context("creating backend client")?;
            match client.health_check().await {
                Ok(()) => tracing::info!(url = %config.backend.url, "Backend reachable"),
                Err(e) => tracing::warn!(
                    url = %config.backend.url,
                    "Backend not reachable: {} (pages will show errors until it is)",
                    e
                ),
            }
            Arc::new(client)
        }
    };

    let hub_config = HubConfig {
        max_connections: config.realtime.max_connections,
    };
    let state = AppState::new(backend, config.api, hub_config);

    serve(state).await.context("API server failed")?;

    tracing::info!("Collo stopped");
    Ok(())
}
