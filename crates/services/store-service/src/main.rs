//! Store Service - maintenance commands for the storefront database.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use store_service_lib::IndexAction;

#[derive(Parser)]
#[command(name = "store-service")]
#[command(about = "Storefront database maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unique index commands
    Indexes {
        #[command(subcommand)]
        action: IndexCommands,
    },
    /// Check that MongoDB is reachable
    Ping,
}

#[derive(Subcommand)]
enum IndexCommands {
    /// Create missing unique indexes
    Sync,
    /// Show which unique indexes exist
    Status,
    /// Drop the unique indexes
    Drop,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Indexes { action } => {
            let index_action = match action {
                IndexCommands::Sync => IndexAction::Sync,
                IndexCommands::Status => IndexAction::Status,
                IndexCommands::Drop => IndexAction::Drop,
            };
            store_service_lib::run_index_command(index_action).await?;
        }
        Commands::Ping => {
            store_service_lib::ping().await?;
        }
    }

    Ok(())
}
