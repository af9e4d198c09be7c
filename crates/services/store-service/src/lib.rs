//! Store Service Library
//!
//! MongoDB access and business logic for the storefront: catalogue, purchases,
//! carts, gallery content and users. The HTTP gateway embeds it in-process;
//! the `store-service` binary only exposes maintenance commands.

pub mod config;
pub mod container;
pub mod dao;
pub mod infra;
pub mod service;

use tracing::info;

pub use crate::container::StoreServices;
pub use crate::infra::Database;

use crate::config::StoreServiceConfig;

/// Connect with the environment configuration and build the service container.
pub async fn connect_services() -> Result<StoreServices, Box<dyn std::error::Error>> {
    let config = StoreServiceConfig::from_env();
    let db = Database::connect(&config.database).await?;
    Ok(StoreServices::new(&db))
}

/// Run index maintenance (for CLI commands).
pub async fn run_index_command(action: IndexAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreServiceConfig::from_env();
    let db = Database::connect_without_indexes(&config.database).await?;

    match action {
        IndexAction::Sync => {
            db.ensure_indexes().await?;
            info!("Indexes synced on {}", db.name());
        }
        IndexAction::Status => {
            let status = db.index_status().await?;
            for (name, present) in status {
                let marker = if present { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        IndexAction::Drop => {
            db.drop_indexes().await?;
            info!("Dropped unique indexes on {}", db.name());
        }
    }

    Ok(())
}

/// Check the database answers.
pub async fn ping() -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreServiceConfig::from_env();
    let db = Database::connect_without_indexes(&config.database).await?;
    info!("MongoDB database {} is reachable", db.name());
    Ok(())
}

/// Index maintenance action type.
#[derive(Debug, Clone, Copy)]
pub enum IndexAction {
    Sync,
    Status,
    Drop,
}
