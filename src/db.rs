use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::store::{MemoryStore, MySqlStore, PayrollStore};

pub async fn init_db(database_url: &str) -> Result<MySqlPool> {
    let pool = MySqlPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// Picks the store backend: MySQL when a database URL is configured,
/// otherwise an in-memory store with demo data.
pub async fn init_store(database_url: Option<&str>) -> Result<Arc<dyn PayrollStore>> {
    match database_url {
        Some(url) => {
            let pool = init_db(url).await?;
            info!("Using MySQL store");
            Ok(Arc::new(MySqlStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store with demo data");
            Ok(Arc::new(MemoryStore::with_demo_data()))
        }
    }
}
