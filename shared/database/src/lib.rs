pub mod postgres;
pub mod migrations;
pub mod repositories;
pub mod store;

pub use postgres::{PostgresPool, create_postgres_pool, health_check as postgres_health_check};
pub use repositories::*;
pub use store::{StatementStore, UserStore};

use anyhow::Result;
use bankdoc_utils::{DatabaseConfig, StoreBackend};
use std::sync::Arc;
use std::time::Duration;

/// Store handles shared by request handlers.
#[derive(Clone)]
pub struct Stores {
    pub statements: Arc<dyn StatementStore>,
    pub users: Arc<dyn UserStore>,
    pub backend: StoreBackend,
}

impl Stores {
    pub fn memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    pub fn from_memory(store: MemoryStore) -> Self {
        Self {
            statements: Arc::new(store.clone()),
            users: Arc::new(store),
            backend: StoreBackend::Memory,
        }
    }

    pub fn postgres(pool: PostgresPool) -> Self {
        Self {
            statements: Arc::new(StatementRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
            backend: StoreBackend::Postgres,
        }
    }
}

pub async fn initialize_stores(config: &DatabaseConfig) -> Result<Stores> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Stores::memory())
        }
        StoreBackend::Postgres => {
            let pool = create_postgres_pool(
                &config.postgres_url,
                config.max_connections,
                Duration::from_secs(config.connection_timeout_seconds),
            )
            .await?;

            // Run migrations
            migrations::run_postgres_migrations(&pool).await?;

            Ok(Stores::postgres(pool))
        }
    }
}
