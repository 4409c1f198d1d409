//! # Storage Module
//!
//! Account and clip persistence behind two traits, with two backends:
//! - `sqlite`: relational storage through `sqlx`
//! - `memory`: in-process key-value storage laid out as hashes
//!
//! Every clip operation that targets an existing clip takes the caller's
//! owner id and treats "exists but owned by someone else" exactly like
//! "does not exist".

pub mod memory;
pub mod sqlite;


use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::clips::models::Clip;
use crate::common::{migrations, AppConfig, StorageBackend};
use crate::users::models::Account;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Reason reported when a username is already held by another account
pub const USERNAME_TAKEN: &str = "username already taken";

#[derive(Debug, Error)]
pub enum StoreError {
    /// Absent, or present but not owned by the caller
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create an account. The uniqueness check and the write are one atomic unit.
    async fn register(&self, username: &str, credential: &str) -> Result<Account, StoreError>;

    async fn get_account(&self, id: &str) -> Result<Account, StoreError>;

    async fn find_credential_by_username(&self, username: &str) -> Result<String, StoreError>;

    async fn find_id_by_username(&self, username: &str) -> Result<String, StoreError>;

    async fn rename_username(&self, id: &str, new_username: &str) -> Result<(), StoreError>;

    async fn update_credential(&self, id: &str, credential: &str) -> Result<(), StoreError>;

    /// Remove the account, its username indices and its clips
    async fn delete_account(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ClipStore: Send + Sync {
    async fn create(&self, owner_id: &str, text: &str) -> Result<Clip, StoreError>;

    async fn get_owned(&self, id: &str, owner_id: &str) -> Result<Clip, StoreError>;

    /// Clips owned by `owner_id`, oldest first
    async fn list_owned(&self, owner_id: &str) -> Result<Vec<Clip>, StoreError>;

    async fn update_owned(&self, id: &str, owner_id: &str, text: &str) -> Result<(), StoreError>;

    async fn delete_owned(&self, id: &str, owner_id: &str) -> Result<(), StoreError>;

    /// Remove every clip owned by `owner_id`; returns how many were removed
    async fn delete_all_owned(&self, owner_id: &str) -> Result<u64, StoreError>;
}

/// The pair of stores a backend provides
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore>,
    pub clips: Arc<dyn ClipStore>,
}

impl Stores {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            accounts: store.clone(),
            clips: store,
        }
    }

    pub fn sqlite(pool: sqlx::SqlitePool) -> Self {
        let store = Arc::new(SqliteStore::new(pool));
        Self {
            accounts: store.clone(),
            clips: store,
        }
    }
}

/// Open the configured backend, creating the SQLite schema if needed
pub async fn connect(config: &AppConfig) -> anyhow::Result<Stores> {
    match config.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory key-value storage");
            Ok(Stores::memory())
        }
        StorageBackend::Sqlite => {
            let database_url = &config.database_url;

            if let Some(path_part) = database_url.strip_prefix("sqlite://") {
                let path_without_params = path_part.split('?').next().unwrap_or("");
                if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
                    let db_path = PathBuf::from(path_without_params);
                    if let Some(parent) = db_path.parent() {
                        if !parent.as_os_str().is_empty() {
                            tokio::fs::create_dir_all(parent).await?;
                        }
                    }
                }
            }

            let connect_options = SqliteConnectOptions::from_str(database_url)?
                .create_if_missing(true)
                .foreign_keys(true);
            let pool = SqlitePoolOptions::new()
                .connect_with(connect_options)
                .await?;

            migrations::run_migrations(&pool, config.reset_db).await?;
            info!(database_url = %database_url, "Using SQLite storage");

            Ok(Stores::sqlite(pool))
        }
    }
}
