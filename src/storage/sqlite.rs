//! Relational backend
//!
//! Ownership is part of each statement's WHERE clause, so the check and the
//! read or write it guards are a single statement. Zero matched rows means
//! "not found" whether the clip is missing or belongs to another account.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{AccountStore, ClipStore, StoreError, USERNAME_TAKEN};
use crate::clips::models::Clip;
use crate::common::{generate_account_id, generate_clip_id, now_timestamp};
use crate::users::models::Account;

pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Map a unique-constraint violation on `users.username` to a conflict
fn username_conflict(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(USERNAME_TAKEN.to_string())
        }
        _ => StoreError::Database(e),
    }
}

/// A clip insert whose owner row is gone fails the foreign key
fn missing_owner(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::NotFound,
        _ => StoreError::Database(e),
    }
}

fn expect_one_row(rows_affected: u64) -> Result<(), StoreError> {
    if rows_affected == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn register(&self, username: &str, credential: &str) -> Result<Account, StoreError> {
        let account = Account {
            id: generate_account_id(),
            username: username.to_string(),
            credential: credential.to_string(),
            created_at: now_timestamp(),
        };

        sqlx::query("INSERT INTO users (id, username, credential, created_at) VALUES (?, ?, ?, ?)")
            .bind(&account.id)
            .bind(&account.username)
            .bind(&account.credential)
            .bind(&account.created_at)
            .execute(&self.db)
            .await
            .map_err(username_conflict)?;

        info!(user_id = %account.id, username = %account.username, "Registered account");
        Ok(account)
    }

    async fn get_account(&self, id: &str) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(
            "SELECT id, username, credential, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn find_credential_by_username(&self, username: &str) -> Result<String, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT credential FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        row.map(|(credential,)| credential).ok_or(StoreError::NotFound)
    }

    async fn find_id_by_username(&self, username: &str) -> Result<String, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        row.map(|(id,)| id).ok_or(StoreError::NotFound)
    }

    async fn rename_username(&self, id: &str, new_username: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET username = ? WHERE id = ?")
            .bind(new_username)
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(username_conflict)?;

        expect_one_row(result.rows_affected())?;
        info!(user_id = %id, username = %new_username, "Renamed account");
        Ok(())
    }

    async fn update_credential(&self, id: &str, credential: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET credential = ? WHERE id = ?")
            .bind(credential)
            .bind(id)
            .execute(&self.db)
            .await?;

        expect_one_row(result.rows_affected())
    }

    async fn delete_account(&self, id: &str) -> Result<(), StoreError> {
        // Clips go with the row through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        expect_one_row(result.rows_affected())?;
        info!(user_id = %id, "Deleted account");
        Ok(())
    }
}

#[async_trait]
impl ClipStore for SqliteStore {
    async fn create(&self, owner_id: &str, text: &str) -> Result<Clip, StoreError> {
        let now = now_timestamp();
        let clip = Clip {
            id: generate_clip_id(),
            owner_id: owner_id.to_string(),
            text: text.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO clips (id, owner_id, text, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&clip.id)
        .bind(&clip.owner_id)
        .bind(&clip.text)
        .bind(&clip.created_at)
        .bind(&clip.updated_at)
        .execute(&self.db)
        .await
        .map_err(missing_owner)?;

        debug!(clip_id = %clip.id, user_id = %owner_id, "Created clip");
        Ok(clip)
    }

    async fn get_owned(&self, id: &str, owner_id: &str) -> Result<Clip, StoreError> {
        sqlx::query_as::<_, Clip>(
            r#"
            SELECT id, owner_id, text, created_at, updated_at
            FROM clips
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn list_owned(&self, owner_id: &str) -> Result<Vec<Clip>, StoreError> {
        let clips = sqlx::query_as::<_, Clip>(
            r#"
            SELECT id, owner_id, text, created_at, updated_at
            FROM clips
            WHERE owner_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(clips)
    }

    async fn update_owned(&self, id: &str, owner_id: &str, text: &str) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE clips SET text = ?, updated_at = ? WHERE id = ? AND owner_id = ?")
                .bind(text)
                .bind(now_timestamp())
                .bind(id)
                .bind(owner_id)
                .execute(&self.db)
                .await?;

        expect_one_row(result.rows_affected())
    }

    async fn delete_owned(&self, id: &str, owner_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM clips WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;

        expect_one_row(result.rows_affected())?;
        debug!(clip_id = %id, user_id = %owner_id, "Deleted clip");
        Ok(())
    }

    async fn delete_all_owned(&self, owner_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM clips WHERE owner_id = ?")
            .bind(owner_id)
            .execute(&self.db)
            .await?;

        let deleted = result.rows_affected();
        info!(user_id = %owner_id, deleted, "Deleted all clips");
        Ok(deleted)
    }
}
