//! In-process key-value backend
//!
//! Laid out like a Redis keyspace of hashes:
//!
//! | hash                   | field      | value                  |
//! |------------------------|------------|------------------------|
//! | `drop:users`           | account id | account record         |
//! | `drop:usernames:id`    | username   | account id             |
//! | `drop:usernames:cred`  | username   | protected credential   |
//! | `drop:clips`           | clip id    | clip record            |
//!
//! The whole keyspace sits behind one `RwLock`. Each operation takes the lock
//! once, so a uniqueness check and the writes it guards form one conditional
//! write, and the username hashes never disagree with `drop:users`.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{AccountStore, ClipStore, StoreError, USERNAME_TAKEN};
use crate::clips::models::Clip;
use crate::common::{generate_account_id, generate_clip_id, now_timestamp};
use crate::users::models::Account;

#[derive(Debug, Clone)]
struct AccountRecord {
    username: String,
    credential: String,
    created_at: String,
}

#[derive(Debug, Default)]
struct Keyspace {
    users: HashMap<String, AccountRecord>,
    username_ids: HashMap<String, String>,
    username_credentials: HashMap<String, String>,
    clips: HashMap<String, Clip>,
}

impl Keyspace {
    fn account(&self, id: &str) -> Option<Account> {
        self.users.get(id).map(|record| Account {
            id: id.to_string(),
            username: record.username.clone(),
            credential: record.credential.clone(),
            created_at: record.created_at.clone(),
        })
    }

    /// Owned clip lookup; a foreign owner reads as absent
    fn owned_clip_mut(&mut self, id: &str, owner_id: &str) -> Option<&mut Clip> {
        self.clips
            .get_mut(id)
            .filter(|clip| clip.owner_id == owner_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    keyspace: RwLock<Keyspace>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn register(&self, username: &str, credential: &str) -> Result<Account, StoreError> {
        let mut keyspace = self.keyspace.write().await;

        if keyspace.username_ids.contains_key(username) {
            return Err(StoreError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let id = generate_account_id();
        let record = AccountRecord {
            username: username.to_string(),
            credential: credential.to_string(),
            created_at: now_timestamp(),
        };

        keyspace.users.insert(id.clone(), record);
        keyspace
            .username_ids
            .insert(username.to_string(), id.clone());
        keyspace
            .username_credentials
            .insert(username.to_string(), credential.to_string());

        info!(user_id = %id, username = %username, "Registered account");
        keyspace.account(&id).ok_or(StoreError::NotFound)
    }

    async fn get_account(&self, id: &str) -> Result<Account, StoreError> {
        let keyspace = self.keyspace.read().await;
        keyspace.account(id).ok_or(StoreError::NotFound)
    }

    async fn find_credential_by_username(&self, username: &str) -> Result<String, StoreError> {
        let keyspace = self.keyspace.read().await;
        keyspace
            .username_credentials
            .get(username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_id_by_username(&self, username: &str) -> Result<String, StoreError> {
        let keyspace = self.keyspace.read().await;
        keyspace
            .username_ids
            .get(username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn rename_username(&self, id: &str, new_username: &str) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;

        let old_username = keyspace
            .users
            .get(id)
            .map(|record| record.username.clone())
            .ok_or(StoreError::NotFound)?;

        match keyspace.username_ids.get(new_username) {
            Some(holder) if holder == id => return Ok(()),
            Some(_) => return Err(StoreError::Conflict(USERNAME_TAKEN.to_string())),
            None => {}
        }

        // All checks passed; nothing below can fail
        let credential = keyspace
            .username_credentials
            .remove(&old_username)
            .unwrap_or_default();
        keyspace.username_ids.remove(&old_username);
        keyspace
            .username_ids
            .insert(new_username.to_string(), id.to_string());
        keyspace
            .username_credentials
            .insert(new_username.to_string(), credential);
        if let Some(record) = keyspace.users.get_mut(id) {
            record.username = new_username.to_string();
        }

        info!(user_id = %id, username = %new_username, "Renamed account");
        Ok(())
    }

    async fn update_credential(&self, id: &str, credential: &str) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;

        let record = keyspace.users.get_mut(id).ok_or(StoreError::NotFound)?;
        record.credential = credential.to_string();
        let username = record.username.clone();

        keyspace
            .username_credentials
            .insert(username, credential.to_string());
        Ok(())
    }

    async fn delete_account(&self, id: &str) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;

        let record = keyspace.users.remove(id).ok_or(StoreError::NotFound)?;
        keyspace.username_ids.remove(&record.username);
        keyspace.username_credentials.remove(&record.username);
        keyspace.clips.retain(|_, clip| clip.owner_id != id);

        info!(user_id = %id, "Deleted account");
        Ok(())
    }
}

#[async_trait]
impl ClipStore for MemoryStore {
    async fn create(&self, owner_id: &str, text: &str) -> Result<Clip, StoreError> {
        let mut keyspace = self.keyspace.write().await;

        if !keyspace.users.contains_key(owner_id) {
            return Err(StoreError::NotFound);
        }

        let now = now_timestamp();
        let clip = Clip {
            id: generate_clip_id(),
            owner_id: owner_id.to_string(),
            text: text.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        keyspace.clips.insert(clip.id.clone(), clip.clone());

        debug!(clip_id = %clip.id, user_id = %owner_id, "Created clip");
        Ok(clip)
    }

    async fn get_owned(&self, id: &str, owner_id: &str) -> Result<Clip, StoreError> {
        let keyspace = self.keyspace.read().await;
        keyspace
            .clips
            .get(id)
            .filter(|clip| clip.owner_id == owner_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_owned(&self, owner_id: &str) -> Result<Vec<Clip>, StoreError> {
        let keyspace = self.keyspace.read().await;
        let mut clips: Vec<Clip> = keyspace
            .clips
            .values()
            .filter(|clip| clip.owner_id == owner_id)
            .cloned()
            .collect();
        clips.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(clips)
    }

    async fn update_owned(&self, id: &str, owner_id: &str, text: &str) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;
        let clip = keyspace
            .owned_clip_mut(id, owner_id)
            .ok_or(StoreError::NotFound)?;

        clip.text = text.to_string();
        clip.updated_at = now_timestamp();
        Ok(())
    }

    async fn delete_owned(&self, id: &str, owner_id: &str) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;
        if keyspace.owned_clip_mut(id, owner_id).is_none() {
            return Err(StoreError::NotFound);
        }

        keyspace.clips.remove(id);
        debug!(clip_id = %id, user_id = %owner_id, "Deleted clip");
        Ok(())
    }

    async fn delete_all_owned(&self, owner_id: &str) -> Result<u64, StoreError> {
        let mut keyspace = self.keyspace.write().await;

        let before = keyspace.clips.len();
        keyspace.clips.retain(|_, clip| clip.owner_id != owner_id);
        let deleted = (before - keyspace.clips.len()) as u64;

        info!(user_id = %owner_id, deleted, "Deleted all clips");
        Ok(deleted)
    }
}
