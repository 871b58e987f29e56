//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use journalsync_core::journal::{Account, JournalEntry, NewEntry};
use journalsync_core::lookup::{self, ConfigSource};
use journalsync_core::storage::{AccountRepository, EntryRepository, RepositoryError, Result};

/// Account profile plus its reference list, kept apart so the list is only
/// ever touched by push/pull.
#[derive(Debug, Clone)]
struct AccountRecord {
    profile: Account,
    entry_ids: Vec<Uuid>,
}

impl AccountRecord {
    fn to_account(&self) -> Account {
        self.profile.clone().with_entry_ids(self.entry_ids.clone())
    }
}

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
/// Reference-list mutations happen under the accounts write lock, which makes
/// them atomic per account.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<RwLock<HashMap<Uuid, JournalEntry>>>,
    accounts: Arc<RwLock<HashMap<String, AccountRecord>>>,
    config: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an application config value.
    pub async fn put_config(&self, key: &str, value: &str) -> Result<()> {
        self.config
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Number of stored entry records.
    #[cfg(test)]
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

fn account_not_found(username: &str) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: "Account",
        id: username.to_string(),
    }
}

fn references_on_create(username: &str) -> RepositoryError {
    RepositoryError::InvalidData(format!(
        "account {username} must be created without entry references"
    ))
}

#[async_trait]
impl EntryRepository for InMemoryRepository {
    async fn get_entry(&self, id: Uuid) -> Result<Option<JournalEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&id).cloned())
    }

    async fn get_entries(&self, ids: &[Uuid]) -> Result<Vec<JournalEntry>> {
        let entries = self.entries.read().await;
        Ok(ids.iter().filter_map(|id| entries.get(id).cloned()).collect())
    }

    async fn create_entry(&self, entry: &NewEntry) -> Result<JournalEntry> {
        let mut entries = self.entries.write().await;
        let persisted = entry.clone().into_entry(Uuid::new_v4());
        entries.insert(persisted.id, persisted.clone());
        Ok(persisted)
    }

    async fn update_entry(&self, entry: &JournalEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        let Some(stored) = entries.get_mut(&entry.id) else {
            return Err(RepositoryError::NotFound {
                entity_type: "JournalEntry",
                id: entry.id.to_string(),
            });
        };
        stored.title = entry.title.clone();
        stored.content = entry.content.clone();
        stored.sentiment = entry.sentiment;
        Ok(())
    }

    async fn delete_entry(&self, id: Uuid) -> Result<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "JournalEntry",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(username).map(AccountRecord::to_account))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut listed: Vec<Account> = accounts.values().map(AccountRecord::to_account).collect();
        listed.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(listed)
    }

    async fn create_account(&self, account: &Account) -> Result<()> {
        if !account.entry_ids().is_empty() {
            return Err(references_on_create(&account.username));
        }
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.username) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Account",
                id: account.username.clone(),
            });
        }
        accounts.insert(
            account.username.clone(),
            AccountRecord {
                profile: account.clone(),
                entry_ids: Vec::new(),
            },
        );
        Ok(())
    }

    async fn update_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let record = accounts
            .get_mut(&account.username)
            .ok_or_else(|| account_not_found(&account.username))?;
        record.profile = account.clone().with_entry_ids(Vec::new());
        Ok(())
    }

    async fn push_entry_ref(&self, username: &str, entry_id: Uuid) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|r| r.entry_ids.contains(&entry_id)) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "EntryReference",
                id: entry_id.to_string(),
            });
        }
        let record = accounts
            .get_mut(username)
            .ok_or_else(|| account_not_found(username))?;
        record.entry_ids.push(entry_id);
        Ok(())
    }

    async fn pull_entry_ref(&self, username: &str, entry_id: Uuid) -> Result<bool> {
        let mut accounts = self.accounts.write().await;
        let record = accounts
            .get_mut(username)
            .ok_or_else(|| account_not_found(username))?;
        match record.entry_ids.iter().position(|id| *id == entry_id) {
            Some(index) => {
                record.entry_ids.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_account(&self, username: &str) -> Result<bool> {
        let mut accounts = self.accounts.write().await;
        let record = accounts
            .get(username)
            .ok_or_else(|| account_not_found(username))?;
        if !record.entry_ids.is_empty() {
            return Ok(false);
        }
        accounts.remove(username);
        Ok(true)
    }
}

#[async_trait]
impl ConfigSource for InMemoryRepository {
    async fn load_config(&self) -> lookup::Result<Vec<(String, String)>> {
        let config = self.config.read().await;
        Ok(config
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
