use async_trait::async_trait;
use uuid::Uuid;

use crate::journal::{Account, JournalEntry, NewEntry};

use super::Result;

/// Repository for journal entry records.
///
/// This store is authoritative for entry content. It knows nothing about
/// which account an entry belongs to.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Gets an entry by its ID.
    async fn get_entry(&self, id: Uuid) -> Result<Option<JournalEntry>>;

    /// Gets every entry whose ID is in `ids`. Missing IDs are skipped and the
    /// result order is unspecified.
    async fn get_entries(&self, ids: &[Uuid]) -> Result<Vec<JournalEntry>>;

    /// Persists a new entry and returns it with its assigned ID.
    async fn create_entry(&self, entry: &NewEntry) -> Result<JournalEntry>;

    /// Overwrites title, content and sentiment of an existing entry.
    async fn update_entry(&self, entry: &JournalEntry) -> Result<()>;

    /// Deletes an entry by its ID.
    async fn delete_entry(&self, id: Uuid) -> Result<()>;
}

/// Repository for account records.
///
/// Each account document carries the ordered list of entry references. That
/// list is never written wholesale: `push_entry_ref` and `pull_entry_ref` are
/// single-document atomic mutations, so concurrent writers to the same
/// account cannot lose each other's updates.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Gets an account by its unique username.
    async fn get_account(&self, username: &str) -> Result<Option<Account>>;

    /// Lists every account.
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Creates a new account. Fails with `AlreadyExists` on a taken username.
    ///
    /// Accounts start with an empty reference list; one that already carries
    /// references is rejected with `InvalidData`.
    async fn create_account(&self, account: &Account) -> Result<()>;

    /// Saves the profile fields (email, password hash, roles, sentiment
    /// opt-in). The entry reference list is left untouched.
    async fn update_account(&self, account: &Account) -> Result<()>;

    /// Atomically appends `entry_id` to the account's reference list.
    async fn push_entry_ref(&self, username: &str, entry_id: Uuid) -> Result<()>;

    /// Atomically removes `entry_id` from the account's reference list.
    ///
    /// Returns `false` without writing anything when the ID is not on the list.
    async fn pull_entry_ref(&self, username: &str, entry_id: Uuid) -> Result<bool>;

    /// Deletes an account record, but only while its reference list is empty.
    ///
    /// Returns `false` without writing anything when references remain, so an
    /// entry pushed concurrently is never orphaned by the delete.
    async fn delete_account(&self, username: &str) -> Result<bool>;
}
