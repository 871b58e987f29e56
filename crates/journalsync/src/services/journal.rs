//! Account/entry consistency manager.
//!
//! Every entry create and delete goes through [`JournalService`], which owns
//! both repository handles and issues the two writes in a fixed order:
//!
//! - create: entry record first, then the reference push
//! - delete: reference pull first, then the entry record
//!
//! A failure of the second write is reported as [`JournalError::Inconsistent`]
//! so callers can tell it apart from a clean failure.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use journalsync_core::journal::{
    apply_entry_update, validate_entry_draft, Account, EntryDraft, JournalEntry, JournalError,
    UpdateEntryRequest,
};
use journalsync_core::storage::{AccountRepository, EntryRepository, RepositoryError};

type Result<T> = std::result::Result<T, JournalError>;

/// Drain-and-delete attempts before an account delete gives up.
const CASCADE_ROUNDS: usize = 8;

/// Single writer-of-record for the account to entry relationship.
#[derive(Clone)]
pub struct JournalService {
    entries: Arc<dyn EntryRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl JournalService {
    pub fn new(entries: Arc<dyn EntryRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { entries, accounts }
    }

    async fn require_account(&self, username: &str) -> Result<Account> {
        self.accounts
            .get_account(username)
            .await?
            .ok_or_else(|| JournalError::account_not_found(username))
    }

    /// Creates an entry owned by `username`.
    ///
    /// The creation time is stamped here. If the entry is stored but the
    /// reference push fails, the entry is left unreferenced and
    /// `JournalError::Inconsistent` is returned.
    pub async fn create_entry(&self, draft: EntryDraft, username: &str) -> Result<JournalEntry> {
        validate_entry_draft(&draft)?;
        self.require_account(username).await?;

        let entry = self.entries.create_entry(&draft.stamp(Utc::now())).await?;

        if let Err(source) = self.accounts.push_entry_ref(username, entry.id).await {
            tracing::error!(
                entry_id = %entry.id,
                username,
                error = %source,
                "Entry stored but not referenced by its account"
            );
            return Err(JournalError::Inconsistent {
                entry_id: entry.id,
                username: username.to_string(),
                source,
            });
        }

        tracing::debug!(entry_id = %entry.id, username, "Entry created");
        Ok(entry)
    }

    /// Deletes an entry owned by `username`.
    ///
    /// Returns `Ok(false)` without writing anything when the entry is not on
    /// the account's reference list, so deleting twice is harmless.
    pub async fn delete_entry(&self, entry_id: Uuid, username: &str) -> Result<bool> {
        self.require_account(username).await?;

        if !self.accounts.pull_entry_ref(username, entry_id).await? {
            tracing::debug!(entry_id = %entry_id, username, "Entry not referenced, nothing to delete");
            return Ok(false);
        }

        match self.entries.delete_entry(entry_id).await {
            Ok(()) => {
                tracing::debug!(entry_id = %entry_id, username, "Entry deleted");
                Ok(true)
            }
            Err(RepositoryError::NotFound { .. }) => {
                tracing::warn!(entry_id = %entry_id, username, "Referenced entry record was already gone");
                Ok(true)
            }
            Err(source) => {
                tracing::error!(
                    entry_id = %entry_id,
                    username,
                    error = %source,
                    "Reference removed but entry record left behind"
                );
                Err(JournalError::Inconsistent {
                    entry_id,
                    username: username.to_string(),
                    source,
                })
            }
        }
    }

    /// Deletes every entry of `username`, then the account itself.
    ///
    /// The account store only drops an account whose reference list is empty,
    /// so entries created while the cascade runs are picked up by another
    /// round instead of being orphaned. Admin accounts cannot be deleted this
    /// way.
    pub async fn delete_account(&self, username: &str) -> Result<()> {
        let mut account = self.require_account(username).await?;
        if account.is_admin() {
            return Err(JournalError::Forbidden(format!(
                "admin account {username} cannot be deleted"
            )));
        }

        let mut deleted = 0;
        for round in 1..=CASCADE_ROUNDS {
            for entry_id in account.entry_ids() {
                if self.delete_entry(*entry_id, username).await? {
                    deleted += 1;
                }
            }
            if self.accounts.delete_account(username).await? {
                tracing::info!(username, entries = deleted, "Account deleted");
                return Ok(());
            }
            tracing::debug!(username, round, "Entries added during account delete, draining again");
            account = self.require_account(username).await?;
        }

        Err(JournalError::Conflict(format!(
            "account {username} kept receiving entries while being deleted"
        )))
    }

    /// Gets an entry, but only if `username` owns it.
    pub async fn get_entry(&self, entry_id: Uuid, username: &str) -> Result<JournalEntry> {
        let account = self.require_account(username).await?;
        if !account.owns_entry(entry_id) {
            return Err(JournalError::entry_not_found(entry_id));
        }
        self.entries
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| JournalError::entry_not_found(entry_id))
    }

    /// Lists the entries of `username` in reference-list order.
    pub async fn list_entries(&self, username: &str) -> Result<Vec<JournalEntry>> {
        let account = self.require_account(username).await?;
        let ids = account.entry_ids();

        let mut by_id: HashMap<Uuid, JournalEntry> = self
            .entries
            .get_entries(ids)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            match by_id.remove(id) {
                Some(entry) => ordered.push(entry),
                None => tracing::warn!(entry_id = %id, username, "Dangling entry reference"),
            }
        }
        Ok(ordered)
    }

    /// Updates title and content of an entry owned by `username`.
    pub async fn update_entry(
        &self,
        entry_id: Uuid,
        username: &str,
        update: &UpdateEntryRequest,
    ) -> Result<JournalEntry> {
        let current = self.get_entry(entry_id, username).await?;
        let updated = apply_entry_update(&current, update)?;
        self.entries.update_entry(&updated).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use journalsync_core::journal::{EntryError, NewEntry, Role, Sentiment};
    use journalsync_core::storage::Result as RepoResult;

    use crate::storage::InMemoryRepository;

    /// Wraps the in-memory store, counting writes and failing on demand.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryRepository,
        writes: AtomicUsize,
        fail_push: AtomicBool,
        fail_entry_delete: AtomicBool,
        /// Account that receives one extra entry during the next entry delete.
        late_entry_for: Mutex<Option<String>>,
    }

    impl FlakyStore {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn wrote(&self) {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }

        fn down() -> RepositoryError {
            RepositoryError::ConnectionFailed("store offline".to_string())
        }
    }

    #[async_trait]
    impl EntryRepository for FlakyStore {
        async fn get_entry(&self, id: Uuid) -> RepoResult<Option<JournalEntry>> {
            self.inner.get_entry(id).await
        }

        async fn get_entries(&self, ids: &[Uuid]) -> RepoResult<Vec<JournalEntry>> {
            self.inner.get_entries(ids).await
        }

        async fn create_entry(&self, entry: &NewEntry) -> RepoResult<JournalEntry> {
            self.wrote();
            self.inner.create_entry(entry).await
        }

        async fn update_entry(&self, entry: &JournalEntry) -> RepoResult<()> {
            self.wrote();
            self.inner.update_entry(entry).await
        }

        async fn delete_entry(&self, id: Uuid) -> RepoResult<()> {
            self.wrote();
            if self.fail_entry_delete.load(Ordering::SeqCst) {
                return Err(Self::down());
            }
            let late_owner = self.late_entry_for.lock().unwrap().take();
            if let Some(owner) = late_owner {
                let late = EntryDraft::new("Written meanwhile").stamp(Utc::now());
                let entry = self.inner.create_entry(&late).await?;
                self.inner.push_entry_ref(&owner, entry.id).await?;
            }
            self.inner.delete_entry(id).await
        }
    }

    #[async_trait]
    impl AccountRepository for FlakyStore {
        async fn get_account(&self, username: &str) -> RepoResult<Option<Account>> {
            self.inner.get_account(username).await
        }

        async fn list_accounts(&self) -> RepoResult<Vec<Account>> {
            self.inner.list_accounts().await
        }

        async fn create_account(&self, account: &Account) -> RepoResult<()> {
            self.inner.create_account(account).await
        }

        async fn update_account(&self, account: &Account) -> RepoResult<()> {
            self.wrote();
            self.inner.update_account(account).await
        }

        async fn push_entry_ref(&self, username: &str, entry_id: Uuid) -> RepoResult<()> {
            self.wrote();
            if self.fail_push.load(Ordering::SeqCst) {
                return Err(Self::down());
            }
            self.inner.push_entry_ref(username, entry_id).await
        }

        async fn pull_entry_ref(&self, username: &str, entry_id: Uuid) -> RepoResult<bool> {
            let removed = self.inner.pull_entry_ref(username, entry_id).await?;
            if removed {
                self.wrote();
            }
            Ok(removed)
        }

        async fn delete_account(&self, username: &str) -> RepoResult<bool> {
            self.wrote();
            self.inner.delete_account(username).await
        }
    }

    async fn setup() -> (JournalService, Arc<FlakyStore>) {
        let store = Arc::new(FlakyStore::default());
        store
            .create_account(&Account::new("alice", "alice@example.com"))
            .await
            .unwrap();
        let service = JournalService::new(store.clone(), store.clone());
        (service, store)
    }

    fn day_one() -> EntryDraft {
        EntryDraft::new("Day 1").with_content("ok")
    }

    async fn alice(store: &FlakyStore) -> Account {
        store.get_account("alice").await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_create_references_new_entry() {
        let (service, store) = setup().await;

        let entry = service.create_entry(day_one(), "alice").await.unwrap();

        assert_eq!(alice(&store).await.entry_ids(), &[entry.id]);
        let stored = store.get_entry(entry.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Day 1");
        assert_eq!(stored.content.as_deref(), Some("ok"));
        assert_eq!(stored.sentiment, None);
    }

    #[tokio::test]
    async fn test_create_keeps_caller_sentiment() {
        let (service, _store) = setup().await;
        let draft = day_one().with_sentiment(Sentiment::Angry);

        let created = service.create_entry(draft, "alice").await.unwrap();
        let fetched = service.get_entry(created.id, "alice").await.unwrap();

        assert_eq!(fetched.title, "Day 1");
        assert_eq!(fetched.content.as_deref(), Some("ok"));
        assert_eq!(fetched.sentiment, Some(Sentiment::Angry));
    }

    #[tokio::test]
    async fn test_create_for_unknown_account_writes_nothing() {
        let (service, store) = setup().await;

        let err = service.create_entry(day_one(), "bob").await.unwrap_err();

        assert!(matches!(err, JournalError::NotFound { entity_type: "Account", .. }));
        assert_eq!(store.writes(), 0);
        assert_eq!(store.inner.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft() {
        let (service, store) = setup().await;

        let err = service
            .create_entry(EntryDraft::new("ab"), "alice")
            .await
            .unwrap_err();

        assert!(matches!(err, JournalError::Invalid(EntryError::TitleLength)));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_create_reports_inconsistency_when_push_fails() {
        let (service, store) = setup().await;
        store.fail_push.store(true, Ordering::SeqCst);

        let err = service.create_entry(day_one(), "alice").await.unwrap_err();

        let JournalError::Inconsistent { entry_id, username, .. } = err else {
            panic!("expected Inconsistent, got {err:?}");
        };
        assert_eq!(username, "alice");
        assert!(store.get_entry(entry_id).await.unwrap().is_some());
        assert!(alice(&store).await.entry_ids().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_reference_and_record() {
        let (service, store) = setup().await;
        let entry = service.create_entry(day_one(), "alice").await.unwrap();

        assert!(service.delete_entry(entry.id, "alice").await.unwrap());

        assert!(alice(&store).await.entry_ids().is_empty());
        assert!(store.get_entry(entry.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_entry_is_noop() {
        let (service, store) = setup().await;
        let kept = service.create_entry(day_one(), "alice").await.unwrap();
        let writes_before = store.writes();

        assert!(!service.delete_entry(Uuid::new_v4(), "alice").await.unwrap());

        assert_eq!(store.writes(), writes_before);
        assert_eq!(alice(&store).await.entry_ids(), &[kept.id]);
        assert_eq!(store.inner.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_twice_second_call_writes_nothing() {
        let (service, store) = setup().await;
        let entry = service.create_entry(day_one(), "alice").await.unwrap();

        assert!(service.delete_entry(entry.id, "alice").await.unwrap());
        let writes_after_first = store.writes();
        assert!(!service.delete_entry(entry.id, "alice").await.unwrap());

        assert_eq!(store.writes(), writes_after_first);
    }

    #[tokio::test]
    async fn test_delete_of_other_accounts_entry_is_noop() {
        let (service, store) = setup().await;
        store
            .create_account(&Account::new("bob", "bob@example.com"))
            .await
            .unwrap();
        let entry = service.create_entry(day_one(), "alice").await.unwrap();

        assert!(!service.delete_entry(entry.id, "bob").await.unwrap());

        assert!(store.get_entry(entry.id).await.unwrap().is_some());
        assert_eq!(alice(&store).await.entry_ids(), &[entry.id]);
    }

    #[tokio::test]
    async fn test_delete_for_unknown_account_is_not_found() {
        let (service, _store) = setup().await;
        let err = service.delete_entry(Uuid::new_v4(), "bob").await.unwrap_err();
        assert!(matches!(err, JournalError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_reports_inconsistency_when_record_delete_fails() {
        let (service, store) = setup().await;
        let entry = service.create_entry(day_one(), "alice").await.unwrap();
        store.fail_entry_delete.store(true, Ordering::SeqCst);

        let err = service.delete_entry(entry.id, "alice").await.unwrap_err();

        assert!(err.is_inconsistent());
        // Dangling record, never a dangling reference.
        assert!(alice(&store).await.entry_ids().is_empty());
        assert!(store.get_entry(entry.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_record() {
        let (service, store) = setup().await;
        let entry = service.create_entry(day_one(), "alice").await.unwrap();
        store.inner.delete_entry(entry.id).await.unwrap();

        assert!(service.delete_entry(entry.id, "alice").await.unwrap());
        assert!(alice(&store).await.entry_ids().is_empty());
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_entries_then_account() {
        let (service, store) = setup().await;
        let mut ids = Vec::new();
        for title in ["Day 1", "Day 2", "Day 3"] {
            ids.push(
                service
                    .create_entry(EntryDraft::new(title), "alice")
                    .await
                    .unwrap()
                    .id,
            );
        }

        service.delete_account("alice").await.unwrap();

        for id in ids {
            assert!(store.get_entry(id).await.unwrap().is_none());
        }
        assert!(store.get_account("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cascade_delete_drains_entries_created_meanwhile() {
        let (service, store) = setup().await;
        service.create_entry(day_one(), "alice").await.unwrap();
        *store.late_entry_for.lock().unwrap() = Some("alice".to_string());

        service.delete_account("alice").await.unwrap();

        assert!(store.get_account("alice").await.unwrap().is_none());
        assert_eq!(store.inner.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_cascade_delete_keeps_consistent_list_on_failure() {
        let (service, store) = setup().await;
        service.create_entry(day_one(), "alice").await.unwrap();
        service
            .create_entry(EntryDraft::new("Day 2"), "alice")
            .await
            .unwrap();
        store.fail_entry_delete.store(true, Ordering::SeqCst);

        let err = service.delete_account("alice").await.unwrap_err();

        assert!(err.is_inconsistent());
        let account = alice(&store).await;
        assert_eq!(account.entry_ids().len(), 1);
        for id in account.entry_ids() {
            assert!(store.get_entry(*id).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_cascade_delete_refuses_admin() {
        let (service, store) = setup().await;
        store
            .create_account(
                &Account::new("admin", "admin@example.com").with_roles(vec![Role::Admin]),
            )
            .await
            .unwrap();

        let err = service.delete_account("admin").await.unwrap_err();

        assert!(matches!(err, JournalError::Forbidden(_)));
        assert!(store.get_account("admin").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_entry_requires_ownership() {
        let (service, store) = setup().await;
        store
            .create_account(&Account::new("bob", "bob@example.com"))
            .await
            .unwrap();
        let entry = service.create_entry(day_one(), "alice").await.unwrap();

        let fetched = service.get_entry(entry.id, "alice").await.unwrap();
        assert_eq!(fetched, entry);

        let err = service.get_entry(entry.id, "bob").await.unwrap_err();
        assert!(matches!(err, JournalError::NotFound { entity_type: "JournalEntry", .. }));
    }

    #[tokio::test]
    async fn test_list_entries_follows_reference_order() {
        let (service, _store) = setup().await;
        let mut created = Vec::new();
        for title in ["First", "Second", "Third"] {
            created.push(
                service
                    .create_entry(EntryDraft::new(title), "alice")
                    .await
                    .unwrap(),
            );
        }

        let listed = service.list_entries("alice").await.unwrap();

        assert_eq!(listed, created);
    }

    #[tokio::test]
    async fn test_update_entry_changes_title_only_when_given() {
        let (service, store) = setup().await;
        let entry = service.create_entry(day_one(), "alice").await.unwrap();

        let update = UpdateEntryRequest {
            title: Some("Day one, revisited".to_string()),
            content: Some(String::new()),
        };
        let updated = service.update_entry(entry.id, "alice", &update).await.unwrap();

        assert_eq!(updated.title, "Day one, revisited");
        assert_eq!(updated.content.as_deref(), Some("ok"));
        assert_eq!(updated.created_at, entry.created_at);
        assert_eq!(store.get_entry(entry.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn test_concurrent_creates_lose_no_references() {
        let (service, store) = setup().await;

        let tasks = (0..25).map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_entry(EntryDraft::new(format!("Entry {i}")), "alice")
                    .await
            })
        });
        let created: HashSet<Uuid> = futures_util::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap().id)
            .collect();

        let referenced: HashSet<Uuid> = alice(&store).await.entry_ids().iter().copied().collect();
        assert_eq!(created.len(), 25);
        assert_eq!(referenced, created);
    }
}
