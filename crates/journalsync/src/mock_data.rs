use chrono::Utc;

use journalsync_core::journal::{Account, EntryDraft, JournalError, Role, Sentiment};
use journalsync_core::storage::{AccountRepository, RepositoryError};

use crate::services::JournalService;

/// Demo entries for the `alice` account.
fn demo_entries() -> Vec<EntryDraft> {
    vec![
        EntryDraft::new("First day back")
            .with_content("Coffee, a long walk and an early night.")
            .with_sentiment(Sentiment::Happy),
        EntryDraft::new("Deadline week")
            .with_content("Three reviews and a release on Friday.")
            .with_sentiment(Sentiment::Anxious),
        EntryDraft::new("Rainy Sunday"),
    ]
}

/// Creates `account` unless the username is taken. Returns whether it was created.
async fn create_if_missing(
    accounts: &dyn AccountRepository,
    account: &Account,
) -> Result<bool, RepositoryError> {
    match accounts.create_account(account).await {
        Ok(()) => Ok(true),
        Err(RepositoryError::AlreadyExists { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Seeds an administrator and a demo user with a few entries.
///
/// Accounts that already exist are left untouched, so seeding a persistent
/// store twice is harmless.
pub async fn seed_demo_accounts(
    accounts: &dyn AccountRepository,
    journal: &JournalService,
) -> Result<(), JournalError> {
    let admin = Account::new("admin", "admin@journalsync.local")
        .with_roles(vec![Role::User, Role::Admin]);
    if create_if_missing(accounts, &admin).await? {
        tracing::info!(username = %admin.username, "Seeded admin account");
    }

    let alice = Account::new("alice", "alice@example.com").with_sentiment_analysis(true);
    if create_if_missing(accounts, &alice).await? {
        for draft in demo_entries() {
            journal.create_entry(draft, &alice.username).await?;
        }
        tracing::info!(
            username = %alice.username,
            at = %Utc::now(),
            "Seeded demo account with entries"
        );
    }

    Ok(())
}
