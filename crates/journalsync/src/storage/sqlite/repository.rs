//! SQLite repository implementation.
//!
//! Implements the repository traits from `journalsync_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use journalsync_core::journal::{Account, JournalEntry, NewEntry};
use journalsync_core::lookup::{self, ConfigError, ConfigSource};
use journalsync_core::storage::{AccountRepository, EntryRepository, RepositoryError, Result};

use super::conversions::{format_datetime, parse_uuid, roles_to_string, row_to_account, row_to_entry};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Loads the ordered reference list of one account.
fn load_entry_refs(conn: &rusqlite::Connection, account_id: &str) -> rusqlite::Result<Vec<Uuid>> {
    let mut stmt = conn.prepare(schema::SELECT_ENTRY_REFS)?;
    let rows = stmt.query_map([account_id], |row| row.get::<_, String>(0))?;
    let mut ids = Vec::new();
    for row in rows {
        ids.push(parse_uuid(&row?)?);
    }
    Ok(ids)
}

fn with_entry_refs(conn: &rusqlite::Connection, account: Account) -> rusqlite::Result<Account> {
    let ids = load_entry_refs(conn, &account.id.to_string())?;
    Ok(account.with_entry_ids(ids))
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for entries, accounts and
/// application config. All statements run on the single connection thread
/// owned by `tokio_rusqlite`.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Inserts or replaces an application config value.
    pub async fn put_config(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        let key_id = key.clone();

        self.conn
            .call(move |conn| {
                conn.execute(schema::UPSERT_CONFIG, [&key, &value])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ConfigEntry", key_id))
    }
}

// ============================================================================
// EntryRepository implementation
// ============================================================================

#[async_trait]
impl EntryRepository for SqliteRepository {
    async fn get_entry(&self, id: Uuid) -> Result<Option<JournalEntry>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_ENTRY_BY_ID, [&id_str], row_to_entry)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JournalEntry", id.to_string()))
    }

    async fn get_entries(&self, ids: &[Uuid]) -> Result<Vec<JournalEntry>> {
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_ENTRY_BY_ID).map_err(wrap_err)?;
                let mut entries = Vec::with_capacity(ids.len());
                for id in &ids {
                    if let Some(entry) = stmt
                        .query_row([id], row_to_entry)
                        .optional()
                        .map_err(wrap_err)?
                    {
                        entries.push(entry);
                    }
                }
                Ok(entries)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JournalEntry", ""))
    }

    async fn create_entry(&self, entry: &NewEntry) -> Result<JournalEntry> {
        let persisted = entry.clone().into_entry(Uuid::new_v4());
        let id = persisted.id.to_string();
        let title = persisted.title.clone();
        let content = persisted.content.clone();
        let created_at = format_datetime(&persisted.created_at);
        let sentiment = persisted.sentiment.map(|s| s.as_str().to_string());
        let entry_id = id.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_ENTRY,
                    rusqlite::params![id, title, content, created_at, sentiment],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JournalEntry", entry_id))?;

        Ok(persisted)
    }

    async fn update_entry(&self, entry: &JournalEntry) -> Result<()> {
        let id = entry.id.to_string();
        let title = entry.title.clone();
        let content = entry.content.clone();
        let sentiment = entry.sentiment.map(|s| s.as_str().to_string());
        let entry_id = id.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_ENTRY,
                        rusqlite::params![id, title, content, sentiment],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JournalEntry", entry_id))
    }

    async fn delete_entry(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_ENTRY, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "JournalEntry", id.to_string()))
    }
}

// ============================================================================
// AccountRepository implementation
// ============================================================================

#[async_trait]
impl AccountRepository for SqliteRepository {
    async fn get_account(&self, username: &str) -> Result<Option<Account>> {
        let name = username.to_string();

        self.conn
            .call(move |conn| {
                let account = conn
                    .query_row(schema::SELECT_ACCOUNT_BY_USERNAME, [&name], row_to_account)
                    .optional()
                    .map_err(wrap_err)?;
                account
                    .map(|a| with_entry_refs(conn, a))
                    .transpose()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Account", username))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_ACCOUNTS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_account).map_err(wrap_err)?;

                let mut accounts = Vec::new();
                for row_result in rows {
                    let account = row_result.map_err(wrap_err)?;
                    accounts.push(with_entry_refs(conn, account).map_err(wrap_err)?);
                }
                Ok(accounts)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_account(&self, account: &Account) -> Result<()> {
        let id = account.id.to_string();
        let username = account.username.clone();
        let email = account.email.clone();
        let password_hash = account.password_hash.clone();
        let roles = roles_to_string(&account.roles);
        let sentiment_analysis = account.sentiment_analysis;
        let name = username.clone();

        if !account.entry_ids().is_empty() {
            return Err(RepositoryError::InvalidData(format!(
                "account {name} must be created without entry references"
            )));
        }

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_ACCOUNT,
                    rusqlite::params![id, username, email, password_hash, roles, sentiment_analysis],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Account", name))
    }

    async fn update_account(&self, account: &Account) -> Result<()> {
        let username = account.username.clone();
        let email = account.email.clone();
        let password_hash = account.password_hash.clone();
        let roles = roles_to_string(&account.roles);
        let sentiment_analysis = account.sentiment_analysis;
        let name = username.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_ACCOUNT,
                        rusqlite::params![username, email, password_hash, roles, sentiment_analysis],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Account", name))
    }

    async fn push_entry_ref(&self, username: &str, entry_id: Uuid) -> Result<()> {
        let name = username.to_string();
        let id = entry_id.to_string();

        let pushed = self
            .conn
            .call(move |conn| {
                conn.execute(schema::PUSH_ENTRY_REF, [&name, &id])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "EntryReference", entry_id.to_string()))?;

        if pushed == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Account",
                id: username.to_string(),
            });
        }
        Ok(())
    }

    async fn pull_entry_ref(&self, username: &str, entry_id: Uuid) -> Result<bool> {
        let name = username.to_string();
        let id = entry_id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_ACCOUNT_BY_USERNAME, [&name], |_| Ok(()))
                    .map_err(wrap_err)?;
                let removed = conn
                    .execute(schema::PULL_ENTRY_REF, [&name, &id])
                    .map_err(wrap_err)?;
                Ok(removed > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Account", username))
    }

    async fn delete_account(&self, username: &str) -> Result<bool> {
        let name = username.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_ACCOUNT, [&name])
                    .map_err(wrap_err)?;
                if rows > 0 {
                    return Ok(true);
                }
                // Nothing deleted: either the account is missing or it still has references.
                conn.query_row(schema::SELECT_ACCOUNT_BY_USERNAME, [&name], |_| Ok(()))
                    .map_err(wrap_err)?;
                Ok(false)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Account", username))
    }
}

// ============================================================================
// ConfigSource implementation
// ============================================================================

#[async_trait]
impl ConfigSource for SqliteRepository {
    async fn load_config(&self) -> lookup::Result<Vec<(String, String)>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_CONFIG).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
                    .map_err(wrap_err)?;

                let mut pairs = Vec::new();
                for row_result in rows {
                    pairs.push(row_result.map_err(wrap_err)?);
                }
                Ok(pairs)
            })
            .await
            .map_err(|e| ConfigError::SourceFailed(e.to_string()))
    }
}
