//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Accounts table
CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    roles TEXT NOT NULL,
    sentiment_analysis INTEGER NOT NULL DEFAULT 0
);

-- Journal entries table
CREATE TABLE IF NOT EXISTS entries (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    content TEXT,
    created_at TEXT NOT NULL,
    sentiment TEXT
);

-- Ordered entry references; entry_id as primary key keeps each entry on one account
CREATE TABLE IF NOT EXISTS account_entries (
    entry_id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
);

-- Static lookup templates loaded by the config cache
CREATE TABLE IF NOT EXISTS app_config (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_account_entries_account ON account_entries(account_id, position);
"#;

// Entry queries
pub const INSERT_ENTRY: &str = r#"
INSERT INTO entries (id, title, content, created_at, sentiment)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_ENTRY_BY_ID: &str = r#"
SELECT id, title, content, created_at, sentiment
FROM entries
WHERE id = ?1
"#;

pub const UPDATE_ENTRY: &str = r#"
UPDATE entries
SET title = ?2, content = ?3, sentiment = ?4
WHERE id = ?1
"#;

pub const DELETE_ENTRY: &str = r#"
DELETE FROM entries
WHERE id = ?1
"#;

// Account queries
pub const INSERT_ACCOUNT: &str = r#"
INSERT INTO accounts (id, username, email, password_hash, roles, sentiment_analysis)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_ACCOUNT_BY_USERNAME: &str = r#"
SELECT id, username, email, password_hash, roles, sentiment_analysis
FROM accounts
WHERE username = ?1
"#;

pub const SELECT_ALL_ACCOUNTS: &str = r#"
SELECT id, username, email, password_hash, roles, sentiment_analysis
FROM accounts
ORDER BY username ASC
"#;

pub const UPDATE_ACCOUNT: &str = r#"
UPDATE accounts
SET email = ?2, password_hash = ?3, roles = ?4, sentiment_analysis = ?5
WHERE username = ?1
"#;

/// Removes the account only while no entry references point at it.
pub const DELETE_ACCOUNT: &str = r#"
DELETE FROM accounts
WHERE username = ?1
  AND NOT EXISTS (SELECT 1 FROM account_entries ae WHERE ae.account_id = accounts.id)
"#;

// Entry reference queries
pub const SELECT_ENTRY_REFS: &str = r#"
SELECT entry_id
FROM account_entries
WHERE account_id = ?1
ORDER BY position ASC
"#;

/// Appends in one statement; zero affected rows means the account is missing.
pub const PUSH_ENTRY_REF: &str = r#"
INSERT INTO account_entries (entry_id, account_id, position)
SELECT ?2, a.id, COALESCE((SELECT MAX(ae.position) FROM account_entries ae WHERE ae.account_id = a.id), 0) + 1
FROM accounts a
WHERE a.username = ?1
"#;

pub const PULL_ENTRY_REF: &str = r#"
DELETE FROM account_entries
WHERE entry_id = ?2
  AND account_id = (SELECT id FROM accounts WHERE username = ?1)
"#;

// Config queries
pub const SELECT_ALL_CONFIG: &str = r#"
SELECT key, value
FROM app_config
"#;

pub const UPSERT_CONFIG: &str = r#"
INSERT INTO app_config (key, value)
VALUES (?1, ?2)
ON CONFLICT(key) DO UPDATE SET value = excluded.value
"#;
