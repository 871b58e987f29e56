//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use journalsync_core::journal::{Account, JournalEntry, Role, Sentiment};

/// Convert a SQLite row to a JournalEntry.
///
/// Expected columns: id, title, content, created_at, sentiment
pub fn row_to_entry(row: &Row) -> rusqlite::Result<JournalEntry> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let content: Option<String> = row.get(2)?;
    let created_at: String = row.get(3)?;
    let sentiment: Option<String> = row.get(4)?;

    Ok(JournalEntry {
        id: parse_uuid(&id)?,
        title,
        content,
        created_at: parse_datetime(&created_at)?,
        sentiment: sentiment.as_deref().map(parse_sentiment).transpose()?,
    })
}

/// Convert a SQLite row to an Account without its entry references.
///
/// Expected columns: id, username, email, password_hash, roles, sentiment_analysis
pub fn row_to_account(row: &Row) -> rusqlite::Result<Account> {
    let id: String = row.get(0)?;
    let username: String = row.get(1)?;
    let email: String = row.get(2)?;
    let password_hash: String = row.get(3)?;
    let roles: String = row.get(4)?;
    let sentiment_analysis: bool = row.get(5)?;

    Ok(Account::new(username, email)
        .with_id(parse_uuid(&id)?)
        .with_password_hash(password_hash)
        .with_roles(parse_roles(&roles)?)
        .with_sentiment_analysis(sentiment_analysis))
}

/// Roles as a comma-separated column value, e.g. `USER,ADMIN`.
pub fn roles_to_string(roles: &[Role]) -> String {
    roles.iter().map(Role::as_str).collect::<Vec<_>>().join(",")
}

/// Format a DateTime for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

fn parse_sentiment(s: &str) -> rusqlite::Result<Sentiment> {
    s.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into())
    })
}

fn parse_roles(s: &str) -> rusqlite::Result<Vec<Role>> {
    s.split(',')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into())
            })
        })
        .collect()
}
