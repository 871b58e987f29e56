use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::error::{AccountError, EntryError};
use super::requests::{CreateAccountRequest, UpdateEntryRequest, UpdateProfileRequest};
use super::types::{Account, EntryDraft, JournalEntry, Role, Sentiment};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MAX_CHARS: usize = 5000;

/// Validates caller-supplied entry fields before creation.
pub fn validate_entry_draft(draft: &EntryDraft) -> Result<(), EntryError> {
    validate_title(&draft.title)?;
    validate_content(draft.content.as_deref())
}

fn validate_title(title: &str) -> Result<(), EntryError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(EntryError::BlankTitle);
    }
    let len = trimmed.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        return Err(EntryError::TitleLength);
    }
    Ok(())
}

fn validate_content(content: Option<&str>) -> Result<(), EntryError> {
    match content {
        Some(c) if c.chars().count() > CONTENT_MAX_CHARS => Err(EntryError::ContentTooLong),
        _ => Ok(()),
    }
}

/// Applies an in-place update to an entry.
///
/// Only title and content change, and only when the new value is present and
/// non-empty. The creation time and sentiment are left alone.
pub fn apply_entry_update(
    entry: &JournalEntry,
    update: &UpdateEntryRequest,
) -> Result<JournalEntry, EntryError> {
    let mut updated = entry.clone();

    if let Some(title) = update.title.as_deref().filter(|t| !t.is_empty()) {
        validate_title(title)?;
        updated.title = title.to_string();
    }
    if let Some(content) = update.content.as_deref().filter(|c| !c.is_empty()) {
        validate_content(Some(content))?;
        updated.content = Some(content.to_string());
    }

    Ok(updated)
}

/// Loose email shape check: something, `@`, something, `.`, something.
pub fn is_valid_email(email: &str) -> bool {
    email.char_indices().any(|(at, c)| {
        if c != '@' || at == 0 {
            return false;
        }
        let domain = &email[at + 1..];
        domain
            .char_indices()
            .any(|(dot, d)| d == '.' && dot > 0 && dot + 1 < domain.len())
    })
}

/// Builds a new account with `roles` and an empty reference list.
pub fn new_account(request: &CreateAccountRequest, roles: Vec<Role>) -> Result<Account, AccountError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(AccountError::BlankUsername);
    }
    if !is_valid_email(&request.email) {
        return Err(AccountError::InvalidEmail(request.email.clone()));
    }
    Ok(Account::new(username, request.email.clone())
        .with_password_hash(request.password.clone())
        .with_roles(roles)
        .with_sentiment_analysis(request.sentiment_analysis))
}

/// Applies a profile update. Roles, username and entry references stay as they are.
pub fn apply_profile_update(
    account: &Account,
    update: &UpdateProfileRequest,
) -> Result<Account, AccountError> {
    let mut updated = account.clone();

    if let Some(email) = update.email.as_deref().filter(|e| !e.is_empty()) {
        if !is_valid_email(email) {
            return Err(AccountError::InvalidEmail(email.to_string()));
        }
        updated.email = email.to_string();
    }
    if let Some(password) = update.password.as_deref().filter(|p| !p.is_empty()) {
        updated.password_hash = password.to_string();
    }
    updated.sentiment_analysis = update.sentiment_analysis;

    Ok(updated)
}

/// Accounts that opted into sentiment analysis and have a usable email.
pub fn sentiment_candidates(accounts: &[Account]) -> Vec<&Account> {
    accounts
        .iter()
        .filter(|a| a.sentiment_analysis && is_valid_email(&a.email))
        .collect()
}

/// Most frequent sentiment among entries created at or after `since`.
///
/// Ties go to the sentiment declared first. Returns `None` when no entry in
/// the window carries a sentiment.
pub fn dominant_sentiment<'a, I>(entries: I, since: DateTime<Utc>) -> Option<Sentiment>
where
    I: IntoIterator<Item = &'a JournalEntry>,
{
    let mut counts: BTreeMap<Sentiment, usize> = BTreeMap::new();
    for entry in entries {
        if entry.created_at < since {
            continue;
        }
        if let Some(sentiment) = entry.sentiment {
            *counts.entry(sentiment).or_default() += 1;
        }
    }

    let mut best: Option<(Sentiment, usize)> = None;
    for (sentiment, count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((sentiment, count));
        }
    }
    best.map(|(sentiment, _)| sentiment)
}
