use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentiment classification attached to an entry by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Happy,
    Sad,
    Angry,
    Anxious,
}

impl Sentiment {
    /// All variants in declaration order.
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Happy,
        Sentiment::Sad,
        Sentiment::Angry,
        Sentiment::Anxious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Happy => "HAPPY",
            Sentiment::Sad => "SAD",
            Sentiment::Angry => "ANGRY",
            Sentiment::Anxious => "ANXIOUS",
        }
    }
}

impl std::str::FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HAPPY" => Ok(Sentiment::Happy),
            "SAD" => Ok(Sentiment::Sad),
            "ANGRY" => Ok(Sentiment::Angry),
            "ANXIOUS" => Ok(Sentiment::Anxious),
            other => Err(format!("Unknown sentiment: {other}")),
        }
    }
}

/// A persisted journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    /// Set once when the entry is created, never changed afterwards.
    pub created_at: DateTime<Utc>,
    pub sentiment: Option<Sentiment>,
}

/// Caller-supplied entry fields, before the server stamps anything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryDraft {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
            sentiment: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Stamps the creation time, producing an entry ready to be persisted.
    pub fn stamp(self, created_at: DateTime<Utc>) -> NewEntry {
        NewEntry {
            title: self.title,
            content: self.content,
            created_at,
            sentiment: self.sentiment,
        }
    }
}

/// An entry that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sentiment: Option<Sentiment>,
}

impl NewEntry {
    /// Attaches the identity assigned by the store.
    pub fn into_entry(self, id: Uuid) -> JournalEntry {
        JournalEntry {
            id,
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            sentiment: self.sentiment,
        }
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// A user account together with its ordered list of entry references.
///
/// The reference list says which entries belong to the account; the entry
/// records themselves live in the entry store. The list can be read here but
/// is only ever changed through the account store's atomic push/pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub sentiment_analysis: bool,
    entry_ids: Vec<Uuid>,
}

impl Account {
    /// Creates a regular user account with an empty entry list.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: String::new(),
            roles: vec![Role::User],
            sentiment_analysis: false,
            entry_ids: Vec::new(),
        }
    }

    /// Sets a specific ID for this account (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_sentiment_analysis(mut self, enabled: bool) -> Self {
        self.sentiment_analysis = enabled;
        self
    }

    /// Restores the reference list when loading an account from storage.
    pub fn with_entry_ids(mut self, entry_ids: Vec<Uuid>) -> Self {
        self.entry_ids = entry_ids;
        self
    }

    /// The entry references, in insertion order.
    pub fn entry_ids(&self) -> &[Uuid] {
        &self.entry_ids
    }

    pub fn owns_entry(&self, entry_id: Uuid) -> bool {
        self.entry_ids.contains(&entry_id)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Projection without credentials or entry references.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            sentiment_analysis: self.sentiment_analysis,
            roles: self.roles.clone(),
        }
    }
}

/// Public view of an account, as listed to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub sentiment_analysis: bool,
    pub roles: Vec<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_account_is_plain_user() {
        let account = Account::new("alice", "alice@example.com");
        assert_eq!(account.roles, vec![Role::User]);
        assert!(!account.is_admin());
        assert!(account.entry_ids().is_empty());
    }

    #[test]
    fn test_owns_entry() {
        let id = Uuid::new_v4();
        let account = Account::new("alice", "alice@example.com").with_entry_ids(vec![id]);
        assert!(account.owns_entry(id));
        assert!(!account.owns_entry(Uuid::new_v4()));
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let account = Account::new("alice", "alice@example.com").with_password_hash("secret");
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_draft_stamp_keeps_fields() {
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let new_entry = EntryDraft::new("Day 1")
            .with_content("ok")
            .with_sentiment(Sentiment::Happy)
            .stamp(at);
        let id = Uuid::new_v4();
        let entry = new_entry.into_entry(id);

        assert_eq!(entry.id, id);
        assert_eq!(entry.title, "Day 1");
        assert_eq!(entry.content.as_deref(), Some("ok"));
        assert_eq!(entry.created_at, at);
        assert_eq!(entry.sentiment, Some(Sentiment::Happy));
    }

    #[test]
    fn test_sentiment_string_roundtrip() {
        for sentiment in Sentiment::ALL {
            assert_eq!(sentiment.as_str().parse::<Sentiment>(), Ok(sentiment));
        }
        assert!("MEH".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_role_serializes_uppercase() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");
    }
}
