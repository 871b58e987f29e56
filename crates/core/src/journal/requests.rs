use serde::{Deserialize, Serialize};

use super::types::{EntryDraft, Sentiment};

/// Request body for creating an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

impl CreateEntryRequest {
    pub fn into_draft(self) -> EntryDraft {
        EntryDraft {
            title: self.title,
            content: self.content,
            sentiment: self.sentiment,
        }
    }
}

/// Request body for updating an entry in place.
///
/// Absent or empty fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Sign-up body, also used by administrators to create another admin.
///
/// `password` is an opaque credential; it is stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub sentiment_analysis: bool,
}

/// Profile update for the calling account.
///
/// Empty email or password keep the stored value. The sentiment opt-in is
/// always overwritten. Username and roles cannot be changed here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub sentiment_analysis: bool,
}

/// Mail an account sends on its own behalf; replies go to the account email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
}
