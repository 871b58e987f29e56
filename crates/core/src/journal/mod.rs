mod error;
mod operations;
mod requests;
mod types;

pub use error::{journal_error_to_status_code, AccountError, EntryError, JournalError};
pub use operations::{
    apply_entry_update, apply_profile_update, dominant_sentiment, is_valid_email, new_account,
    sentiment_candidates, validate_entry_draft, CONTENT_MAX_CHARS, TITLE_MAX_CHARS,
    TITLE_MIN_CHARS,
};
pub use requests::{
    CreateAccountRequest, CreateEntryRequest, SendMailRequest, UpdateEntryRequest,
    UpdateProfileRequest,
};
pub use types::{
    Account, AccountSummary, EntryDraft, JournalEntry, NewEntry, Role, Sentiment,
};
