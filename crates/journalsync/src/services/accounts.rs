//! Account profile operations: sign-up, admin creation, profile edits and
//! mail sent on an account's behalf.
//!
//! None of these touch the entry reference list; that stays with
//! [`JournalService`](super::JournalService).

use std::sync::Arc;

use thiserror::Error;

use journalsync_core::journal::{
    apply_profile_update, new_account, Account, CreateAccountRequest, JournalError, Role,
    SendMailRequest, UpdateProfileRequest,
};
use journalsync_core::storage::AccountRepository;

use super::mail::{Mail, MailError, Mailer};

type Result<T> = std::result::Result<T, JournalError>;

/// Failure of [`AccountService::send_mail`].
#[derive(Debug, Error)]
pub enum SendMailError {
    #[error(transparent)]
    Account(#[from] JournalError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    mailer: Arc<dyn Mailer>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self { accounts, mailer }
    }

    async fn require_account(&self, username: &str) -> Result<Account> {
        self.accounts
            .get_account(username)
            .await?
            .ok_or_else(|| JournalError::account_not_found(username))
    }

    /// Registers a regular user.
    pub async fn sign_up(&self, request: &CreateAccountRequest) -> Result<Account> {
        self.create_with_roles(request, vec![Role::User]).await
    }

    /// Creates an administrator account.
    pub async fn create_admin(&self, request: &CreateAccountRequest) -> Result<Account> {
        let account = self.create_with_roles(request, vec![Role::Admin]).await?;
        tracing::info!(username = %account.username, "Admin account created");
        Ok(account)
    }

    async fn create_with_roles(
        &self,
        request: &CreateAccountRequest,
        roles: Vec<Role>,
    ) -> Result<Account> {
        let account = new_account(request, roles)?;
        self.accounts.create_account(&account).await?;
        tracing::debug!(username = %account.username, "Account created");
        Ok(account)
    }

    /// Updates email, password and the sentiment digest opt-in of `username`.
    pub async fn update_profile(
        &self,
        username: &str,
        update: &UpdateProfileRequest,
    ) -> Result<Account> {
        let current = self.require_account(username).await?;
        let updated = apply_profile_update(&current, update)?;
        self.accounts.update_account(&updated).await?;
        tracing::debug!(
            username,
            sentiment_analysis = updated.sentiment_analysis,
            "Profile updated"
        );
        Ok(updated)
    }

    /// Sends mail from `username`; replies go to the account's address.
    pub async fn send_mail(
        &self,
        username: &str,
        request: &SendMailRequest,
    ) -> std::result::Result<(), SendMailError> {
        let account = self.require_account(username).await?;
        let mail = Mail::new(&request.to, &request.subject, &request.body)
            .with_reply_to(&account.email);
        self.mailer.send_mail(&mail).await?;
        Ok(())
    }
}
