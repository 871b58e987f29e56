//! Periodic sentiment digest.
//!
//! For every account that opted in and has a usable email address, finds the
//! most frequent sentiment among its entries of the last week and mails it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use journalsync_core::journal::{dominant_sentiment, sentiment_candidates, Account};
use journalsync_core::storage::{AccountRepository, EntryRepository, RepositoryError};

use super::mail::{Mail, MailError, Mailer};

pub const DIGEST_SUBJECT: &str = "Sentiment for last 7 days";

/// Outcome of one digest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DigestReport {
    /// Accounts that opted in with a valid email.
    pub considered: usize,
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug, thiserror::Error)]
enum DigestError {
    #[error(transparent)]
    Store(#[from] RepositoryError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

pub struct SentimentDigestJob {
    accounts: Arc<dyn AccountRepository>,
    entries: Arc<dyn EntryRepository>,
    mailer: Arc<dyn Mailer>,
    window: chrono::Duration,
}

impl SentimentDigestJob {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        entries: Arc<dyn EntryRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            accounts,
            entries,
            mailer,
            window: chrono::Duration::days(7),
        }
    }

    /// Runs one digest pass as of `now`.
    ///
    /// A failure for one account is logged and counted; the run carries on
    /// with the next one. Only failing to list accounts aborts the run.
    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<DigestReport, RepositoryError> {
        let accounts = self.accounts.list_accounts().await?;
        let since = now - self.window;
        let mut report = DigestReport::default();

        for account in sentiment_candidates(&accounts) {
            report.considered += 1;
            match self.digest_account(account, since).await {
                Ok(true) => report.sent += 1,
                Ok(false) => {}
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(username = %account.username, error = %err, "Sentiment digest failed");
                }
            }
        }

        tracing::info!(
            considered = report.considered,
            sent = report.sent,
            failed = report.failed,
            "Sentiment digest run finished"
        );
        Ok(report)
    }

    /// Returns whether a mail went out; accounts with no recent sentiment get none.
    async fn digest_account(
        &self,
        account: &Account,
        since: DateTime<Utc>,
    ) -> Result<bool, DigestError> {
        let entries = self.entries.get_entries(account.entry_ids()).await?;
        let Some(sentiment) = dominant_sentiment(&entries, since) else {
            tracing::debug!(username = %account.username, "No recent sentiment, skipping digest");
            return Ok(false);
        };

        let mail = Mail::new(&account.email, DIGEST_SUBJECT, sentiment.as_str());
        self.mailer.send_mail(&mail).await?;
        Ok(true)
    }

    /// Runs the digest every `every` until a shutdown signal arrives.
    ///
    /// The first run happens one full period after start.
    pub fn spawn(
        self: Arc<Self>,
        every: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = self.run_once(Utc::now()).await {
                            tracing::error!(error = %err, "Sentiment digest run aborted");
                        }
                    }
                    _ = shutdown.recv() => {
                        tracing::info!("Sentiment digest job stopping");
                        break;
                    }
                }
            }
        })
    }
}
