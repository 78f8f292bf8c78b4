//! Deadline sweep planning.
//!
//! [`DeadlineSweeper::plan`] walks the overdue candidates one at a time,
//! messages each owner and records which books may move to `insulted`.
//! It never writes to the store; the caller applies the returned transitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_notifications::MessagingProvider;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::insults::InsultPool;
use crate::models::{Book, BookStatus};

#[derive(Debug, Error)]
#[error("recipient lookup failed: {0}")]
pub struct RecipientLookupError(pub String);

/// Resolves the messaging address of a book's owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipientLookup: Send + Sync {
    /// `Ok(None)` when the user has no known address.
    async fn recipient_for(&self, user_id: Uuid) -> Result<Option<String>, RecipientLookupError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub book_id: Uuid,
    pub from: BookStatus,
    pub to: BookStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoRecipient,
    LookupFailed(String),
    DeliveryFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBook {
    pub book_id: Uuid,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepPlan {
    /// Candidates that passed the eligibility check
    pub considered: usize,
    pub transitions: Vec<StatusTransition>,
    pub skipped: Vec<SkippedBook>,
}

pub struct DeadlineSweeper {
    lookup: Arc<dyn RecipientLookup>,
    messenger: Arc<dyn MessagingProvider>,
    insults: InsultPool,
    seed: Option<u64>,
}

impl DeadlineSweeper {
    pub fn new(lookup: Arc<dyn RecipientLookup>, messenger: Arc<dyn MessagingProvider>) -> Self {
        Self {
            lookup,
            messenger,
            insults: InsultPool::default(),
            seed: None,
        }
    }

    /// Every plan draws messages from a generator seeded with `seed`.
    #[doc(hidden)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub async fn plan(&self, candidates: Vec<Book>, now: DateTime<Utc>) -> SweepPlan {
        let mut rng = self.rng();
        self.plan_with_rng(candidates, now, &mut rng).await
    }

    pub async fn plan_with_rng<G: Rng + Send>(
        &self,
        candidates: Vec<Book>,
        now: DateTime<Utc>,
        rng: &mut G,
    ) -> SweepPlan {
        let mut plan = SweepPlan::default();

        for book in candidates.into_iter().filter(|b| b.is_overdue(now)) {
            plan.considered += 1;
            let message = self.insults.pick(rng, &book);

            match self.notify(&book, &message).await {
                Ok(()) => plan.transitions.push(StatusTransition {
                    book_id: book.id,
                    from: book.status,
                    to: BookStatus::Insulted,
                }),
                Err(reason) => {
                    warn!(
                        book_id = %book.id,
                        user_id = %book.user_id,
                        reason = ?reason,
                        "Skipping overdue book"
                    );
                    plan.skipped.push(SkippedBook {
                        book_id: book.id,
                        reason,
                    });
                }
            }
        }

        plan
    }

    async fn notify(&self, book: &Book, message: &str) -> Result<(), SkipReason> {
        let recipient = self
            .lookup
            .recipient_for(book.user_id)
            .await
            .map_err(|e| SkipReason::LookupFailed(e.to_string()))?
            .ok_or(SkipReason::NoRecipient)?;

        self.messenger
            .push_text(&recipient, message)
            .await
            .map_err(|e| SkipReason::DeliveryFailed(e.to_string()))?;

        debug!(
            book_id = %book.id,
            provider = self.messenger.name(),
            "Sent deadline message"
        );
        Ok(())
    }
}
