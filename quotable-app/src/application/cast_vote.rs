use crate::application::store::{StoreError, VoteStore};
use crate::domain::{transition, RecordAction, VoteDirection, VoteOutcome};
use quotable_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Attempts per cast before the conflict is surfaced to the caller.
const MAX_VOTE_ATTEMPTS: u32 = 3;

/// Vote aggregation service.
///
/// Runs the read-decide-apply sequence against the store: load the voter's
/// current vote, run the transition table, and hand the resulting record
/// mutation plus karma delta to [`VoteStore::apply`] as one atomic unit.
/// A conflicted apply restarts the sequence from the read, bounded by
/// `MAX_VOTE_ATTEMPTS`.
pub struct CastVote {
    store: Arc<dyn VoteStore>,
}

impl CastVote {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        voter_id: Uuid,
        quote_id: Uuid,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, AppError> {
        for attempt in 1..=MAX_VOTE_ATTEMPTS {
            let quote = self
                .store
                .quote(quote_id)
                .await?
                .ok_or(AppError::QuoteNotFound)?;

            // The authorization gate rejects self-votes before we are
            // reached; re-check so a misrouted call cannot slip through.
            if quote.author_id == voter_id {
                return Err(AppError::OwnQuote);
            }

            let current = self.store.vote(voter_id, quote_id).await?;
            let decision = transition(current, direction);

            match self
                .store
                .apply(voter_id, quote_id, current, &decision)
                .await
            {
                Ok(karma) => {
                    let vote = match decision.action {
                        RecordAction::Create { value } | RecordAction::Flip { value } => {
                            Some(VoteDirection::from_value(value))
                        }
                        RecordAction::Remove => None,
                    };
                    return Ok(VoteOutcome {
                        quote_id,
                        karma,
                        vote,
                    });
                }
                Err(StoreError::Conflict) => {
                    tracing::debug!(
                        "vote on quote {} conflicted (attempt {}), retrying",
                        quote_id,
                        attempt
                    );
                    continue;
                }
                Err(StoreError::QuoteMissing) => return Err(AppError::QuoteNotFound),
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(
            "vote on quote {} gave up after {} attempts",
            quote_id,
            MAX_VOTE_ATTEMPTS
        );
        Err(AppError::VoteContention(format!(
            "{MAX_VOTE_ATTEMPTS} attempts"
        )))
    }
}
