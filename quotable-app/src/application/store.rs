use crate::domain::VoteDecision;
use async_trait::async_trait;
use quotable_errors::AppError;
use uuid::Uuid;

/// Aggregation-relevant fields of a quote row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSnapshot {
    pub id: Uuid,
    pub author_id: Uuid,
    pub karma: i32,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The vote record no longer matches the state a decision was computed
    /// from, or a concurrent insert won the unique index. Re-read and retry.
    #[error("conflicting concurrent update")]
    Conflict,

    #[error("quote does not exist")]
    QuoteMissing,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => AppError::VoteContention("conflicting concurrent update".into()),
            StoreError::QuoteMissing => AppError::QuoteNotFound,
            StoreError::Unavailable(msg) => AppError::Storage(msg),
        }
    }
}

/// Persistence boundary for the vote aggregation core.
///
/// `apply` is the atomicity unit: the vote-record mutation and the karma
/// delta commit together or not at all. `observed` carries the vote state
/// the decision was computed from; implementations must answer `Conflict`
/// rather than apply a decision against a record that has since changed.
#[async_trait]
pub trait VoteStore: Send + Sync {
    async fn quote(&self, quote_id: Uuid) -> Result<Option<QuoteSnapshot>, StoreError>;

    /// Current vote value of `voter_id` on `quote_id`, if a record exists.
    async fn vote(&self, voter_id: Uuid, quote_id: Uuid) -> Result<Option<bool>, StoreError>;

    /// Returns the quote's karma after the committed delta.
    async fn apply(
        &self,
        voter_id: Uuid,
        quote_id: Uuid,
        observed: Option<bool>,
        decision: &VoteDecision,
    ) -> Result<i32, StoreError>;

    /// Sum of karma over all quotes currently authored by `user_id`.
    /// Computed at query time; deleted quotes no longer contribute.
    async fn karma_of_author(&self, user_id: Uuid) -> Result<i64, StoreError>;
}
