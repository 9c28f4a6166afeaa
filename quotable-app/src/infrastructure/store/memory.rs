use crate::application::store::{QuoteSnapshot, StoreError, VoteStore};
use crate::domain::{Quote, RecordAction, Vote, VoteDecision};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct QuoteRow {
    author_id: Uuid,
    karma: i32,
}

#[derive(Debug, Clone)]
struct VoteRow {
    id: Uuid,
    value: bool,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// In-memory vote store.
///
/// Quotes and votes live in sharded maps keyed by quote id and
/// (voter, quote) pair. `apply` holds the quote's entry guard for its whole
/// critical section: applies against one quote serialize, different quotes
/// proceed in parallel. Lock order is always quotes before votes.
pub struct MemoryVoteStore {
    quotes: DashMap<Uuid, QuoteRow>,
    votes: DashMap<(Uuid, Uuid), VoteRow>,
    orphans: DashMap<Uuid, Vote>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self {
            quotes: DashMap::new(),
            votes: DashMap::new(),
            orphans: DashMap::new(),
        }
    }

    pub fn insert_quote(&self, quote: &Quote) {
        self.quotes.insert(
            quote.id,
            QuoteRow {
                author_id: quote.author_id,
                karma: quote.karma,
            },
        );
    }

    /// Deletes a quote. Its votes are kept as orphaned records with the
    /// quote reference cleared, matching the schema's ON DELETE SET NULL.
    pub fn remove_quote(&self, quote_id: Uuid) -> bool {
        if self.quotes.remove(&quote_id).is_none() {
            return false;
        }
        let keys: Vec<(Uuid, Uuid)> = self
            .votes
            .iter()
            .filter(|entry| entry.key().1 == quote_id)
            .map(|entry| *entry.key())
            .collect();
        for key in keys {
            if let Some((_, row)) = self.votes.remove(&key) {
                self.orphans.insert(
                    row.id,
                    Vote {
                        id: row.id,
                        user_id: key.0,
                        quote_id: None,
                        value: row.value,
                        created_at: row.created_at,
                    },
                );
            }
        }
        true
    }

    /// (#upvotes, #downvotes) currently recorded for the quote.
    pub fn tally(&self, quote_id: Uuid) -> (usize, usize) {
        let mut ups = 0;
        let mut downs = 0;
        for entry in self.votes.iter() {
            if entry.key().1 == quote_id {
                if entry.value().value {
                    ups += 1;
                } else {
                    downs += 1;
                }
            }
        }
        (ups, downs)
    }

    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }
}

impl Default for MemoryVoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoteStore for MemoryVoteStore {
    async fn quote(&self, quote_id: Uuid) -> Result<Option<QuoteSnapshot>, StoreError> {
        Ok(self.quotes.get(&quote_id).map(|row| QuoteSnapshot {
            id: quote_id,
            author_id: row.author_id,
            karma: row.karma,
        }))
    }

    async fn vote(&self, voter_id: Uuid, quote_id: Uuid) -> Result<Option<bool>, StoreError> {
        Ok(self.votes.get(&(voter_id, quote_id)).map(|row| row.value))
    }

    async fn apply(
        &self,
        voter_id: Uuid,
        quote_id: Uuid,
        observed: Option<bool>,
        decision: &VoteDecision,
    ) -> Result<i32, StoreError> {
        let mut quote = self
            .quotes
            .get_mut(&quote_id)
            .ok_or(StoreError::QuoteMissing)?;
        let key = (voter_id, quote_id);

        match decision.action {
            RecordAction::Create { value } => match self.votes.entry(key) {
                // a concurrent first vote won the slot
                Entry::Occupied(_) => return Err(StoreError::Conflict),
                Entry::Vacant(slot) => {
                    slot.insert(VoteRow {
                        id: Uuid::new_v4(),
                        value,
                        created_at: Some(chrono::Utc::now()),
                    });
                }
            },
            RecordAction::Flip { value } => {
                let mut row = self.votes.get_mut(&key).ok_or(StoreError::Conflict)?;
                if observed != Some(row.value) {
                    return Err(StoreError::Conflict);
                }
                row.value = value;
            }
            RecordAction::Remove => {
                let removed = self
                    .votes
                    .remove_if(&key, |_, row| observed == Some(row.value));
                if removed.is_none() {
                    return Err(StoreError::Conflict);
                }
            }
        }

        quote.karma += decision.karma_delta;
        Ok(quote.karma)
    }

    async fn karma_of_author(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let sum = self
            .quotes
            .iter()
            .filter(|entry| entry.value().author_id == user_id)
            .map(|entry| i64::from(entry.value().karma))
            .sum();
        Ok(sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{transition, VoteDirection};

    fn store_with_quote() -> (MemoryVoteStore, Uuid, Uuid) {
        let store = MemoryVoteStore::new();
        let author = Uuid::new_v4();
        let quote = Quote::new("A witty saying proves nothing.".into(), author).unwrap();
        let id = quote.id;
        store.insert_quote(&quote);
        (store, author, id)
    }

    #[tokio::test]
    async fn test_apply_missing_quote() {
        let store = MemoryVoteStore::new();
        let decision = transition(None, VoteDirection::Up);
        let err = store
            .apply(Uuid::new_v4(), Uuid::new_v4(), None, &decision)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::QuoteMissing));
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let (store, _, quote_id) = store_with_quote();
        let voter = Uuid::new_v4();
        let decision = transition(None, VoteDirection::Up);

        store.apply(voter, quote_id, None, &decision).await.unwrap();
        let err = store
            .apply(voter, quote_id, None, &decision)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
        // the conflicted attempt must not have touched karma
        assert_eq!(store.quote(quote_id).await.unwrap().unwrap().karma, 1);
    }

    #[tokio::test]
    async fn test_stale_observation_conflicts() {
        let (store, _, quote_id) = store_with_quote();
        let voter = Uuid::new_v4();

        let create = transition(None, VoteDirection::Up);
        store.apply(voter, quote_id, None, &create).await.unwrap();

        // decision computed against a downvote that is not there
        let flip = transition(Some(false), VoteDirection::Up);
        let err = store
            .apply(voter, quote_id, Some(false), &flip)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        let remove = transition(Some(false), VoteDirection::Down);
        let err = store
            .apply(voter, quote_id, Some(false), &remove)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        assert_eq!(store.vote(voter, quote_id).await.unwrap(), Some(true));
        assert_eq!(store.quote(quote_id).await.unwrap().unwrap().karma, 1);
    }

    #[tokio::test]
    async fn test_remove_quote_orphans_votes() {
        let (store, author, quote_id) = store_with_quote();
        let voter = Uuid::new_v4();

        let create = transition(None, VoteDirection::Up);
        store.apply(voter, quote_id, None, &create).await.unwrap();
        assert!(store.remove_quote(quote_id));

        assert_eq!(store.orphan_count(), 1);
        assert_eq!(store.vote(voter, quote_id).await.unwrap(), None);
        assert!(store.quote(quote_id).await.unwrap().is_none());
        assert_eq!(store.karma_of_author(author).await.unwrap(), 0);
        assert!(!store.remove_quote(quote_id));
    }
}
