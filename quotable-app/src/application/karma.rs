use crate::application::store::VoteStore;
use quotable_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Karma read path: a user's reputation is the sum of karma over the quotes
/// they currently author. Derived at query time from committed values, never
/// cached or stored separately.
pub struct KarmaQuery {
    store: Arc<dyn VoteStore>,
}

impl KarmaQuery {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    pub async fn sum_for_author(&self, user_id: Uuid) -> Result<i64, AppError> {
        Ok(self.store.karma_of_author(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CastVote;
    use crate::domain::{Quote, VoteDirection};
    use crate::infrastructure::store::MemoryVoteStore;

    #[tokio::test]
    async fn test_sum_tracks_creation_votes_and_deletion() {
        let store = Arc::new(MemoryVoteStore::new());
        let cast = CastVote::new(store.clone());
        let karma = KarmaQuery::new(store.clone());

        let author = Uuid::new_v4();
        let first = Quote::new("First witty remark.".into(), author).unwrap();
        let second = Quote::new("Second witty remark.".into(), author).unwrap();
        store.insert_quote(&first);
        store.insert_quote(&second);
        assert_eq!(karma.sum_for_author(author).await.unwrap(), 0);

        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        cast.execute(alice, first.id, VoteDirection::Up).await.unwrap();
        cast.execute(bob, first.id, VoteDirection::Up).await.unwrap();
        cast.execute(alice, second.id, VoteDirection::Down)
            .await
            .unwrap();
        assert_eq!(karma.sum_for_author(author).await.unwrap(), 1);

        // deleting a quote removes its contribution; other authors unaffected
        store.remove_quote(second.id);
        assert_eq!(karma.sum_for_author(author).await.unwrap(), 2);
        assert_eq!(karma.sum_for_author(alice).await.unwrap(), 0);
    }
}
