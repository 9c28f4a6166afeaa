use super::entities::{vote, Vote};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Read side of the vote records. All mutation goes through the vote store's
/// atomic apply; this repository only answers queries. Orphaned votes (null
/// quote reference) are excluded from every listing.
#[derive(Clone)]
pub struct VoteRepository {
    db: DatabaseConnection,
}

impl VoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_for(
        &self,
        user_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Option<vote::Model>, DbErr> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::QuoteId.eq(quote_id))
            .one(&self.db)
            .await
    }

    pub async fn votes_of_user(&self, user_id: Uuid) -> Result<Vec<vote::Model>, DbErr> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::QuoteId.is_not_null())
            .order_by_desc(vote::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn upvotes_of_user(&self, user_id: Uuid) -> Result<Vec<vote::Model>, DbErr> {
        Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::Value.eq(true))
            .filter(vote::Column::QuoteId.is_not_null())
            .order_by_desc(vote::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
