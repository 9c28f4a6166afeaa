use super::entities::{quote, Quote};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct QuoteRepository {
    db: DatabaseConnection,
}

impl QuoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, data: &crate::domain::Quote) -> Result<quote::Model, DbErr> {
        let active = quote::ActiveModel {
            id: Set(data.id),
            text: Set(data.text.clone()),
            karma: Set(data.karma),
            author_id: Set(data.author_id),
            created_at: Set(Some(chrono::Utc::now())),
        };
        active.insert(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<quote::Model>, DbErr> {
        Quote::find_by_id(id).one(&self.db).await
    }

    pub async fn update_text(&self, id: Uuid, text: String) -> Result<quote::Model, DbErr> {
        let quote = Quote::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DbErr::RecordNotFound("quote not found".to_string()))?;

        let mut active: quote::ActiveModel = quote.into();
        active.text = Set(text);
        active.update(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbErr> {
        Quote::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    pub async fn most_upvoted(&self, limit: u64) -> Result<Vec<quote::Model>, DbErr> {
        Quote::find()
            .order_by_desc(quote::Column::Karma)
            .order_by_desc(quote::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }

    pub async fn most_recent(&self, limit: u64) -> Result<Vec<quote::Model>, DbErr> {
        Quote::find()
            .order_by_desc(quote::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }

    pub async fn quotes_of_user(&self, user_id: Uuid) -> Result<Vec<quote::Model>, DbErr> {
        Quote::find()
            .filter(quote::Column::AuthorId.eq(user_id))
            .order_by_desc(quote::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn is_author(&self, user_id: Uuid, quote_id: Uuid) -> Result<bool, DbErr> {
        let quote = Quote::find()
            .filter(quote::Column::Id.eq(quote_id))
            .filter(quote::Column::AuthorId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(quote.is_some())
    }
}
