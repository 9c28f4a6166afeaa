use crate::domain::{validate_text, Quote};
use crate::infrastructure::db::{db_err, QuoteRepository};
use quotable_errors::AppError;
use uuid::Uuid;

/// Quote lifecycle: creation, author-only edits and deletion, listings.
///
/// Karma never changes through this service; the vote aggregation path owns
/// the counter exclusively.
pub struct QuoteService {
    quotes: QuoteRepository,
}

impl QuoteService {
    pub fn new(quotes: QuoteRepository) -> Self {
        Self { quotes }
    }

    pub async fn create(&self, author_id: Uuid, text: String) -> Result<Quote, AppError> {
        let quote = Quote::new(text, author_id)?;
        let model = self.quotes.insert(&quote).await.map_err(db_err)?;
        Ok(model.into())
    }

    pub async fn find_by_id(&self, quote_id: Uuid) -> Result<Quote, AppError> {
        self.quotes
            .find_by_id(quote_id)
            .await
            .map_err(db_err)?
            .map(Into::into)
            .ok_or(AppError::QuoteNotFound)
    }

    pub async fn update_text(
        &self,
        editor_id: Uuid,
        quote_id: Uuid,
        text: String,
    ) -> Result<Quote, AppError> {
        validate_text(&text)?;
        self.require_author(editor_id, quote_id).await?;
        let model = self
            .quotes
            .update_text(quote_id, text)
            .await
            .map_err(db_err)?;
        Ok(model.into())
    }

    /// Deletes the quote; its votes are kept as orphaned records (quote
    /// reference nulled by the schema) and drop out of all aggregation.
    pub async fn delete(&self, editor_id: Uuid, quote_id: Uuid) -> Result<(), AppError> {
        self.require_author(editor_id, quote_id).await?;
        self.quotes.delete(quote_id).await.map_err(db_err)
    }

    pub async fn most_upvoted(&self, limit: u64) -> Result<Vec<Quote>, AppError> {
        let models = self.quotes.most_upvoted(limit).await.map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn most_recent(&self, limit: u64) -> Result<Vec<Quote>, AppError> {
        let models = self.quotes.most_recent(limit).await.map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn quotes_of_user(&self, user_id: Uuid) -> Result<Vec<Quote>, AppError> {
        let models = self.quotes.quotes_of_user(user_id).await.map_err(db_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Authorization gate consumed by the transport layer before it invokes
    /// the vote aggregation service.
    pub async fn is_author(&self, user_id: Uuid, quote_id: Uuid) -> Result<bool, AppError> {
        self.quotes
            .is_author(user_id, quote_id)
            .await
            .map_err(db_err)
    }

    async fn require_author(&self, user_id: Uuid, quote_id: Uuid) -> Result<(), AppError> {
        let quote = self
            .quotes
            .find_by_id(quote_id)
            .await
            .map_err(db_err)?
            .ok_or(AppError::QuoteNotFound)?;
        if quote.author_id != user_id {
            return Err(AppError::NotQuoteAuthor);
        }
        Ok(())
    }
}
