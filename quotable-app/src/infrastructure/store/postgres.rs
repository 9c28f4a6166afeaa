use crate::application::store::{QuoteSnapshot, StoreError, VoteStore};
use crate::domain::{RecordAction, VoteDecision};
use crate::infrastructure::db::entities::{quote, vote, Quote, Vote};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::*, query::*, DatabaseConnection, DatabaseTransaction, DbErr, SqlErr, TransactionTrait,
};
use uuid::Uuid;

/// Postgres-backed vote store.
///
/// The record mutation and the karma delta run in one transaction. The
/// record side is a conditional write keyed on the observed vote value:
/// Postgres re-checks the predicate after any row-lock wait, so a record
/// changed by a concurrent transaction shows up as zero affected rows and
/// the whole transaction rolls back as a `Conflict`. Karma is applied as a
/// relative `karma = karma + delta`, never a read-modify-write.
#[derive(Clone)]
pub struct PgVoteStore {
    db: DatabaseConnection,
}

impl PgVoteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VoteStore for PgVoteStore {
    async fn quote(&self, quote_id: Uuid) -> Result<Option<QuoteSnapshot>, StoreError> {
        let model = Quote::find_by_id(quote_id)
            .one(&self.db)
            .await
            .map_err(unavailable)?;
        Ok(model.map(|m| QuoteSnapshot {
            id: m.id,
            author_id: m.author_id,
            karma: m.karma,
        }))
    }

    async fn vote(&self, voter_id: Uuid, quote_id: Uuid) -> Result<Option<bool>, StoreError> {
        let model = Vote::find()
            .filter(vote::Column::UserId.eq(voter_id))
            .filter(vote::Column::QuoteId.eq(quote_id))
            .one(&self.db)
            .await
            .map_err(unavailable)?;
        Ok(model.map(|m| m.value))
    }

    async fn apply(
        &self,
        voter_id: Uuid,
        quote_id: Uuid,
        observed: Option<bool>,
        decision: &VoteDecision,
    ) -> Result<i32, StoreError> {
        let txn = self.db.begin().await.map_err(unavailable)?;
        match apply_in_txn(&txn, voter_id, quote_id, observed, decision).await {
            Ok(karma) => {
                txn.commit().await.map_err(unavailable)?;
                Ok(karma)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    async fn karma_of_author(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let sum = Quote::find()
            .select_only()
            .column_as(quote::Column::Karma.sum(), "karma_sum")
            .filter(quote::Column::AuthorId.eq(user_id))
            .into_tuple::<Option<i64>>()
            .one(&self.db)
            .await
            .map_err(unavailable)?;
        Ok(sum.flatten().unwrap_or(0))
    }
}

async fn apply_in_txn(
    txn: &DatabaseTransaction,
    voter_id: Uuid,
    quote_id: Uuid,
    observed: Option<bool>,
    decision: &VoteDecision,
) -> Result<i32, StoreError> {
    match decision.action {
        RecordAction::Create { value } => {
            let active = vote::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(voter_id),
                quote_id: Set(Some(quote_id)),
                value: Set(value),
                created_at: Set(Some(chrono::Utc::now())),
            };
            active.insert(txn).await.map_err(|e| match e.sql_err() {
                // unique (user_id, quote_id): a concurrent first vote won
                Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Conflict,
                // quote row went away between the read and the insert
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => StoreError::QuoteMissing,
                _ => unavailable(e),
            })?;
        }
        RecordAction::Flip { value } => {
            let stale = observed.ok_or(StoreError::Conflict)?;
            let updated = Vote::update_many()
                .col_expr(vote::Column::Value, Expr::value(value))
                .filter(vote::Column::UserId.eq(voter_id))
                .filter(vote::Column::QuoteId.eq(quote_id))
                .filter(vote::Column::Value.eq(stale))
                .exec(txn)
                .await
                .map_err(unavailable)?;
            if updated.rows_affected == 0 {
                return Err(StoreError::Conflict);
            }
        }
        RecordAction::Remove => {
            let held = observed.ok_or(StoreError::Conflict)?;
            let deleted = Vote::delete_many()
                .filter(vote::Column::UserId.eq(voter_id))
                .filter(vote::Column::QuoteId.eq(quote_id))
                .filter(vote::Column::Value.eq(held))
                .exec(txn)
                .await
                .map_err(unavailable)?;
            if deleted.rows_affected == 0 {
                return Err(StoreError::Conflict);
            }
        }
    }

    let updated = Quote::update_many()
        .col_expr(
            quote::Column::Karma,
            Expr::col(quote::Column::Karma).add(decision.karma_delta),
        )
        .filter(quote::Column::Id.eq(quote_id))
        .exec(txn)
        .await
        .map_err(unavailable)?;
    if updated.rows_affected == 0 {
        return Err(StoreError::QuoteMissing);
    }

    let karma = Quote::find_by_id(quote_id)
        .one(txn)
        .await
        .map_err(unavailable)?
        .map(|m| m.karma)
        .ok_or(StoreError::QuoteMissing)?;
    Ok(karma)
}

fn unavailable(e: DbErr) -> StoreError {
    StoreError::Unavailable(e.to_string())
}
