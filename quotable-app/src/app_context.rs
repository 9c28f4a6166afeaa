use crate::application::{CastVote, KarmaQuery, QuoteService};
use crate::infrastructure::db::{self, db_err, QuoteRepository, UserRepository, VoteRepository};
use crate::infrastructure::store::PgVoteStore;
use quotable_errors::AppError;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub cast_vote: Arc<CastVote>,
    pub karma: Arc<KarmaQuery>,
    pub quotes: Arc<QuoteService>,
    pub users: UserRepository,
    pub votes: VoteRepository,
}

impl AppContext {
    pub fn new(db: DatabaseConnection) -> Self {
        let store = Arc::new(PgVoteStore::new(db.clone()));
        Self {
            cast_vote: Arc::new(CastVote::new(store.clone())),
            karma: Arc::new(KarmaQuery::new(store)),
            quotes: Arc::new(QuoteService::new(QuoteRepository::new(db.clone()))),
            users: UserRepository::new(db.clone()),
            votes: VoteRepository::new(db),
        }
    }

    /// Connects with `DATABASE_URL` and applies migrations.
    pub async fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::Storage("DATABASE_URL must be set".to_string()))?;

        let database = db::create_connection(&database_url).await.map_err(db_err)?;
        db::run_migrations(&database).await.map_err(db_err)?;
        tracing::info!("Connected to database, migrations applied");

        Ok(Self::new(database))
    }
}
