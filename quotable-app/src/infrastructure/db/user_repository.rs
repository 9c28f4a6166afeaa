use super::db_err;
use super::entities::{user, User};
use quotable_errors::AppError;
use sea_orm::{entity::*, query::*, DatabaseConnection, SqlErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, data: &crate::domain::User) -> Result<user::Model, AppError> {
        let active = user::ActiveModel {
            id: Set(data.id),
            email: Set(data.email.clone()),
            name: Set(data.name.clone()),
            created_at: Set(Some(chrono::Utc::now())),
            updated_at: Set(Some(chrono::Utc::now())),
        };
        active.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::EmailTaken,
            _ => db_err(e),
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, AppError> {
        User::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)
    }
}
