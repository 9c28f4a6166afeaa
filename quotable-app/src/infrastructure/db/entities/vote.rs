use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per (user, quote) pair, enforced by a unique index in the
/// schema. `quote_id` is nulled when the quote is deleted; the orphaned row
/// stays behind for audit.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub quote_id: Option<Uuid>,
    pub value: bool,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::quote::Entity",
        from = "Column::QuoteId",
        to = "super::quote::Column::Id",
        on_delete = "SetNull"
    )]
    Quote,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::quote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Vote {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            quote_id: model.quote_id,
            value: model.value,
            created_at: model.created_at,
        }
    }
}
