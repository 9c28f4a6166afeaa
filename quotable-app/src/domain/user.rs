use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: uuid::Uuid,
    pub email: String,
    pub name: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    pub fn new(email: String, name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            email,
            name,
            created_at: None,
            updated_at: None,
        }
    }
}
