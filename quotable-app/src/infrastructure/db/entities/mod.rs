pub mod quote;
pub mod user;
pub mod vote;

pub use quote::Entity as Quote;
pub use user::Entity as User;
pub use vote::Entity as Vote;
