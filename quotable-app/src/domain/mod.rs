mod quote;
mod user;
mod vote;

pub use quote::{validate_text, Quote, MAX_TEXT_CHARS, MIN_TEXT_CHARS};
pub use user::User;
pub use vote::{transition, RecordAction, Vote, VoteDecision, VoteDirection, VoteOutcome};
