use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("quote not found")]
    QuoteNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("voting on your own quote is not allowed")]
    OwnQuote,

    #[error("only the author may modify this quote")]
    NotQuoteAuthor,

    #[error("vote lost to concurrent updates: {0}")]
    VoteContention(String),

    #[error("invalid quote text: {0}")]
    InvalidQuoteText(String),

    #[error("a user with that email already exists")]
    EmailTaken,

    #[error("storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::QuoteNotFound => "That quote doesn't exist (anymore).",
            Self::UserNotFound => "That user doesn't exist.",
            Self::OwnQuote => "You can't vote on your own quote.",
            Self::NotQuoteAuthor => "Only the author can change this quote.",
            Self::VoteContention(_) => "Lots of votes coming in. Try again!",
            Self::InvalidQuoteText(_) => "Quote text must be between 3 and 280 characters.",
            Self::EmailTaken => "An account with that email already exists.",
            Self::Storage(_) => "Something went wrong on our side. Try again later.",
        }
    }

    /// Whether the caller may safely resubmit the same request.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::VoteContention(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(AppError::VoteContention("3 attempts".into()).is_transient());
        assert!(!AppError::QuoteNotFound.is_transient());
        assert!(!AppError::Storage("connection reset".into()).is_transient());
    }
}
