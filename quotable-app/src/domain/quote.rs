use quotable_errors::AppError;
use serde::{Deserialize, Serialize};

pub const MIN_TEXT_CHARS: usize = 3;
pub const MAX_TEXT_CHARS: usize = 280;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: uuid::Uuid,
    pub text: String,
    /// Net score: upvotes minus downvotes. Mutated only through the vote
    /// aggregation path, never written directly.
    pub karma: i32,
    pub author_id: uuid::Uuid,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Quote {
    pub fn new(text: String, author_id: uuid::Uuid) -> Result<Self, AppError> {
        validate_text(&text)?;
        Ok(Self {
            id: uuid::Uuid::new_v4(),
            text,
            karma: 0,
            author_id,
            created_at: None,
        })
    }
}

/// Bounds are counted in Unicode code points, not bytes.
pub fn validate_text(text: &str) -> Result<(), AppError> {
    let len = text.chars().count();
    if len < MIN_TEXT_CHARS {
        return Err(AppError::InvalidQuoteText(format!(
            "{len} characters, minimum is {MIN_TEXT_CHARS}"
        )));
    }
    if len > MAX_TEXT_CHARS {
        return Err(AppError::InvalidQuoteText(format!(
            "{len} characters, maximum is {MAX_TEXT_CHARS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_bounds() {
        assert!(validate_text("").is_err());
        assert!(validate_text("ab").is_err());
        assert!(validate_text("abc").is_ok());
        assert!(validate_text(&"x".repeat(280)).is_ok());
        assert!(validate_text(&"x".repeat(281)).is_err());
    }

    #[test]
    fn test_text_bounds_count_code_points_not_bytes() {
        // 280 three-byte characters is well past 280 bytes but still valid
        assert!(validate_text(&"é".repeat(280)).is_ok());
        assert!(validate_text("ネコ").is_err());
        assert!(validate_text("ネコだ").is_ok());
    }

    #[test]
    fn test_new_quote_starts_at_zero_karma() {
        let quote = Quote::new("To be or not to be.".into(), uuid::Uuid::new_v4()).unwrap();
        assert_eq!(quote.karma, 0);
    }
}
