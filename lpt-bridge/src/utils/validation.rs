//! Input validation helpers
//!
//! Requests are fully validated here before the printer core sees them.
//! Limits follow what the receipt printer accepts.

use lpt_printer::{MAX_FEED_LINES, MAX_TEXT_CHARS, MIN_FEED_LINES, PortId};

use crate::utils::AppError;

/// Validate that print text is non-empty and within the character limit.
///
/// Length is counted in characters, not bytes, so a line of Chinese text
/// gets the same allowance as ASCII.
pub fn validate_print_text(text: Option<&str>) -> Result<&str, AppError> {
    match text {
        Some(t) if !t.is_empty() && t.chars().count() <= MAX_TEXT_CHARS => Ok(t),
        _ => Err(AppError::validation("Invalid text content")),
    }
}

/// Validate an optional feed count; absent means one line.
pub fn validate_feed_count(count: Option<i64>) -> Result<u32, AppError> {
    match count {
        None => Ok(MIN_FEED_LINES),
        Some(n) if (MIN_FEED_LINES as i64..=MAX_FEED_LINES as i64).contains(&n) => Ok(n as u32),
        Some(_) => Err(AppError::validation("Invalid line count")),
    }
}

/// Validate an optional port name.
pub fn validate_port(port: Option<&str>) -> Result<Option<PortId>, AppError> {
    port.map(|p| p.parse::<PortId>())
        .transpose()
        .map_err(|_| AppError::validation("Invalid port"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_text() {
        assert_eq!(validate_print_text(Some("hello")).unwrap(), "hello");
        assert!(validate_print_text(None).is_err());
        assert!(validate_print_text(Some("")).is_err());

        let max = "字".repeat(MAX_TEXT_CHARS);
        assert!(validate_print_text(Some(&max)).is_ok());
        let over = "a".repeat(MAX_TEXT_CHARS + 1);
        assert!(validate_print_text(Some(&over)).is_err());
    }

    #[test]
    fn test_feed_count() {
        assert_eq!(validate_feed_count(None).unwrap(), 1);
        assert_eq!(validate_feed_count(Some(1)).unwrap(), 1);
        assert_eq!(validate_feed_count(Some(50)).unwrap(), 50);
        assert!(validate_feed_count(Some(0)).is_err());
        assert!(validate_feed_count(Some(51)).is_err());
        assert!(validate_feed_count(Some(-3)).is_err());
    }

    #[test]
    fn test_port() {
        assert_eq!(validate_port(None).unwrap(), None);
        assert_eq!(validate_port(Some("LPT2")).unwrap(), Some(PortId::Secondary));
        assert!(validate_port(Some("COM1")).is_err());
    }
}
