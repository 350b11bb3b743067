// src/utils/ids.rs

use uuid::Uuid;

use crate::error::AppError;

/// Parses an identifier arriving from a path segment.
/// Malformed values are a client error and never reach the engine.
pub fn parse_id(kind: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} ID: {}", kind, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("quiz", &id.to_string()).unwrap(), id);
    }

    #[test]
    fn rejects_garbage_with_kind_in_message() {
        match parse_id("course", "not-an-id") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid course ID: not-an-id"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
