//! Reading game-record uploads from disk

use crate::error::Result;
use crate::games::SyncRequest;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load raw game payloads from a JSON file
///
/// Accepts either an upload body (`{"games": [...]}`) or a bare array.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read and a JSON error if it is
/// neither shape.
pub fn load_games_file<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)?;
    parse_games(&text)
}

/// Parse raw game payloads from JSON text
///
/// # Errors
///
/// Returns a JSON error for malformed input.
pub fn parse_games(text: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(games) => Ok(games),
        body => Ok(serde_json::from_value::<SyncRequest>(body)?.games),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn accepts_body_or_array() {
        assert_eq!(parse_games(r#"{"games": [{"a": 1}]}"#).unwrap().len(), 1);
        assert_eq!(parse_games(r#"[{"a": 1}, {"b": 2}]"#).unwrap().len(), 2);
        assert!(parse_games(r#"{"other": 1}"#).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(parse_games("games!"), Err(Error::Json(_))));
        assert!(matches!(parse_games("42"), Err(Error::Json(_))));
        assert!(matches!(
            load_games_file("/definitely/not/here.json"),
            Err(Error::Io(_))
        ));
    }
}
