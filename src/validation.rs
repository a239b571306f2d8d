//! Input validation for profile names, imported documents and export filenames.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashSet;

use crate::profile::chronicle::CHRONICLE_CAP;
use crate::profile::types::{AvatarState, Specialty, MIN_NAME_CHARS};

/// Upper bound on an imported or persisted profile document.
pub const MAX_DOCUMENT_BYTES: usize = 1024 * 1024;

/// Characters left as-is in generated filenames; everything else is percent-encoded.
const FILENAME_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// Name validation errors with helpful messages
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Name is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("Name cannot be empty")]
    Empty,

    #[error("Name contains control characters")]
    ControlCharacters,
}

/// Document parse failures
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("{0}")]
    Shape(#[from] serde_json::Error),
}

/// Onboarding name: non-blank, at least three characters, no control characters.
pub fn validate_onboarding_name(name: &str) -> Result<&str, NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(NameError::TooShort { min: MIN_NAME_CHARS });
    }
    reject_control_chars(name)?;
    Ok(name)
}

/// Rename target: anything non-blank without control characters.
pub fn validate_display_name(name: &str) -> Result<&str, NameError> {
    if name.trim().is_empty() {
        return Err(NameError::Empty);
    }
    reject_control_chars(name)?;
    Ok(name)
}

fn reject_control_chars(name: &str) -> Result<(), NameError> {
    if name.chars().any(char::is_control) {
        return Err(NameError::ControlCharacters);
    }
    Ok(())
}

/// Generate a filesystem-safe filename fragment using percent encoding
pub fn safe_filename(raw: &str) -> String {
    utf8_percent_encode(raw, FILENAME_ESCAPES).to_string()
}

/// Download name for an exported profile.
pub fn export_filename(player_name: &str) -> String {
    format!("aetheria_profile_{}.json", safe_filename(player_name))
}

/// Parse a profile document with a size limit, tolerating leading NUL bytes
/// left behind by interrupted writes.
pub fn parse_profile_document(content: &str, max_bytes: usize) -> Result<AvatarState, DocumentError> {
    if content.len() > max_bytes {
        return Err(DocumentError::TooLarge { limit: max_bytes });
    }
    let normalized = content.trim_start_matches('\0');
    Ok(serde_json::from_str(normalized)?)
}

/// Business-rule checks applied to imported documents under strict import.
/// Returns every violation found rather than stopping at the first.
pub fn validate_avatar(state: &AvatarState) -> Result<(), Vec<String>> {
    let mut problems = Vec::new();

    if let Err(e) = validate_display_name(&state.name) {
        problems.push(format!("name: {}", e));
    }
    if state.level < 1 {
        problems.push("level: must be at least 1".to_string());
    }
    if state.specialty.parse::<Specialty>().is_err() {
        problems.push(format!("specialty: '{}' is not a known specialty", state.specialty));
    }
    if state.chronicles.len() > CHRONICLE_CAP {
        problems.push(format!(
            "chronicles: {} entries exceeds the cap of {}",
            state.chronicles.len(),
            CHRONICLE_CAP
        ));
    }
    let mut seen = HashSet::new();
    for entry in &state.chronicles {
        if entry.id.is_empty() {
            problems.push("chronicles: entry with empty id".to_string());
        } else if !seen.insert(entry.id.as_str()) {
            problems.push(format!("chronicles: duplicate entry id '{}'", entry.id));
        }
    }
    if state.world_discovery.keys().any(|id| id.is_empty()) {
        problems.push("worldDiscovery: empty district id".to_string());
    }
    if state.inventory.iter().any(|item| item.id.is_empty()) {
        problems.push("inventory: item with empty id".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::{ActivityEntry, ActivityKind};

    #[test]
    fn test_onboarding_name_rules() {
        assert_eq!(validate_onboarding_name("Ax"), Err(NameError::TooShort { min: 3 }));
        assert!(validate_onboarding_name("Axe").is_ok());
        assert_eq!(validate_onboarding_name("   "), Err(NameError::Empty));
        assert_eq!(validate_onboarding_name(""), Err(NameError::Empty));
        // counts characters, not bytes
        assert!(validate_onboarding_name("é1").is_err());
        assert!(validate_onboarding_name("José").is_ok());
        assert_eq!(validate_onboarding_name("bad\nname"), Err(NameError::ControlCharacters));
    }

    #[test]
    fn test_display_name_rules() {
        assert_eq!(validate_display_name(""), Err(NameError::Empty));
        assert_eq!(validate_display_name("   "), Err(NameError::Empty));
        assert!(validate_display_name("Q").is_ok());
    }

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("aetheria_profile"), "aetheria_profile");
        assert_eq!(safe_filename("Al Sayeed"), "Al%20Sayeed");
        assert!(!safe_filename("../etc/passwd").contains('/'));
        assert_eq!(export_filename("Pathfinder01"), "aetheria_profile_Pathfinder01.json");
    }

    #[test]
    fn test_document_size_limit() {
        let big = "x".repeat(64);
        assert!(matches!(
            parse_profile_document(&big, 16),
            Err(DocumentError::TooLarge { limit: 16 })
        ));
        assert!(matches!(parse_profile_document("{", 16), Err(DocumentError::Shape(_))));
    }

    #[test]
    fn test_validate_avatar_collects_problems() {
        let mut state = AvatarState::new("Pathfinder01", Specialty::Vanguard);
        assert!(validate_avatar(&state).is_ok());

        state.level = 0;
        state.specialty = "Pirate".into();
        state.chronicles = vec![
            ActivityEntry { id: "a".into(), timestamp: 1, kind: ActivityKind::Social, text: String::new() },
            ActivityEntry { id: "a".into(), timestamp: 2, kind: ActivityKind::Social, text: String::new() },
        ];
        let problems = validate_avatar(&state).unwrap_err();
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p.starts_with("level")));
        assert!(problems.iter().any(|p| p.contains("duplicate")));
    }

    #[test]
    fn test_validate_avatar_ignores_timestamp_order() {
        // Order is positional; wall-clock steps can make older entries carry later stamps
        let mut state = AvatarState::new("Pathfinder01", Specialty::Vanguard);
        state.chronicles = vec![
            ActivityEntry { id: "b".into(), timestamp: 1, kind: ActivityKind::Discovery, text: String::new() },
            ActivityEntry { id: "a".into(), timestamp: 5, kind: ActivityKind::Social, text: String::new() },
        ];
        assert!(validate_avatar(&state).is_ok());
    }
}
