//! Known focus-mode names.
//!
//! The system's mode configuration document lists every configured mode
//! with its identifier. When it cannot be read, a fixed list of common
//! modes stands in. User-defined names are merged on top.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::FocusError;

pub const DEFAULT_SYSTEM_MODES: [&str; 8] = [
    "Do Not Disturb",
    "Work",
    "Personal",
    "Sleep",
    "Gaming",
    "Fitness",
    "Reading",
    "Driving",
];

/// Directory holding the system focus databases.
pub fn default_db_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("Library").join("DoNotDisturb").join("DB"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeConfigurations {
    /// Display names, in identifier order.
    pub names: Vec<String>,
    /// Identifier → display name.
    pub identifiers: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct ConfigurationsDoc {
    #[serde(default)]
    data: Vec<ConfigurationsEntry>,
}

#[derive(Deserialize)]
struct ConfigurationsEntry {
    #[serde(default, rename = "modeConfigurations")]
    mode_configurations: HashMap<String, ModeConfiguration>,
}

#[derive(Deserialize)]
struct ModeConfiguration {
    mode: Option<ModeDescriptor>,
}

#[derive(Deserialize)]
struct ModeDescriptor {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "modeIdentifier")]
    mode_identifier: String,
}

/// Parse the mode configuration document. Only the first `data` entry is
/// consulted; modes missing a name or identifier are skipped.
pub fn parse_mode_configurations(json: &str) -> Result<ModeConfigurations, FocusError> {
    let doc: ConfigurationsDoc = serde_json::from_str(json)?;
    let entry = doc
        .data
        .into_iter()
        .next()
        .ok_or_else(|| FocusError::Malformed("no mode configurations entry".into()))?;

    let identifiers: BTreeMap<String, String> = entry
        .mode_configurations
        .into_values()
        .filter_map(|config| config.mode)
        .filter(|mode| !mode.name.is_empty() && !mode.mode_identifier.is_empty())
        .map(|mode| (mode.mode_identifier, mode.name))
        .collect();
    let names = identifiers.values().cloned().collect();
    Ok(ModeConfigurations { names, identifiers })
}

pub fn load_mode_configurations(path: &Path) -> Result<ModeConfigurations, FocusError> {
    let content = std::fs::read_to_string(path).map_err(|source| FocusError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_mode_configurations(&content)?;
    tracing::debug!(path = %path.display(), count = parsed.identifiers.len(), "loaded focus mode configurations");
    Ok(parsed)
}

/// Sorted, de-duplicated union of system and user-defined mode names.
/// An empty system list is replaced by [`DEFAULT_SYSTEM_MODES`].
pub fn available_modes(system: &[String], user_defined: &[String]) -> Vec<String> {
    let mut all: BTreeSet<String> = if system.is_empty() {
        DEFAULT_SYSTEM_MODES.iter().map(|m| m.to_string()).collect()
    } else {
        system.iter().cloned().collect()
    };
    all.extend(user_defined.iter().filter(|m| !m.is_empty()).cloned());
    all.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "data": [{
            "modeConfigurations": {
                "a": { "mode": { "name": "Work", "modeIdentifier": "com.apple.focus.work" } },
                "b": { "mode": { "name": "Writing", "modeIdentifier": "com.apple.focus.custom.1" } },
                "c": { "mode": { "name": "", "modeIdentifier": "com.apple.focus.empty" } },
                "d": { "other": true }
            }
        }]
    }"#;

    #[test]
    fn parses_named_modes_only() {
        let parsed = parse_mode_configurations(DOC).unwrap();
        assert_eq!(parsed.identifiers.len(), 2);
        assert_eq!(
            parsed.identifiers.get("com.apple.focus.custom.1").map(String::as_str),
            Some("Writing")
        );
        assert_eq!(parsed.names, vec!["Writing".to_string(), "Work".to_string()]);
    }

    #[test]
    fn rejects_documents_without_entries() {
        assert!(matches!(
            parse_mode_configurations(r#"{"data": []}"#),
            Err(FocusError::Malformed(_))
        ));
        assert!(parse_mode_configurations("not json").is_err());
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_mode_configurations(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, FocusError::Unreadable { .. }));
    }

    #[test]
    fn available_modes_merges_user_defined() {
        let modes = available_modes(&[], &["Writing".into(), "Work".into(), String::new()]);
        assert_eq!(modes.len(), DEFAULT_SYSTEM_MODES.len() + 1);
        assert!(modes.contains(&"Writing".to_string()));
        let mut sorted = modes.clone();
        sorted.sort();
        assert_eq!(modes, sorted);

        let system = vec!["Work".to_string()];
        assert_eq!(available_modes(&system, &[]), vec!["Work".to_string()]);
    }
}
