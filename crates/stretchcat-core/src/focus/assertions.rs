//! Focus source backed by the system's focus "assertions" document.
//!
//! The document lists the currently asserted focus modes. The first
//! identifier that resolves to a name is the active mode. When nothing is
//! asserted, or the document cannot be read, the manually chosen mode (if
//! any) is reported instead.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::resolver::ModeResolver;
use super::{FocusSignal, FocusSignalSource};
use crate::error::FocusError;

#[derive(Deserialize)]
struct AssertionsDoc {
    #[serde(default)]
    data: Vec<AssertionEntry>,
}

#[derive(Deserialize)]
struct AssertionEntry {
    #[serde(default, rename = "storeAssertionRecords")]
    records: Vec<AssertionRecord>,
    #[serde(rename = "storeAssertionRecordDetails")]
    record_details: Option<ModeRef>,
}

#[derive(Deserialize)]
struct AssertionRecord {
    #[serde(rename = "assertionDetails")]
    details: Option<AssertionDetails>,
    #[serde(rename = "storeAssertionRecordDetails")]
    record_details: Option<ModeRef>,
}

#[derive(Deserialize)]
struct AssertionDetails {
    #[serde(rename = "assertionDetailsModeIdentifier")]
    details_mode_identifier: Option<String>,
    #[serde(rename = "modeIdentifier")]
    mode_identifier: Option<String>,
}

#[derive(Deserialize)]
struct ModeRef {
    #[serde(rename = "modeIdentifier")]
    mode_identifier: Option<String>,
}

/// Every asserted mode identifier, in document order.
pub fn active_mode_identifiers(json: &str) -> Result<Vec<String>, FocusError> {
    let doc: AssertionsDoc = serde_json::from_str(json)?;
    let mut ids = Vec::new();
    for entry in doc.data {
        for record in entry.records {
            if let Some(details) = record.details {
                ids.extend(details.details_mode_identifier);
                ids.extend(details.mode_identifier);
            }
            if let Some(details) = record.record_details {
                ids.extend(details.mode_identifier);
            }
        }
        if let Some(details) = entry.record_details {
            ids.extend(details.mode_identifier);
        }
    }
    Ok(ids)
}

#[derive(Debug, Clone)]
pub struct AssertionsFileSource {
    path: PathBuf,
    resolver: ModeResolver,
    manual_fallback: Option<String>,
}

impl AssertionsFileSource {
    pub fn new(path: impl Into<PathBuf>, resolver: ModeResolver) -> Self {
        Self {
            path: path.into(),
            resolver,
            manual_fallback: None,
        }
    }

    pub fn with_manual_fallback(mut self, mode: Option<String>) -> Self {
        self.manual_fallback = mode.filter(|m| !m.is_empty());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fallback(&self) -> FocusSignal {
        FocusSignal::manual(self.manual_fallback.clone())
    }
}

impl FocusSignalSource for AssertionsFileSource {
    fn name(&self) -> &str {
        "assertions"
    }

    fn read(&mut self) -> Result<FocusSignal, FocusError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(source) if self.manual_fallback.is_some() => {
                tracing::debug!(path = %self.path.display(), error = %source, "assertions unreadable, using manual mode");
                return Ok(self.fallback());
            }
            Err(source) => {
                return Err(FocusError::Unreadable {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let ids = active_mode_identifiers(&content)?;
        for id in &ids {
            if let Some(name) = self.resolver.resolve(id) {
                return Ok(FocusSignal::active(name));
            }
        }
        Ok(self.fallback())
    }
}
