use std::collections::BTreeMap;

/// Substring fallbacks for identifiers missing from the identifier map,
/// checked in order.
const BUILTIN_NAMES: [(&str, &str); 8] = [
    ("default", "Do Not Disturb"),
    ("work", "Work"),
    ("personal", "Personal"),
    ("sleep", "Sleep"),
    ("gaming", "Gaming"),
    ("fitness", "Fitness"),
    ("reading", "Reading"),
    ("driving", "Driving"),
];

/// Maps raw focus-mode identifiers (e.g. `com.apple.focus.work`) to the
/// display names users select in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeResolver {
    identifiers: BTreeMap<String, String>,
}

impl ModeResolver {
    pub fn new(identifiers: BTreeMap<String, String>) -> Self {
        Self { identifiers }
    }

    pub fn extend(&mut self, identifiers: impl IntoIterator<Item = (String, String)>) {
        self.identifiers.extend(identifiers);
    }

    /// Exact map entry first, then a case-insensitive builtin match.
    pub fn resolve(&self, identifier: &str) -> Option<String> {
        if let Some(name) = self.identifiers.get(identifier) {
            return Some(name.clone());
        }
        let lower = identifier.to_lowercase();
        let found = BUILTIN_NAMES
            .iter()
            .find(|(key, _)| lower.contains(key))
            .map(|(_, name)| name.to_string());
        if found.is_none() {
            tracing::debug!(identifier, "no focus mode name for identifier");
        }
        found
    }
}
