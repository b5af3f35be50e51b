//! Type names that carry no real type information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The "dynamic" marker from `typing`
pub const ANY: &str = "Any";

/// The "not yet annotated" marker stub generators emit (`_typeshed.Incomplete`)
pub const INCOMPLETE: &str = "Incomplete";

/// Set of bare names treated as placeholders by the comparator.
///
/// Only bare names match: `typing.Any` is an attribute access whose last
/// segment is not a name node, so it is never a placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placeholders {
    names: BTreeSet<String>,
}

impl Placeholders {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a configured list, keeping the defaults when it is empty.
    pub fn from_config(names: &[String]) -> Self {
        if names.is_empty() {
            log::warn!("Empty placeholder list configured. Using defaults.");
            return Self::default();
        }
        Self::new(names.iter().cloned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Placeholders {
    fn default() -> Self {
        Self::new([ANY, INCOMPLETE])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let placeholders = Placeholders::default();
        assert!(placeholders.contains("Any"));
        assert!(placeholders.contains("Incomplete"));
        assert!(!placeholders.contains("object"));
        assert_eq!(placeholders.len(), 2);
    }

    #[test]
    fn test_custom_vocabulary_replaces_defaults() {
        let placeholders = Placeholders::new(["Unknown", "TODO"]);
        assert!(placeholders.contains("Unknown"));
        assert!(!placeholders.contains("Any"));
    }

    #[test]
    fn test_empty_config_falls_back_to_defaults() {
        assert_eq!(Placeholders::from_config(&[]), Placeholders::default());
        let configured = Placeholders::from_config(&["Unknown".to_string()]);
        assert_eq!(configured.iter().collect::<Vec<_>>(), vec!["Unknown"]);
    }
}
