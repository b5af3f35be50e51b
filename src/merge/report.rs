//! Record of the annotation slots a merge changed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which annotation slot of a function changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Slot {
    Param(String),
    Return,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Param(name) => write!(f, "parameter `{}`", name),
            Slot::Return => write!(f, "return"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChange {
    pub function: String,
    pub line: usize,
    pub slot: Slot,
    pub before: Option<String>,
    pub after: String,
}

impl fmt::Display for SlotChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {}: {} -> {}",
            self.function,
            self.line,
            self.slot,
            self.before.as_deref().unwrap_or("<none>"),
            self.after
        )
    }
}

/// Everything one merge call changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Original functions that had a same-named counterpart
    pub matched_functions: usize,
    pub changes: Vec<SlotChange>,
}

impl MergeReport {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes_for<'a>(&'a self, function: &'a str) -> impl Iterator<Item = &'a SlotChange> {
        self.changes.iter().filter(move |c| c.function == function)
    }
}
