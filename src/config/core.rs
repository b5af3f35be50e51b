use serde::{Deserialize, Serialize};

use crate::merge::Placeholders;

/// Root configuration structure for stubmerge
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StubmergeConfig {
    /// Placeholder vocabulary
    #[serde(default)]
    pub placeholders: Option<PlaceholderConfig>,

    /// Directory mode file pairing
    #[serde(default)]
    pub files: Option<FilesConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaceholderConfig {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilesConfig {
    /// Extension of annotation files, without the dot
    #[serde(default = "default_annotation_extension")]
    pub annotation_extension: String,

    /// Glob patterns of source files to skip
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            annotation_extension: default_annotation_extension(),
            ignore: vec![],
        }
    }
}

pub fn default_annotation_extension() -> String {
    "pyi".to_string()
}

impl StubmergeConfig {
    pub fn placeholders(&self) -> Placeholders {
        self.placeholders
            .as_ref()
            .map(|config| Placeholders::from_config(&config.names))
            .unwrap_or_default()
    }

    pub fn files(&self) -> FilesConfig {
        self.files.clone().unwrap_or_default()
    }
}
