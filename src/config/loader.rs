use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::StubmergeConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".stubmerge.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<StubmergeConfig> {
    let mut config = toml::from_str::<StubmergeConfig>(contents)?;

    if let Some(ref mut files) = config.files {
        let trimmed = files.annotation_extension.trim_start_matches('.');
        if trimmed.is_empty() {
            return Err(Error::Configuration(
                "files.annotation_extension must not be empty".into(),
            ));
        }
        files.annotation_extension = trimmed.to_string();
    }

    Ok(config)
}

/// Load an explicitly requested config file; errors are not swallowed.
pub fn load_config_from(path: &Path) -> Result<StubmergeConfig> {
    let contents = read_config_file(path).map_err(|source| Error::FileSystem {
        message: format!("Failed to read {}", path.display()),
        path: Some(path.to_path_buf()),
        source: Some(source),
    })?;
    parse_and_validate_config(&contents)
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<StubmergeConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.stubmerge.toml`.
pub fn find_config(start: PathBuf) -> StubmergeConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            StubmergeConfig::default()
        })
}

pub fn load_config() -> StubmergeConfig {
    match std::env::current_dir() {
        Ok(dir) => find_config(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            StubmergeConfig::default()
        }
    }
}
