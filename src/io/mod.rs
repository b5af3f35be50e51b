pub mod splice;
pub mod walker;

pub use splice::{apply_edits, splice, Edit};
pub use walker::{find_file_pairs, FilePair, PairWalker};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn dir_exists(path: &Path) -> bool {
    path.exists() && path.is_dir()
}
