//! Pairs Python sources with their annotation files across two trees.

use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A source file and the annotation file that mirrors it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePair {
    /// Path of the source relative to the source root
    pub relative: PathBuf,
    pub source: PathBuf,
    pub annotation: PathBuf,
}

pub struct PairWalker {
    source_root: PathBuf,
    annotation_root: PathBuf,
    annotation_extension: String,
    ignore_patterns: Vec<String>,
}

impl PairWalker {
    pub fn new(source_root: PathBuf, annotation_root: PathBuf) -> Self {
        Self {
            source_root,
            annotation_root,
            annotation_extension: "pyi".to_string(),
            ignore_patterns: vec![],
        }
    }

    pub fn with_annotation_extension(mut self, extension: impl Into<String>) -> Self {
        self.annotation_extension = extension.into();
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Every `.py` file under the source root that has a counterpart,
    /// sorted by relative path.
    pub fn walk(&self) -> Result<Vec<FilePair>> {
        let mut pairs = Vec::new();
        for relative in self.sources()? {
            match self.counterpart(&relative) {
                Some(annotation) => pairs.push(FilePair {
                    source: self.source_root.join(&relative),
                    relative,
                    annotation,
                }),
                None => log::info!("No annotation file for {}", relative.display()),
            }
        }
        Ok(pairs)
    }

    /// Relative paths of the `.py` files that have no counterpart, sorted.
    pub fn unpaired(&self) -> Result<Vec<PathBuf>> {
        Ok(self
            .sources()?
            .into_iter()
            .filter(|relative| self.counterpart(relative).is_none())
            .collect())
    }

    /// Relative paths of every non-ignored `.py` file under the source root.
    fn sources(&self) -> Result<Vec<PathBuf>> {
        let mut sources = Vec::new();
        let walker = WalkBuilder::new(&self.source_root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(&self.source_root)?.to_path_buf();
            if self.should_process(&relative) {
                sources.push(relative);
            }
        }

        sources.sort();
        Ok(sources)
    }

    /// The annotation file for a source, preferring the configured
    /// extension and falling back to a same-named `.py`.
    pub fn counterpart(&self, relative: &Path) -> Option<PathBuf> {
        let mirrored = self.annotation_root.join(relative);
        [
            mirrored.with_extension(&self.annotation_extension),
            mirrored,
        ]
        .into_iter()
        .find(|candidate| candidate.is_file())
    }

    /// `relative` is matched against the ignore globs.
    fn should_process(&self, relative: &Path) -> bool {
        if relative.extension().and_then(|ext| ext.to_str()) != Some("py") {
            return false;
        }

        let path_str = relative.to_string_lossy();
        !self.ignore_patterns.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
        })
    }
}

pub fn find_file_pairs(source_root: &Path, annotation_root: &Path) -> Result<Vec<FilePair>> {
    PairWalker::new(source_root.to_path_buf(), annotation_root.to_path_buf()).walk()
}
