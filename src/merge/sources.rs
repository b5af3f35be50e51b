//! Text-to-text merging: parse both sides, merge, print.

use super::merger::merge_with_report;
use super::placeholders::Placeholders;
use super::report::MergeReport;
use crate::core::{Result, ResultExt};
use crate::io::splice::splice;
use crate::parser::parse_module;
use std::path::Path;
use tracing::debug_span;

/// Result of merging one source text with its annotation text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedSource {
    pub text: String,
    pub report: MergeReport,
}

impl MergedSource {
    pub fn is_changed(&self) -> bool {
        !self.report.is_unchanged()
    }
}

/// Merge the annotations in `annotation_text` into `source_text`.
///
/// The paths are only used in error messages and log spans.
pub fn merge_sources(
    source_text: &str,
    source_path: &Path,
    annotation_text: &str,
    annotation_path: &Path,
    placeholders: &Placeholders,
) -> Result<MergedSource> {
    let _span = debug_span!("merge", file = %source_path.display()).entered();

    let original = parse_module(source_text, source_path)
        .context(format!("Reading {}", source_path.display()))?;
    let annotation = parse_module(annotation_text, annotation_path)
        .context(format!("Reading {}", annotation_path.display()))?;

    let (merged, report) = merge_with_report(&original, &annotation, placeholders);
    let text = splice(source_text, &original, &merged);

    Ok(MergedSource { text, report })
}
