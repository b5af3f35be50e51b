//! Writes merged annotations back into the original source text.
//!
//! Only annotation slots whose type differs between the original and merged
//! trees are touched. Everything else, including comments, formatting and
//! function bodies, is copied through byte for byte.

use crate::core::{Anchor, Decl, FunctionDef, Module, TypeExpr};
use std::ops::Range;

/// A single replacement in the original source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

/// Render `merged` by patching `source`, which `original` was parsed from.
///
/// `merged` must have the shape of `original`, as produced by
/// [`crate::merge::merge`].
pub fn splice(source: &str, original: &Module, merged: &Module) -> String {
    let mut edits = Vec::new();
    collect_edits(&original.body, &merged.body, &mut edits);
    apply_edits(source, edits)
}

/// Apply non-overlapping edits, last first so earlier offsets stay valid.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut output = source.to_string();
    for edit in edits {
        output.replace_range(edit.range, &edit.text);
    }
    output
}

fn collect_edits(original: &[Decl], merged: &[Decl], edits: &mut Vec<Edit>) {
    for (before, after) in original.iter().zip(merged) {
        if let (Decl::Function(before), Decl::Function(after)) = (before, after) {
            function_edits(before, after, edits);
        }
        collect_edits(before.body(), after.body(), edits);
    }
}

fn function_edits(original: &FunctionDef, merged: &FunctionDef, edits: &mut Vec<Edit>) {
    for (before, after) in original.params.iter().zip(&merged.params) {
        edits.extend(slot_edit(
            &before.anchor,
            before.annotation.as_ref(),
            after.annotation.as_ref(),
        ));
    }
    edits.extend(slot_edit(
        &original.returns_anchor,
        original.returns.as_ref(),
        merged.returns.as_ref(),
    ));
}

fn slot_edit(anchor: &Anchor, before: Option<&TypeExpr>, after: Option<&TypeExpr>) -> Option<Edit> {
    let after = after?;
    if before == Some(after) {
        return None;
    }
    Some(Edit {
        range: anchor.range.clone(),
        text: anchor.render(after),
    })
}
