//! Annotation merging.
//!
//! [`is_more_informative`] decides, for a single annotation slot, whether the
//! annotation module's type should replace the original's. [`merge`] applies
//! that decision to every parameter and return slot of every function the
//! two modules share by name.

pub mod informative;
pub mod merger;
pub mod placeholders;
pub mod report;
pub mod sources;

pub use informative::{contains_placeholder, is_more_informative};
pub use merger::{merge, merge_with_report, AnnotationIndex, SignatureMerger};
pub use placeholders::Placeholders;
pub use report::{MergeReport, Slot, SlotChange};
pub use sources::{merge_sources, MergedSource};
