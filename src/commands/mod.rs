//! CLI command implementations for stubmerge operations.
//!
//! Available commands:
//! - **merge**: Overlay annotations from stubs onto sources, file by file or
//!   across two directory trees
//! - **init**: Initialize a new stubmerge configuration file

pub mod init;
pub mod merge;

pub use init::init_config;
pub use merge::{handle_merge, FileReport, MergeConfig, MergeSummary};
