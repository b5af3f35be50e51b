//! Merge type annotations from stubs into Python sources.
//!
//! For every function that appears in both an original module and an
//! annotation module (a `.pyi` stub or a re-annotated copy), each parameter
//! and return annotation is replaced when the annotation module's type is
//! more informative. Placeholder names such as `Any` and `Incomplete` never
//! displace a real annotation.
//!
//! ```rust,ignore
//! use stubmerge::{merge_sources, Placeholders};
//! use std::path::Path;
//!
//! let merged = merge_sources(
//!     "def f(x) -> Any: ...\n",
//!     Path::new("f.py"),
//!     "def f(x: int) -> str: ...\n",
//!     Path::new("f.pyi"),
//!     &Placeholders::default(),
//! )?;
//! assert_eq!(merged.text, "def f(x: int) -> str: ...\n");
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod merge;
pub mod parser;

pub use crate::core::{
    ClassDef, Decl, Error, FunctionDef, Module, Param, ParamKind, Result, TypeExpr,
};

pub use crate::merge::{
    is_more_informative, merge, merge_sources, merge_with_report, MergeReport, MergedSource,
    Placeholders, Slot, SlotChange,
};

pub use crate::parser::{parse_module, parse_type};

pub use crate::io::splice;
