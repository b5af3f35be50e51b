pub mod ast;
pub mod errors;

pub use ast::{
    Anchor, AnchorStyle, ClassDef, Decl, FunctionDef, Module, Param, ParamKind, TypeExpr,
};
pub use errors::{Error, Result, ResultExt};
