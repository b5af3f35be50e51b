//! Declaration tree shared by the parser, the merger and the printer.
//!
//! Only the parts of a Python module that take part in a merge are modelled:
//! function and class declarations, parameter lists and annotations. Every
//! annotation slot carries an [`Anchor`] into the source it was parsed from
//! so the printer can rewrite that slot and nothing else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A type annotation as written in source.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeExpr {
    /// Bare name: `int`, `Any`, `Incomplete`
    Name(String),
    /// `left | right`, nested to the left for longer chains
    Union(Box<TypeExpr>, Box<TypeExpr>),
    /// Dotted access: `typing.Any`
    Attribute { value: Box<TypeExpr>, attr: String },
    /// Generic form: `list[int]`, `dict[str, Any]`
    Subscript {
        value: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    /// Bracketed list inside a subscript: the `[int]` of `Callable[[int], str]`
    List(Vec<TypeExpr>),
    NoneLiteral,
    /// Anything else, kept verbatim
    Other(String),
}

impl TypeExpr {
    pub fn name(name: impl Into<String>) -> Self {
        TypeExpr::Name(name.into())
    }

    /// Left-associative union of two or more members.
    ///
    /// Returns `None` for an empty iterator.
    pub fn union_of<I>(members: I) -> Option<Self>
    where
        I: IntoIterator<Item = TypeExpr>,
    {
        members
            .into_iter()
            .reduce(|left, right| TypeExpr::Union(Box::new(left), Box::new(right)))
    }

    /// Pre-order iterator over this expression and every sub-expression.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Every bare name in the expression, in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.walk().filter_map(|expr| match expr {
            TypeExpr::Name(name) => Some(name.as_str()),
            _ => None,
        })
    }

    fn children(&self) -> Vec<&TypeExpr> {
        match self {
            TypeExpr::Union(left, right) => vec![left.as_ref(), right.as_ref()],
            TypeExpr::Attribute { value, .. } => vec![value.as_ref()],
            TypeExpr::Subscript { value, args } => {
                std::iter::once(value.as_ref()).chain(args.iter()).collect()
            }
            TypeExpr::List(items) => items.iter().collect(),
            TypeExpr::Name(_) | TypeExpr::NoneLiteral | TypeExpr::Other(_) => vec![],
        }
    }
}

/// Iterator returned by [`TypeExpr::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a TypeExpr>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a TypeExpr;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children().into_iter().rev());
        Some(next)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => write!(f, "{}", name),
            TypeExpr::Union(left, right) => write!(f, "{} | {}", left, right),
            TypeExpr::Attribute { value, attr } => write!(f, "{}.{}", value, attr),
            TypeExpr::Subscript { value, args } => {
                write!(f, "{}[", value)?;
                write_comma_separated(f, args)?;
                write!(f, "]")
            }
            TypeExpr::List(items) => {
                write!(f, "[")?;
                write_comma_separated(f, items)?;
                write!(f, "]")
            }
            TypeExpr::NoneLiteral => write!(f, "None"),
            TypeExpr::Other(text) => write!(f, "{}", text),
        }
    }
}

fn write_comma_separated(f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// How the printer renders a new annotation into an anchor's range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorStyle {
    /// The range holds an existing annotation; replace it with `T`
    Annotation,
    /// Empty range right after an unannotated parameter name; insert `: T`
    BareParam,
    /// Range between a parameter name and its default; becomes `: T = `
    DefaultParam,
    /// Empty range right after the closing `)`; insert ` -> T`
    Return,
}

/// Location of an annotation slot in the source a tree was parsed from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub range: Range<usize>,
    pub style: AnchorStyle,
}

impl Anchor {
    pub fn new(range: Range<usize>, style: AnchorStyle) -> Self {
        Self { range, style }
    }

    /// Anchor for trees built by hand rather than parsed.
    pub fn detached() -> Self {
        Self {
            range: 0..0,
            style: AnchorStyle::Annotation,
        }
    }

    /// Source text that puts `annotation` into this slot.
    pub fn render(&self, annotation: &TypeExpr) -> String {
        match self.style {
            AnchorStyle::Annotation => annotation.to_string(),
            AnchorStyle::BareParam => format!(": {}", annotation),
            AnchorStyle::DefaultParam => format!(": {} = ", annotation),
            AnchorStyle::Return => format!(" -> {}", annotation),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    /// Matched by position (includes positional-only parameters)
    Positional,
    /// `*args`
    VarPositional,
    /// Declared after `*` or `*args`, matched by name
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub annotation: Option<TypeExpr>,
    pub anchor: Anchor,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: ParamKind, annotation: Option<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            kind,
            annotation,
            anchor: Anchor::detached(),
        }
    }

    pub fn positional(name: impl Into<String>, annotation: Option<TypeExpr>) -> Self {
        Self::new(name, ParamKind::Positional, annotation)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub is_async: bool,
    pub params: Vec<Param>,
    pub returns: Option<TypeExpr>,
    pub returns_anchor: Anchor,
    /// 1-indexed line of the `def` keyword
    pub line: usize,
    pub body: Vec<Decl>,
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, params: Vec<Param>, returns: Option<TypeExpr>) -> Self {
        Self {
            name: name.into(),
            is_async: false,
            params,
            returns,
            returns_anchor: Anchor::detached(),
            line: 0,
            body: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Vec<Decl>) -> Self {
        self.body = body;
        self
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn params_of_kind(&self, kind: ParamKind) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(move |p| p.kind == kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub line: usize,
    pub body: Vec<Decl>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, body: Vec<Decl>) -> Self {
        Self {
            name: name.into(),
            line: 0,
            body,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decl {
    Function(FunctionDef),
    Class(ClassDef),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Function(func) => &func.name,
            Decl::Class(class) => &class.name,
        }
    }

    pub fn body(&self) -> &[Decl] {
        match self {
            Decl::Function(func) => &func.body,
            Decl::Class(class) => &class.body,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Decl>,
}

impl Module {
    pub fn new(body: Vec<Decl>) -> Self {
        Self { body }
    }

    /// Every declaration at any depth, pre-order, in source order.
    pub fn declarations(&self) -> Vec<&Decl> {
        fn visit<'a>(decls: &'a [Decl], out: &mut Vec<&'a Decl>) {
            for decl in decls {
                out.push(decl);
                visit(decl.body(), out);
            }
        }

        let mut out = Vec::new();
        visit(&self.body, &mut out);
        out
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.declarations().into_iter().filter_map(|decl| match decl {
            Decl::Function(func) => Some(func),
            Decl::Class(_) => None,
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.declarations().into_iter().filter_map(|decl| match decl {
            Decl::Class(class) => Some(class),
            Decl::Function(_) => None,
        })
    }

    /// First function with this name at any depth.
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions().find(|f| f.name == name)
    }
}
