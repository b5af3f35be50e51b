//! Tree-sitter parser integration for Python sources and stubs
//!
//! Builds the declaration tree in [`crate::core::ast`] from a tree-sitter
//! parse. Only function and class declarations are kept; every annotation
//! slot records where it sits in the source so it can be rewritten later.

use super::{first_error, node_line, node_text};
use crate::core::{
    Anchor, AnchorStyle, ClassDef, Decl, Error, FunctionDef, Module, Param, ParamKind, Result,
    TypeExpr,
};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

fn parse_tree(content: &str, path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| anyhow::anyhow!("Failed to set tree-sitter language: {}", e))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| Error::parse(path, 0, 0, "Parser produced no tree"))?;

    if let Some(node) = first_error(tree.root_node()) {
        let position = node.start_position();
        let message = if node.is_missing() {
            format!("missing `{}`", node.kind())
        } else {
            format!("unexpected `{}`", node_text(&node, content).trim())
        };
        return Err(Error::parse(
            path,
            position.row + 1,
            position.column + 1,
            message,
        ));
    }

    Ok(tree)
}

/// Parse Python source into a [`Module`].
pub fn parse_module(content: &str, path: &Path) -> Result<Module> {
    let tree = parse_tree(content, path)?;
    let body = collect_decls(tree.root_node(), content);
    Ok(Module::new(body))
}

/// Parse a single annotation expression such as `int | None`.
pub fn parse_type(annotation: &str) -> Result<TypeExpr> {
    let wrapped = format!("def _() -> {}: ...\n", annotation);
    let tree = parse_tree(&wrapped, Path::new("<annotation>"))?;

    let return_type = tree
        .root_node()
        .named_child(0)
        .filter(|node| node.kind() == "function_definition")
        .and_then(|node| node.child_by_field_name("return_type"))
        .map(|node| type_expr(node, &wrapped));
    return_type.ok_or_else(|| Error::parse("<annotation>", 1, 1, "not a type expression"))
}

/// Statements whose blocks may hold a `def` or `class`. Expressions are
/// never descended into.
const COMPOUND_STATEMENTS: &[&str] = &[
    "block",
    "if_statement",
    "elif_clause",
    "else_clause",
    "try_statement",
    "except_clause",
    "except_group_clause",
    "finally_clause",
    "with_statement",
    "for_statement",
    "while_statement",
    "match_statement",
    "case_clause",
];

/// Declarations under `node`, hoisting those nested in compound statements.
fn collect_decls(node: Node, source: &str) -> Vec<Decl> {
    let mut decls = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "function_definition" | "class_definition" => decls.extend(declaration(child, source)),
            "decorated_definition" => decls.extend(
                child
                    .child_by_field_name("definition")
                    .and_then(|definition| declaration(definition, source)),
            ),
            kind if COMPOUND_STATEMENTS.contains(&kind) => {
                decls.extend(collect_decls(child, source))
            }
            _ => {}
        }
    }
    decls
}

fn declaration(node: Node, source: &str) -> Option<Decl> {
    match node.kind() {
        "function_definition" => Some(Decl::Function(function_def(node, source))),
        "class_definition" => Some(Decl::Class(class_def(node, source))),
        _ => None,
    }
}

fn body_decls(node: Node, source: &str) -> Vec<Decl> {
    node.child_by_field_name("body")
        .map(|body| collect_decls(body, source))
        .unwrap_or_default()
}

fn class_def(node: Node, source: &str) -> ClassDef {
    ClassDef {
        name: field_text(node, "name", source),
        line: node_line(&node),
        body: body_decls(node, source),
    }
}

fn function_def(node: Node, source: &str) -> FunctionDef {
    let is_async = node.child(0).is_some_and(|first| first.kind() == "async");
    let parameters = node.child_by_field_name("parameters");
    let params = parameters
        .map(|parameters| parse_params(parameters, source))
        .unwrap_or_default();

    let (returns, returns_anchor) = match node.child_by_field_name("return_type") {
        Some(return_type) => (
            Some(type_expr(return_type, source)),
            Anchor::new(
                return_type.start_byte()..return_type.end_byte(),
                AnchorStyle::Annotation,
            ),
        ),
        None => {
            let after_params = parameters.map_or(node.end_byte(), |p| p.end_byte());
            (
                None,
                Anchor::new(after_params..after_params, AnchorStyle::Return),
            )
        }
    };

    FunctionDef {
        name: field_text(node, "name", source),
        is_async,
        params,
        returns,
        returns_anchor,
        line: node_line(&node),
        body: body_decls(node, source),
    }
}

fn parse_params(node: Node, source: &str) -> Vec<Param> {
    let mut params = Vec::new();
    let mut keyword_only = false;
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        let positional_kind = if keyword_only {
            ParamKind::KeywordOnly
        } else {
            ParamKind::Positional
        };

        let param = match child.kind() {
            "identifier" => Some(Param {
                name: node_text(&child, source).to_string(),
                kind: positional_kind,
                annotation: None,
                anchor: Anchor::new(child.end_byte()..child.end_byte(), AnchorStyle::BareParam),
            }),
            "default_parameter" => child.child_by_field_name("name").map(|name| {
                let gap_end = child
                    .child_by_field_name("value")
                    .map_or(name.end_byte(), |value| value.start_byte());
                Param {
                    name: node_text(&name, source).to_string(),
                    kind: positional_kind,
                    annotation: None,
                    anchor: Anchor::new(name.end_byte()..gap_end, AnchorStyle::DefaultParam),
                }
            }),
            "typed_default_parameter" => {
                annotated_param(child, field_text(child, "name", source), positional_kind, source)
            }
            "typed_parameter" => {
                let target = child.named_child(0);
                let (name, kind) = match target {
                    Some(target) if target.kind() == "list_splat_pattern" => {
                        (splat_name(target, source), ParamKind::VarPositional)
                    }
                    Some(target) if target.kind() == "dictionary_splat_pattern" => {
                        (splat_name(target, source), ParamKind::VarKeyword)
                    }
                    Some(target) => (node_text(&target, source).to_string(), positional_kind),
                    None => (String::new(), positional_kind),
                };
                annotated_param(child, name, kind, source)
            }
            "list_splat_pattern" => Some(bare_splat(child, ParamKind::VarPositional, source)),
            "dictionary_splat_pattern" => Some(bare_splat(child, ParamKind::VarKeyword, source)),
            "keyword_separator" => {
                keyword_only = true;
                None
            }
            _ => None,
        };

        if let Some(param) = param {
            if param.kind == ParamKind::VarPositional {
                keyword_only = true;
            }
            params.push(param);
        }
    }

    params
}

fn annotated_param(node: Node, name: String, kind: ParamKind, source: &str) -> Option<Param> {
    let annotation = node.child_by_field_name("type")?;
    Some(Param {
        name,
        kind,
        annotation: Some(type_expr(annotation, source)),
        anchor: Anchor::new(
            annotation.start_byte()..annotation.end_byte(),
            AnchorStyle::Annotation,
        ),
    })
}

fn bare_splat(node: Node, kind: ParamKind, source: &str) -> Param {
    Param {
        name: splat_name(node, source),
        kind,
        annotation: None,
        anchor: Anchor::new(node.end_byte()..node.end_byte(), AnchorStyle::BareParam),
    }
}

fn splat_name(node: Node, source: &str) -> String {
    node.named_child(0)
        .map(|name| node_text(&name, source).to_string())
        .unwrap_or_default()
}

fn field_text(node: Node, field: &str, source: &str) -> String {
    node.child_by_field_name(field)
        .map(|child| node_text(&child, source).to_string())
        .unwrap_or_default()
}

fn named_children_of(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}

/// Convert a `type` node, or any expression inside one, to a [`TypeExpr`].
fn type_expr(node: Node, source: &str) -> TypeExpr {
    let other = || TypeExpr::Other(node_text(&node, source).to_string());

    match node.kind() {
        "type" | "parenthesized_expression" => match named_children_of(node).first() {
            Some(inner) => type_expr(*inner, source),
            None => other(),
        },
        "identifier" => TypeExpr::Name(node_text(&node, source).to_string()),
        "none" => TypeExpr::NoneLiteral,
        "binary_operator" => {
            let is_union = node
                .child_by_field_name("operator")
                .is_some_and(|op| op.kind() == "|");
            match (
                is_union,
                node.child_by_field_name("left"),
                node.child_by_field_name("right"),
            ) {
                (true, Some(left), Some(right)) => union(left, right, source),
                _ => other(),
            }
        }
        "union_type" => match named_children_of(node).as_slice() {
            [left, right] => union(*left, *right, source),
            _ => other(),
        },
        "attribute" => match (
            node.child_by_field_name("object"),
            node.child_by_field_name("attribute"),
        ) {
            (Some(object), Some(attr)) => TypeExpr::Attribute {
                value: Box::new(type_expr(object, source)),
                attr: node_text(&attr, source).to_string(),
            },
            _ => other(),
        },
        "member_type" => match named_children_of(node).as_slice() {
            [object, attr] => TypeExpr::Attribute {
                value: Box::new(type_expr(*object, source)),
                attr: node_text(attr, source).to_string(),
            },
            _ => other(),
        },
        "subscript" => match node.child_by_field_name("value") {
            Some(value) => {
                let mut cursor = node.walk();
                let args = node
                    .children_by_field_name("subscript", &mut cursor)
                    .map(|arg| type_expr(arg, source))
                    .collect();
                TypeExpr::Subscript {
                    value: Box::new(type_expr(value, source)),
                    args,
                }
            }
            None => other(),
        },
        "generic_type" => match named_children_of(node).as_slice() {
            [value, parameters] if parameters.kind() == "type_parameter" => TypeExpr::Subscript {
                value: Box::new(type_expr(*value, source)),
                args: named_children_of(*parameters)
                    .into_iter()
                    .map(|arg| type_expr(arg, source))
                    .collect(),
            },
            _ => other(),
        },
        "list" => TypeExpr::List(
            named_children_of(node)
                .into_iter()
                .map(|item| type_expr(item, source))
                .collect(),
        ),
        _ => other(),
    }
}

fn union(left: Node, right: Node, source: &str) -> TypeExpr {
    TypeExpr::Union(
        Box::new(type_expr(left, source)),
        Box::new(type_expr(right, source)),
    )
}
