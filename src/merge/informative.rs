//! Decides whether a candidate annotation should replace the current one.

use super::placeholders::Placeholders;
use crate::core::TypeExpr;

/// Returns true when `candidate` should replace `current`.
///
/// Absence never wins and anything beats absence. Otherwise the candidate
/// wins unless a placeholder name appears anywhere inside it. `current` is
/// never inspected, so two placeholder-only expressions never displace each
/// other in either direction.
pub fn is_more_informative(
    candidate: Option<&TypeExpr>,
    current: Option<&TypeExpr>,
    placeholders: &Placeholders,
) -> bool {
    match (candidate, current) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(candidate), Some(_)) => !contains_placeholder(candidate, placeholders),
    }
}

/// True if any bare name in `expr` is a placeholder.
pub fn contains_placeholder(expr: &TypeExpr, placeholders: &Placeholders) -> bool {
    expr.names().any(|name| placeholders.contains(name))
}
