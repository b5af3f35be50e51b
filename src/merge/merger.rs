//! Overlays annotations from one module onto the signatures of another.

use super::informative::is_more_informative;
use super::placeholders::Placeholders;
use super::report::{MergeReport, Slot, SlotChange};
use crate::core::{ClassDef, Decl, FunctionDef, Module, Param, ParamKind, TypeExpr};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Name-keyed lookup over every declaration in an annotation module.
///
/// Functions and classes are indexed at any depth. When a name occurs more
/// than once the declaration that comes last in source order wins.
#[derive(Debug, Default)]
pub struct AnnotationIndex<'a> {
    functions: HashMap<&'a str, &'a FunctionDef>,
    classes: HashMap<&'a str, &'a ClassDef>,
}

impl<'a> AnnotationIndex<'a> {
    pub fn build(module: &'a Module) -> Self {
        let mut index = Self::default();
        for decl in module.declarations() {
            match decl {
                Decl::Function(func) => {
                    if index.functions.insert(&func.name, func).is_some() {
                        debug!(
                            "Function `{}` declared more than once; using line {}",
                            func.name, func.line
                        );
                    }
                }
                Decl::Class(class) => {
                    index.classes.insert(&class.name, class);
                }
            }
        }
        index
    }

    pub fn function(&self, name: &str) -> Option<&'a FunctionDef> {
        self.functions.get(name).copied()
    }

    /// Class lookup. No rewrite rule consumes classes yet; the merger only
    /// recurses through them.
    pub fn class(&self, name: &str) -> Option<&'a ClassDef> {
        self.classes.get(name).copied()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}

/// Merge `annotation` into `original`, returning the merged module.
pub fn merge(original: &Module, annotation: &Module, placeholders: &Placeholders) -> Module {
    merge_with_report(original, annotation, placeholders).0
}

/// Like [`merge`], also returning a record of every slot that changed.
pub fn merge_with_report(
    original: &Module,
    annotation: &Module,
    placeholders: &Placeholders,
) -> (Module, MergeReport) {
    let index = AnnotationIndex::build(annotation);
    debug!(
        "Indexed {} functions and {} classes from annotations",
        index.function_count(),
        index.class_count()
    );
    let mut merger = SignatureMerger::new(index, placeholders);
    let body = merger.merge_decls(&original.body);
    (Module::new(body), merger.into_report())
}

/// Rebuilds a module declaration by declaration, overlaying annotations
/// from the index where the comparator favors them.
pub struct SignatureMerger<'a> {
    index: AnnotationIndex<'a>,
    placeholders: &'a Placeholders,
    report: MergeReport,
}

impl<'a> SignatureMerger<'a> {
    pub fn new(index: AnnotationIndex<'a>, placeholders: &'a Placeholders) -> Self {
        Self {
            index,
            placeholders,
            report: MergeReport::default(),
        }
    }

    pub fn into_report(self) -> MergeReport {
        self.report
    }

    pub fn merge_decls(&mut self, decls: &[Decl]) -> Vec<Decl> {
        decls
            .iter()
            .map(|decl| match decl {
                Decl::Function(func) => Decl::Function(self.merge_function(func)),
                Decl::Class(class) => Decl::Class(ClassDef {
                    name: class.name.clone(),
                    line: class.line,
                    body: self.merge_decls(&class.body),
                }),
            })
            .collect()
    }

    fn merge_function(&mut self, func: &FunctionDef) -> FunctionDef {
        let mut merged = FunctionDef {
            name: func.name.clone(),
            is_async: func.is_async,
            params: func.params.clone(),
            returns: func.returns.clone(),
            returns_anchor: func.returns_anchor.clone(),
            line: func.line,
            body: self.merge_decls(&func.body),
        };

        match self.index.function(&func.name) {
            Some(counterpart) => {
                self.report.matched_functions += 1;
                self.overlay(&mut merged, counterpart);
            }
            None => trace!("No annotation counterpart for `{}`", func.name),
        }

        merged
    }

    fn overlay(&mut self, target: &mut FunctionDef, counterpart: &FunctionDef) {
        for (i, candidate) in pair_params(&target.params, counterpart) {
            let param = &mut target.params[i];
            if let Some(change) = self.decide(
                &target.name,
                target.line,
                Slot::Param(param.name.clone()),
                candidate.annotation.as_ref(),
                &mut param.annotation,
            ) {
                self.report.changes.push(change);
            }
        }

        if let Some(change) = self.decide(
            &target.name,
            target.line,
            Slot::Return,
            counterpart.returns.as_ref(),
            &mut target.returns,
        ) {
            self.report.changes.push(change);
        }
    }

    fn decide(
        &self,
        function: &str,
        line: usize,
        slot: Slot,
        candidate: Option<&TypeExpr>,
        current: &mut Option<TypeExpr>,
    ) -> Option<SlotChange> {
        if !is_more_informative(candidate, current.as_ref(), self.placeholders) {
            return None;
        }
        let candidate = candidate?;
        if current.as_ref() == Some(candidate) {
            return None;
        }

        let change = SlotChange {
            function: function.to_string(),
            line,
            slot,
            before: current.as_ref().map(ToString::to_string),
            after: candidate.to_string(),
        };
        debug!("{}", change);
        *current = Some(candidate.clone());
        Some(change)
    }
}

/// Pairs each original parameter index with the annotation parameter it
/// takes its candidate from.
///
/// Positional parameters are zipped and stop at the shorter list.
/// Keyword-only parameters pair by name. `*args` and `**kwargs` pair with
/// their counterparts whatever they are called.
fn pair_params<'p>(original: &[Param], annotation: &'p FunctionDef) -> Vec<(usize, &'p Param)> {
    let mut annotation_positional = annotation.params_of_kind(ParamKind::Positional);

    let mut pairs = Vec::new();
    for (i, param) in original.iter().enumerate() {
        let candidate = match param.kind {
            ParamKind::Positional => annotation_positional.next(),
            ParamKind::KeywordOnly => annotation
                .param(&param.name)
                .filter(|p| p.kind == ParamKind::KeywordOnly),
            ParamKind::VarPositional | ParamKind::VarKeyword => {
                annotation.params_of_kind(param.kind).next()
            }
        };
        if let Some(candidate) = candidate {
            pairs.push((i, candidate));
        }
    }
    pairs
}
