//! End-to-end merge scenarios: parse both sides, merge, print, and compare
//! against the expected source text.

use indoc::indoc;
use pretty_assertions::assert_eq;
use std::path::Path;
use stubmerge::{merge_sources, parse_module, MergedSource, Placeholders, Slot};

struct MergeCase {
    src: &'static str,
    annot: &'static str,
    expected: &'static str,
}

fn run(src: &str, annot: &str) -> MergedSource {
    merge_sources(
        src,
        Path::new("module.py"),
        annot,
        Path::new("module.pyi"),
        &Placeholders::default(),
    )
    .unwrap()
}

fn check(case: &MergeCase) {
    let merged = run(case.src, case.annot);
    assert_eq!(merged.text, case.expected);
    // The printed text must parse to the same tree as the expected source.
    assert_eq!(
        parse_module(&merged.text, Path::new("merged.py")).unwrap(),
        parse_module(case.expected, Path::new("expected.py")).unwrap()
    );
}

#[test]
fn test_return_type_overridden_by_concrete_type() {
    check(&MergeCase {
        src: indoc! {"
            from typing import Any

            def foo(x: int) -> Any:
                return x
        "},
        annot: indoc! {"
            from typing import Any

            def foo(x: int) -> int:
                return x
        "},
        expected: indoc! {"
            from typing import Any

            def foo(x: int) -> int:
                return x
        "},
    });
}

#[test]
fn test_concrete_return_type_not_overridden_by_any() {
    check(&MergeCase {
        src: indoc! {"
            from typing import Any

            def bar(x: int) -> int:
                return x
        "},
        annot: indoc! {"
            from typing import Any

            def bar(x: int) -> Any:
                return x
        "},
        expected: indoc! {"
            from typing import Any

            def bar(x: int) -> int:
                return x
        "},
    });
}

#[test]
fn test_argument_type_overridden() {
    check(&MergeCase {
        src: indoc! {"
            from typing import Any

            def baz(x: Any) -> int:
                return 42
        "},
        annot: indoc! {"
            from typing import Any

            def baz(x: str) -> int:
                return 42
        "},
        expected: indoc! {"
            from typing import Any

            def baz(x: str) -> int:
                return 42
        "},
    });
}

#[test]
fn test_union_candidate_without_placeholder_wins() {
    check(&MergeCase {
        src: indoc! {"
            from typing import Any

            def foo(x: int) -> Any | int:
                return x
        "},
        annot: indoc! {"
            from typing import Any

            def foo(x: int) -> int | str:
                return x
        "},
        expected: indoc! {"
            from typing import Any

            def foo(x: int) -> int | str:
                return x
        "},
    });
}

#[test]
fn test_incomplete_replaced_everywhere() {
    check(&MergeCase {
        src: indoc! {"
            from _typeshed import Incomplete

            def foo(x: Incomplete) -> Incomplete:
                return x
        "},
        annot: indoc! {"
            from _typeshed import Incomplete

            def foo(x: int) -> int:
                return x
        "},
        expected: indoc! {"
            from _typeshed import Incomplete

            def foo(x: int) -> int:
                return x
        "},
    });
}

#[test]
fn test_incomplete_unions_replaced() {
    check(&MergeCase {
        src: indoc! {"
            from _typeshed import Incomplete

            def foo(x: int | Incomplete) -> Incomplete | str:
                return x
        "},
        annot: indoc! {"
            from _typeshed import Incomplete

            def foo(x: int | str) -> str:
                return x
        "},
        expected: indoc! {"
            from _typeshed import Incomplete

            def foo(x: int | str) -> str:
                return x
        "},
    });
}

#[test]
fn test_absent_annotation_loses_to_any() {
    check(&MergeCase {
        src: indoc! {"
            def foo(x):
                return x
        "},
        annot: indoc! {"
            from typing import Any

            def foo(x: Any):
                return x
        "},
        expected: indoc! {"
            def foo(x: Any):
                return x
        "},
    });
}

#[test]
fn test_stub_methods_and_nested_functions() {
    check(&MergeCase {
        src: indoc! {"
            class Cache:
                def get(self, key, default=None):
                    def _miss():  # fallback
                        return default
                    return self._data.get(key) or _miss()

                @staticmethod
                async def warm(*keys, **options) -> Incomplete:
                    ...
        "},
        annot: indoc! {"
            from collections.abc import Iterable

            class Cache:
                def get(self, key: str, default: bytes | None = None) -> bytes | None: ...
                @staticmethod
                async def warm(*keys: str, **options: Any) -> None: ...

            def _miss() -> bytes | None: ...
        "},
        expected: indoc! {"
            class Cache:
                def get(self, key: str, default: bytes | None = None) -> bytes | None:
                    def _miss() -> bytes | None:  # fallback
                        return default
                    return self._data.get(key) or _miss()

                @staticmethod
                async def warm(*keys: str, **options: Any) -> None:
                    ...
        "},
    });
}

#[test]
fn test_keyword_only_parameters_match_by_name() {
    check(&MergeCase {
        src: indoc! {"
            def connect(host, *, timeout=None, retries):
                pass
        "},
        annot: indoc! {"
            def connect(host: str, *, retries: int, timeout: float | None = ...) -> None: ...
        "},
        expected: indoc! {"
            def connect(host: str, *, timeout: float | None = None, retries: int) -> None:
                pass
        "},
    });
}

#[test]
fn test_unmatched_functions_untouched_and_not_injected() {
    let src = indoc! {"
        def only_here(x):
            return x
    "};
    let merged = run(
        src,
        indoc! {"
            def only_there(x: int) -> int: ...
        "},
    );
    assert_eq!(merged.text, src);
    assert_eq!(merged.report.matched_functions, 0);
    assert!(!merged.is_changed());
}

#[test]
fn test_report_lists_changes_in_order() {
    let merged = run(
        "def f(a, b: Any) -> Any: ...\n",
        "def f(a: int, b: str) -> bool: ...\n",
    );

    let slots: Vec<_> = merged.report.changes.iter().map(|c| c.slot.clone()).collect();
    assert_eq!(
        slots,
        vec![
            Slot::Param("a".into()),
            Slot::Param("b".into()),
            Slot::Return
        ]
    );
    assert_eq!(merged.report.changes[0].before, None);
    assert_eq!(merged.report.changes[1].before.as_deref(), Some("Any"));
    assert_eq!(merged.report.changes[2].after, "bool");
}

#[test]
fn test_remerging_is_a_no_op() {
    let src = "def f(a, b: Any) -> Incomplete: ...\n";
    let annot = "def f(a: int, b: list[Any]) -> str | None: ...\n";

    let first = run(src, annot);
    let second = run(&first.text, annot);
    assert_eq!(second.text, first.text);
    assert!(!second.is_changed());
}

#[test]
fn test_long_return_expression_merges_on_worker_sized_stack() {
    let terms = vec!["x"; 6000].join(" + ");
    let src = format!("def total(x) -> Any:\n    return {}\n", terms);
    let expected = format!("def total(x: int) -> int:\n    return {}\n", terms);

    let merged = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || run(&src, "def total(x: int) -> int: ...\n"))
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(merged.text, expected);
}
