use std::borrow::Cow;
use std::fs;

use widget_core::style_guard::{needs_rewrite, rewrite_stylesheet};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn preflight_matches_golden() {
    let input = fs::read_to_string(fixture_path("preflight.css")).expect("Không đọc được CSS mẫu");
    let expected =
        fs::read_to_string(fixture_path("preflight.guarded.css")).expect("Không đọc được golden CSS");

    assert_eq!(rewrite_stylesheet(&input), expected);
}

#[test]
fn rewriting_twice_changes_nothing() {
    let input = fs::read_to_string(fixture_path("preflight.css")).expect("Không đọc được CSS mẫu");
    let once = rewrite_stylesheet(&input).into_owned();
    let twice = rewrite_stylesheet(&once);

    assert!(matches!(twice, Cow::Borrowed(_)));
    assert_eq!(twice, once);
}

#[test]
fn root_is_dropped_and_other_declarations_kept() {
    let css = "a{color:red}\nhtml, :host {\n  color: blue;\n  font-family: Inter, sans-serif;\n}\n.x{margin:0}";
    let out = rewrite_stylesheet(css);

    assert_eq!(out, "a{color:red}\n:host {\n  color: blue;\n}\n.x{margin:0}");
    assert!(!out.contains("html"));
    assert!(out.starts_with("a{color:red}\n"));
    assert!(out.ends_with("\n.x{margin:0}"));
}

#[test]
fn selector_order_does_not_matter() {
    let out = rewrite_stylesheet(":host,html{font-family:serif;line-height:2}");
    assert_eq!(out, ":host{line-height:2}");
}

#[test]
fn quoted_and_nested_values_are_not_split() {
    let css = r#"html,:host{font-family:"A;B",var(--f,serif);content:"x;y"}"#;
    assert_eq!(rewrite_stylesheet(css), r#":host{content:"x;y"}"#);
}

#[test]
fn rule_after_at_statement_keeps_statement() {
    let css = "@import url(a.css);html,:host{font-family:x;color:red}";
    assert_eq!(
        rewrite_stylesheet(css),
        "@import url(a.css);:host{color:red}"
    );
}

#[test]
fn unmatched_shapes_are_left_alone() {
    let samples = [
        "html{font-family:serif}",
        ":host{font-family:serif}",
        "html,:host{line-height:1.5}",
        "html.dark,:host{font-family:serif}",
        "",
        "not css at all {",
    ];
    for css in samples {
        assert!(matches!(rewrite_stylesheet(css), Cow::Borrowed(_)), "{css}");
        assert!(!needs_rewrite(css), "{css}");
    }
}

#[test]
fn needs_rewrite_detects_pattern() {
    assert!(needs_rewrite("html,:host{font-family:serif}"));
}

#[test]
fn second_install_is_refused() {
    use widget_core::style_guard::{guard_active, GUARD_MARKER_VALUE};

    assert!(!guard_active(false, None));
    // Same loader copy, and another copy that only left its marker.
    assert!(guard_active(true, Some(GUARD_MARKER_VALUE)));
    assert!(guard_active(false, Some(GUARD_MARKER_VALUE)));
}
