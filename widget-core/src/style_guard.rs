//! Style Isolation Guard, string half: rewrites stylesheet text injected by the
//! widget bundle so it no longer targets the host page's `<html>` element.
//!
//! The bundle's CSS preflight emits a rule shaped like
//! `html,:host{line-height:1.5;...;font-family:...}`. Such a rule is rewritten to
//! `:host{line-height:1.5;...}`: the root selector goes away and so does its
//! font-family declaration. Every other byte of the stylesheet is left alone.
//! Text that does not contain the pattern comes back unchanged.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Attribute set on `<html>` once the guard is installed on a page.
pub const GUARD_MARKER_ATTRIBUTE: &str = "data-ep-style-guard";
pub const GUARD_MARKER_VALUE: &str = "active";

/// Whether a page already has a guard, from this copy of the loader
/// (`installed_here`) or from any other one (the root marker attribute).
/// A second install must patch nothing.
pub fn guard_active(installed_here: bool, root_marker: Option<&str>) -> bool {
    installed_here || root_marker.is_some()
}

const ROOT_SELECTOR: &str = "html";
const SCOPE_SELECTOR: &str = ":host";
const FONT_FAMILY: &str = "font-family";

fn rule_regex() -> &'static Regex {
    static RULE_REGEX: OnceLock<Regex> = OnceLock::new();
    // Innermost `selector { declarations }` blocks, so rules nested in
    // @media/@layer are matched on their own.
    RULE_REGEX.get_or_init(|| {
        Regex::new(r"(?P<selector>[^{}]+)\{(?P<body>[^{}]*)\}").expect("valid rule regex")
    })
}

/// Returns the guarded stylesheet, borrowing the input when nothing matched.
pub fn rewrite_stylesheet(css: &str) -> Cow<'_, str> {
    if !css.contains(SCOPE_SELECTOR) || !css.contains(ROOT_SELECTOR) {
        return Cow::Borrowed(css);
    }
    let rewritten = rule_regex().replace_all(css, |caps: &Captures<'_>| {
        let whole = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let selector = caps.name("selector").map(|m| m.as_str()).unwrap_or_default();
        let body = caps.name("body").map(|m| m.as_str()).unwrap_or_default();
        rewrite_rule(selector, body).unwrap_or_else(|| whole.to_string())
    });
    match rewritten {
        Cow::Owned(out) if out != css => Cow::Owned(out),
        _ => Cow::Borrowed(css),
    }
}

/// True if `css` contains a rule the guard would rewrite.
pub fn needs_rewrite(css: &str) -> bool {
    matches!(rewrite_stylesheet(css), Cow::Owned(_))
}

fn rewrite_rule(prelude: &str, body: &str) -> Option<String> {
    // The captured prelude may still carry an earlier statement (`@import ...;`)
    // or a comment; only the text after them is the selector list.
    let split_at = [
        prelude.rfind(';').map(|idx| idx + 1),
        prelude.rfind("*/").map(|idx| idx + 2),
    ]
    .into_iter()
    .flatten()
    .max()
    .unwrap_or(0);
    let (head, selector) = prelude.split_at(split_at);

    let core = selector.trim();
    if core.starts_with('@') {
        return None;
    }
    let leading = &selector[..selector.len() - selector.trim_start().len()];
    let trailing = &selector[selector.trim_end().len()..];

    let selectors: Vec<&str> = core.split(',').map(str::trim).collect();
    let targets_root = selectors.iter().any(|s| *s == ROOT_SELECTOR);
    let targets_scope = selectors.iter().any(|s| *s == SCOPE_SELECTOR);
    if !targets_root || !targets_scope {
        return None;
    }

    let declarations = split_declarations(body);
    if !declarations.iter().any(|decl| is_font_family(decl)) {
        return None;
    }

    let kept_selectors: Vec<&str> = selectors
        .into_iter()
        .filter(|s| *s != ROOT_SELECTOR)
        .collect();
    let kept_body: Vec<&str> = declarations
        .into_iter()
        .filter(|decl| !is_font_family(decl))
        .collect();

    Some(format!(
        "{head}{leading}{}{trailing}{{{}}}",
        kept_selectors.join(","),
        kept_body.join(";")
    ))
}

fn is_font_family(declaration: &str) -> bool {
    declaration
        .split_once(':')
        .map(|(property, _)| property.trim().eq_ignore_ascii_case(FONT_FAMILY))
        .unwrap_or(false)
}

/// Splits a declaration block on top-level `;`, ignoring separators inside
/// parentheses or quotes. A trailing `;` yields a final empty segment so that
/// joining with `;` restores it.
fn split_declarations(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, ch) in body.char_indices() {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}
