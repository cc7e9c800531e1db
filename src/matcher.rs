//! Parent-comment matching for template inheritance.
//!
//! A template opts into inheritance by starting with a specially formed Tera
//! comment naming its parent:
//!
//! ```text
//! {# extends "layout.html" #}
//! ```
//!
//! Only a declaration anchored at the very start of the content (leading
//! whitespace tolerated) activates inheritance. Anything else, including a
//! malformed declaration, is treated as plain content and the template is
//! loaded as a root. The comment itself is inert to the Tera parser, so it is
//! left in place when the content is later merged into the parent's template
//! set.

use std::sync::LazyLock;

use regex::Regex;

// Anchored at the start of the content. The keyword-to-value gap is
// restricted to horizontal whitespace so the declaration stays on one
// statement; whitespace elsewhere inside the comment may span lines.
static EXTENDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*\{#\s*extends[ \t]+"([^"]*)"\s*#\}"#).expect("extends pattern is valid")
});

/// Extract the parent template name declared by `content`, if any.
///
/// Returns `None` when no well-formed declaration is anchored at the start of
/// the content, or when the quoted value is empty. When several candidate
/// comments are present only the first, start-anchored one is considered.
///
/// This is a pure function: no I/O, identical output for identical input.
///
/// # Examples
///
/// ```
/// use loadtmpl::matcher::parent_name;
///
/// assert_eq!(parent_name(r#"{# extends "layout.html" #}<p>hi</p>"#), Some("layout.html"));
/// assert_eq!(parent_name("<p>no declaration</p>"), None);
/// assert_eq!(parent_name(r#"{# extends "" #}"#), None);
/// ```
pub fn parent_name(content: &str) -> Option<&str> {
    let captures = EXTENDS_RE.captures(content)?;
    let name = captures.get(1).map(|m| m.as_str())?;
    if name.is_empty() { None } else { Some(name) }
}
