//! Render a [`ConfigObj`] back to `configobj` text.
//!
//! Section bodies are indented four spaces per nesting level; headers use
//! one bracket pair per level. Values are quoted only when they would not
//! survive a re-parse unquoted.
use std::borrow::Cow;
use std::fmt::Write as _;

use super::{ConfigObj, Section, Value};

const INDENT: &str = "    ";

/// Render the whole file.
#[must_use]
pub fn render(config: &ConfigObj) -> String {
    let mut out = String::new();
    write_section(&mut out, &config.root, 0);
    for line in &config.final_comment {
        writeln!(out, "{line}").ok();
    }
    out
}

fn write_section(out: &mut String, section: &Section, depth: usize) {
    let indent = INDENT.repeat(depth);

    for kv in section.scalars() {
        write_comments(out, &indent, &kv.comments);
        write!(out, "{indent}{} = {}", kv.key, render_value(&kv.value)).ok();
        write_inline(out, kv.inline_comment.as_deref());
    }

    for sub in section.subsections() {
        write_comments(out, &indent, &sub.comments);
        let open = "[".repeat(depth + 1);
        let close = "]".repeat(depth + 1);
        write!(out, "{indent}{open}{}{close}", sub.name).ok();
        write_inline(out, sub.inline_comment.as_deref());
        write_section(out, &sub.section, depth + 1);
    }
}

fn write_comments(out: &mut String, indent: &str, comments: &[String]) {
    for line in comments {
        if line.is_empty() {
            out.push('\n');
        } else {
            writeln!(out, "{indent}{line}").ok();
        }
    }
}

fn write_inline(out: &mut String, comment: Option<&str>) {
    match comment {
        Some(c) => writeln!(out, "    {c}").ok(),
        None => writeln!(out).ok(),
    };
}

/// Render a value as it appears after `key = `.
///
/// ```
/// use weecfg::config::{Value, writer::render_value};
///
/// assert_eq!(render_value(&Value::from("Boston, MA")), "\"Boston, MA\"");
/// assert_eq!(render_value(&Value::from(vec!["700", "foot"])), "700, foot");
/// assert_eq!(render_value(&Value::from(vec!["only"])), "only,");
/// ```
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Scalar(s) => quote(s).into_owned(),
        Value::List(items) => match items.as_slice() {
            [] => ",".to_string(),
            [single] => format!("{},", quote(single)),
            many => many
                .iter()
                .map(|item| quote(item))
                .collect::<Vec<_>>()
                .join(", "),
        },
    }
}

fn quote(s: &str) -> Cow<'_, str> {
    let needs_quotes = s.is_empty()
        || s.contains([',', '#', '"', '\''])
        || s.trim() != s
        || s.starts_with('[');
    if !needs_quotes {
        return Cow::Borrowed(s);
    }
    if !s.contains('"') {
        return Cow::Owned(format!("\"{s}\""));
    }
    if !s.contains('\'') {
        return Cow::Owned(format!("'{s}'"));
    }
    // Both quote characters: fall back to a triple-quoted value. A closing
    // delimiter must not be preceded by its own quote character.
    let triple = if s.contains("'''") || s.ends_with('\'') {
        "\"\"\""
    } else {
        "'''"
    };
    Cow::Owned(format!("{triple}{s}{triple}"))
}
