//! Parser for the `configobj` file format.
//!
//! Format:
//! ```ini
//! # comment attached to the next entry
//! version = 4.1
//!
//! [Station]
//!     location = "Boston, MA"    # quoted because it contains a comma
//!     altitude = 20, foot        # a list
//!     [[Nested]]                 # bracket depth gives the nesting level
//!         key = value
//! ```
//!
//! Indentation is ignored; nesting comes only from the number of brackets.
use thiserror::Error;

use super::{ConfigObj, KeyValue, Section, Subsection, Value};

/// A syntax error, with the 1-based line on which it was found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    /// What was wrong with the line.
    pub message: String,
}

/// Parse configuration text into a [`ConfigObj`].
///
/// # Errors
///
/// Returns an error for unbalanced or over-nested section markers,
/// duplicate keys or section names, lines that are neither comments,
/// section headers, nor `key = value` pairs, and malformed values.
pub fn parse(content: &str) -> Result<ConfigObj, ParseError> {
    let mut config = ConfigObj::default();
    // Names of the sections enclosing the current line, outermost first.
    let mut path: Vec<String> = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    for (index, line) in content.lines().enumerate() {
        let line_num = index + 1;
        let err = |message: String| ParseError {
            line: line_num,
            message,
        };
        let trimmed = line.trim();

        if trimmed.is_empty() {
            pending.push(String::new());
            continue;
        }
        if trimmed.starts_with('#') {
            pending.push(trimmed.to_string());
            continue;
        }

        if trimmed.starts_with('[') {
            let header = parse_section_header(trimmed).map_err(err)?;
            if header.depth > path.len() + 1 {
                return Err(err(format!(
                    "section '{}' is nested too deeply",
                    header.name
                )));
            }
            path.truncate(header.depth - 1);
            let parent = section_at(&mut config.root, &path)
                .ok_or_else(|| err("lost track of the enclosing section".to_string()))?;
            if parent.contains_key(&header.name) {
                return Err(err(format!("duplicate section name '{}'", header.name)));
            }
            parent.push_subsection(Subsection {
                name: header.name.clone(),
                section: Section::new(),
                comments: std::mem::take(&mut pending),
                inline_comment: header.inline_comment,
            });
            path.push(header.name);
            continue;
        }

        let Some((key, raw_value)) = trimmed.split_once('=') else {
            return Err(err(format!("invalid line '{trimmed}'")));
        };
        let key = unquote(key.trim());
        if key.is_empty() {
            return Err(err("missing keyword name".to_string()));
        }
        let (value, inline_comment) = parse_value(raw_value).map_err(err)?;
        let section = section_at(&mut config.root, &path)
            .ok_or_else(|| err("lost track of the enclosing section".to_string()))?;
        if section.contains_key(key) {
            return Err(err(format!("duplicate keyword name '{key}'")));
        }
        section.push_scalar(KeyValue {
            key: key.to_string(),
            value,
            comments: std::mem::take(&mut pending),
            inline_comment,
        });
    }

    config.final_comment = pending;
    Ok(config)
}

/// A parsed `[name]`, `[[name]]`, ... line.
#[derive(Debug, PartialEq, Eq)]
struct SectionHeader {
    depth: usize,
    name: String,
    inline_comment: Option<String>,
}

fn parse_section_header(line: &str) -> Result<SectionHeader, String> {
    let depth = line.chars().take_while(|&c| c == '[').count();
    let rest = &line[depth..];
    let close = rest
        .find(']')
        .ok_or_else(|| format!("missing closing bracket in '{line}'"))?;
    let name = unquote(rest[..close].trim());
    if name.is_empty() {
        return Err(format!("empty section name in '{line}'"));
    }
    let after = &rest[close..];
    let closing = after.chars().take_while(|&c| c == ']').count();
    if closing != depth {
        return Err(format!("section marker mismatch in '{line}'"));
    }
    let tail = after[closing..].trim();
    let inline_comment = match tail {
        "" => None,
        t if t.starts_with('#') => Some(t.to_string()),
        t => return Err(format!("unexpected text '{t}' after section marker")),
    };
    Ok(SectionHeader {
        depth,
        name: name.to_string(),
        inline_comment,
    })
}

fn section_at<'a>(root: &'a mut Section, path: &[String]) -> Option<&'a mut Section> {
    path.iter()
        .try_fold(root, |section, name| section.section_mut(name))
}

/// Parse the text after `=` into a value and an optional inline comment.
///
/// - `a` is a scalar, `"a, b"` a quoted scalar, `'''a "b" c's'''` a
///   triple-quoted one
/// - `a, b` is a list, `a,` a one-element list, `,` an empty list
/// - an unquoted `#` starts a comment
fn parse_value(raw: &str) -> Result<(Value, Option<String>), String> {
    let mut items: Vec<String> = Vec::new();
    let mut is_list = false;
    let mut rest = raw.trim_start();

    if let Some(after) = rest.strip_prefix(',') {
        is_list = true;
        rest = after.trim_start();
    }

    let comment = loop {
        if rest.is_empty() {
            break None;
        }
        if rest.starts_with('#') {
            break Some(rest.trim_end().to_string());
        }
        if rest.starts_with(',') {
            return Err("empty item in list value".to_string());
        }
        let (token, remainder) = if rest.starts_with(['"', '\'']) {
            read_quoted(rest)?
        } else {
            read_bare(rest)
        };
        items.push(token);
        rest = remainder.trim_start();

        if let Some(after) = rest.strip_prefix(',') {
            is_list = true;
            rest = after.trim_start();
        } else if !rest.is_empty() && !rest.starts_with('#') {
            return Err(format!("unexpected text '{}' in value", rest.trim_end()));
        }
    };

    let value = if is_list {
        Value::List(items)
    } else {
        Value::Scalar(items.into_iter().next().unwrap_or_default())
    };
    Ok((value, comment))
}

fn read_quoted(text: &str) -> Result<(String, &str), String> {
    let (delimiter, body) = ["'''", "\"\"\"", "'", "\""]
        .into_iter()
        .find_map(|d| text.strip_prefix(d).map(|body| (d, body)))
        .ok_or_else(|| format!("expected a quoted value in {text}"))?;
    let (value, rest) = body
        .split_once(delimiter)
        .ok_or_else(|| format!("unterminated quote in value {text}"))?;
    Ok((value.to_string(), rest))
}

fn read_bare(text: &str) -> (String, &str) {
    let end = text.find([',', '#']).unwrap_or(text.len());
    (text[..end].trim_end().to_string(), &text[end..])
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|t| t.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
