//! Named-placeholder code templates.
//!
//! Placeholders are `$name` or `${name}`. A string value is substituted as-is
//! and a list value is joined with `", "`. When a placeholder is the first
//! thing on its line, the value is instead laid out as a block: every line of
//! every item is emitted on its own line at the placeholder's indentation.
//! `${,name}` and `${name,}` add a leading or trailing `", "` around a
//! non-empty inline list.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{GenerateError, GenerateResult};

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    Str(String),
    List(Vec<String>),
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Str(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Str(value)
    }
}

impl From<Vec<String>> for TemplateValue {
    fn from(value: Vec<String>) -> Self {
        TemplateValue::List(value)
    }
}

/// Placeholder bindings, in insertion order.
pub type TemplateEnv = IndexMap<String, TemplateValue>;

/// Lay out `items` as a block at `indent`. Trailing whitespace is trimmed, so
/// an empty value collapses to nothing.
pub fn indent_lines<S: AsRef<str>>(indent: &str, items: &[S]) -> String {
    let mut out = String::new();
    for item in items {
        for line in item.as_ref().lines() {
            out.push_str(indent);
            out.push_str(line);
            out.push('\n');
        }
    }
    out.truncate(out.trim_end().len());
    out
}

#[derive(Debug, PartialEq, Eq)]
struct Placeholder<'a> {
    key: &'a str,
    comma_before: bool,
    comma_after: bool,
    /// Bytes consumed, including the `$`.
    len: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn ident_len(s: &str) -> usize {
    match s.chars().next() {
        Some(c) if is_ident_start(c) => s
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(s.len()),
        _ => 0,
    }
}

/// Parse a placeholder at the start of `s`, which begins with `$`.
fn parse_placeholder(s: &str) -> Option<Placeholder<'_>> {
    let body = s.strip_prefix('$')?;

    let Some(braced) = body.strip_prefix('{') else {
        let len = ident_len(body);
        return (len > 0).then(|| Placeholder {
            key: &body[..len],
            comma_before: false,
            comma_after: false,
            len: 1 + len,
        });
    };

    let (comma_before, rest) = match braced.strip_prefix(',') {
        Some(rest) => (true, rest),
        None => (false, braced),
    };
    let len = ident_len(rest);
    if len == 0 {
        return None;
    }
    let key = &rest[..len];
    let (comma_after, tail) = match rest[len..].strip_prefix(',') {
        Some(tail) => (true, tail),
        None => (false, &rest[len..]),
    };
    tail.strip_prefix('}')?;

    let consumed = s.len() - tail.len() + 1;
    Some(Placeholder {
        key,
        comma_before,
        comma_after,
        len: consumed,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTemplate {
    name: String,
    text: String,
}

impl CodeTemplate {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> GenerateResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), text))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder keys in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        let mut rest = self.text.as_str();
        while let Some(pos) = rest.find('$') {
            match parse_placeholder(&rest[pos..]) {
                Some(placeholder) => {
                    keys.push(placeholder.key);
                    rest = &rest[pos + placeholder.len..];
                }
                None => rest = &rest[pos + 1..],
            }
        }
        keys
    }

    pub fn substitute(&self, env: &TemplateEnv) -> GenerateResult<String> {
        let text = self.text.as_str();
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        while let Some(offset) = text[cursor..].find('$') {
            let pos = cursor + offset;
            let Some(placeholder) = parse_placeholder(&text[pos..]) else {
                out.push_str(&text[cursor..=pos]);
                cursor = pos + 1;
                continue;
            };
            out.push_str(&text[cursor..pos]);

            let value = env.get(placeholder.key).ok_or_else(|| GenerateError::Template {
                template: self.name.clone(),
                message: format!("no value bound to '{}'", placeholder.key),
            })?;

            let line_start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
            let lead = &text[line_start..pos];
            if lead.chars().all(|c| c.is_whitespace() && c != '\n') {
                out.truncate(out.len() - lead.len());
                let block = match value {
                    TemplateValue::Str(s) => indent_lines(lead, std::slice::from_ref(s)),
                    TemplateValue::List(items) => indent_lines(lead, items),
                };
                out.push_str(&block);
            } else {
                match value {
                    TemplateValue::Str(s) => out.push_str(s),
                    TemplateValue::List(items) if items.is_empty() => {}
                    TemplateValue::List(items) => {
                        if placeholder.comma_before {
                            out.push_str(", ");
                        }
                        out.push_str(&items.join(", "));
                        if placeholder.comma_after {
                            out.push_str(", ");
                        }
                    }
                }
            }
            cursor = pos + placeholder.len;
        }
        out.push_str(&text[cursor..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, TemplateValue)]) -> TemplateEnv {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn list(items: &[&str]) -> TemplateValue {
        TemplateValue::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn inline_values() {
        let t = CodeTemplate::new("t", "f(${args}) -> $ret;");
        let out = t
            .substitute(&env(&[("args", list(&["a", "b"])), ("ret", "int".into())]))
            .unwrap();
        assert_eq!(out, "f(a, b) -> int;");
    }

    #[test]
    fn comma_variants_only_apply_to_non_empty_lists() {
        let t = CodeTemplate::new("t", "g(x${,rest}) h(${rest,}y)");
        let out = t.substitute(&env(&[("rest", list(&["a", "b"]))])).unwrap();
        assert_eq!(out, "g(x, a, b) h(a, b, y)");

        let out = t.substitute(&env(&[("rest", list(&[]))])).unwrap();
        assert_eq!(out, "g(x) h(y)");
    }

    #[test]
    fn standalone_placeholder_is_indented_block() {
        let t = CodeTemplate::new("t", "{\n  ${body}\n}\n");
        let out = t
            .substitute(&env(&[("body", list(&["a();\nb();", "c();"]))]))
            .unwrap();
        assert_eq!(out, "{\n  a();\n  b();\n  c();\n}\n");
    }

    #[test]
    fn empty_block_leaves_blank_line() {
        let t = CodeTemplate::new("t", "{\n  ${body}\n}\n");
        let out = t.substitute(&env(&[("body", "".into())])).unwrap();
        assert_eq!(out, "{\n\n}\n");
    }

    #[test]
    fn stray_dollars_are_literal() {
        let t = CodeTemplate::new("t", "cost: $5 and ${ and $");
        let out = t.substitute(&TemplateEnv::new()).unwrap();
        assert_eq!(out, "cost: $5 and ${ and $");
    }

    #[test]
    fn missing_binding_is_an_error() {
        let t = CodeTemplate::new("header.h", "${function_definitions}");
        let err = t.substitute(&TemplateEnv::new()).unwrap_err();
        assert!(err.to_string().contains("function_definitions"));
    }

    #[test]
    fn lists_placeholders() {
        let t = CodeTemplate::new("t", "$a ${b} ${,c} $1");
        assert_eq!(t.placeholders(), vec!["a", "b", "c"]);
    }
}
