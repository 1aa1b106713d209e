// SPDX-License-Identifier: MIT

//! Markdown-with-frontmatter parsing and emission (§4.2, §6.3, §6.4).
//!
//! A document optionally opens with a `---` line, zero or more `key: value`
//! lines, and a closing `---` line; everything after that is the body.
//! Frontmatter values are scalar strings except for a small set of bare
//! literal forms: `true`/`false` booleans, bare integers (with the
//! leading-zero exception that keeps ticket-id-shaped literals like `0817`
//! as strings), and `[a, b, c]` comma-separated string lists.

use std::fmt;

/// One parsed frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// A parsed document: an ordered key/value frontmatter header plus a body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub fields: Vec<(String, Value)>,
    pub body: String,
}

impl Document {
    pub fn new(body: impl Into<String>) -> Self {
        Self { fields: Vec::new(), body: body.into() }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace a field, preserving its original position if it
    /// already exists, appending otherwise.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

/// True iff `s` is a bare token that the integer-literal rule must preserve
/// as a string: begins with `0` and has at least one more digit after it.
fn is_leading_zero_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() > 1 && bytes[0] == b'0' && bytes[1..].iter().all(|b| b.is_ascii_digit())
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_scalar(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Value::String(unescape(&raw[1..raw.len() - 1]));
    }
    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        let inner = &raw[1..raw.len() - 1];
        let items = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner.split(',').map(|item| unquote(item.trim())).collect()
        };
        return Value::List(items);
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if is_all_digits(raw) && !is_leading_zero_literal(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Int(n);
        }
    }
    Value::String(raw.to_string())
}

fn unquote(s: &str) -> String {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        unescape(&s[1..s.len() - 1])
    } else {
        s.to_string()
    }
}

fn unescape(s: &str) -> String {
    s.replace("\\\"", "\"")
}

/// Whether a [`Value::String`] must be emitted in quoted form to round-trip
/// through [`parse_scalar`] unchanged.
fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s == "true"
        || s == "false"
        || is_all_digits(s)
        || s.starts_with('[')
        || s.starts_with('"')
        || s.contains('\n')
}

fn emit_scalar(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::List(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| {
                    if needs_quoting(item) {
                        format!("\"{}\"", item.replace('"', "\\\""))
                    } else {
                        item.clone()
                    }
                })
                .collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::String(s) => {
            if needs_quoting(s) {
                format!("\"{}\"", s.replace('"', "\\\""))
            } else {
                s.clone()
            }
        }
    }
}

/// Parse error raised when a frontmatter block is malformed (unterminated).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated frontmatter block: missing closing `---`")]
    Unterminated,

    #[error("malformed frontmatter line {0:?}: expected `key: value`")]
    MalformedLine(String),
}

/// Parse a full markdown-with-frontmatter document.
pub fn parse(input: &str) -> Result<Document, ParseError> {
    let mut lines = input.lines();
    let first = lines.clone().next();
    if first != Some("---") {
        return Ok(Document { fields: Vec::new(), body: input.to_string() });
    }
    lines.next(); // consume opening `---`

    let mut fields = Vec::new();
    let mut closed = false;
    let mut consumed = 1; // the opening line
    for line in lines.by_ref() {
        consumed += 1;
        if line == "---" {
            closed = true;
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let (key, raw_value) =
            line.split_once(':').ok_or_else(|| ParseError::MalformedLine(line.to_string()))?;
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(ParseError::MalformedLine(line.to_string()));
        }
        fields.push((key, parse_scalar(raw_value)));
    }
    if !closed {
        return Err(ParseError::Unterminated);
    }

    let body: String = input
        .lines()
        .skip(consumed)
        .collect::<Vec<_>>()
        .join("\n");
    // Preserve a leading blank line separating frontmatter from body, common
    // in hand-edited tickets, by trimming at most one.
    let body = body.strip_prefix('\n').unwrap_or(&body).to_string();
    Ok(Document { fields, body })
}

/// Emit a document back to its markdown-with-frontmatter text form.
pub fn emit(doc: &Document) -> String {
    let mut out = String::new();
    if !doc.fields.is_empty() {
        out.push_str("---\n");
        for (key, value) in &doc.fields {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(&emit_scalar(value));
            out.push('\n');
        }
        out.push_str("---\n");
    }
    out.push_str(&doc.body);
    out
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&emit(self))
    }
}

#[cfg(test)]
#[path = "parsing_tests.rs"]
mod tests;
