//! Minimal INI reader for rc dotfiles
//!
//! Supports `key = value`, `[section]` headers (dots nest: `[a.b]`),
//! `key[] = value` arrays and `;`/`#` comments. Unquoted values stay
//! strings except `true`, `false` and `null`; quoted values are unquoted.

use super::set_path;
use serde_json::{Map, Value};

pub fn parse_ini(content: &str) -> Value {
    let mut out = Map::new();
    let mut section: Vec<String> = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = split_section(name);
            continue;
        }

        let (key, value) = match line.split_once('=') {
            Some((k, v)) => (k.trim(), parse_value(v.trim())),
            None => (line, Value::Bool(true)),
        };

        let (key, is_array) = match key.strip_suffix("[]") {
            Some(k) => (k.trim(), true),
            None => (key, false),
        };
        let key = unquote(key);
        if key.is_empty() {
            continue;
        }

        let mut path: Vec<&str> = section.iter().map(String::as_str).collect();
        path.push(&key);
        if is_array {
            push_array(&mut out, &path, value);
        } else {
            set_path(&mut out, &path, value, false);
        }
    }

    Value::Object(out)
}

fn split_section(name: &str) -> Vec<String> {
    // `\.` keeps a literal dot inside a section name.
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = name.trim().chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'.') => {
                current.push('.');
                chars.next();
            }
            '.' => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts.into_iter().map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect()
}

fn parse_value(raw: &str) -> Value {
    if is_quoted(raw) {
        return Value::String(unquote(raw));
    }
    let cut = strip_inline_comment(raw);
    match cut {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        other => Value::String(other.to_string()),
    }
}

fn strip_inline_comment(raw: &str) -> &str {
    let mut escaped = false;
    for (idx, ch) in raw.char_indices() {
        match ch {
            '\\' => escaped = !escaped,
            ';' | '#' if !escaped => return raw[..idx].trim_end(),
            _ => escaped = false,
        }
    }
    raw
}

fn is_quoted(raw: &str) -> bool {
    raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')))
}

fn unquote(raw: &str) -> String {
    if !is_quoted(raw) {
        return raw.to_string();
    }
    if raw.starts_with('"') {
        if let Ok(Value::String(s)) = serde_json::from_str::<Value>(raw) {
            return s;
        }
    }
    raw[1..raw.len() - 1].to_string()
}

fn push_array(out: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = out;
    for segment in parents {
        let entry = current.entry(segment.to_string()).or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    let slot = current.entry(last.to_string()).or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    if let Value::Array(items) = slot {
        items.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sections_and_keys() {
        let doc = parse_ini(
            "; local overrides\nusedb = false\n\n[mysql]\nhost = mylocal.mysql.com\nport = 3306\n",
        );
        assert_eq!(
            doc,
            json!({"usedb": false, "mysql": {"host": "mylocal.mysql.com", "port": "3306"}})
        );
    }

    #[test]
    fn dotted_sections_nest() {
        let doc = parse_ini("[db.primary]\nhost = a\n[db.replica]\nhost = b\n");
        assert_eq!(doc, json!({"db": {"primary": {"host": "a"}, "replica": {"host": "b"}}}));
    }

    #[test]
    fn escaped_dot_in_section_is_literal() {
        let doc = parse_ini("[example\\.com]\nenabled = true\n");
        assert_eq!(doc, json!({"example.com": {"enabled": true}}));
    }

    #[test]
    fn array_keys_accumulate() {
        let doc = parse_ini("hosts[] = a\nhosts[] = b\n");
        assert_eq!(doc, json!({"hosts": ["a", "b"]}));
    }

    #[test]
    fn quoted_values_keep_comment_chars() {
        let doc = parse_ini("password = \"p;ss#word\"\nname = plain ; trailing comment\n");
        assert_eq!(doc, json!({"password": "p;ss#word", "name": "plain"}));
    }

    #[test]
    fn key_without_value_is_true() {
        assert_eq!(parse_ini("debug\n"), json!({"debug": true}));
    }
}
