//! Filename pattern templates
//!
//! Patterns carry placeholders that are filled from a [`Variables`] map:
//!
//! - `<%= NAME %>` interpolates the value as-is
//! - `<%- NAME %>` interpolates the HTML-escaped value
//! - `${NAME}` interpolates the value as-is
//!
//! A pattern is compiled once into a [`PatternTemplate`] and can then be
//! rendered against any number of variable sets.

use crate::error::{ConfigError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Substitution context for pattern rendering.
pub type Variables = BTreeMap<String, String>;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<%(=|-)\s*([^%]*?)\s*%>|\$\{\s*([^}]*?)\s*\}").expect("placeholder regex")
});

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var { name: String, escape: bool },
}

/// A compiled filename pattern.
#[derive(Debug, Clone)]
pub struct PatternTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PatternTemplate {
    pub fn compile(pattern: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(pattern) {
            let Some(whole) = caps.get(0) else { continue };
            push_literal(&mut segments, pattern, &pattern[last..whole.start()])?;

            let (name, escape) = match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(kind), Some(name), _) => (name.as_str(), kind.as_str() == "-"),
                (_, _, Some(name)) => (name.as_str(), false),
                _ => unreachable!("placeholder regex has one name group per branch"),
            };
            if !IDENTIFIER.is_match(name) {
                return Err(ConfigError::Template {
                    pattern: pattern.to_string(),
                    reason: format!("'{}' is not a variable name", name),
                });
            }
            segments.push(Segment::Var { name: name.to_string(), escape });
            last = whole.end();
        }
        push_literal(&mut segments, pattern, &pattern[last..])?;

        Ok(Self { source: pattern.to_string(), segments })
    }

    /// The pattern text this template was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the pattern. Every referenced variable must be present.
    pub fn render(&self, variables: &Variables) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Var { name, escape } => {
                    let value = variables.get(name).ok_or_else(|| ConfigError::Template {
                        pattern: self.source.clone(),
                        reason: format!("{} is not defined", name),
                    })?;
                    if *escape {
                        out.push_str(&escape_html(value));
                    } else {
                        out.push_str(value);
                    }
                }
            }
        }
        Ok(out)
    }
}

fn push_literal(segments: &mut Vec<Segment>, pattern: &str, text: &str) -> Result<()> {
    if text.contains("<%") {
        return Err(ConfigError::Template {
            pattern: pattern.to_string(),
            reason: "unterminated or unsupported '<%' tag".to_string(),
        });
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Layer `overrides` on top of `base`; keys in `overrides` win.
pub fn layer_variables(base: &Variables, overrides: &Variables) -> Variables {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
