//! Command-line flag parsing for rc overrides
//!
//! Flags are turned into a nested document:
//!
//! - `--db.host=x` and `--db.host x` set `db.host`
//! - `--verbose` sets `true`, `--no-verbose` sets `false`
//! - `-abc` sets `a`, `b` and `c`; the last letter may take a value
//! - repeated valued flags collect into an array; a repeated switch keeps
//!   its last setting
//! - anything else (and everything after `--`) is positional, under `_`

use super::{coerce_scalar, set_path};
use serde_json::{Map, Value};

pub fn parse_args(args: &[String]) -> Value {
    let mut out = Map::new();
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();

        if arg == "--" {
            positional.extend(args[i + 1..].iter().map(|a| coerce_scalar(a)));
            break;
        }

        if let Some(body) = arg.strip_prefix("--") {
            if let Some((key, value)) = body.split_once('=') {
                set_flag(&mut out, key, coerce_scalar(value));
            } else if let Some(key) = body.strip_prefix("no-") {
                set_flag(&mut out, key, Value::Bool(false));
            } else if let Some(next) = args.get(i + 1).filter(|n| takes_value(n)) {
                set_flag(&mut out, body, coerce_scalar(next));
                i += 1;
            } else {
                set_flag(&mut out, body, Value::Bool(true));
            }
        } else if arg.len() > 1 && arg.starts_with('-') && !looks_numeric(arg) {
            let letters: Vec<char> = arg[1..].chars().collect();
            let Some((last, init)) = letters.split_last() else {
                i += 1;
                continue;
            };
            for letter in init {
                set_flag(&mut out, &letter.to_string(), Value::Bool(true));
            }
            if let Some(next) = args.get(i + 1).filter(|n| takes_value(n)) {
                set_flag(&mut out, &last.to_string(), coerce_scalar(next));
                i += 1;
            } else {
                set_flag(&mut out, &last.to_string(), Value::Bool(true));
            }
        } else {
            positional.push(coerce_scalar(arg));
        }

        i += 1;
    }

    out.insert("_".to_string(), Value::Array(positional));
    Value::Object(out)
}

fn takes_value(next: &str) -> bool {
    !next.starts_with('-') || looks_numeric(next)
}

fn looks_numeric(arg: &str) -> bool {
    matches!(coerce_scalar(arg), Value::Number(_))
}

fn set_flag(out: &mut Map<String, Value>, key: &str, value: Value) {
    let path: Vec<&str> = key.split('.').filter(|s| !s.is_empty()).collect();
    if path.is_empty() {
        return;
    }
    // Booleans are switches: the last one wins.
    let accumulate =
        !value.is_boolean() && !lookup_flag(out, &path).is_some_and(Value::is_boolean);
    set_path(out, &path, value, accumulate);
}

fn lookup_flag<'a>(out: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter().try_fold(out.get(*first)?, |current, segment| current.get(*segment))
}
