//! Get command implementation

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use super::utils::ResolveArgs;

#[derive(Args)]
pub struct GetArgs {
    /// Dotted key to look up (e.g. `mysql.host`, `servers[0].host`)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Value printed when the key is absent (parsed as JSON, else a string)
    #[arg(short, long, value_name = "VALUE")]
    pub default: Option<String>,

    /// Print strings as JSON too (quoted)
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

pub fn run(args: GetArgs) -> Result<()> {
    let config = envcfg::resolve(args.resolve.options()?)?;

    let value = match (config.get(&args.key), &args.default) {
        (Some(value), _) => value.clone(),
        (None, Some(raw)) => parse_default(raw),
        (None, None) => anyhow::bail!("Key not found: {}", args.key),
    };

    println!("{}", render_value(&value, args.json)?);
    Ok(())
}

fn parse_default(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn render_value(value: &Value, json: bool) -> Result<String> {
    match value {
        Value::String(s) if !json => Ok(s.clone()),
        other => Ok(serde_json::to_string_pretty(other)?),
    }
}
