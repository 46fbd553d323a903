//! Dump command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::Value;

use super::utils::ResolveArgs;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Args)]
pub struct DumpArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

pub fn run(args: DumpArgs) -> Result<()> {
    let document = envcfg::resolve_document(args.resolve.options()?)?;
    let rendered = render_document(&document, args.format)?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub fn render_document(document: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?),
        // TOML has no null; documents containing one cannot be rendered.
        OutputFormat::Toml => {
            toml::to_string_pretty(document).context("Config cannot be represented as TOML")
        }
    }
}
