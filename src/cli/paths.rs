//! Paths command implementation

use anyhow::Result;
use clap::Args;
use envcfg::Resolver;
use std::path::Path;

use super::utils::ResolveArgs;

#[derive(Args)]
pub struct PathsArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,
}

pub fn run(args: PathsArgs) -> Result<()> {
    let resolver = Resolver::new(args.resolve.options()?);
    let paths = resolver.discover_paths();

    println!("defaults: {}", describe(paths.defaults.as_deref()));
    println!("environment: {}", describe(paths.environment.as_deref()));

    if let Some(rc_options) = &resolver.options().rc {
        let layer = envcfg::rc::load(rc_options, &resolver.options().ambient)?;
        if layer.files.is_empty() {
            println!("rc ({}): (none)", rc_options.prefix);
        } else {
            println!("rc ({}):", rc_options.prefix);
            for file in &layer.files {
                println!("  {}", file.display());
            }
        }
    }

    if paths.is_empty() {
        anyhow::bail!(
            "No configuration file found for patterns: {}",
            resolver.options().patterns.join(", ")
        );
    }
    Ok(())
}

fn describe(path: Option<&Path>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "(none)".to_string(),
    }
}
