//! `needle needles`

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use needle_core::{NeedleConfig, NeedleRegistry};

/// Arguments for `needle needles`
#[derive(Args, Debug, Clone)]
pub struct NeedlesArgs {
    /// Only this file type
    #[arg(long)]
    pub file_type: Option<String>,
}

/// Run `needle needles`
pub fn run(config: &NeedleConfig, args: &NeedlesArgs, out: &mut impl Write) -> Result<ExitCode> {
    let catalog = config.catalog()?;

    let registries: Vec<&NeedleRegistry> = match &args.file_type {
        Some(file_type) => vec![catalog.get(file_type)?],
        None => catalog.registries().collect(),
    };

    for registry in registries {
        writeln!(out, "{}", registry.file_type())?;
        for needle in registry.needles() {
            writeln!(out, "  {:<22} {}", needle.key(), needle.token())?;
        }
    }
    Ok(ExitCode::SUCCESS)
}
