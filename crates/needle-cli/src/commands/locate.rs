//! `needle locate`
//!
//! Exits with status 1 when any registered needle has no marker in the file,
//! so it can gate a template check in CI.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use needle_core::NeedleConfig;
use needle_files::{DiskFileStore, NeedleLayer};

use super::TargetArgs;

/// Arguments for `needle locate`
#[derive(Args, Debug, Clone)]
pub struct LocateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print locations as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run `needle locate`
pub fn run(config: &NeedleConfig, args: &LocateArgs, out: &mut impl Write) -> Result<ExitCode> {
    if check(config, args, out)? > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Print every needle's location and return how many are missing
pub fn check(config: &NeedleConfig, args: &LocateArgs, out: &mut impl Write) -> Result<usize> {
    let layer = NeedleLayer::from_config(config)?;
    let path = args.target.path(&layer)?;
    let store = DiskFileStore::new(&args.target.root);

    let locations = layer.locate_all(&store, &path, &args.target.file_type)?;
    let missing = locations.iter().filter(|l| l.is_missing()).count();

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&locations)?)?;
    } else {
        for location in &locations {
            let lines = if location.is_missing() {
                "missing".to_string()
            } else {
                location
                    .lines
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            writeln!(out, "{:<24} {:<60} {lines}", location.key, location.token)?;
        }
    }

    if missing > 0 {
        tracing::warn!(path = %path.display(), missing, "needles missing from file");
    }
    Ok(missing)
}
