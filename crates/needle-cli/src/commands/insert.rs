//! `needle insert`
//!
//! ```bash
//! needle insert property='private Foo foo;' propertyGetter=@getter.java
//! needle insert --file pom.xml --file-type pom --dry-run dependency=@dep.xml
//! ```

use std::io::Write;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use needle_core::{InsertionOutcome, InsertionReport, NeedleConfig};
use needle_files::{DiskFileStore, NeedleLayer};
use serde::Serialize;

use super::{build_request, parse_entry, TargetArgs};

/// Arguments for `needle insert`
#[derive(Args, Debug, Clone)]
pub struct InsertArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Print the resulting file instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the insertion report as JSON
    #[arg(long)]
    pub json: bool,

    /// Fragments as KEY=FRAGMENT; FRAGMENT may be @path to read a file
    #[arg(value_name = "KEY=FRAGMENT", value_parser = parse_entry)]
    pub entries: Vec<(String, String)>,
}

#[derive(Serialize)]
struct DryRun<'a> {
    report: &'a InsertionReport,
    text: &'a str,
}

/// Run `needle insert`
pub fn run(config: &NeedleConfig, args: &InsertArgs, out: &mut impl Write) -> Result<ExitCode> {
    let layer = NeedleLayer::from_config(config)?;
    let path = args.target.path(&layer)?;
    let request = build_request(&args.entries)?;
    let mut store = DiskFileStore::new(&args.target.root);

    if args.dry_run {
        let (report, content) =
            layer.preview(&store, &path, &args.target.file_type, &request)?;
        if args.json {
            let dry_run = DryRun {
                report: &report,
                text: content.text(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&dry_run)?)?;
        } else {
            write!(out, "{}", content.text())?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let report = layer.insert_content(&mut store, &path, &args.target.file_type, &request)?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_summary(&report, out)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn write_summary(report: &InsertionReport, out: &mut impl Write) -> Result<()> {
    for entry in &report.entries {
        match entry.outcome {
            InsertionOutcome::Inserted { line } => {
                writeln!(out, "inserted  {:<24} line {line}", entry.key)?;
            }
            InsertionOutcome::AlreadyPresent => {
                writeln!(out, "present   {}", entry.key)?;
            }
        }
    }
    writeln!(
        out,
        "{}: {} inserted, {} already present ({} -> {})",
        report.context,
        report.inserted_count(),
        report.skipped_count(),
        report.before.short(),
        report.after.short()
    )?;
    Ok(())
}
