//! Subcommand implementations
//!
//! Each command writes its output to the writer it is given and returns the
//! process exit code.

pub mod insert;
pub mod locate;
pub mod needles;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use needle_core::{InsertionRequest, NeedleConfig, APPLICATION_PROPERTIES};
use needle_files::NeedleLayer;

/// Target file selection shared by `insert` and `locate`
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// File to edit, relative to --root
    ///
    /// Defaults to the project's `ApplicationProperties.java` for the
    /// application-properties file type.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Project root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// File type whose needles apply
    #[arg(long, default_value = APPLICATION_PROPERTIES)]
    pub file_type: String,
}

impl TargetArgs {
    /// Relative path of the target file
    pub fn path(&self, layer: &NeedleLayer) -> Result<PathBuf> {
        match &self.file {
            Some(file) => Ok(file.clone()),
            None if self.file_type == APPLICATION_PROPERTIES => {
                Ok(layer.application_properties_path().to_path_buf())
            }
            None => bail!("--file is required for file type '{}'", self.file_type),
        }
    }
}

/// Configuration from `path`, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<NeedleConfig> {
    let Some(path) = path else {
        return Ok(NeedleConfig::default());
    };
    let config = NeedleConfig::from_file(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Split `KEY=FRAGMENT`
pub fn parse_entry(raw: &str) -> Result<(String, String), String> {
    let (key, fragment) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=FRAGMENT, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing needle key in '{raw}'"));
    }
    Ok((key.to_string(), fragment.to_string()))
}

/// Fragment text; `@path` reads it from a file
pub fn resolve_fragment(fragment: &str) -> Result<String> {
    match fragment.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fragment from {path}")),
        None => Ok(fragment.to_string()),
    }
}

/// Request from parsed entries, in command-line order
pub fn build_request(entries: &[(String, String)]) -> Result<InsertionRequest> {
    let mut request = InsertionRequest::new();
    for (key, fragment) in entries {
        request.insert(key.clone(), resolve_fragment(fragment)?);
    }
    Ok(request)
}
