//! Init command implementation.
//!
//! Generates a `spriteful.yaml` manifest listing the image directories
//! found under a project.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::{Manifest, MANIFEST_FILENAME};
use crate::error::{Result, SpriteError};
use crate::output::{display_path, plural, Printer};
use crate::sprite::find_source_directories;

/// Initialize a spriteful project by generating a spriteful.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing spriteful.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(SpriteError::Build {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let sources: Vec<PathBuf> = find_source_directories(&args.path)
        .iter()
        .map(|dir| relative_to(dir, &args.path))
        .collect();

    let manifest = Manifest {
        sources,
        destination: Some(PathBuf::from("sprites")),
        stylesheets: Some(PathBuf::from("stylesheets")),
        ..Manifest::default()
    };
    let yaml = serde_yaml::to_string(&manifest).map_err(|e| SpriteError::Build {
        message: format!("Failed to serialize manifest: {}", e),
        help: None,
    })?;

    fs::write(&manifest_path, &yaml).map_err(|e| SpriteError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if !manifest.sources.is_empty() {
        let dirs: Vec<String> = manifest
            .sources
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        printer.info("Discovered", &dirs.join(", "));
    }

    printer.status(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(manifest.sources.len(), "source", "sources")
        ),
    );

    Ok(())
}

fn relative_to(dir: &Path, root: &Path) -> PathBuf {
    dir.strip_prefix(root).unwrap_or(dir).to_path_buf()
}
