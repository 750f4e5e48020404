//! Source directory scanning.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SpriteError};

use super::ImageKind;

/// Images found directly inside a source directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Raster (PNG) files, sorted by file name.
    pub rasters: Vec<PathBuf>,
    /// Vector (SVG) files, sorted by file name.
    pub vectors: Vec<PathBuf>,
}

impl ScanResult {
    /// All images in file-name order.
    pub fn all(&self) -> Vec<PathBuf> {
        let mut all: Vec<PathBuf> = self.rasters.iter().chain(&self.vectors).cloned().collect();
        all.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        all
    }
}

/// List the images in `dir` (not recursive).
///
/// A missing directory yields an empty result. Any other failure to read
/// `dir` itself is an I/O error.
pub fn scan_directory(dir: &Path) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                if err.io_error().is_some_and(|e| e.kind() == ErrorKind::NotFound) {
                    break;
                }
                return Err(SpriteError::Io {
                    path: dir.to_path_buf(),
                    message: format!("Failed to read source directory: {}", err),
                });
            }
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match ImageKind::from_path(entry.path()) {
            Some(ImageKind::Raster) => result.rasters.push(entry.into_path()),
            Some(ImageKind::Vector) => result.vectors.push(entry.into_path()),
            None => {}
        }
    }

    Ok(result)
}

/// Subdirectories at any depth below `dir` that contain at least one PNG,
/// sorted by path.
pub fn find_source_directories(dir: &Path) -> Vec<PathBuf> {
    source_directories(WalkDir::new(dir), dir)
}

/// Immediate subdirectories of `dir` that contain at least one PNG,
/// sorted by path.
pub fn find_sprite_directories(dir: &Path) -> Vec<PathBuf> {
    source_directories(WalkDir::new(dir).max_depth(1), dir)
}

fn source_directories(walk: WalkDir, dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = walk
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter(|e| !is_hidden(e.path().strip_prefix(dir).unwrap_or(e.path())))
        .filter(|e| scan_directory(e.path()).is_ok_and(|scan| !scan.rasters.is_empty()))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| s.starts_with('.') && s != "." && s != "..")
    })
}
