//! Writing generated files.

use std::fs;
use std::path::Path;

use crate::error::{Result, SpriteError};

/// What happened when writing a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
    /// The file already had exactly these contents.
    Identical,
    /// The file exists and overwriting is disabled.
    Skipped,
}

impl WriteOutcome {
    /// Status verb for the printer.
    pub fn verb(self) -> &'static str {
        match self {
            WriteOutcome::Created => "Created",
            WriteOutcome::Overwritten => "Overwrote",
            WriteOutcome::Identical => "Identical",
            WriteOutcome::Skipped => "Skipped",
        }
    }
}

/// Write `contents` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, contents: &[u8], overwrite: bool) -> Result<WriteOutcome> {
    let outcome = if path.exists() {
        let existing = fs::read(path).map_err(|e| SpriteError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read existing file: {}", e),
        })?;
        if existing == contents {
            return Ok(WriteOutcome::Identical);
        }
        if !overwrite {
            return Ok(WriteOutcome::Skipped);
        }
        WriteOutcome::Overwritten
    } else {
        WriteOutcome::Created
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SpriteError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create directory: {}", e),
        })?;
    }

    fs::write(path, contents).map_err(|e| SpriteError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write file: {}", e),
    })?;

    Ok(outcome)
}
