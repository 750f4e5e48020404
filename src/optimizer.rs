//! Lossless PNG optimization through external tools.
//!
//! Only a fixed allow-list of optimizers is ever run. Missing tools are not
//! an error: the optimizer simply reports itself as disabled.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use crate::error::{Result, SpriteError};

/// A supported PNG optimizer binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pngcrush,
    Pngout,
    Optipng,
    Advpng,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Pngcrush, Tool::Pngout, Tool::Optipng, Tool::Advpng];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Pngcrush => "pngcrush",
            Tool::Pngout => "pngout",
            Tool::Optipng => "optipng",
            Tool::Advpng => "advpng",
        }
    }

    /// Arguments that optimize `path` in place.
    fn args(self, path: &Path) -> Vec<OsString> {
        let flags: &[&str] = match self {
            Tool::Pngcrush => &["-ow", "-q"],
            Tool::Pngout => &["-y", "-q"],
            Tool::Optipng => &["-quiet"],
            Tool::Advpng => &["-z", "-q"],
        };
        flags
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(path.as_os_str().to_os_string()))
            .collect()
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Locate an executable named `name` in a `PATH`-style list of directories.
pub fn find_in_path(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Tools found on `PATH`, probed once per process.
fn installed_tools() -> &'static [Tool] {
    static INSTALLED: OnceLock<Vec<Tool>> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let path_var = env::var_os("PATH").unwrap_or_default();
        Tool::ALL
            .into_iter()
            .filter(|tool| find_in_path(tool.name(), &path_var).is_some())
            .collect()
    })
}

/// Runs every available optimizer over a PNG file.
#[derive(Debug, Clone)]
pub struct PngOptimizer {
    tools: Vec<Tool>,
}

impl PngOptimizer {
    /// Use whichever allow-listed tools are installed.
    pub fn detect() -> Self {
        Self {
            tools: installed_tools().to_vec(),
        }
    }

    /// Use exactly `tools`.
    pub fn with_tools(tools: Vec<Tool>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Whether optimizing would do anything.
    pub fn enabled(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Optimize `path` in place with each tool in turn.
    ///
    /// Stops at the first tool that fails to start or exits unsuccessfully.
    pub fn optimize(&self, path: &Path) -> Result<()> {
        for tool in &self.tools {
            let output = Command::new(tool.name())
                .args(tool.args(path))
                .output()
                .map_err(|e| SpriteError::Optimizer {
                    tool: tool.name().to_string(),
                    message: e.to_string(),
                })?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(SpriteError::Optimizer {
                    tool: tool.name().to_string(),
                    message: format!("{} ({})", stderr.trim(), output.status),
                });
            }
        }
        Ok(())
    }
}
