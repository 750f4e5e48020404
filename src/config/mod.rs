//! Run configuration.
//!
//! `Options` is built once per invocation (from CLI flags layered over an
//! optional `spriteful.yaml` manifest) and passed by reference to every
//! component that needs it.

pub mod manifest;
pub mod runcontrol;

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::sprite::Orientation;

pub use manifest::{Manifest, MANIFEST_FILENAME};
pub use runcontrol::RC_FILENAME;

/// Stylesheet output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Css,
    Scss,
}

impl Format {
    /// File extension of stylesheets in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Css => "css",
            Format::Scss => "scss",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Immutable options shared by layout, composition and stylesheet rendering.
#[derive(Debug, Clone)]
pub struct Options {
    /// Stylesheet format.
    pub format: Format,
    /// Stacking axis of the sprite.
    pub orientation: Orientation,
    /// Pixel gap between consecutive images.
    pub spacing: u32,
    /// Use SCSS mixins instead of placeholder selectors.
    pub mixin: bool,
    /// Follow Rails asset pipeline conventions.
    pub rails: bool,
    /// Source images are double density (retina).
    pub scale: bool,
    /// Root directory the sprites are served from.
    pub root: Option<PathBuf>,
    /// Custom template file replacing the built-in one.
    pub template: Option<PathBuf>,
    /// Run external PNG optimizers on written sprites.
    pub optimize: bool,
    /// Minify SVG sources before embedding them.
    pub optimize_svg: bool,
    /// Replace existing output files.
    pub overwrite: bool,
    /// Arguments the tool was invoked with.
    pub cli_args: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format: Format::Css,
            orientation: Orientation::Vertical,
            spacing: 0,
            mixin: false,
            rails: false,
            scale: false,
            root: None,
            template: None,
            optimize: true,
            optimize_svg: true,
            overwrite: true,
            cli_args: Vec::new(),
        }
    }
}
