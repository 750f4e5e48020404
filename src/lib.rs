//! spriteful - Image sprites with matching stylesheets
//!
//! A library for combining directories of images into single sprite images
//! and rendering CSS or SCSS that addresses each image inside the sprite.

pub mod cli;
pub mod config;
pub mod error;
pub mod optimizer;
pub mod output;
pub mod sprite;
pub mod style;

#[cfg(test)]
mod fixtures;

pub use config::{Format, Manifest, Options};
pub use error::{Result, SpriteError};
pub use optimizer::PngOptimizer;
pub use sprite::{
    layout, Compositor, ImageDescriptor, ImageKind, Layout, Orientation, PngCompositor,
    SpriteSet, StackLayout,
};
pub use style::{class_name_for, PathResolver, StyleContext, Stylesheet, Template};
