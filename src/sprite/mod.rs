//! Sprite construction.
//!
//! Scans a source directory, lays the images out along one axis and
//! composites them into a single PNG.

mod compose;
mod descriptor;
mod layout;
mod scanner;
mod set;
pub mod svg;

pub use compose::{Compositor, PngCompositor};
pub use descriptor::{ImageDescriptor, ImageKind};
pub use layout::{layout, Layout, Orientation, StackLayout};
pub use scanner::{find_source_directories, find_sprite_directories, scan_directory, ScanResult};
pub use set::SpriteSet;
