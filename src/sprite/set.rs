//! A sprite: one source directory combined into one image.

use std::path::{Path, PathBuf};

use crate::config::Options;
use crate::error::{Result, SpriteError};

use super::compose::{Compositor, PngCompositor};
use super::layout::{Orientation, StackLayout};
use super::scanner::scan_directory;
use super::ImageDescriptor;

/// The images of one source directory and their combined geometry.
#[derive(Debug, Clone)]
pub struct SpriteSet {
    /// Sprite name, taken from the source directory's base name.
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub orientation: Orientation,
    pub spacing: u32,
    pub width: u32,
    pub height: u32,
    images: Vec<ImageDescriptor>,
    combined: Option<Vec<u8>>,
}

impl SpriteSet {
    /// Scan `source` and lay out its images.
    ///
    /// Fails with `EmptySource` when the directory holds no PNG files.
    pub fn new(source: &Path, destination: &Path, options: &Options) -> Result<Self> {
        let scan = scan_directory(source)?;
        if scan.rasters.is_empty() {
            return Err(SpriteError::EmptySource {
                path: source.to_path_buf(),
            });
        }

        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SpriteError::Build {
                message: format!("Cannot derive a sprite name from {}", source.display()),
                help: Some("Pass the source directory by name rather than '.' or '..'".to_string()),
            })?;

        let images = scan
            .all()
            .iter()
            .map(|path| ImageDescriptor::open(path))
            .collect::<Result<Vec<_>>>()?;

        let mut sprite = Self {
            name,
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            orientation: options.orientation,
            spacing: options.spacing,
            width: 0,
            height: 0,
            images,
            combined: None,
        };
        sprite.arrange()?;
        Ok(sprite)
    }

    /// File name of the combined image.
    pub fn filename(&self) -> String {
        format!("{}.png", self.name)
    }

    /// Where the combined image is written.
    pub fn path(&self) -> PathBuf {
        self.destination.join(self.filename())
    }

    /// Images in file-name order. Each call starts a fresh iteration.
    pub fn images(&self) -> std::slice::Iter<'_, ImageDescriptor> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Encoded PNG bytes, available after `combine`.
    pub fn blob(&self) -> Option<&[u8]> {
        self.combined.as_deref()
    }

    /// Lay out and composite the images with the PNG compositor.
    pub fn combine(&mut self) -> Result<&[u8]> {
        self.combine_with(&PngCompositor)
    }

    /// Lay out and composite the images with a custom compositor.
    ///
    /// Layout is recomputed from scratch, so repeated calls give identical
    /// results for unchanged inputs.
    pub fn combine_with(&mut self, compositor: &dyn Compositor) -> Result<&[u8]> {
        self.combined = None;
        self.arrange()?;
        let bytes = compositor.compose(&self.name, self.width, self.height, &self.images)?;
        let combined = self.combined.insert(bytes);
        Ok(combined.as_slice())
    }

    fn arrange(&mut self) -> Result<()> {
        let (width, height) = StackLayout::new(self.orientation, self.spacing)
            .arrange(&mut self.images)
            .ok_or_else(|| SpriteError::Composition {
                name: self.name.clone(),
                message: format!("stacked images exceed {} pixels", u32::MAX),
            })?;
        self.width = width;
        self.height = height;
        Ok(())
    }
}
