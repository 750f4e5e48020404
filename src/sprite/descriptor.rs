//! Source image metadata.

use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpriteError};

use super::svg;

/// Whether a source image is a raster bitmap or a scalable vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Raster,
    Vector,
}

impl ImageKind {
    /// Detect the kind from a file extension (`png` or `svg`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("png") {
            Some(ImageKind::Raster)
        } else if ext.eq_ignore_ascii_case("svg") {
            Some(ImageKind::Vector)
        } else {
            None
        }
    }
}

/// One source image of a sprite.
///
/// `top` and `left` are filled in by the layout: offsets are zero or
/// negative along the stacking axis and zero on the cross axis.
#[derive(Debug, Clone)]
pub struct ImageDescriptor {
    pub name: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub top: i64,
    pub left: i64,
    pub kind: ImageKind,
    bytes: OnceCell<Vec<u8>>,
}

impl ImageDescriptor {
    /// Build a descriptor from already known dimensions.
    ///
    /// Fails when either dimension is zero.
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32, kind: ImageKind) -> Result<Self> {
        let path = path.into();
        if width == 0 || height == 0 {
            return Err(SpriteError::Image {
                path,
                message: format!("invalid dimensions {}x{}", width, height),
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            path,
            width,
            height,
            top: 0,
            left: 0,
            kind,
            bytes: OnceCell::new(),
        })
    }

    /// Read dimensions from the file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let kind = ImageKind::from_path(path).ok_or_else(|| SpriteError::Image {
            path: path.to_path_buf(),
            message: "unsupported image type".to_string(),
        })?;

        match kind {
            ImageKind::Raster => {
                let (width, height) =
                    image::image_dimensions(path).map_err(|e| SpriteError::Image {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                Self::new(path, width, height, kind)
            }
            ImageKind::Vector => {
                let bytes = fs::read(path).map_err(|e| SpriteError::Io {
                    path: path.to_path_buf(),
                    message: format!("Failed to read image: {}", e),
                })?;
                let (width, height) = svg::dimensions(&String::from_utf8_lossy(&bytes))
                    .ok_or_else(|| SpriteError::Image {
                        path: path.to_path_buf(),
                        message: "SVG has no width/height or viewBox".to_string(),
                    })?;
                let image = Self::new(path, width, height, kind)?;
                let _ = image.bytes.set(bytes);
                Ok(image)
            }
        }
    }

    pub fn is_vector(&self) -> bool {
        self.kind == ImageKind::Vector
    }

    /// File contents, read on first access.
    pub fn raw_bytes(&self) -> Result<&[u8]> {
        if let Some(bytes) = self.bytes.get() {
            return Ok(bytes);
        }
        let bytes = fs::read(&self.path).map_err(|e| SpriteError::Io {
            path: self.path.clone(),
            message: format!("Failed to read image: {}", e),
        })?;
        Ok(self.bytes.get_or_init(|| bytes))
    }

    /// Bytes to embed in a stylesheet: SVG sources go through the
    /// optimizer when `optimize_svg` is set.
    pub fn blob(&self, optimize_svg: bool) -> Result<Vec<u8>> {
        let raw = self.raw_bytes()?;
        if self.is_vector() && optimize_svg {
            Ok(svg::optimize(&String::from_utf8_lossy(raw)).into_bytes())
        } else {
            Ok(raw.to_vec())
        }
    }

    /// Reset placement before a layout pass.
    pub(crate) fn reset_offsets(&mut self) {
        self.top = 0;
        self.left = 0;
    }
}
