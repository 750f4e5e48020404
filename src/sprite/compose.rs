//! Compositing placed images into a single PNG.

use std::io::Cursor;

use image::{imageops, ImageFormat, RgbaImage};

use crate::error::{Result, SpriteError};

use super::ImageDescriptor;

/// Paints placed images onto a canvas and encodes the result.
pub trait Compositor {
    /// Render `images` at `(|left|, |top|)` on a transparent
    /// `width`×`height` canvas and return the encoded bytes.
    fn compose(&self, name: &str, width: u32, height: u32, images: &[ImageDescriptor])
        -> Result<Vec<u8>>;
}

/// RGBA PNG compositor backed by the `image` crate.
///
/// Pixels are copied, not blended, so each image keeps its exact alpha.
/// Vector images have no raster content here; their region stays transparent.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngCompositor;

impl Compositor for PngCompositor {
    fn compose(
        &self,
        name: &str,
        width: u32,
        height: u32,
        images: &[ImageDescriptor],
    ) -> Result<Vec<u8>> {
        let failure = |message: String| SpriteError::Composition {
            name: name.to_string(),
            message,
        };

        let mut canvas = RgbaImage::new(width, height);

        for image in images.iter().filter(|i| !i.is_vector()) {
            let source = image::load_from_memory(image.raw_bytes()?)
                .map_err(|e| failure(format!("{}: {}", image.name, e)))?
                .to_rgba8();
            imageops::replace(&mut canvas, &source, image.left.abs(), image.top.abs());
        }

        let mut bytes = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| failure(format!("PNG encoding failed: {}", e)))?;

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::{layout, ImageKind, Orientation};
    use image::Rgba;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32, colour: [u8; 4]) -> ImageDescriptor {
        let path = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba(colour)).save(&path).unwrap();
        ImageDescriptor::open(&path).unwrap()
    }

    #[test]
    fn test_compose_vertical_stack() {
        let dir = tempdir().unwrap();
        let images = vec![
            write_png(dir.path(), "blue.png", 2, 2, [0, 0, 255, 255]),
            write_png(dir.path(), "red.png", 3, 1, [255, 0, 0, 255]),
        ];
        let placed = layout(images, Orientation::Vertical, 1).unwrap();

        let bytes = PngCompositor
            .compose("simple", placed.width, placed.height, &placed.images)
            .unwrap();
        let canvas = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(canvas.dimensions(), (3, 4));
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(canvas.get_pixel(1, 1).0, [0, 0, 255, 255]);
        // Uncovered corner and spacing row are transparent
        assert_eq!(canvas.get_pixel(2, 0).0, [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(0, 2).0, [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(2, 3).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_compose_preserves_partial_alpha() {
        let dir = tempdir().unwrap();
        let images = vec![
            write_png(dir.path(), "a.png", 1, 1, [10, 20, 30, 77]),
            write_png(dir.path(), "b.png", 1, 1, [0, 0, 0, 0]),
        ];
        let placed = layout(images, Orientation::Horizontal, 0).unwrap();

        let bytes = PngCompositor
            .compose("alpha", placed.width, placed.height, &placed.images)
            .unwrap();
        let canvas = image::load_from_memory(&bytes).unwrap().to_rgba8();

        assert_eq!(canvas.get_pixel(0, 0).0, [10, 20, 30, 77]);
        assert_eq!(canvas.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let dir = tempdir().unwrap();
        let images = vec![
            write_png(dir.path(), "a.png", 4, 4, [1, 2, 3, 255]),
            write_png(dir.path(), "b.png", 4, 4, [4, 5, 6, 128]),
        ];
        let placed = layout(images, Orientation::Vertical, 2).unwrap();

        let first = PngCompositor
            .compose("x", placed.width, placed.height, &placed.images)
            .unwrap();
        let second = PngCompositor
            .compose("x", placed.width, placed.height, &placed.images)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compose_reports_corrupt_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let image = ImageDescriptor::new(&path, 1, 1, ImageKind::Raster).unwrap();

        let result = PngCompositor.compose("broken", 1, 1, &[image]);
        assert!(matches!(result, Err(SpriteError::Composition { .. })));
    }
}
