//! Shared test fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::config::Options;
use crate::sprite::SpriteSet;

/// Write a solid `size`x`size` PNG.
pub fn write_png(path: &Path, size: u32, color: [u8; 4]) {
    RgbaImage::from_pixel(size, size, Rgba(color))
        .save(path)
        .unwrap();
}

/// Create `<dir>/simple` holding `blue.png` and `red.png`, both 10x10.
pub fn simple_source(dir: &Path) -> PathBuf {
    let source = dir.join("simple");
    fs::create_dir_all(&source).unwrap();
    write_png(&source.join("blue.png"), 10, [0, 0, 255, 255]);
    write_png(&source.join("red.png"), 10, [255, 0, 0, 255]);
    source
}

/// The `simple` sprite, combined into `dir` itself.
pub fn simple_sprite(dir: &Path) -> SpriteSet {
    let source = simple_source(dir);
    SpriteSet::new(&source, dir, &Options::default()).unwrap()
}
