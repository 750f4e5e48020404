//! End-to-end tests through the public API.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use spriteful::cli::build::{run_in, BuildArgs};
use spriteful::output::Printer;
use spriteful::{Format, Options, Orientation, SpriteError, SpriteSet, Stylesheet};

fn write_png(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    RgbaImage::from_pixel(width, height, Rgba(color))
        .save(path)
        .unwrap();
}

fn project(root: &Path) -> PathBuf {
    let icons = root.join("icons");
    fs::create_dir_all(&icons).unwrap();
    write_png(&icons.join("arrow_left.png"), 16, 8, [255, 0, 0, 255]);
    write_png(&icons.join("Home.png"), 12, 12, [0, 255, 0, 255]);
    write_png(&icons.join("search.png"), 8, 16, [0, 0, 255, 255]);
    fs::write(icons.join("notes.txt"), "ignored").unwrap();
    icons
}

#[test]
fn sprite_geometry_and_pixels() {
    let dir = tempdir().unwrap();
    let icons = project(dir.path());
    let options = Options {
        spacing: 2,
        ..Options::default()
    };

    let mut sprite = SpriteSet::new(&icons, dir.path(), &options).unwrap();
    let placed: Vec<(String, i64)> = sprite.images().map(|i| (i.name.clone(), i.top)).collect();
    assert_eq!(
        placed,
        vec![
            ("Home.png".to_string(), 0),
            ("arrow_left.png".to_string(), -14),
            ("search.png".to_string(), -24),
        ]
    );
    assert_eq!((sprite.width, sprite.height), (16, 40));

    let bytes = sprite.combine().unwrap().to_vec();
    let canvas = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(canvas.dimensions(), (16, 40));
    assert_eq!(canvas.get_pixel(0, 0).0, [0, 255, 0, 255]);
    assert_eq!(canvas.get_pixel(0, 13).0, [0, 0, 0, 0]);
    assert_eq!(canvas.get_pixel(15, 14).0, [255, 0, 0, 255]);
    assert_eq!(canvas.get_pixel(7, 39).0, [0, 0, 255, 255]);
}

#[test]
fn horizontal_scss_stylesheet() {
    let dir = tempdir().unwrap();
    let icons = project(dir.path());
    let options = Options {
        format: Format::Scss,
        orientation: Orientation::Horizontal,
        ..Options::default()
    };

    let sprite = SpriteSet::new(&icons, &dir.path().join("public"), &options).unwrap();
    let stylesheet = Stylesheet::new(&sprite, &dir.path().join("scss"), &options);
    let scss = stylesheet.render().unwrap();

    assert_eq!(stylesheet.name(), "_icons.scss");
    assert!(scss.contains("$icons-sprite-names: home arrow-left search;"));
    assert!(scss.contains("%icons-sprite {\n  background-image: url('../public/icons.png');"));
    assert!(scss.contains("%icons-sprite-arrow-left {\n  @extend %icons-sprite;\n  background-position: -12px 0px;"));
    assert!(scss.contains("%icons-sprite-search {\n  @extend %icons-sprite;\n  background-position: -28px 0px;"));
}

#[test]
fn build_command_end_to_end() {
    let dir = tempdir().unwrap();
    project(dir.path());
    fs::create_dir_all(dir.path().join("empty")).unwrap();

    let args = BuildArgs {
        sources: vec![PathBuf::from("icons"), PathBuf::from("empty")],
        stylesheets: Some(PathBuf::from("public/css")),
        destination: Some(PathBuf::from("public/images")),
        root: Some(PathBuf::from("public")),
        no_optimize: true,
        ..BuildArgs::default()
    };
    let raw = vec!["icons".to_string(), "empty".to_string()];

    let err = run_in(args, raw, dir.path(), &Printer::new()).unwrap_err();
    assert!(matches!(err, SpriteError::Build { .. }));

    let css = fs::read_to_string(dir.path().join("public/css/icons.css")).unwrap();
    assert!(css.contains("  spriteful icons empty\n"));
    assert!(css.contains("background-image: url('/images/icons.png');"));
    assert!(css.contains(".icons.search {\n  background-position: 0px -20px;\n  width: 8px;\n  height: 16px;\n}"));
    assert!(dir.path().join("public/images/icons.png").exists());
}
