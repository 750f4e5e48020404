//! The read-only surface stylesheet templates render against.

use std::collections::HashMap;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::{Format, Options};
use crate::error::Result;
use crate::sprite::{ImageDescriptor, SpriteSet};

use super::paths::PathResolver;
use super::view::{ImageView, SpriteView};

/// Base64 `data:` URI for SVG markup.
pub fn svg_data_uri(blob: &[u8]) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(blob))
}

/// Data URI for a vector image; `None` for raster images.
pub fn data_uri(image: &ImageDescriptor, optimize_svg: bool) -> Result<Option<String>> {
    if !image.is_vector() {
        return Ok(None);
    }
    Ok(Some(svg_data_uri(&image.blob(optimize_svg)?)))
}

/// Everything a template can see for one sprite.
///
/// File reads (SVG sources for data URIs) happen in `new`, so rendering
/// against a context is a pure text transformation.
#[derive(Debug)]
pub struct StyleContext<'a> {
    sprite: &'a SpriteSet,
    options: &'a Options,
    image_url: String,
    data_uris: HashMap<String, String>,
}

impl<'a> StyleContext<'a> {
    /// Build the context for a stylesheet written to `destination`.
    pub fn new(sprite: &'a SpriteSet, options: &'a Options, destination: &Path) -> Result<Self> {
        let image_url = PathResolver::new(options, destination).image_url(sprite)?;

        let mut data_uris = HashMap::new();
        for image in sprite.images() {
            if let Some(uri) = data_uri(image, options.optimize_svg)? {
                data_uris.insert(image.name.clone(), uri);
            }
        }

        Ok(Self {
            sprite,
            options,
            image_url,
            data_uris,
        })
    }

    pub fn sprite(&self) -> &'a SpriteSet {
        self.sprite
    }

    pub fn format(&self) -> Format {
        self.options.format
    }

    pub fn is_mixin(&self) -> bool {
        self.options.mixin
    }

    pub fn is_rails(&self) -> bool {
        self.options.rails
    }

    pub fn is_scaled(&self) -> bool {
        self.options.scale
    }

    pub fn cli_args(&self) -> &'a [String] {
        &self.options.cli_args
    }

    /// URL of the combined image as seen from the stylesheet.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// `%` for placeholder selectors, `@mixin ` for mixins.
    pub fn extension_prefix(&self) -> &'static str {
        if self.is_mixin() {
            "@mixin "
        } else {
            "%"
        }
    }

    /// `@extend %` for placeholder selectors, `@include ` for mixins.
    pub fn extension_strategy(&self) -> &'static str {
        if self.is_mixin() {
            "@include "
        } else {
            "@extend %"
        }
    }

    /// Data URI of a vector image in this sprite.
    pub fn data_uri(&self, image: &ImageDescriptor) -> Option<&str> {
        self.data_uris.get(&image.name).map(String::as_str)
    }

    pub fn sprite_view(&self) -> SpriteView<'_> {
        SpriteView::new(self)
    }

    pub fn image_view<'v>(&'v self, image: &'v ImageDescriptor) -> ImageView<'v> {
        ImageView::new(self, image)
    }
}
