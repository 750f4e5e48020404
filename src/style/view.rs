//! Derived, format-aware values for sprites and images.
//!
//! Views borrow a `StyleContext` and compute selector names, background
//! expressions and lengths on demand; they never own sprite data.

use crate::config::Format;
use crate::sprite::ImageDescriptor;

use super::context::StyleContext;
use super::naming::class_name_for;

/// Render a pixel length, halving it for double-density sprites.
pub fn css_length(pixels: i64, scaled: bool) -> String {
    if !scaled {
        format!("{}px", pixels)
    } else if pixels % 2 == 0 {
        format!("{}px", pixels / 2)
    } else {
        format!("{:.1}px", pixels as f64 / 2.0)
    }
}

/// Sprite-level values.
#[derive(Clone, Copy)]
pub struct SpriteView<'v> {
    ctx: &'v StyleContext<'v>,
}

impl<'v> SpriteView<'v> {
    pub fn new(ctx: &'v StyleContext<'v>) -> Self {
        Self { ctx }
    }

    /// Class name derived from the sprite name alone.
    pub fn base_class_name(&self) -> String {
        class_name_for(&self.ctx.sprite().name)
    }

    /// Selector name for the sprite block: `simple` in CSS,
    /// `%simple-sprite` or `@mixin simple-sprite` in SCSS.
    pub fn class_name(&self) -> String {
        match self.ctx.format() {
            Format::Css => self.base_class_name(),
            Format::Scss => format!(
                "{}{}-sprite",
                self.ctx.extension_prefix(),
                self.base_class_name()
            ),
        }
    }

    /// CSS expression for the sprite image.
    pub fn background_image(&self) -> String {
        let url = self.ctx.image_url();
        match (self.ctx.format(), self.ctx.is_rails()) {
            (Format::Css, true) => format!("<%= image_url('{}') %>", url),
            (Format::Scss, true) => format!("image-url('{}')", url),
            (_, false) => format!("url('{}')", url),
        }
    }

    /// `background-size` value matching the rendered sprite size.
    pub fn background_size(&self) -> String {
        let sprite = self.ctx.sprite();
        let scaled = self.ctx.is_scaled();
        format!(
            "{} {}",
            css_length(i64::from(sprite.width), scaled),
            css_length(i64::from(sprite.height), scaled)
        )
    }

    /// SCSS statement pulling in the sprite block, e.g. `@extend %simple-sprite;`.
    pub fn extension(&self) -> String {
        format!(
            "{}{}-sprite;",
            self.ctx.extension_strategy(),
            self.base_class_name()
        )
    }

    /// SCSS list variable naming every image class.
    pub fn names_variable(&self) -> String {
        let names: Vec<String> = self
            .ctx
            .sprite()
            .images()
            .map(|image| class_name_for(&image.name))
            .collect();
        format!("${}-sprite-names: {};", self.base_class_name(), names.join(" "))
    }
}

/// Image-level values.
#[derive(Clone, Copy)]
pub struct ImageView<'v> {
    ctx: &'v StyleContext<'v>,
    image: &'v ImageDescriptor,
}

impl<'v> ImageView<'v> {
    pub fn new(ctx: &'v StyleContext<'v>, image: &'v ImageDescriptor) -> Self {
        Self { ctx, image }
    }

    pub fn image(&self) -> &'v ImageDescriptor {
        self.image
    }

    pub fn class_name(&self) -> String {
        class_name_for(&self.image.name)
    }

    /// `.simple.blue` in CSS, `simple-sprite-blue` in SCSS.
    pub fn selector(&self) -> String {
        let sprite = self.ctx.sprite_view().base_class_name();
        match self.ctx.format() {
            Format::Css => format!(".{}.{}", sprite, self.class_name()),
            Format::Scss => format!("{}-sprite-{}", sprite, self.class_name()),
        }
    }

    pub fn background_position(&self) -> String {
        let scaled = self.ctx.is_scaled();
        format!(
            "{} {}",
            css_length(self.image.left, scaled),
            css_length(self.image.top, scaled)
        )
    }

    pub fn css_width(&self) -> String {
        css_length(i64::from(self.image.width), self.ctx.is_scaled())
    }

    pub fn css_height(&self) -> String {
        css_length(i64::from(self.image.height), self.ctx.is_scaled())
    }

    pub fn data_uri(&self) -> Option<&'v str> {
        self.ctx.data_uri(self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::fixtures::simple_sprite;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_css_length() {
        assert_eq!(css_length(10, false), "10px");
        assert_eq!(css_length(-10, false), "-10px");
        assert_eq!(css_length(0, true), "0px");
        assert_eq!(css_length(-10, true), "-5px");
        assert_eq!(css_length(5, true), "2.5px");
        assert_eq!(css_length(-7, true), "-3.5px");
    }

    #[test]
    fn test_css_views() {
        let dir = tempdir().unwrap();
        let sprite = simple_sprite(dir.path());
        let options = Options::default();
        let ctx = StyleContext::new(&sprite, &options, &sprite.destination).unwrap();

        let view = ctx.sprite_view();
        assert_eq!(view.class_name(), "simple");
        assert_eq!(view.background_image(), "url('simple.png')");
        assert_eq!(view.background_size(), "10px 20px");

        let red = sprite.images().nth(1).unwrap();
        let red = ctx.image_view(red);
        assert_eq!(red.selector(), ".simple.red");
        assert_eq!(red.background_position(), "0px -10px");
        assert_eq!(red.css_width(), "10px");
        assert_eq!(red.data_uri(), None);
    }

    #[test]
    fn test_scss_placeholder_views() {
        let dir = tempdir().unwrap();
        let sprite = simple_sprite(dir.path());
        let options = Options {
            format: Format::Scss,
            ..Options::default()
        };
        let ctx = StyleContext::new(&sprite, &options, &sprite.destination).unwrap();

        let view = ctx.sprite_view();
        assert_eq!(ctx.extension_prefix(), "%");
        assert_eq!(ctx.extension_strategy(), "@extend %");
        assert_eq!(view.class_name(), "%simple-sprite");
        assert_eq!(view.extension(), "@extend %simple-sprite;");
        assert_eq!(view.names_variable(), "$simple-sprite-names: blue red;");

        let blue = ctx.image_view(sprite.images().next().unwrap());
        assert_eq!(blue.selector(), "simple-sprite-blue");
    }

    #[test]
    fn test_scss_mixin_views() {
        let dir = tempdir().unwrap();
        let sprite = simple_sprite(dir.path());
        let options = Options {
            format: Format::Scss,
            mixin: true,
            ..Options::default()
        };
        let ctx = StyleContext::new(&sprite, &options, &sprite.destination).unwrap();

        assert_eq!(ctx.extension_prefix(), "@mixin ");
        assert_eq!(ctx.extension_strategy(), "@include ");
        assert_eq!(ctx.sprite_view().class_name(), "@mixin simple-sprite");
        assert_eq!(ctx.sprite_view().extension(), "@include simple-sprite;");
    }

    #[test]
    fn test_rails_background_image() {
        let dir = tempdir().unwrap();
        let sprite = simple_sprite(dir.path());
        let css = Options {
            rails: true,
            ..Options::default()
        };
        let scss = Options {
            format: Format::Scss,
            ..css.clone()
        };
        let elsewhere = PathBuf::from("/somewhere/else");

        let ctx = StyleContext::new(&sprite, &css, &elsewhere).unwrap();
        assert_eq!(
            ctx.sprite_view().background_image(),
            "<%= image_url('sprites/simple.png') %>"
        );

        let ctx = StyleContext::new(&sprite, &scss, &elsewhere).unwrap();
        assert_eq!(
            ctx.sprite_view().background_image(),
            "image-url('sprites/simple.png')"
        );
    }

    #[test]
    fn test_scaled_views() {
        let dir = tempdir().unwrap();
        let sprite = simple_sprite(dir.path());
        let options = Options {
            scale: true,
            ..Options::default()
        };
        let ctx = StyleContext::new(&sprite, &options, &sprite.destination).unwrap();

        let red = ctx.image_view(sprite.images().nth(1).unwrap());
        assert_eq!(red.background_position(), "0px -5px");
        assert_eq!(red.css_height(), "5px");
        assert_eq!(ctx.sprite_view().background_size(), "5px 10px");
    }
}
