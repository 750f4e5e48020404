//! Stylesheets for combined sprites.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Format, Options};
use crate::error::{Result, SpriteError};
use crate::sprite::SpriteSet;

use super::context::StyleContext;
use super::template::Template;

const CSS_TEMPLATE: &str = include_str!("templates/template.css");
const SCSS_TEMPLATE: &str = include_str!("templates/template.scss");

/// Template text shipped for `format`.
pub fn builtin_template(format: Format) -> &'static str {
    match format {
        Format::Css => CSS_TEMPLATE,
        Format::Scss => SCSS_TEMPLATE,
    }
}

/// Where a stylesheet's template text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Builtin(Format),
    File(PathBuf),
}

impl TemplateSource {
    /// The custom template if one is configured, otherwise the built-in
    /// template for the configured format.
    pub fn for_options(options: &Options) -> Self {
        match &options.template {
            Some(path) => TemplateSource::File(path.clone()),
            None => TemplateSource::Builtin(options.format),
        }
    }

    pub fn read(&self) -> Result<Cow<'static, str>> {
        match self {
            TemplateSource::Builtin(format) => Ok(Cow::Borrowed(builtin_template(*format))),
            TemplateSource::File(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|e| SpriteError::Io {
                    path: path.clone(),
                    message: format!("Cannot read template: {}", e),
                }),
        }
    }
}

/// The stylesheet for one sprite.
#[derive(Debug)]
pub struct Stylesheet<'a> {
    sprite: &'a SpriteSet,
    options: &'a Options,
    destination: PathBuf,
    template: TemplateSource,
}

impl<'a> Stylesheet<'a> {
    /// A stylesheet for `sprite` that will live in `destination`.
    pub fn new(sprite: &'a SpriteSet, destination: &Path, options: &'a Options) -> Self {
        Self {
            sprite,
            options,
            destination: destination.to_path_buf(),
            template: TemplateSource::for_options(options),
        }
    }

    pub fn format(&self) -> Format {
        self.options.format
    }

    pub fn template(&self) -> &TemplateSource {
        &self.template
    }

    /// File name: `simple.css` (`simple.css.erb` for Rails), `_simple.scss`.
    pub fn name(&self) -> String {
        let extension = self.format().extension();
        match (self.format(), self.options.rails) {
            (Format::Css, false) => format!("{}.{}", self.sprite.name, extension),
            (Format::Css, true) => format!("{}.{}.erb", self.sprite.name, extension),
            (Format::Scss, _) => format!("_{}.{}", self.sprite.name, extension),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.destination.join(self.name())
    }

    /// Render the stylesheet text.
    pub fn render(&self) -> Result<String> {
        let source = self.template.read()?;
        let template = Template::parse(&source)?;
        let ctx = StyleContext::new(self.sprite, self.options, &self.destination)?;
        template.render(&ctx)
    }
}
