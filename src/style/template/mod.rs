//! A small, constrained template language for stylesheets.
//!
//! Templates are plain text with three kinds of delimiters:
//!
//! - `{{ expr }}` prints a value
//! - `{% if expr %}`, `{% else %}`, `{% endif %}`, `{% for x in expr %}`,
//!   `{% endfor %}` control flow
//! - `{# … #}` comments
//!
//! Expressions can only reach the read-only surface of a `StyleContext`:
//! the `sprite` and its `images`, the format flags, the invoking command
//! line and a handful of helper functions. There is no way to run code or
//! touch the filesystem from a template.
//!
//! # Usage
//!
//! ```ignore
//! use spriteful::style::template::Template;
//!
//! let template = Template::parse("{% for image in sprite.images %}{{ image.selector }}\n{% endfor %}")?;
//! let css = template.render(&context)?;
//! ```

mod eval;
mod expr;
mod lexer;
mod location;
mod parser;

pub use location::{offset_to_location, Location};

use crate::error::Result;

use super::context::StyleContext;
use eval::Renderer;
use parser::Node;

/// A parsed template, ready to render against any number of contexts.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template text. Syntax errors carry the line and column.
    pub fn parse(source: &str) -> Result<Self> {
        let nodes = lexer::tokenize(source)
            .and_then(parser::parse)
            .map_err(|e| e.locate(source))?;
        Ok(Self {
            source: source.to_string(),
            nodes,
        })
    }

    /// Render against `ctx`. Either the whole text or an error; never a
    /// partial result.
    pub fn render(&self, ctx: &StyleContext<'_>) -> Result<String> {
        Renderer::new(ctx)
            .render(&self.nodes)
            .map_err(|e| e.locate(&self.source))
    }
}

/// Parse and render `source` in one step.
pub fn render(source: &str, ctx: &StyleContext<'_>) -> Result<String> {
    Template::parse(source)?.render(ctx)
}
