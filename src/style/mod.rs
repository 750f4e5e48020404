//! Stylesheet generation.
//!
//! Turns a laid-out `SpriteSet` plus run options into CSS or SCSS text:
//! naming rules, sprite URLs, the read-only template surface and the
//! template language itself.

pub mod context;
pub mod naming;
pub mod paths;
pub mod stylesheet;
pub mod template;
pub mod view;

pub use context::{data_uri, svg_data_uri, StyleContext};
pub use naming::class_name_for;
pub use paths::{relative_path, PathResolver, UrlMode};
pub use stylesheet::{builtin_template, Stylesheet, TemplateSource};
pub use template::Template;
pub use view::{css_length, ImageView, SpriteView};
