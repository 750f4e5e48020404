//! Evaluating a parsed template against a `StyleContext`.

use std::fmt::Write as _;

use crate::sprite::{ImageDescriptor, SpriteSet};
use crate::style::context::StyleContext;
use crate::style::naming::class_name_for;

use super::expr::Expr;
use super::location::TemplateError;
use super::parser::Node;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value<'c> {
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value<'c>>),
    Sprite(&'c SpriteSet),
    Image(&'c ImageDescriptor),
}

impl Value<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Sprite(_) => "sprite",
            Value::Image(_) => "image",
        }
    }

    fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Sprite(_) | Value::Image(_) => true,
        }
    }
}

fn int(value: u32) -> Value<'static> {
    Value::Int(i64::from(value))
}

/// Walks nodes and writes output; loop variables live in `locals`.
pub struct Renderer<'c> {
    ctx: &'c StyleContext<'c>,
    locals: Vec<(String, Value<'c>)>,
}

impl<'c> Renderer<'c> {
    pub fn new(ctx: &'c StyleContext<'c>) -> Self {
        Self {
            ctx,
            locals: Vec::new(),
        }
    }

    pub fn render(&mut self, nodes: &[Node]) -> Result<String, TemplateError> {
        let mut out = String::new();
        self.render_into(nodes, &mut out)?;
        Ok(out)
    }

    fn render_into(&mut self, nodes: &[Node], out: &mut String) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output(expr) => self.print(expr, out)?,
                Node::If {
                    condition,
                    then,
                    otherwise,
                } => {
                    let branch = if self.eval(condition)?.is_truthy() {
                        then
                    } else {
                        otherwise
                    };
                    self.render_into(branch, out)?;
                }
                Node::For {
                    binding,
                    iterable,
                    body,
                } => {
                    let items = match self.eval(iterable)? {
                        Value::List(items) => items,
                        Value::Nil => Vec::new(),
                        other => {
                            return Err(TemplateError::new(
                                format!("Cannot iterate over a {}", other.kind()),
                                expr_offset(iterable),
                            ))
                        }
                    };
                    for item in items {
                        self.locals.push((binding.clone(), item));
                        let result = self.render_into(body, out);
                        self.locals.pop();
                        result?;
                    }
                }
            }
        }
        Ok(())
    }

    fn print(&mut self, expr: &Expr, out: &mut String) -> Result<(), TemplateError> {
        match self.eval(expr)? {
            Value::Nil => {}
            Value::Bool(b) => {
                let _ = write!(out, "{}", b);
            }
            Value::Int(n) => {
                let _ = write!(out, "{}", n);
            }
            Value::Str(s) => out.push_str(&s),
            other => {
                return Err(TemplateError::new(
                    format!("Cannot print a {}", other.kind()),
                    expr_offset(expr),
                )
                .with_help("Print one of its attributes instead, such as `.name`"));
            }
        }
        Ok(())
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value<'c>, TemplateError> {
        match expr {
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Not(inner) => Ok(Value::Bool(!self.eval(inner)?.is_truthy())),
            Expr::Name { name, offset } => self.variable(name, *offset),
            Expr::Attr {
                target,
                name,
                offset,
            } => match self.eval(target)? {
                Value::Sprite(sprite) => self.sprite_attr(sprite, name, *offset),
                Value::Image(image) => self.image_attr(image, name, *offset),
                other => Err(no_attribute(other.kind(), name, *offset)),
            },
            Expr::Call { name, args, offset } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.call(name, args, *offset)
            }
        }
    }

    fn variable(&self, name: &str, offset: usize) -> Result<Value<'c>, TemplateError> {
        if let Some((_, value)) = self.locals.iter().rev().find(|(n, _)| n == name) {
            return Ok(value.clone());
        }

        let ctx = self.ctx;
        let value = match name {
            "sprite" => Value::Sprite(ctx.sprite()),
            "format" => Value::Str(ctx.format().to_string()),
            "extension_prefix" => Value::Str(ctx.extension_prefix().to_string()),
            "extension_strategy" => Value::Str(ctx.extension_strategy().to_string()),
            "mixin?" => Value::Bool(ctx.is_mixin()),
            "rails?" => Value::Bool(ctx.is_rails()),
            "scale?" => Value::Bool(ctx.is_scaled()),
            "cli_options" => Value::List(
                ctx.cli_args()
                    .iter()
                    .map(|arg| Value::Str(arg.clone()))
                    .collect(),
            ),
            _ => {
                return Err(TemplateError::new(format!("Unknown variable `{}`", name), offset)
                    .with_help(
                        "Available variables: sprite, format, extension_prefix, \
                         extension_strategy, mixin?, rails?, scale?, cli_options",
                    ))
            }
        };
        Ok(value)
    }

    fn sprite_attr(
        &self,
        sprite: &'c SpriteSet,
        name: &str,
        offset: usize,
    ) -> Result<Value<'c>, TemplateError> {
        let view = self.ctx.sprite_view();
        let value = match name {
            "name" => Value::Str(sprite.name.clone()),
            "filename" => Value::Str(sprite.filename()),
            "width" => int(sprite.width),
            "height" => int(sprite.height),
            "images" => Value::List(sprite.images().map(Value::Image).collect()),
            "class_name" => Value::Str(view.class_name()),
            "background_image" => Value::Str(view.background_image()),
            "background_size" => Value::Str(view.background_size()),
            "extension" => Value::Str(view.extension()),
            "names_variable" => Value::Str(view.names_variable()),
            _ => return Err(no_attribute("sprite", name, offset)),
        };
        Ok(value)
    }

    fn image_attr(
        &self,
        image: &'c ImageDescriptor,
        name: &str,
        offset: usize,
    ) -> Result<Value<'c>, TemplateError> {
        let view = self.ctx.image_view(image);
        let value = match name {
            "name" => Value::Str(image.name.clone()),
            "width" => int(image.width),
            "height" => int(image.height),
            "top" => Value::Int(image.top),
            "left" => Value::Int(image.left),
            "svg?" => Value::Bool(image.is_vector()),
            "class_name" => Value::Str(view.class_name()),
            "selector" => Value::Str(view.selector()),
            "background_position" => Value::Str(view.background_position()),
            "css_width" => Value::Str(view.css_width()),
            "css_height" => Value::Str(view.css_height()),
            "data_uri" => data_uri_value(view.data_uri()),
            _ => return Err(no_attribute("image", name, offset)),
        };
        Ok(value)
    }

    fn call(&self, name: &str, args: Vec<Value<'c>>, offset: usize) -> Result<Value<'c>, TemplateError> {
        let arity = match name {
            "class_name_for" | "image_url" | "data_uri" => 1,
            "join" => 2,
            _ => {
                return Err(TemplateError::new(format!("Unknown function `{}`", name), offset)
                    .with_help("Available functions: class_name_for, image_url, data_uri, join"))
            }
        };
        if args.len() != arity {
            return Err(TemplateError::new(
                format!(
                    "`{}` expects {} argument{}, got {}",
                    name,
                    arity,
                    if arity == 1 { "" } else { "s" },
                    args.len()
                ),
                offset,
            ));
        }

        let wrong_argument = |value: &Value<'_>| {
            TemplateError::new(
                format!("`{}` cannot take a {} argument", name, value.kind()),
                offset,
            )
        };

        let mut args = args.into_iter();
        let first = args.next().unwrap_or(Value::Nil);
        match name {
            "class_name_for" => match &first {
                Value::Str(s) => Ok(Value::Str(class_name_for(s))),
                Value::Sprite(sprite) => Ok(Value::Str(class_name_for(&sprite.name))),
                Value::Image(image) => Ok(Value::Str(class_name_for(&image.name))),
                other => Err(wrong_argument(other)),
            },
            "image_url" => match &first {
                Value::Sprite(_) => Ok(Value::Str(self.ctx.image_url().to_string())),
                other => Err(wrong_argument(other)),
            },
            "data_uri" => match &first {
                Value::Image(image) => Ok(data_uri_value(self.ctx.data_uri(image))),
                other => Err(wrong_argument(other)),
            },
            _ => {
                let separator = match args.next() {
                    Some(Value::Str(s)) => s,
                    Some(other) => return Err(wrong_argument(&other)),
                    None => String::new(),
                };
                let items = match first {
                    Value::List(items) => items,
                    other => return Err(wrong_argument(&other)),
                };
                let parts = items
                    .iter()
                    .map(|item| match item {
                        Value::Str(s) => Ok(s.clone()),
                        Value::Int(n) => Ok(n.to_string()),
                        other => Err(wrong_argument(other)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Str(parts.join(&separator)))
            }
        }
    }
}

fn data_uri_value(uri: Option<&str>) -> Value<'static> {
    uri.map(|s| Value::Str(s.to_string())).unwrap_or(Value::Nil)
}

fn no_attribute(kind: &str, name: &str, offset: usize) -> TemplateError {
    TemplateError::new(format!("A {} has no attribute `{}`", kind, name), offset)
}

/// Offset to blame for a failed expression.
fn expr_offset(expr: &Expr) -> usize {
    match expr {
        Expr::Name { offset, .. } | Expr::Attr { offset, .. } | Expr::Call { offset, .. } => {
            *offset
        }
        Expr::Not(inner) => expr_offset(inner),
        Expr::Str(_) | Expr::Int(_) => 0,
    }
}
