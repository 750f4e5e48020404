//! Building the block tree from tokens.

use super::expr::{is_identifier, parse_expression, Expr};
use super::lexer::Token;
use super::location::TemplateError;

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Output(Expr),
    If {
        condition: Expr,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    For {
        binding: String,
        iterable: Expr,
        body: Vec<Node>,
    },
}

/// Byte offset of `inner` within `outer`; `inner` must be a subslice.
fn offset_in(outer: &str, inner: &str) -> usize {
    inner.as_ptr() as usize - outer.as_ptr() as usize
}

/// A block tag that ends or splits an enclosing block.
struct Stop {
    keyword: &'static str,
    offset: usize,
}

struct Parser<'s> {
    tokens: Vec<Token<'s>>,
    pos: usize,
}

impl<'s> Parser<'s> {
    /// Parse nodes until one of `terminators` (or the end of input when
    /// `opener` is `None`).
    fn block(
        &mut self,
        opener: Option<(&str, usize)>,
        terminators: &[&'static str],
    ) -> Result<(Vec<Node>, Option<Stop>), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.tokens.get(self.pos).cloned() {
            self.pos += 1;
            match token {
                Token::Text(text) => nodes.push(Node::Text(text.to_string())),
                Token::Output { source, offset } => {
                    nodes.push(Node::Output(parse_expression(source, offset)?));
                }
                Token::Tag { source, offset } => {
                    let trimmed = source.trim();
                    let start = offset + offset_in(source, trimmed);
                    let keyword = trimmed.split_whitespace().next().unwrap_or("");
                    let rest = trimmed[keyword.len()..].trim_start();
                    let rest_offset = start + offset_in(trimmed, rest);

                    match keyword {
                        "if" => nodes.push(self.if_block(rest, rest_offset, start)?),
                        "for" => nodes.push(self.for_block(rest, rest_offset, start)?),
                        "else" | "endif" | "endfor" => {
                            let keyword = match keyword {
                                "else" => "else",
                                "endif" => "endif",
                                _ => "endfor",
                            };
                            if !rest.is_empty() {
                                return Err(TemplateError::new(
                                    format!("`{}` takes no arguments", keyword),
                                    rest_offset,
                                ));
                            }
                            if terminators.contains(&keyword) {
                                return Ok((nodes, Some(Stop { keyword, offset: start })));
                            }
                            return Err(TemplateError::new(
                                format!("Unexpected `{{% {} %}}`", keyword),
                                start,
                            )
                            .with_help(match opener {
                                Some((name, _)) => format!("The open block is `{}`", name),
                                None => "There is no open block to close".to_string(),
                            }));
                        }
                        "" => return Err(TemplateError::new("Empty block tag", start)),
                        other => {
                            return Err(TemplateError::new(
                                format!("Unknown block tag `{}`", other),
                                start,
                            )
                            .with_help("Block tags are if, else, endif, for and endfor"));
                        }
                    }
                }
            }
        }

        match opener {
            Some((name, offset)) => Err(TemplateError::new(
                format!("Unclosed `{{% {} %}}`", name),
                offset,
            )
            .with_help(format!("Add `{{% end{} %}}`", name))),
            None => Ok((nodes, None)),
        }
    }

    fn if_block(&mut self, rest: &str, rest_offset: usize, start: usize) -> Result<Node, TemplateError> {
        let condition = parse_expression(rest, rest_offset)?;
        let opener = Some(("if", start));

        let (then, stop) = self.block(opener, &["else", "endif"])?;
        let otherwise = match stop {
            Some(Stop { keyword: "else", .. }) => self.block(opener, &["endif"])?.0,
            _ => Vec::new(),
        };

        Ok(Node::If {
            condition,
            then,
            otherwise,
        })
    }

    fn for_block(&mut self, rest: &str, rest_offset: usize, start: usize) -> Result<Node, TemplateError> {
        let syntax_error = || {
            TemplateError::new("Malformed `for` tag", start)
                .with_help("Use `{% for name in expression %}`")
        };

        let binding = rest.split_whitespace().next().ok_or_else(syntax_error)?;
        if !is_identifier(binding) {
            return Err(syntax_error());
        }
        let after_binding = rest[binding.len()..].trim_start();
        let iterable_source = after_binding
            .strip_prefix("in")
            .filter(|s| s.starts_with(char::is_whitespace))
            .ok_or_else(syntax_error)?;
        let iterable_offset = rest_offset + offset_in(rest, iterable_source);
        let iterable = parse_expression(iterable_source, iterable_offset)?;

        let (body, stop) = self.block(Some(("for", start)), &["else", "endfor"])?;
        if let Some(Stop { keyword: "else", offset }) = stop {
            return Err(TemplateError::new("`else` is not allowed in `for`", offset));
        }

        Ok(Node::For {
            binding: binding.to_string(),
            iterable,
            body,
        })
    }
}

/// Parse tokens into a node tree.
pub fn parse(tokens: Vec<Token<'_>>) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser { tokens, pos: 0 };
    let (nodes, _) = parser.block(None, &[])?;
    Ok(nodes)
}
