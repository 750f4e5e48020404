//! Expressions inside `{{ … }}` and block tags.

use super::location::TemplateError;

/// A parsed expression. Offsets are absolute byte offsets in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Name {
        name: String,
        offset: usize,
    },
    Attr {
        target: Box<Expr>,
        name: String,
        offset: usize,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        offset: usize,
    },
    Not(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Ident(String),
    Str(String),
    Int(i64),
    Dot,
    Comma,
    LParen,
    RParen,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::Ident(name) => format!("`{}`", name),
            Tok::Str(_) => "a string".to_string(),
            Tok::Int(n) => format!("`{}`", n),
            Tok::Dot => "`.`".to_string(),
            Tok::Comma => "`,`".to_string(),
            Tok::LParen => "`(`".to_string(),
            Tok::RParen => "`)`".to_string(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `name` is a valid identifier (letters, digits, `_`, optional
/// trailing `?`).
pub fn is_identifier(name: &str) -> bool {
    let body = name.strip_suffix('?').unwrap_or(name);
    let mut chars = body.chars();
    matches!(chars.next(), Some(c) if is_ident_start(c)) && chars.all(is_ident_char)
}

fn lex(source: &str, base: usize) -> Result<Vec<(Tok, usize)>, TemplateError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        let offset = base + i;
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '.' | ',' | '(' | ')' => {
                chars.next();
                let tok = match c {
                    '.' => Tok::Dot,
                    ',' => Tok::Comma,
                    '(' => Tok::LParen,
                    _ => Tok::RParen,
                };
                tokens.push((tok, offset));
            }
            '"' | '\'' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    match ch {
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        ch if ch == c => {
                            closed = true;
                            break;
                        }
                        ch => value.push(ch),
                    }
                }
                if !closed {
                    return Err(TemplateError::new("Unterminated string literal", offset));
                }
                tokens.push((Tok::Str(value), offset));
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let value = digits
                    .parse()
                    .map_err(|_| TemplateError::new(format!("Integer `{}` is too large", digits), offset))?;
                tokens.push((Tok::Int(value), offset));
            }
            c if is_ident_start(c) => {
                let mut name = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if !is_ident_char(ch) {
                        break;
                    }
                    name.push(ch);
                    chars.next();
                }
                if let Some(&(_, '?')) = chars.peek() {
                    name.push('?');
                    chars.next();
                }
                tokens.push((Tok::Ident(name), offset));
            }
            other => {
                return Err(TemplateError::new(
                    format!("Unexpected character `{}`", other),
                    offset,
                ));
            }
        }
    }

    Ok(tokens)
}

struct ExprParser {
    tokens: Vec<(Tok, usize)>,
    pos: usize,
    end: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|(_, o)| *o).unwrap_or(self.end)
    }

    fn next(&mut self) -> Option<(Tok, usize)> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, expected: &str) -> TemplateError {
        match self.peek() {
            Some(tok) => TemplateError::new(
                format!("Expected {}, found {}", expected, tok.describe()),
                self.offset(),
            ),
            None => TemplateError::new(format!("Expected {}", expected), self.end),
        }
    }

    fn expect(&mut self, tok: Tok, expected: &str) -> Result<(), TemplateError> {
        if self.peek() == Some(&tok) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expression(&mut self) -> Result<Expr, TemplateError> {
        if matches!(self.peek(), Some(Tok::Ident(name)) if name == "not") {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.expression()?)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, TemplateError> {
        let mut expr = self.primary()?;
        while self.peek() == Some(&Tok::Dot) {
            self.pos += 1;
            match self.next() {
                Some((Tok::Ident(name), offset)) => {
                    expr = Expr::Attr {
                        target: Box::new(expr),
                        name,
                        offset,
                    };
                }
                Some(_) => {
                    self.pos -= 1;
                    return Err(self.unexpected("an attribute name after `.`"));
                }
                None => return Err(self.unexpected("an attribute name after `.`")),
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, TemplateError> {
        let Some((tok, offset)) = self.next() else {
            return Err(self.unexpected("an expression"));
        };
        match tok {
            Tok::Str(value) => Ok(Expr::Str(value)),
            Tok::Int(value) => Ok(Expr::Int(value)),
            Tok::LParen => {
                let inner = self.expression()?;
                self.expect(Tok::RParen, "`)`")?;
                Ok(inner)
            }
            Tok::Ident(name) if self.peek() == Some(&Tok::LParen) => {
                self.pos += 1;
                let mut args = Vec::new();
                if self.peek() != Some(&Tok::RParen) {
                    loop {
                        args.push(self.expression()?);
                        if self.peek() == Some(&Tok::Comma) {
                            self.pos += 1;
                        } else {
                            break;
                        }
                    }
                }
                self.expect(Tok::RParen, "`,` or `)`")?;
                Ok(Expr::Call { name, args, offset })
            }
            Tok::Ident(name) => Ok(Expr::Name { name, offset }),
            _ => {
                self.pos -= 1;
                Err(self.unexpected("an expression"))
            }
        }
    }
}

/// Parse `source`, which starts at byte `base` of the template.
pub fn parse_expression(source: &str, base: usize) -> Result<Expr, TemplateError> {
    let tokens = lex(source, base)?;
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        end: base + source.len(),
    };
    let expr = parser.expression()?;
    if parser.peek().is_some() {
        return Err(parser.unexpected("end of expression"));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(name: &str, offset: usize) -> Expr {
        Expr::Name {
            name: name.to_string(),
            offset,
        }
    }

    #[test]
    fn test_attribute_path() {
        let expr = parse_expression(" sprite.images ", 10).unwrap();
        assert_eq!(
            expr,
            Expr::Attr {
                target: Box::new(name("sprite", 11)),
                name: "images".to_string(),
                offset: 18,
            }
        );
    }

    #[test]
    fn test_call_with_arguments() {
        let expr = parse_expression("join(cli_options, ' ')", 0).unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                name: "join".to_string(),
                args: vec![name("cli_options", 5), Expr::Str(" ".to_string())],
                offset: 0,
            }
        );
    }

    #[test]
    fn test_not_and_question_mark() {
        let expr = parse_expression("not image.svg?", 0).unwrap();
        match expr {
            Expr::Not(inner) => match *inner {
                Expr::Attr { name, .. } => assert_eq!(name, "svg?"),
                other => panic!("unexpected: {:?}", other),
            },
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_expression("42", 0).unwrap(), Expr::Int(42));
        assert_eq!(
            parse_expression(r#""say \"hi\"""#, 0).unwrap(),
            Expr::Str("say \"hi\"".to_string())
        );
        assert_eq!(parse_expression("(mixin?)", 0).unwrap(), name("mixin?", 1));
    }

    #[test]
    fn test_errors_point_at_offending_token() {
        let err = parse_expression("sprite name", 4).unwrap_err();
        assert_eq!(err.message, "Expected end of expression, found `name`");
        assert_eq!(err.offset, 11);

        let err = parse_expression("  ", 3).unwrap_err();
        assert_eq!(err.message, "Expected an expression");
        assert_eq!(err.offset, 5);

        let err = parse_expression("sprite.", 0).unwrap_err();
        assert_eq!(err.message, "Expected an attribute name after `.`");

        assert!(parse_expression("'open", 0).is_err());
        assert!(parse_expression("a | b", 0).is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("image"));
        assert!(is_identifier("svg?"));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
