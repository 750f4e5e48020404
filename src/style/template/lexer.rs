//! Splitting template text into literal text and delimited tags.

use super::location::TemplateError;

/// One piece of template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'s> {
    /// Literal text copied to the output.
    Text(&'s str),
    /// Inside `{{ … }}`, with the byte offset of the inner text.
    Output { source: &'s str, offset: usize },
    /// Inside `{% … %}`, with the byte offset of the inner text.
    Tag { source: &'s str, offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Output,
    Tag,
    Comment,
}

impl Delimiter {
    fn close(self) -> &'static str {
        match self {
            Delimiter::Output => "}}",
            Delimiter::Tag => "%}",
            Delimiter::Comment => "#}",
        }
    }

    fn open(self) -> &'static str {
        match self {
            Delimiter::Output => "{{",
            Delimiter::Tag => "{%",
            Delimiter::Comment => "{#",
        }
    }
}

/// Find the next opening delimiter at or after `from`.
fn next_open(source: &str, from: usize) -> Option<(usize, Delimiter)> {
    let bytes = source.as_bytes();
    source[from..].match_indices('{').find_map(|(i, _)| {
        let start = from + i;
        let delimiter = match bytes.get(start + 1) {
            Some(b'{') => Delimiter::Output,
            Some(b'%') => Delimiter::Tag,
            Some(b'#') => Delimiter::Comment,
            _ => return None,
        };
        Some((start, delimiter))
    })
}

/// Split `source` into tokens.
///
/// Block tags and comments that sit alone on a line swallow that line,
/// newline included, so control flow leaves no blank lines behind.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TemplateError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some((start, delimiter)) = next_open(source, pos) {
        let inner_start = start + 2;
        let inner_len = source[inner_start..]
            .find(delimiter.close())
            .ok_or_else(|| {
                TemplateError::new(format!("Unclosed `{}`", delimiter.open()), start)
                    .with_help(format!("Close it with `{}`", delimiter.close()))
            })?;
        let inner = &source[inner_start..inner_start + inner_len];
        let end = inner_start + inner_len + 2;

        let (text_end, next) = match delimiter {
            Delimiter::Output => (start, end),
            Delimiter::Tag | Delimiter::Comment => match standalone_line(source, pos, start, end) {
                Some((line_start, line_end)) => (line_start, line_end),
                None => (start, end),
            },
        };

        if text_end > pos {
            tokens.push(Token::Text(&source[pos..text_end]));
        }
        match delimiter {
            Delimiter::Output => tokens.push(Token::Output {
                source: inner,
                offset: inner_start,
            }),
            Delimiter::Tag => tokens.push(Token::Tag {
                source: inner,
                offset: inner_start,
            }),
            Delimiter::Comment => {}
        }
        pos = next;
    }

    if pos < source.len() {
        tokens.push(Token::Text(&source[pos..]));
    }
    Ok(tokens)
}

/// If the tag spanning `start..end` is the only thing on its line, return
/// the line's bounds (end includes the trailing newline).
fn standalone_line(source: &str, pos: usize, start: usize, end: usize) -> Option<(usize, usize)> {
    let line_start = source[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = source[end..]
        .find('\n')
        .map(|i| end + i + 1)
        .unwrap_or(source.len());

    let blank = |s: &str| s.chars().all(|c| c == ' ' || c == '\t' || c == '\r' || c == '\n');
    if line_start >= pos && blank(&source[line_start..start]) && blank(&source[end..line_end]) {
        Some((line_start, line_end))
    } else {
        None
    }
}
