//! Run-control record (`.spritefulrc`).
//!
//! Stores the argument list of the last saved invocation as a single
//! shell-escaped line so `spriteful build` without sources can replay it.

use std::fs;
use std::path::Path;

use crate::error::{Result, SpriteError};

/// Run-control filename looked up in the working directory.
pub const RC_FILENAME: &str = ".spritefulrc";

/// Write `args` to `<dir>/.spritefulrc`, replacing any previous record.
pub fn save(dir: &Path, args: &[String]) -> Result<()> {
    let path = dir.join(RC_FILENAME);
    let line = args.iter().map(|a| escape(a)).collect::<Vec<_>>().join(" ");
    fs::write(&path, format!("{}\n", line)).map_err(|e| SpriteError::Io {
        path,
        message: format!("Failed to save run-control file: {}", e),
    })
}

/// Read the saved argument list, if a record exists.
pub fn load(dir: &Path) -> Result<Option<Vec<String>>> {
    let path = dir.join(RC_FILENAME);
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).map_err(|e| SpriteError::Io {
        path: path.clone(),
        message: format!("Failed to read run-control file: {}", e),
    })?;
    split(content.trim()).map(Some)
}

/// Quote an argument for a POSIX shell.
pub fn escape(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./=:,+@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Split a shell-escaped line back into arguments.
pub fn split(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(unterminated("'")),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\' | '$' | '`')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(unterminated("\"")),
                        },
                        Some(c) => current.push(c),
                        None => return Err(unterminated("\"")),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(c) = chars.next() {
                    current.push(c);
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        args.push(current);
    }

    Ok(args)
}

fn unterminated(quote: &str) -> SpriteError {
    SpriteError::Parse {
        message: format!("Unterminated {} quote in {}", quote, RC_FILENAME),
        help: Some(format!("Delete {} or run with --save again", RC_FILENAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_escape_plain_arguments() {
        assert_eq!(escape("build"), "build");
        assert_eq!(escape("--format=scss"), "--format=scss");
        assert_eq!(escape("images/icons"), "images/icons");
    }

    #[test]
    fn test_escape_quotes_special_characters() {
        assert_eq!(escape("my icons"), "'my icons'");
        assert_eq!(escape(""), "''");
        assert_eq!(escape("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_split_handles_quoting_styles() {
        let args = split(r#"build 'my icons' "a \"b\"" c\ d ''"#).unwrap();
        assert_eq!(args, vec!["build", "my icons", "a \"b\"", "c d", ""]);
    }

    #[test]
    fn test_split_unterminated_quote() {
        assert!(split("build 'icons").is_err());
        assert!(split("build \"icons").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let args: Vec<String> = ["build", "images/my icons", "-f", "scss", "it's"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        save(dir.path(), &args).unwrap();
        assert_eq!(load(dir.path()).unwrap(), Some(args));
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let dir = tempdir().unwrap();
        save(dir.path(), &["build".to_string(), "a".to_string()]).unwrap();
        save(dir.path(), &["build".to_string(), "b".to_string()]).unwrap();

        let content = fs::read_to_string(dir.path().join(RC_FILENAME)).unwrap();
        assert_eq!(content, "build b\n");
    }

    #[test]
    fn test_load_missing_record() {
        let dir = tempdir().unwrap();
        assert_eq!(load(dir.path()).unwrap(), None);
    }
}
