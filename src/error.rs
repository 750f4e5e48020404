use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for spriteful operations
#[derive(Error, Diagnostic, Debug)]
pub enum SpriteError {
    #[error("IO error: {0}")]
    #[diagnostic(code(spriteful::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(spriteful::io))]
    Io { path: PathBuf, message: String },

    #[error("No PNG images found in {}", path.display())]
    #[diagnostic(
        code(spriteful::empty_source),
        help("Each source must be a directory containing at least one .png file")
    )]
    EmptySource { path: PathBuf },

    #[error("Unreadable image {}: {message}", path.display())]
    #[diagnostic(code(spriteful::image))]
    Image { path: PathBuf, message: String },

    #[error("Failed to combine sprite '{name}': {message}")]
    #[diagnostic(code(spriteful::compose))]
    Composition { name: String, message: String },

    #[error("Template error at {line}:{column}: {message}")]
    #[diagnostic(code(spriteful::template))]
    Template {
        message: String,
        line: u32,
        column: u32,
        #[help]
        help: Option<String>,
    },

    #[error("Cannot address {} from {}", path.display(), base.display())]
    #[diagnostic(code(spriteful::path))]
    UnresolvedPath {
        path: PathBuf,
        base: PathBuf,
        #[help]
        help: Option<String>,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(spriteful::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Optimizer {tool} failed: {message}")]
    #[diagnostic(code(spriteful::optimize))]
    Optimizer { tool: String, message: String },

    #[error("Build error: {message}")]
    #[diagnostic(code(spriteful::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SpriteError>;
