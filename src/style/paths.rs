//! URLs a stylesheet uses to reference its sprite image.

use std::path::{Component, Path, PathBuf};

use crate::config::Options;
use crate::error::{Result, SpriteError};
use crate::sprite::SpriteSet;

/// How sprite URLs are addressed. Exactly one mode applies per stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlMode {
    /// Rails asset pipeline: `sprites/<filename>`.
    AssetPipeline,
    /// Absolute URL relative to a served root: `/<path from root>`.
    Rooted(PathBuf),
    /// Relative to the directory the stylesheet is written to.
    Relative(PathBuf),
}

/// Resolves sprite image URLs for stylesheets.
#[derive(Debug, Clone)]
pub struct PathResolver {
    mode: UrlMode,
}

impl PathResolver {
    /// Pick the mode by priority: rails, then `root`, then the stylesheet
    /// `destination`.
    pub fn new(options: &Options, destination: &Path) -> Self {
        let mode = if options.rails {
            UrlMode::AssetPipeline
        } else if let Some(root) = &options.root {
            UrlMode::Rooted(root.clone())
        } else {
            UrlMode::Relative(destination.to_path_buf())
        };
        Self { mode }
    }

    pub fn mode(&self) -> &UrlMode {
        &self.mode
    }

    /// URL of the combined image of `sprite`.
    pub fn image_url(&self, sprite: &SpriteSet) -> Result<String> {
        self.url_for(&sprite.path(), &sprite.filename())
    }

    /// URL of an image at `path` whose file name is `filename`.
    ///
    /// Fails when `path` cannot be expressed relative to the root or
    /// stylesheet directory.
    pub fn url_for(&self, path: &Path, filename: &str) -> Result<String> {
        match &self.mode {
            UrlMode::AssetPipeline => Ok(format!("sprites/{}", filename)),
            UrlMode::Rooted(root) => Ok(format!("/{}", to_url(&resolve(path, root)?))),
            UrlMode::Relative(destination) => Ok(to_url(&resolve(path, destination)?)),
        }
    }
}

fn resolve(path: &Path, base: &Path) -> Result<PathBuf> {
    relative_path(path, base).ok_or_else(|| SpriteError::UnresolvedPath {
        path: path.to_path_buf(),
        base: base.to_path_buf(),
        help: if path.is_absolute() != base.is_absolute() {
            Some("Use absolute paths for both the image and the directory it is addressed from".to_string())
        } else {
            None
        },
    })
}

/// Lexically resolve `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}

/// Path of `path` relative to the directory `base`.
///
/// The computation is purely lexical. Returns `None` when the paths are
/// of different kinds (one absolute, one relative), sit under different
/// prefixes, or `base` climbs out through `..` past their common part.
pub fn relative_path(path: &Path, base: &Path) -> Option<PathBuf> {
    if path.is_absolute() != base.is_absolute() || path.has_root() != base.has_root() {
        return None;
    }

    let path = normalize(path);
    let base = normalize(base);

    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    let prefix = |parts: &[Component]| match parts.first() {
        Some(Component::Prefix(p)) => Some(p.as_os_str().to_os_string()),
        _ => None,
    };
    if prefix(&path_parts) != prefix(&base_parts) {
        return None;
    }

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();
    if base_parts[common..].contains(&Component::ParentDir) {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

/// Join path components with `/` regardless of platform.
fn to_url(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Options {
        Options::default()
    }

    #[test]
    fn test_relative_to_destination() {
        let resolver = PathResolver::new(&options(), Path::new("/app/tmp/output"));
        assert_eq!(
            resolver
                .url_for(Path::new("/app/tmp/sprites/icons.png"), "icons.png")
                .unwrap(),
            "../sprites/icons.png"
        );
        assert_eq!(resolver.mode(), &UrlMode::Relative(PathBuf::from("/app/tmp/output")));
    }

    #[test]
    fn test_same_directory() {
        let resolver = PathResolver::new(&options(), Path::new("/app/public"));
        assert_eq!(
            resolver
                .url_for(Path::new("/app/public/icons.png"), "icons.png")
                .unwrap(),
            "icons.png"
        );
    }

    #[test]
    fn test_rooted_url() {
        let options = Options {
            root: Some(PathBuf::from("/app/tmp")),
            ..options()
        };
        let resolver = PathResolver::new(&options, Path::new("/app/tmp/output"));
        assert_eq!(
            resolver
                .url_for(Path::new("/app/tmp/sprites/icons.png"), "icons.png")
                .unwrap(),
            "/sprites/icons.png"
        );
    }

    #[test]
    fn test_rails_ignores_root_and_destination() {
        let options = Options {
            rails: true,
            root: Some(PathBuf::from("/app/tmp")),
            ..options()
        };
        let resolver = PathResolver::new(&options, Path::new("/elsewhere"));
        assert_eq!(resolver.mode(), &UrlMode::AssetPipeline);
        assert_eq!(
            resolver.url_for(Path::new("/path"), "icons.png").unwrap(),
            "sprites/icons.png"
        );
    }

    #[test]
    fn test_relative_path_lexical() {
        assert_eq!(
            relative_path(Path::new("a/b/../c/./d.png"), Path::new("a/x")),
            Some(PathBuf::from("../c/d.png"))
        );
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/b")),
            Some(PathBuf::from("."))
        );
        assert_eq!(
            relative_path(Path::new("/a"), Path::new("/a/b/c")),
            Some(PathBuf::from("../.."))
        );
        assert_eq!(
            relative_path(Path::new("../out/x.png"), Path::new("../css")),
            Some(PathBuf::from("../out/x.png"))
        );
    }

    #[test]
    fn test_relative_path_unrelated_kinds() {
        assert_eq!(relative_path(Path::new("out/x.png"), Path::new("/srv/css")), None);
        assert_eq!(relative_path(Path::new("/srv/x.png"), Path::new("css")), None);
    }

    #[test]
    fn test_relative_path_base_climbs_out() {
        assert_eq!(relative_path(Path::new("simple.png"), Path::new("../css")), None);
        assert_eq!(relative_path(Path::new("a/x.png"), Path::new("a/../../b")), None);
    }

    #[test]
    fn test_url_for_relative_image_from_absolute_destination() {
        let resolver = PathResolver::new(&options(), Path::new("/srv/site/css"));
        let err = resolver
            .url_for(Path::new("out/simple.png"), "simple.png")
            .unwrap_err();
        assert!(matches!(err, SpriteError::UnresolvedPath { .. }));
    }

    #[test]
    fn test_url_for_relative_root() {
        let options = Options {
            root: Some(PathBuf::from("public")),
            ..options()
        };
        let resolver = PathResolver::new(&options, Path::new("/app/public/css"));
        let err = resolver
            .url_for(Path::new("/app/public/sprites/simple.png"), "simple.png")
            .unwrap_err();
        assert!(matches!(err, SpriteError::UnresolvedPath { .. }));
    }

    #[test]
    fn test_url_for_destination_outside_working_directory() {
        let resolver = PathResolver::new(&options(), Path::new("../css"));
        assert!(resolver.url_for(Path::new("simple.png"), "simple.png").is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("../a/..")), PathBuf::from(".."));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }
}
