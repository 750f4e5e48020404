//! CSS-safe identifiers from file and sprite names.

/// Class name for a file or sprite name: text before the first `.`,
/// lower-cased, with `_` replaced by `-`.
///
/// `class_name_for("Thing_name.jpg")` → `"thing-name"`.
pub fn class_name_for(name: &str) -> String {
    let stem = name.split('.').next().unwrap_or(name);
    stem.to_lowercase().replace('_', "-")
}
