//! SVG source handling: intrinsic size and in-process minification.

use std::sync::OnceLock;

use regex::Regex;

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern is valid"))
}

fn root_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, r"(?s)<svg\b([^>]*)>")
}

fn attribute(name: &str) -> Regex {
    // Leading whitespace keeps `stroke-width` from matching `width`.
    Regex::new(&format!(r#"(?:^|\s){}\s*=\s*["']([^"']*)["']"#, name))
        .expect("attribute pattern is valid")
}

fn width_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attribute("width"))
}

fn height_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attribute("height"))
}

fn view_box_attr() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attribute("viewBox"))
}

/// Intrinsic pixel size of an SVG document.
///
/// Uses the root element's `width`/`height` (a `px` suffix is accepted,
/// fractions round up) and falls back to the `viewBox` extent.
pub fn dimensions(xml: &str) -> Option<(u32, u32)> {
    let attrs = root_tag().captures(xml)?.get(1)?.as_str();

    let width = width_attr()
        .captures(attrs)
        .and_then(|c| parse_length(&c[1]));
    let height = height_attr()
        .captures(attrs)
        .and_then(|c| parse_length(&c[1]));
    if let (Some(w), Some(h)) = (width, height) {
        return Some((w, h));
    }

    let view_box = view_box_attr().captures(attrs)?;
    let values: Vec<f64> = view_box[1]
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    if values.len() != 4 {
        return None;
    }
    Some((
        width.or_else(|| to_pixels(values[2]))?,
        height.or_else(|| to_pixels(values[3]))?,
    ))
}

fn parse_length(value: &str) -> Option<u32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    to_pixels(number.parse().ok()?)
}

fn to_pixels(value: f64) -> Option<u32> {
    if value.is_finite() && value > 0.0 {
        Some(value.ceil() as u32)
    } else {
        None
    }
}

/// Minify SVG markup for embedding.
///
/// Drops the XML declaration, doctype, comments, `<metadata>` blocks and
/// whitespace between tags. Text content inside elements is left alone.
pub fn optimize(xml: &str) -> String {
    static DECLARATION: OnceLock<Regex> = OnceLock::new();
    static DOCTYPE: OnceLock<Regex> = OnceLock::new();
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    static METADATA: OnceLock<Regex> = OnceLock::new();
    static BETWEEN_TAGS: OnceLock<Regex> = OnceLock::new();

    let out = compiled(&DECLARATION, r"(?s)<\?xml.*?\?>").replace_all(xml, "");
    let out = compiled(&DOCTYPE, r"(?s)<!DOCTYPE[^>]*>").replace_all(&out, "");
    let out = compiled(&COMMENT, r"(?s)<!--.*?-->").replace_all(&out, "");
    let out = compiled(&METADATA, r"(?s)<metadata\b.*?</metadata>").replace_all(&out, "");
    let out = compiled(&BETWEEN_TAGS, r">\s+<").replace_all(&out, "><");

    out.trim().to_string()
}
