//! SVG scene generation for text layers.
//!
//! Each layer becomes two `<text>` elements: an outline-only pass followed by a
//! fill-only pass, so the outline never covers the glyph interiors.

use crate::layer::TextLayer;

/// Generic families recognised at the end of a font-family list.
const GENERIC_FAMILIES: &[&str] = &["serif", "sans-serif", "monospace", "cursive", "fantasy"];

/// Fallback appended when the requested family names no generic family.
const FALLBACK_FAMILY: &str = "sans-serif";

/// Build an SVG document of the given pixel size containing all layers in order.
pub fn build_scene(width: u32, height: u32, layers: &[TextLayer]) -> String {
    let mut svg = String::with_capacity(256 + layers.len() * 512);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    ));

    for layer in layers {
        let common = text_attributes(layer);
        let text = escape_xml(&layer.text);

        if let Some(stroke) = layer.stroke {
            svg.push_str(&format!(
                r#"<text {common} fill="none" stroke="{}" stroke-width="{}">{text}</text>"#,
                hex(stroke.color),
                stroke.width
            ));
        }
        svg.push_str(&format!(r#"<text {common} fill="{}">{text}</text>"#, hex(layer.fill)));
    }

    svg.push_str("</svg>");
    svg
}

fn text_attributes(layer: &TextLayer) -> String {
    format!(
        r#"x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" text-anchor="{}" dominant-baseline="central" xml:space="preserve""#,
        layer.x,
        layer.y,
        escape_xml(&font_family_list(&layer.font_family)),
        layer.font_size,
        if layer.bold { "bold" } else { "normal" },
        if layer.italic { "italic" } else { "normal" },
        layer.anchor.as_svg(),
    )
}

/// Normalise a CSS font-family value and make sure it ends with a generic family.
pub fn font_family_list(family: &str) -> String {
    let families: Vec<String> = family
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|f| !f.is_empty())
        .map(|f| {
            if GENERIC_FAMILIES.contains(&f) || !f.contains(' ') {
                f.to_string()
            } else {
                format!("'{}'", f)
            }
        })
        .collect();

    let has_generic = families
        .last()
        .is_some_and(|f| GENERIC_FAMILIES.contains(&f.as_str()));

    let mut list = families.join(", ");
    if !has_generic {
        if !list.is_empty() {
            list.push_str(", ");
        }
        list.push_str(FALLBACK_FAMILY);
    }
    list
}

fn hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
