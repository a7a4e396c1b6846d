//! Utility functions and constants for markup output.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Escape text content for HTML output
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }

    result
}

/// Escape an HTML attribute value
pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wrap content in a tag, with pre-escaped attributes
pub fn wrap(tag: &str, attrs: &str, content: &str) -> String {
    if attrs.is_empty() {
        format!("<{tag}>{content}</{tag}>")
    } else {
        format!("<{tag} {attrs}>{content}</{tag}>")
    }
}

static YOUTUBE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .unwrap()
});

static VIMEO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.|player\.)?vimeo\.com/(?:video/)?(\d+)").unwrap()
});

static PIXELS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)\s*(?:px)?\s*$").unwrap());

/// Embed URL for a video hosted on YouTube or Vimeo
pub fn video_embed_url(src: &str) -> Option<String> {
    let src = src.trim();

    if let Some(id) = YOUTUBE.captures(src).and_then(|c| c.get(1)) {
        return Some(format!("https://www.youtube.com/embed/{}", id.as_str()));
    }

    VIMEO
        .captures(src)
        .and_then(|c| c.get(1))
        .map(|id| format!("https://player.vimeo.com/video/{}", id.as_str()))
}

/// Read a pixel width from an integer or a string such as `"320px"`
pub fn parse_pixel_width(value: &Value) -> Option<u32> {
    let width: Option<u32> = match value {
        Value::Number(n) => n.as_u64().and_then(|w| u32::try_from(w).ok()),
        Value::String(s) => PIXELS
            .captures(s)
            .and_then(|c| c.get(1))
            .and_then(|w| w.as_str().parse().ok()),
        _ => None,
    };
    width.filter(|width| *width > 0)
}
