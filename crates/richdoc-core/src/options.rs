//! Configuration options for rendering

use serde::{Deserialize, Serialize};

/// Heading presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// Plain `<h1>`..`<h5>` tags
    #[default]
    Semantic,
    /// Heading tags with a fixed inline font size per level
    Styled,
}

/// Where rendered links open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkTarget {
    #[default]
    SameWindow,
    /// Adds `target="_blank"` and a matching `rel`
    NewWindow,
}

/// Options for rendering a document to markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Heading presentation
    pub heading_style: HeadingStyle,

    /// Markup emitted for a line break
    pub line_break: String,

    /// Link target behaviour
    pub link_target: LinkTarget,

    /// Prefix for CSS classes on media fragments
    pub class_prefix: String,

    /// Render YouTube and Vimeo sources as iframe embeds
    pub embed_video_hosts: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Semantic,
            line_break: "<br>".to_string(),
            link_target: LinkTarget::SameWindow,
            class_prefix: "richdoc".to_string(),
            embed_video_hosts: true,
        }
    }
}

impl RenderOptions {
    /// Build a class name under the configured prefix.
    pub fn class(&self, name: &str) -> String {
        if self.class_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}-{}", self.class_prefix, name)
        }
    }
}
