//! Image decorator.

use std::any::Any;

use richdoc_core::{
    Decorator, DecoratorKind, DecoratorNode, FieldSpec, FieldType, Fields, KindSchema,
    RenderOptions, Shape, DEFAULT_VERSION,
};
use serde_json::Value;
use tracing::debug;

use crate::utilities::{escape_attr, escape_html, parse_pixel_width};

pub const IMAGE_KIND: &str = "image";

/// Horizontal placement of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
    Full,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Full => "full",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "full" => Some(Alignment::Full),
            _ => None,
        }
    }

    /// Like [`Alignment::from_tag`], with unknown tags read as center.
    pub fn from_tag_or_default(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_else(|| {
            debug!(kind = IMAGE_KIND, value = %tag, "unknown alignment, using center");
            Alignment::default()
        })
    }

    fn figure_style(self) -> &'static str {
        match self {
            Alignment::Left => "float:left;margin:0 1em 1em 0",
            Alignment::Center => "margin:0 auto;text-align:center",
            Alignment::Right => "float:right;margin:0 0 1em 1em",
            Alignment::Full => "margin:0;width:100%",
        }
    }
}

/// An image with optional caption.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    pub version: u32,
    pub src: String,
    pub alt_text: String,
    pub caption: String,
    pub alignment: Alignment,
    /// Display width in pixels; ignored for full-width images
    pub width: Option<u32>,
    pub extra: Fields,
}

impl ImageNode {
    pub fn new(src: &str) -> Self {
        Self {
            version: DEFAULT_VERSION,
            src: src.to_string(),
            alt_text: String::new(),
            caption: String::new(),
            alignment: Alignment::default(),
            width: None,
            extra: Fields::new(),
        }
    }

    pub fn with_src(self, src: &str) -> Self {
        Self {
            src: src.to_string(),
            ..self
        }
    }

    pub fn with_alt_text(self, alt_text: &str) -> Self {
        Self {
            alt_text: alt_text.to_string(),
            ..self
        }
    }

    pub fn with_caption(self, caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            ..self
        }
    }

    pub fn with_alignment(self, alignment: Alignment) -> Self {
        Self { alignment, ..self }
    }

    /// Zero widths are treated as no width.
    pub fn with_width(self, width: Option<u32>) -> Self {
        Self {
            width: width.filter(|w| *w > 0),
            ..self
        }
    }

    pub fn into_node(self) -> DecoratorNode {
        DecoratorNode::new(self)
    }
}

impl Decorator for ImageNode {
    fn kind(&self) -> &str {
        IMAGE_KIND
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn export_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("src".to_string(), Value::from(self.src.clone()));
        fields.insert("altText".to_string(), Value::from(self.alt_text.clone()));
        fields.insert("caption".to_string(), Value::from(self.caption.clone()));
        fields.insert(
            "alignment".to_string(),
            Value::from(self.alignment.as_str()),
        );
        if let Some(width) = self.width {
            fields.insert("width".to_string(), Value::from(width));
        }
        for (name, value) in &self.extra {
            fields.entry(name.clone()).or_insert_with(|| value.clone());
        }
        fields
    }

    fn render(&self, options: &RenderOptions) -> String {
        if self.src.trim().is_empty() {
            return String::new();
        }

        let class = format!(
            "{} {}",
            options.class(IMAGE_KIND),
            options.class(&format!("align-{}", self.alignment.as_str()))
        );

        let mut img = format!(
            "<img src=\"{}\" alt=\"{}\"",
            escape_attr(&self.src),
            escape_attr(&self.alt_text)
        );
        match (self.alignment, self.width) {
            (Alignment::Full, _) => img.push_str(" style=\"width:100%;height:auto\""),
            (_, Some(width)) => {
                img.push_str(&format!(
                    " width=\"{width}\" style=\"max-width:100%;height:auto\""
                ));
            }
            (_, None) => img.push_str(" style=\"max-width:100%;height:auto\""),
        }
        img.push('>');

        let caption = if self.caption.trim().is_empty() {
            String::new()
        } else {
            format!("<figcaption>{}</figcaption>", escape_html(&self.caption))
        };

        format!(
            "<figure class=\"{}\" style=\"{}\">{}{}</figure>",
            class,
            self.alignment.figure_style(),
            img,
            caption
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Capability set for `image` nodes.
pub struct ImageKind;

impl DecoratorKind for ImageKind {
    fn kind(&self) -> &str {
        IMAGE_KIND
    }

    fn schema(&self) -> KindSchema {
        KindSchema::new(
            IMAGE_KIND,
            Shape::Leaf,
            vec![
                FieldSpec::optional("src", FieldType::String, Value::from("")),
                FieldSpec::optional("altText", FieldType::String, Value::from("")),
                FieldSpec::optional("caption", FieldType::String, Value::from("")),
                FieldSpec::optional(
                    "alignment",
                    FieldType::String,
                    Value::from(Alignment::default().as_str()),
                ),
                FieldSpec::nullable("width", FieldType::Any),
            ],
        )
    }

    fn create(&self) -> DecoratorNode {
        ImageNode::new("").into_node()
    }

    fn import_fields(&self, version: u32, fields: &Fields) -> DecoratorNode {
        let string = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        ImageNode {
            version,
            src: string("src"),
            alt_text: string("altText"),
            caption: string("caption"),
            alignment: Alignment::from_tag_or_default(&string("alignment")),
            width: fields.get("width").and_then(parse_pixel_width),
            extra: self.schema().extra_fields(fields),
        }
        .into_node()
    }
}
