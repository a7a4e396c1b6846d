//! Video and audio decorators.

use std::any::Any;

use richdoc_core::{
    Decorator, DecoratorKind, DecoratorNode, FieldSpec, FieldType, Fields, KindSchema,
    RenderOptions, Shape, DEFAULT_VERSION,
};
use serde_json::Value;

use crate::utilities::{escape_attr, video_embed_url};

pub const VIDEO_KIND: &str = "video";
pub const AUDIO_KIND: &str = "audio";

fn media_schema(kind: &'static str) -> KindSchema {
    KindSchema::new(
        kind,
        Shape::Leaf,
        vec![FieldSpec::optional("src", FieldType::String, Value::from(""))],
    )
}

fn media_fields(src: &str, extra: &Fields) -> Fields {
    let mut fields = Fields::new();
    fields.insert("src".to_string(), Value::from(src));
    for (name, value) in extra {
        fields.entry(name.clone()).or_insert_with(|| value.clone());
    }
    fields
}

fn src_field(fields: &Fields) -> String {
    fields
        .get("src")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// A video clip, either a direct file or a hosted video page.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoNode {
    pub version: u32,
    pub src: String,
    pub extra: Fields,
}

impl VideoNode {
    pub fn new(src: &str) -> Self {
        Self {
            version: DEFAULT_VERSION,
            src: src.to_string(),
            extra: Fields::new(),
        }
    }

    pub fn with_src(self, src: &str) -> Self {
        Self {
            src: src.to_string(),
            ..self
        }
    }

    pub fn into_node(self) -> DecoratorNode {
        DecoratorNode::new(self)
    }
}

impl Decorator for VideoNode {
    fn kind(&self) -> &str {
        VIDEO_KIND
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn export_fields(&self) -> Fields {
        media_fields(&self.src, &self.extra)
    }

    fn render(&self, options: &RenderOptions) -> String {
        if self.src.trim().is_empty() {
            return String::new();
        }

        let class = options.class(VIDEO_KIND);
        let embed = if options.embed_video_hosts {
            video_embed_url(&self.src)
        } else {
            None
        };

        match embed {
            Some(url) => format!(
                "<div class=\"{class}\"><iframe src=\"{}\" frameborder=\"0\" \
                 allow=\"autoplay; fullscreen; picture-in-picture\" allowfullscreen></iframe></div>",
                escape_attr(&url)
            ),
            None => format!(
                "<div class=\"{class}\"><video src=\"{}\" controls></video></div>",
                escape_attr(&self.src)
            ),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Capability set for `video` nodes.
pub struct VideoKind;

impl DecoratorKind for VideoKind {
    fn kind(&self) -> &str {
        VIDEO_KIND
    }

    fn schema(&self) -> KindSchema {
        media_schema(VIDEO_KIND)
    }

    fn create(&self) -> DecoratorNode {
        VideoNode::new("").into_node()
    }

    fn import_fields(&self, version: u32, fields: &Fields) -> DecoratorNode {
        VideoNode {
            version,
            src: src_field(fields),
            extra: self.schema().extra_fields(fields),
        }
        .into_node()
    }
}

/// An audio clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioNode {
    pub version: u32,
    pub src: String,
    pub extra: Fields,
}

impl AudioNode {
    pub fn new(src: &str) -> Self {
        Self {
            version: DEFAULT_VERSION,
            src: src.to_string(),
            extra: Fields::new(),
        }
    }

    pub fn with_src(self, src: &str) -> Self {
        Self {
            src: src.to_string(),
            ..self
        }
    }

    pub fn into_node(self) -> DecoratorNode {
        DecoratorNode::new(self)
    }
}

impl Decorator for AudioNode {
    fn kind(&self) -> &str {
        AUDIO_KIND
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn export_fields(&self) -> Fields {
        media_fields(&self.src, &self.extra)
    }

    fn render(&self, options: &RenderOptions) -> String {
        if self.src.trim().is_empty() {
            return String::new();
        }

        format!(
            "<div class=\"{}\"><audio src=\"{}\" controls></audio></div>",
            options.class(AUDIO_KIND),
            escape_attr(&self.src)
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Capability set for `audio` nodes.
pub struct AudioKind;

impl DecoratorKind for AudioKind {
    fn kind(&self) -> &str {
        AUDIO_KIND
    }

    fn schema(&self) -> KindSchema {
        media_schema(AUDIO_KIND)
    }

    fn create(&self) -> DecoratorNode {
        AudioNode::new("").into_node()
    }

    fn import_fields(&self, version: u32, fields: &Fields) -> DecoratorNode {
        AudioNode {
            version,
            src: src_field(fields),
            extra: self.schema().extra_fields(fields),
        }
        .into_node()
    }
}
