//! Command handlers that turn editor actions into new nodes.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use richdoc_core::{Node, Registry};

use crate::decorators::{Alignment, AudioNode, ImageNode, VideoNode};
use crate::{CommandError, Result};

pub const INSERT_IMAGE: &str = "insert-image";
pub const INSERT_VIDEO: &str = "insert-video";
pub const INSERT_AUDIO: &str = "insert-audio";

/// Type alias for command handlers
pub type CommandHandler = Box<dyn Fn(&Value, &Registry) -> Result<Node> + Send + Sync>;

/// Payload of `insert-image`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub src: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// Unknown values fall back to center
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// Payload of `insert-video` and `insert-audio`
#[derive(Debug, Clone, Deserialize)]
pub struct MediaPayload {
    pub src: String,
}

/// Handlers keyed by command type
pub struct CommandRegistry {
    handlers: IndexMap<String, CommandHandler>,
}

impl CommandRegistry {
    /// A registry with no handlers
    pub fn empty() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// A registry with the built-in media commands
    pub fn new() -> Self {
        let mut commands = Self::empty();
        commands
            .on_command(INSERT_IMAGE, insert_image)
            .on_command(INSERT_VIDEO, insert_video)
            .on_command(INSERT_AUDIO, insert_audio);
        commands
    }

    /// Register a handler, replacing any handler for the same command
    pub fn on_command<F>(&mut self, command: &str, handler: F) -> &mut Self
    where
        F: Fn(&Value, &Registry) -> Result<Node> + Send + Sync + 'static,
    {
        self.handlers.insert(command.to_string(), Box::new(handler));
        self
    }

    pub fn contains(&self, command: &str) -> bool {
        self.handlers.contains_key(command)
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Run the handler for `command` and return the node it builds
    pub fn dispatch(&self, command: &str, payload: &Value, registry: &Registry) -> Result<Node> {
        trace!(command, "dispatching command");

        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| CommandError::UnknownCommand(command.to_string()))?;
        handler(payload, registry)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_image(payload: &Value, _registry: &Registry) -> Result<Node> {
    let payload = ImagePayload::deserialize(payload)?;

    let mut image = ImageNode::new(&payload.src)
        .with_alt_text(&payload.alt_text)
        .with_alignment(
            payload
                .alignment
                .as_deref()
                .map(Alignment::from_tag_or_default)
                .unwrap_or_default(),
        )
        .with_width(payload.width);
    if let Some(caption) = payload.caption {
        image = image.with_caption(&caption);
    }

    Ok(Node::decorator(image.into_node()))
}

fn insert_video(payload: &Value, _registry: &Registry) -> Result<Node> {
    let payload = MediaPayload::deserialize(payload)?;
    Ok(Node::decorator(VideoNode::new(&payload.src).into_node()))
}

fn insert_audio(payload: &Value, _registry: &Registry) -> Result<Node> {
    let payload = MediaPayload::deserialize(payload)?;
    Ok(Node::decorator(AudioNode::new(&payload.src).into_node()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_insert_image() {
        let commands = CommandRegistry::new();
        let node = commands
            .dispatch(
                INSERT_IMAGE,
                &json!({ "src": "a.png", "altText": "A", "alignment": "left" }),
                &Registry::new(),
            )
            .unwrap();

        let Node::Decorator(decorator) = node else {
            panic!("expected a decorator node");
        };
        let image = decorator.downcast_ref::<ImageNode>().unwrap();
        assert_eq!(image.src, "a.png");
        assert_eq!(image.alt_text, "A");
        assert_eq!(image.alignment, Alignment::Left);
        assert_eq!(image.caption, "");
    }

    #[test]
    fn test_insert_image_defaults() {
        let commands = CommandRegistry::new();
        let node = commands
            .dispatch(INSERT_IMAGE, &json!({ "src": "a.png" }), &Registry::new())
            .unwrap();
        let Node::Decorator(decorator) = node else {
            panic!("expected a decorator node");
        };
        let image = decorator.downcast_ref::<ImageNode>().unwrap();
        assert_eq!(image.alignment, Alignment::Center);
        assert_eq!(image.width, None);
    }

    #[test]
    fn test_insert_media() {
        let commands = CommandRegistry::new();
        let video = commands
            .dispatch(INSERT_VIDEO, &json!({ "src": "v.mp4" }), &Registry::new())
            .unwrap();
        assert_eq!(video.kind(), "video");
        let audio = commands
            .dispatch(INSERT_AUDIO, &json!({ "src": "a.mp3" }), &Registry::new())
            .unwrap();
        assert_eq!(audio.kind(), "audio");
    }

    #[test]
    fn test_invalid_payload() {
        let commands = CommandRegistry::new();
        let err = commands
            .dispatch(INSERT_IMAGE, &json!({ "alt": "no src" }), &Registry::new())
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidPayload(_)));
    }

    #[test]
    fn test_insert_image_unknown_alignment_is_center() {
        let commands = CommandRegistry::new();
        let node = commands
            .dispatch(
                INSERT_IMAGE,
                &json!({ "src": "a.png", "alignment": "diagonal" }),
                &Registry::new(),
            )
            .unwrap();
        let Node::Decorator(decorator) = node else {
            panic!("expected a decorator node");
        };
        assert_eq!(
            decorator.downcast_ref::<ImageNode>().unwrap().alignment,
            Alignment::Center
        );
    }

    #[test]
    fn test_unknown_command() {
        let commands = CommandRegistry::new();
        let err = commands
            .dispatch("insert-map", &json!({}), &Registry::new())
            .unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(name) if name == "insert-map"));
    }

    #[test]
    fn test_custom_command() {
        let mut commands = CommandRegistry::empty();
        commands.on_command("insert-note", |payload, _| {
            let text = payload.get("text").and_then(Value::as_str).unwrap_or_default();
            Ok(Node::quote(vec![Node::text(text)]))
        });

        assert_eq!(commands.commands().collect::<Vec<_>>(), vec!["insert-note"]);
        let node = commands
            .dispatch("insert-note", &json!({ "text": "hi" }), &Registry::new())
            .unwrap();
        assert_eq!(node.text_content(), "hi");
    }
}
