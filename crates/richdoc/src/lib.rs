//! # richdoc
//!
//! Render rich-content documents to HTML.
//!
//! Documents are read and written through the JSON wire format of
//! [`richdoc_core`]; this crate adds the renderer, the built-in media
//! decorators (image, video, audio) and the command handlers an editor uses
//! to insert them.
//!
//! ## Design
//!
//! Rendering is rule based. Each node is rendered children first, then the
//! first rule whose filter matches the node turns the children's markup into
//! the node's markup. Custom rules added with [`RenderService::add_rule`] are
//! checked before the standard ones. Nodes of unknown kind have no rule and
//! render as their children's markup.
//!
//! Rendering never fails. Only parsing can, and [`RenderService::render_from_str`]
//! shows unparseable input as-is.
//!
//! ## Example
//!
//! ```rust
//! use richdoc::RenderService;
//!
//! let service = RenderService::new();
//! let input = r#"{"root":{"kind":"root","version":1,"children":[
//!     {"kind":"paragraph","version":1,"children":[
//!         {"kind":"text","version":1,"content":"Hello","format":3}
//!     ]}
//! ]}}"#;
//!
//! assert_eq!(service.render_from_str(input), "<p><strong><em>Hello</em></strong></p>");
//! assert_eq!(service.render_from_str("{not json"), "{not json");
//! ```
//!
//! ## Example (commands)
//!
//! ```rust
//! use richdoc::{Document, Node, RenderService};
//! use serde_json::json;
//!
//! let service = RenderService::new();
//! let doc = Document::new(vec![Node::paragraph(vec![Node::text("Poster:")])]);
//!
//! let doc = service
//!     .apply_command(&doc, &[1], "insert-image", &json!({ "src": "poster.png" }))
//!     .unwrap();
//! assert!(service.render(&doc).contains("<img src=\"poster.png\""));
//! ```

pub mod commands;
pub mod decorators;
mod rules;
mod service;
mod utilities;

pub use commands::{CommandHandler, CommandRegistry};
pub use decorators::{
    register_media_kinds, Alignment, AudioKind, AudioNode, ImageKind, ImageNode, VideoKind,
    VideoNode,
};
pub use rules::{render_text, Filter, ReplacementFn, Rule, Rules};
pub use service::RenderService;
pub use utilities::*;

pub use richdoc_core::{
    deserialize, serialize, Decorator, DecoratorKind, DecoratorNode, Document, FormatFlag,
    FormatSet, HeadingStyle, LinkTarget, ListStyle, Node, ParseError, Registry, RegistryError,
    RenderOptions, TextFormat, TreeError,
};

/// Error type for command handling
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Cannot place node: {0}")]
    Tree(#[from] TreeError),
}

pub type Result<T> = std::result::Result<T, CommandError>;
