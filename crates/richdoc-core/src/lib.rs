//! richdoc-core - rich-content document model and wire format
//!
//! This crate provides the data structures shared by everything that touches
//! a rich-content field: the node tree, the text formatting codec, the kind
//! catalog with its decorator extension point, and the JSON wire format.
//! Rendering lives in the `richdoc` crate.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────┐
//! JSON string ──▶ │ Document │ ──▶ JSON string
//!   deserialize   │   tree   │   serialize
//!        ▲        └──────────┘
//!        │             │
//!    Registry      copy-on-write edits
//!  (decorator kinds)
//! ```
//!
//! # Example
//!
//! ```rust
//! use richdoc_core::{deserialize, serialize, Document, FormatFlag, FormatSet, Node, Registry};
//!
//! let bold = FormatSet::from_flags([FormatFlag::Bold]);
//! let doc = Document::new(vec![Node::paragraph(vec![
//!     Node::text("Hello "),
//!     Node::formatted_text("World", &bold),
//! ])]);
//!
//! let json = serialize(&doc);
//! let again = deserialize(&json, &Registry::new()).unwrap();
//! assert_eq!(doc, again);
//! ```

mod decorator;
mod error;
pub mod format;
mod kind;
mod node;
mod options;
mod registry;
pub mod wire;

pub use decorator::{Decorator, DecoratorKind, DecoratorNode};
pub use error::{ParseError, RegistryError, TreeError};
pub use format::{FormatFlag, FormatSet, TextFormat};
pub use kind::{FieldSpec, FieldType, KindSchema, NodeKind, Shape};
pub use node::{
    CodeBlock, Document, Element, Fields, Heading, Leaf, Link, List, ListStyle, Node, OpaqueNode,
    Root, TableCell, Text, DEFAULT_VERSION,
};
pub use options::{HeadingStyle, LinkTarget, RenderOptions};
pub use registry::Registry;
pub use wire::{deserialize, serialize};

pub type Result<T> = std::result::Result<T, ParseError>;
