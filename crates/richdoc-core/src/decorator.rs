//! Decorator node contract.
//!
//! A decorator is a node kind with its own fields and its own markup, such
//! as an embedded image. Each kind supplies two pieces:
//!
//! - a [`Decorator`] value type holding one node's data, and
//! - a [`DecoratorKind`] capability set that constructs those values from
//!   nothing or from wire fields, registered on a
//!   [`Registry`](crate::Registry).
//!
//! Decorator values are immutable once built. Edits go through typed setters
//! that consume and return a value, or through [`DecoratorNode::with_field`];
//! the caller then puts the new node back into the tree.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::kind::KindSchema;
use crate::node::Fields;
use crate::options::RenderOptions;
use crate::registry::Registry;

/// Data and behaviour of one decorator node.
pub trait Decorator: fmt::Debug + Send + Sync + 'static {
    /// Wire tag of this node's kind.
    fn kind(&self) -> &str;

    fn version(&self) -> u32 {
        1
    }

    /// Kind-specific fields for the wire format, without `kind` and `version`.
    fn export_fields(&self) -> Fields;

    /// Markup for this node. Must not panic; missing state renders with the
    /// kind's defaults.
    fn render(&self, options: &RenderOptions) -> String;

    /// Whether the markup is a block-level media fragment that must not sit
    /// inside a paragraph.
    fn is_block(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;
}

/// Capability set registered for a decorator kind.
pub trait DecoratorKind: Send + Sync + 'static {
    fn kind(&self) -> &str;

    fn schema(&self) -> KindSchema;

    /// A node with every field at its default.
    fn create(&self) -> DecoratorNode;

    /// Build a node from wire fields already normalized against [`schema`].
    ///
    /// [`schema`]: DecoratorKind::schema
    fn import_fields(&self, version: u32, fields: &Fields) -> DecoratorNode;
}

/// A decorator placed in a tree. Cloning shares the underlying value.
#[derive(Clone)]
pub struct DecoratorNode(Arc<dyn Decorator>);

impl DecoratorNode {
    pub fn new<D: Decorator>(decorator: D) -> Self {
        Self(Arc::new(decorator))
    }

    pub fn kind(&self) -> &str {
        self.0.kind()
    }

    pub fn version(&self) -> u32 {
        self.0.version()
    }

    pub fn export_fields(&self) -> Fields {
        self.0.export_fields()
    }

    pub fn render(&self, options: &RenderOptions) -> String {
        self.0.render(options)
    }

    pub fn is_block(&self) -> bool {
        self.0.is_block()
    }

    pub fn downcast_ref<T: Decorator>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Apply a typed edit, producing a new node. Returns `None` when the node
    /// is not a `T`.
    pub fn update<T, F>(&self, edit: F) -> Option<Self>
    where
        T: Decorator + Clone,
        F: FnOnce(T) -> T,
    {
        let current = self.downcast_ref::<T>()?.clone();
        Some(Self::new(edit(current)))
    }

    /// Set one wire field and rebuild the node through its registered kind.
    ///
    /// The rebuilt value goes through schema normalization, so an invalid
    /// value falls back to the field's default. Returns `None` when the kind
    /// is not registered.
    pub fn with_field(&self, registry: &Registry, name: &str, value: Value) -> Option<Self> {
        let mut fields = self.export_fields();
        fields.insert(name.to_string(), value);
        registry.import_decorator(self.kind(), self.version(), &fields)
    }
}

impl fmt::Debug for DecoratorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for DecoratorNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind()
            && self.version() == other.version()
            && self.export_fields() == other.export_fields()
    }
}
