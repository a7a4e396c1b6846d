//! RenderService - the main entry point for document rendering.

use serde_json::Value;
use tracing::warn;

use richdoc_core::{
    DecoratorKind, Document, Node, ParseError, Registry, RegistryError, RenderOptions,
};

use crate::commands::CommandRegistry;
use crate::decorators::register_media_kinds;
use crate::rules::{Rule, Rules};
use crate::Result;

/// The main service for reading, writing and rendering documents.
///
/// Owns the kind registry, the render rules and the command handlers for one
/// editing session.
pub struct RenderService {
    options: RenderOptions,
    rules: Rules,
    registry: Registry,
    commands: CommandRegistry,
}

impl RenderService {
    /// Create a RenderService with default options and the media kinds
    pub fn new() -> Self {
        Self::with_options(RenderOptions::default())
    }

    /// Create a RenderService with custom options
    pub fn with_options(options: RenderOptions) -> Self {
        let mut registry = Registry::new();
        if let Err(err) = register_media_kinds(&mut registry) {
            warn!(error = %err, "failed to register media kinds");
        }
        Self::with_registry(options, registry)
    }

    /// Create a RenderService around an existing registry
    pub fn with_registry(options: RenderOptions, registry: Registry) -> Self {
        Self {
            options,
            rules: Rules::new(),
            registry,
            commands: CommandRegistry::new(),
        }
    }

    /// Render a document to markup
    pub fn render(&self, doc: &Document) -> String {
        self.process_children(doc.children())
    }

    /// Render a single node and its descendants
    pub fn render_node(&self, node: &Node) -> String {
        self.process_node(node)
    }

    /// Parse and render a serialized document.
    ///
    /// Input that does not parse is returned as-is.
    pub fn render_from_str(&self, input: &str) -> String {
        match self.deserialize(input) {
            Ok(doc) => self.render(&doc),
            Err(err) => {
                warn!(error = %err, "unparseable document, showing literal content");
                input.to_string()
            }
        }
    }

    pub fn serialize(&self, doc: &Document) -> String {
        richdoc_core::serialize(doc)
    }

    pub fn deserialize(&self, input: &str) -> std::result::Result<Document, ParseError> {
        richdoc_core::deserialize(input, &self.registry)
    }

    /// Register an additional decorator kind
    pub fn register_decorator_kind<K: DecoratorKind>(
        &mut self,
        kind: K,
    ) -> std::result::Result<&mut Self, RegistryError> {
        self.registry.register_decorator_kind(kind)?;
        Ok(self)
    }

    /// Add a custom rule
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Register a command handler
    pub fn on_command<F>(&mut self, command: &str, handler: F) -> &mut Self
    where
        F: Fn(&Value, &Registry) -> Result<Node> + Send + Sync + 'static,
    {
        self.commands.on_command(command, handler);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Build the node for a command without placing it
    pub fn dispatch(&self, command: &str, payload: &Value) -> Result<Node> {
        self.commands.dispatch(command, payload, &self.registry)
    }

    /// Run a command and insert its node at `path`, returning the new document
    pub fn apply_command(
        &self,
        doc: &Document,
        path: &[usize],
        command: &str,
        payload: &Value,
    ) -> Result<Document> {
        let node = self.dispatch(command, payload)?;
        Ok(doc.insert(path, node)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Get the current options
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    /// Render a list of sibling nodes
    fn process_children(&self, children: &[Node]) -> String {
        children.iter().map(|child| self.process_node(child)).collect()
    }

    fn process_node(&self, node: &Node) -> String {
        // Children first; leaves and opaque leaves have none
        let content = node
            .children()
            .map(|children| self.process_children(children))
            .unwrap_or_default();

        if let Some(rule) = self.rules.for_node(node, &self.options) {
            return rule.replace(node, &content, &self.options);
        }

        // Opaque nodes: keep whatever their children rendered to
        content
    }
}

impl Default for RenderService {
    fn default() -> Self {
        Self::new()
    }
}
