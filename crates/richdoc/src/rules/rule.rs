//! Render rules: a node filter paired with a markup builder.

use richdoc_core::{Node, RenderOptions};

/// Builds a node's markup from the node, its rendered children and the options
pub type ReplacementFn = Box<dyn Fn(&Node, &str, &RenderOptions) -> String + Send + Sync>;

/// Selects the nodes a rule renders
pub enum Filter {
    /// Wire tag equals this kind
    Kind(String),
    /// Wire tag is one of these kinds
    Kinds(Vec<String>),
    /// Arbitrary test on the tag, the node and the options
    Predicate(Box<dyn Fn(&str, &Node, &RenderOptions) -> bool + Send + Sync>),
}

impl Filter {
    pub fn kind(kind: &str) -> Self {
        Filter::Kind(kind.to_string())
    }

    pub fn kinds(kinds: &[&str]) -> Self {
        Filter::Kinds(kinds.iter().map(|kind| kind.to_string()).collect())
    }

    pub fn predicate<F>(test: F) -> Self
    where
        F: Fn(&str, &Node, &RenderOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(test))
    }

    pub fn matches(&self, tag: &str, node: &Node, options: &RenderOptions) -> bool {
        match self {
            Filter::Kind(kind) => tag == kind,
            Filter::Kinds(kinds) => kinds.iter().any(|kind| kind == tag),
            Filter::Predicate(test) => test(tag, node, options),
        }
    }
}

/// Markup for every node its filter accepts.
///
/// Children are rendered before the rule runs; leaves get an empty string.
pub struct Rule {
    pub filter: Filter,
    pub replacement: ReplacementFn,
}

impl Rule {
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&Node, &str, &RenderOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    pub fn for_kind<F>(kind: &str, replacement: F) -> Self
    where
        F: Fn(&Node, &str, &RenderOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::kind(kind), replacement)
    }

    /// One builder shared by several kinds, which can tell them apart by
    /// [`Node::kind`]
    pub fn for_kinds<F>(kinds: &[&str], replacement: F) -> Self
    where
        F: Fn(&Node, &str, &RenderOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::kinds(kinds), replacement)
    }

    pub fn replace(&self, node: &Node, content: &str, options: &RenderOptions) -> String {
        (self.replacement)(node, content, options)
    }
}
