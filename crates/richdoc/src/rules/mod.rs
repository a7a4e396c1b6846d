//! Rule system for document rendering.

mod rule;
mod standard;

pub use rule::{Filter, ReplacementFn, Rule};
pub use standard::{render_text, standard_rules};

use indexmap::IndexMap;

use richdoc_core::{Node, RenderOptions};

/// Collection of rules for rendering
pub struct Rules {
    /// Custom rules added by the user (checked first)
    custom_rules: IndexMap<String, Rule>,
    /// Built-in rules, one per standard kind plus decorators
    standard_rules: Vec<Rule>,
}

impl Rules {
    /// Create a new Rules instance with the standard rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            standard_rules: standard_rules(),
        }
    }

    /// Add a custom rule, replacing any custom rule under the same key
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Remove a custom rule
    pub fn remove(&mut self, key: &str) -> Option<Rule> {
        self.custom_rules.shift_remove(key)
    }

    /// Find the appropriate rule for a node
    pub fn for_node<'a>(&'a self, node: &Node, options: &RenderOptions) -> Option<&'a Rule> {
        let kind = node.kind();

        self.custom_rules
            .values()
            .chain(self.standard_rules.iter())
            .find(|rule| rule.filter.matches(kind, node, options))
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}
