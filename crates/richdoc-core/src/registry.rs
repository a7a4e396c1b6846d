//! Kind registry: the built-in catalog plus registered decorator kinds.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::decorator::{DecoratorKind, DecoratorNode};
use crate::error::RegistryError;
use crate::kind::{KindSchema, NodeKind};
use crate::node::Fields;

/// Registry of known node kinds.
///
/// Built once per session and passed to deserialization and rendering.
/// Kinds it does not know are kept as opaque nodes.
#[derive(Clone, Default)]
pub struct Registry {
    decorators: IndexMap<String, Arc<dyn DecoratorKind>>,
}

impl Registry {
    /// A registry with only the built-in structural kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decorator kind. Built-in tags and already registered tags
    /// are rejected.
    pub fn register_decorator_kind<K: DecoratorKind>(
        &mut self,
        kind: K,
    ) -> Result<&mut Self, RegistryError> {
        let tag = kind.kind().to_string();

        if NodeKind::from_tag(&tag).is_some() {
            return Err(RegistryError::ReservedKind(tag));
        }
        if self.decorators.contains_key(&tag) {
            return Err(RegistryError::DuplicateKind(tag));
        }

        self.decorators.insert(tag, Arc::new(kind));
        Ok(self)
    }

    pub fn decorator(&self, kind: &str) -> Option<&dyn DecoratorKind> {
        self.decorators.get(kind).map(|kind| kind.as_ref())
    }

    pub fn is_known(&self, kind: &str) -> bool {
        NodeKind::from_tag(kind).is_some() || self.decorators.contains_key(kind)
    }

    /// Field schema for any known kind.
    pub fn schema(&self, kind: &str) -> Option<KindSchema> {
        match NodeKind::from_tag(kind) {
            Some(builtin) => Some(builtin.schema()),
            None => self.decorator(kind).map(|decorator| decorator.schema()),
        }
    }

    /// Registered decorator tags, in registration order.
    pub fn decorator_kinds(&self) -> impl Iterator<Item = &str> {
        self.decorators.keys().map(String::as_str)
    }

    /// A default node of a registered decorator kind.
    pub fn create_decorator(&self, kind: &str) -> Option<DecoratorNode> {
        self.decorator(kind).map(|decorator| decorator.create())
    }

    /// Build a decorator node from raw wire fields.
    pub fn import_decorator(
        &self,
        kind: &str,
        version: u32,
        raw: &Fields,
    ) -> Option<DecoratorNode> {
        let decorator = self.decorator(kind)?;
        let fields = decorator.schema().normalize(raw);
        Some(decorator.import_fields(version, &fields))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("decorators", &self.decorators.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::any::Any;

    use serde_json::{json, Value};

    use super::*;
    use crate::decorator::Decorator;
    use crate::kind::{FieldSpec, FieldType, Shape};
    use crate::options::RenderOptions;

    /// Minimal decorator used across the crate's tests.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Badge {
        pub label: String,
        pub extra: Fields,
    }

    impl Decorator for Badge {
        fn kind(&self) -> &str {
            "badge"
        }

        fn export_fields(&self) -> Fields {
            let mut fields = Fields::new();
            fields.insert("label".to_string(), Value::from(self.label.clone()));
            fields.extend(self.extra.clone());
            fields
        }

        fn render(&self, _options: &RenderOptions) -> String {
            format!("<span class=\"badge\">{}</span>", self.label)
        }

        fn is_block(&self) -> bool {
            false
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    pub(crate) struct BadgeKind;

    impl DecoratorKind for BadgeKind {
        fn kind(&self) -> &str {
            "badge"
        }

        fn schema(&self) -> KindSchema {
            KindSchema::new(
                "badge",
                Shape::Leaf,
                vec![FieldSpec::optional("label", FieldType::String, Value::from("new"))],
            )
        }

        fn create(&self) -> DecoratorNode {
            self.import_fields(1, &self.schema().defaults())
        }

        fn import_fields(&self, _version: u32, fields: &Fields) -> DecoratorNode {
            let label = fields
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or("new")
                .to_string();
            DecoratorNode::new(Badge {
                label,
                extra: self.schema().extra_fields(fields),
            })
        }
    }

    pub(crate) fn badge_registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_decorator_kind(BadgeKind).unwrap();
        registry
    }

    #[test]
    fn test_reserved_kind() {
        struct Fake;
        impl DecoratorKind for Fake {
            fn kind(&self) -> &str {
                "paragraph"
            }
            fn schema(&self) -> KindSchema {
                KindSchema::new("paragraph", Shape::Leaf, Vec::new())
            }
            fn create(&self) -> DecoratorNode {
                BadgeKind.create()
            }
            fn import_fields(&self, version: u32, fields: &Fields) -> DecoratorNode {
                BadgeKind.import_fields(version, fields)
            }
        }

        let mut registry = Registry::new();
        assert!(matches!(
            registry.register_decorator_kind(Fake),
            Err(RegistryError::ReservedKind(_))
        ));
    }

    #[test]
    fn test_duplicate_kind() {
        let mut registry = badge_registry();
        assert!(matches!(
            registry.register_decorator_kind(BadgeKind),
            Err(RegistryError::DuplicateKind(_))
        ));
    }

    #[test]
    fn test_schema_lookup() {
        let registry = badge_registry();
        assert!(registry.is_known("badge"));
        assert!(registry.is_known("text"));
        assert!(!registry.is_known("future-widget"));
        assert_eq!(registry.schema("badge").unwrap().shape, Shape::Leaf);
        assert_eq!(registry.schema("heading").unwrap().kind, "heading");
        assert!(registry.schema("future-widget").is_none());
        assert_eq!(registry.decorator_kinds().collect::<Vec<_>>(), vec!["badge"]);
    }

    #[test]
    fn test_create_uses_defaults() {
        let registry = badge_registry();
        let node = registry.create_decorator("badge").unwrap();
        assert_eq!(node.downcast_ref::<Badge>().unwrap().label, "new");
    }

    #[test]
    fn test_with_field_normalizes() {
        let registry = badge_registry();
        let node = registry.create_decorator("badge").unwrap();

        let renamed = node.with_field(&registry, "label", json!("hot")).unwrap();
        assert_eq!(renamed.downcast_ref::<Badge>().unwrap().label, "hot");
        assert_eq!(node.downcast_ref::<Badge>().unwrap().label, "new");

        let invalid = node.with_field(&registry, "label", json!(42)).unwrap();
        assert_eq!(invalid.downcast_ref::<Badge>().unwrap().label, "new");
    }

    #[test]
    fn test_update_is_copy_on_write() {
        let registry = badge_registry();
        let node = registry.create_decorator("badge").unwrap();
        let edited = node
            .update(|badge: Badge| Badge {
                label: "sold out".to_string(),
                ..badge
            })
            .unwrap();

        assert_ne!(node, edited);
        assert_eq!(edited.downcast_ref::<Badge>().unwrap().label, "sold out");
    }
}
