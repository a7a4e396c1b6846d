//! Node kinds and their field schemas.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::node::Fields;

/// Built-in node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading,
    List,
    ListItem,
    Quote,
    CodeBlock,
    Link,
    Text,
    LineBreak,
    Table,
    TableRow,
    TableCell,
}

impl NodeKind {
    pub const ALL: [NodeKind; 13] = [
        NodeKind::Root,
        NodeKind::Paragraph,
        NodeKind::Heading,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::Quote,
        NodeKind::CodeBlock,
        NodeKind::Link,
        NodeKind::Text,
        NodeKind::LineBreak,
        NodeKind::Table,
        NodeKind::TableRow,
        NodeKind::TableCell,
    ];

    /// Wire tag
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::List => "list",
            NodeKind::ListItem => "list-item",
            NodeKind::Quote => "quote",
            NodeKind::CodeBlock => "code-block",
            NodeKind::Link => "link",
            NodeKind::Text => "text",
            NodeKind::LineBreak => "line-break",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table-row",
            NodeKind::TableCell => "table-cell",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        NodeKind::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Whether nodes of this kind carry `children`.
    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::Text | NodeKind::LineBreak)
    }

    pub fn schema(self) -> KindSchema {
        let fields = match self {
            NodeKind::Heading => vec![FieldSpec::optional(
                "level",
                FieldType::Integer,
                Value::from(2),
            )],
            NodeKind::List => vec![
                FieldSpec::optional("listStyle", FieldType::String, Value::from("unordered")),
                FieldSpec::nullable("start", FieldType::Integer),
            ],
            NodeKind::CodeBlock => vec![FieldSpec::nullable("language", FieldType::String)],
            NodeKind::Link => vec![FieldSpec::optional("url", FieldType::String, Value::from(""))],
            NodeKind::Text => vec![
                FieldSpec::optional("content", FieldType::String, Value::from("")),
                FieldSpec::optional("format", FieldType::Integer, Value::from(0)),
            ],
            NodeKind::TableCell => vec![FieldSpec::optional(
                "header",
                FieldType::Bool,
                Value::Bool(false),
            )],
            _ => Vec::new(),
        };

        let shape = if self.is_container() {
            Shape::Container
        } else {
            Shape::Leaf
        };

        KindSchema::new(self.as_str(), shape, fields)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a kind nests children or carries only its own fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Container,
    Leaf,
}

/// JSON type a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Bool,
    Any,
}

impl FieldType {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Bool => value.is_boolean(),
            FieldType::Any => true,
        }
    }
}

/// One field of a kind.
///
/// `default` is substituted when the field is absent or has the wrong type.
/// A field with no default is optional and simply left out when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn optional(name: &'static str, ty: FieldType, default: Value) -> Self {
        Self {
            name,
            ty,
            default: Some(default),
        }
    }

    pub fn nullable(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            default: None,
        }
    }
}

/// Field schema of a node kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KindSchema {
    pub kind: Cow<'static, str>,
    pub shape: Shape,
    pub fields: Vec<FieldSpec>,
}

impl KindSchema {
    pub fn new(kind: impl Into<Cow<'static, str>>, shape: Shape, fields: Vec<FieldSpec>) -> Self {
        Self {
            kind: kind.into(),
            shape,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Default instance for every field that has one.
    pub fn defaults(&self) -> Fields {
        self.fields
            .iter()
            .filter_map(|spec| spec.default.clone().map(|value| (spec.name.to_string(), value)))
            .collect()
    }

    /// Bring a raw field bag in line with the schema.
    ///
    /// Absent fields get their default, wrongly-typed fields are replaced by
    /// the default (or dropped when there is none). Fields outside the schema
    /// are passed through untouched.
    pub fn normalize(&self, raw: &Fields) -> Fields {
        let mut fields = raw.clone();

        for spec in &self.fields {
            match fields.get(spec.name) {
                Some(value) if spec.ty.accepts(value) => {}
                Some(Value::Null) | None => match &spec.default {
                    Some(default) => {
                        fields.insert(spec.name.to_string(), default.clone());
                    }
                    None => {
                        fields.remove(spec.name);
                    }
                },
                Some(_) => {
                    debug!(kind = %self.kind, field = spec.name, "invalid field value, using default");
                    match &spec.default {
                        Some(default) => {
                            fields.insert(spec.name.to_string(), default.clone());
                        }
                        None => {
                            fields.remove(spec.name);
                        }
                    }
                }
            }
        }

        fields
    }

    /// Fields in `fields` that this schema does not declare.
    pub fn extra_fields(&self, fields: &Fields) -> Fields {
        fields
            .iter()
            .filter(|(name, _)| self.field(name).is_none())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_tag_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::from_tag("future-widget"), None);
        assert_eq!(NodeKind::from_tag("image"), None);
    }

    #[test]
    fn test_leaf_kinds() {
        assert!(!NodeKind::Text.is_container());
        assert!(!NodeKind::LineBreak.is_container());
        assert!(NodeKind::Root.is_container());
        assert_eq!(NodeKind::Text.schema().shape, Shape::Leaf);
    }

    #[test]
    fn test_defaults() {
        let defaults = NodeKind::Text.schema().defaults();
        assert_eq!(defaults.get("content"), Some(&json!("")));
        assert_eq!(defaults.get("format"), Some(&json!(0)));

        let defaults = NodeKind::List.schema().defaults();
        assert_eq!(defaults.get("listStyle"), Some(&json!("unordered")));
        assert!(!defaults.contains_key("start"));
    }

    #[test]
    fn test_normalize_fills_and_replaces() {
        let schema = NodeKind::Heading.schema();
        let normalized = schema.normalize(&fields(json!({ "level": "h1", "indent": 2 })));
        assert_eq!(normalized.get("level"), Some(&json!(2)));
        assert_eq!(normalized.get("indent"), Some(&json!(2)));

        let normalized = schema.normalize(&Fields::new());
        assert_eq!(normalized.get("level"), Some(&json!(2)));
    }

    #[test]
    fn test_normalize_drops_invalid_nullable() {
        let schema = NodeKind::CodeBlock.schema();
        let normalized = schema.normalize(&fields(json!({ "language": 7 })));
        assert!(!normalized.contains_key("language"));
    }

    #[test]
    fn test_extra_fields() {
        let schema = NodeKind::Link.schema();
        let extra = schema.extra_fields(&fields(json!({ "url": "x", "rel": "nofollow" })));
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("rel"), Some(&json!("nofollow")));
    }
}
