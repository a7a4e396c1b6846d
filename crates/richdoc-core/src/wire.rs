//! JSON wire format
//!
//! A document is `{"root": {"kind": "root", "version": 1, "children": [...]}}`
//! and every node is `{"kind": ..., "version": ..., ...fields}` with
//! `children` only on containers. Reading goes through a generic
//! [`serde_json::Value`] first; only a failure at that stage is an error.
//! Everything after is absorbed: missing or invalid fields take their
//! defaults and unknown kinds become [`OpaqueNode`]s.

use serde_json::Value;
use tracing::{debug, warn};

use crate::decorator::DecoratorNode;
use crate::error::ParseError;
use crate::format::TextFormat;
use crate::kind::NodeKind;
use crate::node::{
    CodeBlock, Document, Element, Fields, Heading, Leaf, Link, List, ListStyle, Node, OpaqueNode,
    Root, TableCell, Text, DEFAULT_VERSION,
};
use crate::registry::Registry;

const KIND: &str = "kind";
const VERSION: &str = "version";
const CHILDREN: &str = "children";

/// Serialize a document to its JSON string.
pub fn serialize(doc: &Document) -> String {
    to_value(doc).to_string()
}

/// Parse a JSON string into a document.
pub fn deserialize(input: &str, registry: &Registry) -> Result<Document, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    from_value(&value, registry)
}

pub fn to_value(doc: &Document) -> Value {
    let mut root = Fields::new();
    root.insert(KIND.to_string(), Value::from(NodeKind::Root.as_str()));
    root.insert(VERSION.to_string(), Value::from(doc.root.version));
    merge_extra(&mut root, &doc.root.extra);
    root.insert(CHILDREN.to_string(), children_to_value(&doc.root.children));

    let mut wrapper = Fields::new();
    wrapper.insert(NodeKind::Root.as_str().to_string(), Value::Object(root));
    Value::Object(wrapper)
}

pub fn from_value(value: &Value, registry: &Registry) -> Result<Document, ParseError> {
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;
    let root = object
        .get(NodeKind::Root.as_str())
        .ok_or(ParseError::MissingRoot)?
        .as_object()
        .ok_or(ParseError::InvalidRoot("`root` must be an object"))?;

    match root.get(KIND).and_then(Value::as_str) {
        Some(kind) if kind == NodeKind::Root.as_str() => {}
        other => debug!(kind = ?other, "root node has unexpected kind"),
    }

    Ok(Document {
        root: Root {
            version: read_version(root.get(VERSION)),
            children: read_children(root.get(CHILDREN), registry),
            extra: own_fields(root),
        },
    })
}

/// Serialize a single node.
pub fn node_to_value(node: &Node) -> Value {
    let mut map = Fields::new();

    map.insert(KIND.to_string(), Value::from(node.kind()));
    map.insert(VERSION.to_string(), Value::from(node.version()));

    let extra = match node {
        Node::Opaque(opaque) => return opaque_to_value(opaque),
        Node::Decorator(decorator) => return decorator_to_value(decorator),
        Node::Paragraph(el)
        | Node::ListItem(el)
        | Node::Quote(el)
        | Node::Table(el)
        | Node::TableRow(el) => &el.extra,
        Node::Heading(heading) => {
            map.insert("level".to_string(), Value::from(heading.level));
            &heading.extra
        }
        Node::List(list) => {
            map.insert(
                "listStyle".to_string(),
                Value::from(list.list_style.as_str()),
            );
            if let Some(start) = list.start {
                map.insert("start".to_string(), Value::from(start));
            }
            &list.extra
        }
        Node::CodeBlock(code) => {
            if let Some(language) = &code.language {
                map.insert("language".to_string(), Value::from(language.clone()));
            }
            &code.extra
        }
        Node::Link(link) => {
            map.insert("url".to_string(), Value::from(link.url.clone()));
            &link.extra
        }
        Node::Text(text) => {
            map.insert("content".to_string(), Value::from(text.content.clone()));
            map.insert("format".to_string(), format_to_value(text));
            &text.extra
        }
        Node::LineBreak(leaf) => &leaf.extra,
        Node::TableCell(cell) => {
            map.insert("header".to_string(), Value::Bool(cell.header));
            &cell.extra
        }
    };
    merge_extra(&mut map, extra);

    if let Some(children) = node.children() {
        map.insert(CHILDREN.to_string(), children_to_value(children));
    }

    Value::Object(map)
}

fn opaque_to_value(opaque: &OpaqueNode) -> Value {
    let mut map = Fields::new();
    if !opaque.kind.is_empty() {
        map.insert(KIND.to_string(), Value::from(opaque.kind.clone()));
    }
    map.extend(opaque.fields.clone());
    if let Some(children) = &opaque.children {
        map.insert(CHILDREN.to_string(), children_to_value(children));
    }
    Value::Object(map)
}

fn decorator_to_value(decorator: &DecoratorNode) -> Value {
    let mut map = Fields::new();
    map.insert(KIND.to_string(), Value::from(decorator.kind()));
    map.insert(VERSION.to_string(), Value::from(decorator.version()));
    merge_extra(&mut map, &decorator.export_fields());
    Value::Object(map)
}

/// Read a single node. Returns `None` for values that are not objects.
pub fn node_from_value(value: &Value, registry: &Registry) -> Option<Node> {
    let Some(object) = value.as_object() else {
        warn!(value = %value, "dropping non-object entry in children");
        return None;
    };

    let Some(tag) = object.get(KIND).and_then(Value::as_str) else {
        debug!("node without a kind tag kept as opaque");
        return Some(opaque(String::new(), object, registry));
    };

    match NodeKind::from_tag(tag) {
        Some(NodeKind::Root) => {
            debug!("nested root kept as opaque");
            return Some(opaque(tag.to_string(), object, registry));
        }
        Some(kind) => return Some(builtin_from_object(kind, object, registry)),
        None => {}
    }

    let version = read_version(object.get(VERSION));
    if let Some(decorator) = registry.import_decorator(tag, version, &own_fields(object)) {
        if object.contains_key(CHILDREN) {
            debug!(kind = tag, "ignoring children on decorator node");
        }
        return Some(Node::Decorator(decorator));
    }

    debug!(kind = tag, "unknown node kind kept as opaque");
    Some(opaque(tag.to_string(), object, registry))
}

fn builtin_from_object(kind: NodeKind, object: &Fields, registry: &Registry) -> Node {
    let schema = kind.schema();
    let version = read_version(object.get(VERSION));
    let mut fields = schema.normalize(&own_fields(object));

    let children = if kind.is_container() {
        read_children(object.get(CHILDREN), registry)
    } else {
        // Leaves keep stray children as plain data so they survive a rewrite.
        if let Some(raw) = object.get(CHILDREN) {
            fields.insert(CHILDREN.to_string(), raw.clone());
        }
        Vec::new()
    };
    let extra = schema.extra_fields(&fields);

    let string = |name: &str| {
        fields
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    match kind {
        NodeKind::Paragraph => Node::Paragraph(Element {
            version,
            children,
            extra,
        }),
        NodeKind::ListItem => Node::ListItem(Element {
            version,
            children,
            extra,
        }),
        NodeKind::Quote => Node::Quote(Element {
            version,
            children,
            extra,
        }),
        NodeKind::Table => Node::Table(Element {
            version,
            children,
            extra,
        }),
        NodeKind::TableRow => Node::TableRow(Element {
            version,
            children,
            extra,
        }),
        NodeKind::Heading => Node::Heading(Heading {
            version,
            level: fields
                .get("level")
                .and_then(Value::as_i64)
                .unwrap_or(i64::from(Heading::FALLBACK_LEVEL)),
            children,
            extra,
        }),
        NodeKind::List => {
            let style = string("listStyle");
            let list_style = ListStyle::from_tag(&style);
            if list_style.as_str() != style {
                debug!(kind = "list", field = "listStyle", value = %style, "unknown list style, using unordered");
            }
            Node::List(List {
                version,
                list_style,
                start: fields.get("start").and_then(Value::as_i64),
                children,
                extra,
            })
        }
        NodeKind::CodeBlock => Node::CodeBlock(CodeBlock {
            version,
            language: fields
                .get("language")
                .and_then(Value::as_str)
                .map(str::to_string),
            children,
            extra,
        }),
        NodeKind::Link => Node::Link(Link {
            version,
            url: string("url"),
            children,
            extra,
        }),
        NodeKind::Text => {
            let (format, wide) = read_format(fields.get("format"));
            let mut extra = extra;
            if let Some(raw) = wide {
                debug!(kind = "text", field = "format", value = %raw, "format wider than 32 bits kept verbatim");
                extra.insert("format".to_string(), raw);
            }
            Node::Text(Text {
                version,
                content: string("content"),
                format,
                extra,
            })
        }
        NodeKind::LineBreak => Node::LineBreak(Leaf { version, extra }),
        NodeKind::TableCell => Node::TableCell(TableCell {
            version,
            header: fields
                .get("header")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            children,
            extra,
        }),
        NodeKind::Root => opaque(kind.as_str().to_string(), object, registry),
    }
}

fn opaque(kind: String, object: &Fields, registry: &Registry) -> Node {
    let mut fields: Fields = object
        .iter()
        .filter(|(name, _)| name.as_str() != CHILDREN && !(name.as_str() == KIND && !kind.is_empty()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let children = match object.get(CHILDREN) {
        Some(Value::Array(items)) if items.iter().all(Value::is_object) => Some(
            items
                .iter()
                .filter_map(|item| node_from_value(item, registry))
                .collect(),
        ),
        Some(raw) => {
            fields.insert(CHILDREN.to_string(), raw.clone());
            None
        }
        None => None,
    };

    Node::Opaque(OpaqueNode {
        kind,
        fields,
        children,
    })
}

fn read_children(value: Option<&Value>, registry: &Registry) -> Vec<Node> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| node_from_value(item, registry))
            .collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            debug!(value = %other, "children is not an array, treating as empty");
            Vec::new()
        }
    }
}

fn read_version(value: Option<&Value>) -> u32 {
    value
        .and_then(Value::as_u64)
        .and_then(|version| u32::try_from(version).ok())
        .unwrap_or(DEFAULT_VERSION)
}

/// Formatting mask of a text node.
///
/// An integer that does not fit in 32 bits keeps its low 32 bits for
/// rendering and is also returned raw so it can be written back unchanged.
fn read_format(value: Option<&Value>) -> (TextFormat, Option<Value>) {
    let Some(value) = value else {
        return (TextFormat::PLAIN, None);
    };

    if let Some(bits) = value.as_u64().and_then(|bits| u32::try_from(bits).ok()) {
        return (TextFormat(bits), None);
    }
    match low_format_bits(value) {
        Some(bits) => (TextFormat(bits), Some(value.clone())),
        None => (TextFormat::PLAIN, None),
    }
}

/// Low 32 bits of an integer mask, two's complement for negative values.
fn low_format_bits(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .map(|bits| bits as u32)
        .or_else(|| value.as_i64().map(|bits| bits as u32))
}

/// The raw wide value wins as long as the low bits were not edited.
fn format_to_value(text: &Text) -> Value {
    match text.extra.get("format") {
        Some(raw) if low_format_bits(raw) == Some(text.format.bits()) => raw.clone(),
        _ => Value::from(text.format.bits()),
    }
}

/// Wire fields minus the envelope keys.
fn own_fields(object: &Fields) -> Fields {
    object
        .iter()
        .filter(|(name, _)| !matches!(name.as_str(), KIND | VERSION | CHILDREN))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn merge_extra(map: &mut Fields, extra: &Fields) {
    for (name, value) in extra {
        map.entry(name.clone()).or_insert_with(|| value.clone());
    }
}

fn children_to_value(children: &[Node]) -> Value {
    Value::Array(children.iter().map(node_to_value).collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::registry::tests::{badge_registry, Badge};

    fn parse(value: Value) -> Document {
        from_value(&value, &Registry::new()).unwrap()
    }

    fn round_trip(value: Value, registry: &Registry) -> Value {
        let doc = from_value(&value, registry).unwrap();
        let text = serialize(&doc);
        serde_json::from_str(&text).unwrap()
    }

    fn sample() -> Value {
        json!({
            "root": {
                "kind": "root",
                "version": 1,
                "children": [
                    {
                        "kind": "heading", "version": 1, "level": 1,
                        "children": [{ "kind": "text", "version": 1, "content": "Title", "format": 0 }]
                    },
                    {
                        "kind": "paragraph", "version": 1,
                        "children": [
                            { "kind": "text", "version": 1, "content": "Hello", "format": 3 },
                            { "kind": "line-break", "version": 1 },
                            {
                                "kind": "link", "version": 1, "url": "https://example.org",
                                "children": [{ "kind": "text", "version": 1, "content": "site", "format": 0 }]
                            }
                        ]
                    },
                    {
                        "kind": "list", "version": 1, "listStyle": "ordered", "start": 3,
                        "children": [
                            { "kind": "list-item", "version": 1, "children": [] }
                        ]
                    },
                    {
                        "kind": "code-block", "version": 1, "language": "rust",
                        "children": [{ "kind": "text", "version": 1, "content": "fn main() {}", "format": 0 }]
                    },
                    {
                        "kind": "table", "version": 1,
                        "children": [{
                            "kind": "table-row", "version": 1,
                            "children": [{ "kind": "table-cell", "version": 1, "header": true, "children": [] }]
                        }]
                    },
                    { "kind": "quote", "version": 2, "children": [] }
                ]
            }
        })
    }

    #[test]
    fn test_round_trip_known_kinds() {
        assert_eq!(round_trip(sample(), &Registry::new()), sample());
    }

    #[test]
    fn test_typed_read() {
        let doc = parse(sample());
        let Node::Heading(heading) = &doc.children()[0] else {
            panic!("expected heading");
        };
        assert_eq!(heading.level, 1);

        let Node::List(list) = &doc.children()[2] else {
            panic!("expected list");
        };
        assert_eq!(list.list_style, ListStyle::Ordered);
        assert_eq!(list.start, Some(3));

        assert_eq!(doc.node_at(&[1, 0]).unwrap(), &Node::formatted_text("Hello", 3));
        assert_eq!(doc.children()[5].version(), 2);
    }

    #[test]
    fn test_tree_round_trip() {
        let doc = parse(sample());
        let again = deserialize(&serialize(&doc), &Registry::new()).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn test_unknown_kind_survives() {
        let value = json!({
            "root": {
                "kind": "root", "version": 1,
                "children": [{
                    "kind": "future-widget", "version": 7,
                    "palette": ["red", "blue"], "size": { "w": 3 },
                    "children": [{ "kind": "text", "version": 1, "content": "inner", "format": 0 }]
                }]
            }
        });

        let doc = parse(value.clone());
        let Node::Opaque(widget) = &doc.children()[0] else {
            panic!("expected opaque node");
        };
        assert_eq!(widget.kind, "future-widget");
        assert_eq!(widget.version(), Some(7));
        assert_eq!(doc.text_content(), "inner");

        assert_eq!(round_trip(value.clone(), &Registry::new()), value);
    }

    #[test]
    fn test_opaque_with_raw_children() {
        let value = json!({
            "root": { "kind": "root", "version": 1, "children": [
                { "kind": "future-grid", "children": [1, 2, 3] }
            ]}
        });
        let doc = parse(value.clone());
        let Node::Opaque(grid) = &doc.children()[0] else {
            panic!("expected opaque node");
        };
        assert!(grid.children.is_none());
        assert_eq!(round_trip(value.clone(), &Registry::new()), value);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let doc = parse(json!({
            "root": { "children": [
                { "kind": "text" },
                { "kind": "heading", "level": "big", "children": [] },
                { "kind": "list", "listStyle": "zigzag" },
                { "kind": "link" }
            ]}
        }));

        assert_eq!(doc.root.version, DEFAULT_VERSION);
        assert_eq!(doc.children()[0], Node::text(""));
        assert_eq!(doc.children()[1], Node::heading(2, vec![]));
        assert_eq!(doc.children()[2], Node::list(ListStyle::Unordered, vec![]));
        assert_eq!(doc.children()[3], Node::link("", vec![]));
    }

    #[test]
    fn test_invalid_level_is_preserved() {
        let value = json!({
            "root": { "kind": "root", "version": 1, "children": [
                { "kind": "heading", "version": 1, "level": 99, "children": [] }
            ]}
        });
        assert_eq!(round_trip(value.clone(), &Registry::new()), value);
    }

    #[test]
    fn test_extra_fields_preserved() {
        let value = json!({
            "root": { "kind": "root", "version": 1, "direction": "ltr", "children": [
                {
                    "kind": "paragraph", "version": 1, "indent": 2, "direction": "rtl",
                    "children": [
                        { "kind": "text", "version": 1, "content": "x", "format": 0, "style": "color: red" },
                        { "kind": "line-break", "version": 1, "children": ["stray"] }
                    ]
                }
            ]}
        });
        assert_eq!(round_trip(value.clone(), &Registry::new()), value);
    }

    #[test]
    fn test_unknown_format_bits_preserved() {
        let value = json!({
            "root": { "kind": "root", "version": 1, "children": [
                { "kind": "text", "version": 1, "content": "x", "format": 97 }
            ]}
        });
        assert_eq!(round_trip(value.clone(), &Registry::new()), value);
    }

    #[test]
    fn test_wide_format_preserved() {
        for format in [json!(4_294_967_297u64), json!(-1), json!(u64::MAX)] {
            let value = json!({
                "root": { "kind": "root", "version": 1, "children": [
                    { "kind": "text", "version": 1, "content": "x", "format": format }
                ]}
            });
            assert_eq!(round_trip(value.clone(), &Registry::new()), value);
        }
    }

    #[test]
    fn test_wide_format_keeps_known_flags() {
        let doc = parse(json!({
            "root": { "children": [{ "kind": "text", "content": "x", "format": 4_294_967_297u64 }] }
        }));
        let Node::Text(text) = &doc.children()[0] else {
            unreachable!()
        };
        assert_eq!(text.format, TextFormat(1));
        assert!(text.format.contains(crate::format::FormatFlag::Bold));

        let doc = parse(json!({
            "root": { "children": [{ "kind": "text", "content": "x", "format": -1 }] }
        }));
        let Node::Text(text) = &doc.children()[0] else {
            unreachable!()
        };
        assert_eq!(text.format, TextFormat(u32::MAX));
    }

    #[test]
    fn test_edited_wide_format_writes_new_bits() {
        let doc = parse(json!({
            "root": { "children": [{ "kind": "text", "content": "x", "format": -1 }] }
        }));
        let Node::Text(mut text) = doc.children()[0].clone() else {
            unreachable!()
        };
        text.format = TextFormat(2);

        let value = node_to_value(&Node::Text(text));
        assert_eq!(value.get("format"), Some(&json!(2)));
    }

    #[test]
    fn test_non_object_children_dropped() {
        let doc = parse(json!({
            "root": { "children": [42, "text", { "kind": "paragraph", "children": [null] }] }
        }));
        assert_eq!(doc.children(), &[Node::paragraph(vec![])]);
    }

    #[test]
    fn test_nested_root_is_opaque() {
        let doc = parse(json!({
            "root": { "children": [
                { "kind": "root", "version": 1, "children": [{ "kind": "text", "content": "deep" }] }
            ]}
        }));
        assert!(matches!(&doc.children()[0], Node::Opaque(node) if node.kind == "root"));
        assert_eq!(doc.text_content(), "deep");
    }

    #[test]
    fn test_decorator_round_trip() {
        let registry = badge_registry();
        let value = json!({
            "root": { "kind": "root", "version": 1, "children": [
                { "kind": "badge", "version": 1, "label": "free", "tone": "loud" }
            ]}
        });

        let doc = from_value(&value, &registry).unwrap();
        let Node::Decorator(badge) = &doc.children()[0] else {
            panic!("expected decorator");
        };
        assert_eq!(badge.downcast_ref::<Badge>().unwrap().label, "free");
        assert_eq!(round_trip(value.clone(), &registry), value);

        // Without the kind registered the same node passes through opaquely.
        assert_eq!(round_trip(value.clone(), &Registry::new()), value);
    }

    #[test]
    fn test_malformed_input() {
        let registry = Registry::new();
        assert!(matches!(
            deserialize("{not json", &registry),
            Err(ParseError::Syntax(_))
        ));
        assert!(matches!(
            deserialize("[1, 2]", &registry),
            Err(ParseError::NotAnObject)
        ));
        assert!(matches!(
            deserialize("{\"doc\": {}}", &registry),
            Err(ParseError::MissingRoot)
        ));
        assert!(matches!(
            deserialize("{\"root\": 3}", &registry),
            Err(ParseError::InvalidRoot(_))
        ));
    }

    #[test]
    fn test_serialize_shape() {
        let doc = Document::new(vec![Node::paragraph(vec![Node::text("a")])]);
        assert_eq!(
            serialize(&doc),
            r#"{"root":{"kind":"root","version":1,"children":[{"kind":"paragraph","version":1,"children":[{"kind":"text","version":1,"content":"a","format":0}]}]}}"#
        );
    }
}
