//! Document tree
//!
//! A [`Document`] owns exactly one [`Root`]; everything below it is a
//! [`Node`]. Structural kinds are plain data, decorator kinds are shared
//! immutable values, and kinds this version does not know are kept as
//! [`OpaqueNode`]s so they survive a read/write cycle.
//!
//! Nodes are values. Editing a document produces a new document; see
//! [`Document::replace`], [`Document::insert`] and [`Document::remove`].

use serde_json::Value;

use crate::decorator::DecoratorNode;
use crate::error::TreeError;
use crate::format::TextFormat;
use crate::kind::NodeKind;

/// Raw wire fields of a node, in insertion order.
pub type Fields = serde_json::Map<String, Value>;

/// Version written for newly constructed nodes
pub const DEFAULT_VERSION: u32 = 1;

/// A complete document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub root: Root,
}

/// The single top-level container.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub version: u32,
    pub children: Vec<Node>,
    pub extra: Fields,
}

impl Default for Root {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            children: Vec::new(),
            extra: Fields::new(),
        }
    }
}

/// A container without kind-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub version: u32,
    pub children: Vec<Node>,
    pub extra: Fields,
}

impl Element {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            version: DEFAULT_VERSION,
            children,
            extra: Fields::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub version: u32,
    /// Level as stored; see [`Heading::effective_level`].
    pub level: i64,
    pub children: Vec<Node>,
    pub extra: Fields,
}

impl Heading {
    pub const FALLBACK_LEVEL: u8 = 2;

    /// Level in `1..=5`, with anything else treated as level 2.
    pub fn effective_level(&self) -> u8 {
        match self.level {
            1..=5 => self.level as u8,
            _ => Self::FALLBACK_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

impl ListStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ListStyle::Ordered => "ordered",
            ListStyle::Unordered => "unordered",
        }
    }

    /// Unrecognised styles fall back to unordered.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ordered" => ListStyle::Ordered,
            _ => ListStyle::Unordered,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub version: u32,
    pub list_style: ListStyle,
    /// First number of an ordered list
    pub start: Option<i64>,
    pub children: Vec<Node>,
    pub extra: Fields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub version: u32,
    pub language: Option<String>,
    pub children: Vec<Node>,
    pub extra: Fields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub version: u32,
    pub url: String,
    pub children: Vec<Node>,
    pub extra: Fields,
}

/// A run of text. Always a leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub version: u32,
    pub content: String,
    /// Low 32 bits of the wire mask. A wider wire value is also kept
    /// verbatim in `extra` and written back while these bits match it.
    pub format: TextFormat,
    pub extra: Fields,
}

/// A leaf without kind-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub version: u32,
    pub extra: Fields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub version: u32,
    pub header: bool,
    pub children: Vec<Node>,
    pub extra: Fields,
}

/// A node of a kind this registry does not know.
///
/// `fields` holds every wire field except `kind` and `children`, `version`
/// included, exactly as read.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueNode {
    pub kind: String,
    pub fields: Fields,
    pub children: Option<Vec<Node>>,
}

impl OpaqueNode {
    pub fn version(&self) -> Option<u64> {
        self.fields.get("version").and_then(Value::as_u64)
    }
}

/// A node below the root.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Paragraph(Element),
    Heading(Heading),
    List(List),
    ListItem(Element),
    Quote(Element),
    CodeBlock(CodeBlock),
    Link(Link),
    Text(Text),
    LineBreak(Leaf),
    Table(Element),
    TableRow(Element),
    TableCell(TableCell),
    Decorator(DecoratorNode),
    Opaque(OpaqueNode),
}

impl Node {
    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph(Element::new(children))
    }

    pub fn heading(level: i64, children: Vec<Node>) -> Self {
        Node::Heading(Heading {
            version: DEFAULT_VERSION,
            level,
            children,
            extra: Fields::new(),
        })
    }

    pub fn list(list_style: ListStyle, children: Vec<Node>) -> Self {
        Node::List(List {
            version: DEFAULT_VERSION,
            list_style,
            start: None,
            children,
            extra: Fields::new(),
        })
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Node::ListItem(Element::new(children))
    }

    pub fn quote(children: Vec<Node>) -> Self {
        Node::Quote(Element::new(children))
    }

    pub fn code_block(language: Option<&str>, children: Vec<Node>) -> Self {
        Node::CodeBlock(CodeBlock {
            version: DEFAULT_VERSION,
            language: language.map(str::to_string),
            children,
            extra: Fields::new(),
        })
    }

    pub fn link(url: &str, children: Vec<Node>) -> Self {
        Node::Link(Link {
            version: DEFAULT_VERSION,
            url: url.to_string(),
            children,
            extra: Fields::new(),
        })
    }

    /// Create an unformatted text node
    pub fn text(content: &str) -> Self {
        Self::formatted_text(content, TextFormat::PLAIN)
    }

    pub fn formatted_text(content: &str, format: impl Into<TextFormat>) -> Self {
        Node::Text(Text {
            version: DEFAULT_VERSION,
            content: content.to_string(),
            format: format.into(),
            extra: Fields::new(),
        })
    }

    pub fn line_break() -> Self {
        Node::LineBreak(Leaf {
            version: DEFAULT_VERSION,
            extra: Fields::new(),
        })
    }

    pub fn table(rows: Vec<Node>) -> Self {
        Node::Table(Element::new(rows))
    }

    pub fn table_row(cells: Vec<Node>) -> Self {
        Node::TableRow(Element::new(cells))
    }

    pub fn table_cell(header: bool, children: Vec<Node>) -> Self {
        Node::TableCell(TableCell {
            version: DEFAULT_VERSION,
            header,
            children,
            extra: Fields::new(),
        })
    }

    pub fn decorator(node: DecoratorNode) -> Self {
        Node::Decorator(node)
    }

    /// Wire tag of this node.
    pub fn kind(&self) -> &str {
        match self {
            Node::Decorator(decorator) => decorator.kind(),
            Node::Opaque(opaque) => &opaque.kind,
            _ => self.builtin_kind().map(NodeKind::as_str).unwrap_or_default(),
        }
    }

    pub fn builtin_kind(&self) -> Option<NodeKind> {
        let kind = match self {
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::Heading(_) => NodeKind::Heading,
            Node::List(_) => NodeKind::List,
            Node::ListItem(_) => NodeKind::ListItem,
            Node::Quote(_) => NodeKind::Quote,
            Node::CodeBlock(_) => NodeKind::CodeBlock,
            Node::Link(_) => NodeKind::Link,
            Node::Text(_) => NodeKind::Text,
            Node::LineBreak(_) => NodeKind::LineBreak,
            Node::Table(_) => NodeKind::Table,
            Node::TableRow(_) => NodeKind::TableRow,
            Node::TableCell(_) => NodeKind::TableCell,
            Node::Decorator(_) | Node::Opaque(_) => return None,
        };
        Some(kind)
    }

    /// Version as a number; opaque nodes without a numeric version report 0.
    pub fn version(&self) -> u32 {
        match self {
            Node::Paragraph(el)
            | Node::ListItem(el)
            | Node::Quote(el)
            | Node::Table(el)
            | Node::TableRow(el) => el.version,
            Node::Heading(heading) => heading.version,
            Node::List(list) => list.version,
            Node::CodeBlock(code) => code.version,
            Node::Link(link) => link.version,
            Node::Text(text) => text.version,
            Node::LineBreak(leaf) => leaf.version,
            Node::TableCell(cell) => cell.version,
            Node::Decorator(decorator) => decorator.version(),
            Node::Opaque(opaque) => opaque
                .version()
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0),
        }
    }

    /// Child nodes, or `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Paragraph(el)
            | Node::ListItem(el)
            | Node::Quote(el)
            | Node::Table(el)
            | Node::TableRow(el) => Some(&el.children),
            Node::Heading(heading) => Some(&heading.children),
            Node::List(list) => Some(&list.children),
            Node::CodeBlock(code) => Some(&code.children),
            Node::Link(link) => Some(&link.children),
            Node::TableCell(cell) => Some(&cell.children),
            Node::Opaque(opaque) => opaque.children.as_deref(),
            Node::Text(_) | Node::LineBreak(_) | Node::Decorator(_) => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Paragraph(el)
            | Node::ListItem(el)
            | Node::Quote(el)
            | Node::Table(el)
            | Node::TableRow(el) => Some(&mut el.children),
            Node::Heading(heading) => Some(&mut heading.children),
            Node::List(list) => Some(&mut list.children),
            Node::CodeBlock(code) => Some(&mut code.children),
            Node::Link(link) => Some(&mut link.children),
            Node::TableCell(cell) => Some(&mut cell.children),
            Node::Opaque(opaque) => opaque.children.as_mut(),
            Node::Text(_) | Node::LineBreak(_) | Node::Decorator(_) => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }

    /// Concatenated text of this node and its descendants
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.content.clone(),
            _ => self
                .children()
                .map(|children| children.iter().map(Node::text_content).collect())
                .unwrap_or_default(),
        }
    }
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Root {
                children,
                ..Root::default()
            },
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.root.children
    }

    /// Node at a path of child indices from the root.
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.root.children.get(first)?;
        for &index in rest {
            node = node.children()?.get(index)?;
        }
        Some(node)
    }

    /// A copy of this document with the node at `path` replaced.
    pub fn replace(&self, path: &[usize], node: Node) -> Result<Document, TreeError> {
        let (&index, parent) = path
            .split_last()
            .ok_or_else(|| TreeError::InvalidPath(path.to_vec()))?;

        let mut doc = self.clone();
        let siblings = container_mut(&mut doc.root.children, parent, path)?;
        let slot = siblings
            .get_mut(index)
            .ok_or_else(|| TreeError::InvalidPath(path.to_vec()))?;
        *slot = node;
        Ok(doc)
    }

    /// A copy of this document with `node` inserted so that it ends up at
    /// `path`. The last index may equal the number of siblings to append.
    pub fn insert(&self, path: &[usize], node: Node) -> Result<Document, TreeError> {
        let (&index, parent) = path
            .split_last()
            .ok_or_else(|| TreeError::InvalidPath(path.to_vec()))?;

        let mut doc = self.clone();
        let siblings = container_mut(&mut doc.root.children, parent, path)?;
        if index > siblings.len() {
            return Err(TreeError::InvalidPath(path.to_vec()));
        }
        siblings.insert(index, node);
        Ok(doc)
    }

    /// A copy of this document without the node at `path`.
    pub fn remove(&self, path: &[usize]) -> Result<Document, TreeError> {
        let (&index, parent) = path
            .split_last()
            .ok_or_else(|| TreeError::InvalidPath(path.to_vec()))?;

        let mut doc = self.clone();
        let siblings = container_mut(&mut doc.root.children, parent, path)?;
        if index >= siblings.len() {
            return Err(TreeError::InvalidPath(path.to_vec()));
        }
        siblings.remove(index);
        Ok(doc)
    }

    pub fn text_content(&self) -> String {
        self.root.children.iter().map(Node::text_content).collect()
    }
}

/// Walk `parent` from the root and return that container's children.
fn container_mut<'a>(
    mut children: &'a mut Vec<Node>,
    parent: &[usize],
    path: &[usize],
) -> Result<&'a mut Vec<Node>, TreeError> {
    for &index in parent {
        let node = children
            .get_mut(index)
            .ok_or_else(|| TreeError::InvalidPath(path.to_vec()))?;
        let kind = node.kind().to_string();
        children = node.children_mut().ok_or(TreeError::NotAContainer(kind))?;
    }
    Ok(children)
}
