//! Layout node variants
//!
//! Each node kind carries only the attributes that mean something for it.
//! Only text leaves bind fields, and a repeat holds at most one item
//! template.

use serde::{Deserialize, Serialize};

use crate::style::{ColorToken, SizeToken, SpacingToken, TextAlign};

/// The id reserved for the root node of every layout
pub const ROOT_ID: &str = "root";

fn default_true() -> bool {
    true
}

/// A titled block, the usual top-level grouping of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SectionNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_true", alias = "show_title")]
    pub show_title: bool,
    #[serde(default, alias = "title_size", skip_serializing_if = "Option::is_none")]
    pub title_size: Option<SizeToken>,
    #[serde(default, alias = "title_color", skip_serializing_if = "Option::is_none")]
    pub title_color: Option<ColorToken>,
    /// Line drawn directly under the title
    #[serde(default)]
    pub divider: bool,
    /// Rule drawn after the section body
    #[serde(default, alias = "bottom_rule")]
    pub bottom_rule: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl SectionNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            show_title: true,
            title_size: None,
            title_color: None,
            divider: false,
            bottom_rule: false,
            icon: None,
            align: None,
            children: vec![],
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

/// A flex container; used for both rows and columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlexNode {
    pub id: String,
    /// Cross-axis alignment, emitted as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    /// Main-axis justification, emitted as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<SpacingToken>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl FlexNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

/// How a text leaf lays out its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafKind {
    #[default]
    Text,
    Bullets,
    Chips,
}

/// A leaf that displays one field value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LeafNode {
    pub id: String,
    #[serde(default)]
    pub kind: LeafKind,
    #[serde(default, alias = "bind_field", skip_serializing_if = "Option::is_none")]
    pub bind_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    #[serde(default)]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Text between the icon and the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

impl LeafNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn bound_to(mut self, field_id: impl Into<String>) -> Self {
        self.bind_field = Some(field_id.into());
        self
    }

    pub fn with_kind(mut self, kind: LeafKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_size(mut self, size: SizeToken) -> Self {
        self.size = Some(size);
        self
    }
}

/// A block instantiated once per entry of a value list
///
/// Serialized like the other containers, with the item template as the only
/// entry of `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RepeatRepr", into = "RepeatRepr")]
pub struct RepeatNode {
    pub id: String,
    pub label: Option<String>,
    pub item: Option<Box<Node>>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RepeatRepr {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default)]
    children: Vec<Node>,
    /// Documents written before repeats used `children`
    #[serde(default, skip_serializing)]
    item: Option<Box<Node>>,
}

impl TryFrom<RepeatRepr> for RepeatNode {
    type Error = String;

    fn try_from(repr: RepeatRepr) -> Result<Self, Self::Error> {
        let mut templates = repr.children.into_iter().chain(repr.item.map(|item| *item));
        let item = templates.next();
        if templates.next().is_some() {
            return Err(format!(
                "repeat '{}' accepts at most one child template",
                repr.id
            ));
        }
        Ok(Self {
            id: repr.id,
            label: repr.label,
            item: item.map(Box::new),
        })
    }
}

impl From<RepeatNode> for RepeatRepr {
    fn from(node: RepeatNode) -> Self {
        Self {
            id: node.id,
            label: node.label,
            children: node.item.map(|item| vec![*item]).unwrap_or_default(),
            item: None,
        }
    }
}

impl RepeatNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            item: None,
        }
    }

    pub fn with_item(mut self, item: Node) -> Self {
        self.item = Some(Box::new(item));
        self
    }
}

/// One element of the layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Section(SectionNode),
    Row(FlexNode),
    Column(FlexNode),
    TextLeaf(LeafNode),
    Repeat(RepeatNode),
}

impl Node {
    pub fn section(id: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Section(SectionNode::new(id).with_children(children))
    }

    pub fn row(id: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Row(FlexNode::new(id).with_children(children))
    }

    pub fn column(id: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Column(FlexNode::new(id).with_children(children))
    }

    /// A plain text leaf, optionally bound to a field
    pub fn leaf(id: impl Into<String>, bind_field: Option<&str>) -> Self {
        let mut leaf = LeafNode::new(id);
        leaf.bind_field = bind_field.map(str::to_string);
        Node::TextLeaf(leaf)
    }

    pub fn repeat(id: impl Into<String>, item: Option<Node>) -> Self {
        let mut repeat = RepeatNode::new(id);
        repeat.item = item.map(Box::new);
        Node::Repeat(repeat)
    }

    pub fn id(&self) -> &str {
        match self {
            Node::Section(n) => &n.id,
            Node::Row(n) | Node::Column(n) => &n.id,
            Node::TextLeaf(n) => &n.id,
            Node::Repeat(n) => &n.id,
        }
    }

    /// Short name of the variant, as it appears in serialized documents
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Section(_) => "section",
            Node::Row(_) => "row",
            Node::Column(_) => "column",
            Node::TextLeaf(_) => "text-leaf",
            Node::Repeat(_) => "repeat",
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::TextLeaf(_))
    }

    /// The field this node binds, if it is a bound leaf
    pub fn bind_field(&self) -> Option<&str> {
        match self {
            Node::TextLeaf(leaf) => leaf.bind_field.as_deref(),
            _ => None,
        }
    }

    /// Children in order; a repeat yields its item template
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Section(n) => &n.children,
            Node::Row(n) | Node::Column(n) => &n.children,
            Node::TextLeaf(_) => &[],
            Node::Repeat(n) => match &n.item {
                Some(item) => std::slice::from_ref(&**item),
                None => &[],
            },
        }
    }

    /// Mutable children for ordered containers; None for leaves and repeats
    pub(crate) fn container_children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Section(n) => Some(&mut n.children),
            Node::Row(n) | Node::Column(n) => Some(&mut n.children),
            Node::TextLeaf(_) | Node::Repeat(_) => None,
        }
    }

    /// Visit every child mutably, including a repeat's item template
    pub(crate) fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut Node)) {
        match self {
            Node::Section(n) => n.children.iter_mut().for_each(&mut f),
            Node::Row(n) | Node::Column(n) => n.children.iter_mut().for_each(&mut f),
            Node::TextLeaf(_) => {}
            Node::Repeat(n) => {
                if let Some(item) = n.item.as_deref_mut() {
                    f(item);
                }
            }
        }
    }

    /// Depth-first, pre-order iterator over this node and its descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Find a node by id (depth-first)
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.descendants().find(|n| n.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Node::Section(n) => n.children.iter_mut().find_map(|c| c.find_mut(id)),
            Node::Row(n) | Node::Column(n) => n.children.iter_mut().find_map(|c| c.find_mut(id)),
            Node::TextLeaf(_) => None,
            Node::Repeat(n) => n.item.as_deref_mut().and_then(|c| c.find_mut(id)),
        }
    }

    /// Ids of this node and every descendant
    pub fn subtree_ids(&self) -> Vec<&str> {
        self.descendants().map(Node::id).collect()
    }
}

/// Iterator returned by [`Node::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
