//! Partial attribute updates, one patch type per node variant
//!
//! `None` leaves an attribute untouched. For optional attributes the inner
//! option distinguishes "set" (`Some(Some(v))`) from "clear" (`Some(None)`).

use crate::error::EngineError;
use crate::style::{ColorToken, SizeToken, SpacingToken, TextAlign};

use super::node::{FlexNode, LeafKind, LeafNode, Node, RepeatNode, SectionNode};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionPatch {
    pub title: Option<Option<String>>,
    pub show_title: Option<bool>,
    pub title_size: Option<Option<SizeToken>>,
    pub title_color: Option<Option<ColorToken>>,
    pub divider: Option<bool>,
    pub bottom_rule: Option<bool>,
    pub icon: Option<Option<String>>,
    pub align: Option<Option<TextAlign>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlexPatch {
    pub align: Option<Option<String>>,
    pub justify: Option<Option<String>>,
    pub gap: Option<Option<SpacingToken>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafPatch {
    pub kind: Option<LeafKind>,
    pub bind_field: Option<Option<String>>,
    pub size: Option<Option<SizeToken>>,
    pub color: Option<Option<ColorToken>>,
    pub weight: Option<Option<u16>>,
    pub italic: Option<bool>,
    pub align: Option<Option<TextAlign>>,
    pub icon: Option<Option<String>>,
    pub separator: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepeatPatch {
    pub label: Option<Option<String>>,
}

/// Attribute update for a single node
///
/// `Flex` applies to both rows and columns.
#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    Section(SectionPatch),
    Flex(FlexPatch),
    Leaf(LeafPatch),
    Repeat(RepeatPatch),
}

impl NodePatch {
    /// Patch that only changes a leaf's binding
    pub fn bind(field_id: Option<&str>) -> Self {
        NodePatch::Leaf(LeafPatch {
            bind_field: Some(field_id.map(str::to_string)),
            ..Default::default()
        })
    }

    fn variant_name(&self) -> &'static str {
        match self {
            NodePatch::Section(_) => "section",
            NodePatch::Flex(_) => "row/column",
            NodePatch::Leaf(_) => "text-leaf",
            NodePatch::Repeat(_) => "repeat",
        }
    }

    /// Apply to a node of the matching variant
    pub(crate) fn apply(self, node: &mut Node) -> Result<(), EngineError> {
        let expected = self.variant_name();
        match (self, node) {
            (NodePatch::Section(p), Node::Section(n)) => p.apply(n),
            (NodePatch::Flex(p), Node::Row(n) | Node::Column(n)) => p.apply(n),
            (NodePatch::Leaf(p), Node::TextLeaf(n)) => p.apply(n),
            (NodePatch::Repeat(p), Node::Repeat(n)) => p.apply(n),
            (_, node) => {
                return Err(EngineError::validation(format!(
                    "cannot apply {} attributes to {} node '{}'",
                    expected,
                    node.kind_name(),
                    node.id()
                )))
            }
        }
        Ok(())
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

impl SectionPatch {
    fn apply(self, n: &mut SectionNode) {
        set(&mut n.title, self.title);
        set(&mut n.show_title, self.show_title);
        set(&mut n.title_size, self.title_size);
        set(&mut n.title_color, self.title_color);
        set(&mut n.divider, self.divider);
        set(&mut n.bottom_rule, self.bottom_rule);
        set(&mut n.icon, self.icon);
        set(&mut n.align, self.align);
    }
}

impl FlexPatch {
    fn apply(self, n: &mut FlexNode) {
        set(&mut n.align, self.align);
        set(&mut n.justify, self.justify);
        set(&mut n.gap, self.gap);
    }
}

impl LeafPatch {
    fn apply(self, n: &mut LeafNode) {
        set(&mut n.kind, self.kind);
        set(&mut n.bind_field, self.bind_field);
        set(&mut n.size, self.size);
        set(&mut n.color, self.color);
        set(&mut n.weight, self.weight);
        set(&mut n.italic, self.italic);
        set(&mut n.align, self.align);
        set(&mut n.icon, self.icon);
        set(&mut n.separator, self.separator);
    }
}

impl RepeatPatch {
    fn apply(self, n: &mut RepeatNode) {
        set(&mut n.label, self.label);
    }
}
