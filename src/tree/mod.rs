//! Template layout tree
//!
//! A template's layout is a rooted tree of typed nodes. Sections, rows and
//! columns hold ordered children; text leaves display a bound field; a
//! repeat holds a single item template that is instantiated once per entry
//! of a value list.

mod layout;
mod node;
mod patch;

pub use layout::LayoutTree;
pub use node::{
    Descendants, FlexNode, LeafKind, LeafNode, Node, RepeatNode, SectionNode, ROOT_ID,
};
pub use patch::{FlexPatch, LeafPatch, NodePatch, RepeatPatch, SectionPatch};
