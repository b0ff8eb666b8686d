//! Field definitions and the registry that owns them
//!
//! Fields are the only contract between the form that collects values and
//! the renderer that displays them: both address values by field id.

mod registry;

pub use registry::{Field, FieldRegistry, InputKind};
