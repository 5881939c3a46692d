#![forbid(unsafe_code)]

//! Headless mind-map rendering.
//!
//! A [`Document`](arbor_core::Document) is projected onto an in-memory element tree ([`Dom`]):
//! one `me-wrapper` per visible node, each holding a topic container and, while expanded, the
//! node's children. A [`MindMap`] owns the per-instance state (topic table, collaborators, the
//! live inline edit) and announces edits as [`Operation`]s.

pub mod assemble;
pub mod collab;
pub mod dom;
pub mod editor;
pub mod error;
pub mod events;
pub mod expander;
pub mod instance;
pub mod lookup;
pub mod options;
pub mod text;
pub mod topic;

pub use assemble::{Assembled, Container};
pub use collab::{
    ChildrenLayout, DefaultElementFactory, EdgeLinker, ElementFactory, NoopLinker,
    SequentialLayout,
};
pub use dom::{Dom, DomId, DomNodeKind};
pub use editor::{EditOutcome, EditSession, KeyDown, KeyOutcome};
pub use error::{Error, Result};
pub use events::{NoopSink, Operation, OperationSink};
pub use expander::Expander;
pub use instance::MindMap;
pub use lookup::find_ele;
pub use options::{Direction, MindMapOptions};
pub use text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
pub use topic::{ShapeWarning, Topic, create_topic, shape_topic};
