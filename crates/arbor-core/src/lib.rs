#![forbid(unsafe_code)]

//! Mind-map document model (headless).
//!
//! - [`Node`]: the nested record documents are exchanged in
//! - [`Document`]: the flat node table renderers resolve node ids against
//! - [`Config`]: JSON-backed settings with dotted-path access

pub mod config;
pub mod document;
pub mod error;
pub mod node;

pub use config::Config;
pub use document::{Document, NodeKey};
pub use error::{Error, Result};
pub use node::{ImageSpec, Node, NodeData, NodeImage, NodeStyle};
