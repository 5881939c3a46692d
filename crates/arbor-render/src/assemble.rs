//! Recursive assembly of visual subtrees.
//!
//! A node renders as a `me-wrapper` holding its `me-parent` container (topic plus expander) and,
//! while expanded, a `me-children` aggregator with one wrapper per child.

use crate::collab::ElementFactory;
use crate::dom::{Dom, DomId};
use crate::expander::Expander;
use crate::options::MindMapOptions;
use crate::topic::{ShapeWarning, Topic, shape_topic};
use crate::{Error, MindMap, Result};
use arbor_core::{Document, NodeData, NodeKey};
use std::sync::Arc;

pub const WRAPPER_TAG: &str = "me-wrapper";
pub const PARENT_TAG: &str = "me-parent";
pub const CHILDREN_TAG: &str = "me-children";

/// A topic wrapped in its container, before it is registered on an instance.
#[derive(Debug, Clone)]
pub struct Container {
    pub el: DomId,
    pub topic: Topic,
    pub warnings: Vec<ShapeWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assembled {
    pub wrapper: DomId,
    pub top: DomId,
    pub topic: DomId,
}

/// Default container construction: create a topic through `factory`, shape it, wrap it.
pub fn build_parent<F: ElementFactory + ?Sized>(
    factory: &F,
    dom: &mut Dom,
    options: &MindMapOptions,
    node: &NodeData,
) -> Container {
    let mut topic = factory.create_topic(dom, options, node);
    let warnings = shape_topic(dom, &mut topic, node);
    let el = dom.create_element(PARENT_TAG);
    dom.append_child(el, topic.el);
    Container {
        el,
        topic,
        warnings,
    }
}

impl MindMap {
    pub fn create_topic(&self, dom: &mut Dom, node: &NodeData) -> Topic {
        self.factory.create_topic(dom, &self.options, node)
    }

    /// Builds the container for `key` and registers its topic on this instance.
    pub fn create_parent(
        &mut self,
        dom: &mut Dom,
        doc: &Document,
        key: NodeKey,
    ) -> Result<Container> {
        let node = doc.get(key).ok_or(Error::UnknownNode { key: key.index() })?;
        let factory = Arc::clone(&self.factory);
        let container = factory.create_parent(dom, &self.options, node);
        self.register_topic(container.topic.clone(), &container.warnings);
        Ok(container)
    }

    pub fn create_children(dom: &mut Dom, wrappers: &[DomId]) -> DomId {
        let el = dom.create_element(CHILDREN_TAG);
        for &wrapper in wrappers {
            dom.append_child(el, wrapper);
        }
        el
    }

    /// Assembles the visual subtree for `key`.
    ///
    /// With `omit_children` only the container is built. Otherwise a node with children always
    /// gets an expander, and its children are laid out only while it is expanded.
    pub fn create_wrapper(
        &mut self,
        dom: &mut Dom,
        doc: &Document,
        key: NodeKey,
        omit_children: bool,
    ) -> Result<Assembled> {
        let node = doc.get(key).ok_or(Error::UnknownNode { key: key.index() })?;
        let grp = dom.create_element(WRAPPER_TAG);
        let container = self.create_parent(dom, doc, key)?;
        dom.append_child(grp, container.el);

        let children = doc.children(key);
        if !omit_children && !children.is_empty() {
            let expander = Expander::create(dom, node.expanded);
            dom.append_child(container.el, expander);
            if node.is_expanded() {
                let layout = Arc::clone(&self.layout);
                let aggregated = layout.layout_children(dom, doc, self, children)?;
                dom.append_child(grp, aggregated);
            }
        }

        Ok(Assembled {
            wrapper: grp,
            top: container.el,
            topic: container.topic.el,
        })
    }
}
