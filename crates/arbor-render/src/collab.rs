//! Services a [`MindMap`] delegates to instead of hardcoding them.

use crate::assemble::{Container, build_parent};
use crate::dom::{Dom, DomId};
use crate::options::MindMapOptions;
use crate::topic::{Topic, create_topic};
use crate::{MindMap, Result};
use arbor_core::{Document, NodeData, NodeKey};

/// Instance-level construction hooks for topics and their containers.
pub trait ElementFactory {
    fn create_topic(&self, dom: &mut Dom, options: &MindMapOptions, node: &NodeData) -> Topic {
        create_topic(dom, options, node)
    }

    fn create_parent(&self, dom: &mut Dom, options: &MindMapOptions, node: &NodeData) -> Container {
        build_parent(self, dom, options, node)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultElementFactory;

impl ElementFactory for DefaultElementFactory {}

/// Lays out a node's children and returns their aggregated element.
///
/// Implementations are expected to assemble each child through [`MindMap::create_wrapper`].
pub trait ChildrenLayout {
    fn layout_children(
        &self,
        dom: &mut Dom,
        doc: &Document,
        map: &mut MindMap,
        children: &[NodeKey],
    ) -> Result<DomId>;
}

/// Places children one after another in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialLayout;

impl ChildrenLayout for SequentialLayout {
    fn layout_children(
        &self,
        dom: &mut Dom,
        doc: &Document,
        map: &mut MindMap,
        children: &[NodeKey],
    ) -> Result<DomId> {
        let mut wrappers = Vec::with_capacity(children.len());
        for &child in children {
            wrappers.push(map.create_wrapper(dom, doc, child, false)?.wrapper);
        }
        Ok(MindMap::create_children(dom, &wrappers))
    }
}

/// Redraws the connecting edges between topics.
pub trait EdgeLinker {
    fn link(&self, dom: &mut Dom, map: &MindMap);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLinker;

impl EdgeLinker for NoopLinker {
    fn link(&self, _dom: &mut Dom, _map: &MindMap) {}
}
