use crate::collab::{
    ChildrenLayout, DefaultElementFactory, EdgeLinker, ElementFactory, NoopLinker,
    SequentialLayout,
};
use crate::assemble::Assembled;
use crate::dom::{Dom, DomId};
use crate::editor::EditSession;
use crate::events::{NoopSink, Operation, OperationSink};
use crate::expander::Expander;
use crate::lookup::find_ele;
use crate::options::MindMapOptions;
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use crate::topic::{NODE_ID_ATTR, ShapeWarning, Topic, node_id_tag, shape_topic};
use crate::{Error, Result};
use arbor_core::{Document, NodeKey};
use rustc_hash::FxHashMap;
use std::sync::Arc;

pub const CONTAINER_CLASS: &str = "map-container";
pub const CANVAS_CLASS: &str = "map-canvas";
pub const ROOT_CLASS: &str = "me-root";

/// One mounted mind map.
///
/// Every operation takes the element tree and the document explicitly, so several instances can
/// share one [`Dom`] without global state.
pub struct MindMap {
    pub(crate) options: MindMapOptions,
    container: DomId,
    canvas: DomId,
    pub(crate) factory: Arc<dyn ElementFactory + Send + Sync>,
    pub(crate) layout: Arc<dyn ChildrenLayout + Send + Sync>,
    pub(crate) linker: Arc<dyn EdgeLinker + Send + Sync>,
    pub(crate) measurer: Arc<dyn TextMeasurer + Send + Sync>,
    bus: Box<dyn OperationSink>,
    topics: FxHashMap<DomId, Topic>,
    warnings: Vec<ShapeWarning>,
    pub(crate) edit: Option<EditSession>,
}

impl std::fmt::Debug for MindMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MindMap")
            .field("options", &self.options)
            .field("container", &self.container)
            .field("canvas", &self.canvas)
            .field("topics", &self.topics.len())
            .field("edit", &self.edit)
            .finish_non_exhaustive()
    }
}

impl MindMap {
    /// Creates the scoping container and the focusable canvas under `host`.
    pub fn mount(dom: &mut Dom, host: DomId, options: MindMapOptions) -> Self {
        let container = dom.create_element("div");
        dom.set_class_name(container, CONTAINER_CLASS);
        let canvas = dom.create_element("div");
        dom.set_class_name(canvas, CANVAS_CLASS);
        dom.set_attr(canvas, "tabindex", "0");
        dom.append_child(container, canvas);
        dom.append_child(host, container);

        Self {
            options,
            container,
            canvas,
            factory: Arc::new(DefaultElementFactory),
            layout: Arc::new(SequentialLayout),
            linker: Arc::new(NoopLinker),
            measurer: Arc::new(DeterministicTextMeasurer::default()),
            bus: Box::new(NoopSink),
            topics: FxHashMap::default(),
            warnings: Vec::new(),
            edit: None,
        }
    }

    pub fn with_factory(mut self, factory: Arc<dyn ElementFactory + Send + Sync>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_layout(mut self, layout: Arc<dyn ChildrenLayout + Send + Sync>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_linker(mut self, linker: Arc<dyn EdgeLinker + Send + Sync>) -> Self {
        self.linker = linker;
        self
    }

    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn with_sink(mut self, sink: impl OperationSink + 'static) -> Self {
        self.bus = Box::new(sink);
        self
    }

    pub fn options(&self) -> &MindMapOptions {
        &self.options
    }

    /// Root element that scopes lookups for this instance.
    pub fn container(&self) -> DomId {
        self.container
    }

    pub fn canvas(&self) -> DomId {
        self.canvas
    }

    pub(crate) fn fire(&self, op: Operation) {
        tracing::debug!(op = op.name(), node_id = op.node_id(), "operation");
        self.bus.fire(op);
    }

    pub(crate) fn link(&self, dom: &mut Dom) {
        let linker = Arc::clone(&self.linker);
        linker.link(dom, self);
    }

    pub(crate) fn register_topic(&mut self, topic: Topic, warnings: &[ShapeWarning]) {
        self.warnings.extend_from_slice(warnings);
        self.topics.insert(topic.el, topic);
    }

    pub fn topic(&self, el: DomId) -> Option<&Topic> {
        self.topics.get(&el)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Node id a rendered topic refers to.
    pub fn node_of(&self, topic: DomId) -> Option<&str> {
        self.topics.get(&topic).map(|t| t.node_id.as_str())
    }

    /// Topic currently rendered for `node_id`; the first in document order if ids repeat.
    pub fn topic_for_node(&self, dom: &Dom, node_id: &str) -> Option<&Topic> {
        let el = dom.query_by_attr(self.container, NODE_ID_ATTR, &node_id_tag(node_id))?;
        self.topics.get(&el)
    }

    /// Warnings collected while shaping topics since the last call.
    pub fn take_warnings(&mut self) -> Vec<ShapeWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn prune_topics(&mut self, dom: &Dom) {
        let container = self.container;
        self.topics.retain(|el, _| dom.contains(container, *el));
    }

    /// Full render: replaces the canvas content with the root's subtree and relinks edges.
    ///
    /// The previous tree is freed. A live edit session moves to the rebuilt topic of its node.
    pub fn render(&mut self, dom: &mut Dom, doc: &Document) -> Result<Assembled> {
        self.detach_edit(dom);
        for child in dom.children(self.canvas).to_vec() {
            dom.dispose(child);
        }
        self.prune_topics(dom);
        let out = self.create_wrapper(dom, doc, doc.root(), false)?;
        dom.add_class(out.wrapper, ROOT_CLASS);
        dom.append_child(self.canvas, out.wrapper);
        self.rehome_edit(dom);
        tracing::debug!(nodes = doc.len(), topics = self.topics.len(), "rendered mind map");
        self.link(dom);
        Ok(out)
    }

    /// Re-shapes the topic rendered for `node_id` without touching its children.
    ///
    /// Returns `None` when no such topic is rendered in this instance.
    pub fn refresh_topic(
        &mut self,
        dom: &mut Dom,
        doc: &Document,
        node_id: &str,
    ) -> Option<Vec<ShapeWarning>> {
        let el = find_ele(dom, node_id, Some(self))?;
        let node = doc.by_id(node_id)?;
        self.detach_edit(dom);
        let shaped = self
            .topics
            .get_mut(&el)
            .map(|topic| shape_topic(dom, topic, node));
        self.rehome_edit(dom);
        let warnings = shaped?;
        self.warnings.extend_from_slice(&warnings);
        Some(warnings)
    }

    /// Swaps the container of an already rendered node for a freshly built one, leaving the
    /// node's children aggregator in place. The old container is freed.
    pub fn reshape_parent(
        &mut self,
        dom: &mut Dom,
        doc: &Document,
        key: NodeKey,
    ) -> Result<Option<Assembled>> {
        let node = doc.get(key).ok_or(Error::UnknownNode { key: key.index() })?;
        let Some(old_topic) = find_ele(dom, &node.id, Some(self)) else {
            return Ok(None);
        };
        let Some(old_parent) = dom.parent(old_topic) else {
            return Ok(None);
        };
        let Some(wrapper) = dom.parent(old_parent) else {
            return Ok(None);
        };

        let fresh = self.create_parent(dom, doc, key)?;
        if !doc.children(key).is_empty() {
            let expander = Expander::create(dom, node.expanded);
            dom.append_child(fresh.el, expander);
        }
        self.detach_edit(dom);
        dom.replace_with(old_parent, fresh.el);
        dom.dispose(old_parent);
        self.prune_topics(dom);
        self.rehome_edit(dom);
        self.link(dom);
        Ok(Some(Assembled {
            wrapper,
            top: fresh.el,
            topic: fresh.topic.el,
        }))
    }
}
