//! Visual topics: one rendered element per node, plus its optional decoration slots.

use crate::dom::{Dom, DomId};
use crate::options::MindMapOptions;
use arbor_core::NodeData;

pub const TOPIC_TAG: &str = "me-tpc";
pub const NODE_ID_ATTR: &str = "data-nodeid";
pub const NODE_ID_PREFIX: &str = "me";
pub const LINK_MARKER: &str = "\u{1F517}";

/// Identity attribute value stamped on a topic for `node_id`.
pub fn node_id_tag(node_id: &str) -> String {
    format!("{NODE_ID_PREFIX}{node_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShapeWarning {
    /// `image` is present but url, width or height is missing.
    IncompleteImage { node_id: String },
}

impl std::fmt::Display for ShapeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeWarning::IncompleteImage { node_id } => {
                write!(f, "image url/width/height are required (node {node_id})")
            }
        }
    }
}

/// A rendered topic and the decoration elements it exclusively owns.
///
/// The node is referenced by id and resolved through the document's node table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub el: DomId,
    pub node_id: String,
    image: Option<DomId>,
    link: Option<DomId>,
    icons: Option<DomId>,
    tags: Option<DomId>,
}

impl Topic {
    pub fn new(el: DomId, node_id: impl Into<String>) -> Self {
        Self {
            el,
            node_id: node_id.into(),
            image: None,
            link: None,
            icons: None,
            tags: None,
        }
    }

    pub fn image(&self) -> Option<DomId> {
        self.image
    }

    pub fn link(&self) -> Option<DomId> {
        self.link
    }

    pub fn icons(&self) -> Option<DomId> {
        self.icons
    }

    pub fn tags(&self) -> Option<DomId> {
        self.tags
    }
}

/// Creates a fresh, unshaped topic element for `node`.
pub fn create_topic(dom: &mut Dom, options: &MindMapOptions, node: &NodeData) -> Topic {
    let el = dom.create_element(TOPIC_TAG);
    dom.set_attr(el, NODE_ID_ATTR, &node_id_tag(&node.id));
    dom.set_attr(el, "draggable", if options.draggable { "true" } else { "false" });
    Topic::new(el, node.id.as_str())
}

/// Projects `node` onto `topic`. Safe to call repeatedly as the node changes.
///
/// The primary text is assigned as a text node; icon and tag labels are escaped because they are
/// inserted as markup.
pub fn shape_topic(dom: &mut Dom, topic: &mut Topic, node: &NodeData) -> Vec<ShapeWarning> {
    let mut warnings = Vec::new();
    let el = topic.el;

    // Resets every child, so each slot below only has to forget its stale element.
    dom.set_text_content(el, &node.topic);

    match &node.style {
        Some(style) => {
            dom.set_style(el, "color", style.color.as_deref().unwrap_or(""));
            dom.set_style(el, "background", style.background.as_deref().unwrap_or(""));
            let font_size = style.font_size.map(|v| format!("{v}px")).unwrap_or_default();
            dom.set_style(el, "font-size", &font_size);
            dom.set_style(
                el,
                "font-weight",
                style.font_weight.as_deref().unwrap_or("normal"),
            );
        }
        None => {
            for prop in ["color", "background", "font-size", "font-weight"] {
                dom.set_style(el, prop, "");
            }
        }
    }

    let image = match &node.image {
        Some(img) => match img.complete() {
            Some(spec) => Some(spec),
            None => {
                tracing::warn!(node_id = %node.id, "image url/width/height are required");
                warnings.push(ShapeWarning::IncompleteImage {
                    node_id: node.id.clone(),
                });
                None
            }
        },
        None => None,
    };
    let build_image = image.map(|spec| {
        move |dom: &mut Dom| {
            let img = dom.create_element("img");
            dom.set_attr(img, "src", spec.url);
            dom.set_style(img, "width", &format!("{}px", spec.width));
            dom.set_style(img, "height", &format!("{}px", spec.height));
            img
        }
    });
    reconcile_slot(dom, el, &mut topic.image, build_image);

    let build_link = node.hyper_link().map(|href| {
        move |dom: &mut Dom| {
            let a = dom.create_element("a");
            dom.set_class_name(a, "hyper-link");
            dom.set_attr(a, "target", "_blank");
            dom.set_attr(a, "href", href);
            dom.set_text_content(a, LINK_MARKER);
            a
        }
    });
    reconcile_slot(dom, el, &mut topic.link, build_link);

    let icons = (!node.icons.is_empty()).then(|| labels_markup(&node.icons));
    let build_icons = icons.map(|markup| labelled_span("span", "icons", markup));
    reconcile_slot(dom, el, &mut topic.icons, build_icons);

    let tags = (!node.tags.is_empty()).then(|| labels_markup(&node.tags));
    let build_tags = tags.map(|markup| labelled_span("div", "tags", markup));
    reconcile_slot(dom, el, &mut topic.tags, build_tags);

    dom.set_style(el, "border-color", node.branch_color().unwrap_or(""));

    warnings
}

fn labelled_span(
    tag: &'static str,
    class: &'static str,
    markup: String,
) -> impl FnOnce(&mut Dom) -> DomId {
    move |dom: &mut Dom| {
        let el = dom.create_element(tag);
        dom.set_class_name(el, class);
        dom.set_inner_html(el, &markup);
        el
    }
}

/// Frees the slot's previous element, then builds and appends a new one when wanted.
fn reconcile_slot<F>(dom: &mut Dom, host: DomId, slot: &mut Option<DomId>, build: Option<F>)
where
    F: FnOnce(&mut Dom) -> DomId,
{
    if let Some(stale) = slot.take() {
        dom.dispose(stale);
    }
    if let Some(build) = build {
        let child = build(dom);
        dom.append_child(host, child);
        *slot = Some(child);
    }
}

fn labels_markup(labels: &[String]) -> String {
    let mut out = String::new();
    for label in labels {
        out.push_str("<span>");
        out.push_str(&htmlize::escape_all_quotes(label.as_str()));
        out.push_str("</span>");
    }
    out
}
