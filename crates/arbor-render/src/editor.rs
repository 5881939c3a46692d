//! Inline topic editing.
//!
//! An edit session is a transient editable surface appended to a topic. Every way out of the
//! session goes through [`MindMap::blur_edit`], which writes the trimmed text back into the
//! document. There is no discard.

use crate::MindMap;
use crate::dom::{Dom, DomId, DomNodeKind};
use crate::events::Operation;
use crate::options::Direction;
use crate::text::TextStyle;
use arbor_core::Document;

pub const INPUT_BOX_ID: &str = "input-box";

/// The single live edit of a [`MindMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    surface: DomId,
    topic: DomId,
    node_id: String,
    origin: String,
}

impl EditSession {
    pub fn surface(&self) -> DomId {
        self.surface
    }

    pub fn topic(&self) -> DomId {
        self.topic
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Topic text when the session started.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// A keydown delivered to the editable surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDown {
    pub key: String,
    pub shift: bool,
}

impl KeyDown {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            shift: false,
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// What the host should do with a key event after the editor saw it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    pub stop_propagation: bool,
    pub prevent_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The committed text equals the original; nothing was patched and no event fired.
    Unchanged,
    Changed { topic: String, origin: String },
}

impl MindMap {
    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Opens an edit session on `topic` and returns the editable surface.
    ///
    /// A missing or foreign topic is a no-op. A session that is still live is committed first.
    pub fn begin_edit(
        &mut self,
        dom: &mut Dom,
        doc: &mut Document,
        topic: Option<DomId>,
    ) -> Option<DomId> {
        let topic = topic?;
        let Some(node_id) = self.node_of(topic).map(str::to_string) else {
            tracing::debug!(?topic, "begin_edit: element is not a topic of this map");
            return None;
        };
        if self.edit.is_some() {
            self.blur_edit(dom, doc);
        }

        let origin = dom
            .first_child(topic)
            .map(|c| dom.text_content(c))
            .unwrap_or_default();
        let width = self.topic_width(doc, &node_id, &origin);

        let surface = dom.create_element("div");
        dom.set_attr(surface, "id", INPUT_BOX_ID);
        dom.set_text_content(surface, &origin);
        dom.set_attr(surface, "contenteditable", "true");
        dom.set_attr(surface, "spellcheck", "false");
        let min_width = (width - self.options.editor_padding).max(0.0);
        dom.set_style(surface, "min-width", &format!("{min_width}px"));
        if self.options.direction == Direction::Left {
            dom.set_style(surface, "right", "0");
        }
        dom.append_child(topic, surface);
        dom.focus(surface);
        dom.select_contents(surface);

        self.edit = Some(EditSession {
            surface,
            topic,
            node_id: node_id.clone(),
            origin,
        });
        self.fire(Operation::BeginEdit { node_id });
        Some(surface)
    }

    /// Replaces the content of the editable surface, as typing would.
    pub fn input_text(&self, dom: &mut Dom, text: &str) -> bool {
        match &self.edit {
            Some(session) => dom.set_text_content(session.surface, text).is_some(),
            None => false,
        }
    }

    /// Handles a keydown on the editable surface.
    ///
    /// Enter or Tab without Shift ends the session by moving focus to the canvas.
    pub fn edit_keydown(
        &mut self,
        dom: &mut Dom,
        doc: &mut Document,
        key: &KeyDown,
    ) -> KeyOutcome {
        if self.edit.is_none() {
            return KeyOutcome::default();
        }
        let mut outcome = KeyOutcome {
            stop_propagation: true,
            prevent_default: false,
        };
        if matches!(key.key.as_str(), "Enter" | "Tab") && !key.shift {
            outcome.prevent_default = true;
            let canvas = self.canvas();
            self.focus(dom, doc, canvas);
        }
        outcome
    }

    /// Moves focus to `target`, committing a live edit when focus leaves its surface.
    pub fn focus(
        &mut self,
        dom: &mut Dom,
        doc: &mut Document,
        target: DomId,
    ) -> Option<EditOutcome> {
        let leaves_surface = self
            .edit
            .as_ref()
            .is_some_and(|s| !dom.contains(s.surface, target));
        let outcome = if leaves_surface {
            self.blur_edit(dom, doc)
        } else {
            None
        };
        dom.focus(target);
        outcome
    }

    /// Commits the live session: the surface has lost focus.
    ///
    /// The displayed text is patched on whichever topic currently renders the edited node, which
    /// may differ from the one the session started on if the map was rebuilt meanwhile.
    pub fn blur_edit(&mut self, dom: &mut Dom, doc: &mut Document) -> Option<EditOutcome> {
        let session = self.edit.take()?;
        let topic = dom.text_content(session.surface).trim().to_string();
        match doc.key_of(&session.node_id) {
            Some(key) => {
                doc.set_topic(key, topic.as_str());
            }
            None => {
                tracing::warn!(
                    node_id = %session.node_id,
                    "edited node is gone from the document"
                );
            }
        }
        dom.dispose(session.surface);

        if topic == session.origin {
            return Some(EditOutcome::Unchanged);
        }
        match self.topic_for_node(dom, &session.node_id) {
            Some(rendered) => {
                let el = rendered.el;
                patch_primary_text(dom, el, &topic);
            }
            None => tracing::debug!(node_id = %session.node_id, "edited topic is not rendered"),
        }
        self.link(dom);
        self.fire(Operation::FinishEdit {
            node_id: session.node_id,
            topic: topic.clone(),
            origin: session.origin.clone(),
        });
        Some(EditOutcome::Changed {
            topic,
            origin: session.origin,
        })
    }

    /// Takes the live surface out of the tree so a rebuild does not free it.
    pub(crate) fn detach_edit(&self, dom: &mut Dom) {
        if let Some(session) = &self.edit {
            dom.remove(session.surface);
        }
    }

    /// Puts a detached surface back on the topic that now renders the edited node.
    ///
    /// When the node is no longer rendered the surface stays detached; the session still commits
    /// its text on blur.
    pub(crate) fn rehome_edit(&mut self, dom: &mut Dom) {
        let Some(node_id) = self.edit.as_ref().map(|s| s.node_id.clone()) else {
            return;
        };
        let Some(topic) = self.topic_for_node(dom, &node_id).map(|t| t.el) else {
            tracing::debug!(node_id = %node_id, "edit session lost its topic");
            return;
        };
        let Some(session) = self.edit.as_mut() else {
            return;
        };
        let surface = session.surface;
        session.topic = topic;
        dom.append_child(topic, surface);
        dom.focus(surface);
    }

    fn topic_width(&self, doc: &Document, node_id: &str, text: &str) -> f64 {
        let style = doc.by_id(node_id).and_then(|n| n.style.as_ref());
        let text_style = TextStyle {
            font_family: None,
            font_size: style
                .and_then(|s| s.font_size)
                .unwrap_or(self.options.topic_font_size),
            font_weight: style.and_then(|s| s.font_weight.clone()),
        };
        self.measurer.measure(text, &text_style).width + 2.0 * self.options.topic_padding_x
    }
}

fn patch_primary_text(dom: &mut Dom, topic: DomId, text: &str) {
    let first = dom.first_child(topic);
    match first.and_then(|c| dom.kind(c)) {
        Some(DomNodeKind::Text(_)) => {
            if let Some(first) = first {
                dom.set_text_content(first, text);
            }
        }
        _ => {
            let node = dom.create_text(text);
            dom.prepend_child(topic, node);
        }
    }
}
