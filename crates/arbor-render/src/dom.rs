//! Headless retained element tree.
//!
//! A small DOM-like arena: elements, text nodes and raw markup fragments addressed by [`DomId`].
//! [`Dom::remove`] only detaches a subtree; [`Dom::dispose`] also frees its slots for reuse. Ids
//! carry a generation, so an id whose node has been disposed never aliases a newer node.
//! Operations on ids that do not name a live, suitable node are no-ops.

use indexmap::IndexMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub tag: String,
    pub classes: Vec<String>,
    pub style: IndexMap<String, String>,
    pub attrs: IndexMap<String, String>,
}

#[derive(Debug, Clone)]
pub enum DomNodeKind {
    Element(ElementData),
    /// Plain text; escaped when serialized.
    Text(String),
    /// Markup inserted through [`Dom::set_inner_html`]; serialized verbatim.
    Markup(String),
}

#[derive(Debug, Clone)]
struct DomNode {
    kind: DomNodeKind,
    parent: Option<DomId>,
    children: Vec<DomId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<DomNode>,
}

const VOID_TAGS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

#[derive(Debug, Clone)]
pub struct Dom {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: DomId,
    focused: Option<DomId>,
    selection: Option<DomId>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            slots: Vec::new(),
            free: Vec::new(),
            body: DomId {
                index: 0,
                generation: 0,
            },
            focused: None,
            selection: None,
        };
        dom.body = dom.create_element("body");
        dom
    }

    /// Root of the whole document; unscoped lookups search from here.
    pub fn body(&self) -> DomId {
        self.body
    }

    /// Number of live nodes, attached or not.
    pub fn live_nodes(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots the arena has ever allocated.
    pub fn arena_len(&self) -> usize {
        self.slots.len()
    }

    fn push(&mut self, kind: DomNodeKind) -> DomId {
        let node = DomNode {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                DomId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                DomId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    fn node(&self, id: DomId) -> Option<&DomNode> {
        let slot = self.slots.get(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: DomId) -> Option<&mut DomNode> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub fn is_live(&self, id: DomId) -> bool {
        self.node(id).is_some()
    }

    pub fn create_element(&mut self, tag: &str) -> DomId {
        self.push(DomNodeKind::Element(ElementData {
            tag: tag.to_string(),
            ..Default::default()
        }))
    }

    pub fn create_text(&mut self, text: &str) -> DomId {
        self.push(DomNodeKind::Text(text.to_string()))
    }

    pub fn kind(&self, id: DomId) -> Option<&DomNodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    fn element(&self, id: DomId) -> Option<&ElementData> {
        match self.kind(id)? {
            DomNodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: DomId) -> Option<&mut ElementData> {
        match &mut self.node_mut(id)?.kind {
            DomNodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_element(&self, id: DomId) -> bool {
        self.element(id).is_some()
    }

    pub fn tag(&self, id: DomId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn parent(&self, id: DomId) -> Option<DomId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: DomId) -> &[DomId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, id: DomId) -> Option<DomId> {
        self.children(id).first().copied()
    }

    /// Child elements only, skipping text and markup nodes.
    pub fn child_elements(&self, id: DomId) -> Vec<DomId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    fn is_ancestor_or_self(&self, candidate: DomId, of: DomId) -> bool {
        let mut cur = Some(of);
        while let Some(id) = cur {
            if id == candidate {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    fn can_adopt(&self, parent: DomId, child: DomId) -> bool {
        self.is_element(parent) && self.is_live(child) && !self.is_ancestor_or_self(child, parent)
    }

    /// Appends `child` as the last child of `parent`, moving it out of its current parent.
    pub fn append_child(&mut self, parent: DomId, child: DomId) -> bool {
        if !self.can_adopt(parent, child) {
            return false;
        }
        self.remove(child);
        self.adopt(parent, child, None);
        true
    }

    pub fn prepend_child(&mut self, parent: DomId, child: DomId) -> bool {
        if !self.can_adopt(parent, child) {
            return false;
        }
        self.remove(child);
        self.adopt(parent, child, Some(0));
        true
    }

    fn adopt(&mut self, parent: DomId, child: DomId, at: Option<usize>) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            match at {
                Some(pos) => node.children.insert(pos, child),
                None => node.children.push(child),
            }
        }
    }

    /// Puts `new` at the position `old` occupies and detaches `old`.
    pub fn replace_with(&mut self, old: DomId, new: DomId) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        if old == new || !self.can_adopt(parent, new) {
            return false;
        }
        self.remove(new);
        let Some(pos) = self.children(parent).iter().position(|c| *c == old) else {
            return false;
        };
        self.remove(old);
        self.adopt(parent, new, Some(pos));
        true
    }

    /// Detaches `id` (and its subtree) from its parent.
    pub fn remove(&mut self, id: DomId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        if self.focused.is_some_and(|f| self.is_ancestor_or_self(id, f)) {
            self.focused = None;
        }
        if self.selection.is_some_and(|s| self.is_ancestor_or_self(id, s)) {
            self.selection = None;
        }
    }

    /// Detaches `id` and frees every node of its subtree. Returns how many nodes were freed.
    ///
    /// Ids into the freed subtree go stale. The body cannot be disposed.
    pub fn dispose(&mut self, id: DomId) -> usize {
        if id == self.body || !self.is_live(id) {
            return 0;
        }
        self.remove(id);
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(slot) = self.slots.get_mut(cur.index) else {
                continue;
            };
            if slot.generation != cur.generation {
                continue;
            }
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(cur.index);
            freed += 1;
            if self.focused == Some(cur) {
                self.focused = None;
            }
            if self.selection == Some(cur) {
                self.selection = None;
            }
            stack.extend(node.children);
        }
        freed
    }

    fn clear_children(&mut self, id: DomId) {
        for child in self.children(id).to_vec() {
            self.dispose(child);
        }
    }

    /// Whether `id` is `ancestor` itself or lies inside its subtree.
    pub fn contains(&self, ancestor: DomId, id: DomId) -> bool {
        self.is_live(id) && self.is_ancestor_or_self(ancestor, id)
    }

    pub fn is_attached(&self, id: DomId) -> bool {
        self.contains(self.body, id)
    }

    pub fn set_attr(&mut self, id: DomId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attr(&self, id: DomId, name: &str) -> Option<&str> {
        self.element(id)?.attrs.get(name).map(String::as_str)
    }

    /// Sets one inline style property; an empty value removes it.
    pub fn set_style(&mut self, id: DomId, prop: &str, value: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        if value.is_empty() {
            el.style.shift_remove(prop);
        } else {
            el.style.insert(prop.to_string(), value.to_string());
        }
    }

    pub fn style(&self, id: DomId, prop: &str) -> Option<&str> {
        self.element(id)?.style.get(prop).map(String::as_str)
    }

    pub fn style_text(&self, id: DomId) -> String {
        let Some(el) = self.element(id) else {
            return String::new();
        };
        let mut out = String::new();
        for (prop, value) in &el.style {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "{prop}: {value};");
        }
        out
    }

    pub fn set_class_name(&mut self, id: DomId, class_name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes = class_name.split_whitespace().map(str::to_string).collect();
        }
    }

    pub fn add_class(&mut self, id: DomId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: DomId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    pub fn has_class(&self, id: DomId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    pub fn class_name(&self, id: DomId) -> String {
        self.element(id)
            .map(|el| el.classes.join(" "))
            .unwrap_or_default()
    }

    /// Replaces every child of `id` with a single text node and returns that node.
    ///
    /// The text node is created even for empty text so the element's first child is always its
    /// primary text.
    pub fn set_text_content(&mut self, id: DomId, text: &str) -> Option<DomId> {
        let is_element = matches!(self.kind(id)?, DomNodeKind::Element(_));
        if is_element {
            self.clear_children(id);
            let node = self.create_text(text);
            self.append_child(id, node);
            Some(node)
        } else {
            let node = self.node_mut(id)?;
            node.kind = DomNodeKind::Text(text.to_string());
            Some(id)
        }
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: DomId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: DomId, out: &mut String) {
        match self.kind(id) {
            Some(DomNodeKind::Text(t)) => out.push_str(t),
            Some(DomNodeKind::Markup(m)) => out.push_str(&markup_text(m)),
            Some(DomNodeKind::Element(_)) => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
            None => {}
        }
    }

    /// Replaces every child of `id` with a raw markup fragment.
    ///
    /// The fragment is emitted as-is; callers are responsible for escaping untrusted text.
    pub fn set_inner_html(&mut self, id: DomId, markup: &str) {
        if !self.is_element(id) {
            return;
        }
        self.clear_children(id);
        let node = self.push(DomNodeKind::Markup(markup.to_string()));
        self.append_child(id, node);
    }

    /// First element below `scope` (document order, scope excluded) whose attribute matches.
    pub fn query_by_attr(&self, scope: DomId, name: &str, value: &str) -> Option<DomId> {
        let mut stack: Vec<DomId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.attr(id, name) == Some(value) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        None
    }

    /// Every element below `scope` carrying `class`, in document order.
    pub fn query_all_by_class(&self, scope: DomId, class: &str) -> Vec<DomId> {
        let mut out = Vec::new();
        let mut stack: Vec<DomId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.has_class(id, class) {
                out.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Moves input focus to `id`, returning the previously focused element.
    pub fn focus(&mut self, id: DomId) -> Option<DomId> {
        if !self.is_element(id) {
            return self.focused;
        }
        self.focused.replace(id)
    }

    pub fn focused(&self) -> Option<DomId> {
        self.focused
    }

    pub fn select_contents(&mut self, id: DomId) {
        self.selection = Some(id);
    }

    pub fn selection(&self) -> Option<DomId> {
        self.selection
    }

    pub fn outer_html(&self, id: DomId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    pub fn inner_html(&self, id: DomId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, id: DomId, out: &mut String) {
        match self.kind(id) {
            Some(DomNodeKind::Text(t)) => out.push_str(&htmlize::escape_text(t.as_str())),
            Some(DomNodeKind::Markup(m)) => out.push_str(m),
            Some(DomNodeKind::Element(el)) => {
                out.push('<');
                out.push_str(&el.tag);
                if !el.classes.is_empty() {
                    let _ = write!(
                        out,
                        " class=\"{}\"",
                        htmlize::escape_attribute(el.classes.join(" "))
                    );
                }
                if !el.style.is_empty() {
                    let _ = write!(
                        out,
                        " style=\"{}\"",
                        htmlize::escape_attribute(self.style_text(id))
                    );
                }
                for (name, value) in &el.attrs {
                    let value = htmlize::escape_attribute(value.as_str());
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag.as_str()) {
                    return;
                }
                for child in self.children(id) {
                    self.write_html(*child, out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
            None => {}
        }
    }
}

fn markup_text(markup: &str) -> String {
    let mut stripped = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }
    htmlize::unescape(stripped.as_str()).into_owned()
}
