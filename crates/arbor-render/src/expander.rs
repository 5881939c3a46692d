use crate::dom::{Dom, DomId};

pub const EXPANDER_TAG: &str = "me-epd";
const EXPANDED_ATTR: &str = "aria-expanded";
const EXPANDED_CLASS: &str = "minus";

/// The expand/collapse toggle shown next to a topic that has children.
pub struct Expander;

impl Expander {
    /// Builds a control whose flag and class follow `expanded`; `None` counts as expanded.
    pub fn create(dom: &mut Dom, expanded: Option<bool>) -> DomId {
        let el = dom.create_element(EXPANDER_TAG);
        Self::sync(dom, el, expanded != Some(false));
        el
    }

    /// Re-derives flag and class from `expanded` alone.
    pub fn sync(dom: &mut Dom, el: DomId, expanded: bool) {
        dom.set_attr(el, EXPANDED_ATTR, if expanded { "true" } else { "false" });
        if expanded {
            dom.add_class(el, EXPANDED_CLASS);
        } else {
            dom.remove_class(el, EXPANDED_CLASS);
        }
    }

    pub fn is_expander(dom: &Dom, el: DomId) -> bool {
        dom.tag(el) == Some(EXPANDER_TAG)
    }

    pub fn is_expanded(dom: &Dom, el: DomId) -> Option<bool> {
        match dom.attr(el, EXPANDED_ATTR)? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}
