use crate::MindMap;
use crate::dom::{Dom, DomId};
use crate::topic::{NODE_ID_ATTR, node_id_tag};

/// Finds the topic rendered for `node_id`.
///
/// Searches the instance's container when `scope` is given, the whole document otherwise. A miss
/// is an ordinary outcome ("not rendered right now") and is reported as `None`.
pub fn find_ele(dom: &Dom, node_id: &str, scope: Option<&MindMap>) -> Option<DomId> {
    let root = scope.map_or_else(|| dom.body(), MindMap::container);
    let found = dom.query_by_attr(root, NODE_ID_ATTR, &node_id_tag(node_id));
    if found.is_none() {
        tracing::warn!(node_id, "find_ele: node not found");
    }
    found
}
