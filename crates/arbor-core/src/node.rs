use serde::{Deserialize, Serialize};

/// Inline style overrides carried by a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

/// Image attached to a node.
///
/// All three fields are optional on the wire so that incomplete images can be decoded and then
/// rejected at render time instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// A fully specified image: non-empty url and non-zero dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSpec<'a> {
    pub url: &'a str,
    pub width: f64,
    pub height: f64,
}

impl NodeImage {
    /// Returns the image only when url, width and height are all present and truthy.
    pub fn complete(&self) -> Option<ImageSpec<'_>> {
        let url = self.url.as_deref().filter(|u| !u.is_empty())?;
        let width = self.width.filter(|w| is_truthy(*w))?;
        let height = self.height.filter(|h| is_truthy(*h))?;
        Some(ImageSpec { url, width, height })
    }
}

fn is_truthy(v: f64) -> bool {
    v != 0.0 && !v.is_nan()
}

/// One node's own fields, without its subtree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<NodeImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyper_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_color: Option<String>,
    /// `None` and `Some(true)` both mean expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

impl NodeData {
    pub fn new(id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            ..Default::default()
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded != Some(false)
    }

    pub fn hyper_link(&self) -> Option<&str> {
        self.hyper_link.as_deref().filter(|s| !s.is_empty())
    }

    pub fn branch_color(&self) -> Option<&str> {
        self.branch_color.as_deref().filter(|s| !s.is_empty())
    }
}

/// Nested node record, the shape mind-map documents are exchanged in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            data: NodeData::new(id, topic),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_expanded(mut self, expanded: Option<bool>) -> Self {
        self.data.expanded = expanded;
        self
    }
}
