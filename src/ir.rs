use serde::{Deserialize, Serialize};

use crate::auto_layout::LayoutOverrides;

/// A scene as written on disk: the boxes, the layout passes that position
/// them and the edge groups drawn between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    /// Container size; the configured render size is used when absent.
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub layouts: Vec<LayoutPass>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Fixed size; measured from the text when absent.
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Explicit position for nodes that no layout pass touches.
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl NodeSpec {
    pub fn new(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: Some(title.to_string()),
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// One independent layout call over `nodes`, in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPass {
    pub nodes: Vec<String>,
    #[serde(flatten)]
    pub options: LayoutOverrides,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSpec {
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    pub color: Option<String>,
}
