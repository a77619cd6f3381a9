use std::collections::HashMap;

use crate::auto_layout::{LayoutOptions, RowPlacer};
use crate::geometry::{NodeBox, NodeId, Point, Size};

/// Read access to current box geometry. Renderers resolve anchors through this
/// on every pass instead of keeping their own copy.
pub trait BoxSource {
    fn node_box(&self, id: NodeId) -> Option<&NodeBox>;
}

impl BoxSource for [NodeBox] {
    fn node_box(&self, id: NodeId) -> Option<&NodeBox> {
        self.get(id.0)
    }
}

impl BoxSource for Vec<NodeBox> {
    fn node_box(&self, id: NodeId) -> Option<&NodeBox> {
        self.get(id.0)
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub key: String,
    pub title: String,
    pub description: String,
    pub bounds: NodeBox,
}

/// The positioning container: its size plus every measured box inside it.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    container: Size,
    nodes: Vec<SceneNode>,
    index: HashMap<String, NodeId>,
}

impl Scene {
    pub fn new(container: Size) -> Self {
        Self {
            container,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn container(&self) -> Size {
        self.container
    }

    /// Adds a box, or replaces the contents of the box already stored under `key`.
    pub fn add_node(
        &mut self,
        key: &str,
        title: impl Into<String>,
        description: impl Into<String>,
        size: Size,
    ) -> NodeId {
        let bounds = NodeBox::new(size.width, size.height);
        if let Some(&id) = self.index.get(key) {
            let node = &mut self.nodes[id.0];
            node.title = title.into();
            node.description = description.into();
            node.bounds = bounds;
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            id,
            key: key.to_string(),
            title: title.into(),
            description: description.into(),
            bounds,
        });
        self.index.insert(key.to_string(), id);
        id
    }

    pub fn id_of(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|node| node.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Repositions a box, e.g. from a drag handler. Returns false for unknown ids.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.bounds.position = position;
                true
            }
            None => false,
        }
    }

    /// Runs one layout pass over `ids`, in the given order, inside the container.
    pub fn layout_nodes(&mut self, ids: &[NodeId], options: &LayoutOptions) {
        let mut placer = RowPlacer::new(self.container, options);
        for id in ids {
            if let Some(node) = self.nodes.get_mut(id.0) {
                node.bounds.position = placer.place(node.bounds.width);
            }
        }
    }
}

impl BoxSource for Scene {
    fn node_box(&self, id: NodeId) -> Option<&NodeBox> {
        self.nodes.get(id.0).map(|node| &node.bounds)
    }
}
