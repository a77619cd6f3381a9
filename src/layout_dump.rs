use crate::canvas::Canvas;
use crate::geometry::NodeId;
use crate::graph::Graph;
use crate::scene::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub title: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub registered: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub group: usize,
    pub from: String,
    pub to: String,
    pub color: String,
    pub start: [f32; 2],
    pub end: [f32; 2],
}

impl LayoutDump {
    pub fn from_graph<C: Canvas>(scene: &Scene, graph: &Graph<C>) -> Self {
        let nodes = scene
            .nodes()
            .map(|node| NodeDump {
                id: node.key.clone(),
                title: node.title.clone(),
                x: node.bounds.position.x,
                y: node.bounds.position.y,
                width: node.bounds.width,
                height: node.bounds.height,
                registered: graph.is_node(node.id),
            })
            .collect();

        let key = |id: NodeId| {
            scene
                .node(id)
                .map(|node| node.key.clone())
                .unwrap_or_else(|| id.to_string())
        };
        let edges = graph
            .resolve_edges(scene)
            .into_iter()
            .map(|edge| EdgeDump {
                group: edge.group.0,
                from: key(edge.source),
                to: key(edge.target),
                color: edge.color,
                start: [edge.from.x, edge.from.y],
                end: [edge.to.x, edge.to.y],
            })
            .collect();

        let container = scene.container();
        LayoutDump {
            width: container.width,
            height: container.height,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump<C: Canvas>(path: &Path, scene: &Scene, graph: &Graph<C>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_graph(scene, graph);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::geometry::{Point, Size};
    use crate::graph::GraphOptions;

    #[test]
    fn dump_lists_anchors_by_node_key() {
        let mut scene = Scene::new(Size::new(400.0, 400.0));
        let a = scene.add_node("a", "A", "", Size::new(100.0, 40.0));
        let b = scene.add_node("b", "B", "", Size::new(100.0, 40.0));
        scene.move_node(b, Point::new(0.0, 200.0));
        let mut graph = Graph::new(
            RecordingCanvas::new(scene.container()),
            GraphOptions::default(),
            &scene,
        )
        .unwrap();
        graph.add_node(a);
        graph.add_edge(&scene, [a], [b], Some("red"));

        let dump = LayoutDump::from_graph(&scene, &graph);
        assert!(dump.nodes[0].registered);
        assert!(!dump.nodes[1].registered);
        assert_eq!(dump.edges.len(), 1);
        assert_eq!(dump.edges[0].from, "a");
        assert_eq!(dump.edges[0].start, [50.0, 40.0]);
        assert_eq!(dump.edges[0].end, [50.0, 200.0]);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["edges"][0]["color"], "red");
    }
}
