use std::path::Path;

use graph_overlay::{
    Config, Diagram, Graph, GraphEvent, GraphOptions, Point, RecordingCanvas, Scene, Size,
    build_overlay, parse_document, render_json,
};

fn fast_config() -> Config {
    Config {
        fast_text_metrics: true,
        ..Config::default()
    }
}

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

fn diagram(name: &str) -> Diagram {
    let document = parse_document(&load_fixture(name)).expect("parse failed");
    Diagram::from_document(&document, &fast_config())
}

fn position(diagram: &Diagram, key: &str) -> Point {
    let id = diagram.scene.id_of(key).expect("known node");
    diagram.scene.node(id).expect("node").bounds.position
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    for fixture in ["family.json", "wrap.json", "free.json"] {
        let svg = render_json(&load_fixture(fixture), &fast_config()).expect("render failed");
        assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
        assert!(svg.contains("class=\"edges\""), "{fixture}: missing edge overlay");
    }
}

#[test]
fn family_rows_alternate_around_the_center() {
    let diagram = diagram("family.json");
    assert_eq!(position(&diagram, "p2"), Point::new(425.0, 200.0));
    assert_eq!(position(&diagram, "p3"), Point::new(595.0, 200.0));
    assert_eq!(position(&diagram, "self"), Point::new(425.0, 300.0));
    assert_eq!(position(&diagram, "c4"), Point::new(425.0, 400.0));
    assert_eq!(position(&diagram, "c5"), Point::new(595.0, 400.0));
    assert_eq!(position(&diagram, "c6"), Point::new(255.0, 400.0));
}

#[test]
fn family_edges_run_bottom_center_to_top_center() {
    let diagram = diagram("family.json");
    let overlay = build_overlay(&diagram, GraphOptions::default()).expect("overlay");
    let edges = overlay.resolve_edges(&diagram.scene);
    assert_eq!(edges.len(), 5);
    assert_eq!(edges[0].from, Point::new(500.0, 250.0));
    assert_eq!(edges[0].to, Point::new(500.0, 300.0));
    assert_eq!(edges[0].color, "black");
    assert!(edges[2..].iter().all(|edge| edge.color == "#C0392B"));
}

#[test]
fn wrap_fixture_moves_one_row_per_wrap() {
    let diagram = diagram("wrap.json");
    let ys: Vec<f32> = ["a", "b", "c", "d"]
        .iter()
        .map(|key| position(&diagram, key).y)
        .collect();
    assert_eq!(ys, vec![200.0, 260.0, 320.0, 380.0]);
    assert_eq!(position(&diagram, "d").x, -100.0);
}

#[test]
fn free_fixture_escapes_titles() {
    let svg = render_json(&load_fixture("free.json"), &fast_config()).expect("render failed");
    assert!(svg.contains("Top &amp; &lt;co&gt;"));
}

#[test]
fn dragging_a_registered_node_redraws_from_its_new_position() {
    let mut scene = Scene::new(Size::new(600.0, 400.0));
    let source = scene.add_node("source", "Source", "", Size::new(100.0, 40.0));
    let target = scene.add_node("target", "Target", "", Size::new(100.0, 40.0));
    scene.move_node(target, Point::new(250.0, 300.0));

    let mut graph = Graph::new(
        RecordingCanvas::new(scene.container()),
        GraphOptions::default(),
        &scene,
    )
    .expect("context");
    graph.add_node(source);
    graph.add_edge(&scene, [source], [target], None);
    assert_eq!(graph.canvas().move_targets()[0], Point::new(50.0, 40.0));

    scene.move_node(source, Point::new(400.0, 20.0));
    assert!(graph.handle_event(GraphEvent::Drag(source), &scene));
    assert_eq!(graph.canvas().move_targets()[0], Point::new(450.0, 60.0));

    // The target was never registered as a node.
    scene.move_node(target, Point::new(0.0, 0.0));
    assert!(!graph.handle_event(GraphEvent::DragStop(target), &scene));
    assert_eq!(graph.canvas().move_targets()[0], Point::new(450.0, 60.0));
}

#[test]
fn bad_documents_are_rejected() {
    let err = render_json(r#"{ "nodes": [], "layouts": [{ "nodes": ["ghost"] }] }"#, &fast_config())
        .unwrap_err();
    assert!(err.to_string().contains("ghost"));
}
