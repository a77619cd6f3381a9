use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use graph_overlay::config::Config;
use graph_overlay::demo::demo_document;
use graph_overlay::diagram::Diagram;
use graph_overlay::geometry::{NodeBox, NodeId, Size};
use graph_overlay::graph::{EdgeStyle, Graph, GraphOptions};
use graph_overlay::canvas::RecordingCanvas;
use graph_overlay::render::{build_overlay, render_svg};
use graph_overlay::{LayoutOptions, layout};
use std::hint::black_box;

fn boxes(count: usize) -> Vec<NodeBox> {
    (0..count)
        .map(|i| NodeBox::new(60.0 + (i % 7) as f32 * 15.0, 40.0))
        .collect()
}

fn fast_config() -> Config {
    Config {
        fast_text_metrics: true,
        ..Config::default()
    }
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for count in [16usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut nodes = boxes(count);
            b.iter(|| {
                layout(&mut nodes, Size::new(1600.0, 900.0), &LayoutOptions::default());
                black_box(&nodes);
            });
        });
    }
    group.finish();
}

fn bench_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");
    for (name, style) in [("bezier", EdgeStyle::Bezier), ("straight", EdgeStyle::Straight)] {
        group.bench_function(BenchmarkId::new("fan_out_64x64", name), |b| {
            let mut nodes = boxes(128);
            layout(&mut nodes, Size::new(1600.0, 900.0), &LayoutOptions::default());
            let options = GraphOptions {
                render_edge: style.clone(),
                ..GraphOptions::default()
            };
            let mut graph = Graph::new(RecordingCanvas::new(Size::new(1600.0, 900.0)), options, &nodes)
                .expect("recording canvas has a context");
            graph.add_edge(&nodes, (0..64).map(NodeId), (64..128).map(NodeId), None);
            b.iter(|| black_box(graph.render(&nodes)));
        });
    }
    group.finish();
}

fn bench_demo(c: &mut Criterion) {
    let config = fast_config();
    let document = demo_document();
    c.bench_function("demo_end_to_end", |b| {
        b.iter(|| {
            let diagram = Diagram::from_document(black_box(&document), &config);
            let overlay = build_overlay(&diagram, config.graph.to_options()).expect("overlay");
            black_box(render_svg(&diagram, &overlay, &config.theme, &config.card))
        });
    });
}

criterion_group!(benches, bench_layout, bench_overlay, bench_demo);
criterion_main!(benches);
