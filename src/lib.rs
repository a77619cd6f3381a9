pub mod auto_layout;
pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod demo;
pub mod diagram;
pub mod geometry;
pub mod graph;
pub mod ir;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod scene;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;

pub use auto_layout::{LayoutDirection, LayoutOptions, RowPlacer, layout};
pub use canvas::{Canvas, DrawContext, DrawOp, RecordingCanvas, SvgCanvas};
pub use config::{Config, load_config};
pub use diagram::Diagram;
pub use geometry::{NodeBox, NodeId, Point, Size};
pub use graph::{EdgeGroup, EdgeGroupId, EdgeStyle, Graph, GraphError, GraphEvent, GraphOptions};
pub use ir::SceneDocument;
pub use parser::{ParseError, parse_document};
pub use render::{build_overlay, render_svg};
pub use scene::{BoxSource, Scene};
pub use theme::Theme;

/// Lays out and renders a scene document to a complete SVG string.
pub fn render_document(document: &SceneDocument, config: &Config) -> anyhow::Result<String> {
    let diagram = Diagram::from_document(document, config);
    let overlay = build_overlay(&diagram, config.graph.to_options())?;
    Ok(render_svg(&diagram, &overlay, &config.theme, &config.card))
}

/// [`render_document`] for JSON input.
pub fn render_json(input: &str, config: &Config) -> anyhow::Result<String> {
    let document = parse_document(input)?;
    render_document(&document, config)
}
