use crate::canvas::{escape_attr, SvgCanvas};
use crate::config::CardConfig;
use crate::diagram::Diagram;
use crate::graph::{Graph, GraphError, GraphOptions};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Builds the edge overlay for `diagram`: every node registered, every edge
/// group added in document order.
pub fn build_overlay(diagram: &Diagram, options: GraphOptions) -> Result<Graph<SvgCanvas>, GraphError> {
    let scene = &diagram.scene;
    let canvas = SvgCanvas::new(scene.container());
    let mut graph = Graph::new(canvas, options, scene)?;
    graph.add_nodes(scene.ids());
    for edge in &diagram.edges {
        graph.add_edge(
            scene,
            edge.sources.iter().copied(),
            edge.targets.iter().copied(),
            edge.color.as_deref(),
        );
    }
    Ok(graph)
}

/// Node cards with the overlay drawn over them.
pub fn render_svg(diagram: &Diagram, overlay: &Graph<SvgCanvas>, theme: &Theme, card: &CardConfig) -> String {
    let size = diagram.scene.container();
    let width = size.width.max(1.0);
    let height = size.height.max(1.0);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_attr(&theme.background)
    ));

    for node in diagram.scene.nodes() {
        let bounds = &node.bounds;
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
            bounds.position.x,
            bounds.position.y,
            bounds.width,
            bounds.height,
            escape_attr(&theme.node_fill),
            escape_attr(&theme.node_border),
            r = card.corner_radius,
        ));

        let text_x = bounds.position.x + card.padding_x;
        let title_y = bounds.position.y + card.padding_y + theme.font_size;
        svg.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{title_y:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            escape_attr(&theme.font_family),
            theme.font_size,
            escape_attr(&theme.title_color),
            escape_xml(&node.title)
        ));
        if !node.description.is_empty() {
            let description_y = title_y
                + theme.font_size * (card.line_height - 1.0)
                + card.gap
                + theme.description_font_size;
            svg.push_str(&format!(
                "<text x=\"{text_x:.2}\" y=\"{description_y:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                escape_attr(&theme.font_family),
                theme.description_font_size,
                escape_attr(&theme.text_color),
                escape_xml(&node.description)
            ));
        }
    }

    svg.push_str(&overlay.canvas().to_svg_group());
    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = theme.font_family.split(',').next() {
        opt.font_family = family.trim().trim_matches('"').to_string();
    }
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::demo::demo_document;

    fn demo_config() -> Config {
        Config {
            fast_text_metrics: true,
            ..Config::default()
        }
    }

    #[test]
    fn render_svg_basic() {
        let config = demo_config();
        let diagram = Diagram::from_document(&demo_document(), &config);
        let overlay = build_overlay(&diagram, config.graph.to_options()).unwrap();
        let svg = render_svg(&diagram, &overlay, &config.theme, &config.card);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Self 1"));
        assert!(svg.contains("Child 15"));
        assert!(svg.contains("<g class=\"edges\">"));
    }

    #[test]
    fn overlay_has_one_curve_and_knob_per_edge() {
        let config = demo_config();
        let diagram = Diagram::from_document(&demo_document(), &config);
        let overlay = build_overlay(&diagram, config.graph.to_options()).unwrap();
        assert_eq!(overlay.edge_groups().len(), 2);
        // 2 parent edges + 12 child edges; each bezier strokes the curve and
        // the knob and fills the knob.
        assert_eq!(overlay.canvas().elements().len(), 14 * 3);
        assert!(overlay.is_node(diagram.scene.id_of("child-9").unwrap()));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape_xml("a < b & c"), "a &lt; b &amp; c");
    }
}
