use tracing::debug;

use crate::config::Config;
use crate::geometry::{NodeId, Point, Size};
use crate::ir::{NodeSpec, SceneDocument};
use crate::scene::Scene;
use crate::text_metrics::text_width;

/// An edge group with its endpoints resolved to scene ids.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramEdge {
    pub sources: Vec<NodeId>,
    pub targets: Vec<NodeId>,
    pub color: Option<String>,
}

/// A measured and laid out scene, ready to be handed to a renderer.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub scene: Scene,
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    /// Measures every node, then runs the document's layout passes in order.
    /// Ids are assumed valid (see [`crate::parser::validate_document`]);
    /// unknown ones are skipped.
    pub fn from_document(document: &SceneDocument, config: &Config) -> Self {
        let container = Size::new(
            document.width.unwrap_or(config.render.width),
            document.height.unwrap_or(config.render.height),
        );
        let mut scene = Scene::new(container);

        for spec in &document.nodes {
            let size = measure_card(spec, config);
            let id = scene.add_node(&spec.id, spec.title(), spec.description.as_str(), size);
            if spec.x.is_some() || spec.y.is_some() {
                scene.move_node(id, Point::new(spec.x.unwrap_or(0.0), spec.y.unwrap_or(0.0)));
            }
        }

        for pass in &document.layouts {
            let ids: Vec<NodeId> = pass.nodes.iter().filter_map(|key| scene.id_of(key)).collect();
            let options = pass.options.apply(&config.layout);
            debug!(nodes = ids.len(), start_row = options.start_row, "layout pass");
            scene.layout_nodes(&ids, &options);
        }

        let resolve = |keys: &[String]| -> Vec<NodeId> {
            keys.iter().filter_map(|key| scene.id_of(key)).collect()
        };
        let edges = document
            .edges
            .iter()
            .map(|edge| DiagramEdge {
                sources: resolve(&edge.sources),
                targets: resolve(&edge.targets),
                color: edge.color.clone(),
            })
            .collect();

        Self { scene, edges }
    }
}

/// Card size for a node: explicit dimensions win, otherwise the title and
/// description are measured and padded, clamped to the configured widths.
pub fn measure_card(spec: &NodeSpec, config: &Config) -> Size {
    let theme = &config.theme;
    let card = &config.card;
    let fast = config.fast_text_metrics;
    let title_height = theme.font_size * card.line_height;
    let description_height = if spec.description.is_empty() {
        0.0
    } else {
        card.gap + theme.description_font_size * card.line_height
    };

    let width = spec.width.unwrap_or_else(|| {
        let title = text_width(spec.title(), theme.font_size, &theme.font_family, fast);
        let description = text_width(
            &spec.description,
            theme.description_font_size,
            &theme.font_family,
            fast,
        );
        let max_width = card.max_width.max(card.min_width);
        (title.max(description) + 2.0 * card.padding_x).clamp(card.min_width, max_width)
    });
    let height = spec
        .height
        .unwrap_or(2.0 * card.padding_y + title_height + description_height);

    Size::new(width, height)
}
