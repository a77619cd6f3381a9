use crate::auto_layout::{LayoutOptions, LayoutOverrides};
use crate::graph::{EdgeStyle, GraphOptions};
use crate::theme::Theme;
use serde::Deserialize;
use std::path::Path;

/// Sizing of the node cards the measurement step produces.
#[derive(Debug, Clone)]
pub struct CardConfig {
    pub padding_x: f32,
    pub padding_y: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub line_height: f32,
    /// Vertical gap between title and description.
    pub gap: f32,
    pub corner_radius: f32,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            padding_x: 12.0,
            padding_y: 8.0,
            min_width: 120.0,
            max_width: 260.0,
            line_height: 1.35,
            gap: 4.0,
            corner_radius: 6.0,
        }
    }
}

/// Container size used when a scene does not bring its own.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphSettings {
    /// Built-in edge style name, `bezier` or `straight`.
    pub render_edge: String,
    pub draggable_nodes: bool,
    pub resize_with_container: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            render_edge: "bezier".to_string(),
            draggable_nodes: true,
            resize_with_container: true,
        }
    }
}

impl GraphSettings {
    pub fn to_options(&self) -> GraphOptions {
        GraphOptions {
            render_edge: EdgeStyle::from_name(&self.render_edge),
            draggable_nodes: self.draggable_nodes,
            resize_with_container: self.resize_with_container,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutOptions,
    pub graph: GraphSettings,
    pub card: CardConfig,
    pub render: RenderConfig,
    /// Estimate text widths instead of loading system fonts.
    pub fast_text_metrics: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    description_font_size: Option<f32>,
    node_fill: Option<String>,
    node_border: Option<String>,
    title_color: Option<String>,
    text_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GraphSettingsFile {
    render_edge: Option<String>,
    draggable_nodes: Option<bool>,
    resize_with_container: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CardConfigFile {
    padding_x: Option<f32>,
    padding_y: Option<f32>,
    min_width: Option<f32>,
    max_width: Option<f32>,
    line_height: Option<f32>,
    gap: Option<f32>,
    corner_radius: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutOverrides>,
    graph: Option<GraphSettingsFile>,
    card: Option<CardConfigFile>,
    width: Option<f32>,
    height: Option<f32>,
    fast_text_metrics: Option<bool>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme '{theme_name}'"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.description_font_size {
            config.theme.description_font_size = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.title_color {
            config.theme.title_color = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        config.layout = layout.apply(&config.layout);
    }

    if let Some(graph) = parsed.graph {
        if let Some(v) = graph.render_edge {
            config.graph.render_edge = v;
        }
        if let Some(v) = graph.draggable_nodes {
            config.graph.draggable_nodes = v;
        }
        if let Some(v) = graph.resize_with_container {
            config.graph.resize_with_container = v;
        }
    }

    if let Some(card) = parsed.card {
        let target = &mut config.card;
        if let Some(v) = card.padding_x {
            target.padding_x = v;
        }
        if let Some(v) = card.padding_y {
            target.padding_y = v;
        }
        if let Some(v) = card.min_width {
            target.min_width = v;
        }
        if let Some(v) = card.max_width {
            target.max_width = v;
        }
        if let Some(v) = card.line_height {
            target.line_height = v;
        }
        if let Some(v) = card.gap {
            target.gap = v;
        }
        if let Some(v) = card.corner_radius {
            target.corner_radius = v;
        }
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }
    if let Some(v) = parsed.fast_text_metrics {
        config.fast_text_metrics = v;
    }

    Ok(config)
}
