use graph_overlay::demo::demo_document;
use graph_overlay::{Config, Theme, render_document, render_json};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverlayRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    edge_style: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    fast_text: Option<bool>,
}

fn build_config(options: OverlayRenderOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        config.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    if let Some(edge_style) = options.edge_style {
        config.graph.render_edge = edge_style;
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    // System fonts are not reachable from the browser sandbox.
    config.fast_text_metrics = options.fast_text.unwrap_or(true);
    config
}

fn parse_options(options_json: Option<String>) -> Result<OverlayRenderOptions, JsValue> {
    match options_json {
        Some(raw_options) => serde_json::from_str::<OverlayRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(OverlayRenderOptions::default()),
    }
}

#[wasm_bindgen]
pub fn render_scene_svg(scene_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    render_json(scene_json, &config).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn render_demo_svg(options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    render_document(&demo_document(), &config).map_err(|error| JsValue::from_str(&error.to_string()))
}
