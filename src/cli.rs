use crate::config::{Config, load_config};
use crate::demo::demo_document;
use crate::diagram::Diagram;
use crate::graph::EdgeStyle;
use crate::ir::SceneDocument;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_document;
use crate::render::{build_overlay, render_svg, write_output_png, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gro", version, about = "Lay out boxed nodes and draw directed edges between them")]
pub struct Args {
    /// Scene document (.json) or '-' for stdin. Renders the built-in demo if omitted.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, layout defaults, edge style)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Container width for scenes that do not set one
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Container height for scenes that do not set one
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Edge style, overriding the config file
    #[arg(long = "edgeStyle", value_enum)]
    pub edge_style: Option<EdgeStyleArg>,

    /// Write resolved node positions and edge anchors as JSON
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum EdgeStyleArg {
    Bezier,
    Straight,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    let document = read_document(args.input.as_deref())?;

    let diagram = Diagram::from_document(&document, &config);
    let mut options = config.graph.to_options();
    if let Some(style) = args.edge_style {
        options.render_edge = match style {
            EdgeStyleArg::Bezier => EdgeStyle::Bezier,
            EdgeStyleArg::Straight => EdgeStyle::Straight,
        };
    }
    let overlay = build_overlay(&diagram, options)?;
    info!(
        nodes = diagram.scene.len(),
        groups = overlay.edge_groups().len(),
        "scene rendered"
    );
    let svg = render_svg(&diagram, &overlay, &config.theme, &config.card);

    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.theme)?;
        }
    }

    if let Some(path) = args.dump.as_deref() {
        write_layout_dump(path, &diagram.scene, &overlay)?;
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    Ok(config)
}

fn read_document(path: Option<&Path>) -> Result<SceneDocument> {
    let Some(path) = path else {
        return Ok(demo_document());
    };
    let input = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(parse_document(&input)?)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}
