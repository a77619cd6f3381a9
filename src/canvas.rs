use std::f32::consts::TAU;
use std::fmt::Write as _;

use crate::geometry::{Point, Size};

pub trait DrawContext {
    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32);
    /// Angles in radians, measured clockwise from the positive x axis (y grows down).
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32, anticlockwise: bool);
    fn set_line_width(&mut self, width: f32);
    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn stroke(&mut self);
    fn fill(&mut self);
}

pub trait Canvas {
    fn container_size(&self) -> Size;
    fn size(&self) -> Size;
    /// Sets the bitmap size; like an HTML canvas this discards what was drawn.
    fn resize(&mut self, size: Size);
    /// The drawing context, or `None` when the surface cannot provide one.
    fn context(&mut self) -> Option<&mut dyn DrawContext>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginPath,
    ClosePath,
    MoveTo(Point),
    LineTo(Point),
    BezierCurveTo(Point, Point, Point),
    Arc {
        center: Point,
        radius: f32,
        start: f32,
        end: f32,
        anticlockwise: bool,
    },
    LineWidth(f32),
    StrokeStyle(String),
    FillStyle(String),
    Stroke,
    Fill,
}

/// Keeps every call as a [`DrawOp`]. Useful for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    container: Size,
    size: Size,
    ops: Vec<DrawOp>,
    resizes: usize,
    detached: bool,
}

impl RecordingCanvas {
    pub fn new(container: Size) -> Self {
        Self {
            container,
            ..Self::default()
        }
    }

    /// A surface whose context can never be acquired.
    pub fn detached(container: Size) -> Self {
        Self {
            container,
            detached: true,
            ..Self::default()
        }
    }

    pub fn set_container_size(&mut self, container: Size) {
        self.container = container;
    }

    /// Simulates a surface losing (or regaining) its context.
    pub fn set_detached(&mut self, detached: bool) {
        self.detached = detached;
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    pub fn stroke_count(&self) -> usize {
        self.ops.iter().filter(|op| **op == DrawOp::Stroke).count()
    }

    /// Start points of every subpath, in drawing order.
    pub fn move_targets(&self) -> Vec<Point> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::MoveTo(point) => Some(*point),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn container_size(&self) -> Size {
        self.container
    }

    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.ops.clear();
        self.resizes += 1;
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        if self.detached {
            return None;
        }
        Some(self)
    }
}

impl DrawContext for RecordingCanvas {
    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::MoveTo(Point::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::LineTo(Point::new(x, y)));
    }

    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        self.ops.push(DrawOp::BezierCurveTo(
            Point::new(cp1x, cp1y),
            Point::new(cp2x, cp2y),
            Point::new(x, y),
        ));
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32, anticlockwise: bool) {
        self.ops.push(DrawOp::Arc {
            center: Point::new(x, y),
            radius,
            start,
            end,
            anticlockwise,
        });
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(DrawOp::StrokeStyle(color.to_string()));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(DrawOp::FillStyle(color.to_string()));
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }
}

/// Serialises strokes and fills into SVG `<path>` elements.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    container: Size,
    size: Size,
    path: String,
    line_width: f32,
    stroke_style: String,
    fill_style: String,
    elements: Vec<String>,
}

impl SvgCanvas {
    pub fn new(container: Size) -> Self {
        Self {
            container,
            size: Size::default(),
            path: String::new(),
            line_width: 1.0,
            stroke_style: "black".to_string(),
            fill_style: "black".to_string(),
            elements: Vec::new(),
        }
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// The drawn content as a group, to be embedded in a larger document.
    pub fn to_svg_group(&self) -> String {
        let mut out = String::from("<g class=\"edges\">");
        for element in &self.elements {
            out.push_str(element);
        }
        out.push_str("</g>");
        out
    }

    fn push_command(&mut self, command: char, points: &[(f32, f32)]) {
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        self.path.push(command);
        for (x, y) in points {
            let _ = write!(self.path, " {x:.2} {y:.2}");
        }
    }
}

impl Canvas for SvgCanvas {
    fn container_size(&self) -> Size {
        self.container
    }

    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.path.clear();
        self.elements.clear();
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        Some(self)
    }
}

impl DrawContext for SvgCanvas {
    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn close_path(&mut self) {
        if !self.path.is_empty() {
            self.path.push_str(" Z");
        }
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.push_command('M', &[(x, y)]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let command = if self.path.is_empty() { 'M' } else { 'L' };
        self.push_command(command, &[(x, y)]);
    }

    fn bezier_curve_to(&mut self, cp1x: f32, cp1y: f32, cp2x: f32, cp2y: f32, x: f32, y: f32) {
        if self.path.is_empty() {
            self.push_command('M', &[(cp1x, cp1y)]);
        }
        self.push_command('C', &[(cp1x, cp1y), (cp2x, cp2y), (x, y)]);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32, anticlockwise: bool) {
        if radius <= 0.0 {
            return;
        }
        let point_at = |angle: f32| (x + radius * angle.cos(), y + radius * angle.sin());
        let from = point_at(start);
        let join = if self.path.is_empty() { 'M' } else { 'L' };
        self.push_command(join, &[from]);

        let sweep = if anticlockwise { 0 } else { 1 };
        let span = if anticlockwise { start - end } else { end - start };
        if span.abs() >= TAU {
            // SVG cannot express a closed arc in one segment.
            let opposite = point_at(start + std::f32::consts::PI);
            let _ = write!(
                self.path,
                " A {radius:.2} {radius:.2} 0 0 {sweep} {:.2} {:.2} A {radius:.2} {radius:.2} 0 0 {sweep} {:.2} {:.2}",
                opposite.0, opposite.1, from.0, from.1
            );
            return;
        }
        let span = span.rem_euclid(TAU);
        let large = if span > std::f32::consts::PI { 1 } else { 0 };
        let to = point_at(end);
        let _ = write!(
            self.path,
            " A {radius:.2} {radius:.2} 0 {large} {sweep} {:.2} {:.2}",
            to.0, to.1
        );
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.stroke_style = color.to_string();
    }

    fn set_fill_style(&mut self, color: &str) {
        self.fill_style = color.to_string();
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            self.path,
            escape_attr(&self.stroke_style),
            self.line_width
        ));
    }

    fn fill(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            "<path d=\"{}\" fill=\"{}\" stroke=\"none\"/>",
            self.path,
            escape_attr(&self.fill_style)
        ));
    }
}

pub(crate) fn escape_attr(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_discards_recorded_ops() {
        let mut canvas = RecordingCanvas::new(Size::new(100.0, 100.0));
        canvas.move_to(1.0, 2.0);
        canvas.stroke();
        canvas.resize(Size::new(50.0, 50.0));
        assert!(canvas.ops().is_empty());
        assert_eq!(canvas.size(), Size::new(50.0, 50.0));
        assert_eq!(canvas.resize_count(), 1);
    }

    #[test]
    fn detached_surface_has_no_context() {
        let mut canvas = RecordingCanvas::detached(Size::new(10.0, 10.0));
        assert!(canvas.context().is_none());
    }

    #[test]
    fn svg_stroke_emits_path() {
        let mut canvas = SvgCanvas::new(Size::new(200.0, 200.0));
        canvas.resize(Size::new(200.0, 200.0));
        canvas.begin_path();
        canvas.move_to(10.0, 10.0);
        canvas.line_to(20.0, 30.0);
        canvas.set_stroke_style("red");
        canvas.stroke();
        assert_eq!(canvas.elements().len(), 1);
        assert_eq!(
            canvas.elements()[0],
            "<path d=\"M 10.00 10.00 L 20.00 30.00\" fill=\"none\" stroke=\"red\" stroke-width=\"1\"/>"
        );
        assert!(canvas.to_svg_group().starts_with("<g class=\"edges\"><path"));
    }

    #[test]
    fn svg_full_circle_uses_two_arcs() {
        let mut canvas = SvgCanvas::new(Size::new(20.0, 20.0));
        canvas.begin_path();
        canvas.arc(10.0, 10.0, 4.0, 0.0, TAU, true);
        canvas.close_path();
        canvas.fill();
        let element = &canvas.elements()[0];
        assert_eq!(element.matches(" A ").count(), 2);
        assert!(element.contains("M 14.00 10.00"));
    }

    #[test]
    fn svg_skips_empty_paths() {
        let mut canvas = SvgCanvas::new(Size::new(20.0, 20.0));
        canvas.begin_path();
        canvas.stroke();
        canvas.fill();
        assert!(canvas.elements().is_empty());
    }
}
