use std::collections::BTreeSet;
use std::f32::consts::TAU;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::canvas::{Canvas, DrawContext};
use crate::geometry::{NodeBox, NodeId, Point};
use crate::scene::BoxSource;

pub const DEFAULT_EDGE_COLOR: &str = "black";
/// Vertical distance of both bezier control points from their anchors.
pub const BEZIER_CONTROL_OFFSET: f32 = 100.0;
pub const KNOB_RADIUS: f32 = 4.0;
pub const EDGE_LINE_WIDTH: f32 = 1.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("drawing context is unavailable")]
    ContextUnavailable,
}

pub type EdgeRenderFn = dyn Fn(&mut dyn DrawContext, Point, Point, &str) + Send + Sync;

/// How a single edge is drawn between its two anchors.
#[derive(Clone, Default)]
pub enum EdgeStyle {
    Straight,
    #[default]
    Bezier,
    Custom(Arc<EdgeRenderFn>),
}

impl EdgeStyle {
    pub fn custom<F>(draw: F) -> Self
    where
        F: Fn(&mut dyn DrawContext, Point, Point, &str) + Send + Sync + 'static,
    {
        EdgeStyle::Custom(Arc::new(draw))
    }

    /// Looks a built-in style up by name. Anything but `bezier` draws straight.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bezier" => EdgeStyle::Bezier,
            _ => EdgeStyle::Straight,
        }
    }

    pub fn draw(&self, ctx: &mut dyn DrawContext, from: Point, to: Point, color: &str) {
        match self {
            EdgeStyle::Straight => draw_straight(ctx, from, to, color),
            EdgeStyle::Bezier => draw_bezier(ctx, from, to, color),
            EdgeStyle::Custom(draw) => draw(ctx, from, to, color),
        }
    }
}

impl fmt::Debug for EdgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeStyle::Straight => f.write_str("Straight"),
            EdgeStyle::Bezier => f.write_str("Bezier"),
            EdgeStyle::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn draw_straight(ctx: &mut dyn DrawContext, from: Point, to: Point, color: &str) {
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.set_line_width(EDGE_LINE_WIDTH);
    ctx.set_stroke_style(color);
    ctx.stroke();
}

fn draw_bezier(ctx: &mut dyn DrawContext, from: Point, to: Point, color: &str) {
    let cp1 = from.offset(0.0, BEZIER_CONTROL_OFFSET);
    let cp2 = to.offset(0.0, -BEZIER_CONTROL_OFFSET);

    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.bezier_curve_to(cp1.x, cp1.y, cp2.x, cp2.y, to.x, to.y);
    ctx.set_line_width(EDGE_LINE_WIDTH);
    ctx.set_stroke_style(color);
    ctx.stroke();

    // knob marking the target end
    ctx.begin_path();
    ctx.arc(to.x, to.y, KNOB_RADIUS, 0.0, TAU, true);
    ctx.close_path();
    ctx.set_stroke_style(color);
    ctx.stroke();
    ctx.set_fill_style(color);
    ctx.fill();
}

/// Start and end anchors for an edge from `source` to `target`.
pub fn edge_anchors(source: &NodeBox, target: &NodeBox) -> (Point, Point) {
    (source.bottom_center(), target.top_center())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeGroupId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGroup {
    sources: Vec<NodeId>,
    targets: Vec<NodeId>,
    color: String,
}

impl EdgeGroup {
    pub fn new(
        sources: impl IntoIterator<Item = NodeId>,
        targets: impl IntoIterator<Item = NodeId>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            sources: dedup(sources),
            targets: dedup(targets),
            color: color.into(),
        }
    }

    pub fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn edge_count(&self) -> usize {
        self.sources.len() * self.targets.len()
    }

    /// Every (source, target) pair, sources outermost.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.sources
            .iter()
            .flat_map(move |source| self.targets.iter().map(move |target| (*source, *target)))
    }
}

fn dedup(ids: impl IntoIterator<Item = NodeId>) -> Vec<NodeId> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// An edge with both anchors resolved against current box positions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEdge {
    pub group: EdgeGroupId,
    pub source: NodeId,
    pub target: NodeId,
    pub from: Point,
    pub to: Point,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub groups: usize,
    pub edges: usize,
}

/// Host notifications that may cause a re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    Resize,
    Scroll,
    Drag(NodeId),
    DragStop(NodeId),
}

#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub render_edge: EdgeStyle,
    /// Re-render while registered nodes are dragged.
    pub draggable_nodes: bool,
    /// Re-render when the container is resized or scrolled.
    pub resize_with_container: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            render_edge: EdgeStyle::Bezier,
            draggable_nodes: true,
            resize_with_container: true,
        }
    }
}

type RenderListener = Box<dyn FnMut(&RenderStats)>;

pub struct Graph<C: Canvas> {
    options: GraphOptions,
    canvas: C,
    edge_groups: Vec<EdgeGroup>,
    nodes: BTreeSet<NodeId>,
    listeners: Vec<RenderListener>,
}

impl<C: Canvas> Graph<C> {
    /// Takes ownership of `canvas` and renders the (empty) graph once.
    ///
    /// Fails if the surface cannot hand out a drawing context; later passes
    /// treat a missing context as nothing to draw.
    pub fn new<B>(mut canvas: C, options: GraphOptions, boxes: &B) -> Result<Self, GraphError>
    where
        B: BoxSource + ?Sized,
    {
        if canvas.context().is_none() {
            return Err(GraphError::ContextUnavailable);
        }
        let mut graph = Self {
            options,
            canvas,
            edge_groups: Vec::new(),
            nodes: BTreeSet::new(),
            listeners: Vec::new(),
        };
        graph.render(boxes);
        Ok(graph)
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Registers a node so drag events on it re-render the graph.
    /// Returns false if it was already registered.
    pub fn add_node(&mut self, id: NodeId) -> bool {
        self.nodes.insert(id)
    }

    pub fn add_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.nodes.extend(ids);
    }

    pub fn is_node(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Appends a group connecting every source to every target and draws just
    /// that group on top of what is already on the surface.
    pub fn add_edge<B>(
        &mut self,
        boxes: &B,
        sources: impl IntoIterator<Item = NodeId>,
        targets: impl IntoIterator<Item = NodeId>,
        color: Option<&str>,
    ) -> EdgeGroupId
    where
        B: BoxSource + ?Sized,
    {
        let group = EdgeGroup::new(sources, targets, color.unwrap_or(DEFAULT_EDGE_COLOR));
        let id = EdgeGroupId(self.edge_groups.len());
        self.edge_groups.push(group);
        let drawn = self.render_group(id, boxes);
        debug!(group = id.0, edges = drawn, "edge group added");
        id
    }

    /// Forgets every edge group. The surface keeps its pixels until the next
    /// full render.
    pub fn clear_edges(&mut self) {
        self.edge_groups.clear();
    }

    pub fn edge_groups(&self) -> &[EdgeGroup] {
        &self.edge_groups
    }

    /// Resizes the surface to its container and redraws every group in
    /// insertion order.
    pub fn render<B>(&mut self, boxes: &B) -> RenderStats
    where
        B: BoxSource + ?Sized,
    {
        let size = self.canvas.container_size();
        self.canvas.resize(size);
        let mut stats = RenderStats {
            groups: 0,
            edges: 0,
        };
        if size.is_empty() {
            debug!(width = size.width, height = size.height, "empty surface, nothing to draw");
        } else if self.canvas.context().is_none() {
            debug!("drawing context lost, nothing to draw");
        } else {
            for idx in 0..self.edge_groups.len() {
                stats.edges += self.render_group(EdgeGroupId(idx), boxes);
                stats.groups += 1;
            }
        }
        debug!(groups = stats.groups, edges = stats.edges, "graph rendered");
        for listener in &mut self.listeners {
            listener(&stats);
        }
        stats
    }

    /// Feeds a host notification in. Returns true if it caused a render.
    pub fn handle_event<B>(&mut self, event: GraphEvent, boxes: &B) -> bool
    where
        B: BoxSource + ?Sized,
    {
        let triggers = match event {
            GraphEvent::Resize | GraphEvent::Scroll => self.options.resize_with_container,
            GraphEvent::Drag(id) | GraphEvent::DragStop(id) => {
                self.options.draggable_nodes && self.nodes.contains(&id)
            }
        };
        if triggers {
            self.render(boxes);
        }
        triggers
    }

    /// Calls `listener` after every full render.
    pub fn subscribe(&mut self, listener: impl FnMut(&RenderStats) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Every edge of every group with anchors taken from `boxes` right now.
    /// Edges touching unknown boxes are left out.
    pub fn resolve_edges<B>(&self, boxes: &B) -> Vec<ResolvedEdge>
    where
        B: BoxSource + ?Sized,
    {
        self.edge_groups
            .iter()
            .enumerate()
            .flat_map(|(idx, group)| resolve_group(EdgeGroupId(idx), group, boxes))
            .collect()
    }

    fn render_group<B>(&mut self, id: EdgeGroupId, boxes: &B) -> usize
    where
        B: BoxSource + ?Sized,
    {
        if self.canvas.size().is_empty() {
            return 0;
        }
        let Some(group) = self.edge_groups.get(id.0) else {
            return 0;
        };
        let Some(ctx) = self.canvas.context() else {
            return 0;
        };
        let edges = resolve_group(id, group, boxes);
        for edge in &edges {
            self.options.render_edge.draw(ctx, edge.from, edge.to, &edge.color);
        }
        edges.len()
    }
}

fn resolve_group<B>(id: EdgeGroupId, group: &EdgeGroup, boxes: &B) -> Vec<ResolvedEdge>
where
    B: BoxSource + ?Sized,
{
    group
        .edges()
        .filter_map(|(source, target)| {
            let (Some(source_box), Some(target_box)) = (boxes.node_box(source), boxes.node_box(target))
            else {
                warn!(%source, %target, "edge endpoint has no box");
                return None;
            };
            let (from, to) = edge_anchors(source_box, target_box);
            Some(ResolvedEdge {
                group: id,
                source,
                target,
                from,
                to,
                color: group.color.clone(),
            })
        })
        .collect()
}

impl<C: Canvas + fmt::Debug> fmt::Debug for Graph<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("canvas", &self.canvas)
            .field("edge_groups", &self.edge_groups)
            .field("nodes", &self.nodes)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
