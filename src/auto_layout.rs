use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{NodeBox, Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    #[default]
    Down,
    Up,
}

impl LayoutDirection {
    pub fn step(self) -> i32 {
        match self {
            LayoutDirection::Down => 1,
            LayoutDirection::Up => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    /// Minimum horizontal gap between neighbours on a row.
    pub min_spacing: f32,
    /// Signed row offset from the vertical centre of the region.
    #[serde(alias = "row")]
    pub start_row: i32,
    pub row_height: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::Down,
            min_spacing: 20.0,
            start_row: 0,
            row_height: 100.0,
        }
    }
}

/// Partial [`LayoutOptions`], as written in scene documents and config files.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOverrides {
    pub direction: Option<LayoutDirection>,
    pub min_spacing: Option<f32>,
    #[serde(alias = "row")]
    pub start_row: Option<i32>,
    pub row_height: Option<f32>,
}

impl LayoutOverrides {
    pub fn apply(&self, base: &LayoutOptions) -> LayoutOptions {
        LayoutOptions {
            direction: self.direction.unwrap_or(base.direction),
            min_spacing: self.min_spacing.unwrap_or(base.min_spacing),
            start_row: self.start_row.unwrap_or(base.start_row),
            row_height: self.row_height.unwrap_or(base.row_height),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowPlacer {
    region: Size,
    options: LayoutOptions,
    /// Occupied horizontal span of the current row, `None` before the first box.
    span: Option<(f32, f32)>,
    row: i32,
}

impl RowPlacer {
    pub fn new(region: Size, options: &LayoutOptions) -> Self {
        Self {
            region,
            options: *options,
            span: None,
            row: options.start_row,
        }
    }

    pub fn row(&self) -> i32 {
        self.row
    }

    /// Top-left position for the next box of the given width.
    pub fn place(&mut self, width: f32) -> Point {
        let spacing = self.options.min_spacing;
        let region_width = self.region.width;
        let centered = (region_width - width) / 2.0;

        let x = match self.span {
            None => {
                self.span = Some((centered, centered + width));
                centered
            }
            Some((left, right)) if left > region_width - right && left > width + spacing => {
                let x = left - spacing - width;
                self.span = Some((x, right));
                x
            }
            Some((left, right)) if region_width - right > width + spacing => {
                let x = right + spacing;
                self.span = Some((left, x + width));
                x
            }
            Some(_) => {
                self.row += self.options.direction.step();
                debug!(row = self.row, width, "row full, wrapping");
                self.span = Some((centered, centered + width));
                centered
            }
        };

        let y = self.region.height / 2.0 + self.row as f32 * self.options.row_height;
        Point::new(x, y)
    }
}

/// Positions every box in sequence order inside `region`.
pub fn layout<'a, I>(boxes: I, region: Size, options: &LayoutOptions)
where
    I: IntoIterator<Item = &'a mut NodeBox>,
{
    let mut placer = RowPlacer::new(region, options);
    for node in boxes {
        node.position = placer.place(node.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes(widths: &[f32]) -> Vec<NodeBox> {
        widths.iter().map(|w| NodeBox::new(*w, 40.0)).collect()
    }

    fn xs(nodes: &[NodeBox]) -> Vec<f32> {
        nodes.iter().map(|n| n.position.x).collect()
    }

    #[test]
    fn first_box_is_centered() {
        let mut nodes = boxes(&[100.0]);
        layout(&mut nodes, Size::new(1000.0, 600.0), &LayoutOptions::default());
        assert_eq!(nodes[0].position, Point::new(450.0, 300.0));
    }

    #[test]
    fn alternates_right_then_left() {
        let mut nodes = boxes(&[100.0, 100.0, 100.0, 100.0]);
        layout(&mut nodes, Size::new(1000.0, 600.0), &LayoutOptions::default());
        // Equal room on both sides goes right; afterwards the left has more.
        assert_eq!(xs(&nodes), vec![450.0, 570.0, 330.0, 690.0]);
        assert!(nodes.iter().all(|n| n.position.y == 300.0));
    }

    #[test]
    fn neighbours_keep_min_spacing() {
        let mut nodes = boxes(&[80.0, 120.0, 60.0, 150.0, 90.0, 30.0, 200.0, 70.0]);
        let options = LayoutOptions {
            min_spacing: 15.0,
            ..LayoutOptions::default()
        };
        layout(&mut nodes, Size::new(700.0, 500.0), &options);

        let mut rows: Vec<Vec<NodeBox>> = Vec::new();
        for node in &nodes {
            match rows
                .iter_mut()
                .find(|row| row[0].position.y == node.position.y)
            {
                Some(row) => row.push(*node),
                None => rows.push(vec![*node]),
            }
        }
        for row in &mut rows {
            row.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
            for pair in row.windows(2) {
                assert!(pair[1].position.x - pair[0].right() >= 15.0 - 1e-3);
            }
        }
    }

    #[test]
    fn wraps_down_one_row_at_a_time() {
        let mut nodes = boxes(&[200.0, 200.0, 200.0, 200.0]);
        let options = LayoutOptions {
            start_row: 1,
            ..LayoutOptions::default()
        };
        layout(&mut nodes, Size::new(500.0, 400.0), &options);
        let ys: Vec<f32> = nodes.iter().map(|n| n.position.y).collect();
        assert_eq!(ys, vec![300.0, 400.0, 500.0, 600.0]);
        assert!(nodes.iter().all(|n| n.position.x == 150.0));
    }

    #[test]
    fn wraps_up_when_requested() {
        let mut nodes = boxes(&[300.0, 300.0, 300.0]);
        let options = LayoutOptions {
            direction: LayoutDirection::Up,
            start_row: -1,
            row_height: 50.0,
            ..LayoutOptions::default()
        };
        layout(&mut nodes, Size::new(400.0, 400.0), &options);
        let ys: Vec<f32> = nodes.iter().map(|n| n.position.y).collect();
        assert_eq!(ys, vec![150.0, 100.0, 50.0]);
    }

    #[test]
    fn oversized_box_gets_its_own_centered_row() {
        let mut nodes = boxes(&[100.0, 900.0]);
        layout(&mut nodes, Size::new(500.0, 200.0), &LayoutOptions::default());
        assert_eq!(nodes[1].position, Point::new(-200.0, 200.0));
    }

    #[test]
    fn narrow_region_degenerates_to_one_box_per_row() {
        let mut placer_rows = Vec::new();
        let mut placer = RowPlacer::new(Size::new(10.0, 0.0), &LayoutOptions::default());
        for width in [5.0, 5.0, 5.0] {
            placer.place(width);
            placer_rows.push(placer.row());
        }
        assert_eq!(placer_rows, vec![0, 1, 2]);
    }

    #[test]
    fn empty_sequence_is_a_no_op() {
        let mut nodes: Vec<NodeBox> = Vec::new();
        layout(&mut nodes, Size::new(100.0, 100.0), &LayoutOptions::default());
        assert!(nodes.is_empty());
    }

    #[test]
    fn overrides_accept_legacy_row_key() {
        let overrides: LayoutOverrides =
            serde_json::from_str(r#"{"row": -1, "direction": "up"}"#).unwrap();
        let options = overrides.apply(&LayoutOptions::default());
        assert_eq!(options.start_row, -1);
        assert_eq!(options.direction, LayoutDirection::Up);
        assert_eq!(options.min_spacing, 20.0);
    }
}
