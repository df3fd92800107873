//! Drag selection (box / lasso) in plot coordinates.

use crate::config::SelectionTool;
use crate::data::model::Point;
use crate::data::selection::{indices_in_polygon, indices_in_rect};

/// Shape being traced by the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Axis-aligned rectangle between the drag start and the pointer.
    Rect,
    /// Free-hand polygon through every pointer sample.
    Lasso,
}

impl DragMode {
    /// Gesture for a toolbar tool; panning has none.
    pub fn for_tool(tool: SelectionTool) -> Option<Self> {
        match tool {
            SelectionTool::Pan => None,
            SelectionTool::Box => Some(DragMode::Rect),
            SelectionTool::Lasso => Some(DragMode::Lasso),
        }
    }
}

/// An in-progress drag selection.
#[derive(Debug, Clone)]
pub struct DragSelection {
    pub mode: DragMode,
    pub start: [f64; 2],
    /// Pointer samples after the start, in plot coordinates.
    pub points: Vec<[f64; 2]>,
}

impl DragSelection {
    pub fn new(mode: DragMode, start: [f64; 2]) -> Self {
        Self {
            mode,
            start,
            points: Vec::new(),
        }
    }

    /// Record a pointer sample, skipping repeats of the last one.
    pub fn push_point(&mut self, p: [f64; 2]) {
        let last = self.points.last().copied().unwrap_or(self.start);
        if last != p {
            self.points.push(p);
        }
    }

    pub fn current(&self) -> [f64; 2] {
        self.points.last().copied().unwrap_or(self.start)
    }

    /// Closed outline to draw while dragging.
    pub fn outline(&self) -> Vec<[f64; 2]> {
        match self.mode {
            DragMode::Rect => {
                let [x0, y0] = self.start;
                let [x1, y1] = self.current();
                vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]
            }
            DragMode::Lasso => {
                let mut polygon = Vec::with_capacity(self.points.len() + 1);
                polygon.push(self.start);
                polygon.extend_from_slice(&self.points);
                polygon
            }
        }
    }

    /// Indices of the points enclosed by the finished gesture.
    pub fn selected(&self, points: &[Point]) -> Vec<usize> {
        match self.mode {
            DragMode::Rect => indices_in_rect(points, self.start, self.current()),
            DragMode::Lasso => indices_in_polygon(points, &self.outline()),
        }
    }
}
