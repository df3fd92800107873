use std::collections::BTreeSet;

use super::model::Point;

// ---------------------------------------------------------------------------
// Selection: which points of the dataset the user picked
// ---------------------------------------------------------------------------

/// How a selection restricts the regression input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing selected → use every point.
    Empty,
    /// Every point selected → same as `Empty`.
    Full,
    /// A non-empty proper subset → use exactly those points.
    Partial,
}

/// Set of selected point indices, always in range for the dataset it was
/// built against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: BTreeSet<usize>,
}

impl Selection {
    /// Build a selection for a dataset of `len` points.
    ///
    /// Returns the selection and the number of indices that were dropped
    /// for being out of range.
    pub fn within(indices: impl IntoIterator<Item = usize>, len: usize) -> (Self, usize) {
        let mut dropped = 0;
        let indices = indices
            .into_iter()
            .filter(|&i| {
                let keep = i < len;
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();
        (Selection { indices }, dropped)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Classify against a dataset of `len` points.
    pub fn state(&self, len: usize) -> SelectionState {
        if self.is_empty() {
            SelectionState::Empty
        } else if self.len() == len {
            SelectionState::Full
        } else {
            SelectionState::Partial
        }
    }

    /// Indices feeding the regression, in dataset order.
    ///
    /// Empty and full selections both resolve to every index.
    pub fn active_indices(&self, len: usize) -> Vec<usize> {
        match self.state(len) {
            SelectionState::Empty | SelectionState::Full => (0..len).collect(),
            SelectionState::Partial => self.iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Gesture hit-testing (plot coordinates)
// ---------------------------------------------------------------------------

/// Indices of points inside the axis-aligned box spanned by two corners.
/// Points on the border count as inside.
pub fn indices_in_rect(points: &[Point], a: [f64; 2], b: [f64; 2]) -> Vec<usize> {
    let (x_min, x_max) = (a[0].min(b[0]), a[0].max(b[0]));
    let (y_min, y_max) = (a[1].min(b[1]), a[1].max(b[1]));
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.x >= x_min && p.x <= x_max && p.y >= y_min && p.y <= y_max)
        .map(|(i, _)| i)
        .collect()
}

/// Indices of points inside a closed polygon (even-odd rule).
///
/// Fewer than three vertices enclose nothing.
pub fn indices_in_polygon(points: &[Point], polygon: &[[f64; 2]]) -> Vec<usize> {
    if polygon.len() < 3 {
        return Vec::new();
    }
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| point_in_polygon([p.x, p.y], polygon))
        .map(|(i, _)| i)
        .collect()
}

/// Ray casting towards +x.
fn point_in_polygon(p: [f64; 2], polygon: &[[f64; 2]]) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > p[1]) != (yj > p[1]) {
            let x_cross = xi + (p[1] - yi) * (xj - xi) / (yj - yi);
            if p[0] < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Point> {
        // 3x3 grid at integer coordinates 0..=2
        (0..3)
            .flat_map(|y| (0..3).map(move |x| Point::new(x as f64, y as f64)))
            .collect()
    }

    #[test]
    fn out_of_range_indices_are_dropped_and_counted() {
        let (sel, dropped) = Selection::within([0, 2, 7, 2, 3], 4);
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn empty_and_full_resolve_to_every_index() {
        let (empty, _) = Selection::within([], 3);
        let (full, _) = Selection::within([2, 0, 1], 3);
        assert_eq!(empty.state(3), SelectionState::Empty);
        assert_eq!(full.state(3), SelectionState::Full);
        assert_eq!(empty.active_indices(3), vec![0, 1, 2]);
        assert_eq!(full.active_indices(3), vec![0, 1, 2]);
    }

    #[test]
    fn partial_selection_is_in_dataset_order() {
        let (sel, _) = Selection::within([3, 1], 5);
        assert_eq!(sel.state(5), SelectionState::Partial);
        assert_eq!(sel.active_indices(5), vec![1, 3]);
    }

    #[test]
    fn rect_includes_border_and_ignores_corner_order() {
        let pts = grid();
        let hits = indices_in_rect(&pts, [1.0, 2.0], [0.0, 1.0]);
        // (0,1) (1,1) (0,2) (1,2)
        assert_eq!(hits, vec![3, 4, 6, 7]);
    }

    #[test]
    fn polygon_selects_interior_points() {
        let pts = grid();
        let triangle = [[-0.5, -0.5], [2.0, -0.5], [-0.5, 2.0]];
        let hits = indices_in_polygon(&pts, &triangle);
        // Hypotenuse x + y = 1.5: (0,0) (1,0) (0,1)
        assert_eq!(hits, vec![0, 1, 3]);
    }

    #[test]
    fn degenerate_polygon_selects_nothing() {
        let pts = grid();
        assert!(indices_in_polygon(&pts, &[[0.0, 0.0], [2.0, 2.0]]).is_empty());
    }
}
