// ---------------------------------------------------------------------------
// Point – one row of the loaded table
// ---------------------------------------------------------------------------

/// A single observation. Identified by its position in the [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Free-text description from the first column of a 3-column table.
    /// Empty for 2-column input.
    pub label: String,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: String::new(),
        }
    }

    pub fn labelled(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: label.into(),
        }
    }

    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

// ---------------------------------------------------------------------------
// Point2D – bare plot geometry
// ---------------------------------------------------------------------------

/// Geometry-only coordinate, used for regression line endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const NAN: Point2D = Point2D {
        x: f64::NAN,
        y: f64::NAN,
    };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// Ordered, immutable sequence of points loaded from one source.
///
/// Every `x` and `y` is finite; the loader rejects the whole table otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    points: Vec<Point>,
}

impl Dataset {
    pub fn from_points(points: Vec<Point>) -> Self {
        debug_assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any point carries a non-empty label.
    pub fn has_labels(&self) -> bool {
        self.points.iter().any(|p| !p.label.is_empty())
    }
}

impl From<Vec<(f64, f64)>> for Dataset {
    fn from(pairs: Vec<(f64, f64)>) -> Self {
        Dataset::from_points(pairs.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }
}
