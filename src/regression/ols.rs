//! Simple linear regression (one predictor), closed form.
//!
//! ```text
//! slope     = Σ(x - x̄)(y - ȳ) / Σ(x - x̄)²
//! intercept = ȳ - slope · x̄
//! R²        = (Σ(x - x̄)(y - ȳ))² / (Σ(x - x̄)² · Σ(y - ȳ)²)
//! ```
//!
//! Sums are taken over mean-centred values rather than raw moments so that
//! data far from the origin (timestamps, large IDs) does not lose precision.

use crate::data::model::Point2D;

/// Snapshot of one regression run. Replaced wholesale on every recompute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Fitted value at the smallest active x.
    pub line_start: Point2D,
    /// Fitted value at the largest active x.
    pub line_end: Point2D,
    /// Size of the active point set the fit was computed from.
    pub n_points: usize,
}

impl RegressionResult {
    /// NaN sentinel: fewer than two points, or no spread in x.
    pub fn undefined(n_points: usize) -> Self {
        Self {
            slope: f64::NAN,
            intercept: f64::NAN,
            r_squared: f64::NAN,
            line_start: Point2D::NAN,
            line_end: Point2D::NAN,
            n_points,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.slope.is_finite() && self.intercept.is_finite()
    }
}

/// Fit `y = slope·x + intercept` by ordinary least squares.
///
/// Never fails: degenerate input yields [`RegressionResult::undefined`].
pub fn fit_line(points: &[[f64; 2]]) -> RegressionResult {
    let n = points.len();
    if n < 2 {
        return RegressionResult::undefined(n);
    }

    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n as f64;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n as f64;
    if !mean_x.is_finite() || !mean_y.is_finite() {
        return RegressionResult::undefined(n);
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut scale_x, mut scale_y) = (0.0_f64, 0.0_f64);
    for &[x, y] in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
        scale_x = scale_x.max((x - mean_x).abs());
        scale_y = scale_y.max((y - mean_y).abs());
    }

    // All x identical: the slope is 0/0.
    if x_min == x_max || scale_x == 0.0 || !scale_x.is_finite() {
        return RegressionResult::undefined(n);
    }

    // Flat y: exact zero slope, and Pearson r is taken as 0.
    if y_min == y_max || scale_y == 0.0 {
        return line_through(0.0, y_min, 0.0, x_min, x_max, n);
    }
    if !scale_y.is_finite() {
        return RegressionResult::undefined(n);
    }

    // Deviations are divided by their largest magnitude, so every sum stays
    // within `n` and squaring cannot overflow.
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &[x, y] in points {
        let dx = (x - mean_x) / scale_x;
        let dy = (y - mean_y) / scale_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return RegressionResult::undefined(n);
    }

    let slope = (sxy / sxx) * (scale_y / scale_x);
    let intercept = mean_y - slope * mean_x;
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    let r_squared = r * r;
    if !slope.is_finite() || !intercept.is_finite() || !r_squared.is_finite() {
        return RegressionResult::undefined(n);
    }
    let r_squared = if r_squared > 1.0 { 1.0 } else { r_squared };

    line_through(slope, intercept, r_squared, x_min, x_max, n)
}

fn line_through(
    slope: f64,
    intercept: f64,
    r_squared: f64,
    x_min: f64,
    x_max: f64,
    n: usize,
) -> RegressionResult {
    RegressionResult {
        slope,
        intercept,
        r_squared,
        line_start: Point2D::new(x_min, intercept + slope * x_min),
        line_end: Point2D::new(x_max, intercept + slope * x_max),
        n_points: n,
    }
}
