use super::ols::RegressionResult;

/// Label shown when a loaded dataset cannot be fitted.
pub const UNDEFINED: &str = "Undefined";
/// Label shown after an explicit clear.
pub const CLEARED: &str = "Cleared";
/// Label shown after a failed load.
pub const INVALID_SOURCE: &str = "Invalid Source";

/// Format a fitted line for the on-plot label.
///
/// `y = 1.00 * x +0.00 | R2 = 1.000`. The intercept always carries its sign.
/// Returns `None` for the NaN sentinel; callers pick the fallback label.
pub fn format_equation(result: &RegressionResult) -> Option<String> {
    if !result.is_defined() {
        return None;
    }
    Some(format!(
        "y = {:.2} * x {:+.2} | R2 = {:.3}",
        result.slope, result.intercept, result.r_squared
    ))
}
