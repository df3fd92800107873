//! Selection-driven linear regression.
//!
//! - `ols`: closed-form least squares over a point slice
//! - `equation`: the on-plot label text
//! - `engine`: dataset + selection state, refit on every change

pub mod engine;
pub mod equation;
pub mod ols;

pub use engine::{DatasetUpdate, Emission, RegressionEngine};
