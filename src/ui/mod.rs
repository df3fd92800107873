//! egui front-end: toolbar and side panel, the scatter plot, and drag gestures.

pub mod gesture;
pub mod panels;
pub mod plot;
