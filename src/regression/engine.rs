use crate::data::model::Dataset;
use crate::data::selection::{Selection, SelectionState};

use super::equation::{format_equation, CLEARED, INVALID_SOURCE, UNDEFINED};
use super::ols::{fit_line, RegressionResult};

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// What a load trigger produced.
#[derive(Debug, Clone)]
pub enum DatasetUpdate {
    /// A validated dataset.
    Loaded(Dataset),
    /// The user asked to clear the plot.
    Cleared,
    /// The source could not be read or parsed.
    Failed,
}

/// Where the current dataset came from. Picks the label for undefined fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Initial,
    Loaded,
    Cleared,
    Failed,
}

/// Everything observers need after a recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub result: RegressionResult,
    /// Equation, or the fallback label when the fit is undefined.
    pub equation: String,
    pub dataset_len: usize,
    pub selection_len: usize,
    pub selection_state: SelectionState,
}

type Observer = Box<dyn FnMut(&Emission)>;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns the dataset and the selection, and refits whenever either changes.
///
/// One instance per window. Both entry points recompute synchronously and
/// return the new snapshot; subscribed observers see it first.
pub struct RegressionEngine {
    dataset: Dataset,
    selection: Selection,
    origin: Origin,
    current: Emission,
    observers: Vec<Observer>,
}

impl Default for RegressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RegressionEngine {
    /// Engine with no data and an empty label.
    pub fn new() -> Self {
        Self {
            dataset: Dataset::default(),
            selection: Selection::default(),
            origin: Origin::Initial,
            current: Emission {
                result: RegressionResult::undefined(0),
                equation: String::new(),
                dataset_len: 0,
                selection_len: 0,
                selection_state: SelectionState::Empty,
            },
            observers: Vec::new(),
        }
    }

    /// Register a callback invoked after every recompute, in subscription order.
    pub fn subscribe(&mut self, observer: impl FnMut(&Emission) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace the dataset wholesale and reset the selection.
    pub fn set_dataset(&mut self, update: DatasetUpdate) -> &Emission {
        let (dataset, origin) = match update {
            DatasetUpdate::Loaded(ds) => (ds, Origin::Loaded),
            DatasetUpdate::Cleared => (Dataset::default(), Origin::Cleared),
            DatasetUpdate::Failed => (Dataset::default(), Origin::Failed),
        };
        log::info!("dataset replaced ({origin:?}, {} points)", dataset.len());

        self.dataset = dataset;
        self.selection = Selection::default();
        self.origin = origin;
        self.recompute()
    }

    /// Replace the selection.
    ///
    /// Indices outside the current dataset are dropped with a warning.
    pub fn set_selection(&mut self, indices: impl IntoIterator<Item = usize>) -> &Emission {
        let len = self.dataset.len();
        let (selection, dropped) = Selection::within(indices, len);
        if dropped > 0 {
            log::warn!("ignoring {dropped} selected indices outside 0..{len}");
        }
        self.selection = selection;
        self.recompute()
    }

    pub fn emission(&self) -> &Emission {
        &self.current
    }

    pub fn result(&self) -> &RegressionResult {
        &self.current.result
    }

    pub fn equation(&self) -> &str {
        &self.current.equation
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state(self.dataset.len())
    }

    /// Whether the point is in a partial selection.
    ///
    /// Empty and full selections highlight nothing.
    pub fn is_highlighted(&self, index: usize) -> bool {
        self.selection_state() == SelectionState::Partial && self.selection.contains(index)
    }

    /// Indices currently feeding the regression, in dataset order.
    pub fn active_indices(&self) -> Vec<usize> {
        self.selection.active_indices(self.dataset.len())
    }

    fn fallback_label(&self) -> &'static str {
        match self.origin {
            Origin::Initial => "",
            Origin::Loaded => UNDEFINED,
            Origin::Cleared => CLEARED,
            Origin::Failed => INVALID_SOURCE,
        }
    }

    fn recompute(&mut self) -> &Emission {
        let points = self.dataset.points();
        let active: Vec<[f64; 2]> = self
            .active_indices()
            .into_iter()
            .map(|i| points[i].xy())
            .collect();

        let result = fit_line(&active);
        let equation =
            format_equation(&result).unwrap_or_else(|| self.fallback_label().to_string());

        self.current = Emission {
            result,
            equation,
            dataset_len: self.dataset.len(),
            selection_len: self.selection.len(),
            selection_state: self.selection_state(),
        };
        for observer in &mut self.observers {
            observer(&self.current);
        }
        &self.current
    }
}
