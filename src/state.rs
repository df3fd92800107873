use std::path::Path;

use crate::config::{SelectionTool, Settings};
use crate::data::loader::{self, LoadError};
use crate::data::model::Dataset;
use crate::regression::{DatasetUpdate, RegressionEngine};
use crate::ui::gesture::DragSelection;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Frames to wait for the paste event after requesting the clipboard.
pub const PASTE_WAIT_FRAMES: u8 = 2;

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Dataset, selection and the current fit.
    pub engine: RegressionEngine,

    /// Settings read at startup.
    pub settings: Settings,

    /// Active drag tool.
    pub tool: SelectionTool,

    /// Drag selection in progress, if any.
    pub gesture: Option<DragSelection>,

    /// Set after "From clipboard" until the paste event arrives or the wait runs out.
    pub awaiting_paste: bool,

    /// Frames polled since the paste was requested.
    paste_frames: u8,

    /// Where the current dataset came from, for the side panel.
    pub source_name: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            engine: RegressionEngine::new(),
            tool: settings.selection_tool,
            settings,
            gesture: None,
            awaiting_paste: false,
            paste_frames: 0,
            source_name: None,
            status_message: None,
        }
    }

    /// Load the file named by `primary_source` in the settings.
    pub fn load_primary(&mut self) {
        let path = self.settings.primary_source.clone();
        self.load_path(&path);
    }

    /// Load any supported file.
    pub fn load_path(&mut self, path: &Path) {
        let result = loader::load_file(path, self.settings.has_header);
        self.apply_load(path.display().to_string(), result);
    }

    /// Start waiting for the clipboard contents requested from the OS.
    pub fn request_paste(&mut self) {
        self.awaiting_paste = true;
        self.paste_frames = 0;
    }

    /// Feed one frame's paste event (if any) into a pending clipboard request.
    ///
    /// The OS sends nothing when the clipboard holds no text, so a request
    /// still unanswered after [`PASTE_WAIT_FRAMES`] frames fails as an empty source.
    pub fn poll_paste(&mut self, pasted: Option<String>) {
        if !self.awaiting_paste {
            return;
        }
        match pasted {
            Some(text) => self.load_clipboard_text(&text),
            None => {
                self.paste_frames += 1;
                if self.paste_frames > PASTE_WAIT_FRAMES {
                    self.awaiting_paste = false;
                    self.apply_load("clipboard".to_string(), Err(LoadError::Empty));
                }
            }
        }
    }

    /// Load pasted clipboard text.
    pub fn load_clipboard_text(&mut self, text: &str) {
        self.awaiting_paste = false;
        let result = loader::load_clipboard_text(text);
        self.apply_load("clipboard".to_string(), result);
    }

    /// Explicit clear.
    pub fn clear(&mut self) {
        self.awaiting_paste = false;
        self.gesture = None;
        self.source_name = None;
        self.status_message = None;
        self.engine.set_dataset(DatasetUpdate::Cleared);
    }

    /// Forward a gesture's index set to the engine.
    pub fn select(&mut self, indices: Vec<usize>) {
        self.engine.set_selection(indices);
    }

    pub fn reset_selection(&mut self) {
        self.select(Vec::new());
    }

    /// Resolve a load outcome into exactly one engine update.
    fn apply_load(&mut self, source: String, result: Result<Dataset, LoadError>) {
        self.gesture = None;
        match result {
            Ok(dataset) => {
                log::info!("Loaded {} points from {source}", dataset.len());
                self.status_message = None;
                self.source_name = Some(source);
                self.engine.set_dataset(DatasetUpdate::Loaded(dataset));
            }
            Err(e) => {
                log::error!("Failed to load {source}: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.source_name = None;
                self.engine.set_dataset(DatasetUpdate::Failed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::equation::{CLEARED, INVALID_SOURCE};

    #[test]
    fn pasted_table_is_fitted() {
        let mut state = AppState::default();
        state.request_paste();
        state.poll_paste(None);
        state.poll_paste(Some("a\t1\t2\nb\t2\t4\nc\t3\t6\n".to_string()));
        assert!(!state.awaiting_paste);
        assert_eq!(state.engine.equation(), "y = 2.00 * x +0.00 | R2 = 1.000");
        assert_eq!(state.source_name.as_deref(), Some("clipboard"));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn bad_paste_reports_invalid_source() {
        let mut state = AppState::default();
        state.load_clipboard_text("1 2\n2 4\n3 6");
        state.load_clipboard_text("1 x\n2 4");
        assert_eq!(state.engine.equation(), INVALID_SOURCE);
        assert!(state.engine.dataset().is_empty());
        assert!(state.status_message.as_deref().unwrap_or("").contains("not a number"));
    }

    #[test]
    fn missing_primary_source_is_invalid() {
        let mut settings = Settings::default();
        settings.primary_source = std::env::temp_dir().join("scatterfit-missing-input.csv");
        let mut state = AppState::new(settings);
        state.load_primary();
        assert_eq!(state.engine.equation(), INVALID_SOURCE);
        assert!(state.status_message.is_some());
    }

    #[test]
    fn clear_wipes_status_and_data() {
        let mut state = AppState::default();
        state.load_clipboard_text("1 x");
        state.clear();
        assert_eq!(state.engine.equation(), CLEARED);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn selection_round_trip_through_state() {
        let mut state = AppState::default();
        state.load_clipboard_text("1 1\n2 2\n3 3\n10 1");
        state.select(vec![0, 1, 2]);
        assert_eq!(state.engine.equation(), "y = 1.00 * x +0.00 | R2 = 1.000");
        state.reset_selection();
        assert!(state.engine.selection().is_empty());
        assert_eq!(state.engine.result().n_points, 4);
    }

    #[test]
    fn unanswered_paste_request_fails_as_invalid_source() {
        let mut state = AppState::default();
        state.load_clipboard_text("1 2\n2 4\n3 6");
        state.request_paste();
        for _ in 0..PASTE_WAIT_FRAMES {
            state.poll_paste(None);
            assert!(state.awaiting_paste);
        }
        assert_eq!(state.engine.dataset().len(), 3);

        state.poll_paste(None);
        assert!(!state.awaiting_paste);
        assert_eq!(state.engine.equation(), INVALID_SOURCE);
        assert!(state.engine.dataset().is_empty());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn paste_without_request_is_ignored() {
        let mut state = AppState::default();
        state.load_clipboard_text("1 2\n2 4\n3 6");
        state.poll_paste(Some("not a table".to_string()));
        assert_eq!(state.engine.dataset().len(), 3);
        assert_eq!(state.engine.equation(), "y = 2.00 * x +0.00 | R2 = 1.000");
    }

    #[test]
    fn clear_cancels_pending_paste() {
        let mut state = AppState::default();
        state.request_paste();
        state.clear();
        assert!(!state.awaiting_paste);
        state.poll_paste(Some("1 2\n2 4".to_string()));
        assert!(state.engine.dataset().is_empty());
        assert_eq!(state.engine.equation(), CLEARED);
    }
}
