use std::path::{Path, PathBuf};

use crate::data::filter::FilterSpec;
use crate::data::model::{CategoryColumn, NumericColumn, StudentDataset};
use crate::error::InvalidFilterError;
use crate::stats::DashboardSnapshot;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<StudentDataset>,

    /// Where the dataset came from.
    pub source: Option<PathBuf>,

    /// Current sidebar constraints.
    pub filters: Option<FilterSpec>,

    /// Aggregates for the current filters (cached until the next change).
    pub snapshot: Option<DashboardSnapshot>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset filters to "everything".
    pub fn set_dataset(&mut self, dataset: StudentDataset, source: &Path) {
        self.filters = Some(FilterSpec::unfiltered(&dataset));
        self.dataset = Some(dataset);
        self.source = Some(source.to_path_buf());
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the snapshot after a filter change.
    pub fn refilter(&mut self) {
        if let (Some(ds), Some(spec)) = (&self.dataset, &self.filters) {
            let snapshot = DashboardSnapshot::compute(ds, spec);
            log::debug!("recomputed: {} of {} records visible", snapshot.visible, snapshot.total);
            self.snapshot = Some(snapshot);
        }
    }

    /// Apply a filter edit; on rejection keep the old filters and report why.
    fn edit_filters(
        &mut self,
        edit: impl FnOnce(&mut FilterSpec, &StudentDataset) -> Result<(), InvalidFilterError>,
    ) {
        let (Some(ds), Some(spec)) = (&self.dataset, &mut self.filters) else {
            return;
        };
        match edit(spec, ds) {
            Ok(()) => {
                self.status_message = None;
                self.refilter();
            }
            Err(e) => {
                log::warn!("rejected filter change: {e}");
                self.status_message = Some(format!("Filter error: {e}"));
            }
        }
    }

    pub fn set_range(&mut self, column: NumericColumn, min: f64, max: f64) {
        self.edit_filters(|spec, _| spec.set_range(column, min, max));
    }

    /// Toggle a single category value in a column's filter.
    pub fn toggle_category(&mut self, column: CategoryColumn, value: &str) {
        self.edit_filters(|spec, ds| spec.toggle_category(ds, column, value));
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: CategoryColumn) {
        self.edit_filters(|spec, ds| spec.select_all(ds, column));
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: CategoryColumn) {
        self.edit_filters(|spec, ds| spec.select_none(ds, column));
    }

    /// Back to the full dataset.
    pub fn reset_filters(&mut self) {
        self.edit_filters(|spec, ds| {
            *spec = FilterSpec::unfiltered(ds);
            Ok(())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::sample_dataset;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(sample_dataset(), Path::new("students.csv"));
        state
    }

    fn visible(state: &AppState) -> usize {
        state.snapshot.as_ref().map(|s| s.visible).unwrap_or(0)
    }

    #[test]
    fn loading_shows_everything() {
        let state = loaded();
        assert_eq!(visible(&state), 12);
        assert_eq!(state.source.as_deref(), Some(Path::new("students.csv")));
    }

    #[test]
    fn filter_edits_recompute_the_snapshot() {
        let mut state = loaded();
        state.select_none(CategoryColumn::Gender);
        assert_eq!(visible(&state), 0);

        state.toggle_category(CategoryColumn::Gender, "Female");
        assert_eq!(visible(&state), 6);

        state.reset_filters();
        assert_eq!(visible(&state), 12);
    }

    #[test]
    fn rejected_edit_keeps_previous_state() {
        let mut state = loaded();
        state.set_range(NumericColumn::Attendance, 70.0, 80.0);
        let before = state.snapshot.clone();

        state.set_range(NumericColumn::Attendance, 90.0, 60.0);
        assert_eq!(state.snapshot, before);
        assert!(state.status_message.as_deref().unwrap().contains("inverted range"));

        state.set_range(NumericColumn::Attendance, 60.0, 93.0);
        assert_eq!(state.status_message, None);
        assert_eq!(visible(&state), 12);
    }

    #[test]
    fn edits_without_a_dataset_are_ignored() {
        let mut state = AppState::default();
        state.select_all(CategoryColumn::SchoolType);
        assert!(state.snapshot.is_none());
        assert!(state.status_message.is_none());
    }
}
