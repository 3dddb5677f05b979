use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{CATEGORY_FILTER_COLUMNS, RANGE_COLUMNS};
use crate::data::loader::{self, display_name};
use crate::data::model::{CategoryColumn, NumericColumn};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
            ui.separator();

            for column in RANGE_COLUMNS {
                range_filter(ui, state, column);
                ui.add_space(6.0);
            }
            ui.separator();

            for column in CATEGORY_FILTER_COLUMNS {
                category_filter(ui, state, column);
            }
        });
}

/// Two sliders bounded by the observed range; `min` never passes `max`.
fn range_filter(ui: &mut Ui, state: &mut AppState, column: NumericColumn) {
    let Some((lo, hi)) = state.dataset.as_ref().and_then(|ds| ds.observed_range(column)) else {
        return;
    };
    let Some(current) = state.filters.as_ref().and_then(|f| f.range(column)) else {
        return;
    };

    let (mut min, mut max) = (current.min(), current.max());
    ui.strong(format!("{} Range", column.label()));
    let min_changed = ui
        .add(egui::Slider::new(&mut min, lo..=hi).text("min"))
        .changed();
    let max_changed = ui
        .add(egui::Slider::new(&mut max, lo..=hi).text("max"))
        .changed();

    if min_changed || max_changed {
        if min > max {
            if min_changed {
                max = min;
            } else {
                min = max;
            }
        }
        state.set_range(column, min, max);
    }
}

/// Multiselect with All / None shortcuts.
fn category_filter(ui: &mut Ui, state: &mut AppState, column: CategoryColumn) {
    let Some(all_values) = state
        .dataset
        .as_ref()
        .map(|ds| ds.observed_values(column).clone())
    else {
        return;
    };
    let selected = state
        .filters
        .as_ref()
        .and_then(|f| f.selected(column).cloned())
        .unwrap_or_default();

    // Show count of selected / total in the header
    let header_text = format!("{}  ({}/{})", column.label(), selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column.name())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(column);
                }
            });

            for value in &all_values {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    state.toggle_category(column, value);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(path) = &state.source {
            ui.label(display_name(path));
        }
        if let Some(snapshot) = &state.snapshot {
            ui.label(format!(
                "{} of {} records match the filters",
                snapshot.visible, snapshot.total
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open student dataset")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV / TSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} records from {}", dataset.len(), path.display());
                state.set_dataset(dataset, &path);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
