use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::{generate_palette, heat_color, label_color};
use crate::data::model::CategoryColumn;
use crate::error::StatsError;
use crate::state::AppState;
use crate::stats::correlation::{CorrelationMatrix, CorrelationReport};
use crate::stats::{CategorySummary, DashboardSnapshot, TARGET};

const NO_DATA: &str = "No data for current filters";

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the dashboard in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore student performance  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Student Performance Dashboard");
            ui.label("Analyze the factors that influence students' exam performance");
            ui.separator();

            kpi_section(ui, snapshot);
            ui.separator();
            correlation_section(ui, snapshot);
            ui.separator();
            category_section(ui, snapshot);
            ui.separator();
            top_performers(ui, snapshot);
        });
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

fn kpi_section(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    ui.strong("Key Performance Indicators");
    match &snapshot.kpis {
        Ok(kpis) => {
            ui.columns(4, |cols| {
                for (col, (label, value)) in cols.iter_mut().zip(kpis.tiles()) {
                    col.group(|ui: &mut Ui| {
                        ui.label(label);
                        ui.heading(format!("{value:.2}"));
                    });
                }
            });
        }
        Err(e) => unavailable(ui, e),
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

fn correlation_section(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    ui.strong("Correlation Analysis");
    let report = match &snapshot.correlation {
        Ok(report) => report,
        Err(e) => {
            unavailable(ui, e);
            return;
        }
    };

    ui.horizontal_top(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(format!("Correlation with {}", TARGET.label()));
            ui.push_id("correlation_ranking", |ui: &mut Ui| ranking_table(ui, report));
        });
        ui.add_space(24.0);
        ui.vertical(|ui: &mut Ui| {
            ui.label("Heatmap of numeric correlations");
            heatmap(ui, &report.matrix);
        });
    });
}

fn format_coefficient(r: Option<f64>) -> String {
    match r {
        Some(r) => format!("{r:.3}"),
        None => "undefined".to_string(),
    }
}

fn ranking_table(ui: &mut Ui, report: &CorrelationReport) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(80.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Factor");
            });
            header.col(|ui| {
                ui.strong("r");
            });
        })
        .body(|mut body| {
            for (column, r) in &report.ranking {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(column.label());
                    });
                    row.col(|ui| {
                        ui.monospace(format_coefficient(*r));
                    });
                });
            }
        });
}

fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    egui::Grid::new("correlation_heatmap")
        .spacing([2.0, 2.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for c in &matrix.columns {
                ui.label(RichText::new(c.label()).small());
            }
            ui.end_row();

            for (i, row_column) in matrix.columns.iter().enumerate() {
                ui.label(RichText::new(row_column.label()).small());
                for &value in &matrix.values[i] {
                    let bg = heat_color(value);
                    let text = match value {
                        Some(r) => format!("{r:>6.2}"),
                        None => "   n/a".to_string(),
                    };
                    ui.label(
                        RichText::new(text)
                            .monospace()
                            .background_color(bg)
                            .color(label_color(bg)),
                    );
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Category-wise comparison
// ---------------------------------------------------------------------------

fn category_section(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    ui.strong(format!("Category-wise {} Comparison", TARGET.label()));
    let palette = generate_palette(CategoryColumn::ALL.len());

    for (i, summary) in snapshot.categories.iter().enumerate() {
        ui.label(format!("Average {} by {}", TARGET.label(), summary.column.label()));
        if summary.bars.is_empty() {
            ui.label(NO_DATA);
            continue;
        }
        let color = palette[i % palette.len()];
        category_chart(ui, summary, color);
        ui.add_space(8.0);
    }
}

fn category_chart(ui: &mut Ui, summary: &CategorySummary, color: egui::Color32) {
    let bars: Vec<Bar> = summary
        .bars
        .iter()
        .enumerate()
        .map(|(x, e)| {
            Bar::new(x as f64, e.mean)
                .name(format!("{} (n={})", e.value, e.count))
                .fill(color)
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = summary.bars.iter().map(|e| e.value.clone()).collect();

    Plot::new(format!("breakdown_{}", summary.column.name()))
        .height(220.0)
        .y_axis_label(format!("Average {}", TARGET.label()))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(move |mark, _range| {
            let x = mark.value;
            if x < 0.0 || (x - x.round()).abs() > 1e-6 {
                return String::new();
            }
            labels.get(x.round() as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

// ---------------------------------------------------------------------------
// Top performing categories
// ---------------------------------------------------------------------------

fn top_performers(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    ui.strong("Top Performing Categories");
    for summary in &snapshot.categories {
        let line = match &summary.best {
            Ok(best) => format!(
                "• {} → {} (Avg Score: {:.2})",
                summary.column.label(),
                best.value,
                best.mean
            ),
            Err(_) => format!("• {} → {}", summary.column.label(), NO_DATA.to_lowercase()),
        };
        ui.label(line);
    }
}

fn unavailable(ui: &mut Ui, err: &StatsError) {
    let text = match err {
        StatsError::EmptyInput(_) => NO_DATA.to_string(),
        StatsError::InsufficientData { reason, .. } => format!("Not enough data: {reason}"),
    };
    ui.label(RichText::new(text).italics().weak());
}
