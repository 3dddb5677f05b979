/// Aggregates computed over a filtered view.
///
/// Everything here is a pure function of the view; [`DashboardSnapshot`]
/// bundles one full recompute for the UI.

pub mod breakdown;
pub mod correlation;
pub mod kpi;

use crate::data::filter::{apply_filter, FilterSpec};
use crate::data::model::{CategoryColumn, NumericColumn, StudentDataset};
use crate::error::StatsError;

use breakdown::{best_category, category_breakdown, sorted_by_mean_desc, CategoryMean};
use correlation::{compute_correlation, CorrelationReport, FACTOR_COLUMNS};
use kpi::{compute_kpis, Kpis};

/// Target of every aggregate on the dashboard.
pub const TARGET: NumericColumn = NumericColumn::ExamScore;

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub column: CategoryColumn,
    /// Bars in chart order (highest mean first).
    pub bars: Vec<CategoryMean>,
    pub best: Result<CategoryMean, StatsError>,
}

/// Everything the dashboard shows for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub total: usize,
    pub visible: usize,
    pub kpis: Result<Kpis, StatsError>,
    pub correlation: Result<CorrelationReport, StatsError>,
    pub categories: Vec<CategorySummary>,
}

impl DashboardSnapshot {
    /// Filter the dataset and recompute every aggregate.
    pub fn compute(dataset: &StudentDataset, spec: &FilterSpec) -> Self {
        let view = apply_filter(dataset, spec);

        let categories = CategoryColumn::ALL
            .iter()
            .map(|&column| {
                let breakdown = category_breakdown(&view, column, TARGET);
                let best = best_category(&breakdown).cloned();
                CategorySummary {
                    column,
                    bars: sorted_by_mean_desc(&breakdown),
                    best,
                }
            })
            .collect();

        DashboardSnapshot {
            total: dataset.len(),
            visible: view.len(),
            kpis: compute_kpis(&view),
            correlation: compute_correlation(&view, &FACTOR_COLUMNS, TARGET),
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::sample_dataset;

    #[test]
    fn unfiltered_snapshot_is_fully_populated() {
        let ds = sample_dataset();
        let snap = DashboardSnapshot::compute(&ds, &FilterSpec::unfiltered(&ds));

        assert_eq!(snap.total, 12);
        assert_eq!(snap.visible, 12);
        assert!(snap.kpis.is_ok());
        assert_eq!(snap.correlation.as_ref().unwrap().matrix.columns.len(), 7);
        assert_eq!(snap.categories.len(), CategoryColumn::ALL.len());
        for summary in &snap.categories {
            let best = summary.best.as_ref().unwrap();
            assert_eq!(summary.bars[0].mean, best.mean);
        }
    }

    #[test]
    fn empty_view_reports_errors_instead_of_numbers() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::unfiltered(&ds);
        spec.select_none(&ds, CategoryColumn::Gender).unwrap();
        let snap = DashboardSnapshot::compute(&ds, &spec);

        assert_eq!(snap.visible, 0);
        assert!(matches!(snap.kpis, Err(StatsError::EmptyInput(_))));
        assert!(matches!(snap.correlation, Err(StatsError::InsufficientData { .. })));
        for summary in &snap.categories {
            assert!(summary.bars.is_empty());
            assert!(matches!(summary.best, Err(StatsError::EmptyInput(_))));
        }
    }
}
