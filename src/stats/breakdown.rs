use std::collections::BTreeMap;

use crate::data::filter::FilteredView;
use crate::data::model::{CategoryColumn, NumericColumn};
use crate::error::StatsError;

/// Mean of the target column within one category value.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMean {
    pub value: String,
    pub mean: f64,
    pub count: usize,
}

/// Group the view by `category` and average `target` in each group.
///
/// One entry per value present in the view, sorted by category value.
pub fn category_breakdown(
    view: &FilteredView<'_>,
    category: CategoryColumn,
    target: NumericColumn,
) -> Vec<CategoryMean> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for rec in view.records() {
        let entry = groups.entry(rec.category(category)).or_insert((0.0, 0));
        entry.0 += rec.numeric(target);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(value, (sum, count))| CategoryMean {
            value: value.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// Chart order: highest mean first, ties by category value.
pub fn sorted_by_mean_desc(breakdown: &[CategoryMean]) -> Vec<CategoryMean> {
    let mut sorted = breakdown.to_vec();
    sorted.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.value.cmp(&b.value)));
    sorted
}

/// The entry with the highest mean. Equal means go to the
/// lexicographically smallest category value.
pub fn best_category(breakdown: &[CategoryMean]) -> Result<&CategoryMean, StatsError> {
    breakdown
        .iter()
        .reduce(|best, cur| {
            let better = cur.mean > best.mean || (cur.mean == best.mean && cur.value < best.value);
            if better {
                cur
            } else {
                best
            }
        })
        .ok_or_else(|| StatsError::EmptyInput("category breakdown".to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{apply_filter, FilterSpec};
    use crate::data::model::fixtures::sample_dataset;

    fn entry(value: &str, mean: f64) -> CategoryMean {
        CategoryMean {
            value: value.into(),
            mean,
            count: 1,
        }
    }

    #[test]
    fn groups_cover_exactly_the_present_values() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::unfiltered(&ds);
        spec.set_categories(&ds, CategoryColumn::TeacherQuality, ["High", "Low"])
            .unwrap();
        let view = apply_filter(&ds, &spec);

        for col in CategoryColumn::ALL {
            let breakdown = category_breakdown(&view, col, NumericColumn::ExamScore);
            let got: BTreeSet<&str> = breakdown.iter().map(|e| e.value.as_str()).collect();
            let want: BTreeSet<&str> = view.records().map(|r| r.category(col)).collect();
            assert_eq!(got, want, "{col}");
            assert_eq!(breakdown.iter().map(|e| e.count).sum::<usize>(), view.len());
        }

        let quality = category_breakdown(&view, CategoryColumn::TeacherQuality, NumericColumn::ExamScore);
        assert!(quality.iter().all(|e| e.value != "Medium"));
    }

    #[test]
    fn group_means_are_correct() {
        let ds = sample_dataset();
        let view = apply_filter(&ds, &FilterSpec::unfiltered(&ds));
        let breakdown = category_breakdown(&view, CategoryColumn::SchoolType, NumericColumn::ExamScore);

        for e in &breakdown {
            let scores: Vec<f64> = view
                .records()
                .filter(|r| r.school_type == e.value)
                .map(|r| r.exam_score)
                .collect();
            let expected = scores.iter().sum::<f64>() / scores.len() as f64;
            assert!((e.mean - expected).abs() < 1e-9);
            assert_eq!(e.count, scores.len());
        }
    }

    #[test]
    fn best_is_at_least_every_other_entry() {
        let ds = sample_dataset();
        let view = apply_filter(&ds, &FilterSpec::unfiltered(&ds));
        for col in CategoryColumn::ALL {
            let breakdown = category_breakdown(&view, col, NumericColumn::ExamScore);
            let best = best_category(&breakdown).unwrap();
            assert!(breakdown.iter().all(|e| best.mean >= e.mean));
        }
    }

    #[test]
    fn ties_resolve_to_smallest_value() {
        let breakdown = vec![entry("Public", 70.0), entry("Private", 70.0), entry("Home", 65.0)];
        assert_eq!(best_category(&breakdown).unwrap().value, "Private");
    }

    #[test]
    fn empty_breakdown_is_an_error() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::unfiltered(&ds);
        spec.select_none(&ds, CategoryColumn::Gender).unwrap();
        let view = apply_filter(&ds, &spec);

        let breakdown = category_breakdown(&view, CategoryColumn::Gender, NumericColumn::ExamScore);
        assert!(breakdown.is_empty());
        assert!(matches!(best_category(&breakdown), Err(StatsError::EmptyInput(_))));
    }

    #[test]
    fn chart_order_is_descending() {
        let sorted = sorted_by_mean_desc(&[entry("A", 60.0), entry("C", 80.0), entry("B", 80.0)]);
        let order: Vec<&str> = sorted.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(order, ["B", "C", "A"]);
    }
}
