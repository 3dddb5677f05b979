use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoryColumn, NumericColumn, StudentDataset, StudentRecord};
use crate::error::InvalidFilterError;

/// Numeric columns the sidebar exposes as range sliders.
pub const RANGE_COLUMNS: [NumericColumn; 2] = [NumericColumn::Attendance, NumericColumn::HoursStudied];

/// Categorical columns the sidebar exposes as multiselects.
pub const CATEGORY_FILTER_COLUMNS: [CategoryColumn; 3] = [
    CategoryColumn::TeacherQuality,
    CategoryColumn::SchoolType,
    CategoryColumn::Gender,
];

// ---------------------------------------------------------------------------
// NumericRange
// ---------------------------------------------------------------------------

/// Closed interval `[min, max]`; `min <= max` and both finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    min: f64,
    max: f64,
}

impl NumericRange {
    pub fn new(column: NumericColumn, min: f64, max: f64) -> Result<Self, InvalidFilterError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(InvalidFilterError::NonFiniteBound {
                column: column.name().to_string(),
            });
        }
        if min > max {
            return Err(InvalidFilterError::InvertedRange {
                column: column.name().to_string(),
                min,
                max,
            });
        }
        Ok(NumericRange { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

// ---------------------------------------------------------------------------
// FilterSpec
// ---------------------------------------------------------------------------

/// The user's current constraints. A record passes when every range contains
/// its value and every category set contains its label.
///
/// An empty category set means nothing is selected for that column, so
/// every record fails it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    ranges: BTreeMap<NumericColumn, NumericRange>,
    categories: BTreeMap<CategoryColumn, BTreeSet<String>>,
}

impl FilterSpec {
    /// Full observed ranges and every observed category: passes every record.
    pub fn unfiltered(dataset: &StudentDataset) -> Self {
        let ranges = RANGE_COLUMNS
            .iter()
            .filter_map(|&col| {
                let (min, max) = dataset.observed_range(col)?;
                Some((col, NumericRange { min, max }))
            })
            .collect();
        let categories = CATEGORY_FILTER_COLUMNS
            .iter()
            .map(|&col| (col, dataset.observed_values(col).clone()))
            .collect();
        FilterSpec { ranges, categories }
    }

    pub fn range(&self, column: NumericColumn) -> Option<NumericRange> {
        self.ranges.get(&column).copied()
    }

    pub fn selected(&self, column: CategoryColumn) -> Option<&BTreeSet<String>> {
        self.categories.get(&column)
    }

    /// Replace the range of a filterable numeric column.
    ///
    /// Bounds must be finite and ordered. Bounds past the observed extremes are
    /// kept as given; the sidebar sliders never produce them.
    pub fn set_range(
        &mut self,
        column: NumericColumn,
        min: f64,
        max: f64,
    ) -> Result<(), InvalidFilterError> {
        if !RANGE_COLUMNS.contains(&column) {
            return Err(InvalidFilterError::NotFilterable(column.name().to_string()));
        }
        let range = NumericRange::new(column, min, max)?;
        self.ranges.insert(column, range);
        Ok(())
    }

    /// Replace the permitted set of a filterable categorical column.
    /// Every value must have been observed in the dataset.
    pub fn set_categories<I, S>(
        &mut self,
        dataset: &StudentDataset,
        column: CategoryColumn,
        values: I,
    ) -> Result<(), InvalidFilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !CATEGORY_FILTER_COLUMNS.contains(&column) {
            return Err(InvalidFilterError::NotFilterable(column.name().to_string()));
        }
        let observed = dataset.observed_values(column);
        let mut selected = BTreeSet::new();
        for v in values {
            let v = v.into();
            if !observed.contains(&v) {
                return Err(InvalidFilterError::UnknownCategory {
                    column: column.name().to_string(),
                    value: v,
                });
            }
            selected.insert(v);
        }
        self.categories.insert(column, selected);
        Ok(())
    }

    /// Flip a single value in or out of a column's permitted set.
    pub fn toggle_category(
        &mut self,
        dataset: &StudentDataset,
        column: CategoryColumn,
        value: &str,
    ) -> Result<(), InvalidFilterError> {
        let mut selected = self.categories.get(&column).cloned().unwrap_or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.set_categories(dataset, column, selected)
    }

    pub fn select_all(
        &mut self,
        dataset: &StudentDataset,
        column: CategoryColumn,
    ) -> Result<(), InvalidFilterError> {
        self.set_categories(dataset, column, dataset.observed_values(column).iter().cloned())
    }

    pub fn select_none(
        &mut self,
        dataset: &StudentDataset,
        column: CategoryColumn,
    ) -> Result<(), InvalidFilterError> {
        self.set_categories(dataset, column, std::iter::empty::<String>())
    }

    /// Whether a single record satisfies every constraint.
    pub fn matches(&self, record: &StudentRecord) -> bool {
        self.ranges
            .iter()
            .all(|(&col, range)| range.contains(record.numeric(col)))
            && self
                .categories
                .iter()
                .all(|(&col, selected)| selected.contains(record.category(col)))
    }
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// The records of a dataset that pass a [`FilterSpec`], in original order.
/// Borrowed from the dataset; rebuilt on every filter change.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a StudentDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Every record of the dataset.
    pub fn all(dataset: &'a StudentDataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions of the surviving records in the dataset.
    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a StudentRecord> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Values of a numeric column over the view.
    pub fn numeric_values(&self, column: NumericColumn) -> Vec<f64> {
        self.records().map(|r| r.numeric(column)).collect()
    }
}

/// Keep the records that satisfy every constraint of `spec`.
pub fn apply_filter<'a>(dataset: &'a StudentDataset, spec: &FilterSpec) -> FilteredView<'a> {
    refine(&FilteredView::all(dataset), spec)
}

/// Re-apply a spec to an existing view.
pub fn refine<'a>(view: &FilteredView<'a>, spec: &FilterSpec) -> FilteredView<'a> {
    let records = view.dataset.records();
    let indices = view
        .indices
        .iter()
        .copied()
        .filter(|&i| spec.matches(&records[i]))
        .collect();
    FilteredView {
        dataset: view.dataset,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{record, sample_dataset};

    fn three_students() -> StudentDataset {
        StudentDataset::from_records(vec![
            record(70.0, 60.0),
            record(85.0, 75.0),
            record(90.0, 80.0),
        ])
    }

    #[test]
    fn unfiltered_spec_keeps_everything() {
        let ds = sample_dataset();
        let spec = FilterSpec::unfiltered(&ds);
        let view = apply_filter(&ds, &spec);
        assert_eq!(view.len(), ds.len());
        assert_eq!(view.indices(), (0..ds.len()).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn attendance_range_is_inclusive() {
        let ds = three_students();
        let mut spec = FilterSpec::unfiltered(&ds);
        spec.set_range(NumericColumn::Attendance, 85.0, 90.0).unwrap();

        let view = apply_filter(&ds, &spec);
        let kept: Vec<(f64, f64)> = view.records().map(|r| (r.attendance, r.exam_score)).collect();
        assert_eq!(kept, [(85.0, 75.0), (90.0, 80.0)]);
    }

    #[test]
    fn inverted_range_is_rejected_and_spec_unchanged() {
        let ds = three_students();
        let mut spec = FilterSpec::unfiltered(&ds);
        let before = spec.clone();
        let err = spec
            .set_range(NumericColumn::Attendance, 90.0, 80.0)
            .unwrap_err();
        assert!(matches!(err, InvalidFilterError::InvertedRange { .. }));
        assert_eq!(spec, before);
    }

    #[test]
    fn range_wider_than_observed_keeps_matching_records() {
        let ds = three_students();
        let mut spec = FilterSpec::unfiltered(&ds);
        spec.set_range(NumericColumn::Attendance, 80.0, 100.0).unwrap();
        let view = apply_filter(&ds, &spec);
        assert_eq!(view.indices(), [1, 2]);
    }

    #[test]
    fn non_finite_and_unfilterable_columns_are_rejected() {
        let ds = three_students();
        let mut spec = FilterSpec::unfiltered(&ds);
        assert!(matches!(
            spec.set_range(NumericColumn::Attendance, f64::NAN, 90.0),
            Err(InvalidFilterError::NonFiniteBound { .. })
        ));
        assert!(matches!(
            spec.set_range(NumericColumn::ExamScore, 60.0, 80.0),
            Err(InvalidFilterError::NotFilterable(_))
        ));
        assert!(matches!(
            spec.select_none(&ds, CategoryColumn::DistanceFromHome),
            Err(InvalidFilterError::NotFilterable(_))
        ));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::unfiltered(&ds);
        let err = spec
            .set_categories(&ds, CategoryColumn::Gender, ["Male", "Other"])
            .unwrap_err();
        assert_eq!(
            err,
            InvalidFilterError::UnknownCategory {
                column: "Gender".into(),
                value: "Other".into()
            }
        );
    }

    #[test]
    fn empty_category_selection_empties_the_view() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::unfiltered(&ds);
        spec.select_none(&ds, CategoryColumn::Gender).unwrap();
        assert!(apply_filter(&ds, &spec).is_empty());

        spec.select_all(&ds, CategoryColumn::Gender).unwrap();
        assert_eq!(apply_filter(&ds, &spec).len(), ds.len());
    }

    #[test]
    fn toggle_category_flips_membership() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::unfiltered(&ds);
        spec.toggle_category(&ds, CategoryColumn::SchoolType, "Private").unwrap();
        let view = apply_filter(&ds, &spec);
        assert!(view.records().all(|r| r.school_type == "Public"));
        assert_eq!(view.len(), 6);

        spec.toggle_category(&ds, CategoryColumn::SchoolType, "Private").unwrap();
        assert_eq!(apply_filter(&ds, &spec).len(), ds.len());
    }

    #[test]
    fn every_kept_record_matches_and_order_is_preserved() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::unfiltered(&ds);
        spec.set_range(NumericColumn::HoursStudied, 7.0, 12.0).unwrap();
        spec.set_categories(&ds, CategoryColumn::TeacherQuality, ["High", "Medium"])
            .unwrap();

        let view = apply_filter(&ds, &spec);
        assert!(view.len() <= ds.len());
        assert!(view.records().all(|r| spec.matches(r)));
        assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
        let dropped = ds.len() - view.len();
        let failing = ds.records().iter().filter(|r| !spec.matches(r)).count();
        assert_eq!(dropped, failing);
    }

    #[test]
    fn refining_is_idempotent() {
        let ds = sample_dataset();
        let mut spec = FilterSpec::unfiltered(&ds);
        spec.set_range(NumericColumn::Attendance, 66.0, 84.0).unwrap();
        spec.set_categories(&ds, CategoryColumn::Gender, ["Female"]).unwrap();

        let once = apply_filter(&ds, &spec);
        let twice = refine(&once, &spec);
        assert_eq!(once.indices(), twice.indices());
    }

    #[test]
    fn empty_dataset_spec_has_no_ranges() {
        let ds = StudentDataset::from_records(Vec::new());
        let spec = FilterSpec::unfiltered(&ds);
        assert_eq!(spec.range(NumericColumn::Attendance), None);
        assert!(apply_filter(&ds, &spec).is_empty());
    }
}
