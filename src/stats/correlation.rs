use std::cmp::Ordering;

use crate::data::filter::FilteredView;
use crate::data::model::NumericColumn;
use crate::error::StatsError;

/// Factors correlated against the exam score, in heatmap order.
pub const FACTOR_COLUMNS: [NumericColumn; 6] = [
    NumericColumn::Attendance,
    NumericColumn::HoursStudied,
    NumericColumn::PreviousScores,
    NumericColumn::TutoringSessions,
    NumericColumn::PhysicalActivity,
    NumericColumn::SleepHours,
];

/// Pearson correlation coefficient of two equally long samples.
///
/// Fails when there are fewer than two pairs or either side is constant;
/// the coefficient is undefined there and no number is returned.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    let insufficient = |reason: &str| StatsError::InsufficientData {
        column: "pearson".to_string(),
        reason: reason.to_string(),
    };
    if xs.len() != ys.len() {
        return Err(insufficient("samples differ in length"));
    }
    if xs.len() < 2 {
        return Err(insufficient("fewer than 2 records"));
    }
    // Checked on the raw values: the mean of a constant fractional column can
    // round away from the constant, leaving a tiny non-zero variance.
    if is_constant(xs) || is_constant(ys) {
        return Err(insufficient("zero variance"));
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return Err(insufficient("zero variance"));
    }
    Ok((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Names the column pair in an undefined-coefficient error.
fn label_pair(
    result: Result<f64, StatsError>,
    a: NumericColumn,
    b: NumericColumn,
) -> Result<f64, StatsError> {
    result.map_err(|e| match e {
        StatsError::InsufficientData { reason, .. } => StatsError::InsufficientData {
            column: format!("{} vs {}", a.name(), b.name()),
            reason,
        },
        other => other,
    })
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// Square, symmetric correlation matrix. `None` marks an undefined cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: NumericColumn, b: NumericColumn) -> Option<f64> {
        let i = self.columns.iter().position(|&c| c == a)?;
        let j = self.columns.iter().position(|&c| c == b)?;
        self.values[i][j]
    }
}

/// Pairwise correlations over the view.
///
/// The diagonal is exactly 1.0 for columns with non-zero variance and
/// undefined otherwise.
pub fn correlation_matrix(
    view: &FilteredView<'_>,
    columns: &[NumericColumn],
) -> Result<CorrelationMatrix, StatsError> {
    if view.len() < 2 {
        return Err(StatsError::InsufficientData {
            column: "correlation matrix".to_string(),
            reason: format!("{} record(s) after filtering, need at least 2", view.len()),
        });
    }

    let samples: Vec<Vec<f64>> = columns.iter().map(|&c| view.numeric_values(c)).collect();
    let n = columns.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let (a, b) = (columns[i], columns[j]);
            let result = if i == j {
                pearson(&samples[i], &samples[i]).map(|_| 1.0)
            } else {
                pearson(&samples[i], &samples[j])
            };
            let r = match label_pair(result, a, b) {
                Ok(r) => Some(r),
                Err(e) => {
                    log::debug!("{e}");
                    None
                }
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

// ---------------------------------------------------------------------------
// Ranking against a target
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationReport {
    /// `(column, coefficient with target)`, highest first; undefined entries last.
    pub ranking: Vec<(NumericColumn, Option<f64>)>,
    /// Full matrix over `columns + [target]`, for the heatmap.
    pub matrix: CorrelationMatrix,
}

/// Correlate each of `columns` (and the target itself) with `target`.
pub fn compute_correlation(
    view: &FilteredView<'_>,
    columns: &[NumericColumn],
    target: NumericColumn,
) -> Result<CorrelationReport, StatsError> {
    let mut all: Vec<NumericColumn> = columns.iter().copied().filter(|&c| c != target).collect();
    all.push(target);

    let matrix = correlation_matrix(view, &all)?;
    let mut ranking: Vec<(NumericColumn, Option<f64>)> =
        all.iter().map(|&c| (c, matrix.get(c, target))).collect();
    // Stable: equal coefficients keep column order.
    ranking.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    Ok(CorrelationReport { ranking, matrix })
}
