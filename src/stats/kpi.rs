use crate::data::filter::FilteredView;
use crate::data::model::NumericColumn;
use crate::error::StatsError;

/// Headline averages shown as metric tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    pub exam_score: f64,
    pub hours_studied: f64,
    pub attendance: f64,
    pub sleep_hours: f64,
}

impl Kpis {
    /// `(label, value)` pairs in display order.
    pub fn tiles(&self) -> [(&'static str, f64); 4] {
        [
            ("Avg Exam Score", self.exam_score),
            ("Avg Hours Studied", self.hours_studied),
            ("Avg Attendance", self.attendance),
            ("Avg Sleep Hours", self.sleep_hours),
        ]
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn column_mean(view: &FilteredView<'_>, column: NumericColumn) -> Result<f64, StatsError> {
    mean(&view.numeric_values(column)).ok_or_else(|| StatsError::EmptyInput(column.name().to_string()))
}

/// Means of the four KPI columns over the view.
pub fn compute_kpis(view: &FilteredView<'_>) -> Result<Kpis, StatsError> {
    if view.is_empty() {
        return Err(StatsError::EmptyInput("KPIs".to_string()));
    }
    Ok(Kpis {
        exam_score: column_mean(view, NumericColumn::ExamScore)?,
        hours_studied: column_mean(view, NumericColumn::HoursStudied)?,
        attendance: column_mean(view, NumericColumn::Attendance)?,
        sleep_hours: column_mean(view, NumericColumn::SleepHours)?,
    })
}
