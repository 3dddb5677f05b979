use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column identifiers
// ---------------------------------------------------------------------------

/// Numeric columns of the student dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericColumn {
    Attendance,
    HoursStudied,
    ExamScore,
    SleepHours,
    PreviousScores,
    TutoringSessions,
    PhysicalActivity,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 7] = [
        NumericColumn::Attendance,
        NumericColumn::HoursStudied,
        NumericColumn::ExamScore,
        NumericColumn::SleepHours,
        NumericColumn::PreviousScores,
        NumericColumn::TutoringSessions,
        NumericColumn::PhysicalActivity,
    ];

    /// Header name as it appears in the input file.
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::Attendance => "Attendance",
            NumericColumn::HoursStudied => "Hours_Studied",
            NumericColumn::ExamScore => "Exam_Score",
            NumericColumn::SleepHours => "Sleep_Hours",
            NumericColumn::PreviousScores => "Previous_Scores",
            NumericColumn::TutoringSessions => "Tutoring_Sessions",
            NumericColumn::PhysicalActivity => "Physical_Activity",
        }
    }

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            NumericColumn::Attendance => "Attendance",
            NumericColumn::HoursStudied => "Hours Studied",
            NumericColumn::ExamScore => "Exam Score",
            NumericColumn::SleepHours => "Sleep Hours",
            NumericColumn::PreviousScores => "Previous Scores",
            NumericColumn::TutoringSessions => "Tutoring Sessions",
            NumericColumn::PhysicalActivity => "Physical Activity",
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Categorical columns of the student dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryColumn {
    TeacherQuality,
    ParentalEducationLevel,
    SchoolType,
    Gender,
    DistanceFromHome,
}

impl CategoryColumn {
    /// Also the order in which the dashboard lists category breakdowns.
    pub const ALL: [CategoryColumn; 5] = [
        CategoryColumn::TeacherQuality,
        CategoryColumn::ParentalEducationLevel,
        CategoryColumn::SchoolType,
        CategoryColumn::Gender,
        CategoryColumn::DistanceFromHome,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoryColumn::TeacherQuality => "Teacher_Quality",
            CategoryColumn::ParentalEducationLevel => "Parental_Education_Level",
            CategoryColumn::SchoolType => "School_Type",
            CategoryColumn::Gender => "Gender",
            CategoryColumn::DistanceFromHome => "Distance_from_Home",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryColumn::TeacherQuality => "Teacher Quality",
            CategoryColumn::ParentalEducationLevel => "Parental Education Level",
            CategoryColumn::SchoolType => "School Type",
            CategoryColumn::Gender => "Gender",
            CategoryColumn::DistanceFromHome => "Distance from Home",
        }
    }
}

impl fmt::Display for CategoryColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every header the input file must carry.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    NumericColumn::ALL
        .iter()
        .map(|c| c.name())
        .chain(CategoryColumn::ALL.iter().map(|c| c.name()))
}

// ---------------------------------------------------------------------------
// StudentRecord – one row of the input file
// ---------------------------------------------------------------------------

/// One student's observation.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub attendance: f64,
    pub hours_studied: f64,
    pub exam_score: f64,
    pub sleep_hours: f64,
    pub previous_scores: f64,
    pub tutoring_sessions: f64,
    pub physical_activity: f64,
    pub teacher_quality: String,
    pub parental_education_level: String,
    pub school_type: String,
    pub gender: String,
    pub distance_from_home: String,
}

impl StudentRecord {
    pub fn numeric(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::Attendance => self.attendance,
            NumericColumn::HoursStudied => self.hours_studied,
            NumericColumn::ExamScore => self.exam_score,
            NumericColumn::SleepHours => self.sleep_hours,
            NumericColumn::PreviousScores => self.previous_scores,
            NumericColumn::TutoringSessions => self.tutoring_sessions,
            NumericColumn::PhysicalActivity => self.physical_activity,
        }
    }

    pub fn category(&self, column: CategoryColumn) -> &str {
        match column {
            CategoryColumn::TeacherQuality => &self.teacher_quality,
            CategoryColumn::ParentalEducationLevel => &self.parental_education_level,
            CategoryColumn::SchoolType => &self.school_type,
            CategoryColumn::Gender => &self.gender,
            CategoryColumn::DistanceFromHome => &self.distance_from_home,
        }
    }
}

// ---------------------------------------------------------------------------
// StudentDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column summaries.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct StudentDataset {
    records: Vec<StudentRecord>,
    /// Observed `(min, max)` per numeric column; absent when the dataset is empty.
    ranges: BTreeMap<NumericColumn, (f64, f64)>,
    /// Sorted distinct values per categorical column.
    categories: BTreeMap<CategoryColumn, BTreeSet<String>>,
}

impl StudentDataset {
    /// Build column summaries from the loaded records.
    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        let mut ranges: BTreeMap<NumericColumn, (f64, f64)> = BTreeMap::new();
        let mut categories: BTreeMap<CategoryColumn, BTreeSet<String>> = CategoryColumn::ALL
            .iter()
            .map(|&c| (c, BTreeSet::new()))
            .collect();

        for rec in &records {
            for col in NumericColumn::ALL {
                let v = rec.numeric(col);
                ranges
                    .entry(col)
                    .and_modify(|(lo, hi)| {
                        *lo = lo.min(v);
                        *hi = hi.max(v);
                    })
                    .or_insert((v, v));
            }
            for col in CategoryColumn::ALL {
                categories
                    .entry(col)
                    .or_default()
                    .insert(rec.category(col).to_string());
            }
        }

        StudentDataset {
            records,
            ranges,
            categories,
        }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed `(min, max)` of a numeric column.
    pub fn observed_range(&self, column: NumericColumn) -> Option<(f64, f64)> {
        self.ranges.get(&column).copied()
    }

    /// Distinct observed values of a categorical column.
    pub fn observed_values(&self, column: CategoryColumn) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.categories.get(&column).unwrap_or(&EMPTY)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Record builder used across test modules.
    pub fn record(attendance: f64, exam_score: f64) -> StudentRecord {
        StudentRecord {
            attendance,
            hours_studied: 20.0,
            exam_score,
            sleep_hours: 7.0,
            previous_scores: 70.0,
            tutoring_sessions: 1.0,
            physical_activity: 3.0,
            teacher_quality: "Medium".into(),
            parental_education_level: "College".into(),
            school_type: "Public".into(),
            gender: "Male".into(),
            distance_from_home: "Near".into(),
        }
    }

    /// Twelve varied records, deterministic.
    pub fn sample_dataset() -> StudentDataset {
        let qualities = ["Low", "Medium", "High"];
        let schools = ["Public", "Private"];
        let genders = ["Male", "Female"];
        let education = ["High School", "College", "Postgraduate"];
        let distance = ["Near", "Moderate", "Far"];

        let records = (0..12)
            .map(|i| {
                let f = i as f64;
                StudentRecord {
                    attendance: 60.0 + 3.0 * f,
                    hours_studied: 5.0 + ((i * 7) % 11) as f64,
                    exam_score: 58.0 + 1.5 * f + (i % 3) as f64,
                    sleep_hours: 5.0 + (i % 4) as f64,
                    previous_scores: 50.0 + ((i * 5) % 13) as f64 * 3.0,
                    tutoring_sessions: (i % 5) as f64,
                    physical_activity: (i % 6) as f64,
                    teacher_quality: qualities[i % 3].into(),
                    parental_education_level: education[(i / 2) % 3].into(),
                    school_type: schools[i % 2].into(),
                    gender: genders[(i / 3) % 2].into(),
                    distance_from_home: distance[(i / 4) % 3].into(),
                }
            })
            .collect();
        StudentDataset::from_records(records)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{record, sample_dataset};
    use super::*;

    #[test]
    fn ranges_and_categories_are_indexed() {
        let ds = StudentDataset::from_records(vec![record(70.0, 60.0), record(90.0, 80.0)]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.observed_range(NumericColumn::Attendance), Some((70.0, 90.0)));
        assert_eq!(ds.observed_range(NumericColumn::ExamScore), Some((60.0, 80.0)));
        let genders: Vec<&str> = ds
            .observed_values(CategoryColumn::Gender)
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(genders, ["Male"]);
    }

    #[test]
    fn empty_dataset_has_no_ranges() {
        let ds = StudentDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.observed_range(NumericColumn::Attendance), None);
        assert!(ds.observed_values(CategoryColumn::SchoolType).is_empty());
    }

    #[test]
    fn category_sets_are_sorted() {
        let ds = sample_dataset();
        let q: Vec<&str> = ds
            .observed_values(CategoryColumn::TeacherQuality)
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(q, ["High", "Low", "Medium"]);
    }

    #[test]
    fn required_columns_cover_every_field() {
        let cols: Vec<&str> = required_columns().collect();
        assert_eq!(cols.len(), 12);
        assert!(cols.contains(&"Distance_from_Home"));
        assert!(cols.contains(&"Hours_Studied"));
    }
}
