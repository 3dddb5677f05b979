use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Integer drawn from a rounded, clamped normal.
    fn gauss_int(&mut self, mean: f64, std_dev: f64, lo: i64, hi: i64) -> i64 {
        (self.gauss(mean, std_dev).round() as i64).clamp(lo, hi)
    }

    fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[(self.next_u64() % choices.len() as u64) as usize]
    }
}

/// One CSV row; field order matches `HEADERS`.
#[derive(Serialize)]
struct Row {
    #[serde(rename = "Hours_Studied")]
    hours_studied: i64,
    #[serde(rename = "Attendance")]
    attendance: i64,
    #[serde(rename = "Teacher_Quality")]
    teacher_quality: &'static str,
    #[serde(rename = "School_Type")]
    school_type: &'static str,
    #[serde(rename = "Gender")]
    gender: &'static str,
    #[serde(rename = "Exam_Score")]
    exam_score: i64,
    #[serde(rename = "Sleep_Hours")]
    sleep_hours: i64,
    #[serde(rename = "Previous_Scores")]
    previous_scores: i64,
    #[serde(rename = "Tutoring_Sessions")]
    tutoring_sessions: i64,
    #[serde(rename = "Physical_Activity")]
    physical_activity: i64,
    #[serde(rename = "Parental_Education_Level")]
    parental_education_level: &'static str,
    #[serde(rename = "Distance_from_Home")]
    distance_from_home: &'static str,
}

const HEADERS: [&str; 12] = [
    "Hours_Studied",
    "Attendance",
    "Teacher_Quality",
    "School_Type",
    "Gender",
    "Exam_Score",
    "Sleep_Hours",
    "Previous_Scores",
    "Tutoring_Sessions",
    "Physical_Activity",
    "Parental_Education_Level",
    "Distance_from_Home",
];

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<Row> {
    (0..n)
        .map(|_| {
            let hours_studied = rng.gauss_int(20.0, 6.0, 1, 44);
            let attendance = rng.gauss_int(80.0, 11.5, 60, 100);
            let previous_scores = rng.gauss_int(75.0, 14.0, 50, 100);
            let tutoring_sessions = rng.gauss_int(1.5, 1.2, 0, 8);
            let sleep_hours = rng.gauss_int(7.0, 1.4, 4, 10);
            let physical_activity = rng.gauss_int(3.0, 1.0, 0, 6);
            let teacher_quality = rng.pick(&["Low", "Medium", "Medium", "High"]);
            let quality_bonus = match teacher_quality {
                "High" => 1.0,
                "Low" => -0.8,
                _ => 0.0,
            };

            let score = 40.0
                + 0.29 * hours_studied as f64
                + 0.2 * attendance as f64
                + 0.05 * previous_scores as f64
                + 0.5 * tutoring_sessions as f64
                + quality_bonus
                + rng.gauss(0.0, 2.0);

            Row {
                hours_studied,
                attendance,
                teacher_quality,
                school_type: rng.pick(&["Public", "Public", "Private"]),
                gender: rng.pick(&["Male", "Female"]),
                exam_score: (score.round() as i64).clamp(55, 100),
                sleep_hours,
                previous_scores,
                tutoring_sessions,
                physical_activity,
                parental_education_level: rng.pick(&["High School", "College", "Postgraduate"]),
                distance_from_home: rng.pick(&["Near", "Moderate", "Far"]),
            }
        })
        .collect()
}

fn to_batch(rows: &[Row]) -> RecordBatch {
    let ints = |f: fn(&Row) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let strs = |f: fn(&Row) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let score: ArrayRef = Arc::new(Float64Array::from(
        rows.iter().map(|r| r.exam_score as f64).collect::<Vec<_>>(),
    ));

    let columns: Vec<ArrayRef> = vec![
        ints(|r| r.hours_studied),
        ints(|r| r.attendance),
        strs(|r| r.teacher_quality),
        strs(|r| r.school_type),
        strs(|r| r.gender),
        score,
        ints(|r| r.sleep_hours),
        ints(|r| r.previous_scores),
        ints(|r| r.tutoring_sessions),
        ints(|r| r.physical_activity),
        strs(|r| r.parental_education_level),
        strs(|r| r.distance_from_home),
    ];
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .zip(&columns)
            .map(|(name, col)| Field::new(*name, col.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));

    RecordBatch::try_new(schema, columns).expect("Failed to create RecordBatch")
}

fn main() {
    let n: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2000);
    let mut rng = SimpleRng::new(42);
    let rows = generate(n, &mut rng);

    // Write CSV
    let csv_path = "student_sample.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Write Parquet
    let batch = to_batch(&rows);
    let parquet_path = "student_sample.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut pq = ArrowWriter::try_new(file, batch.schema(), None).expect("Failed to create writer");
    pq.write(&batch).expect("Failed to write batch");
    pq.close().expect("Failed to close writer");

    print_batches(&[batch.slice(0, rows.len().min(5))]).expect("Failed to print preview");
    println!("Wrote {} students to {csv_path} and {parquet_path}", rows.len());
}
