//! Writes a synthetic survey export for trying the dashboard without the
//! real dataset.
//!
//! ```text
//! generate_sample [ROWS] [OUTPUT] [--parquet]
//! ```

use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use silent_struggle::data::schema::*;

const GENDERS: &[(&str, f64)] = &[("Male", 0.8), ("Female", 0.18), ("Non-binary", 0.02)];
const COUNTRIES: &[(&str, f64)] = &[
    ("United States", 0.55),
    ("United Kingdom", 0.15),
    ("Canada", 0.08),
    ("India", 0.06),
    ("Australia", 0.05),
    ("Germany", 0.05),
    ("Netherlands", 0.04),
    ("Poland", 0.015),
    ("Greece", 0.005),
];
const OCCUPATIONS: &[(&str, f64)] = &[
    ("Housewife", 0.23),
    ("Student", 0.21),
    ("Corporate", 0.21),
    ("Others", 0.18),
    ("Business", 0.17),
];
const DAYS: &[(&str, f64)] = &[
    ("1-14 days", 0.22),
    ("15-30 days", 0.2),
    ("31-60 days", 0.2),
    ("More than 2 months", 0.2),
    ("Go out Every day", 0.18),
];
const MOODS: &[(&str, f64)] = &[("Low", 0.33), ("Medium", 0.34), ("High", 0.33)];
const YES_NO: &[(&str, f64)] = &[("Yes", 0.5), ("No", 0.5)];
const YES_NO_MAYBE: &[(&str, f64)] = &[("Yes", 0.35), ("No", 0.35), ("Maybe", 0.3)];
const CARE: &[(&str, f64)] = &[("No", 0.4), ("Yes", 0.33), ("Not sure", 0.27)];

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    /// Pick a label according to its weight.
    fn choose(&mut self, weighted: &'static [(&'static str, f64)]) -> &'static str {
        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        let mut draw = self.next_f64() * total;
        for &(label, weight) in weighted {
            if draw < weight {
                return label;
            }
            draw -= weight;
        }
        weighted[weighted.len() - 1].0
    }

    /// `Yes` with probability `p`, else `No`.
    fn yes(&mut self, p: f64) -> &'static str {
        if self.next_f64() < p {
            YES
        } else {
            NO
        }
    }
}

fn respondent(rng: &mut SimpleRng) -> Vec<String> {
    let occupation = rng.choose(OCCUPATIONS);
    let days = rng.choose(DAYS);
    let indoors_weight = match days {
        "More than 2 months" => 0.2,
        "31-60 days" => 0.1,
        "Go out Every day" => -0.1,
        _ => 0.0,
    };
    let stress_p = match occupation {
        "Student" | "Corporate" => 0.45,
        _ => 0.35,
    } + indoors_weight;
    let growing = if rng.next_f64() < 0.2 {
        MAYBE
    } else {
        rng.yes(stress_p)
    };
    // Unknown ages are left blank.
    let age = if rng.next_f64() < 0.05 {
        String::new()
    } else {
        let base = if growing == YES { 29.0 } else { 33.0 };
        ((base + (rng.next_f64() - 0.5) * 24.0).round() as i64).to_string()
    };
    let mood = if indoors_weight > 0.0 && rng.next_f64() < 0.3 {
        "High"
    } else {
        rng.choose(MOODS)
    };

    let mut row = Vec::with_capacity(SURVEY_COLUMNS.len());
    for &column in SURVEY_COLUMNS {
        let value = match column {
            AGE => age.clone(),
            GENDER => rng.choose(GENDERS).to_string(),
            COUNTRY => rng.choose(COUNTRIES).to_string(),
            OCCUPATION => occupation.to_string(),
            SELF_EMPLOYED => rng.yes(0.1).to_string(),
            DAYS_INDOORS => days.to_string(),
            GROWING_STRESS => growing.to_string(),
            MOOD_SWINGS => mood.to_string(),
            MENTAL_HEALTH_HISTORY | CHANGES_HABITS | WORK_INTEREST | SOCIAL_WEAKNESS
            | MENTAL_HEALTH_INTERVIEW => rng.choose(YES_NO_MAYBE).to_string(),
            CARE_OPTIONS => rng.choose(CARE).to_string(),
            _ => rng.choose(YES_NO).to_string(),
        };
        row.push(value);
    }
    row
}

fn write_csv(path: &str, rows: &[Vec<String>]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");
    writer.write_record(SURVEY_COLUMNS).expect("Failed to write header");
    for row in rows {
        writer.write_record(row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush writer");
}

fn write_parquet(path: &str, rows: &[Vec<String>]) {
    let schema = Arc::new(Schema::new(
        SURVEY_COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = (0..SURVEY_COLUMNS.len())
        .map(|col| {
            let values: StringArray = rows
                .iter()
                .map(|row| Some(row[col].as_str()).filter(|v| !v.is_empty()))
                .collect();
            Arc::new(values) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");
    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut parquet = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--parquet" {
            parquet = true;
        } else {
            positional.push(arg);
        }
    }
    let n_rows: usize = positional
        .first()
        .map(|n| n.parse().expect("ROWS must be a positive integer"))
        .unwrap_or(2000);
    let default_output = if parquet {
        "Mental Health Dataset.parquet"
    } else {
        "Mental Health Dataset.csv"
    };
    let output_path = positional.get(1).map(String::as_str).unwrap_or(default_output);

    let mut rng = SimpleRng::new(42);
    let rows: Vec<Vec<String>> = (0..n_rows).map(|_| respondent(&mut rng)).collect();

    if parquet {
        write_parquet(output_path, &rows);
    } else {
        write_csv(output_path, &rows);
    }

    println!("Wrote {n_rows} respondents to {output_path}");
}
