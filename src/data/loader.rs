use std::path::Path;
use std::time::Instant;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::util::pretty::pretty_format_batches;
use log::{debug, info, log_enabled, trace, Level};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{normalize_cell, Column, ColumnBuilder, SurveyTable};
use crate::error::DatasetError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a survey table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one respondent per line (the survey export)
/// * `.json`    – `[{ "Gender": "Female", "Age": 31, ... }, ...]`
/// * `.parquet` – one column per survey question
///
/// A path that does not exist is reported as [`DatasetError::DatasetNotFound`]
/// before any parsing is attempted.
pub fn load_file(path: &Path) -> Result<SurveyTable, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let started = Instant::now();
    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DatasetError::UnsupportedFormat(other.to_string())),
    };

    info!(
        "loaded {} rows × {} columns from {} in {:.2?}",
        table.n_rows(),
        table.column_names().len(),
        path.display(),
        started.elapsed()
    );
    Ok(table)
}

/// One [`ColumnBuilder`] per column; cells are interned as they stream in.
struct TableBuilder {
    names: Vec<String>,
    columns: Vec<ColumnBuilder>,
}

impl TableBuilder {
    fn new(names: Vec<String>) -> Self {
        let columns = names.iter().map(|_| ColumnBuilder::default()).collect();
        TableBuilder { names, columns }
    }

    fn column_index(&mut self, name: &str, n_rows: usize) -> usize {
        match self.names.iter().position(|n| n == name) {
            Some(i) => i,
            None => {
                self.names.push(name.to_string());
                self.columns.push(ColumnBuilder::with_missing(n_rows));
                self.names.len() - 1
            }
        }
    }

    fn finish(self) -> Result<SurveyTable, DatasetError> {
        let columns = self
            .names
            .into_iter()
            .zip(self.columns)
            .map(|(name, builder)| {
                let column = builder.finish();
                debug!(
                    "column '{name}': {}",
                    match &column {
                        Column::Numeric(_) => "numeric".to_string(),
                        Column::Categorical(c) => format!("{} categories", c.levels().len()),
                    }
                );
                (name, column)
            })
            .collect();
        SurveyTable::new(columns)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, comma-separated, one respondent
/// per record. Records with a different field count than the header fail.
fn load_csv(path: &Path) -> Result<SurveyTable, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut builder = TableBuilder::new(headers);
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        for (col_idx, value) in record.iter().enumerate() {
            builder.columns[col_idx].push(normalize_cell(value));
        }
    }

    builder.finish()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Gender": "Female", "Country": "United States", "Age": 31 },
///   ...
/// ]
/// ```
///
/// Keys absent from a record are missing values for that row.
fn load_json(path: &Path) -> Result<SurveyTable, DatasetError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root.as_array().ok_or_else(|| DatasetError::Malformed {
        row: 0,
        reason: "expected top-level JSON array".to_string(),
    })?;

    let mut builder = TableBuilder::new(Vec::new());

    for (row, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DatasetError::Malformed {
            row,
            reason: "record is not a JSON object".to_string(),
        })?;

        for (key, val) in obj {
            let col = builder.column_index(key, row);
            match val {
                JsonValue::Null => builder.columns[col].push(None),
                JsonValue::String(s) => builder.columns[col].push(normalize_cell(s)),
                other => builder.columns[col].push(Some(json_text(other).as_str())),
            }
        }
        // pad columns this record did not mention
        for column in &mut builder.columns {
            if column.len() == row {
                column.push(None);
            }
        }
    }

    builder.finish()
}

/// Text form of a non-string JSON scalar.
fn json_text(val: &JsonValue) -> String {
    match val {
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per survey question.
///
/// Every column is cast to text and then typed by the same rules as CSV, so
/// files written by **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`) load identically. Pandas index columns are skipped.
fn load_parquet(path: &Path) -> Result<SurveyTable, DatasetError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let keep: Vec<(usize, String)> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.name().starts_with("__index_level_"))
        .map(|(i, f)| (i, f.name().clone()))
        .collect();

    let reader = builder.build()?;
    let mut table = TableBuilder::new(keep.iter().map(|(_, name)| name.clone()).collect());

    for (batch_no, batch_result) in reader.enumerate() {
        let batch = batch_result?;
        if batch_no == 0 && log_enabled!(Level::Trace) {
            let head = batch.slice(0, batch.num_rows().min(5));
            trace!("first rows of {}:\n{}", path.display(), pretty_format_batches(&[head])?);
        }
        for (slot, (col_idx, _)) in keep.iter().enumerate() {
            let text = cast(batch.column(*col_idx), &DataType::Utf8)?;
            let strings = text.as_string::<i32>();
            let column = &mut table.columns[slot];
            column.reserve(strings.len());
            for row in 0..strings.len() {
                if strings.is_null(row) {
                    column.push(None);
                } else {
                    column.push(normalize_cell(strings.value(row)));
                }
            }
        }
    }

    table.finish()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::Column;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_file_is_dataset_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("Mental Health Dataset.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::DatasetNotFound { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "survey.xlsx", "");
        assert!(matches!(
            load_file(&path),
            Err(DatasetError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn csv_columns_are_typed_and_missing_values_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "survey.csv",
            "Age,Gender,Growing_Stress\n25,Female,Yes\n,Male, No \n40,Female,\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(
            table.column("Age").unwrap(),
            &Column::Numeric(vec![Some(25.0), None, Some(40.0)])
        );
        let stress = table.categorical("Growing_Stress").unwrap();
        assert_eq!(stress.levels(), &["Yes".to_string(), "No".to_string()]);
        assert_eq!(stress.get(2), None);
    }

    #[test]
    fn large_csv_interns_repeated_answers() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = String::from("Age,Country,treatment\n");
        for i in 0..3000 {
            let country = ["India", "Canada", "Poland"][i % 3];
            let age = if i % 100 == 0 { "inf" } else { "30" };
            contents.push_str(&format!("{age},{country},{}\n", if i % 2 == 0 { "Yes" } else { "No" }));
        }
        let path = write_file(&dir, "survey.csv", &contents);

        let table = load_file(&path).unwrap();
        assert_eq!(table.n_rows(), 3000);
        let country = table.categorical("Country").unwrap();
        assert_eq!(country.levels(), &["India", "Canada", "Poland"]);
        assert_eq!(country.level_counts(), vec![1000, 1000, 1000]);
        let ages = table.numeric("Age").unwrap();
        assert_eq!(ages.iter().filter(|a| a.is_none()).count(), 30);
        assert!(ages.iter().flatten().all(|a| a.is_finite()));
    }

    #[test]
    fn ragged_csv_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "survey.csv", "Gender,Country\nMale,India\nFemale\n");
        assert!(matches!(load_file(&path), Err(DatasetError::Csv(_))));
    }

    #[test]
    fn json_records_pad_absent_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "survey.json",
            r#"[{"Gender": "Male", "Age": 30}, {"Gender": "Female"}, {"Age": null, "Country": "India"}]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(
            table.column("Age").unwrap(),
            &Column::Numeric(vec![Some(30.0), None, None])
        );
        assert_eq!(table.categorical("Country").unwrap().get(2), Some("India"));
        assert_eq!(table.categorical("Country").unwrap().get(0), None);
    }

    #[test]
    fn json_must_be_an_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "survey.json", r#"{"Gender": "Male"}"#);
        assert!(matches!(load_file(&path), Err(DatasetError::Malformed { .. })));
    }

    #[test]
    fn parquet_columns_round_through_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Age", arrow::datatypes::DataType::Int64, true),
            Field::new("Mood_Swings", arrow::datatypes::DataType::Utf8, true),
            Field::new("__index_level_0__", arrow::datatypes::DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![Some(22), None])),
                Arc::new(StringArray::from(vec![Some("High"), Some("Low")])),
                Arc::new(Int64Array::from(vec![0, 1])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names(), &["Age".to_string(), "Mood_Swings".to_string()]);
        assert_eq!(
            table.column("Age").unwrap(),
            &Column::Numeric(vec![Some(22.0), None])
        );
        assert_eq!(table.categorical("Mood_Swings").unwrap().get(1), Some("Low"));
    }
}
