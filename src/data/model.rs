use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::{AggregateError, DatasetError};

/// Tokens read as "no value", mirroring the defaults of common dataframe readers.
const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// Trim a raw cell and map missing-value tokens to `None`.
pub(crate) fn normalize_cell(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if MISSING_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(trimmed)
    }
}

// ---------------------------------------------------------------------------
// CategoricalColumn – interned text column
// ---------------------------------------------------------------------------

/// A text column stored as distinct levels plus one code per row.
///
/// Levels are kept in order of first appearance, which is the "original
/// category order" used as a tie-break throughout the aggregations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoricalColumn {
    levels: Vec<String>,
    codes: Vec<Option<u32>>,
}

impl CategoricalColumn {
    /// Intern a sequence of optional labels.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut builder = ColumnBuilder::default();
        for value in values {
            builder.push(value.as_ref().map(AsRef::as_ref));
        }
        builder.into_categorical()
    }

    /// Distinct labels in first-appearance order.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Per-row level codes; `None` is a missing value.
    pub fn codes(&self) -> &[Option<u32>] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Label at `row`, or `None` when missing or out of range.
    pub fn get(&self, row: usize) -> Option<&str> {
        let code = (*self.codes.get(row)?)?;
        Some(self.levels[code as usize].as_str())
    }

    pub fn code_of(&self, label: &str) -> Option<u32> {
        self.levels
            .iter()
            .position(|l| l == label)
            .map(|p| p as u32)
    }

    /// Number of rows per level, indexed by level code.
    pub fn level_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.levels.len()];
        for code in self.codes.iter().flatten() {
            counts[*code as usize] += 1;
        }
        counts
    }

    /// Derive a new column by mapping every level through `f`.
    ///
    /// Missing rows stay missing. Levels that map to the same label merge.
    pub fn relabel<F>(&self, f: F) -> CategoricalColumn
    where
        F: Fn(&str) -> String,
    {
        let mut levels: Vec<String> = Vec::new();
        let remap: Vec<u32> = self
            .levels
            .iter()
            .map(|level| {
                let mapped = f(level);
                match levels.iter().position(|l| *l == mapped) {
                    Some(p) => p as u32,
                    None => {
                        levels.push(mapped);
                        (levels.len() - 1) as u32
                    }
                }
            })
            .collect();
        let codes = self
            .codes
            .iter()
            .map(|c| c.map(|code| remap[code as usize]))
            .collect();
        CategoricalColumn { levels, codes }
    }
}

// ---------------------------------------------------------------------------
// Column – one typed column of the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Categorical(CategoricalColumn),
    Numeric(Vec<Option<f64>>),
}

impl Column {
    /// Build a column from already-normalized cells.
    ///
    /// The column is numeric when every non-missing cell parses as a number
    /// and at least one cell is present; otherwise it is categorical.
    pub fn infer<S: AsRef<str>>(cells: &[Option<S>]) -> Column {
        let mut builder = ColumnBuilder::default();
        for cell in cells {
            builder.push(cell.as_ref().map(AsRef::as_ref));
        }
        builder.finish()
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Categorical(c) => c.len(),
            Column::Numeric(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a numeric cell. NaN and infinities read as missing.
fn parse_number(s: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    s.parse::<f64>().map(|v| v.is_finite().then_some(v))
}

// ---------------------------------------------------------------------------
// ColumnBuilder – streaming interner
// ---------------------------------------------------------------------------

/// Accumulates one column cell by cell. Only distinct labels are kept as
/// strings; the column is typed at [`ColumnBuilder::finish`].
#[derive(Debug, Default)]
pub(crate) struct ColumnBuilder {
    lookup: HashMap<String, u32>,
    levels: Vec<String>,
    codes: Vec<Option<u32>>,
}

impl ColumnBuilder {
    /// A builder whose first `n_rows` rows are already missing.
    pub(crate) fn with_missing(n_rows: usize) -> Self {
        ColumnBuilder {
            codes: vec![None; n_rows],
            ..ColumnBuilder::default()
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.codes.len()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.codes.reserve(additional);
    }

    /// Append one normalized cell.
    pub(crate) fn push(&mut self, cell: Option<&str>) {
        let code = cell.map(|label| match self.lookup.get(label) {
            Some(&code) => code,
            None => {
                let code = self.levels.len() as u32;
                self.levels.push(label.to_string());
                self.lookup.insert(label.to_string(), code);
                code
            }
        });
        self.codes.push(code);
    }

    fn into_categorical(self) -> CategoricalColumn {
        CategoricalColumn {
            levels: self.levels,
            codes: self.codes,
        }
    }

    /// Numeric when there is at least one level and every level parses.
    pub(crate) fn finish(self) -> Column {
        let parsed: Option<Vec<Option<f64>>> = if self.levels.is_empty() {
            None
        } else {
            self.levels.iter().map(|l| parse_number(l).ok()).collect()
        };
        match parsed {
            Some(parsed) => Column::Numeric(
                self.codes
                    .iter()
                    .map(|code| code.and_then(|i| parsed[i as usize]))
                    .collect(),
            ),
            None => Column::Categorical(self.into_categorical()),
        }
    }
}

/// Render a number the way it would have been written in the source file.
fn number_label(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// SurveyTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Immutable, column-oriented survey responses. Row identity is position.
///
/// Transforms never edit the table; anything derived (re-ordered categories,
/// bucketed labels) is a fresh column owned by the transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyTable {
    names: Vec<String>,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    n_rows: usize,
}

impl SurveyTable {
    /// Assemble a table from named columns of equal length.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self, DatasetError> {
        let n_rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut cols = Vec::with_capacity(columns.len());
        let mut index = HashMap::new();
        for (name, column) in columns {
            if column.len() != n_rows {
                return Err(DatasetError::Malformed {
                    row: column.len().min(n_rows),
                    reason: format!(
                        "column '{name}' has {} rows, expected {n_rows}",
                        column.len()
                    ),
                });
            }
            index.insert(name.clone(), cols.len());
            names.push(name);
            cols.push(column);
        }
        Ok(SurveyTable {
            names,
            columns: cols,
            index,
            n_rows,
        })
    }

    /// Build a table from a header and text records, applying the same
    /// missing-value and typing rules as the file loaders.
    pub fn from_records<H, R, S>(headers: &[H], records: &[R]) -> Result<Self, DatasetError>
    where
        H: AsRef<str>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut builders: Vec<ColumnBuilder> =
            (0..headers.len()).map(|_| ColumnBuilder::default()).collect();
        for (row_no, record) in records.iter().enumerate() {
            let record = record.as_ref();
            if record.len() != headers.len() {
                return Err(DatasetError::Malformed {
                    row: row_no,
                    reason: format!("found {} fields, expected {}", record.len(), headers.len()),
                });
            }
            for (col, value) in record.iter().enumerate() {
                builders[col].push(normalize_cell(value.as_ref()));
            }
        }
        let columns = headers
            .iter()
            .zip(builders)
            .map(|(h, b)| (h.as_ref().to_string(), b.finish()))
            .collect();
        SurveyTable::new(columns)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Result<&Column, AggregateError> {
        self.index
            .get(name)
            .map(|&i| &self.columns[i])
            .ok_or_else(|| AggregateError::MissingColumn(name.to_string()))
    }

    /// Categorical view of a column. Numeric columns are converted on demand.
    pub fn categorical(&self, name: &str) -> Result<Cow<'_, CategoricalColumn>, AggregateError> {
        match self.column(name)? {
            Column::Categorical(c) => Ok(Cow::Borrowed(c)),
            Column::Numeric(values) => Ok(Cow::Owned(CategoricalColumn::from_values(
                values.iter().map(|v| v.map(number_label)),
            ))),
        }
    }

    /// Numeric view of a column. Categorical cells must all parse as numbers.
    pub fn numeric(&self, name: &str) -> Result<Cow<'_, [Option<f64>]>, AggregateError> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(Cow::Borrowed(values.as_slice())),
            Column::Categorical(c) => {
                let parsed: Vec<Option<f64>> = c
                    .levels()
                    .iter()
                    .map(|level| {
                        parse_number(level).map_err(|_| AggregateError::NonNumeric {
                            column: name.to_string(),
                            value: level.clone(),
                        })
                    })
                    .collect::<Result<_, _>>()?;
                Ok(Cow::Owned(
                    c.codes()
                        .iter()
                        .map(|code| code.and_then(|i| parsed[i as usize]))
                        .collect(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tokens_become_none() {
        assert_eq!(normalize_cell("  NaN "), None);
        assert_eq!(normalize_cell(""), None);
        assert_eq!(normalize_cell(" Yes "), Some("Yes"));
    }

    #[test]
    fn levels_follow_first_appearance() {
        let col = CategoricalColumn::from_values(vec![Some("No"), None, Some("Yes"), Some("No")]);
        assert_eq!(col.levels(), &["No".to_string(), "Yes".to_string()]);
        assert_eq!(col.codes(), &[Some(0), None, Some(1), Some(0)]);
        assert_eq!(col.level_counts(), vec![2, 1]);
        assert_eq!(col.get(2), Some("Yes"));
        assert_eq!(col.get(1), None);
    }

    #[test]
    fn relabel_merges_levels_and_keeps_missing() {
        let col = CategoricalColumn::from_values(vec![Some("Male"), Some("Queer"), None, Some("Agender")]);
        let folded = col.relabel(|l| if l == "Male" { l.to_string() } else { "Other".to_string() });
        assert_eq!(folded.levels(), &["Male".to_string(), "Other".to_string()]);
        assert_eq!(folded.codes(), &[Some(0), Some(1), None, Some(1)]);
        // the source column is untouched
        assert_eq!(col.levels().len(), 3);
    }

    #[test]
    fn infer_numeric_and_categorical() {
        let age = Column::infer(&[Some("25"), None, Some("31")]);
        assert_eq!(age, Column::Numeric(vec![Some(25.0), None, Some(31.0)]));

        let days = Column::infer(&[Some("1-14 days"), Some("15")]);
        assert!(matches!(days, Column::Categorical(_)));

        let blank: Column = Column::infer::<&str>(&[None, None]);
        assert!(matches!(blank, Column::Categorical(_)));
    }

    #[test]
    fn infinities_read_as_missing() {
        let age = Column::infer(&[Some("25"), Some("inf"), Some("-infinity"), Some("NaN")]);
        assert_eq!(age, Column::Numeric(vec![Some(25.0), None, None, None]));

        let table = SurveyTable::from_records(&["Age"], &[vec!["31"], vec!["inf"]]).unwrap();
        assert_eq!(&*table.numeric("Age").unwrap(), &[Some(31.0), None][..]);
    }

    #[test]
    fn builder_pads_and_interns() {
        let mut builder = ColumnBuilder::with_missing(2);
        builder.push(Some("Yes"));
        builder.push(Some("Yes"));
        builder.push(None);
        assert_eq!(builder.len(), 5);
        let Column::Categorical(col) = builder.finish() else {
            panic!("expected a categorical column");
        };
        assert_eq!(col.levels(), &["Yes".to_string()]);
        assert_eq!(col.codes(), &[None, None, Some(0), Some(0), None]);
    }

    #[test]
    fn records_with_wrong_width_are_rejected() {
        let err = SurveyTable::from_records(&["a", "b"], &[vec!["1", "2"], vec!["3"]]).unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { row: 1, .. }));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = SurveyTable::from_records(&["Gender"], &[vec!["Male"]]).unwrap();
        assert_eq!(
            table.categorical("Country").unwrap_err(),
            AggregateError::MissingColumn("Country".into())
        );
    }

    #[test]
    fn numeric_columns_have_categorical_views() {
        let table = SurveyTable::from_records(&["Age"], &[vec!["25"], vec!["NaN"], vec!["25.5"]]).unwrap();
        let view = table.categorical("Age").unwrap();
        assert_eq!(view.levels(), &["25".to_string(), "25.5".to_string()]);
        assert_eq!(view.codes(), &[Some(0), None, Some(1)]);
    }

    #[test]
    fn numeric_view_rejects_text() {
        let table = SurveyTable::from_records(&["Mood_Swings"], &[vec!["Low"]]).unwrap();
        assert!(matches!(
            table.numeric("Mood_Swings"),
            Err(AggregateError::NonNumeric { .. })
        ));
    }
}
