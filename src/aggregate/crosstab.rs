use log::debug;
use serde::Serialize;

use super::{percent, require_base, BucketPolicy};
use crate::data::{CategoricalColumn, CategoryOrder, SurveyTable};
use crate::error::AggregateError;

/// Which axis of a cross-tabulation sums to 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Normalize {
    /// Each row category sums to 100% across the columns.
    Rows,
    /// Each column category sums to 100% down the rows.
    Columns,
}

/// Rectangular matrix of percentages between two categorical columns.
///
/// Every resolved row and column label is present; combinations that never
/// occur are 0%, and a category with an empty base is an all-zero line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub row_column: String,
    pub column_column: String,
    pub normalize: Normalize,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `counts[row][col]`
    pub counts: Vec<Vec<usize>>,
    /// `percents[row][col]`
    pub percents: Vec<Vec<f64>>,
}

impl CrossTab {
    /// Percentage at (`row`, `column`), or `None` when either label is not
    /// part of the matrix. Never panics.
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let (r, c) = self.position(row, column)?;
        Some(self.percents[r][c])
    }

    pub fn count(&self, row: &str, column: &str) -> Option<usize> {
        let (r, c) = self.position(row, column)?;
        Some(self.counts[r][c])
    }

    pub fn row(&self, row: &str) -> Option<&[f64]> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        Some(&self.percents[r])
    }

    /// Values down one column, in row order.
    pub fn column(&self, column: &str) -> Option<Vec<f64>> {
        let c = self.column_labels.iter().position(|l| l == column)?;
        Some(self.percents.iter().map(|row| row[c]).collect())
    }

    fn position(&self, row: &str, column: &str) -> Option<(usize, usize)> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.column_labels.iter().position(|l| l == column)?;
        Some((r, c))
    }
}

/// Cross-tabulate `row_column` against `column_column`.
///
/// Rows missing either value are dropped. Axis labels follow the given
/// orders; observed labels outside a declared order are appended.
pub fn crosstab(
    table: &SurveyTable,
    row_column: &str,
    column_column: &str,
    row_order: &CategoryOrder,
    column_order: &CategoryOrder,
    normalize: Normalize,
) -> Result<CrossTab, AggregateError> {
    let rows = table.categorical(row_column)?;
    let cols = table.categorical(column_column)?;
    crosstab_of(
        (row_column, &*rows, row_order),
        (column_column, &*cols, column_order),
        normalize,
    )
}

/// [`crosstab`] with the row column folded through `policy` first. Rows are
/// laid out as the policy's labels.
pub fn bucketed_crosstab(
    table: &SurveyTable,
    row_column: &str,
    policy: &BucketPolicy,
    column_column: &str,
    column_order: &CategoryOrder,
    normalize: Normalize,
) -> Result<CrossTab, AggregateError> {
    let raw = table.categorical(row_column)?;
    let rows = policy.bucket(&raw);
    let cols = table.categorical(column_column)?;
    let row_order = CategoryOrder::Declared(policy.labels());
    crosstab_of(
        (row_column, &rows, &row_order),
        (column_column, &*cols, column_order),
        normalize,
    )
}

type Axis<'a> = (&'a str, &'a CategoricalColumn, &'a CategoryOrder);

fn crosstab_of(
    (row_name, rows, row_order): Axis<'_>,
    (col_name, cols, col_order): Axis<'_>,
    normalize: Normalize,
) -> Result<CrossTab, AggregateError> {
    let row_labels = row_order.resolve(row_name, rows.levels());
    let column_labels = col_order.resolve(col_name, cols.levels());

    // level code → position on the resolved axis
    let place = |levels: &[String], labels: &[String]| -> Vec<usize> {
        levels
            .iter()
            .map(|l| labels.iter().position(|x| x == l).unwrap_or(0))
            .collect()
    };
    let row_pos = place(rows.levels(), row_labels.as_slice());
    let col_pos = place(cols.levels(), column_labels.as_slice());

    let mut counts = vec![vec![0usize; column_labels.len()]; row_labels.len()];
    let mut total = 0usize;
    for (r, c) in rows.codes().iter().zip(cols.codes()) {
        if let (Some(r), Some(c)) = (r, c) {
            counts[row_pos[*r as usize]][col_pos[*c as usize]] += 1;
            total += 1;
        }
    }
    require_base(total, &format!("{row_name} × {col_name}"))?;

    let percents: Vec<Vec<f64>> = match normalize {
        Normalize::Rows => counts
            .iter()
            .map(|line| {
                let base: usize = line.iter().sum();
                line.iter()
                    .map(|&n| if base == 0 { 0.0 } else { percent(n, base) })
                    .collect()
            })
            .collect(),
        Normalize::Columns => {
            let bases: Vec<usize> = (0..column_labels.len())
                .map(|c| counts.iter().map(|line| line[c]).sum())
                .collect();
            counts
                .iter()
                .map(|line| {
                    line.iter()
                        .zip(&bases)
                        .map(|(&n, &base)| if base == 0 { 0.0 } else { percent(n, base) })
                        .collect()
                })
                .collect()
        }
    };

    debug!(
        "crosstab {row_name} × {col_name}: {}×{} over {total} rows",
        row_labels.len(),
        column_labels.len()
    );
    Ok(CrossTab {
        row_column: row_name.to_string(),
        column_column: col_name.to_string(),
        normalize,
        row_labels,
        column_labels,
        counts,
        percents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DaysIndoors, MoodSwings, Ordinal};

    fn habit_rows() -> SurveyTable {
        SurveyTable::from_records(
            &["Days_Indoors", "Mood_Swings"],
            &[
                vec!["Go out Every day", "Low"],
                vec!["1-14 days", "High"],
                vec!["Go out Every day", "High"],
                vec!["1-14 days", "High"],
                vec!["", "Low"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn declared_axes_keep_unobserved_buckets() {
        let tab = crosstab(
            &habit_rows(),
            "Days_Indoors",
            "Mood_Swings",
            &CategoryOrder::of::<DaysIndoors>(),
            &CategoryOrder::of::<MoodSwings>(),
            Normalize::Columns,
        )
        .unwrap();

        let expected_rows: Vec<&str> = DaysIndoors::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(tab.row_labels, expected_rows);
        assert_eq!(tab.column_labels, vec!["Low", "Medium", "High"]);

        assert_eq!(tab.get("15-30 days", "High"), Some(0.0));
        assert_eq!(tab.get("More than 2 months", "Low"), Some(0.0));
        assert_eq!(tab.get("Go out Every day", "Low"), Some(100.0));
        assert!((tab.get("1-14 days", "High").unwrap() - 200.0 / 3.0).abs() < 1e-9);
        // Medium has no rows at all: zero column, not a missing one
        assert_eq!(tab.column("Medium"), Some(vec![0.0; 5]));
    }

    #[test]
    fn absent_labels_resolve_to_none() {
        let tab = crosstab(
            &habit_rows(),
            "Days_Indoors",
            "Mood_Swings",
            &CategoryOrder::of::<DaysIndoors>(),
            &CategoryOrder::of::<MoodSwings>(),
            Normalize::Columns,
        )
        .unwrap();
        assert_eq!(tab.get("Forever", "Low"), None);
        assert_eq!(tab.get("1-14 days", "Extreme"), None);
        assert_eq!(tab.count("1-14 days", "High"), Some(2));
    }

    #[test]
    fn rows_normalization_sums_each_row() {
        let table = SurveyTable::from_records(
            &["Gender", "treatment"],
            &[
                vec!["Male", "Yes"],
                vec!["Male", "No"],
                vec!["Male", "No"],
                vec!["Female", "Yes"],
            ],
        )
        .unwrap();
        let tab = crosstab(
            &table,
            "Gender",
            "treatment",
            &CategoryOrder::Observed,
            &CategoryOrder::declared(["No", "Yes"]),
            Normalize::Rows,
        )
        .unwrap();
        assert_eq!(tab.row("Female"), Some(&[0.0, 100.0][..]));
        let male = tab.row("Male").unwrap();
        assert!((male.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_categories_are_appended() {
        let table = SurveyTable::from_records(
            &["Days_Indoors", "Mood_Swings"],
            &[vec!["Never", "Low"], vec!["1-14 days", "Severe"]],
        )
        .unwrap();
        let tab = crosstab(
            &table,
            "Days_Indoors",
            "Mood_Swings",
            &CategoryOrder::of::<DaysIndoors>(),
            &CategoryOrder::of::<MoodSwings>(),
            Normalize::Columns,
        )
        .unwrap();
        assert_eq!(tab.row_labels.last().map(String::as_str), Some("Never"));
        assert_eq!(tab.column_labels.last().map(String::as_str), Some("Severe"));
        assert_eq!(tab.get("Never", "Low"), Some(100.0));
    }

    #[test]
    fn bucketed_rows_follow_policy() {
        let table = SurveyTable::from_records(
            &["Gender", "treatment"],
            &[
                vec!["Genderqueer", "Yes"],
                vec!["Female", "No"],
                vec!["Female", "Yes"],
                vec!["Male", "No"],
            ],
        )
        .unwrap();
        let tab = bucketed_crosstab(
            &table,
            "Gender",
            &BucketPolicy::default(),
            "treatment",
            &CategoryOrder::declared(["No", "Yes"]),
            Normalize::Rows,
        )
        .unwrap();
        assert_eq!(tab.row_labels, vec!["Male", "Female", "Non-Binary/Other"]);
        assert_eq!(tab.get("Female", "Yes"), Some(50.0));
        assert_eq!(tab.get("Non-Binary/Other", "Yes"), Some(100.0));
    }

    #[test]
    fn empty_table_is_empty_base() {
        let table =
            SurveyTable::from_records::<_, Vec<&str>, &str>(&["Days_Indoors", "Mood_Swings"], &[]).unwrap();
        assert!(matches!(
            crosstab(
                &table,
                "Days_Indoors",
                "Mood_Swings",
                &CategoryOrder::Observed,
                &CategoryOrder::Observed,
                Normalize::Rows,
            ),
            Err(AggregateError::EmptyBase(_))
        ));
    }
}
