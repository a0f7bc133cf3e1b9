use log::debug;
use serde::{Deserialize, Serialize};

use super::{percent, require_base, CategorySeries, CategoryShare};
use crate::data::{CategoricalColumn, CategoryOrder, SurveyTable};
use crate::error::AggregateError;

/// How the categories of a single-column distribution are listed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayOrder {
    /// Descending frequency; ties keep first-appearance order.
    #[default]
    Frequency,
    /// The given labels first, in this order and even when unobserved, then
    /// any other observed category by descending frequency.
    Fixed(Vec<String>),
}

impl DisplayOrder {
    pub fn fixed<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DisplayOrder::Fixed(labels.into_iter().map(Into::into).collect())
    }
}

/// Share of each distinct value of `column`, over rows where it is present.
pub fn distribution(
    table: &SurveyTable,
    column: &str,
    order: &DisplayOrder,
) -> Result<CategorySeries, AggregateError> {
    let col = table.categorical(column)?;
    distribution_of(column, &col, order)
}

pub(crate) fn distribution_of(
    name: &str,
    col: &CategoricalColumn,
    order: &DisplayOrder,
) -> Result<CategorySeries, AggregateError> {
    let counts = col.level_counts();
    let base: usize = counts.iter().sum();
    require_base(base, name)?;

    let mut by_frequency: Vec<usize> = (0..counts.len()).collect();
    by_frequency.sort_by(|&a, &b| counts[b].cmp(&counts[a]));

    let share = |category: &str, count: usize| CategoryShare {
        category: category.to_string(),
        percent: percent(count, base),
        count,
        base,
    };

    let entries: Vec<CategoryShare> = match order {
        DisplayOrder::Frequency => by_frequency
            .iter()
            .map(|&i| share(&col.levels()[i], counts[i]))
            .collect(),
        DisplayOrder::Fixed(labels) => {
            let mut entries: Vec<CategoryShare> = labels
                .iter()
                .map(|label| {
                    let count = col.code_of(label).map_or(0, |c| counts[c as usize]);
                    share(label, count)
                })
                .collect();
            entries.extend(
                by_frequency
                    .iter()
                    .filter(|&&i| !labels.contains(&col.levels()[i]))
                    .map(|&i| share(&col.levels()[i], counts[i])),
            );
            entries
        }
    };

    Ok(CategorySeries { entries })
}

// ---------------------------------------------------------------------------
// Bucketing long-tail labels
// ---------------------------------------------------------------------------

/// Which labels of a column stay first-class; everything else folds into
/// `other_label`. Missing values stay missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketPolicy {
    pub keep: Vec<String>,
    pub other_label: String,
}

impl Default for BucketPolicy {
    fn default() -> Self {
        BucketPolicy {
            keep: vec!["Male".to_string(), "Female".to_string()],
            other_label: "Non-Binary/Other".to_string(),
        }
    }
}

impl BucketPolicy {
    /// A derived column with the policy applied; `column` is not touched.
    pub fn bucket(&self, column: &CategoricalColumn) -> CategoricalColumn {
        column.relabel(|label| {
            if self.keep.iter().any(|k| k == label) {
                label.to_string()
            } else {
                self.other_label.clone()
            }
        })
    }

    /// Bucket labels in display order: kept labels, then the catch-all.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = self.keep.clone();
        if !labels.contains(&self.other_label) {
            labels.push(self.other_label.clone());
        }
        labels
    }
}

/// [`distribution`] of `column` after folding it through `policy`.
pub fn bucketed_distribution(
    table: &SurveyTable,
    column: &str,
    policy: &BucketPolicy,
) -> Result<CategorySeries, AggregateError> {
    let raw = table.categorical(column)?;
    let bucketed = policy.bucket(&raw);
    distribution_of(column, &bucketed, &DisplayOrder::Frequency)
}

// ---------------------------------------------------------------------------
// DistributionTable – several columns over a shared vocabulary
// ---------------------------------------------------------------------------

/// Columns × categories matrix of percentages. Categories a column never
/// uses are 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionTable {
    pub columns: Vec<String>,
    pub categories: Vec<String>,
    /// `percents[column][category]`
    pub percents: Vec<Vec<f64>>,
}

impl DistributionTable {
    pub fn get(&self, column: &str, category: &str) -> Option<f64> {
        let row = self.columns.iter().position(|c| c == column)?;
        let col = self.categories.iter().position(|c| c == category)?;
        Some(self.percents[row][col])
    }

    pub fn row(&self, column: &str) -> Option<&[f64]> {
        let row = self.columns.iter().position(|c| c == column)?;
        Some(&self.percents[row])
    }
}

/// One [`distribution`] per column, aligned on a common category axis.
///
/// With [`CategoryOrder::Observed`] categories appear in the order they are
/// met walking each column's frequency-sorted distribution. A column with
/// no present values gives an all-zero row; no present values in any column
/// is an error.
pub fn distribution_table(
    table: &SurveyTable,
    columns: &[&str],
    order: &CategoryOrder,
) -> Result<DistributionTable, AggregateError> {
    let mut per_column = Vec::with_capacity(columns.len());
    let mut present = 0usize;
    for &column in columns {
        let col = table.categorical(column)?;
        let series = match distribution_of(column, &col, &DisplayOrder::Frequency) {
            Ok(series) => {
                present += series.iter().next().map_or(0, |e| e.base);
                series
            }
            Err(AggregateError::EmptyBase(_)) => CategorySeries::default(),
            Err(e) => return Err(e),
        };
        per_column.push(series);
    }
    require_base(present, &columns.join(", "))?;

    let mut observed: Vec<String> = Vec::new();
    for series in &per_column {
        for entry in series.iter() {
            if !observed.contains(&entry.category) {
                observed.push(entry.category.clone());
            }
        }
    }
    let categories = order.resolve(&columns.join(", "), &observed);

    let percents: Vec<Vec<f64>> = per_column
        .iter()
        .map(|series| {
            categories
                .iter()
                .map(|c| series.percent_of(c).unwrap_or(0.0))
                .collect()
        })
        .collect();

    debug!(
        "distribution table over {} columns, {} categories",
        columns.len(),
        categories.len()
    );
    Ok(DistributionTable {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        categories,
        percents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coping() -> SurveyTable {
        SurveyTable::from_records(
            &["Coping_Struggles"],
            &[vec!["No"], vec!["Yes"], vec!["No"], vec!["NA"], vec!["Yes"], vec!["No"]],
        )
        .unwrap()
    }

    #[test]
    fn frequency_order_excludes_missing() {
        let series = distribution(&coping(), "Coping_Struggles", &DisplayOrder::Frequency).unwrap();
        assert_eq!(series.labels(), vec!["No", "Yes"]);
        assert_eq!(series.percent_of("No"), Some(60.0));
        assert_eq!(series.percent_of("Yes"), Some(40.0));
    }

    #[test]
    fn fixed_order_lists_unobserved_labels() {
        let order = DisplayOrder::fixed(["Yes", "Maybe"]);
        let series = distribution(&coping(), "Coping_Struggles", &order).unwrap();
        assert_eq!(series.labels(), vec!["Yes", "Maybe", "No"]);
        assert_eq!(series.percent_of("Maybe"), Some(0.0));
    }

    #[test]
    fn all_missing_column_is_empty_base() {
        let table = SurveyTable::from_records(&["care_options"], &[vec![""], vec!["NaN"]]).unwrap();
        assert!(matches!(
            distribution(&table, "care_options", &DisplayOrder::Frequency),
            Err(AggregateError::EmptyBase(_))
        ));
    }

    #[test]
    fn gender_labels_fold_into_other() {
        let table = SurveyTable::from_records(
            &["Gender"],
            &[vec!["Female"], vec!["Male"], vec!["Agender"], vec!["Male"], vec!["Queer"], vec![""]],
        )
        .unwrap();
        let series = bucketed_distribution(&table, "Gender", &BucketPolicy::default()).unwrap();
        assert_eq!(series.labels(), vec!["Male", "Non-Binary/Other", "Female"]);
        assert_eq!(series.get("Non-Binary/Other").unwrap().count, 2);
        assert_eq!(series.get("Male").unwrap().base, 5);
        // the table itself still holds the raw labels
        assert_eq!(table.categorical("Gender").unwrap().levels().len(), 4);
    }

    #[test]
    fn custom_policy_is_respected() {
        let policy = BucketPolicy {
            keep: vec!["Female".into()],
            other_label: "Everyone else".into(),
        };
        assert_eq!(policy.labels(), vec!["Female", "Everyone else"]);
        let table = SurveyTable::from_records(&["Gender"], &[vec!["Female"], vec!["Male"]]).unwrap();
        let series = bucketed_distribution(&table, "Gender", &policy).unwrap();
        assert_eq!(series.percent_of("Everyone else"), Some(50.0));
    }

    #[test]
    fn symptom_triad_fills_absent_categories() {
        let table = SurveyTable::from_records(
            &["Changes_Habits", "Work_Interest", "Social_Weakness"],
            &[
                vec!["Yes", "No", "Maybe"],
                vec!["Maybe", "No", "Maybe"],
                vec!["Yes", "Yes", "No"],
                vec!["No", "No", "No"],
            ],
        )
        .unwrap();
        let order = CategoryOrder::declared(["Yes", "No", "Maybe"]);
        let triad = distribution_table(
            &table,
            &["Changes_Habits", "Work_Interest", "Social_Weakness"],
            &order,
        )
        .unwrap();

        assert_eq!(triad.categories, vec!["Yes", "No", "Maybe"]);
        assert_eq!(triad.get("Changes_Habits", "Yes"), Some(50.0));
        assert_eq!(triad.get("Work_Interest", "Maybe"), Some(0.0));
        assert_eq!(triad.row("Social_Weakness"), Some(&[0.0, 50.0, 50.0][..]));
        assert_eq!(triad.get("Work_Interest", "Not sure"), None);
        for row in &triad.percents {
            assert!((row.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn triad_with_no_answers_is_empty_base() {
        let columns = ["Changes_Habits", "Work_Interest", "Social_Weakness"];
        let blank = SurveyTable::from_records(
            &columns,
            &[vec!["", "NA", "NaN"], vec!["NA", "", "null"]],
        )
        .unwrap();
        let order = CategoryOrder::declared(["Yes", "No", "Maybe"]);
        assert!(matches!(
            distribution_table(&blank, &columns, &order),
            Err(AggregateError::EmptyBase(_))
        ));

        let one_answered =
            SurveyTable::from_records(&columns, &[vec!["Yes", "", ""], vec!["No", "NA", ""]])
                .unwrap();
        let triad = distribution_table(&one_answered, &columns, &order).unwrap();
        assert_eq!(triad.row("Changes_Habits"), Some(&[50.0, 50.0, 0.0][..]));
        assert_eq!(triad.row("Work_Interest"), Some(&[0.0, 0.0, 0.0][..]));
    }

    #[test]
    fn observed_vocabulary_follows_first_column() {
        let table = SurveyTable::from_records(
            &["a", "b"],
            &[vec!["No", "Not sure"], vec!["No", "Yes"], vec!["Yes", "Yes"]],
        )
        .unwrap();
        let dist = distribution_table(&table, &["a", "b"], &CategoryOrder::Observed).unwrap();
        assert_eq!(dist.categories, vec!["No", "Yes", "Not sure"]);
    }
}
