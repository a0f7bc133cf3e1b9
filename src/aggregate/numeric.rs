use log::debug;
use serde::Serialize;

use super::require_base;
use crate::data::SurveyTable;
use crate::error::AggregateError;

/// Values of a numeric column for one group, with summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericGroup {
    pub label: String,
    /// Every value in the group, in row order.
    pub values: Vec<f64>,
    /// `None` when the group has no rows.
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

impl NumericGroup {
    fn new(label: &str, values: Vec<f64>) -> Self {
        let mean = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        };
        let mut group = NumericGroup {
            label: label.to_string(),
            values,
            mean,
            median: None,
        };
        group.median = group.quantile(0.5);
        group
    }

    /// Linear-interpolated quantile, `q` in `[0, 1]`.
    pub fn quantile(&self, q: f64) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
    }

    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedNumeric {
    pub group_column: String,
    pub numeric_column: String,
    /// One entry per requested group value, in the requested order.
    pub groups: Vec<NumericGroup>,
}

impl GroupedNumeric {
    pub fn group(&self, label: &str) -> Option<&NumericGroup> {
        self.groups.iter().find(|g| g.label == label)
    }
}

/// `numeric_column` split by the listed values of `group_column`.
///
/// Rows missing either column are dropped before grouping, so they affect
/// neither a group's values nor its mean. Fails with
/// [`AggregateError::EmptyBase`] when no row survives.
pub fn grouped_numeric(
    table: &SurveyTable,
    group_column: &str,
    group_values: &[&str],
    numeric_column: &str,
) -> Result<GroupedNumeric, AggregateError> {
    let group = table.categorical(group_column)?;
    let numbers = table.numeric(numeric_column)?;

    let complete: Vec<(u32, f64)> = group
        .codes()
        .iter()
        .zip(numbers.iter())
        .filter_map(|(code, value)| match (code, value) {
            (Some(code), Some(value)) if !value.is_nan() => Some((*code, *value)),
            _ => None,
        })
        .collect();
    require_base(complete.len(), numeric_column)?;

    let groups = group_values
        .iter()
        .map(|&label| {
            let values = match group.code_of(label) {
                Some(wanted) => complete
                    .iter()
                    .filter(|(code, _)| *code == wanted)
                    .map(|(_, v)| *v)
                    .collect(),
                None => Vec::new(),
            };
            NumericGroup::new(label, values)
        })
        .collect::<Vec<_>>();

    debug!(
        "{numeric_column} by {group_column}: {} complete rows across {} groups",
        complete.len(),
        groups.len()
    );
    Ok(GroupedNumeric {
        group_column: group_column.to_string(),
        numeric_column: numeric_column.to_string(),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ages() -> SurveyTable {
        SurveyTable::from_records(
            &["Age", "Growing_Stress"],
            &[vec!["25", "Yes"], vec!["30", "No"], vec!["NaN", "Yes"]],
        )
        .unwrap()
    }

    #[test]
    fn missing_age_is_excluded_everywhere() {
        let summary = grouped_numeric(&ages(), "Growing_Stress", &["Yes", "No"], "Age").unwrap();
        let yes = summary.group("Yes").unwrap();
        assert_eq!(yes.values, vec![25.0]);
        assert_eq!(yes.mean, Some(25.0));
        let no = summary.group("No").unwrap();
        assert_eq!(no.values, vec![30.0]);
        assert_eq!(no.mean, Some(30.0));
    }

    #[test]
    fn infinite_ages_never_reach_the_mean() {
        let table = SurveyTable::from_records(
            &["Age", "Growing_Stress"],
            &[vec!["25", "Yes"], vec!["inf", "Yes"], vec!["-Infinity", "No"], vec!["40", "No"]],
        )
        .unwrap();
        let summary = grouped_numeric(&table, "Growing_Stress", &["Yes", "No"], "Age").unwrap();
        assert_eq!(summary.group("Yes").unwrap().values, vec![25.0]);
        assert_eq!(summary.group("Yes").unwrap().mean, Some(25.0));
        assert_eq!(summary.group("No").unwrap().max(), Some(40.0));
    }

    #[test]
    fn groups_keep_requested_order_and_report_no_data() {
        let summary =
            grouped_numeric(&ages(), "Growing_Stress", &["No", "Maybe", "Yes"], "Age").unwrap();
        let labels: Vec<&str> = summary.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["No", "Maybe", "Yes"]);
        let maybe = summary.group("Maybe").unwrap();
        assert!(maybe.values.is_empty());
        assert_eq!(maybe.mean, None);
        assert_eq!(maybe.median, None);
    }

    #[test]
    fn quantiles_interpolate() {
        let group = NumericGroup::new("Yes", vec![40.0, 10.0, 30.0, 20.0]);
        assert_eq!(group.median, Some(25.0));
        assert_eq!(group.quantile(0.0), Some(10.0));
        assert_eq!(group.quantile(1.0), Some(40.0));
        assert_eq!(group.min(), Some(10.0));
        assert_eq!(group.max(), Some(40.0));
        assert_eq!(group.mean, Some(25.0));
    }

    #[test]
    fn non_numeric_column_is_an_error() {
        let table = SurveyTable::from_records(
            &["Mood_Swings", "Growing_Stress"],
            &[vec!["Low", "Yes"]],
        )
        .unwrap();
        assert!(matches!(
            grouped_numeric(&table, "Growing_Stress", &["Yes"], "Mood_Swings"),
            Err(AggregateError::NonNumeric { .. })
        ));
    }

    #[test]
    fn nothing_complete_is_empty_base() {
        let table = SurveyTable::from_records(
            &["Age", "Growing_Stress"],
            &[vec!["", "Yes"], vec!["33", ""]],
        )
        .unwrap();
        assert_eq!(
            grouped_numeric(&table, "Growing_Stress", &["Yes", "No"], "Age"),
            Err(AggregateError::EmptyBase("Age".into()))
        );
    }
}
