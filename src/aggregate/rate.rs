use log::debug;
use serde::Serialize;

use super::{percent, require_base, CategorySeries, CategoryShare};
use crate::data::SurveyTable;
use crate::error::AggregateError;

/// A headline percentage such as "X% report growing stress".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rate {
    pub column: String,
    pub value: String,
    pub percent: f64,
    pub count: usize,
    pub base: usize,
}

/// Share of all rows where `column == positive`.
///
/// The base is every row of the table, including rows where `column` is
/// missing, so the figure reads as "of all respondents".
pub fn overall_rate(
    table: &SurveyTable,
    column: &str,
    positive: &str,
) -> Result<Rate, AggregateError> {
    let col = table.categorical(column)?;
    let base = table.n_rows();
    require_base(base, column)?;

    let count = match col.code_of(positive) {
        Some(code) => col.codes().iter().filter(|c| **c == Some(code)).count(),
        None => 0,
    };

    Ok(Rate {
        column: column.to_string(),
        value: positive.to_string(),
        percent: percent(count, base),
        count,
        base,
    })
}

/// Per category of `group_column`, the share of rows with
/// `target_column == positive`, sorted ascending by share.
///
/// Rows missing either column are dropped first. Ties keep the order in
/// which categories first appear in the data.
pub fn ratio_by_category(
    table: &SurveyTable,
    group_column: &str,
    target_column: &str,
    positive: &str,
) -> Result<CategorySeries, AggregateError> {
    ratio(table, group_column, target_column, positive, None)
}

/// Like [`ratio_by_category`], restricted to categories that occur more than
/// `min_count` times in `group_column`.
pub fn ratio_by_category_with_support(
    table: &SurveyTable,
    group_column: &str,
    target_column: &str,
    positive: &str,
    min_count: usize,
) -> Result<CategorySeries, AggregateError> {
    ratio(table, group_column, target_column, positive, Some(min_count))
}

fn ratio(
    table: &SurveyTable,
    group_column: &str,
    target_column: &str,
    positive: &str,
    min_count: Option<usize>,
) -> Result<CategorySeries, AggregateError> {
    let group = table.categorical(group_column)?;
    let target = table.categorical(target_column)?;
    let positive_code = target.code_of(positive);

    let n_levels = group.levels().len();
    let mut occurrences = vec![0usize; n_levels];
    let mut bases = vec![0usize; n_levels];
    let mut hits = vec![0usize; n_levels];

    for (g, t) in group.codes().iter().zip(target.codes()) {
        let Some(g) = g else { continue };
        let g = *g as usize;
        occurrences[g] += 1;
        let Some(t) = t else { continue };
        bases[g] += 1;
        if Some(*t) == positive_code {
            hits[g] += 1;
        }
    }
    require_base(bases.iter().sum(), group_column)?;

    let mut entries: Vec<CategoryShare> = (0..n_levels)
        .filter(|&i| bases[i] > 0)
        .filter(|&i| min_count.map_or(true, |min| occurrences[i] > min))
        .map(|i| CategoryShare {
            category: group.levels()[i].clone(),
            percent: percent(hits[i], bases[i]),
            count: hits[i],
            base: bases[i],
        })
        .collect();
    // stable: equal shares stay in first-appearance order
    entries.sort_by(|a, b| a.percent.total_cmp(&b.percent));

    debug!(
        "ratio of {target_column}={positive} by {group_column}: {} of {n_levels} categories kept",
        entries.len()
    );
    Ok(CategorySeries { entries })
}
