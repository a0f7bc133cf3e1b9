//! Aggregation pipeline: pure transforms from a [`SurveyTable`] to the
//! summary a single chart needs.
//!
//! ```text
//!                ┌──────────── rate ──────────── Rate / CategorySeries
//!                │
//!  SurveyTable ──┼──────── distribution ──────── CategorySeries / DistributionTable
//!   (shared,     │
//!    read-only)  ├────────── numeric ─────────── GroupedNumeric
//!                │
//!                └────────── crosstab ────────── CrossTab
//! ```
//!
//! Every transform drops rows whose value is missing in any column it
//! analyses before counting, so missing values never enter a numerator or a
//! denominator. A zero denominator is reported as
//! [`AggregateError::EmptyBase`] rather than producing NaN.
//!
//! [`SurveyTable`]: crate::data::SurveyTable

use serde::Serialize;

use crate::error::AggregateError;

pub mod crosstab;
pub mod distribution;
pub mod numeric;
pub mod rate;

pub use crosstab::{bucketed_crosstab, crosstab, CrossTab, Normalize};
pub use distribution::{
    bucketed_distribution, distribution, distribution_table, BucketPolicy, DisplayOrder,
    DistributionTable,
};
pub use numeric::{grouped_numeric, GroupedNumeric, NumericGroup};
pub use rate::{overall_rate, ratio_by_category, ratio_by_category_with_support, Rate};

/// `100 × count / base`. Callers check `base` first.
pub(crate) fn percent(count: usize, base: usize) -> f64 {
    debug_assert!(base > 0, "percent over an empty base");
    100.0 * count as f64 / base as f64
}

/// Fail with [`AggregateError::EmptyBase`] when `base` is zero.
pub(crate) fn require_base(base: usize, what: &str) -> Result<(), AggregateError> {
    if base == 0 {
        Err(AggregateError::EmptyBase(what.to_string()))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CategorySeries – ordered per-category shares
// ---------------------------------------------------------------------------

/// One category's share of its base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub percent: f64,
    /// Rows counted in the numerator.
    pub count: usize,
    /// Rows in the denominator.
    pub base: usize,
}

/// Category → percentage, in presentation order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategorySeries {
    pub entries: Vec<CategoryShare>,
}

impl CategorySeries {
    pub fn get(&self, category: &str) -> Option<&CategoryShare> {
        self.entries.iter().find(|e| e.category == category)
    }

    pub fn percent_of(&self, category: &str) -> Option<f64> {
        self.get(category).map(|e| e.percent)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.category.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryShare> {
        self.entries.iter()
    }
}
