use std::time::Instant;

use log::{debug, warn};

use crate::aggregate::{
    bucketed_crosstab, crosstab, distribution, distribution_table, grouped_numeric, overall_rate,
    ratio_by_category, ratio_by_category_with_support, CategorySeries, CrossTab, DisplayOrder,
    DistributionTable, GroupedNumeric, Normalize, Rate,
};
use crate::config::DashboardConfig;
use crate::data::schema::*;
use crate::data::{CategoryOrder, DaysIndoors, MoodSwings, SurveyTable};
use crate::error::AggregateError;

pub type ChartResult<T> = Result<T, AggregateError>;

/// One small-multiple panel: a title and its distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: &'static str,
    pub column: &'static str,
    pub series: ChartResult<CategorySeries>,
}

/// Every summary the page shows, each computed on its own so a failure in
/// one chart leaves the rest intact.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub growing_stress: ChartResult<Rate>,
    pub stress_by_occupation: ChartResult<CategorySeries>,
    pub age_by_stress: ChartResult<GroupedNumeric>,
    pub history_by_country: ChartResult<CategorySeries>,
    pub habit_loop: ChartResult<CrossTab>,
    pub coping_struggles: ChartResult<CategorySeries>,
    pub gender_treatment: ChartResult<CrossTab>,
    pub self_employed: ChartResult<Rate>,
    pub symptom_triad: ChartResult<DistributionTable>,
    pub systemic_factors: Vec<Panel>,
}

/// Columns of the symptom triad, charted side by side.
pub const SYMPTOM_COLUMNS: [&str; 3] = [CHANGES_HABITS, WORK_INTEREST, SOCIAL_WEAKNESS];

/// (title, column) of each systemic-factor panel.
pub const SYSTEMIC_PANELS: [(&str, &str); 3] = [
    ("Care Options", CARE_OPTIONS),
    ("Family History", FAMILY_HISTORY),
    ("Open to Interview", MENTAL_HEALTH_INTERVIEW),
];

fn chart<T>(name: &str, f: impl FnOnce() -> ChartResult<T>) -> ChartResult<T> {
    let started = Instant::now();
    let result = f();
    match &result {
        Ok(_) => debug!("{name}: computed in {:.2?}", started.elapsed()),
        Err(e) => warn!("{name}: {e}"),
    }
    result
}

impl Dashboard {
    pub fn compute(table: &SurveyTable, config: &DashboardConfig) -> Self {
        let yes_no = CategoryOrder::declared([NO, YES]);

        Dashboard {
            growing_stress: chart("growing stress", || {
                overall_rate(table, GROWING_STRESS, YES)
            }),
            stress_by_occupation: chart("stress gap", || {
                ratio_by_category(table, OCCUPATION, GROWING_STRESS, YES)
            }),
            age_by_stress: chart("age vs stress", || {
                grouped_numeric(table, GROWING_STRESS, &[YES, NO], AGE)
            }),
            history_by_country: chart("global headspace", || {
                ratio_by_category_with_support(
                    table,
                    COUNTRY,
                    MENTAL_HEALTH_HISTORY,
                    YES,
                    config.country_min_count,
                )
            }),
            habit_loop: chart("habit loop", || {
                crosstab(
                    table,
                    DAYS_INDOORS,
                    MOOD_SWINGS,
                    &CategoryOrder::of::<DaysIndoors>(),
                    &CategoryOrder::of::<MoodSwings>(),
                    Normalize::Columns,
                )
            }),
            coping_struggles: chart("coping struggles", || {
                distribution(table, COPING_STRUGGLES, &DisplayOrder::fixed([YES, NO]))
            }),
            gender_treatment: chart("gender divide", || {
                bucketed_crosstab(
                    table,
                    GENDER,
                    &config.gender_policy,
                    TREATMENT,
                    &yes_no,
                    Normalize::Rows,
                )
            }),
            self_employed: chart("self employed", || overall_rate(table, SELF_EMPLOYED, YES)),
            symptom_triad: chart("symptom triad", || {
                distribution_table(
                    table,
                    &SYMPTOM_COLUMNS,
                    &CategoryOrder::declared([YES, NO, MAYBE]),
                )
            }),
            systemic_factors: SYSTEMIC_PANELS
                .iter()
                .map(|&(title, column)| Panel {
                    title,
                    column,
                    series: chart(title, || {
                        distribution(table, column, &DisplayOrder::Frequency)
                    }),
                })
                .collect(),
        }
    }

    /// Number of charts whose aggregation failed.
    pub fn failures(&self) -> usize {
        let flags = [
            self.growing_stress.is_err(),
            self.stress_by_occupation.is_err(),
            self.age_by_stress.is_err(),
            self.history_by_country.is_err(),
            self.habit_loop.is_err(),
            self.coping_struggles.is_err(),
            self.gender_treatment.is_err(),
            self.self_employed.is_err(),
            self.symptom_triad.is_err(),
        ];
        flags.iter().filter(|f| **f).count()
            + self.systemic_factors.iter().filter(|p| p.series.is_err()).count()
    }
}
