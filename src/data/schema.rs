//! Column names of the survey file, in header order.

pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const COUNTRY: &str = "Country";
pub const OCCUPATION: &str = "Occupation";
pub const SELF_EMPLOYED: &str = "self_employed";
pub const FAMILY_HISTORY: &str = "family_history";
pub const TREATMENT: &str = "treatment";
pub const DAYS_INDOORS: &str = "Days_Indoors";
pub const GROWING_STRESS: &str = "Growing_Stress";
pub const CHANGES_HABITS: &str = "Changes_Habits";
pub const MENTAL_HEALTH_HISTORY: &str = "Mental_Health_History";
pub const MOOD_SWINGS: &str = "Mood_Swings";
pub const COPING_STRUGGLES: &str = "Coping_Struggles";
pub const WORK_INTEREST: &str = "Work_Interest";
pub const SOCIAL_WEAKNESS: &str = "Social_Weakness";
pub const MENTAL_HEALTH_INTERVIEW: &str = "mental_health_interview";
pub const CARE_OPTIONS: &str = "care_options";

/// The columns the dashboard reads. `Timestamp` may also be present in the
/// raw export but nothing aggregates over it.
pub const SURVEY_COLUMNS: &[&str] = &[
    AGE,
    GENDER,
    COUNTRY,
    OCCUPATION,
    SELF_EMPLOYED,
    FAMILY_HISTORY,
    TREATMENT,
    DAYS_INDOORS,
    GROWING_STRESS,
    CHANGES_HABITS,
    MENTAL_HEALTH_HISTORY,
    MOOD_SWINGS,
    COPING_STRUGGLES,
    WORK_INTEREST,
    SOCIAL_WEAKNESS,
    MENTAL_HEALTH_INTERVIEW,
    CARE_OPTIONS,
];

pub const YES: &str = "Yes";
pub const NO: &str = "No";
pub const MAYBE: &str = "Maybe";
