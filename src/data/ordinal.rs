use log::warn;

// ---------------------------------------------------------------------------
// Ordinal categories with a declared rank
// ---------------------------------------------------------------------------

/// A categorical value with a declared total order.
///
/// `ALL` lists every variant in rank order; `rank` is the position in it.
pub trait Ordinal: Copy + Eq + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn rank(self) -> usize {
        Self::ALL
            .iter()
            .position(|v| *v == self)
            .unwrap_or(Self::ALL.len())
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DaysIndoors {
    UpToTwoWeeks,
    HalfToOneMonth,
    OneToTwoMonths,
    MoreThanTwoMonths,
    GoOutEveryDay,
}

impl Ordinal for DaysIndoors {
    const ALL: &'static [Self] = &[
        DaysIndoors::UpToTwoWeeks,
        DaysIndoors::HalfToOneMonth,
        DaysIndoors::OneToTwoMonths,
        DaysIndoors::MoreThanTwoMonths,
        DaysIndoors::GoOutEveryDay,
    ];

    fn label(self) -> &'static str {
        match self {
            DaysIndoors::UpToTwoWeeks => "1-14 days",
            DaysIndoors::HalfToOneMonth => "15-30 days",
            DaysIndoors::OneToTwoMonths => "31-60 days",
            DaysIndoors::MoreThanTwoMonths => "More than 2 months",
            DaysIndoors::GoOutEveryDay => "Go out Every day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoodSwings {
    Low,
    Medium,
    High,
}

impl Ordinal for MoodSwings {
    const ALL: &'static [Self] = &[MoodSwings::Low, MoodSwings::Medium, MoodSwings::High];

    fn label(self) -> &'static str {
        match self {
            MoodSwings::Low => "Low",
            MoodSwings::Medium => "Medium",
            MoodSwings::High => "High",
        }
    }
}

// ---------------------------------------------------------------------------
// CategoryOrder – how a column's levels are laid out on an axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CategoryOrder {
    /// First-appearance order in the data.
    #[default]
    Observed,
    /// A declared sequence. Declared labels are always present, even when
    /// unobserved; observed labels outside it are appended.
    Declared(Vec<String>),
}

impl CategoryOrder {
    pub fn of<O: Ordinal>() -> Self {
        CategoryOrder::Declared(O::ALL.iter().map(|v| v.label().to_string()).collect())
    }

    pub fn declared<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CategoryOrder::Declared(labels.into_iter().map(Into::into).collect())
    }

    /// Final label order for `column` given its observed levels.
    pub fn resolve(&self, column: &str, observed: &[String]) -> Vec<String> {
        match self {
            CategoryOrder::Observed => observed.to_vec(),
            CategoryOrder::Declared(declared) => {
                let mut labels = declared.clone();
                for level in observed {
                    if !declared.contains(level) {
                        warn!("column '{column}': category '{level}' is outside the declared order, appending");
                        labels.push(level.clone());
                    }
                }
                labels
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_declaration() {
        assert!(DaysIndoors::UpToTwoWeeks.rank() < DaysIndoors::GoOutEveryDay.rank());
        assert_eq!(MoodSwings::High.rank(), 2);
        assert_eq!(DaysIndoors::from_label("31-60 days"), Some(DaysIndoors::OneToTwoMonths));
        assert_eq!(MoodSwings::from_label("Extreme"), None);
    }

    #[test]
    fn declared_order_keeps_unobserved_and_appends_unknown() {
        let order = CategoryOrder::of::<MoodSwings>();
        let observed = vec!["High".to_string(), "Erratic".to_string()];
        assert_eq!(
            order.resolve("Mood_Swings", &observed),
            vec!["Low", "Medium", "High", "Erratic"]
        );
    }

    #[test]
    fn observed_order_is_passthrough() {
        let observed = vec!["b".to_string(), "a".to_string()];
        assert_eq!(CategoryOrder::Observed.resolve("x", &observed), observed);
    }
}
