use super::{division::Division, gender::Gender, race_result::RaceResult, ranking_metric::RankingMetric};

/// Outcome of tabulating one race for one series
#[derive(Debug, Clone, PartialEq)]
pub struct TabulationSummary {
    pub series: String,
    pub order_by: RankingMetric,
    /// Results handed to tabulation
    pub entries: usize,
    /// Results which received an age grade
    pub graded: usize,
    /// Results left without an age grade because their age is unknown
    pub ungraded: usize,
    /// Number of groupings ranked
    pub groupings: usize
}

/// Time precision (decimal places) for a race distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePrecision {
    pub time: usize,
    pub ag_time: usize
}

/// Identifies one grouping of a tabulation pass. Overall is neither gender
/// nor division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grouping {
    pub gender: Option<Gender>,
    pub division: Option<Division>
}

impl Grouping {
    pub fn overall() -> Grouping {
        Grouping {
            gender: None,
            division: None
        }
    }

    pub fn gender(gender: Gender) -> Grouping {
        Grouping {
            gender: Some(gender),
            division: None
        }
    }

    pub fn division(gender: Gender, division: Division) -> Grouping {
        Grouping {
            gender: Some(gender),
            division: Some(division)
        }
    }

    pub fn contains(&self, result: &RaceResult) -> bool {
        self.gender.is_none_or(|g| g == result.gender) && self.division.is_none_or(|d| result.division == Some(d))
    }
}
