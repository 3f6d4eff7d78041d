use serde::{Deserialize, Serialize};

use super::{division::Division, ranking_metric::RankingMetric, tie_policy::TiePolicy};

/// Describes how the results of a race are tabulated
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub order_by: RankingMetric,
    pub high_to_low: bool,
    pub average_tie: bool,
    /// `Some` when the series awards division places
    pub divisions: Option<Vec<Division>>
}

impl Series {
    pub fn new(name: &str, order_by: RankingMetric) -> Series {
        Series {
            name: name.to_string(),
            order_by,
            high_to_low: order_by.default_high_to_low(),
            average_tie: false,
            divisions: None
        }
    }

    pub fn with_average_tie(mut self, average_tie: bool) -> Series {
        self.average_tie = average_tie;
        self
    }

    pub fn with_high_to_low(mut self, high_to_low: bool) -> Series {
        self.high_to_low = high_to_low;
        self
    }

    pub fn with_divisions(mut self, divisions: Vec<Division>) -> Series {
        self.divisions = Some(divisions);
        self
    }

    pub fn tie_policy(&self) -> TiePolicy {
        TiePolicy::from(self.average_tie)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::structures::{
        division::Division, ranking_metric::RankingMetric, series::Series, tie_policy::TiePolicy
    };

    #[test]
    fn test_new_uses_metric_direction() {
        assert!(!Series::new("Overall", RankingMetric::Time).high_to_low);
        assert!(Series::new("Age Grade", RankingMetric::AgPercentage).high_to_low);
    }

    #[test]
    fn test_builders() {
        let series = Series::new("Grand Prix", RankingMetric::Time)
            .with_average_tie(true)
            .with_divisions(vec![Division::new(0, 19)]);

        assert_eq!(series.tie_policy(), TiePolicy::Average);
        assert_eq!(series.divisions, Some(vec![Division::new(0, 19)]));
    }
}
