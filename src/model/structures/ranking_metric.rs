use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, str::FromStr};
use strum_macros::{Display, EnumIter};

use crate::model::error::AgeGradeError;

/// The value a grouping is ordered by
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[serde(rename_all = "lowercase")]
pub enum RankingMetric {
    #[strum(serialize = "time")]
    Time,
    #[strum(serialize = "agtime")]
    #[serde(rename = "agtime")]
    AgTime,
    #[strum(serialize = "agpercent")]
    #[serde(rename = "agpercent")]
    AgPercentage
}

impl RankingMetric {
    /// Percentages are better when higher, times when lower
    pub fn default_high_to_low(&self) -> bool {
        matches!(self, RankingMetric::AgPercentage)
    }
}

impl TryFrom<&str> for RankingMetric {
    type Error = AgeGradeError;

    fn try_from(v: &str) -> Result<Self, Self::Error> {
        match v.trim().to_lowercase().as_str() {
            "time" => Ok(RankingMetric::Time),
            "agtime" => Ok(RankingMetric::AgTime),
            "agpercent" | "agpercentage" => Ok(RankingMetric::AgPercentage),
            _ => Err(AgeGradeError::UnknownMetric(v.to_string()))
        }
    }
}

impl FromStr for RankingMetric {
    type Err = AgeGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankingMetric::try_from(s)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{error::ErrorKind, structures::ranking_metric::RankingMetric};
    use strum::IntoEnumIterator;

    #[test]
    fn test_convert_time() {
        assert_eq!(RankingMetric::try_from("time").unwrap(), RankingMetric::Time);
    }

    #[test]
    fn test_convert_agtime() {
        assert_eq!(RankingMetric::try_from("agtime").unwrap(), RankingMetric::AgTime);
    }

    #[test]
    fn test_convert_agpercent() {
        assert_eq!(RankingMetric::try_from("agpercent").unwrap(), RankingMetric::AgPercentage);
        assert_eq!(RankingMetric::try_from("AgPercentage").unwrap(), RankingMetric::AgPercentage);
    }

    #[test]
    fn test_convert_invalid() {
        let err = RankingMetric::try_from("pace").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_display_round_trips() {
        for metric in RankingMetric::iter() {
            assert_eq!(RankingMetric::try_from(metric.to_string().as_str()).unwrap(), metric);
        }
    }

    #[test]
    fn test_default_direction() {
        assert!(!RankingMetric::Time.default_high_to_low());
        assert!(!RankingMetric::AgTime.default_high_to_low());
        assert!(RankingMetric::AgPercentage.default_high_to_low());
    }
}
