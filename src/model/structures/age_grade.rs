use serde::{Deserialize, Serialize};

/// Age grade statistics for a single performance
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AgeGrade {
    /// Performance as a percentage of the age/gender open standard (0-100 for
    /// most performances, above 100 beats the standard)
    pub percentage: f64,
    /// Equivalent open class time, in seconds
    pub graded_time: f64,
    /// Age grade factor, in (0, 1]
    pub factor: f64
}

impl From<AgeGrade> for (f64, f64, f64) {
    fn from(ag: AgeGrade) -> Self {
        (ag.percentage, ag.graded_time, ag.factor)
    }
}
