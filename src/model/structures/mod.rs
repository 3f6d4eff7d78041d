pub mod age_grade;
pub mod division;
pub mod gender;
pub mod processing;
pub mod race;
pub mod race_result;
pub mod ranking_metric;
pub mod series;
pub mod tie_policy;
