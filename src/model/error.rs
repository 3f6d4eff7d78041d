use thiserror::Error;

use crate::model::structures::gender::Gender;

/// The broad categories callers react to. Every [`AgeGradeError`] maps onto
/// exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingConfiguration,
    InvalidParameter,
    ConfigurationInconsistency,
    Format,
    Io
}

#[derive(Debug, Error)]
pub enum AgeGradeError {
    #[error("age grade configuration not found: {0}")]
    MissingConfiguration(String),

    #[error("gender must be M or F, found {gender:?}")]
    InvalidGender { gender: String },

    #[error("distance {distance_miles} miles must be between {min_miles:.3} and {max_miles:.1} miles")]
    DistanceOutOfRange {
        distance_miles: f64,
        min_miles: f64,
        max_miles: f64
    },

    #[error("invalid value for {parameter}: {value}")]
    InvalidValue { parameter: &'static str, value: f64 },

    #[error("unknown ranking metric {0:?}, expected one of time, agtime, agpercent")]
    UnknownMetric(String),

    #[error("age grade table has no factor for gender {gender}, distance {distance}m, age {age}")]
    MissingAgeFactor { gender: Gender, distance: u32, age: u32 },

    #[error("series {series} indicates divisions to be calculated, but no divisions found")]
    NoDivisions { series: String },

    #[error("invalid format: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("snapshot error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("age grade debug sink unavailable: {0}")]
    AuditSink(String)
}

impl AgeGradeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AgeGradeError::MissingConfiguration(_) => ErrorKind::MissingConfiguration,
            AgeGradeError::InvalidGender { .. }
            | AgeGradeError::DistanceOutOfRange { .. }
            | AgeGradeError::InvalidValue { .. }
            | AgeGradeError::UnknownMetric(_) => ErrorKind::InvalidParameter,
            AgeGradeError::MissingAgeFactor { .. } | AgeGradeError::NoDivisions { .. } => {
                ErrorKind::ConfigurationInconsistency
            }
            AgeGradeError::Format(_) | AgeGradeError::Json(_) => ErrorKind::Format,
            AgeGradeError::Csv(e) => {
                if e.is_io_error() {
                    ErrorKind::Io
                } else {
                    ErrorKind::Format
                }
            }
            AgeGradeError::Io(_) | AgeGradeError::AuditSink(_) => ErrorKind::Io
        }
    }
}

pub type Result<T> = std::result::Result<T, AgeGradeError>;
