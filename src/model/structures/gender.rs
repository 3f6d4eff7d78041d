use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, str::FromStr};
use strum_macros::{Display, EnumIter};

use crate::model::error::AgeGradeError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display)]
pub enum Gender {
    F,
    M
}

impl TryFrom<&str> for Gender {
    type Error = AgeGradeError;

    /// Case-insensitive, surrounding whitespace ignored
    fn try_from(v: &str) -> Result<Self, Self::Error> {
        match v.trim().to_uppercase().as_str() {
            "F" => Ok(Gender::F),
            "M" => Ok(Gender::M),
            _ => Err(AgeGradeError::InvalidGender { gender: v.to_string() })
        }
    }
}

impl FromStr for Gender {
    type Err = AgeGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::try_from(s)
    }
}
