use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::error::AgeGradeError;

/// An inclusive age band, e.g. 40-49
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Division {
    pub low: u32,
    pub high: u32
}

impl Division {
    pub fn new(low: u32, high: u32) -> Division {
        Division { low, high }
    }

    pub fn contains(&self, age: u32) -> bool {
        (self.low..=self.high).contains(&age)
    }

    /// First division whose band contains `age`
    pub fn find(divisions: &[Division], age: u32) -> Option<Division> {
        divisions.iter().find(|d| d.contains(age)).copied()
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl FromStr for Division {
    type Err = AgeGradeError;

    /// Parses `low-high`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AgeGradeError::Format(format!("division must be formatted low-high, found {:?}", s));

        let (low, high) = s.trim().split_once('-').ok_or_else(invalid)?;
        let low = low.trim().parse::<u32>().map_err(|_| invalid())?;
        let high = high.trim().parse::<u32>().map_err(|_| invalid())?;

        if low > high {
            return Err(invalid());
        }

        Ok(Division { low, high })
    }
}
