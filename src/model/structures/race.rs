use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Race {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    /// Race distance in miles
    pub distance: f64
}

/// Age in whole years on `date`
pub fn age_on(dob: NaiveDate, date: NaiveDate) -> Option<u32> {
    date.years_since(dob)
}

/// Age used for division standings, taken on January 1 of the race year
pub fn division_age(dob: NaiveDate, race_date: NaiveDate) -> Option<u32> {
    let jan_first = NaiveDate::from_ymd_opt(race_date.year(), 1, 1)?;
    age_on(dob, jan_first)
}
