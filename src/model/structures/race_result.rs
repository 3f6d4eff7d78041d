use serde::{Deserialize, Serialize};

use super::{age_grade::AgeGrade, division::Division, gender::Gender, ranking_metric::RankingMetric};

/// Which place column a ranking pass writes
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceField {
    Overall,
    Gender,
    Division,
    AgTime,
    AgPercentage
}

/// A single finisher's result for one race
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RaceResult {
    pub runner_id: i32,
    pub name: String,
    pub gender: Gender,
    /// Age on race day, used for age grading
    pub age: Option<u32>,
    /// Age on January 1 of the race year, used for divisions
    pub division_age: Option<u32>,
    /// Elapsed time in seconds
    pub time: f64,
    /// Race distance in miles
    pub distance: f64,

    // Filled in by tabulation
    pub age_grade: Option<AgeGrade>,
    pub division: Option<Division>,
    pub overall_place: Option<f64>,
    pub gender_place: Option<f64>,
    pub division_place: Option<f64>,
    pub ag_time_place: Option<f64>,
    pub ag_percentage_place: Option<f64>
}

impl RaceResult {
    pub fn new(runner_id: i32, name: &str, gender: Gender, age: Option<u32>, time: f64, distance: f64) -> RaceResult {
        RaceResult {
            runner_id,
            name: name.to_string(),
            gender,
            age,
            division_age: None,
            time,
            distance,
            age_grade: None,
            division: None,
            overall_place: None,
            gender_place: None,
            division_place: None,
            ag_time_place: None,
            ag_percentage_place: None
        }
    }

    /// The value this result is ordered by, `None` when it was never age graded
    pub fn metric(&self, metric: RankingMetric) -> Option<f64> {
        match metric {
            RankingMetric::Time => Some(self.time),
            RankingMetric::AgTime => self.age_grade.map(|ag| ag.graded_time),
            RankingMetric::AgPercentage => self.age_grade.map(|ag| ag.percentage)
        }
    }

    pub fn place(&self, field: PlaceField) -> Option<f64> {
        match field {
            PlaceField::Overall => self.overall_place,
            PlaceField::Gender => self.gender_place,
            PlaceField::Division => self.division_place,
            PlaceField::AgTime => self.ag_time_place,
            PlaceField::AgPercentage => self.ag_percentage_place
        }
    }

    pub fn set_place(&mut self, field: PlaceField, place: Option<f64>) {
        match field {
            PlaceField::Overall => self.overall_place = place,
            PlaceField::Gender => self.gender_place = place,
            PlaceField::Division => self.division_place = place,
            PlaceField::AgTime => self.ag_time_place = place,
            PlaceField::AgPercentage => self.ag_percentage_place = place
        }
    }

    /// Removes everything tabulation produced
    pub fn clear_tabulation(&mut self) {
        self.age_grade = None;
        self.division = None;
        self.overall_place = None;
        self.gender_place = None;
        self.division_place = None;
        self.ag_time_place = None;
        self.ag_percentage_place = None;
    }
}
