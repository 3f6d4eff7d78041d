use serde::{Deserialize, Serialize};

/// One line of a race results file: `name,gender,age,time[,dob][,id]`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub name: String,
    pub gender: String,
    /// Left empty (or unreadable) when the runner's age is not known
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub age: Option<u32>,
    pub time: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub id: Option<i32>
}

/// One line of a tabulated results file. Values are already rendered.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TabulatedRow {
    pub name: String,
    pub gender: String,
    pub age: Option<u32>,
    pub time: String,
    pub agfactor: String,
    pub agpercent: String,
    pub agtime: String,
    pub division: String,
    pub overall_place: String,
    pub gender_place: String,
    pub division_place: String,
    pub agtime_place: String,
    pub agpercent_place: String
}
