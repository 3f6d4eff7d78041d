use std::{fs::File, io::Read, path::Path};

use chrono::NaiveDate;
use tracing::debug;

use crate::{
    files::file_structs::ResultRow,
    model::{
        error::{AgeGradeError, Result},
        precision::parse_time,
        structures::{
            gender::Gender,
            race::{age_on, division_age, Race},
            race_result::RaceResult
        }
    }
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads a results file into results for `race`.
///
/// A date of birth takes precedence over the `age` column and is the only
/// source of the division age. Rows without an `id` are numbered from 1 in
/// file order.
pub fn read_results<R: Read>(reader: R, race: &Race) -> Result<Vec<RaceResult>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut results = Vec::new();
    for (i, row) in csv_reader.deserialize::<ResultRow>().enumerate() {
        results.push(to_result(row?, i as i32 + 1, race)?);
    }

    debug!("Read {} results for {}", results.len(), race.name);

    Ok(results)
}

pub fn read_results_file(path: &Path, race: &Race) -> Result<Vec<RaceResult>> {
    let file = File::open(path)?;
    read_results(file, race)
}

fn to_result(row: ResultRow, line: i32, race: &Race) -> Result<RaceResult> {
    let gender = Gender::try_from(row.gender.as_str())?;
    let time = parse_time(&row.time)?;

    let dob = match row.dob.as_deref().map(str::trim) {
        Some(dob) if !dob.is_empty() => Some(
            NaiveDate::parse_from_str(dob, DATE_FORMAT)
                .map_err(|e| AgeGradeError::Format(format!("invalid date of birth {:?} for {}: {}", dob, row.name, e)))?
        ),
        _ => None
    };

    let age = dob.and_then(|d| age_on(d, race.date)).or(row.age);

    let mut result = RaceResult::new(row.id.unwrap_or(line), &row.name, gender, age, time, race.distance);
    result.division_age = dob.and_then(|d| division_age(d, race.date));

    Ok(result)
}
