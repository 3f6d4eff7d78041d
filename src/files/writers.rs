use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf}
};

use tracing::info;

use crate::{
    files::file_structs::TabulatedRow,
    model::{
        age_grade_calculator::AgeGradeCalculator,
        constants::{FACTOR_PRECISION, PERCENTAGE_PRECISION, ROAD_DISTANCES},
        error::Result,
        precision::{precision_for_distance, render_time, render_time_with, Rounding},
        structures::{gender::Gender, race::Race, race_result::RaceResult}
    },
    utils::progress_utils::progress_bar
};

/// Writes tabulated results with times at the race's display precision
pub fn write_results<W: Write>(writer: W, race: &Race, results: &[RaceResult]) -> Result<()> {
    let precision = precision_for_distance(race.distance);
    let mut csv_writer = csv::Writer::from_writer(writer);

    for result in results {
        let grade = result.age_grade;

        csv_writer.serialize(TabulatedRow {
            name: result.name.clone(),
            gender: result.gender.to_string(),
            age: result.age,
            time: render_time(result.time, precision.time),
            agfactor: grade.map_or(String::new(), |g| format!("{:.*}", FACTOR_PRECISION, g.factor)),
            agpercent: grade.map_or(String::new(), |g| format!("{:.*}", PERCENTAGE_PRECISION, g.percentage)),
            agtime: grade.map_or(String::new(), |g| render_time(g.graded_time, precision.ag_time)),
            division: result.division.map_or(String::new(), |d| d.to_string()),
            overall_place: render_place(result.overall_place),
            gender_place: render_place(result.gender_place),
            division_place: render_place(result.division_place),
            agtime_place: render_place(result.ag_time_place),
            agpercent_place: render_place(result.ag_percentage_place)
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_results_file(path: &Path, race: &Race, results: &[RaceResult]) -> Result<()> {
    let file = File::create(path)?;
    write_results(BufWriter::new(file), race, results)?;

    info!("Wrote {} results to {}", results.len(), path.display());
    Ok(())
}

/// Whole places print without a fraction, averaged ties keep theirs
fn render_place(place: Option<f64>) -> String {
    match place {
        Some(p) if p.fract() == 0.0 => format!("{:.0}", p),
        Some(p) => p.to_string(),
        None => String::new()
    }
}

fn gender_name(gender: Gender) -> &'static str {
    match gender {
        Gender::F => "Female",
        Gender::M => "Male"
    }
}

pub fn targets_file_name(gender: Gender, percentage: u32) -> String {
    format!("results-for-age-grade-{}-{}.csv", gender, percentage)
}

/// Writes the times needed for `percentage` at each of `ages` over the
/// standard road distances. Times round down to the second and are always
/// `h:mm:ss`.
pub fn write_targets<W: Write>(
    mut writer: W,
    calculator: &AgeGradeCalculator,
    gender: Gender,
    percentage: u32,
    ages: &[u32]
) -> Result<()> {
    writeln!(writer, "Required Results for Age Grade {} {}%", gender_name(gender), percentage)?;
    writeln!(writer)?;

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["age"];
    header.extend(ROAD_DISTANCES.keys());
    csv_writer.write_record(&header)?;

    for age in ages {
        let mut record = vec![age.to_string()];
        for distance in ROAD_DISTANCES.values() {
            let time = calculator.required_time_for(*age as f64, gender, *distance, percentage as f64)?;
            record.push(pad_hours(&render_time_with(time, 0, Rounding::Floor)));
        }

        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes one target table per percentage into `dir`, returning the paths
pub fn write_targets_files(
    dir: &Path,
    calculator: &AgeGradeCalculator,
    gender: Gender,
    percentages: &[u32],
    ages: &[u32]
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(percentages.len());
    let bar = progress_bar(percentages.len() as u64, "Writing age grade tables");

    for percentage in percentages {
        let path = dir.join(targets_file_name(gender, *percentage));
        let file = File::create(&path)?;
        write_targets(BufWriter::new(file), calculator, gender, *percentage, ages)?;

        paths.push(path);
        bar.inc(1);
    }
    bar.finish();

    info!("Wrote {} age grade target tables to {}", paths.len(), dir.display());
    Ok(paths)
}

/// Widens a rendered whole-second time to `h:mm:ss`
fn pad_hours(time: &str) -> String {
    let fields: Vec<&str> = time.split(':').collect();

    match fields.as_slice() {
        [seconds] => format!("0:00:{:0>2}", seconds),
        [minutes, seconds] => format!("0:{:0>2}:{:0>2}", minutes, seconds),
        _ => time.to_string()
    }
}
