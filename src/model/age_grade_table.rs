use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf}
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::model::{
    constants::{DISTANCE_KM_COLUMN, OPEN_STANDARD_COLUMN},
    error::{AgeGradeError, Result},
    structures::gender::Gender
};

/// Open standard and age factors for one distance
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DistanceRow {
    /// Open class standard, in seconds
    #[serde(rename = "OC")]
    pub open_standard: f64,
    /// Age (years) to age grade factor
    pub factors: BTreeMap<u32, f64>
}

impl DistanceRow {
    pub fn new(open_standard: f64) -> DistanceRow {
        DistanceRow {
            open_standard,
            factors: BTreeMap::new()
        }
    }
}

/// Where the age grade table comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    /// One CSV export per gender sheet of the age grade workbook
    Sheets { men: PathBuf, women: PathBuf },
    /// A snapshot previously written by [`AgeGradeTable::save_snapshot`]
    Snapshot(PathBuf),
    None
}

/// Age grade factors and open standards, keyed by gender, then distance in
/// meters, then age.
///
/// The table is read-only once built and can be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeGradeTable {
    data: BTreeMap<Gender, BTreeMap<u32, DistanceRow>>
}

// Gender keys are written as plain strings in snapshots
type SnapshotData = BTreeMap<String, BTreeMap<u32, DistanceRow>>;

impl AgeGradeTable {
    /// Builds the table from the nested mapping produced by a sheet loader.
    ///
    /// # Errors
    /// [`AgeGradeError::Format`] when a gender is missing or empty, a distance
    /// is zero, an open standard is not positive, or a factor lies outside (0, 1].
    pub fn from_map(data: BTreeMap<Gender, BTreeMap<u32, DistanceRow>>) -> Result<AgeGradeTable> {
        for gender in Gender::iter() {
            let rows = data
                .get(&gender)
                .ok_or_else(|| AgeGradeError::Format(format!("age grade table is missing gender {}", gender)))?;

            if rows.is_empty() {
                return Err(AgeGradeError::Format(format!("age grade table has no distances for gender {}", gender)));
            }

            for (distance, row) in rows {
                if *distance == 0 {
                    return Err(AgeGradeError::Format(format!("gender {} has a zero distance row", gender)));
                }

                if !(row.open_standard.is_finite() && row.open_standard > 0.0) {
                    return Err(AgeGradeError::Format(format!(
                        "gender {} distance {}m has invalid open standard {}",
                        gender, distance, row.open_standard
                    )));
                }

                if let Some((age, factor)) = row
                    .factors
                    .iter()
                    .find(|(_, f)| !(f.is_finite() && **f > 0.0 && **f <= 1.0))
                {
                    return Err(AgeGradeError::Format(format!(
                        "gender {} distance {}m age {} has factor {} outside (0, 1]",
                        gender, distance, age, factor
                    )));
                }
            }
        }

        Ok(AgeGradeTable { data })
    }

    /// Builds the table from the men's and women's sheets of the age grade
    /// workbook, each exported as CSV.
    ///
    /// Each sheet has a `dist(km)` column, an `OC` column and one column per
    /// age. Headers which are not numeric are ignored, as are rows whose
    /// distance is zero (non-running events).
    pub fn from_sheets<M: Read, W: Read>(men: M, women: W) -> Result<AgeGradeTable> {
        let mut data = BTreeMap::new();
        data.insert(Gender::M, read_sheet(men, Gender::M)?);
        data.insert(Gender::F, read_sheet(women, Gender::F)?);

        AgeGradeTable::from_map(data)
    }

    pub fn from_snapshot<R: Read>(reader: R) -> Result<AgeGradeTable> {
        let snapshot: SnapshotData = serde_json::from_reader(reader)?;

        let mut data = BTreeMap::new();
        for (key, rows) in snapshot {
            data.insert(Gender::try_from(key.as_str())?, rows);
        }

        AgeGradeTable::from_map(data)
    }

    pub fn to_snapshot<W: Write>(&self, writer: W) -> Result<()> {
        let snapshot: SnapshotData = self
            .data
            .iter()
            .map(|(gender, rows)| (gender.to_string(), rows.clone()))
            .collect();

        serde_json::to_writer(writer, &snapshot)?;
        Ok(())
    }

    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_snapshot(&mut writer)?;
        writer.flush()?;

        info!("Age grade snapshot written to {}", path.display());
        Ok(())
    }

    /// Loads the table from `source`.
    ///
    /// # Errors
    /// - [`AgeGradeError::MissingConfiguration`] when there is no source, or
    ///   the snapshot file does not exist
    /// - [`AgeGradeError::Format`] when a sheet cannot be opened or parsed
    pub fn load(source: &TableSource) -> Result<AgeGradeTable> {
        match source {
            TableSource::Sheets { men, women } => {
                debug!("Building age grade table from {} and {}", men.display(), women.display());
                let men = open_sheet(men)?;
                let women = open_sheet(women)?;

                AgeGradeTable::from_sheets(men, women)
            }
            TableSource::Snapshot(path) => {
                debug!("Loading age grade snapshot {}", path.display());
                let file = File::open(path).map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => AgeGradeError::MissingConfiguration(format!(
                        "snapshot {} not found, run racegrade configure",
                        path.display()
                    )),
                    _ => AgeGradeError::Io(e)
                })?;

                AgeGradeTable::from_snapshot(BufReader::new(file))
            }
            TableSource::None => Err(AgeGradeError::MissingConfiguration(
                "no age grade workbook or snapshot supplied, run racegrade configure".to_string()
            ))
        }
    }

    /// Tabulated distances (meters) for `gender`, ascending
    pub fn distances(&self, gender: Gender) -> Vec<u32> {
        self.rows(gender).keys().copied().collect()
    }

    /// Smallest and largest tabulated distance (meters) for `gender`
    pub fn distance_range(&self, gender: Gender) -> (u32, u32) {
        let rows = self.rows(gender);

        // from_map guarantees every gender has at least one row
        let min = rows.keys().next().copied().unwrap_or_default();
        let max = rows.keys().next_back().copied().unwrap_or_default();

        (min, max)
    }

    pub fn row(&self, gender: Gender, distance: u32) -> Option<&DistanceRow> {
        self.rows(gender).get(&distance)
    }

    pub(crate) fn rows(&self, gender: Gender) -> &BTreeMap<u32, DistanceRow> {
        &self.data[&gender]
    }

    /// The factor and open standard tabulated at exactly this distance and age
    pub fn lookup(&self, gender: Gender, distance: u32, age: u32) -> Result<(f64, f64)> {
        let missing = || AgeGradeError::MissingAgeFactor { gender, distance, age };

        let row = self.row(gender, distance).ok_or_else(missing)?;
        let factor = row.factors.get(&age).ok_or_else(missing)?;

        Ok((*factor, row.open_standard))
    }
}

fn open_sheet(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| AgeGradeError::Format(format!("age grade sheet {}: {}", path.display(), e)))
}

fn parse_cell(value: &str, column: &str, line: u64) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| {
        AgeGradeError::Format(format!(
            "line {}: column {:?} is not numeric ({:?})",
            line, column, value
        ))
    })
}

/// Header to age, e.g. `5.0` -> 5. Non-numeric headers are metadata.
fn header_age(header: &str) -> Option<u32> {
    let value = header.trim().parse::<f64>().ok()?;

    if value.is_finite() && value >= 0.0 {
        Some(value.trunc() as u32)
    } else {
        None
    }
}

fn read_sheet<R: Read>(reader: R, gender: Gender) -> Result<BTreeMap<u32, DistanceRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let column = |name: &str| {
        headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
            AgeGradeError::Format(format!("sheet for gender {} has no {:?} column", gender, name))
        })
    };
    let distance_column = column(DISTANCE_KM_COLUMN)?;
    let open_standard_column = column(OPEN_STANDARD_COLUMN)?;

    // column index -> age, in sheet order
    let ages: IndexMap<usize, u32> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| header_age(h).map(|age| (i, age)))
        .collect();

    let mut rows = BTreeMap::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let km = record.get(distance_column).unwrap_or_default().trim();
        if km.is_empty() {
            continue;
        }

        let km = parse_cell(km, DISTANCE_KM_COLUMN, line)?;
        if km == 0.0 {
            continue;
        }

        let distance = (km * 1000.0).round() as u32;
        let open_standard = parse_cell(
            record.get(open_standard_column).unwrap_or_default(),
            OPEN_STANDARD_COLUMN,
            line
        )?;

        let mut row = DistanceRow::new(open_standard);
        for (i, age) in ages.iter() {
            let cell = record.get(*i).unwrap_or_default();
            if cell.trim().is_empty() {
                continue;
            }

            row.factors.insert(*age, parse_cell(cell, &headers[*i], line)?);
        }

        rows.insert(distance, row);
    }

    debug!("Read {} distances for gender {}", rows.len(), gender);
    Ok(rows)
}
