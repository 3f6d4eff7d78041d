use crate::model::{
    age_grade_table::{AgeGradeTable, DistanceRow},
    constants::{MAX_AGE, MIN_AGE},
    structures::{gender::Gender, race_result::RaceResult}
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Distances (meters) and open standards (seconds) of the generated table
const MEN_STANDARDS: [(u32, f64); 5] = [(1609, 230.0), (5000, 900.0), (10000, 1900.0), (21100, 3500.0), (42200, 7400.0)];
const WOMEN_STANDARDS: [(u32, f64); 5] = [(1609, 255.0), (5000, 1000.0), (10000, 2100.0), (21100, 3900.0), (42200, 8200.0)];

/// Synthetic age grade factor. Peaks at 1.0 between 20 and 30 (less a small
/// per-distance step), falls off on either side.
fn synthetic_factor(gender: Gender, age: u32, distance_index: usize) -> f64 {
    let base = match age {
        0..=19 => 1.0 - (20 - age) as f64 * 0.02,
        20..=30 => 1.0,
        _ => 1.0 - (age - 30) as f64 * 0.0075
    };
    let gender_offset = match gender {
        Gender::F => 0.01,
        Gender::M => 0.0
    };

    base - gender_offset - 0.004 * distance_index as f64
}

fn standards(gender: Gender) -> &'static [(u32, f64); 5] {
    match gender {
        Gender::F => &WOMEN_STANDARDS,
        Gender::M => &MEN_STANDARDS
    }
}

/// The nested mapping behind [`generate_table`].
///
/// Men aged 40 have the factors 0.90 at 5000m and 0.88 at 10000m.
pub fn generate_table_map() -> BTreeMap<Gender, BTreeMap<u32, DistanceRow>> {
    let mut data = BTreeMap::new();

    for gender in Gender::iter() {
        let mut rows = BTreeMap::new();
        for (i, (distance, open_standard)) in standards(gender).iter().enumerate() {
            let mut row = DistanceRow::new(*open_standard);
            for age in MIN_AGE..=MAX_AGE {
                row.factors.insert(age, synthetic_factor(gender, age, i));
            }

            rows.insert(*distance, row);
        }

        data.insert(gender, rows);
    }

    let men = data.get_mut(&Gender::M).expect("men generated above");
    men.get_mut(&5000).expect("5000m generated above").factors.insert(40, 0.90);
    men.get_mut(&10000).expect("10000m generated above").factors.insert(40, 0.88);

    data
}

pub fn generate_table() -> AgeGradeTable {
    AgeGradeTable::from_map(generate_table_map()).expect("generated table is valid")
}

/// [`generate_table`]'s rows for `gender` as a workbook sheet exported to CSV,
/// including a non-running event row
pub fn generate_sheet_csv(gender: Gender) -> String {
    let data = generate_table_map();
    let ages: Vec<u32> = (MIN_AGE..=MAX_AGE).collect();

    let mut csv = String::from("event,dist(km),OC");
    for age in &ages {
        csv.push_str(&format!(",{}.0", age));
    }
    csv.push('\n');

    csv.push_str("High Jump,0.0,2.45");
    for _ in &ages {
        csv.push_str(",0.5");
    }
    csv.push('\n');

    for (distance, row) in &data[&gender] {
        csv.push_str(&format!("{}m,{},{}", distance, *distance as f64 / 1000.0, row.open_standard));
        for age in &ages {
            csv.push_str(&format!(",{}", row.factors[age]));
        }
        csv.push('\n');
    }

    csv
}

pub fn generate_result(runner_id: i32, gender: Gender, age: Option<u32>, time: f64, distance: f64) -> RaceResult {
    RaceResult::new(runner_id, &format!("Runner {}", runner_id), gender, age, time, distance)
}

/// `n` results with seeded random genders, ages (18-80, some unknown) and
/// times around `typical_time`
pub fn generate_results(n: i32, distance: f64, typical_time: f64, seed: u64) -> Vec<RaceResult> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (1..=n)
        .map(|id| {
            let gender = if rng.random_bool(0.5) { Gender::F } else { Gender::M };
            let age = if rng.random_bool(0.9) {
                Some(rng.random_range(18..=80))
            } else {
                None
            };
            let time = typical_time * rng.random_range(0.7..=1.6);

            let mut result = generate_result(id, gender, age, time, distance);
            result.division_age = age.map(|a| a.saturating_sub(1));
            result
        })
        .collect()
}

/// Results with the given times, alternating F and M, all aged 40
pub fn generate_timed_results(times: &[f64], distance: f64) -> Vec<RaceResult> {
    times
        .iter()
        .enumerate()
        .map(|(i, time)| {
            let gender = if i % 2 == 0 { Gender::F } else { Gender::M };
            let mut result = generate_result(i as i32 + 1, gender, Some(40), *time, distance);
            result.division_age = Some(40);
            result
        })
        .collect()
}
