#![allow(dead_code)]

use std::{fs, path::PathBuf, sync::Once};

use racegrade::{model::structures::gender::Gender, utils::test_utils::generate_sheet_csv};
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Writes the generated men's and women's sheets into `dir`
pub fn write_sheets(dir: &TempDir) -> (PathBuf, PathBuf) {
    let men = dir.path().join("men.csv");
    let women = dir.path().join("women.csv");

    fs::write(&men, generate_sheet_csv(Gender::M)).unwrap();
    fs::write(&women, generate_sheet_csv(Gender::F)).unwrap();

    (men, women)
}

pub const RESULTS_CSV: &str = "\
name,gender,age,time,dob
Ann Smith,F,41,22:10,
Bob Jones,M,45,20:05,1967-09-01
Cara Lee,F,,21:30,
Dan Park,M,28,20:05,
Eve Moss,F,63,25:59.6,1950-02-11
";
