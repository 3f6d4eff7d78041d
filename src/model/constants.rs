use indexmap::IndexMap;
use lazy_static::lazy_static;

// Meters per mile as used by the age grade tables (not 1609.344)
pub const METERS_PER_MILE: f64 = 1609.0;

// Canonical race distances which override the naive mile conversion
pub const MARATHON_MILES: f64 = 26.2;
pub const MARATHON_METERS: f64 = 42200.0;
pub const HALF_MARATHON_MILES: f64 = 13.1;
pub const HALF_MARATHON_METERS: f64 = 21100.0;

// Age rows present in every table
pub const MIN_AGE: u32 = 5;
pub const MAX_AGE: u32 = 99;

// Precision thresholds (meters), 200m and 400m plus a fudge factor
pub const SPRINT_PRECISION_LIMIT: f64 = 250.0;
pub const TRACK_PRECISION_LIMIT: f64 = 450.0;
pub const MILE_PRECISION_LIMIT_MILES: f64 = 1.0;

/// Decimal places used when age grade percentages are displayed and compared
pub const PERCENTAGE_PRECISION: usize = 2;
/// Decimal places used when age grade factors are displayed
pub const FACTOR_PRECISION: usize = 4;

// Sheet column headers
pub const DISTANCE_KM_COLUMN: &str = "dist(km)";
pub const OPEN_STANDARD_COLUMN: &str = "OC";

/// Header of the age grade audit log, order matches the written rows
pub const AUDIT_HEADER: [&str; 8] = [
    "distmeters",
    "age",
    "gen",
    "openstd",
    "factor",
    "time",
    "agresult",
    "agpercentage"
];

lazy_static! {
    /// Standard road distances (miles) used for age grade target tables
    pub static ref ROAD_DISTANCES: IndexMap<&'static str, f64> = {
        let mut distances = IndexMap::new();
        distances.insert("5kmRoad", 5000.0 / METERS_PER_MILE);
        distances.insert("6kmRoad", 6000.0 / METERS_PER_MILE);
        distances.insert("4MileRoad", 4.0);
        distances.insert("8kmRoad", 8000.0 / METERS_PER_MILE);
        distances.insert("5MileRoad", 5.0);
        distances.insert("10kmRoad", 10000.0 / METERS_PER_MILE);
        distances.insert("12km", 12000.0 / METERS_PER_MILE);
        distances.insert("15km", 15000.0 / METERS_PER_MILE);
        distances.insert("10Mile", 10.0);
        distances.insert("20km", 20000.0 / METERS_PER_MILE);
        distances.insert("Half Mar", HALF_MARATHON_MILES);
        distances.insert("25km", 25000.0 / METERS_PER_MILE);
        distances.insert("30km", 30000.0 / METERS_PER_MILE);
        distances.insert("Marathon", MARATHON_MILES);
        distances
    };
}
