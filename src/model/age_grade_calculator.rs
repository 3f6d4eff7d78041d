use std::{
    io::Write,
    sync::{Arc, Mutex}
};

use serde::Serialize;
use tracing::trace;

use crate::model::{
    age_grade_table::AgeGradeTable,
    constants::{
        AUDIT_HEADER, HALF_MARATHON_METERS, HALF_MARATHON_MILES, MARATHON_METERS, MARATHON_MILES, MAX_AGE,
        METERS_PER_MILE, MIN_AGE
    },
    error::{AgeGradeError, Result},
    structures::{age_grade::AgeGrade, gender::Gender}
};

type AuditWriter = csv::Writer<Box<dyn Write + Send>>;

/// One line of the age grade audit log. Field order matches [`AUDIT_HEADER`].
#[derive(Serialize)]
struct AuditRow {
    distmeters: f64,
    age: u32,
    gen: Gender,
    openstd: f64,
    factor: f64,
    time: f64,
    agresult: f64,
    agpercentage: f64
}

/// Computes age grade statistics against a shared [`AgeGradeTable`]
pub struct AgeGradeCalculator {
    table: Arc<AgeGradeTable>,
    debug_sink: Option<Mutex<AuditWriter>>
}

impl AgeGradeCalculator {
    pub fn new(table: Arc<AgeGradeTable>) -> AgeGradeCalculator {
        AgeGradeCalculator {
            table,
            debug_sink: None
        }
    }

    /// Every [`compute`](Self::compute) call appends one CSV line to `sink`.
    /// The header is written immediately.
    pub fn with_debug_sink<W: Write + Send + 'static>(table: Arc<AgeGradeTable>, sink: W) -> Result<AgeGradeCalculator> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Box::new(sink) as Box<dyn Write + Send>);
        writer.write_record(AUDIT_HEADER)?;
        writer.flush()?;

        Ok(AgeGradeCalculator {
            table,
            debug_sink: Some(Mutex::new(writer))
        })
    }

    pub fn table(&self) -> &AgeGradeTable {
        &self.table
    }

    /// Age grade statistics for a performance.
    ///
    /// - `age` is truncated, fractional ages are not interpolated. Ages below
    ///   5 use the age 5 row, ages above 99 use the age 99 row.
    /// - `gender` is `M` or `F`, any case
    /// - `distance_miles` is converted at 1609 m/mile, except 13.1 and 26.2
    ///   which are 21100m and 42200m
    /// - `time_seconds` is the elapsed time
    ///
    /// # Errors
    /// - [`AgeGradeError::InvalidGender`] for anything but M or F
    /// - [`AgeGradeError::DistanceOutOfRange`] outside the tabulated distances
    /// - [`AgeGradeError::MissingAgeFactor`] when the table lacks the age row
    pub fn compute(&self, age: f64, gender: &str, distance_miles: f64, time_seconds: f64) -> Result<AgeGrade> {
        self.compute_for(age, Gender::try_from(gender)?, distance_miles, time_seconds)
    }

    /// [`compute`](Self::compute) for an already parsed gender
    pub fn compute_for(&self, age: f64, gender: Gender, distance_miles: f64, time_seconds: f64) -> Result<AgeGrade> {
        if !(time_seconds.is_finite() && time_seconds > 0.0) {
            return Err(AgeGradeError::InvalidValue {
                parameter: "time",
                value: time_seconds
            });
        }

        let distance = self.checked_meters(gender, distance_miles)?;
        let age = truncate_age(age)?;
        let (factor, open_standard) = self.factor_and_standard(age, gender, distance)?;

        let percentage = 100.0 * (open_standard / factor) / time_seconds;
        let graded_time = time_seconds * factor;

        trace!(
            "age grade {} {} {}m {}s -> {:.2}% {:.1}s factor {:.4}",
            age,
            gender,
            distance,
            time_seconds,
            percentage,
            graded_time,
            factor
        );

        self.audit(AuditRow {
            distmeters: distance,
            age,
            gen: gender,
            openstd: open_standard,
            factor,
            time: time_seconds,
            agresult: graded_time,
            agpercentage: percentage
        })?;

        Ok(AgeGrade {
            percentage,
            graded_time,
            factor
        })
    }

    /// The time (seconds) which earns `percentage` for this age, gender and distance
    pub fn required_time(&self, age: f64, gender: &str, distance_miles: f64, percentage: f64) -> Result<f64> {
        self.required_time_for(age, Gender::try_from(gender)?, distance_miles, percentage)
    }

    pub fn required_time_for(&self, age: f64, gender: Gender, distance_miles: f64, percentage: f64) -> Result<f64> {
        if !(percentage.is_finite() && percentage > 0.0) {
            return Err(AgeGradeError::InvalidValue {
                parameter: "percentage",
                value: percentage
            });
        }

        let distance = self.checked_meters(gender, distance_miles)?;
        let age = truncate_age(age)?;
        let (factor, open_standard) = self.factor_and_standard(age, gender, distance)?;

        Ok(100.0 * (open_standard / factor) / percentage)
    }

    /// Factor and open standard interpolated on distance for this age.
    /// `distance` must already lie within the gender's tabulated range.
    pub fn factor_and_standard(&self, age: u32, gender: Gender, distance: f64) -> Result<(f64, f64)> {
        let age = age.clamp(MIN_AGE, MAX_AGE);
        let rows = self.table.rows(gender);
        let distances: Vec<u32> = rows.keys().copied().collect();

        if distances.len() == 1 {
            return self.table.lookup(gender, distances[0], age);
        }

        // First x1 >= distance scanning from the second entry, x0 the entry before
        let upper = distances[1..]
            .iter()
            .position(|d| distance <= *d as f64)
            .map(|i| i + 1)
            .unwrap_or(distances.len() - 1);
        let x0 = distances[upper - 1];
        let x1 = distances[upper];

        let (f0, oc0) = self.table.lookup(gender, x0, age)?;
        let (f1, oc1) = self.table.lookup(gender, x1, age)?;

        let ratio = (distance - x0 as f64) / (x1 as f64 - x0 as f64);
        let factor = f0 + (f1 - f0) * ratio;
        let open_standard = oc0 + (oc1 - oc0) * ratio;

        Ok((factor, open_standard))
    }

    fn checked_meters(&self, gender: Gender, distance_miles: f64) -> Result<f64> {
        let distance = miles_to_meters(distance_miles);
        let (min, max) = self.table.distance_range(gender);

        if !(distance >= min as f64 && distance <= max as f64) {
            return Err(AgeGradeError::DistanceOutOfRange {
                distance_miles,
                min_miles: min as f64 / METERS_PER_MILE,
                max_miles: max as f64 / METERS_PER_MILE
            });
        }

        Ok(distance)
    }

    fn audit(&self, row: AuditRow) -> Result<()> {
        let Some(sink) = &self.debug_sink else {
            return Ok(());
        };

        let mut writer = sink
            .lock()
            .map_err(|_| AgeGradeError::AuditSink("debug sink lock poisoned".to_string()))?;
        writer.serialize(row)?;
        writer.flush()?;

        Ok(())
    }
}

/// Race distance in meters, honoring the canonical half marathon and
/// marathon distances
pub fn miles_to_meters(distance_miles: f64) -> f64 {
    if distance_miles == MARATHON_MILES {
        MARATHON_METERS
    } else if distance_miles == HALF_MARATHON_MILES {
        HALF_MARATHON_METERS
    } else {
        distance_miles * METERS_PER_MILE
    }
}

fn truncate_age(age: f64) -> Result<u32> {
    if !age.is_finite() {
        return Err(AgeGradeError::InvalidValue {
            parameter: "age",
            value: age
        });
    }

    // Negative ages clamp to the youngest row anyway
    Ok(age.trunc().max(0.0) as u32)
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Write},
        sync::{Arc, Mutex}
    };

    use approx::assert_abs_diff_eq;

    use crate::{
        model::{
            age_grade_calculator::{miles_to_meters, AgeGradeCalculator},
            constants::METERS_PER_MILE,
            error::{AgeGradeError, ErrorKind},
            structures::gender::Gender
        },
        utils::test_utils::generate_table
    };

    fn calculator() -> AgeGradeCalculator {
        AgeGradeCalculator::new(Arc::new(generate_table()))
    }

    /// Collects writes so tests can inspect the audit log
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_scenario_upper_tabulated_point() {
        let calc = calculator();
        let ag = calc.compute(40.0, "M", 10000.0 / METERS_PER_MILE, 2000.0).unwrap();

        assert_abs_diff_eq!(ag.factor, 0.88, epsilon = 1e-12);
        assert_abs_diff_eq!(ag.graded_time, 1760.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ag.percentage, 100.0 * (1900.0 / 0.88) / 2000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ag.percentage, 107.95, epsilon = 0.01);
    }

    #[test]
    fn test_interpolation_endpoints_and_midpoint() {
        let calc = calculator();
        let table = calc.table();
        let distances = table.distances(Gender::F);

        for pair in distances.windows(2) {
            let (x0, x1) = (pair[0], pair[1]);
            let (f0, oc0) = table.lookup(Gender::F, x0, 50).unwrap();
            let (f1, oc1) = table.lookup(Gender::F, x1, 50).unwrap();

            let (f, oc) = calc.factor_and_standard(50, Gender::F, x0 as f64).unwrap();
            assert_abs_diff_eq!(f, f0, epsilon = 1e-12);
            assert_abs_diff_eq!(oc, oc0, epsilon = 1e-9);

            let (f, oc) = calc.factor_and_standard(50, Gender::F, x1 as f64).unwrap();
            assert_abs_diff_eq!(f, f1, epsilon = 1e-12);
            assert_abs_diff_eq!(oc, oc1, epsilon = 1e-9);

            let midpoint = (x0 as f64 + x1 as f64) / 2.0;
            let (f, oc) = calc.factor_and_standard(50, Gender::F, midpoint).unwrap();
            assert_abs_diff_eq!(f, (f0 + f1) / 2.0, epsilon = 1e-12);
            assert_abs_diff_eq!(oc, (oc0 + oc1) / 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_young_ages_clamp_to_five() {
        let calc = calculator();
        let young = calc.compute(3.0, "F", 5.0, 2400.0).unwrap();
        let five = calc.compute(5.0, "F", 5.0, 2400.0).unwrap();

        assert_eq!(young, five);
    }

    #[test]
    fn test_old_ages_clamp_to_ninety_nine() {
        let calc = calculator();
        let old = calc.compute(150.0, "M", 5.0, 4000.0).unwrap();
        let ninety_nine = calc.compute(99.0, "M", 5.0, 4000.0).unwrap();

        assert_eq!(old, ninety_nine);
    }

    #[test]
    fn test_fractional_age_is_truncated() {
        let calc = calculator();

        assert_eq!(
            calc.compute(40.99, "M", 6.2, 2400.0).unwrap(),
            calc.compute(40.0, "M", 6.2, 2400.0).unwrap()
        );
    }

    #[test]
    fn test_gender_case_insensitive() {
        let calc = calculator();

        assert_eq!(
            calc.compute(40.0, "m", 6.2, 2400.0).unwrap(),
            calc.compute(40.0, "M", 6.2, 2400.0).unwrap()
        );
    }

    #[test]
    fn test_typed_gender_matches_code() {
        let calc = calculator();

        assert_eq!(
            calc.compute_for(52.0, Gender::F, 6.2, 2700.0).unwrap(),
            calc.compute(52.0, "f", 6.2, 2700.0).unwrap()
        );
        assert_eq!(
            calc.required_time_for(52.0, Gender::M, 3.1, 70.0).unwrap(),
            calc.required_time(52.0, "M", 3.1, 70.0).unwrap()
        );
    }

    #[test]
    fn test_invalid_gender() {
        let err = calculator().compute(40.0, "X", 6.2, 2400.0).unwrap_err();

        assert!(matches!(err, AgeGradeError::InvalidGender { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_canonical_distances() {
        assert_eq!(miles_to_meters(26.2), 42200.0);
        assert_eq!(miles_to_meters(13.1), 21100.0);
        assert_eq!(miles_to_meters(2.0), 3218.0);
    }

    #[test]
    fn test_half_marathon_uses_canonical_distance() {
        let calc = calculator();
        let canonical = calc.compute(40.0, "M", 13.1, 5400.0).unwrap();
        let (factor, open_standard) = calc.table().lookup(Gender::M, 21100, 40).unwrap();

        assert_abs_diff_eq!(canonical.factor, factor, epsilon = 1e-12);
        assert_abs_diff_eq!(canonical.percentage, 100.0 * (open_standard / factor) / 5400.0, epsilon = 1e-9);

        // 13.1 * 1609 would land short of the tabulated half marathon
        let (naive_factor, _) = calc.factor_and_standard(40, Gender::M, 13.1 * METERS_PER_MILE).unwrap();
        assert!((naive_factor - canonical.factor).abs() > 1e-6);
    }

    #[test]
    fn test_marathon_uses_canonical_distance() {
        let calc = calculator();
        let canonical = calc.compute(55.0, "F", 26.2, 14400.0).unwrap();
        let (factor, _) = calc.table().lookup(Gender::F, 42200, 55).unwrap();

        assert_abs_diff_eq!(canonical.factor, factor, epsilon = 1e-12);

        let (naive_factor, _) = calc.factor_and_standard(55, Gender::F, 26.2 * METERS_PER_MILE).unwrap();
        assert!((naive_factor - canonical.factor).abs() > 1e-6);
    }

    #[test]
    fn test_distance_range_is_inclusive() {
        let calc = calculator();

        // 1609m and 42200m are the table bounds
        assert!(calc.compute(40.0, "M", 1.0, 300.0).is_ok());
        assert!(calc.compute(40.0, "M", 26.2, 10000.0).is_ok());
    }

    #[test]
    fn test_distance_out_of_range() {
        let calc = calculator();

        let short = calc.compute(40.0, "M", 0.5, 150.0).unwrap_err();
        let long = calc.compute(40.0, "M", 31.0, 20000.0).unwrap_err();

        for err in [short, long] {
            match err {
                AgeGradeError::DistanceOutOfRange { min_miles, max_miles, .. } => {
                    assert_abs_diff_eq!(min_miles, 1.0);
                    assert_abs_diff_eq!(max_miles, 42200.0 / METERS_PER_MILE);
                }
                other => panic!("unexpected error {other:?}")
            }
        }
    }

    #[test]
    fn test_invalid_time() {
        let calc = calculator();

        assert!(calc.compute(40.0, "M", 5.0, 0.0).is_err());
        assert!(calc.compute(40.0, "M", 5.0, f64::NAN).is_err());
    }

    #[test]
    fn test_required_time_inverts_percentage() {
        let calc = calculator();
        let ag = calc.compute(62.0, "F", 6.2, 2900.0).unwrap();
        let time = calc.required_time(62.0, "F", 6.2, ag.percentage).unwrap();

        assert_abs_diff_eq!(time, 2900.0, epsilon = 1e-6);
    }

    #[test]
    fn test_required_time_rejects_zero_percentage() {
        let err = calculator().required_time(62.0, "F", 6.2, 0.0).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_debug_sink_header_and_rows() {
        let buffer = SharedBuffer::default();
        let calc = AgeGradeCalculator::with_debug_sink(Arc::new(generate_table()), buffer.clone()).unwrap();

        assert_eq!(
            buffer.contents(),
            "distmeters,age,gen,openstd,factor,time,agresult,agpercentage\n"
        );

        calc.compute(40.0, "M", 10000.0 / METERS_PER_MILE, 2000.0).unwrap();
        calc.compute(3.0, "f", 5.0, 2400.0).unwrap();

        let contents = buffer.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("10000.0,40,M,1900.0,0.88,2000.0,1760.0,"));
        // The input age is logged, not the clamped row
        assert!(lines[2].starts_with("8045.0,3,F,"));
    }
}
