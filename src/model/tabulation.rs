use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::{
    model::{
        age_grade_calculator::AgeGradeCalculator,
        error::{AgeGradeError, Result},
        precision::{adjust_time, precision_for_distance},
        result_ranker::{RankingRule, ResultRanker},
        structures::{
            age_grade::AgeGrade,
            division::Division,
            gender::Gender,
            processing::{Grouping, TabulationSummary},
            race::Race,
            race_result::{PlaceField, RaceResult},
            ranking_metric::RankingMetric,
            series::Series
        }
    },
    utils::progress_utils::progress_bar
};

/// Grades and places the results of one race for one series
pub struct Tabulator<'a> {
    calculator: &'a AgeGradeCalculator
}

impl<'a> Tabulator<'a> {
    pub fn new(calculator: &'a AgeGradeCalculator) -> Tabulator<'a> {
        Tabulator { calculator }
    }

    /// Replaces every produced field of `results`: age grades, divisions and
    /// the places `series` awards. Running it twice gives the same output,
    /// and an error leaves `results` unchanged.
    pub fn tabulate(&self, race: &Race, series: &Series, results: &mut [RaceResult]) -> Result<TabulationSummary> {
        let divisions = match &series.divisions {
            Some(d) if d.is_empty() => {
                return Err(AgeGradeError::NoDivisions {
                    series: series.name.clone()
                });
            }
            Some(d) => Some(d.as_slice()),
            None => None
        };

        info!(
            "Tabulating {} results of {} for series {}",
            results.len(),
            race.name,
            series.name
        );

        // Records are only updated once every grade has been computed
        let precision = precision_for_distance(race.distance);
        let bar = progress_bar(results.len() as u64, "Age grading results");
        let mut grades: Vec<Option<AgeGrade>> = Vec::with_capacity(results.len());
        for result in results.iter() {
            let grade = match result.age {
                Some(age) => {
                    let adjusted = adjust_time(result.time, precision.time);
                    Some(self.calculator.compute_for(age as f64, result.gender, race.distance, adjusted)?)
                }
                None => None
            };

            grades.push(grade);
            bar.inc(1);
        }
        bar.finish_and_clear();

        let mut graded = 0;
        for (result, grade) in results.iter_mut().zip(grades) {
            result.clear_tabulation();
            result.age_grade = grade;
            if grade.is_some() {
                graded += 1;
            }

            if let (Some(divisions), Some(age)) = (divisions, result.division_age) {
                result.division = Division::find(divisions, age);
            }
        }

        let ungraded = results.len() - graded;
        if ungraded > 0 {
            warn!("{} results of {} have no age and were not age graded", ungraded, race.name);
        }

        let rule = RankingRule::for_distance(series.order_by, race.distance)
            .with_high_to_low(series.high_to_low)
            .with_tie_policy(series.tie_policy());

        let passes: Vec<(Vec<Grouping>, PlaceField)> = match series.order_by {
            RankingMetric::Time => {
                let mut passes = vec![
                    (vec![Grouping::overall()], PlaceField::Overall),
                    (Gender::iter().map(Grouping::gender).collect(), PlaceField::Gender),
                ];

                if let Some(divisions) = divisions {
                    let groupings = Gender::iter()
                        .flat_map(|g| divisions.iter().map(move |d| Grouping::division(g, *d)))
                        .collect();
                    passes.push((groupings, PlaceField::Division));
                }

                passes
            }
            RankingMetric::AgTime => vec![(Gender::iter().map(Grouping::gender).collect(), PlaceField::AgTime)],
            RankingMetric::AgPercentage => {
                vec![(Gender::iter().map(Grouping::gender).collect(), PlaceField::AgPercentage)]
            }
        };

        let mut groupings = 0;
        for (pass_groupings, field) in passes {
            for grouping in pass_groupings {
                let placed = rank_grouping(results, &grouping, &rule, field);
                debug!("Placed {} results in {:?} for {:?}", placed, grouping, field);
                groupings += 1;
            }
        }

        let summary = TabulationSummary {
            series: series.name.clone(),
            order_by: series.order_by,
            entries: results.len(),
            graded,
            ungraded,
            groupings
        };

        info!(
            "Tabulated {} for series {}: {} entries, {} graded",
            race.name, series.name, summary.entries, summary.graded
        );

        Ok(summary)
    }
}

fn rank_grouping(results: &mut [RaceResult], grouping: &Grouping, rule: &RankingRule, field: PlaceField) -> usize {
    let mut members: Vec<&mut RaceResult> = results.iter_mut().filter(|r| grouping.contains(r)).collect();
    ResultRanker::rank(&mut members, rule, field)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use crate::{
        model::{
            age_grade_calculator::AgeGradeCalculator,
            error::{AgeGradeError, ErrorKind},
            structures::{
                division::Division, gender::Gender, race::Race, race_result::RaceResult,
                ranking_metric::RankingMetric, series::Series
            },
            tabulation::Tabulator
        },
        utils::test_utils::{generate_result, generate_results, generate_table}
    };

    fn calculator() -> AgeGradeCalculator {
        AgeGradeCalculator::new(Arc::new(generate_table()))
    }

    fn race(distance: f64) -> Race {
        Race {
            id: 1,
            name: "Test Race".to_string(),
            date: NaiveDate::from_ymd_opt(2013, 6, 1).unwrap(),
            distance
        }
    }

    fn places(results: &[RaceResult], place: fn(&RaceResult) -> Option<f64>) -> Vec<Option<f64>> {
        results.iter().map(place).collect()
    }

    #[test]
    fn test_time_series_places() {
        let calc = calculator();
        let series = Series::new("Overall", RankingMetric::Time);
        let mut results = vec![
            generate_result(1, Gender::F, Some(40), 1600.0, 3.1),
            generate_result(2, Gender::M, Some(40), 1500.0, 3.1),
            generate_result(3, Gender::F, Some(30), 1550.0, 3.1),
            generate_result(4, Gender::M, None, 1700.0, 3.1),
        ];

        let summary = Tabulator::new(&calc).tabulate(&race(3.1), &series, &mut results).unwrap();

        assert_eq!(summary.entries, 4);
        assert_eq!(summary.graded, 3);
        assert_eq!(summary.ungraded, 1);
        // overall, F, M
        assert_eq!(summary.groupings, 3);

        assert_eq!(places(&results, |r| r.overall_place), vec![Some(3.0), Some(1.0), Some(2.0), Some(4.0)]);
        assert_eq!(places(&results, |r| r.gender_place), vec![Some(2.0), Some(1.0), Some(1.0), Some(2.0)]);
        assert!(results.iter().all(|r| r.division_place.is_none() && r.ag_time_place.is_none()));
        assert!(results[3].age_grade.is_none());
    }

    #[test]
    fn test_grades_adjusted_time() {
        let calc = calculator();
        let series = Series::new("Overall", RankingMetric::Time);
        let distance = 10000.0 / 1609.0;
        let mut results = vec![generate_result(1, Gender::M, Some(40), 1999.2, distance)];

        Tabulator::new(&calc).tabulate(&race(distance), &series, &mut results).unwrap();

        // 1999.2 is rounded up to 2000 before grading
        let grade = results[0].age_grade.unwrap();
        assert_abs_diff_eq!(grade.factor, 0.88, epsilon = 1e-12);
        assert_abs_diff_eq!(grade.graded_time, 1760.0, epsilon = 1e-9);
        assert_abs_diff_eq!(grade.percentage, 107.95454545454545, epsilon = 1e-9);
        // The raw time is kept
        assert_eq!(results[0].time, 1999.2);
    }

    #[test]
    fn test_division_places() {
        let calc = calculator();
        let series = Series::new("Grand Prix", RankingMetric::Time)
            .with_divisions(vec![Division::new(0, 39), Division::new(40, 99)]);

        let mut results = vec![
            generate_result(1, Gender::M, Some(45), 1500.0, 3.1),
            generate_result(2, Gender::M, Some(46), 1400.0, 3.1),
            generate_result(3, Gender::M, Some(30), 1450.0, 3.1),
            generate_result(4, Gender::M, Some(50), 1300.0, 3.1),
        ];
        for result in results.iter_mut() {
            result.division_age = result.age;
        }
        // No Jan 1 age, so no division
        results[3].division_age = None;

        let summary = Tabulator::new(&calc).tabulate(&race(3.1), &series, &mut results).unwrap();

        // overall, F, M and 2 divisions for each gender
        assert_eq!(summary.groupings, 7);
        assert_eq!(results[0].division, Some(Division::new(40, 99)));
        assert_eq!(results[2].division, Some(Division::new(0, 39)));
        assert_eq!(results[3].division, None);

        assert_eq!(
            places(&results, |r| r.division_place),
            vec![Some(2.0), Some(1.0), Some(1.0), None]
        );
        assert_eq!(places(&results, |r| r.gender_place), vec![Some(4.0), Some(2.0), Some(3.0), Some(1.0)]);
    }

    #[test]
    fn test_empty_divisions_rejected_before_ranking() {
        let calc = calculator();
        let series = Series::new("Grand Prix", RankingMetric::Time).with_divisions(vec![]);
        let mut results = generate_results(10, 3.1, 1500.0, 1);

        let err = Tabulator::new(&calc).tabulate(&race(3.1), &series, &mut results).unwrap_err();

        assert!(matches!(err, AgeGradeError::NoDivisions { .. }));
        assert_eq!(err.kind(), ErrorKind::ConfigurationInconsistency);
        assert!(results.iter().all(|r| r.overall_place.is_none() && r.age_grade.is_none()));
    }

    #[test]
    fn test_ag_time_series() {
        let calc = calculator();
        let series = Series::new("Age Grade", RankingMetric::AgTime).with_average_tie(true);
        let mut results = vec![
            generate_result(1, Gender::F, Some(25), 1500.0, 3.1),
            generate_result(2, Gender::F, Some(60), 1700.0, 3.1),
            generate_result(3, Gender::F, None, 1200.0, 3.1),
            generate_result(4, Gender::M, Some(40), 1600.0, 3.1),
        ];

        let summary = Tabulator::new(&calc).tabulate(&race(3.1), &series, &mut results).unwrap();
        assert_eq!(summary.groupings, 2);

        // The 60 year old's 1700 grades to well under 1500
        assert_eq!(places(&results, |r| r.ag_time_place), vec![Some(2.0), Some(1.0), None, Some(1.0)]);
        assert!(results.iter().all(|r| r.overall_place.is_none() && r.gender_place.is_none()));
    }

    #[test]
    fn test_ag_percentage_series_is_high_to_low() {
        let calc = calculator();
        let series = Series::new("Age Grade", RankingMetric::AgPercentage);
        let mut results = vec![
            generate_result(1, Gender::M, Some(40), 1800.0, 3.1),
            generate_result(2, Gender::M, Some(40), 1500.0, 3.1),
        ];

        Tabulator::new(&calc).tabulate(&race(3.1), &series, &mut results).unwrap();

        assert_eq!(places(&results, |r| r.ag_percentage_place), vec![Some(2.0), Some(1.0)]);
    }

    #[test]
    fn test_tabulation_is_repeatable() {
        let calc = calculator();
        let series = Series::new("Grand Prix", RankingMetric::Time)
            .with_average_tie(true)
            .with_divisions(vec![Division::new(0, 29), Division::new(30, 49), Division::new(50, 99)]);
        let mut results = generate_results(120, 3.1, 1500.0, 42);

        let tabulator = Tabulator::new(&calc);
        let first_summary = tabulator.tabulate(&race(3.1), &series, &mut results).unwrap();
        let first = results.clone();
        let second_summary = tabulator.tabulate(&race(3.1), &series, &mut results).unwrap();

        assert_eq!(first_summary, second_summary);
        assert_eq!(first, results);
    }

    #[test]
    fn test_failed_grading_leaves_results_untouched() {
        let calc = calculator();
        let series = Series::new("Overall", RankingMetric::Time);
        let mut results = vec![
            generate_result(1, Gender::F, Some(40), 1600.0, 3.1),
            generate_result(2, Gender::M, Some(40), 1500.0, 3.1),
        ];

        let tabulator = Tabulator::new(&calc);
        tabulator.tabulate(&race(3.1), &series, &mut results).unwrap();
        results.push(generate_result(3, Gender::M, Some(35), 0.0, 3.1));
        let before = results.clone();

        let err = tabulator.tabulate(&race(3.1), &series, &mut results).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(before, results);
        assert_eq!(places(&results, |r| r.overall_place), vec![Some(2.0), Some(1.0), None]);
    }

    #[test]
    fn test_distance_out_of_range_propagates() {
        let calc = calculator();
        let series = Series::new("Overall", RankingMetric::Time);
        let mut results = vec![generate_result(1, Gender::M, Some(40), 100.0, 0.5)];

        let err = Tabulator::new(&calc).tabulate(&race(0.5), &series, &mut results).unwrap_err();
        assert!(matches!(err, AgeGradeError::DistanceOutOfRange { .. }));
    }
}
