use std::{fmt::Display, sync::Arc};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use racegrade::{
    model::{
        age_grade_calculator::AgeGradeCalculator,
        result_ranker::{RankingRule, ResultRanker},
        structures::{
            race_result::{PlaceField, RaceResult},
            ranking_metric::RankingMetric,
            tie_policy::TiePolicy
        }
    },
    utils::test_utils::{generate_results, generate_table}
};

#[derive(Debug, Clone)]
struct TestInput {
    results: Vec<RaceResult>
}

impl Display for TestInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Results: {}", self.results.len())
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let rule = RankingRule::new(RankingMetric::Time, 0).with_tie_policy(TiePolicy::Average);

    let mut group = c.benchmark_group("rank_results");
    for n in [100, 1_000, 10_000] {
        let input = TestInput {
            results: generate_results(n, 3.1, 1500.0, 1)
        };

        group.bench_with_input(BenchmarkId::new("rank", &input), &input, |b, input| {
            b.iter(|| {
                let mut results = input.results.clone();
                let mut refs: Vec<&mut RaceResult> = results.iter_mut().collect();
                ResultRanker::rank(&mut refs, &rule, PlaceField::Overall)
            })
        });
    }
    group.finish();

    let calculator = AgeGradeCalculator::new(Arc::new(generate_table()));
    c.bench_function("compute", |b| {
        b.iter(|| calculator.compute(47.0, "F", 6.2, 2950.0))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
