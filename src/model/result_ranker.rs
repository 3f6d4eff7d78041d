use itertools::Itertools;

use crate::model::{
    constants::PERCENTAGE_PRECISION,
    precision::{precision_for_distance, render_time},
    structures::{
        race_result::{PlaceField, RaceResult},
        ranking_metric::RankingMetric,
        tie_policy::TiePolicy
    }
};

/// How one grouping is ordered and how ties within it are detected and placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingRule {
    pub metric: RankingMetric,
    /// Decimal places the metric is displayed (and compared) at
    pub precision: usize,
    pub high_to_low: bool,
    pub tie_policy: TiePolicy
}

impl RankingRule {
    pub fn new(metric: RankingMetric, precision: usize) -> RankingRule {
        RankingRule {
            metric,
            precision,
            high_to_low: metric.default_high_to_low(),
            tie_policy: TiePolicy::Max
        }
    }

    /// Rule using the display precision of `metric` at a race distance (miles)
    pub fn for_distance(metric: RankingMetric, distance_miles: f64) -> RankingRule {
        let precision = precision_for_distance(distance_miles);

        let precision = match metric {
            RankingMetric::Time => precision.time,
            RankingMetric::AgTime => precision.ag_time,
            RankingMetric::AgPercentage => PERCENTAGE_PRECISION
        };

        RankingRule::new(metric, precision)
    }

    pub fn with_high_to_low(mut self, high_to_low: bool) -> RankingRule {
        self.high_to_low = high_to_low;
        self
    }

    pub fn with_tie_policy(mut self, tie_policy: TiePolicy) -> RankingRule {
        self.tie_policy = tie_policy;
        self
    }

    /// The value as displayed. Two competitors tie when these are equal.
    pub fn render(&self, value: f64) -> String {
        match self.metric {
            RankingMetric::Time | RankingMetric::AgTime => render_time(value, self.precision),
            RankingMetric::AgPercentage => format!("{:.*}", self.precision, value)
        }
    }
}

pub struct ResultRanker;

impl ResultRanker {
    /// Places for `values`, returned in input order
    pub fn rank_values(values: &[f64], rule: &RankingRule) -> Vec<f64> {
        let order = ResultRanker::sorted_order(values, rule);
        let rendered: Vec<String> = order.iter().map(|i| rule.render(values[*i])).collect();
        let sorted_places = ResultRanker::block_places(&rendered, rule.tie_policy);

        let mut places = vec![0.0; values.len()];
        for (position, index) in order.into_iter().enumerate() {
            places[index] = sorted_places[position];
        }

        places
    }

    /// Assigns `field` for every result in the grouping which has a value for
    /// the rule's metric. Results without one (never age graded) are left
    /// unplaced. Returns how many were placed.
    pub fn rank(results: &mut [&mut RaceResult], rule: &RankingRule, field: PlaceField) -> usize {
        let ranked: Vec<(usize, f64)> = results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.metric(rule.metric).map(|v| (i, v)))
            .collect();

        let values: Vec<f64> = ranked.iter().map(|(_, v)| *v).collect();
        let places = ResultRanker::rank_values(&values, rule);

        for result in results.iter_mut() {
            result.set_place(field, None);
        }

        for ((index, _), place) in ranked.iter().zip(places) {
            results[*index].set_place(field, Some(place));
        }

        ranked.len()
    }

    /// Indices of `values` in ranking order, stable for equal values
    fn sorted_order(values: &[f64], rule: &RankingRule) -> Vec<usize> {
        (0..values.len())
            .sorted_by(|a, b| {
                if rule.high_to_low {
                    values[*b].total_cmp(&values[*a])
                } else {
                    values[*a].total_cmp(&values[*b])
                }
            })
            .collect()
    }

    /// Places for values already in ranking order. Adjacent equal rendered
    /// values form a tie block which shares one place.
    fn block_places(rendered: &[String], tie_policy: TiePolicy) -> Vec<f64> {
        let mut places = vec![0.0; rendered.len()];

        let mut start = 0;
        while start < rendered.len() {
            let len = rendered[start..]
                .iter()
                .take_while(|r| **r == rendered[start])
                .count();
            let end = start + len;

            let first = (start + 1) as f64;
            let place = match tie_policy {
                TiePolicy::Average if len > 1 => (first + end as f64) / 2.0,
                _ => first
            };

            places[start..end].fill(place);
            start = end;
        }

        places
    }
}
