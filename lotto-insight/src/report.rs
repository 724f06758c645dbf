use lotto_db::models::Draw;

use crate::appearance::{build_appearance_map, current_gaps};
use crate::config::InsightConfig;
use crate::insight::{select_insight_with, Insight, InsightContext};
use crate::stats::{consecutive_drop_with, hot_numbers, last_overlap, range_stats, RangeBuckets};

/// Everything derived from one window of draws.
#[derive(Debug, Clone)]
pub struct InsightReport {
    pub draw_count: usize,
    pub first_round: Option<u32>,
    pub latest_round: Option<u32>,
    pub ranges: RangeBuckets,
    pub hot_numbers: Vec<u8>,
    pub last_overlap: Option<usize>,
    pub insight: Insight,
    /// Gap of each number relative to `latest_round`.
    pub gaps: Vec<(u8, Option<i64>)>,
}

impl InsightReport {
    /// Uses the last `config.window` draws of `draws`, which must be ascending by round.
    pub fn compute(draws: &[Draw], config: &InsightConfig) -> Self {
        let start = draws.len().saturating_sub(config.window);
        let window = &draws[start..];

        let ctx = InsightContext {
            has_consecutive_drop: consecutive_drop_with(window, config.max_drop_overlap),
            recent_ranges: range_stats(window),
            recent_hot_numbers: hot_numbers(window, config.hot_top_n),
        };
        let insight = select_insight_with(&ctx, config.range_bias_ratio);

        let latest_round = window.last().map(|d| d.round);
        let gaps = match latest_round {
            Some(base) => current_gaps(base, &build_appearance_map(window)),
            None => Vec::new(),
        };

        log::debug!(
            "report over {} draws: insight={}, hot={:?}",
            window.len(),
            insight.kind,
            ctx.recent_hot_numbers
        );

        InsightReport {
            draw_count: window.len(),
            first_round: window.first().map(|d| d.round),
            latest_round,
            ranges: ctx.recent_ranges,
            hot_numbers: ctx.recent_hot_numbers,
            last_overlap: last_overlap(window),
            insight,
            gaps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::InsightType;
    use crate::make_test_draws;

    #[test]
    fn test_report_uses_trailing_window() {
        let draws = make_test_draws(30);
        let config = InsightConfig {
            window: 10,
            ..InsightConfig::default()
        };
        let report = InsightReport::compute(&draws, &config);
        assert_eq!(report.draw_count, 10);
        assert_eq!(report.first_round, Some(21));
        assert_eq!(report.latest_round, Some(30));
        assert_eq!(report.ranges.total(), 60);
        assert_eq!(report.gaps.len(), 45);
    }

    #[test]
    fn test_report_window_larger_than_history() {
        let draws = make_test_draws(3);
        let report = InsightReport::compute(&draws, &InsightConfig::default());
        assert_eq!(report.draw_count, 3);
        assert_eq!(report.first_round, Some(1));
    }

    #[test]
    fn test_report_detects_drop() {
        // successive test draws never share a number
        let draws = make_test_draws(5);
        let report = InsightReport::compute(&draws, &InsightConfig::default());
        assert_eq!(report.last_overlap, Some(0));
        assert_eq!(report.insight.kind, InsightType::ConsecutiveDrop);
    }

    #[test]
    fn test_report_gaps_relative_to_latest() {
        let draws = vec![
            Draw::new(1, [1, 2, 3, 4, 5, 6], None).unwrap(),
            Draw::new(2, [1, 2, 3, 7, 8, 9], None).unwrap(),
            Draw::new(3, [1, 2, 3, 10, 11, 12], None).unwrap(),
        ];
        let report = InsightReport::compute(&draws, &InsightConfig::default());
        assert_eq!(report.gaps[0], (1, Some(1)));
        assert_eq!(report.gaps[3], (4, Some(2)));
        assert_eq!(report.gaps[9], (10, None));
        assert_eq!(report.hot_numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(report.insight.kind, InsightType::RangeBias);
    }

    #[test]
    fn test_report_empty() {
        let report = InsightReport::compute(&[], &InsightConfig::default());
        assert_eq!(report.draw_count, 0);
        assert_eq!(report.latest_round, None);
        assert!(report.gaps.is_empty());
        assert_eq!(report.insight.kind, InsightType::Balanced);
    }
}
