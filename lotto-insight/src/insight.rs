use lotto_db::models::Draw;
use serde::Serialize;

use crate::stats::{consecutive_drop, hot_numbers, range_stats, RangeBuckets};

pub const DEFAULT_RANGE_BIAS_RATIO: f64 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsightType {
    ConsecutiveDrop,
    RangeBias,
    HotNumber,
    Balanced,
}

impl InsightType {
    pub fn message(&self) -> &'static str {
        match self {
            InsightType::ConsecutiveDrop => {
                "The latest draw shares almost no numbers with the one before it."
            }
            InsightType::RangeBias => "Recent draws lean heavily towards one number range.",
            InsightType::HotNumber => "A few numbers keep coming back in recent draws.",
            InsightType::Balanced => "Recent draws are evenly spread.",
        }
    }
}

impl std::fmt::Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightType::ConsecutiveDrop => write!(f, "CONSECUTIVE_DROP"),
            InsightType::RangeBias => write!(f, "RANGE_BIAS"),
            InsightType::HotNumber => write!(f, "HOT_NUMBER"),
            InsightType::Balanced => write!(f, "BALANCED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightContext {
    pub has_consecutive_drop: bool,
    pub recent_ranges: RangeBuckets,
    pub recent_hot_numbers: Vec<u8>,
}

impl InsightContext {
    pub fn from_draws(draws: &[Draw], top_n: usize) -> Self {
        Self {
            has_consecutive_drop: consecutive_drop(draws),
            recent_ranges: range_stats(draws),
            recent_hot_numbers: hot_numbers(draws, top_n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightType,
    pub message: &'static str,
}

/// What the rules see: the window's statistics plus the bias threshold.
struct RuleInput<'a> {
    ctx: &'a InsightContext,
    range_bias_ratio: f64,
}

type Rule = (fn(&RuleInput<'_>) -> bool, InsightType);

// Evaluated top to bottom; the first matching rule wins.
const RULES: &[Rule] = &[
    (has_consecutive_drop, InsightType::ConsecutiveDrop),
    (has_range_bias, InsightType::RangeBias),
    (has_hot_numbers, InsightType::HotNumber),
];

fn has_consecutive_drop(input: &RuleInput<'_>) -> bool {
    input.ctx.has_consecutive_drop
}

fn has_range_bias(input: &RuleInput<'_>) -> bool {
    let ranges = &input.ctx.recent_ranges;
    // an empty window has max == average == 0
    if ranges.total() == 0 {
        return false;
    }
    ranges.max() as f64 >= ranges.average() * input.range_bias_ratio
}

fn has_hot_numbers(input: &RuleInput<'_>) -> bool {
    !input.ctx.recent_hot_numbers.is_empty()
}

pub fn select_insight(ctx: &InsightContext) -> Insight {
    select_insight_with(ctx, DEFAULT_RANGE_BIAS_RATIO)
}

pub fn select_insight_with(ctx: &InsightContext, range_bias_ratio: f64) -> Insight {
    let input = RuleInput {
        ctx,
        range_bias_ratio,
    };
    let kind = RULES
        .iter()
        .find(|(applies, _)| applies(&input))
        .map(|&(_, kind)| kind)
        .unwrap_or(InsightType::Balanced);
    Insight {
        kind,
        message: kind.message(),
    }
}
