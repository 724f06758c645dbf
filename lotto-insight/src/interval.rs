use std::collections::HashMap;

use anyhow::{bail, Result};
use lotto_db::models::MAX_NUMBER;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub value: i64,
    #[serde(deserialize_with = "numeric_score")]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalBucket {
    pub interval_label: String,
    pub average_score: f64,
}

// Backends sometimes send scores as numeric strings.
fn numeric_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Number(f64),
        Text(String),
    }

    match RawScore::deserialize(deserializer)? {
        RawScore::Number(n) => Ok(n),
        RawScore::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("score '{}' is not numeric", s))),
    }
}

/// `start-end` for the `size`-wide interval holding `value`, clipped at 45.
/// `value` must lie in 1..=45.
fn interval_label(value: i64, size: i64) -> String {
    let start = (value - 1).div_euclid(size) * size + 1;
    let end = (start + size - 1).min(MAX_NUMBER as i64);
    format!("{}-{}", start, end)
}

pub fn build_interval_ensemble(
    items: &[ScoredItem],
    size: u32,
    sort_by_score: bool,
) -> Result<Vec<IntervalBucket>> {
    if size == 0 {
        bail!("Interval size must be positive");
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    // (label, score sum, item count), in first-seen order
    let mut groups: Vec<(String, f64, usize)> = Vec::new();

    for item in items {
        if item.value < 1 || item.value > MAX_NUMBER as i64 {
            bail!("Value {} out of range (1-{})", item.value, MAX_NUMBER);
        }
        let label = interval_label(item.value, size as i64);
        let slot = match index.get(&label) {
            Some(&i) => i,
            None => {
                index.insert(label.clone(), groups.len());
                groups.push((label, 0.0, 0));
                groups.len() - 1
            }
        };
        groups[slot].1 += item.score;
        groups[slot].2 += 1;
    }

    let mut buckets: Vec<IntervalBucket> = groups
        .into_iter()
        .map(|(interval_label, sum, count)| IntervalBucket {
            interval_label,
            average_score: sum / count as f64,
        })
        .collect();

    if sort_by_score {
        buckets.sort_by(|a, b| {
            b.average_score
                .partial_cmp(&a.average_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    Ok(buckets)
}
