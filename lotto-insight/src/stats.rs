use lotto_db::models::{Draw, MAX_NUMBER};

pub const RANGE_LABELS: [&str; 5] = ["1-10", "11-20", "21-30", "31-40", "41-45"];

pub const DEFAULT_HOT_TOP_N: usize = 5;

/// Occurrence counts for the five fixed number ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeBuckets {
    counts: [u32; 5],
}

impl RangeBuckets {
    pub fn from_counts(counts: [u32; 5]) -> Self {
        Self { counts }
    }

    pub fn bucket_index(number: u8) -> usize {
        match number {
            0..=10 => 0,
            11..=20 => 1,
            21..=30 => 2,
            31..=40 => 3,
            _ => 4,
        }
    }

    pub fn add(&mut self, number: u8) {
        self.counts[Self::bucket_index(number)] += 1;
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        RANGE_LABELS
            .iter()
            .position(|&l| l == label)
            .map(|i| self.counts[i])
    }

    pub fn counts(&self) -> &[u32; 5] {
        &self.counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        RANGE_LABELS.iter().copied().zip(self.counts.iter().copied())
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn average(&self) -> f64 {
        self.total() as f64 / self.counts.len() as f64
    }
}

pub fn range_stats(draws: &[Draw]) -> RangeBuckets {
    let mut buckets = RangeBuckets::default();
    for draw in draws {
        for &n in &draw.numbers {
            buckets.add(n);
        }
    }
    buckets
}

/// Occurrences of each number in the window, indexed by `number - 1`.
pub fn number_frequencies(draws: &[Draw]) -> Vec<u32> {
    let mut counts = vec![0u32; MAX_NUMBER as usize];
    for draw in draws {
        for &n in &draw.numbers {
            let idx = (n as usize).wrapping_sub(1);
            if idx < counts.len() {
                counts[idx] += 1;
            }
        }
    }
    counts
}

/// Up to `top_n` most frequent numbers; ties go to the smaller number and
/// numbers that never appeared are left out.
pub fn hot_numbers(draws: &[Draw], top_n: usize) -> Vec<u8> {
    let mut ranked: Vec<(u8, u32)> = number_frequencies(draws)
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .map(|(i, count)| ((i + 1) as u8, count))
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(top_n).map(|(n, _)| n).collect()
}

/// How many of the last draw's numbers were also in the draw before it.
pub fn last_overlap(draws: &[Draw]) -> Option<usize> {
    match draws {
        [.., previous, current] => Some(
            current
                .numbers
                .iter()
                .filter(|&&n| previous.contains(n))
                .count(),
        ),
        _ => None,
    }
}

pub fn consecutive_drop(draws: &[Draw]) -> bool {
    consecutive_drop_with(draws, 1)
}

pub fn consecutive_drop_with(draws: &[Draw], max_overlap: usize) -> bool {
    last_overlap(draws).is_some_and(|overlap| overlap <= max_overlap)
}
