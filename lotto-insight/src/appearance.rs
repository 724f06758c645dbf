use lotto_db::models::{Draw, MAX_NUMBER};

/// Rounds in which each number appeared, ascending when the window is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppearanceMap {
    rounds: Vec<Vec<u32>>,
}

impl AppearanceMap {
    /// Empty slice for numbers outside 1..=45.
    pub fn rounds(&self, number: u8) -> &[u32] {
        (number as usize)
            .checked_sub(1)
            .and_then(|idx| self.rounds.get(idx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[u32])> + '_ {
        self.rounds
            .iter()
            .enumerate()
            .map(|(i, rounds)| ((i + 1) as u8, rounds.as_slice()))
    }
}

pub fn build_appearance_map(draws: &[Draw]) -> AppearanceMap {
    let mut rounds = vec![Vec::new(); MAX_NUMBER as usize];
    for draw in draws {
        for &n in &draw.numbers {
            let idx = (n as usize).wrapping_sub(1);
            if idx < rounds.len() {
                rounds[idx].push(draw.round);
            }
        }
    }
    AppearanceMap { rounds }
}

/// Rounds since `number` last appeared before `base_round`. An appearance in
/// `base_round` itself is ignored.
pub fn current_gap_excluding_round(number: u8, base_round: u32, map: &AppearanceMap) -> Option<i64> {
    map.rounds(number)
        .iter()
        .rev()
        .find(|&&round| round != base_round)
        .map(|&last| base_round as i64 - last as i64)
}

/// Gap for every number 1..=45 relative to `base_round`.
pub fn current_gaps(base_round: u32, map: &AppearanceMap) -> Vec<(u8, Option<i64>)> {
    (1..=MAX_NUMBER)
        .map(|n| (n, current_gap_excluding_round(n, base_round, map)))
        .collect()
}
