pub mod appearance;
pub mod config;
pub mod coordinator;
pub mod insight;
pub mod interval;
pub mod key;
pub mod report;
pub mod stats;

#[cfg(test)]
pub(crate) fn make_test_draws(n: usize) -> Vec<lotto_db::models::Draw> {
    (0..n)
        .map(|i| {
            let base = (i % 7) as u8;
            lotto_db::models::Draw {
                round: i as u32 + 1,
                date: None,
                numbers: [
                    base + 1,
                    base + 8,
                    base + 15,
                    base + 22,
                    base + 29,
                    base + 36,
                ],
                bonus: Some(base + 2),
            }
        })
        .collect()
}
