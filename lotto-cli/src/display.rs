use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use lotto_db::models::Draw;
use lotto_insight::insight::InsightType;
use lotto_insight::interval::IntervalBucket;
use lotto_insight::report::InsightReport;
use lotto_insight::stats::RangeBuckets;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("No draws to show.");
        return;
    }

    let mut table = new_table(vec!["Round", "Date", "Numbers", "Bonus"]);
    for draw in draws {
        let mut sorted = draw.numbers;
        sorted.sort();

        table.add_row(vec![
            draw.round.to_string(),
            draw.date.map(|d| d.to_string()).unwrap_or_else(|| "—".to_string()),
            join_numbers(&sorted),
            draw.bonus.map(|b| b.to_string()).unwrap_or_else(|| "—".to_string()),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import finished:");
    println!("  Records read : {}", result.total_records);
    println!("  Inserted     : {}", result.inserted);
    println!("  Duplicates   : {}", result.skipped);
    if result.errors > 0 {
        println!("  Errors       : {}", result.errors);
    }
}

pub fn display_ranges(ranges: &RangeBuckets) {
    let mut table = new_table(vec!["Range", "Count", "Share"]);
    let total = ranges.total();
    for (label, count) in ranges.iter() {
        let share = if total > 0 {
            format!("{:.1} %", 100.0 * count as f64 / total as f64)
        } else {
            "—".to_string()
        };
        table.add_row(vec![label.to_string(), count.to_string(), share]);
    }
    println!("{table}");
}

pub fn display_report(report: &InsightReport) {
    match (report.first_round, report.latest_round) {
        (Some(first), Some(last)) => println!(
            "\nWindow: {} draws (rounds {} to {})\n",
            report.draw_count, first, last
        ),
        _ => println!("\nWindow: empty\n"),
    }

    println!("── Ranges ──");
    display_ranges(&report.ranges);

    println!("\nHot numbers : {}", join_numbers(&report.hot_numbers));
    match report.last_overlap {
        Some(overlap) => println!("Overlap with previous draw : {}", overlap),
        None => println!("Overlap with previous draw : —"),
    }

    let color = match report.insight.kind {
        InsightType::ConsecutiveDrop => Color::Red,
        InsightType::RangeBias => Color::Yellow,
        InsightType::HotNumber => Color::Green,
        InsightType::Balanced => Color::White,
    };
    let mut table = new_table(vec!["Insight", "Message"]);
    table.add_row(vec![
        Cell::new(report.insight.kind.to_string()).fg(color),
        Cell::new(report.insight.message),
    ]);
    println!("\n{table}");
}

pub fn display_gaps(gaps: &[(u8, Option<i64>)], base_round: u32) {
    println!("\nGaps relative to round {}\n", base_round);

    let mut sorted = gaps.to_vec();
    // longest absence first, never-seen numbers last
    sorted.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    let mut table = new_table(vec!["Number", "Gap"]);
    for (number, gap) in &sorted {
        table.add_row(vec![
            format!("{:2}", number),
            gap.map(|g| g.to_string()).unwrap_or_else(|| "never".to_string()),
        ]);
    }
    println!("{table}");
}

pub fn display_intervals(buckets: &[IntervalBucket]) {
    if buckets.is_empty() {
        println!("No scored items.");
        return;
    }

    let mut table = new_table(vec!["Interval", "Average score"]);
    for bucket in buckets {
        table.add_row(vec![
            bucket.interval_label.clone(),
            format!("{:.4}", bucket.average_score),
        ]);
    }
    println!("{table}");
}
