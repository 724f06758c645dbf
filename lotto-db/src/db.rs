use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;

use crate::models::Draw;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    round    INTEGER PRIMARY KEY,
    date     TEXT,
    num_1    INTEGER NOT NULL,
    num_2    INTEGER NOT NULL,
    num_3    INTEGER NOT NULL,
    num_4    INTEGER NOT NULL,
    num_5    INTEGER NOT NULL,
    num_6    INTEGER NOT NULL,
    bonus    INTEGER
);
";

const DRAW_COLUMNS: &str = "round, date, num_1, num_2, num_3, num_4, num_5, num_6, bonus";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {:?}", parent))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Cannot open database {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).context("Migration failed")?;
    Ok(())
}

fn row_to_draw(row: &Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        round: row.get(0)?,
        date: row.get(1)?,
        numbers: [
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        bonus: row.get(8)?,
    })
}

/// Returns `false` when a draw with the same round is already stored.
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO draws (round, date, num_1, num_2, num_3, num_4, num_5, num_6, bonus)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                draw.round,
                draw.date,
                draw.numbers[0],
                draw.numbers[1],
                draw.numbers[2],
                draw.numbers[3],
                draw.numbers[4],
                draw.numbers[5],
                draw.bonus,
            ],
        )
        .with_context(|| format!("Insert of round {} failed", draw.round))?;
    Ok(changed > 0)
}

/// The most recent `limit` draws, ascending by round.
pub fn fetch_window(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DRAW_COLUMNS} FROM draws ORDER BY round DESC LIMIT ?1"
    ))?;
    let mut draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    draws.reverse();
    Ok(draws)
}

/// The `limit` draws up to and including `round`, ascending by round.
pub fn fetch_window_until(conn: &Connection, round: u32, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DRAW_COLUMNS} FROM draws WHERE round <= ?1 ORDER BY round DESC LIMIT ?2"
    ))?;
    let mut draws = stmt
        .query_map([round, limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    draws.reverse();
    Ok(draws)
}

pub fn fetch_draw(conn: &Connection, round: u32) -> Result<Option<Draw>> {
    let draw = conn
        .query_row(
            &format!("SELECT {DRAW_COLUMNS} FROM draws WHERE round = ?1"),
            [round],
            row_to_draw,
        )
        .optional()?;
    Ok(draw)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

pub fn latest_round(conn: &Connection) -> Result<Option<u32>> {
    let round: Option<u32> = conn.query_row("SELECT MAX(round) FROM draws", [], |row| row.get(0))?;
    Ok(round)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_draw(round: u32) -> Draw {
        let base = (round % 7) as u8;
        Draw {
            round,
            date: NaiveDate::from_ymd_opt(2024, 1, 1 + (round % 28)),
            numbers: [base + 1, base + 8, base + 15, base + 22, base + 29, base + 36],
            bonus: Some(base + 2),
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(1)).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = memory_db();

        assert!(insert_draw(&conn, &test_draw(1)).unwrap());
        assert!(!insert_draw(&conn, &test_draw(1)).unwrap());
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_window_ascending() {
        let conn = memory_db();
        for round in [3, 1, 5, 2, 4] {
            insert_draw(&conn, &test_draw(round)).unwrap();
        }

        let draws = fetch_window(&conn, 3).unwrap();
        let rounds: Vec<u32> = draws.iter().map(|d| d.round).collect();
        assert_eq!(rounds, vec![3, 4, 5]);
    }

    #[test]
    fn test_fetch_window_until_older_round() {
        let conn = memory_db();
        for round in 1..=30 {
            insert_draw(&conn, &test_draw(round)).unwrap();
        }

        let draws = fetch_window_until(&conn, 15, 10).unwrap();
        let rounds: Vec<u32> = draws.iter().map(|d| d.round).collect();
        assert_eq!(rounds, (6..=15).collect::<Vec<u32>>());

        let short = fetch_window_until(&conn, 3, 10).unwrap();
        assert_eq!(short.len(), 3);
        assert!(fetch_window_until(&conn, 0, 10).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_draw_roundtrip() {
        let conn = memory_db();
        let draw = test_draw(12);
        insert_draw(&conn, &draw).unwrap();

        assert_eq!(fetch_draw(&conn, 12).unwrap(), Some(draw));
        assert_eq!(fetch_draw(&conn, 13).unwrap(), None);
    }

    #[test]
    fn test_missing_bonus_and_date_stored_as_null() {
        let conn = memory_db();
        let draw = Draw::new(8, [1, 2, 3, 4, 5, 6], None).unwrap();
        insert_draw(&conn, &draw).unwrap();

        let stored = fetch_draw(&conn, 8).unwrap().unwrap();
        assert_eq!(stored.bonus, None);
        assert_eq!(stored.date, None);
    }

    #[test]
    fn test_latest_round() {
        let conn = memory_db();
        assert_eq!(latest_round(&conn).unwrap(), None);

        insert_draw(&conn, &test_draw(7)).unwrap();
        insert_draw(&conn, &test_draw(2)).unwrap();
        assert_eq!(latest_round(&conn).unwrap(), Some(7));
    }
}
