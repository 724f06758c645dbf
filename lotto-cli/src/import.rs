use anyhow::{Context, Result};
use lotto_db::rusqlite::Connection;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use lotto_db::db::insert_draw;
use lotto_db::models::{ApiDraw, Draw};

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Parses a JSON array of API records, or a single record object.
pub fn parse_json_records(text: &str) -> Result<Vec<Result<Draw>>> {
    let value: Value = serde_json::from_str(text).context("Invalid JSON")?;
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    Ok(items
        .into_iter()
        .map(|item| {
            let api: ApiDraw = serde_json::from_value(item).context("Malformed draw record")?;
            Draw::try_from(api)
        })
        .collect())
}

/// Parses CSV whose header row uses the API field names (`drwNo`, `drwtNo1`, ...).
pub fn parse_csv_records<R: Read>(reader: R) -> Vec<Result<Draw>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    reader
        .deserialize::<ApiDraw>()
        .map(|record| {
            let api = record.context("Malformed CSV record")?;
            Draw::try_from(api)
        })
        .collect()
}

pub fn import_records(conn: &Connection, records: Vec<Result<Draw>>) -> Result<ImportResult> {
    let tx = conn
        .unchecked_transaction()
        .context("Cannot start transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record in records {
        result.total_records += 1;
        match record {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    log::warn!("Record {}: insert failed: {:#}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::warn!("Record {}: {:#}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Commit failed")?;
    log::info!(
        "Imported {} of {} records ({} duplicates, {} errors)",
        result.inserted,
        result.total_records,
        result.skipped,
        result.errors
    );
    Ok(result)
}

pub fn import_file(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let records = if is_csv {
        let file =
            std::fs::File::open(path).with_context(|| format!("Cannot open {:?}", path))?;
        parse_csv_records(file)
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open {:?}", path))?;
        parse_json_records(&text).with_context(|| format!("Cannot parse {:?}", path))?
    };

    import_records(conn, records)
}
