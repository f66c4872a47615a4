//! CSV export of heat sheets and result books.
//!
//! Writers are generic over `io::Write`; `write_*_file` helpers create
//! the parent directory and flush to disk before returning.

use crate::meet::RaceHeats;
use crate::time::format_time;
use crate::types::RaceResult;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A row in the heat sheet CSV
#[derive(Debug, serde::Serialize)]
struct HeatRow<'a> {
    acara: u32,
    race: String,
    heat: u32,
    lane: u32,
    swimmer: &'a str,
    club: &'a str,
    seed: String,
}

/// A row in the results CSV
#[derive(Debug, serde::Serialize)]
struct ResultRow<'a> {
    acara: u32,
    race: String,
    rank: Option<u32>,
    swimmer: &'a str,
    club: &'a str,
    time: String,
    remark: Option<String>,
    medal: Option<String>,
}

/// Write one row per occupied lane
pub fn write_heat_sheet_csv<W: Write>(writer: W, sheets: &[RaceHeats]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for sheet in sheets {
        let race = sheet.race.key.to_string();
        for heat in &sheet.heats {
            for (lane, entrant) in heat.occupied() {
                csv.serialize(HeatRow {
                    acara: sheet.race.acara_number,
                    race: race.clone(),
                    heat: heat.heat_number,
                    lane,
                    swimmer: entrant.name(),
                    club: entrant.club(),
                    seed: format_time(entrant.entry.seed_ms()),
                })?;
                rows += 1;
            }
        }
    }

    csv.flush()?;
    Ok(rows)
}

/// Write one row per entrant, ranked entries first
///
/// Entries without a valid final time get an empty time column.
pub fn write_results_csv<W: Write>(writer: W, results: &[RaceResult]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for result in results {
        let race = result.race.key.to_string();
        for entry in &result.entries {
            let time = if entry.final_ms > 0 {
                format_time(entry.final_ms)
            } else {
                String::new()
            };
            csv.serialize(ResultRow {
                acara: result.race.acara_number,
                race: race.clone(),
                rank: entry.rank,
                swimmer: entry.entrant.name(),
                club: entry.entrant.club(),
                time,
                remark: entry.entrant.entry.remark.map(|r| r.to_string()),
                medal: entry.medal.map(|m| m.to_string()),
            })?;
            rows += 1;
        }
    }

    csv.flush()?;
    Ok(rows)
}

pub fn write_heat_sheet_file(path: &Path, sheets: &[RaceHeats]) -> Result<usize> {
    let file = create(path)?;
    let rows = write_heat_sheet_csv(&file, sheets)?;
    file.sync_all()?;
    tracing::info!("Wrote {} heat sheet rows to {:?}", rows, path);
    Ok(rows)
}

pub fn write_results_file(path: &Path, results: &[RaceResult]) -> Result<usize> {
    let file = create(path)?;
    let rows = write_results_csv(&file, results)?;
    file.sync_all()?;
    tracing::info!("Wrote {} result rows to {:?}", rows, path);
    Ok(rows)
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}
