use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::quote_types::ProcessedData;

const SEPARATOR: char = ',';
const UTF8_BOM: &str = "\u{feff}";
const HEADER: [&str; 3] = ["player_name", "prob_goal", "prob_assist"];

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteExportRow {
    pub player_name: String,
    pub prob_goal: f64,
    pub prob_assist: f64,
}

/// Outer join of scorers and assists by exact name. A player missing from
/// one side gets 0 there. Sorted by goal probability, highest first.
pub fn build_export_rows(data: &ProcessedData) -> Vec<QuoteExportRow> {
    let mut merged: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for p in &data.scorers {
        merged.entry(p.player_name.as_str()).or_default().0 = p.probability();
    }
    for p in &data.assists {
        merged.entry(p.player_name.as_str()).or_default().1 = p.probability();
    }

    let mut rows: Vec<QuoteExportRow> = merged
        .into_iter()
        .map(|(name, (goal, assist))| QuoteExportRow {
            player_name: name.to_string(),
            prob_goal: round2(goal),
            prob_assist: round2(assist),
        })
        .collect();
    rows.sort_by(|a, b| b.prob_goal.total_cmp(&a.prob_goal));
    rows
}

pub fn write_quotes_csv(path: &Path, rows: &[QuoteExportRow]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    w.write_all(UTF8_BOM.as_bytes())?;
    write_row(&mut w, &HEADER.map(str::to_string))?;
    for row in rows {
        write_row(
            &mut w,
            &[
                row.player_name.clone(),
                format!("{:.2}", row.prob_goal),
                format!("{:.2}", row.prob_assist),
            ],
        )?;
    }
    w.flush()
        .with_context(|| format!("failed writing {}", path.display()))
}

/// Export step of a run: never fails the caller, only logs.
pub fn save_all_quotes(path: &Path, data: &ProcessedData) -> Option<usize> {
    let rows = build_export_rows(data);
    if rows.is_empty() {
        warn!("no scorer or assist quotes to export");
        return None;
    }
    match write_quotes_csv(path, &rows) {
        Ok(()) => {
            info!(players = rows.len(), path = %path.display(), "quotes exported");
            Some(rows.len())
        }
        Err(err) => {
            error!("quote export failed: {err:#}");
            None
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEPARATOR) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[String]) -> std::io::Result<()> {
    for (idx, cell) in row.iter().enumerate() {
        if idx > 0 {
            write!(w, "{}", SEPARATOR)?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    writeln!(w)
}
