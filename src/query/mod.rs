//! In-memory SPAC table and the read-only rankings over it.
//!
//! Rankings parse the display strings back into numbers, sort stably (ties keep
//! document order), truncate to `limit` and re-format the sort column for display.
//! A row whose sort column does not parse fails the whole ranking.

use crate::error::{Result, SpacError};
use crate::models::{RankedRow, SpacRecord};
use crate::scraper::cleaner::{parse_percent, parse_volume};
use crate::utils::group_thousands;
use std::collections::HashMap;

// ── Table ─────────────────────────────────────────────────────────────────────

/// Rows in document order, indexed by symbol.
#[derive(Debug, Clone, Default)]
pub struct SpacTable {
    records: Vec<SpacRecord>,
    index: HashMap<String, usize>,
}

impl SpacTable {
    /// Build the table, refusing duplicate symbols.
    pub fn from_records(records: Vec<SpacRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            if index.insert(r.symbol.clone(), i).is_some() {
                return Err(SpacError::DuplicateSymbol(r.symbol.clone()));
            }
        }
        Ok(Self { records, index })
    }

    pub fn get(&self, symbol: &str) -> Option<&SpacRecord> {
        self.index.get(symbol).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[SpacRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct industries in first-seen order.
    pub fn industries(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for r in &self.records {
            if !seen.contains(&r.industry) {
                seen.push(r.industry.clone());
            }
        }
        seen
    }
}

// ── Rankings ──────────────────────────────────────────────────────────────────

fn parsed<'a>(
    table: &'a SpacTable,
    field: &'static str,
    get: impl Fn(&SpacRecord) -> &str,
    parse: impl Fn(&str) -> Option<f64>,
) -> Result<Vec<(&'a SpacRecord, f64)>> {
    table
        .records
        .iter()
        .enumerate()
        .map(|(row, r)| {
            let raw = get(r);
            parse(raw).map(|v| (r, v)).ok_or_else(|| {
                SpacError::malformed(row, field, format!("`{}` of {} is not a number", raw, r.symbol))
            })
        })
        .collect()
}

fn project(r: &SpacRecord) -> RankedRow {
    RankedRow {
        symbol: r.symbol.clone(),
        price: r.price.clone(),
        change_percent: r.change_percent.clone(),
        volume: r.volume.clone(),
    }
}

fn rank_by_change(table: &SpacTable, limit: usize, descending: bool) -> Result<Vec<RankedRow>> {
    let mut rows = parsed(table, "change_percent", |r| r.change_percent.as_str(), parse_percent)?;
    if descending {
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    } else {
        rows.sort_by(|a, b| a.1.total_cmp(&b.1));
    }

    Ok(rows
        .into_iter()
        .take(limit)
        .map(|(r, change)| RankedRow {
            change_percent: format!("{:?} %", change),
            ..project(r)
        })
        .collect())
}

/// Largest percentage increase first.
pub fn top_gainers(table: &SpacTable, limit: usize) -> Result<Vec<RankedRow>> {
    rank_by_change(table, limit, true)
}

/// Largest percentage decrease first.
pub fn top_losers(table: &SpacTable, limit: usize) -> Result<Vec<RankedRow>> {
    rank_by_change(table, limit, false)
}

/// Highest traded volume first; volume is re-rendered with thousands separators.
pub fn volume_leaders(table: &SpacTable, limit: usize) -> Result<Vec<RankedRow>> {
    let mut rows = parsed(table, "volume", |r| r.volume.as_str(), parse_volume)?;
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(rows
        .into_iter()
        .take(limit)
        .map(|(r, volume)| RankedRow {
            volume: group_thousands(volume),
            ..project(r)
        })
        .collect())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
