//! Run orchestrator: source → extractor → (ranking) → report.
//!
//! One run performs at most one page fetch. The chosen [`Mode`] decides which row
//! filter is applied during extraction and which projection is reported.

use crate::config::{Mode, RunConfig};
use crate::error::{Result, SpacError};
use crate::export::{self, ExportFormat};
use crate::models::{RankedRow, SpacRecord};
use crate::query::{top_gainers, top_losers, volume_leaders, SpacTable};
use crate::scraper::parsers::{Layout, RowFilter};
use crate::scraper::{fetch_records, ListingSource};
use crate::utils::{render_table, RunTimer};
use std::path::{Path, PathBuf};
use tracing::warn;

/// What a run produced, ready to print or export.
#[derive(Debug, Clone)]
pub enum Report {
    Listing(SpacTable),
    Record(SpacRecord),
    Ranking { title: &'static str, rows: Vec<RankedRow> },
    Industries(Vec<String>),
}

impl Report {
    /// Console rendering.
    pub fn render(&self) -> String {
        match self {
            Report::Listing(table) => {
                let rows: Vec<Vec<String>> = table
                    .records()
                    .iter()
                    .map(|r| {
                        vec![
                            r.symbol.clone(),
                            r.price.clone(),
                            r.change_percent.clone(),
                            r.volume.clone(),
                            r.industry.clone(),
                        ]
                    })
                    .collect();
                render_table(&["symbol", "price", "change", "volume", "industry"], &rows)
            }
            Report::Record(record) => record
                .fields()
                .into_iter()
                .map(|(name, value)| format!("{:<20}{}", name, value))
                .collect::<Vec<_>>()
                .join("\n"),
            Report::Ranking { title, rows } => {
                let body: Vec<Vec<String>> = rows
                    .iter()
                    .map(|r| vec![r.symbol.clone(), r.price.clone(), r.change_percent.clone(), r.volume.clone()])
                    .collect();
                format!("{}\n{}", title, render_table(&["symbol", "price", "change", "volume"], &body))
            }
            Report::Industries(industries) => {
                let mut out = String::from("List of SPAC industries:");
                for industry in industries {
                    out.push_str(&format!("\n  * {}", industry));
                }
                out
            }
        }
    }

    /// Write the report under `dir`. The industry list has no tabular form and is skipped.
    pub fn export(&self, format: ExportFormat, dir: &Path, stem: &str) -> Result<Option<PathBuf>> {
        let path = match self {
            Report::Listing(table) => export::write(format, table.records(), dir, stem)?,
            Report::Record(record) => export::write(format, std::slice::from_ref(record), dir, stem)?,
            Report::Ranking { rows, .. } => export::write(format, rows, dir, stem)?,
            Report::Industries(_) => {
                warn!("The industry list is not exported");
                return Ok(None);
            }
        };
        Ok(Some(path))
    }
}

pub struct Pipeline {
    source: Box<dyn ListingSource>,
    layout: Layout,
}

impl Pipeline {
    pub fn new(source: Box<dyn ListingSource>, layout: Layout) -> Self {
        Self { source, layout }
    }

    pub async fn run(&self, run: &RunConfig) -> Result<Report> {
        let mut timer = RunTimer::start(format!("{:?}", run.mode));

        let filter = match &run.mode {
            Mode::All { optionable_only: true } => RowFilter::optionable(),
            Mode::Symbol(symbol) => RowFilter::symbol(symbol),
            Mode::Industry { name, optionable_only } => RowFilter::industry(name, *optionable_only),
            _ => RowFilter::all(),
        };

        let records = fetch_records(self.source.as_ref(), self.layout, &filter).await?;
        let table = SpacTable::from_records(records)?;
        timer.record_rows(table.len());

        let report = match &run.mode {
            Mode::All { .. } => {
                ensure_not_empty(&table, "No active spacs found".to_string())?;
                Report::Listing(table)
            }
            Mode::Symbol(symbol) => {
                let symbol = filter.symbol.as_deref().unwrap_or(symbol);
                match table.get(symbol) {
                    Some(record) => Report::Record(record.clone()),
                    None => return Err(SpacError::EmptyResult(format!("No SPAC found for {}", symbol))),
                }
            }
            Mode::Industry { .. } => {
                let name = filter.industry.as_deref().unwrap_or_default();
                ensure_not_empty(&table, format!("No industry found for {}", name))?;
                Report::Listing(table)
            }
            Mode::ListIndustries => Report::Industries(table.industries()),
            Mode::TopGainers => Report::Ranking {
                title: "Top gainers",
                rows: top_gainers(&table, run.limit)?,
            },
            Mode::TopLosers => Report::Ranking {
                title: "Top losers",
                rows: top_losers(&table, run.limit)?,
            },
            Mode::VolumeLeaders => Report::Ranking {
                title: "Volume leaders",
                rows: volume_leaders(&table, run.limit)?,
            },
        };

        Ok(report)
    }
}

fn ensure_not_empty(table: &SpacTable, message: String) -> Result<()> {
    if table.is_empty() {
        Err(SpacError::EmptyResult(message))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::fixtures::{classic_page, classic_row, StaticSource};

    fn pipeline() -> Pipeline {
        let html = classic_page(&[
            classic_row("AAAA", "10.00", "3.0 %", "$1,234,567", "Tech", "No"),
            classic_row("BBBB", "10.10", "12.5 %", "$9,999", "Energy", "Yes"),
            classic_row("CCCC", "9.90", "-1.0 %", "$2,000,000", "Tech", "Yes"),
        ]);
        Pipeline::new(Box::new(StaticSource(html)), Layout::Classic)
    }

    fn run(mode: Mode) -> Result<Report> {
        let cfg = RunConfig { mode, limit: 2, export: None };
        tokio_test::block_on(pipeline().run(&cfg))
    }

    #[test]
    fn test_full_listing() {
        match run(Mode::All { optionable_only: false }).unwrap() {
            Report::Listing(table) => assert_eq!(table.len(), 3),
            other => panic!("unexpected report: {other:?}"),
        }
        match run(Mode::All { optionable_only: true }).unwrap() {
            Report::Listing(table) => assert_eq!(table.len(), 2),
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn test_symbol_lookup() {
        match run(Mode::Symbol("bbbb".into())).unwrap() {
            Report::Record(r) => {
                assert_eq!(r.symbol, "BBBB");
                assert_eq!(r.industry, "energy");
                assert!(r.optionable);
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_symbol_is_empty_result() {
        let err = run(Mode::Symbol("zzzz".into())).unwrap_err();
        match err {
            SpacError::EmptyResult(msg) => assert_eq!(msg, "No SPAC found for ZZZZ"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_industry_is_empty_result() {
        let err = run(Mode::Industry { name: "Mining".into(), optionable_only: false }).unwrap_err();
        assert!(matches!(err, SpacError::EmptyResult(msg) if msg == "No industry found for mining"));
    }

    #[test]
    fn test_industry_listing() {
        match run(Mode::Industry { name: "TECH".into(), optionable_only: true }).unwrap() {
            Report::Listing(table) => {
                assert_eq!(table.len(), 1);
                assert!(table.get("CCCC").is_some());
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn test_rankings_respect_limit() {
        match run(Mode::TopGainers).unwrap() {
            Report::Ranking { rows, .. } => {
                let syms: Vec<_> = rows.iter().map(|r| r.symbol.as_str()).collect();
                assert_eq!(syms, ["BBBB", "AAAA"]);
            }
            other => panic!("unexpected report: {other:?}"),
        }
        match run(Mode::VolumeLeaders).unwrap() {
            Report::Ranking { rows, .. } => {
                assert_eq!(rows[0].symbol, "CCCC");
                assert_eq!(rows[0].volume, "2,000,000.0");
                assert_eq!(rows[1].volume, "1,234,567.0");
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn test_industries_report() {
        let report = run(Mode::ListIndustries).unwrap();
        assert_eq!(report.render(), "List of SPAC industries:\n  * tech\n  * energy");
    }

    #[test]
    fn test_industries_not_exported() {
        let report = Report::Industries(vec!["tech".into()]);
        let out = report.export(ExportFormat::Json, &std::env::temp_dir(), "spacs").unwrap();
        assert!(out.is_none());
    }
}
