//! HTML → raw rows.
//!
//! The page has no semantic markup for its columns, so each supported page layout is
//! described by a [`FieldMap`]: a field name → cell locator table. Extraction walks the
//! rows in document order, applies the caller's [`RowFilter`] while walking, and fails on
//! the first row that lacks an expected cell.

use crate::error::{Result, SpacError};
use crate::models::RawSpacRow;
use crate::scraper::cleaner::{normalise_industry, normalise_symbol, parse_optionable};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

// ── Layouts ───────────────────────────────────────────────────────────────────

/// Where one field lives inside a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLocator {
    /// Zero-based `<td>` index.
    pub column: usize,
    /// Optional CSS selector applied inside the cell.
    pub selector: Option<&'static str>,
    /// The token this layout renders for "no value".
    pub empty: Option<&'static str>,
}

impl CellLocator {
    const fn at(column: usize) -> Self {
        Self { column, selector: None, empty: None }
    }

    const fn within(column: usize, selector: &'static str) -> Self {
        Self { column, selector: Some(selector), empty: None }
    }

    const fn or_empty(column: usize, empty: &'static str) -> Self {
        Self { column, selector: None, empty: Some(empty) }
    }
}

/// Field → cell contract for one page layout.
#[derive(Debug, Clone)]
pub struct FieldMap {
    /// Selector yielding candidate data rows.
    pub rows: &'static str,
    /// Leading matches of `rows` that are headers/banners, not data.
    pub skip_rows: usize,
    /// Price, warrant and volume get a trailing `" $"` tag.
    pub currency_tagged: bool,
    pub symbol: CellLocator,
    pub price: CellLocator,
    pub change: CellLocator,
    pub warrant: Option<CellLocator>,
    pub volume: CellLocator,
    pub target: CellLocator,
    pub industry: CellLocator,
    pub market_cap: CellLocator,
    pub shares_outstanding: Option<CellLocator>,
    pub optionable: Option<CellLocator>,
    pub important_date: CellLocator,
    pub latest_update: Option<CellLocator>,
    pub merger_expectation: Option<CellLocator>,
    pub ipo_date: CellLocator,
}

impl FieldMap {
    /// Every mapped field with its locator, in column order of the record.
    pub fn locators(&self) -> Vec<(&'static str, CellLocator)> {
        let fields = [
            ("symbol", Some(self.symbol)),
            ("price", Some(self.price)),
            ("change_percent", Some(self.change)),
            ("warrant", self.warrant),
            ("volume", Some(self.volume)),
            ("target", Some(self.target)),
            ("industry", Some(self.industry)),
            ("market_cap", Some(self.market_cap)),
            ("shares_outstanding", self.shares_outstanding),
            ("optionable", self.optionable),
            ("important_date", Some(self.important_date)),
            ("latest_update", self.latest_update),
            ("merger_expectation", self.merger_expectation),
            ("ipo_date", Some(self.ipo_date)),
        ];
        fields
            .into_iter()
            .filter_map(|(name, loc)| loc.map(|l| (name, l)))
            .collect()
    }
}

/// Known renderings of the listing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// The full spachero.com table: 14 columns, `NaN`/`NaT` empty markers.
    #[default]
    Classic,
    /// A reduced table body: 9 columns, `-`/`0` empty markers, no optionable column.
    Compact,
}

impl Layout {
    pub fn field_map(self) -> FieldMap {
        match self {
            Layout::Classic => FieldMap {
                rows: "tr",
                skip_rows: 8,
                currency_tagged: true,
                symbol: CellLocator::within(0, "div.font-size-16"),
                price: CellLocator::at(1),
                change: CellLocator::at(2),
                warrant: Some(CellLocator::at(3)),
                volume: CellLocator::at(4),
                target: CellLocator::or_empty(5, "NaN"),
                industry: CellLocator::at(6),
                market_cap: CellLocator::or_empty(7, "NaN"),
                shares_outstanding: Some(CellLocator::or_empty(8, "NaN")),
                optionable: Some(CellLocator::at(9)),
                important_date: CellLocator::or_empty(10, "NaT"),
                latest_update: Some(CellLocator::or_empty(11, "NaN")),
                merger_expectation: Some(CellLocator::or_empty(12, "NaN")),
                ipo_date: CellLocator::or_empty(13, "NaN"),
            },
            Layout::Compact => FieldMap {
                rows: "table tbody tr",
                skip_rows: 0,
                currency_tagged: false,
                symbol: CellLocator::at(0),
                price: CellLocator::at(1),
                change: CellLocator::at(2),
                warrant: None,
                volume: CellLocator::at(3),
                target: CellLocator::or_empty(4, "-"),
                industry: CellLocator::at(5),
                market_cap: CellLocator::or_empty(6, "-"),
                shares_outstanding: None,
                optionable: None,
                important_date: CellLocator::or_empty(7, "0"),
                latest_update: None,
                merger_expectation: None,
                ipo_date: CellLocator::or_empty(8, "0"),
            },
        }
    }
}

// ── Filter ────────────────────────────────────────────────────────────────────

/// Row predicate applied during the walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub symbol: Option<String>,
    pub industry: Option<String>,
    pub optionable_only: bool,
}

impl RowFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn optionable() -> Self {
        Self { optionable_only: true, ..Self::default() }
    }

    pub fn symbol(symbol: &str) -> Self {
        Self { symbol: Some(normalise_symbol(symbol)), ..Self::default() }
    }

    pub fn industry(industry: &str, optionable_only: bool) -> Self {
        Self {
            industry: Some(normalise_industry(industry)),
            optionable_only,
            ..Self::default()
        }
    }

    pub fn matches(&self, symbol: &str, industry: &str, optionable: bool) -> bool {
        if let Some(want) = &self.symbol {
            if symbol != want.as_str() {
                return false;
            }
        }
        if let Some(want) = &self.industry {
            if industry != want.as_str() {
                return false;
            }
        }
        !self.optionable_only || optionable
    }

    /// True once the walk has found the single row a symbol lookup asks for.
    pub fn is_exact_symbol(&self, symbol: &str) -> bool {
        self.symbol.as_deref() == Some(symbol)
    }
}

// ── Extraction ────────────────────────────────────────────────────────────────

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SpacError::Selector(format!("`{}`: {:?}", css, e)))
}

/// Pre-parsed selectors for one field map.
struct Selectors {
    rows: Selector,
    cells: Selector,
    inner: HashMap<&'static str, Selector>,
}

impl Selectors {
    fn compile(map: &FieldMap) -> Result<Self> {
        let mut inner = HashMap::new();
        for (_, loc) in map.locators() {
            if let Some(css) = loc.selector {
                if !inner.contains_key(css) {
                    inner.insert(css, selector(css)?);
                }
            }
        }
        Ok(Self {
            rows: selector(map.rows)?,
            cells: selector("td")?,
            inner,
        })
    }
}

struct Row<'a, 's> {
    /// Position among data rows; banner rows are not counted.
    index: usize,
    cells: Vec<ElementRef<'a>>,
    selectors: &'s Selectors,
}

impl Row<'_, '_> {
    fn text(&self, field: &'static str, loc: &CellLocator) -> Result<String> {
        let cell = self.cells.get(loc.column).ok_or_else(|| {
            SpacError::malformed(
                self.index,
                field,
                format!("expected cell {} but row has {}", loc.column, self.cells.len()),
            )
        })?;

        let el = match loc.selector.and_then(|css| self.selectors.inner.get(css).map(|s| (css, s))) {
            Some((css, sel)) => cell.select(sel).next().ok_or_else(|| {
                SpacError::malformed(self.index, field, format!("no `{}` in cell {}", css, loc.column))
            })?,
            None => *cell,
        };

        Ok(el.text().collect::<String>().trim().to_string())
    }

    fn optional(&self, field: &'static str, loc: &Option<CellLocator>) -> Result<Option<String>> {
        loc.as_ref().map(|l| self.text(field, l)).transpose()
    }
}

/// Walk the data rows of `html` under `map`, keeping the rows `filter` accepts.
///
/// A symbol lookup stops at the first matching row.
pub fn extract(html: &str, map: &FieldMap, filter: &RowFilter) -> Result<Vec<RawSpacRow>> {
    let selectors = Selectors::compile(map)?;
    let doc = Html::parse_document(html);

    let mut filter = filter.clone();
    if filter.optionable_only && map.optionable.is_none() {
        warn!("Layout has no optionable column; ignoring the optionable-only restriction");
        filter.optionable_only = false;
    }

    let mut rows = Vec::new();

    for (index, tr) in doc.select(&selectors.rows).skip(map.skip_rows).enumerate() {
        let row = Row {
            index,
            cells: tr.select(&selectors.cells).collect(),
            selectors: &selectors,
        };

        let symbol = row.text("symbol", &map.symbol)?;
        let industry = normalise_industry(&row.text("industry", &map.industry)?);
        let optionable = match &map.optionable {
            Some(loc) => parse_optionable(&row.text("optionable", loc)?),
            None => false,
        };

        if !filter.matches(&symbol, &industry, optionable) {
            continue;
        }

        let exact = filter.is_exact_symbol(&symbol);

        rows.push(RawSpacRow {
            price: row.text("price", &map.price)?,
            change: row.text("change_percent", &map.change)?,
            warrant: row.optional("warrant", &map.warrant)?,
            volume: row.text("volume", &map.volume)?,
            target: row.text("target", &map.target)?,
            market_cap: row.text("market_cap", &map.market_cap)?,
            shares_outstanding: row.optional("shares_outstanding", &map.shares_outstanding)?,
            important_date: row.text("important_date", &map.important_date)?,
            latest_update: row.optional("latest_update", &map.latest_update)?,
            merger_expectation: row.optional("merger_expectation", &map.merger_expectation)?,
            ipo_date: row.text("ipo_date", &map.ipo_date)?,
            symbol,
            industry,
            optionable,
        });

        if exact {
            debug!("Symbol match at row {}; stopping walk", index);
            break;
        }
    }

    debug!("Extracted {} rows", rows.len());
    Ok(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
