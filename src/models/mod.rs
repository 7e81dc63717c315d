use serde::{Serialize, Serializer};
use std::fmt;

/// Canonical placeholder for values the site leaves empty.
pub const UNKNOWN: &str = "unknown";

// ── Numeric cell ──────────────────────────────────────────────────────────────

/// A numeric cell that may have failed to evaluate.
///
/// Serialises as a JSON/CSV number when known and as the `"unknown"` sentinel otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Known(f64),
    Unknown,
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Known(v) => write!(f, "{:?}", v),
            Numeric::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Numeric::Known(v) => serializer.serialize_f64(*v),
            Numeric::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

// ── SPAC row ──────────────────────────────────────────────────────────────────

/// One company's row at scrape time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpacRecord {
    pub symbol: String,
    pub price: String,           // "10.05 $" on the classic layout
    pub change_percent: String,  // "1.25 %"
    pub warrant: String,
    pub volume: String,          // "1,234,567 $" or "1,234,567"
    pub target: String,
    pub industry: String,        // always lowercase
    pub market_cap: Numeric,
    pub shares_outstanding: String,
    pub optionable: bool,
    pub important_date: String,
    pub latest_update: String,
    pub merger_expectation: String,
    pub ipo_date: String,
}

impl SpacRecord {
    /// `(name, value)` pairs in declaration order, for console output.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("symbol", self.symbol.clone()),
            ("price", self.price.clone()),
            ("change_percent", self.change_percent.clone()),
            ("warrant", self.warrant.clone()),
            ("volume", self.volume.clone()),
            ("target", self.target.clone()),
            ("industry", self.industry.clone()),
            ("market_cap", self.market_cap.to_string()),
            ("shares_outstanding", self.shares_outstanding.clone()),
            ("optionable", if self.optionable { "Yes" } else { "No" }.to_string()),
            ("important_date", self.important_date.clone()),
            ("latest_update", self.latest_update.clone()),
            ("merger_expectation", self.merger_expectation.clone()),
            ("ipo_date", self.ipo_date.clone()),
        ]
    }
}

// ── Ranking projection ────────────────────────────────────────────────────────

/// Three-column view produced by the rankings, already formatted for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedRow {
    pub symbol: String,
    pub price: String,
    pub change_percent: String,
    pub volume: String,
}

// ── Raw extracted row ─────────────────────────────────────────────────────────

/// Trimmed cell text as pulled from one `<tr>`, before sentinel/number cleanup.
///
/// `None` means the active layout has no such column.
#[derive(Debug, Clone, Default)]
pub struct RawSpacRow {
    pub symbol: String,
    pub price: String,
    pub change: String,
    pub warrant: Option<String>,
    pub volume: String,
    pub target: String,
    pub industry: String,
    pub market_cap: String,
    pub shares_outstanding: Option<String>,
    pub optionable: bool,
    pub important_date: String,
    pub latest_update: Option<String>,
    pub merger_expectation: Option<String>,
    pub ipo_date: String,
}

// ── Keyed rows for export ─────────────────────────────────────────────────────

/// Rows that are keyed by ticker symbol when written out.
pub trait Keyed: Serialize {
    fn key(&self) -> &str;
}

impl Keyed for SpacRecord {
    fn key(&self) -> &str {
        &self.symbol
    }
}

impl Keyed for RankedRow {
    fn key(&self) -> &str {
        &self.symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_display() {
        assert_eq!(Numeric::Known(2240.0).to_string(), "2240.0");
        assert_eq!(Numeric::Known(12.5).to_string(), "12.5");
        assert_eq!(Numeric::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_numeric_serialize() {
        assert_eq!(serde_json::to_string(&Numeric::Known(2240.0)).unwrap(), "2240.0");
        assert_eq!(serde_json::to_string(&Numeric::Unknown).unwrap(), "\"unknown\"");
    }
}
