use crate::models::{Numeric, RawSpacRow, SpacRecord, UNKNOWN};
use crate::scraper::parsers::{CellLocator, FieldMap};

// ── Parsers ───────────────────────────────────────────────────────────────────

pub fn normalise_symbol(s: &str) -> String {
    s.trim().to_uppercase()
}

pub fn normalise_industry(s: &str) -> String {
    s.trim().to_lowercase()
}

/// The site renders the flag as "Yes"/"No"; anything else counts as no.
pub fn parse_optionable(s: &str) -> bool {
    s.trim() == "Yes"
}

/// Replace the layout's empty marker with `"unknown"`; pass anything else through trimmed.
pub fn normalise_sentinel(s: &str, empty: Option<&str>) -> String {
    let s = s.trim();
    match empty {
        Some(marker) if s == marker => UNKNOWN.to_string(),
        _ => s.to_string(),
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Evaluate a market-cap style cell.
/// "2.24*1000" → 2240.0 | "250.5" → 250.5 | "-" / "NaN" / "" → Unknown
pub fn evaluate_numeric(s: &str) -> Numeric {
    let s = s.trim();
    let value = match s.split_once('*') {
        Some((a, b)) => parse_finite(a).zip(parse_finite(b)).map(|(a, b)| a * b),
        None => parse_finite(s),
    };
    match value.filter(|v| v.is_finite()) {
        Some(v) => Numeric::Known(v),
        None => Numeric::Unknown,
    }
}

/// Parse a change cell.
/// "12.5 %" → 12.5 | "-3.0%" → -3.0 | "4.1" → 4.1
pub fn parse_percent(s: &str) -> Option<f64> {
    let s = s.trim().trim_end_matches('%').replace(',', "");
    parse_finite(&s)
}

/// Parse a volume cell, dropping thousands separators and currency markers.
/// "1,234,567 $" → 1234567.0 | "$1,234" → 1234.0 | "1234567.0" → 1234567.0
pub fn parse_volume(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != ',' && *c != '$' && !c.is_whitespace())
        .collect();
    parse_finite(&cleaned)
}

/// Move a leading `$` to a trailing `" $"` tag: "$1.20" → "1.20 $", "10.05" → "10.05 $".
pub fn tag_currency(s: &str) -> String {
    let bare = s.trim().trim_start_matches('$').trim();
    format!("{} $", bare)
}

// ── Raw row → SpacRecord ──────────────────────────────────────────────────────

fn free_text(raw: Option<String>, locator: Option<CellLocator>) -> String {
    match (raw, locator) {
        (Some(text), Some(loc)) => normalise_sentinel(&text, loc.empty),
        _ => UNKNOWN.to_string(),
    }
}

pub fn clean_row(raw: RawSpacRow, map: &FieldMap) -> SpacRecord {
    let money = |s: &str| {
        if map.currency_tagged { tag_currency(s) } else { s.trim().to_string() }
    };

    let market_cap = if map.market_cap.empty == Some(raw.market_cap.trim()) {
        Numeric::Unknown
    } else {
        evaluate_numeric(&raw.market_cap)
    };

    SpacRecord {
        price: money(&raw.price),
        change_percent: raw.change.trim().to_string(),
        warrant: raw.warrant.as_deref().map(money).unwrap_or_else(|| UNKNOWN.to_string()),
        volume: money(&raw.volume),
        target: normalise_sentinel(&raw.target, map.target.empty),
        industry: normalise_industry(&raw.industry),
        market_cap,
        shares_outstanding: free_text(raw.shares_outstanding, map.shares_outstanding),
        optionable: raw.optionable,
        important_date: normalise_sentinel(&raw.important_date, map.important_date.empty),
        latest_update: free_text(raw.latest_update, map.latest_update),
        merger_expectation: free_text(raw.merger_expectation, map.merger_expectation),
        ipo_date: normalise_sentinel(&raw.ipo_date, map.ipo_date.empty),
        symbol: raw.symbol,
    }
}

pub fn clean_rows(rows: Vec<RawSpacRow>, map: &FieldMap) -> Vec<SpacRecord> {
    rows.into_iter().map(|r| clean_row(r, map)).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::parsers::Layout;

    #[test]
    fn test_evaluate_numeric() {
        assert_eq!(evaluate_numeric("2.24*1000"), Numeric::Known(2240.0));
        assert_eq!(evaluate_numeric(" 250.5 "), Numeric::Known(250.5));
        assert_eq!(evaluate_numeric("-"), Numeric::Unknown);
        assert_eq!(evaluate_numeric("NaN"), Numeric::Unknown);
        assert_eq!(evaluate_numeric("2.24*abc"), Numeric::Unknown);
        assert_eq!(evaluate_numeric(""), Numeric::Unknown);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("12.5 %"), Some(12.5));
        assert_eq!(parse_percent("-3.0%"), Some(-3.0));
        assert_eq!(parse_percent("4.1"), Some(4.1));
        assert_eq!(parse_percent("n/a %"), None);
        assert_eq!(parse_percent("NaN %"), None);
    }

    #[test]
    fn test_parse_volume() {
        assert_eq!(parse_volume("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_volume("1,234,567 $"), Some(1_234_567.0));
        assert_eq!(parse_volume("$1,234"), Some(1_234.0));
        assert_eq!(parse_volume("1234567.0"), Some(1_234_567.0));
        assert_eq!(parse_volume("-"), None);
    }

    #[test]
    fn test_normalise_sentinel() {
        assert_eq!(normalise_sentinel("NaN", Some("NaN")), "unknown");
        assert_eq!(normalise_sentinel(" NaT ", Some("NaT")), "unknown");
        assert_eq!(normalise_sentinel("NaN", Some("NaT")), "NaN");
        assert_eq!(normalise_sentinel("  Q3 2021 ", Some("NaN")), "Q3 2021");
        assert_eq!(normalise_sentinel("0", Some("0")), "unknown");
        assert_eq!(normalise_sentinel("10", None), "10");
    }

    #[test]
    fn test_tag_currency() {
        assert_eq!(tag_currency("$1.20"), "1.20 $");
        assert_eq!(tag_currency("10.05"), "10.05 $");
        assert_eq!(tag_currency(" $1,234,567 "), "1,234,567 $");
    }

    #[test]
    fn test_normalise_industry() {
        assert_eq!(normalise_industry("  Health Care "), "health care");
        assert_eq!(normalise_industry("FINTECH"), "fintech");
    }

    #[test]
    fn test_clean_classic_row() {
        let raw = RawSpacRow {
            symbol: "ABCD".into(),
            price: "10.05".into(),
            change: "1.25 %".into(),
            warrant: Some("$1.20".into()),
            volume: "$1,234,567".into(),
            target: "NaN".into(),
            industry: "fintech".into(),
            market_cap: "NaN".into(),
            shares_outstanding: Some("34.5".into()),
            optionable: true,
            important_date: "NaT".into(),
            latest_update: Some("NaN".into()),
            merger_expectation: Some("Q3 2021".into()),
            ipo_date: "2020-10-01".into(),
        };
        let rec = clean_row(raw, &Layout::Classic.field_map());

        assert_eq!(rec.price, "10.05 $");
        assert_eq!(rec.warrant, "1.20 $");
        assert_eq!(rec.volume, "1,234,567 $");
        assert_eq!(rec.target, "unknown");
        assert_eq!(rec.market_cap, Numeric::Unknown);
        assert_eq!(rec.shares_outstanding, "34.5");
        assert_eq!(rec.important_date, "unknown");
        assert_eq!(rec.latest_update, "unknown");
        assert_eq!(rec.merger_expectation, "Q3 2021");
        assert_eq!(rec.ipo_date, "2020-10-01");
    }

    #[test]
    fn test_clean_compact_row() {
        let raw = RawSpacRow {
            symbol: "WXYZ".into(),
            price: "9.98".into(),
            change: "-0.2 %".into(),
            volume: "1,234,567".into(),
            target: "-".into(),
            industry: "tech".into(),
            market_cap: "2.24*1000".into(),
            important_date: "0".into(),
            ipo_date: "2021-01-05".into(),
            ..Default::default()
        };
        let rec = clean_row(raw, &Layout::Compact.field_map());

        assert_eq!(rec.price, "9.98");
        assert_eq!(rec.volume, "1,234,567");
        assert_eq!(rec.warrant, "unknown");
        assert_eq!(rec.target, "unknown");
        assert_eq!(rec.market_cap, Numeric::Known(2240.0));
        assert_eq!(rec.shares_outstanding, "unknown");
        assert_eq!(rec.important_date, "unknown");
        assert!(!rec.optionable);
    }
}
