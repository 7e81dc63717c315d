use std::time::Instant;
use tracing::info;

/// Times one scrape run and reports how many rows it produced when dropped.
pub struct RunTimer {
    mode: String,
    rows: Option<usize>,
    start: Instant,
}

impl RunTimer {
    pub fn start(mode: impl Into<String>) -> Self {
        let mode = mode.into();
        info!("Run started: {}", mode);
        Self {
            mode,
            rows: None,
            start: Instant::now(),
        }
    }

    /// Record the number of rows left after filtering.
    pub fn record_rows(&mut self, rows: usize) {
        self.rows = Some(rows);
    }

    fn summary(&self) -> String {
        match self.rows {
            Some(rows) => format!("{}: {} rows in {:.2?}", self.mode, rows, self.start.elapsed()),
            // Fetch or extraction failed before a table was built.
            None => format!("{}: aborted after {:.2?}", self.mode, self.start.elapsed()),
        }
    }
}

impl Drop for RunTimer {
    fn drop(&mut self) {
        info!("Run finished: {}", self.summary());
    }
}

/// Insert thousands separators into a run of ASCII digits.
fn group_digits(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Format a float with thousands separators, always keeping a fractional part.
/// 1234567.0 → "1,234,567.0" | 1234.5 → "1,234.5" | -42000.0 → "-42,000.0"
pub fn group_thousands(v: f64) -> String {
    let repr = format!("{:?}", v.abs());
    if repr.contains(['e', 'E']) || !v.is_finite() {
        return format!("{:?}", v);
    }

    let (int, frac) = repr.split_once('.').unwrap_or((repr.as_str(), "0"));
    let sign = if v.is_sign_negative() && v != 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, group_digits(int), frac)
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Render rows as a left-aligned text table with a header rule.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = table_line(headers.iter().copied(), &widths);
    out.push('\n');
    out.push_str(&"─".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        out.push('\n');
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_timer_summary() {
        let mut timer = RunTimer::start("TopGainers");
        assert!(timer.summary().starts_with("TopGainers: aborted after "));
        timer.record_rows(42);
        assert!(timer.summary().starts_with("TopGainers: 42 rows in "));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1_234_567.0), "1,234,567.0");
        assert_eq!(group_thousands(1_234.5), "1,234.5");
        assert_eq!(group_thousands(0.0), "0.0");
        assert_eq!(group_thousands(999.0), "999.0");
        assert_eq!(group_thousands(-42_000.0), "-42,000.0");
    }

    #[test]
    fn test_render_table() {
        let out = render_table(
            &["symbol", "price"],
            &[vec!["AAAA".into(), "10.00 $".into()], vec!["BB".into(), "9 $".into()]],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "symbol  price");
        assert_eq!(lines[2], "AAAA    10.00 $");
        assert_eq!(lines[3], "BB      9 $");
    }
}
