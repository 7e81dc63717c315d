use thiserror::Error;

/// Errors raised while fetching, extracting, ranking or exporting SPAC rows.
#[derive(Debug, Error)]
pub enum SpacError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid selector {0}")]
    Selector(String),

    /// `row` is the zero-based position among the page's data rows, banner rows excluded.
    /// Rankings run over the unfiltered table, so their positions use the same numbering.
    #[error("malformed row {row}: field `{field}` {reason}")]
    MalformedRow {
        row: usize,
        field: &'static str,
        reason: String,
    },

    #[error("symbol {0} appears more than once in the listing")]
    DuplicateSymbol(String),

    /// A filter matched nothing. Reported as a plain message, not a failure.
    #[error("{0}")]
    EmptyResult(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json export failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpacError {
    pub fn malformed(row: usize, field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpacError>;
