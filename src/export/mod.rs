//! Write results to `<name>.json` (object keyed by symbol) or `<name>.csv` (header row,
//! symbol first). Writes are not atomic; a failure part-way can leave a partial file.

use crate::error::Result;
use crate::models::Keyed;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// `{ "<symbol>": { <remaining fields in declaration order> }, ... }`, 4-space indent.
pub fn write_json<W: Write, T: Keyed>(writer: W, rows: &[T]) -> Result<()> {
    let mut out = serde_json::Map::new();
    for row in rows {
        let mut value = serde_json::to_value(row)?;
        if let Value::Object(fields) = &mut value {
            fields.shift_remove("symbol");
        }
        out.insert(row.key().to_string(), value);
    }

    let mut ser = serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"    "));
    Value::Object(out).serialize(&mut ser)?;
    ser.into_inner().flush()?;
    Ok(())
}

/// Header row from the field names, then one line per row.
pub fn write_csv<W: Write, T: Keyed>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `rows` to `<dir>/<stem>.<ext>` and return the path.
pub fn write<T: Keyed>(format: ExportFormat, rows: &[T], dir: &Path, stem: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", stem, format.extension()));
    let file = BufWriter::new(File::create(&path)?);

    match format {
        ExportFormat::Json => write_json(file, rows)?,
        ExportFormat::Csv => write_csv(file, rows)?,
    }

    info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(path)
}
