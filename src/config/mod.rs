use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::export::ExportFormat;
use crate::scraper::parsers::Layout;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Scraper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub layout: Layout,
}

/// Ranking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Export configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://www.spachero.com/".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
// The site rejects stock client identities; it still serves this one.
pub(crate) fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; U; Linux i686) Gecko/20071127 Firefox/2.0.0.11".to_string()
}
fn default_limit() -> usize {
    5
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            layout: Layout::default(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("SPAC").separator("__"))
            .build()
            .context("Failed to assemble configuration sources")?;

        cfg.try_deserialize()
            .context("Invalid configuration")
    }
}

// ── Per-run settings ─────────────────────────────────────────────────────────

/// What a single invocation should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Every listed SPAC, optionally only the optionable ones.
    All { optionable_only: bool },
    /// A single SPAC by ticker.
    Symbol(String),
    /// Every SPAC in one industry.
    Industry { name: String, optionable_only: bool },
    /// Distinct industries in first-seen order.
    ListIndustries,
    TopGainers,
    TopLosers,
    VolumeLeaders,
}

impl Mode {
    /// Base file name (without extension) used when the result is exported.
    pub fn file_stem(&self) -> String {
        match self {
            Mode::All { .. } | Mode::ListIndustries => "spacs".to_string(),
            Mode::Symbol(symbol) => symbol.clone(),
            Mode::Industry { name, .. } => name.clone(),
            Mode::TopGainers => "top_gainers".to_string(),
            Mode::TopLosers => "top_losers".to_string(),
            Mode::VolumeLeaders => "volume_leaders".to_string(),
        }
    }
}

/// Explicit per-run configuration handed to the pipeline.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: Mode,
    pub limit: usize,
    pub export: Option<ExportFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.scraper.base_url, "https://www.spachero.com/");
        assert!(cfg.scraper.user_agent.contains("Firefox/2.0.0.11"));
        assert_eq!(cfg.scraper.layout, Layout::Classic);
        assert_eq!(cfg.query.limit, 5);
        assert_eq!(cfg.export.dir, PathBuf::from("."));
    }

    #[test]
    fn test_partial_source_fills_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[scraper]\nlayout = \"compact\"\n[query]\nlimit = 10\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.scraper.layout, Layout::Compact);
        assert_eq!(cfg.scraper.timeout_secs, 30);
        assert_eq!(cfg.query.limit, 10);
        assert_eq!(cfg.export.dir, PathBuf::from("."));
    }

    #[test]
    fn test_file_stem_per_mode() {
        assert_eq!(Mode::All { optionable_only: true }.file_stem(), "spacs");
        assert_eq!(Mode::Symbol("ABCD".into()).file_stem(), "ABCD");
        assert_eq!(
            Mode::Industry { name: "fintech".into(), optionable_only: false }.file_stem(),
            "fintech"
        );
        assert_eq!(Mode::VolumeLeaders.file_stem(), "volume_leaders");
    }
}
