use anyhow::{Context, Result};
use bankparse_ingest::{ExtractOptions, HeaderPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "bankparse.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root holding one directory per target (`<data_dir>/<target>/result.csv`).
    pub data_dir: PathBuf,
    pub max_attempts: u32,
    /// Rows shown in the parsed-table preview.
    pub preview_rows: usize,
    pub header_policy: HeaderPolicy,
    /// Input parsed as the observed table when both the CSV and the PDF exist.
    pub prefer: PreferredInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredInput {
    Pdf,
    Csv,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            max_attempts: 3,
            preview_rows: 5,
            header_policy: HeaderPolicy::LastSeen,
            prefer: PreferredInput::Pdf,
        }
    }
}

impl Config {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            header_policy: self.header_policy,
        }
    }
}

/// Load the config file. An explicitly named file must exist; the default one
/// is optional and falls back to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
