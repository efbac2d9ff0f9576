use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_finsimple_home;

/// Environment variable that overrides `analysis.api_key`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisSection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
    pub timeout_secs: u64,

    /// Prefer the GEMINI_API_KEY environment variable (or `.env`) over storing
    /// the key here.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Rows shown in table previews
    pub preview_rows: usize,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            temperature: 0.4,
            max_output_tokens: None,
            timeout_secs: 120,
            api_key: None,
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self { preview_rows: 20 }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_finsimple_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

/// Print the effective config with the API key redacted.
pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let mut cfg = load_config_from(&p)?;
    if cfg.analysis.api_key.is_some() {
        cfg.analysis.api_key = Some("<redacted>".to_string());
    }
    println!("# {}", p.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    let env_key = std::env::var(API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty());
    println!("# {API_KEY_ENV} set: {env_key}");
    Ok(())
}

/// Accept `models/gemini-2.5-pro` as well as `gemini-2.5-pro`.
pub fn normalize_gemini_model(model: &str) -> String {
    let model = model.trim();
    model.strip_prefix("models/").unwrap_or(model).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.analysis.model, "gemini-2.5-pro");
        assert_eq!(cfg.display.preview_rows, 20);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[analysis]\nmodel = \"gemini-2.5-flash\"\n").unwrap();

        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.analysis.model, "gemini-2.5-flash");
        assert_eq!(cfg.analysis.timeout_secs, 120);
        assert_eq!(cfg.display, DisplaySection::default());
    }

    #[test]
    fn test_stale_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[analysis]\nprovider = \"gemini\"\ntemperature = 0.2\n").unwrap();

        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.analysis.temperature, 0.2);
        assert!(!toml::to_string_pretty(&cfg).unwrap().contains("provider"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.display.preview_rows = 5;
        cfg.analysis.max_output_tokens = Some(2048);
        save_config_to(&cfg, &p).unwrap();
        assert_eq!(load_config_from(&p).unwrap(), cfg);
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[analysis\n").unwrap();
        let err = load_config_from(&p).unwrap_err();
        assert!(err.to_string().starts_with("parse "));
    }

    #[test]
    fn test_normalize_gemini_model() {
        assert_eq!(normalize_gemini_model("models/gemini-2.5-pro"), "gemini-2.5-pro");
        assert_eq!(normalize_gemini_model(" gemini-2.5-flash "), "gemini-2.5-flash");
    }
}
