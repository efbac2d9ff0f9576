use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$FINSIMPLE_HOME`, or `~/.finsimple`.
pub fn finsimple_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FINSIMPLE_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".finsimple"))
}

pub fn ensure_finsimple_home() -> Result<PathBuf> {
    let dir = finsimple_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
