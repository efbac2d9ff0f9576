//! Subcommand handlers. Each one loads the CSV fresh; nothing is kept between runs.

use anyhow::{bail, Context, Result};
use finsimple_core::{bind_chart, build_prompt, clean, ChartKind, ChartSpec, Metrics, Table};
use finsimple_ingest::{read_csv_path, to_csv_string, write_csv};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{Config, API_KEY_ENV};
use crate::llm::{AnalysisConfig, AnalysisError, GeminiClient};
use crate::render::{columns_caption, render_chart, render_metrics, render_table};

/// Chart selection from the command line; unset axes fall back to the first
/// numeric column.
#[derive(Debug, Clone)]
pub struct ChartArgs {
    pub kind: ChartKind,
    pub x: Option<String>,
    pub y: Option<String>,
}

pub fn load_raw(csv: &Path) -> Result<Table> {
    if !csv.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv.display());
    }
    let raw = read_csv_path(csv)?;
    info!(
        path = %csv.display(),
        rows = raw.row_count(),
        columns = raw.column_count(),
        "loaded csv"
    );
    Ok(raw)
}

pub fn raw(csv: &Path, cfg: &Config) -> Result<()> {
    let raw = load_raw(csv)?;
    println!("## Raw Data\n");
    print!("{}", render_table(&raw, cfg.display.preview_rows));
    println!("\n{}", columns_caption(&raw));
    Ok(())
}

pub fn clean_cmd(csv: &Path, out: Option<PathBuf>, cfg: &Config) -> Result<()> {
    let cleaned = clean(&load_raw(csv)?);

    if let Some(out) = out {
        let file = File::create(&out).with_context(|| format!("create {}", out.display()))?;
        write_csv(&cleaned, file).with_context(|| format!("write {}", out.display()))?;
        println!(
            "Wrote {} rows x {} columns to {}",
            cleaned.row_count(),
            cleaned.column_count(),
            out.display()
        );
        return Ok(());
    }

    print_cleaned(&cleaned, cfg);
    Ok(())
}

pub fn metrics(csv: &Path) -> Result<()> {
    let cleaned = clean(&load_raw(csv)?);
    print!("{}", render_metrics(Metrics::compute(&cleaned).as_ref()));
    Ok(())
}

pub fn chart(csv: &Path, args: &ChartArgs) -> Result<()> {
    let cleaned = clean(&load_raw(csv)?);
    print_chart(&cleaned, args);
    Ok(())
}

pub async fn analyze(csv: &Path, cfg: &Config, model: Option<&str>) -> Result<()> {
    let cleaned = clean(&load_raw(csv)?);
    print_analysis(&cleaned, cfg, model).await
}

/// Everything at once: raw, cleaned + metrics, chart, analysis.
pub async fn report(
    csv: &Path,
    cfg: &Config,
    chart_args: &ChartArgs,
    model: Option<&str>,
    skip_ai: bool,
) -> Result<()> {
    let raw = load_raw(csv)?;
    let cleaned = clean(&raw);

    println!("## Raw Data\n");
    print!("{}", render_table(&raw, cfg.display.preview_rows));
    println!("\n{}\n", columns_caption(&raw));

    print_cleaned(&cleaned, cfg);
    println!();
    print!("{}", render_metrics(Metrics::compute(&cleaned).as_ref()));

    println!("\n## Graphical Illustrations\n");
    print_chart(&cleaned, chart_args);

    if skip_ai {
        return Ok(());
    }
    println!();
    print_analysis(&cleaned, cfg, model).await
}

fn print_cleaned(cleaned: &Table, cfg: &Config) {
    println!("## Processed Data\n");
    print!("{}", render_table(cleaned, cfg.display.preview_rows));
    println!("\n{}", columns_caption(cleaned));
}

fn print_chart(cleaned: &Table, args: &ChartArgs) {
    let Some(default) = ChartSpec::default_for(cleaned) else {
        println!("No numeric columns found to generate plots.");
        return;
    };
    let spec = ChartSpec::new(
        args.kind,
        args.x.clone().unwrap_or_else(|| default.x.clone()),
        args.y.clone().unwrap_or(default.y),
    );

    match bind_chart(cleaned, &spec) {
        Ok(chart) => print!("{}", render_chart(&chart)),
        Err(e) => {
            warn!(error = %e, "chart binding failed");
            println!("Cannot draw chart: {e}");
        }
    }
}

async fn print_analysis(cleaned: &Table, cfg: &Config, model: Option<&str>) -> Result<()> {
    println!("## AI Analysis\n");
    let csv = to_csv_string(cleaned)?;
    let prompt = build_prompt(&csv);
    let config = AnalysisConfig::resolve(cfg, model, std::env::var(API_KEY_ENV).ok());

    match request_analysis(&config, &prompt).await {
        Ok(text) => {
            println!("### AI Suggestions\n");
            println!("{text}");
        }
        Err(e) => {
            warn!(error = %e, model = %config.model, "analysis request failed");
            println!("Error from Gemini: {e}");
        }
    }
    Ok(())
}

async fn request_analysis(config: &AnalysisConfig, prompt: &str) -> Result<String, AnalysisError> {
    let client = GeminiClient::new(config.timeout)?;
    client.generate(config, prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_statement(dir: &Path) -> PathBuf {
        let p = dir.join("statement.csv");
        fs::write(
            &p,
            "Date,Amount,Memo\n2024-01-02,10,a\n,,\n2024-01-01,oops,b\n",
        )
        .unwrap();
        p
    }

    #[test]
    fn test_load_raw_missing_file() {
        let err = load_raw(Path::new("/no/such/statement.csv")).unwrap_err();
        assert!(err.to_string().starts_with("CSV not found"));
    }

    #[test]
    fn test_clean_export_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_statement(dir.path());
        let out = dir.path().join("cleaned.csv");

        clean_cmd(&csv, Some(out.clone()), &Config::default()).unwrap();
        let written = fs::read_to_string(out).unwrap();
        assert_eq!(written, "date,amount,memo\n2024-01-01,,b\n2024-01-02,10.0,a\n");
    }

    #[tokio::test]
    async fn test_analysis_failure_is_contained() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_statement(dir.path());
        let mut cfg = Config::default();
        // Unroutable endpoint; the call must fail without bubbling up.
        cfg.analysis.base_url = "http://127.0.0.1:9".to_string();
        cfg.analysis.api_key = Some("test-key".to_string());
        cfg.analysis.timeout_secs = 2;

        analyze(&csv, &cfg, None).await.unwrap();
    }
}
