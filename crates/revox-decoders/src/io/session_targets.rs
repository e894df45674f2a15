//! Session-target table reader.
//!
//! Behavioral label tables ship as delimited text with one row per
//! acquired volume, typically a `labels` column holding the condition
//! name and a `chunks` column holding the run index.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

/// Parsed per-sample targets ready to pair with a volume stack.
#[derive(Debug, Clone)]
pub struct SessionTargets {
    pub conditions: Vec<String>,
    pub runs: Vec<i32>,
}

/// Configuration for reading session-target tables.
#[derive(Debug, Clone)]
pub struct TargetReaderConfig {
    /// Field delimiter; label tables are usually space-separated.
    pub delimiter: u8,
    /// Column name holding condition names.
    pub condition_column: String,
    /// Column name holding run indices.
    pub run_column: String,
}

impl Default for TargetReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b' ',
            condition_column: "labels".to_string(),
            run_column: "chunks".to_string(),
        }
    }
}

/// Read a session-target table with the default configuration.
pub fn read_session_targets<P: AsRef<Path>>(path: P) -> Result<SessionTargets> {
    read_session_targets_with_config(path, &TargetReaderConfig::default())
}

/// Read a session-target table using a custom configuration.
pub fn read_session_targets_with_config<P: AsRef<Path>>(
    path: P,
    config: &TargetReaderConfig,
) -> Result<SessionTargets> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open target table: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read target table header row")?
        .clone();

    let condition_idx = find_column(&headers, &config.condition_column)
        .ok_or_else(|| anyhow!("Missing condition column '{}'", config.condition_column))?;
    let run_idx = find_column(&headers, &config.run_column)
        .ok_or_else(|| anyhow!("Missing run column '{}'", config.run_column))?;

    let mut conditions = Vec::new();
    let mut runs = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let condition = record
            .get(condition_idx)
            .ok_or_else(|| anyhow!("Missing condition value at row {}", row_idx + 1))?;
        conditions.push(condition.to_string());

        let run = record
            .get(run_idx)
            .ok_or_else(|| anyhow!("Missing run value at row {}", row_idx + 1))?
            .parse::<i32>()
            .with_context(|| format!("Invalid run index at row {}", row_idx + 1))?;
        runs.push(run);
    }

    Ok(SessionTargets { conditions, runs })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}
