//! `aether batch` - evaluate a JSON-lines file of queries.
//!
//! Each input line is a JSON object:
//! `{"epoch": "1440", "latitude_rad": 0.1, "longitude_rad": -0.4, "altitude_m": 400000}`.
//! One JSON line is written per query, in input order.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use aether_config::Config;
use aether_core::{DensityQuery, ScenarioWindow};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::initialized_plugin;

#[derive(Debug, Serialize, PartialEq)]
struct BatchLine {
    epoch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    density_kg_m3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Parse queries from JSON lines, skipping blank lines.
fn read_queries(reader: impl BufRead) -> Result<Vec<DensityQuery>> {
    let mut queries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let query: DensityQuery = serde_json::from_str(&line)
            .with_context(|| format!("invalid query on line {}", index.saturating_add(1)))?;
        queries.push(query);
    }
    Ok(queries)
}

/// Evaluate every query in `input` and write results to stdout.
pub(crate) fn run_batch(cfg: &Config, input: &Path, window: ScenarioWindow) -> Result<()> {
    let file = std::fs::File::open(input)
        .with_context(|| format!("failed to open {}", input.display()))?;
    let queries = read_queries(BufReader::new(file))?;
    info!(count = queries.len(), "evaluating batch");

    let plugin = initialized_plugin(cfg, window)?;
    let results = plugin.evaluate_batch(&queries)?;
    plugin.free();

    let mut failures = 0usize;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (query, result) in queries.iter().zip(results) {
        let line = match result {
            Ok(density) => BatchLine {
                epoch: query.epoch.clone(),
                density_kg_m3: Some(density.kg_per_m3()),
                error: None,
            },
            Err(e) => {
                failures = failures.saturating_add(1);
                BatchLine {
                    epoch: query.epoch.clone(),
                    density_kg_m3: None,
                    error: Some(e.to_string()),
                }
            },
        };
        writeln!(out, "{}", serde_json::to_string(&line)?)?;
    }

    info!(count = queries.len(), failures, "batch complete");
    if failures > 0 {
        anyhow::bail!("{failures} of {} queries failed", queries.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_queries() {
        let input = concat!(
            r#"{"epoch":"1440","latitude_rad":0.1,"longitude_rad":-0.4,"altitude_m":400000}"#,
            "\n\n",
            r#"{"epoch":"1441","latitude_rad":0,"longitude_rad":0,"altitude_m":90000}"#,
            "\n",
        );
        let queries = read_queries(input.as_bytes()).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].epoch, "1440");
        assert_eq!(queries[1].altitude_m, 90_000.0);
    }

    #[test]
    fn test_read_queries_reports_line() {
        let input = concat!(
            r#"{"epoch":"1440","latitude_rad":0,"longitude_rad":0,"altitude_m":1}"#,
            "\nnot json\n",
        );
        let err = read_queries(input.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_batch_line_serialization() {
        let ok = BatchLine {
            epoch: "1".to_string(),
            density_kg_m3: Some(1.5),
            error: None,
        };
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"epoch":"1","density_kg_m3":1.5}"#
        );
    }
}
