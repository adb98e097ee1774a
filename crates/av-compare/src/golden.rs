//! Golden reference extraction.
//!
//! An accepted report is persisted in canonical form — sorted keys,
//! two-space indent, trailing newline — so golden files diff
//! byte-for-byte across revisions.

use std::path::{Path, PathBuf};

use av_plan::Value;
use thiserror::Error;

/// Directory golden references are written to when no explicit output
/// path is given.
pub const GOLDEN_DIR: &str = "ablation/goldens";

#[derive(Error, Debug)]
pub enum GoldenError {
    #[error("plan missing name field")]
    MissingPlanName,

    #[error("invalid report JSON: {0}")]
    InvalidReport(#[from] serde_json::Error),
}

/// Re-serialize report JSON with deterministic key ordering and stable
/// indentation.
pub fn canonicalize_report(text: &str) -> Result<String, GoldenError> {
    let data: serde_json::Value = serde_json::from_str(text)?;
    let mut out = serde_json::to_string_pretty(&sort_keys(data))?;
    out.push('\n');
    Ok(out)
}

/// Default artifact path for a plan's golden reference, named by the
/// plan's `name` field.
pub fn golden_path(plan: &Value) -> Result<PathBuf, GoldenError> {
    let name = plan
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or(GoldenError::MissingPlanName)?;
    Ok(Path::new(GOLDEN_DIR).join(format!("{name}.gold.json")))
}

fn sort_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<(String, serde_json::Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(sort_keys).collect())
        }
        other => other,
    }
}
