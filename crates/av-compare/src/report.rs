//! Ablation report structures.
//!
//! Reports are produced by the simulation harness as JSON; only the
//! shape the comparator needs is modeled here. Job order is
//! significant: job `i` of a candidate corresponds to job `i` of the
//! golden reference.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A produced or golden ablation report: an ordered sequence of jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AblationReport {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// One simulation job and its measured metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub metrics: JobMetrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobMetrics {
    #[serde(default)]
    pub kpis: IndexMap<String, Kpi>,
}

/// A single named measurement.
///
/// `value` stays a raw JSON value so the comparator performs the float
/// coercion itself and can report exactly which metric failed it. The
/// producer's own `pass` flag is informational only; verdicts are
/// always recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kpi {
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<bool>,
}

impl AblationReport {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_report_shape() {
        let report = AblationReport::from_json(
            r#"{
                "jobs": [
                    {"metrics": {"kpis": {"energy": {"value": 10.0, "pass": true}}}},
                    {"metrics": {"kpis": {"energy": {"value": 9.5}}}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(report.jobs.len(), 2);
        let kpi = &report.jobs[0].metrics.kpis["energy"];
        assert_eq!(kpi.value, serde_json::json!(10.0));
        assert_eq!(kpi.pass, Some(true));
        assert_eq!(report.jobs[1].metrics.kpis["energy"].pass, None);
    }

    #[test]
    fn missing_jobs_key_is_empty() {
        let report = AblationReport::from_json("{}").unwrap();
        assert!(report.jobs.is_empty());
    }

    #[test]
    fn kpi_order_is_preserved() {
        let report = AblationReport::from_json(
            r#"{"jobs": [{"metrics": {"kpis": {
                "z_metric": {"value": 1},
                "a_metric": {"value": 2}
            }}}]}"#,
        )
        .unwrap();
        let names: Vec<&str> = report.jobs[0]
            .metrics
            .kpis
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["z_metric", "a_metric"]);
    }
}
