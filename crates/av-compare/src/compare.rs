//! The comparison engine.
//!
//! Walks a candidate and a golden report job by job, applies the
//! resolved tolerance rule to every metric the golden report names,
//! and records a [`MetricDiff`] for each comparison. The golden report
//! defines the required metric set: candidate-only metrics are
//! ignored, golden metrics missing from the candidate are fatal.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::report::AblationReport;
use crate::tolerance::ToleranceTable;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("job count mismatch: report has {report} jobs, golden has {golden}")]
    JobCountMismatch { report: usize, golden: usize },

    #[error("job {job}: metric '{metric}' required by the golden report is missing")]
    MissingMetric { job: usize, metric: String },

    #[error("job {job}: metric '{metric}' value {value} is not numeric")]
    NonNumericMetric {
        job: usize,
        metric: String,
        value: serde_json::Value,
    },
}

/// Per-metric comparison record. Field names match the diff artifact
/// format consumed downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDiff {
    pub report: f64,
    pub golden: f64,
    pub abs_delta: f64,
    pub allowed: f64,
    pub within_delta: bool,
    pub within_bounds: bool,
    pub pass: bool,
}

/// All metric diffs for one index-aligned job pair.
#[derive(Debug, Clone, Serialize)]
pub struct JobDiff {
    pub job: usize,
    pub metrics: IndexMap<String, MetricDiff>,
}

/// The full diff, by job index then metric name. Always produced, win
/// or lose, so callers can persist it for audit.
#[derive(Debug, Clone, Serialize)]
pub struct DiffSummary {
    pub jobs: Vec<JobDiff>,
}

/// Outcome of one comparison: the verdict plus the diff behind it.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub passed: bool,
    pub diff: DiffSummary,
}

impl Comparison {
    /// Metric names that failed, as `(job, metric)` pairs.
    pub fn failures(&self) -> Vec<(usize, &str)> {
        self.diff
            .jobs
            .iter()
            .flat_map(|job| {
                job.metrics
                    .iter()
                    .filter(|(_, diff)| !diff.pass)
                    .map(|(name, _)| (job.job, name.as_str()))
            })
            .collect()
    }
}

/// Compare a candidate report against its golden reference.
///
/// The verdict is the AND over every metric's `pass`; a report with
/// zero jobs is vacuously passing.
pub fn compare_reports(
    report: &AblationReport,
    golden: &AblationReport,
    tolerances: &ToleranceTable,
) -> Result<Comparison, CompareError> {
    if report.jobs.len() != golden.jobs.len() {
        return Err(CompareError::JobCountMismatch {
            report: report.jobs.len(),
            golden: golden.jobs.len(),
        });
    }

    let mut jobs = Vec::with_capacity(golden.jobs.len());
    let mut passed = true;
    for (idx, (job_report, job_golden)) in report.jobs.iter().zip(&golden.jobs).enumerate() {
        let mut metrics = IndexMap::new();
        for (name, golden_kpi) in &job_golden.metrics.kpis {
            let golden_value = numeric_value(&golden_kpi.value, idx, name)?;
            let report_kpi =
                job_report
                    .metrics
                    .kpis
                    .get(name)
                    .ok_or_else(|| CompareError::MissingMetric {
                        job: idx,
                        metric: name.clone(),
                    })?;
            let report_value = numeric_value(&report_kpi.value, idx, name)?;

            let tol = tolerances.get(name);
            let abs_delta = (report_value - golden_value).abs();
            let allowed = tol.abs + tol.rel * golden_value.abs();
            let within_delta = abs_delta <= allowed;

            // Bound checks credit the absolute slack: a value within
            // tolerance of a bound counts as inside it.
            let mut within_bounds = true;
            if let Some(min) = tol.min {
                if report_value + tol.abs < min {
                    within_bounds = false;
                }
            }
            if let Some(max) = tol.max {
                if report_value - tol.abs > max {
                    within_bounds = false;
                }
            }

            let pass = within_delta && within_bounds;
            passed = passed && pass;
            metrics.insert(
                name.clone(),
                MetricDiff {
                    report: report_value,
                    golden: golden_value,
                    abs_delta,
                    allowed,
                    within_delta,
                    within_bounds,
                    pass,
                },
            );
        }
        jobs.push(JobDiff { job: idx, metrics });
    }

    Ok(Comparison {
        passed,
        diff: DiffSummary { jobs },
    })
}

/// Coerce a raw KPI value to `f64`. JSON numbers and numeric strings
/// are accepted; anything else is a fatal [`CompareError::NonNumericMetric`].
fn numeric_value(
    raw: &serde_json::Value,
    job: usize,
    metric: &str,
) -> Result<f64, CompareError> {
    let coerced = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| CompareError::NonNumericMetric {
        job,
        metric: metric.to_string(),
        value: raw.clone(),
    })
}
