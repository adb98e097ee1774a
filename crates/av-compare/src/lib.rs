//! Tolerance comparison of ablation reports against golden references.
//!
//! Builds per-metric tolerance rules from a parsed plan, walks a
//! candidate and a golden report job by job, and produces a structured
//! diff plus an overall pass/fail verdict. Golden extraction
//! (canonical serialization of an accepted report) lives here too.

pub mod compare;
pub mod golden;
pub mod report;
pub mod tolerance;

pub use compare::{CompareError, Comparison, DiffSummary, JobDiff, MetricDiff, compare_reports};
pub use golden::{GOLDEN_DIR, GoldenError, canonicalize_report, golden_path};
pub use report::{AblationReport, Job, JobMetrics, Kpi};
pub use tolerance::{DEFAULT_ABS_TOL, DEFAULT_REL_TOL, Tolerance, ToleranceTable};
