//! Property tests for the comparison engine.

use av_compare::{AblationReport, Job, JobMetrics, Kpi, ToleranceTable, compare_reports};
use av_plan::{IndentParser, PlanParser};
use indexmap::IndexMap;
use proptest::prelude::*;

fn report_with(value: f64) -> AblationReport {
    let mut kpis = IndexMap::new();
    kpis.insert(
        "metric".to_string(),
        Kpi {
            value: serde_json::json!(value),
            pass: None,
        },
    );
    AblationReport {
        jobs: vec![Job {
            metrics: JobMetrics { kpis },
        }],
    }
}

fn table_with(abs: f64, rel: f64) -> ToleranceTable {
    let plan = IndentParser
        .parse(&format!(
            "tolerances:\n  metric:\n    abs: {abs:?}\n    rel: {rel:?}\n"
        ))
        .expect("plan should parse");
    ToleranceTable::from_plan(&plan)
}

proptest! {
    // Equal values always pass: abs_delta is exactly zero, which every
    // non-negative allowance admits, and the bound checks see the same
    // value the golden carried.
    #[test]
    fn equal_values_always_pass(
        value in -1e12f64..1e12,
        abs in 0.0f64..1e3,
        rel in 0.0f64..1e3,
    ) {
        let golden = report_with(value);
        let report = report_with(value);
        let result = compare_reports(&report, &golden, &table_with(abs, rel)).unwrap();
        prop_assert!(result.passed);
        let diff = &result.diff.jobs[0].metrics["metric"];
        prop_assert_eq!(diff.abs_delta, 0.0);
    }

    #[test]
    fn comparison_is_deterministic(
        golden_value in -1e9f64..1e9,
        report_value in -1e9f64..1e9,
        abs in 0.0f64..10.0,
        rel in 0.0f64..1.0,
    ) {
        let golden = report_with(golden_value);
        let report = report_with(report_value);
        let tolerances = table_with(abs, rel);
        let first = compare_reports(&report, &golden, &tolerances).unwrap();
        let second = compare_reports(&report, &golden, &tolerances).unwrap();
        prop_assert_eq!(first.passed, second.passed);
        prop_assert_eq!(
            &first.diff.jobs[0].metrics["metric"],
            &second.diff.jobs[0].metrics["metric"]
        );
    }

    #[test]
    fn verdict_matches_recorded_entries(
        golden_value in -1e6f64..1e6,
        report_value in -1e6f64..1e6,
    ) {
        let golden = report_with(golden_value);
        let report = report_with(report_value);
        let result =
            compare_reports(&report, &golden, &ToleranceTable::default()).unwrap();
        let all_pass = result
            .diff
            .jobs
            .iter()
            .all(|job| job.metrics.values().all(|m| m.pass));
        prop_assert_eq!(result.passed, all_pass);
    }
}
