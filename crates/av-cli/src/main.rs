//! Golden verification CLI for ablation reports.
//!
//! `av compare` checks a produced report against a golden reference
//! using the tolerances of a plan file; `av extract-golden` persists a
//! report in canonical form as the new reference. Exit code 0 means
//! the comparison passed, 1 means it did not, 2 means a fatal error.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use av_compare::{
    AblationReport, CompareError, Comparison, ToleranceTable, canonicalize_report,
    compare_reports, golden_path,
};
use av_plan::{Value, plan_parser};

#[derive(Parser, Debug)]
#[command(name = "av")]
#[command(author, version, about = "Verify ablation reports against golden references", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare a produced report against a golden reference
    Compare {
        /// Path to the ablation plan
        #[arg(long)]
        plan: PathBuf,

        /// Path to the produced AblationReport JSON
        #[arg(long)]
        report: PathBuf,

        /// Path to the golden AblationReport JSON
        #[arg(long)]
        golden: PathBuf,

        /// Optional path to write the diff summary JSON
        #[arg(long)]
        diff: Option<PathBuf>,
    },
    /// Persist a golden reference for future comparisons
    ExtractGolden {
        /// Path to the ablation plan
        #[arg(long)]
        plan: PathBuf,

        /// Path to the AblationReport JSON
        #[arg(long)]
        report: PathBuf,

        /// Output path (defaults to ablation/goldens/<plan name>.gold.json)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> Result<ExitCode, Box<dyn Error>> {
    match command {
        Command::Compare {
            plan,
            report,
            golden,
            diff,
        } => {
            let plan = load_plan(&plan)?;
            let tolerances = ToleranceTable::from_plan(&plan);
            let report = load_report(&report)?;
            let golden = load_report(&golden)?;

            match compare_reports(&report, &golden, &tolerances) {
                Ok(comparison) => {
                    if let Some(path) = &diff {
                        let artifact = serde_json::to_value(&comparison.diff)?;
                        write_artifact(path, &artifact)?;
                    }
                    print_summary(plan_label(&plan), &comparison);
                    Ok(if comparison.passed {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::FAILURE
                    })
                }
                // A shape mismatch is a failing verdict with its own
                // diff payload, not a fatal error.
                Err(CompareError::JobCountMismatch { report, golden }) => {
                    if let Some(path) = &diff {
                        let artifact = serde_json::json!({
                            "error": "job_count_mismatch",
                            "report": report,
                            "golden": golden,
                        });
                        write_artifact(path, &artifact)?;
                    }
                    eprintln!(
                        "job count mismatch: report has {report} jobs, golden has {golden}"
                    );
                    Ok(ExitCode::FAILURE)
                }
                Err(err) => Err(err.into()),
            }
        }
        Command::ExtractGolden { plan, report, out } => {
            let plan = load_plan(&plan)?;
            let default_path = golden_path(&plan)?;
            let out = out.unwrap_or(default_path);
            let text = fs::read_to_string(&report)?;
            let canonical = canonicalize_report(&text)?;
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&out, canonical)?;
            println!("golden written to {}", out.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_plan(path: &Path) -> Result<Value, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(plan_parser().parse(&text)?)
}

fn load_report(path: &Path) -> Result<AblationReport, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(AblationReport::from_json(&text)?)
}

fn write_artifact(path: &Path, artifact: &serde_json::Value) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut text = serde_json::to_string_pretty(artifact)?;
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

fn plan_label(plan: &Value) -> &str {
    plan.get("name").and_then(Value::as_str).unwrap_or("<unnamed>")
}

fn print_summary(label: &str, comparison: &Comparison) {
    println!("\n============================================================");
    println!("Golden comparison: {}", label);
    println!("Jobs: {}", comparison.diff.jobs.len());
    println!(
        "Result: {}",
        if comparison.passed { "PASS" } else { "FAIL" }
    );

    let failures = comparison.failures();
    if !failures.is_empty() {
        let show = failures.len().min(10);
        println!("\nFailing metrics:");
        for (job, metric) in &failures[..show] {
            let entry = &comparison.diff.jobs[*job].metrics[*metric];
            println!(
                "  job {}: {} report={} golden={} abs_delta={} allowed={}",
                job, metric, entry.report, entry.golden, entry.abs_delta, entry.allowed
            );
        }
        if failures.len() > show {
            println!("  ... and {} more", failures.len() - show);
        }
    }
    println!("============================================================\n");
}
