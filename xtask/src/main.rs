use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "treekit automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tree benchmarks against the std containers
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,

        /// Extra crate features to enable, e.g. `tracing`
        #[arg(long)]
        features: Option<String>,
    },
}

const BENCH: &str = "tree_benchmark";
const CRITERION_DIR: &str = "target/criterion";
const REPORT_PATH: &str = "benchmark_results/report.md";

// xtask is a member of the crate's workspace, one level below its root.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

/// `new/estimates.json` as written by criterion; only the mean is read.
#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

/// `new/benchmark.json`: identifies the group and function of a measurement.
#[derive(Deserialize)]
struct BenchmarkId {
    group_id: String,
    function_id: Option<String>,
    value_str: Option<String>,
}

/// Mean time in nanoseconds, keyed by group then by function (and input).
type Results = BTreeMap<String, BTreeMap<String, f64>>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench {
            quick,
            report_only,
            features,
        } => {
            if !report_only {
                run_benchmarks(quick, features.as_deref())?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool, features: Option<&str>) -> Result<()> {
    println!("Running {BENCH}...");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root()).env("CARGO_INCREMENTAL", "0");
    cmd.arg("bench").arg("--bench").arg(BENCH);
    if let Some(features) = features {
        cmd.arg("--features").arg(features);
    }

    // Args for the test runner (Criterion) go after --
    cmd.arg("--");
    if quick {
        cmd.arg("--measurement-time").arg("0.1");
        cmd.arg("--noplot");
        cmd.arg("--sample-size").arg("10");
    }

    let status = cmd.status().context("failed to launch cargo bench")?;
    if !status.success() {
        anyhow::bail!("benchmark run failed with {status}");
    }
    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");

    let root = workspace_root();
    let criterion_dir = root.join(CRITERION_DIR);
    let criterion_dir = criterion_dir.as_path();
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = Results::new();
    collect_results(criterion_dir, &mut results)?;

    let report_path = root.join(REPORT_PATH);
    let report_path = report_path.as_path();
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)
        .with_context(|| format!("cannot create {}", report_path.display()))?;

    writeln!(file, "# Tree Benchmark Report")?;
    for (group, rows) in &results {
        writeln!(file, "\n## {group}\n")?;
        writeln!(file, "| Benchmark | Mean | vs std |")?;
        writeln!(file, "|---|---|---|")?;
        for (name, &time_ns) in rows {
            let relative = match std_counterpart(rows, name) {
                Some(std_ns) if std_ns > 0.0 => format!("**{:.2}x**", time_ns / std_ns),
                _ => "-".to_string(),
            };
            writeln!(file, "| {name} | {} | {relative} |", format_time(time_ns))?;
        }
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

// The std measurement of the same group with the same input, if any.
fn std_counterpart(rows: &BTreeMap<String, f64>, name: &str) -> Option<f64> {
    if name.starts_with("std_") {
        return None;
    }
    let input = name.rsplit_once('/').map(|(_, input)| input);
    rows.iter()
        .find(|(other, _)| {
            other.starts_with("std_") && other.rsplit_once('/').map(|(_, input)| input) == input
        })
        .map(|(_, &time_ns)| time_ns)
}

fn format_time(time_ns: f64) -> String {
    if time_ns >= 1_000_000.0 {
        format!("{:.2} ms", time_ns / 1_000_000.0)
    } else if time_ns >= 1_000.0 {
        format!("{:.2} µs", time_ns / 1_000.0)
    } else {
        format!("{time_ns:.0} ns")
    }
}

// Structure: .../<benchmark>/new/{benchmark,estimates}.json
fn collect_results(dir: &Path, results: &mut Results) -> Result<()> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(());
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("new") {
            collect_results(&path, results)?;
            continue;
        }

        let estimates_path = path.join("estimates.json");
        let id_path = path.join("benchmark.json");
        if !estimates_path.exists() || !id_path.exists() {
            continue;
        }

        let id: BenchmarkId = serde_json::from_str(&fs::read_to_string(&id_path)?)
            .with_context(|| format!("malformed {}", id_path.display()))?;
        let estimates: Estimates = serde_json::from_str(&fs::read_to_string(&estimates_path)?)
            .with_context(|| format!("malformed {}", estimates_path.display()))?;

        let mut name = id.function_id.unwrap_or_else(|| id.group_id.clone());
        if let Some(input) = id.value_str {
            name = format!("{name}/{input}");
        }
        results
            .entry(id.group_id)
            .or_default()
            .insert(name, estimates.mean.point_estimate);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_holds_the_library_manifest() {
        let manifest = workspace_root().join("Cargo.toml");
        let text = fs::read_to_string(manifest).unwrap();
        assert!(text.contains("name = \"treekit\""));
        assert!(text.contains("members = [\"xtask\"]"));
    }

    #[test]
    fn test_std_counterpart_matches_input() {
        let rows: BTreeMap<String, f64> = [
            ("std_btree_set/100".to_string(), 10.0),
            ("std_btree_set/400".to_string(), 40.0),
            ("tree_set/400".to_string(), 80.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(std_counterpart(&rows, "tree_set/400"), Some(40.0));
        assert_eq!(std_counterpart(&rows, "std_btree_set/100"), None);
    }
}
