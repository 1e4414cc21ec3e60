//! deadview CLI - unused LookML view detector.
//!
//! Features:
//! - Recursive scan of a LookML project directory
//! - Transitive reachability through derived tables and `extends`
//! - CSV report in the current directory, summary on stdout
//! - Optional `deadview.toml` at the scanned root

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use deadview_core::{
    init_structured_logging, load_config, log_info, print_json, print_plain, write_csv,
    AnalysisResult, Deadview, DeadviewConfig, Report,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find LookML views no explore can reach")]
pub struct Cli {
    /// Path to the LookML project directory
    #[arg(long, short)]
    path: String,
}

/// Runs the analysis for `root` and writes the CSV into `out_dir`.
fn run(root: &Path, out_dir: &Path) -> Result<PathBuf> {
    let cfg = load_config(root)
        .with_context(|| format!("Failed to load configuration from {}", root.display()))?
        .unwrap_or_default();

    let result = Deadview::new(root)
        .from_config(&cfg)
        .analyze()
        .with_context(|| format!("Failed to analyze {}", root.display()))?;

    let csv_path = write_csv(&Report::from_result(&result), out_dir, root, cfg.report_suffix())
        .context("Failed to write CSV report")?;
    log_info(&format!("report written to {}", csv_path.display()));

    print_summary(&cfg, &result);
    Ok(csv_path)
}

fn print_summary(cfg: &DeadviewConfig, result: &AnalysisResult) {
    if cfg.wants_json() {
        print_json(result);
    } else {
        print_plain(result);
    }
}

fn main() -> Result<()> {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadview internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 101.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    let root = PathBuf::from(&cli.path);
    let out_dir = std::env::current_dir().context("Failed to determine current directory")?;

    let csv_path = run(&root, &out_dir)?;
    println!("Report: {}", csv_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir()
            .join("deadview_cli_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if temp_dir.exists() {
            fs::remove_dir_all(&temp_dir).ok();
        }
        fs::create_dir_all(&temp_dir).unwrap();
        temp_dir
    }

    // --- argument parsing ---

    #[test]
    fn test_path_is_required() {
        assert!(Cli::try_parse_from(["deadview"]).is_err());
    }

    #[test]
    fn test_long_and_short_path() {
        let cli = Cli::try_parse_from(["deadview", "--path", "/data/lookml"]).unwrap();
        assert_eq!(cli.path, "/data/lookml");
        let cli = Cli::try_parse_from(["deadview", "-p", "lookml"]).unwrap();
        assert_eq!(cli.path, "lookml");
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["deadview", "-p", ".", "--fix"]).is_err());
    }

    // --- run ---

    #[test]
    fn test_run_writes_report() {
        let temp_dir = create_temp_dir("run");
        let project = temp_dir.join("my_project");
        create_file(&project.join("sales.model.lkml"), "explore: orders {}\n");
        create_file(&project.join("orders.view.lkml"), "view: orders {}\nview: stale {}\n");

        let out = temp_dir.join("out");
        fs::create_dir_all(&out).unwrap();
        let csv_path = run(&project, &out).unwrap();

        assert_eq!(csv_path, out.join("my_project_unused_views.csv"));
        assert_eq!(fs::read_to_string(&csv_path).unwrap(), ",0\n0,stale\n");
        fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_run_honors_config_suffix() {
        let temp_dir = create_temp_dir("suffix");
        let project = temp_dir.join("proj");
        create_file(&project.join("deadview.toml"), "[output]\nsuffix = \"_dead.csv\"\n");
        create_file(&project.join("a.view.lkml"), "view: a {}\n");

        let out = temp_dir.join("out");
        fs::create_dir_all(&out).unwrap();
        let csv_path = run(&project, &out).unwrap();
        assert_eq!(csv_path, out.join("proj_dead.csv"));
        fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_run_missing_directory_fails() {
        let temp_dir = create_temp_dir("missing");
        let err = run(&temp_dir.join("nope"), &temp_dir).unwrap_err();
        assert!(err.to_string().contains("Failed to analyze"));
        fs::remove_dir_all(&temp_dir).ok();
    }

    #[test]
    fn test_run_invalid_config_fails() {
        let temp_dir = create_temp_dir("bad_config");
        create_file(&temp_dir.join("deadview.toml"), "unknown_key = 1\n");
        assert!(run(&temp_dir, &temp_dir).is_err());
        fs::remove_dir_all(&temp_dir).ok();
    }
}
