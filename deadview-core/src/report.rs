//! Output formatting - CSV report, plaintext and JSON summaries.
//!
//! The CSV keeps the single-column layout downstream spreadsheets already
//! consume: a header row `,0` followed by `index,value` rows.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use serde_json::json;

use crate::builder::AnalysisResult;

/// Header row of the CSV report.
const CSV_HEADER: [&str; 2] = ["", "0"];

/// File name used when the scanned root has no usable last segment.
const FALLBACK_STEM: &str = "lookml";

/// The ordered report rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub unused_views: Vec<String>,
    pub skipped_files: Vec<String>,
    pub empty_files: Vec<String>,
}

impl Report {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            unused_views: result.unused_views.clone(),
            skipped_files: result.skipped_files.iter().map(|s| s.file.clone()).collect(),
            empty_files: result.empty_files.clone(),
        }
    }

    /// Unused views, then skipped files, then empty files. No deduplication.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.unused_views
            .iter()
            .chain(&self.skipped_files)
            .chain(&self.empty_files)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.unused_views.len() + self.skipped_files.len() + self.empty_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `<last segment of root><suffix>`.
///
/// Roots like `.` have no last segment of their own; the canonical path is
/// used for them.
pub fn report_file_name(root: &Path, suffix: &str) -> String {
    let stem = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| FALLBACK_STEM.to_string());
    format!("{}{}", stem, suffix)
}

/// Writes the report into `out_dir` and returns the file path.
pub fn write_csv(report: &Report, out_dir: &Path, root: &Path, suffix: &str) -> Result<PathBuf> {
    let path = out_dir.join(report_file_name(root, suffix));
    let mut writer = Writer::from_path(&path)
        .with_context(|| format!("failed to initialize csv writer for {}", path.display()))?;

    writer
        .write_record(CSV_HEADER)
        .with_context(|| format!("failed to write header to {}", path.display()))?;
    for (i, row) in report.rows().enumerate() {
        writer
            .write_record([i.to_string().as_str(), row])
            .with_context(|| format!("failed to write data to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush data to {}", path.display()))?;

    Ok(path)
}

/// Prints the analysis summary in plain text format.
pub fn print_plain(result: &AnalysisResult) {
    println!(
        "Scanned {} files: {} explores, {} views",
        result.files_scanned, result.total_explores, result.total_views
    );

    if result.unused_views.is_empty() {
        println!("No unused views found.");
    } else {
        println!(
            "UNUSED VIEWS ({} of {}, {:.1}%):",
            result.unused_views.len(),
            result.declared_views,
            result.unused_percentage()
        );
        for view in &result.unused_views {
            let sources = result.registry.source_files(view);
            if sources.is_empty() {
                println!("- {}", view);
            } else {
                println!("- {} ({})", view, sources.join(", "));
            }
        }
    }

    if !result.skipped_files.is_empty() {
        println!("SKIPPED FILES ({}):", result.skipped_files.len());
        for skipped in &result.skipped_files {
            println!("- {}: {}", skipped.file, skipped.reason);
        }
    }

    if !result.empty_files.is_empty() {
        println!("EMPTY FILES ({}):", result.empty_files.len());
        for file in &result.empty_files {
            println!("- {}", file);
        }
    }
}

/// Builds the JSON summary.
pub fn summary_json(result: &AnalysisResult) -> serde_json::Value {
    let unused: Vec<serde_json::Value> = result
        .unused_views
        .iter()
        .map(|view| {
            json!({
                "name": view,
                "origins": result.registry.origins(view),
            })
        })
        .collect();
    let skipped: Vec<serde_json::Value> = result
        .skipped_files
        .iter()
        .map(|s| json!({ "file": s.file, "reason": s.reason }))
        .collect();

    json!({
        "root": result.root.display().to_string(),
        "stats": {
            "files_scanned": result.files_scanned,
            "explores": result.total_explores,
            "views": result.total_views,
            "declared_views": result.declared_views,
            "reachable": result.reachable_views.len(),
            "unused": result.unused_views.len(),
        },
        "unused_views": unused,
        "ignored_views": result.ignored_views,
        "skipped_files": skipped,
        "empty_files": result.empty_files,
    })
}

/// Prints the analysis summary in JSON format.
pub fn print_json(result: &AnalysisResult) {
    match serde_json::to_string_pretty(&summary_json(result)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{{\"unused_views\": {:?}}}", result.unused_views);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("deadview_report_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample() -> Report {
        Report {
            unused_views: vec!["a_view".into(), "b_view".into()],
            skipped_files: vec!["broken.view.lkml".into()],
            empty_files: vec!["empty.model.lkml".into(), "a_view".into()],
        }
    }

    #[test]
    fn test_rows_order_without_dedup() {
        let report = sample();
        let rows: Vec<&str> = report.rows().collect();
        assert_eq!(
            rows,
            vec!["a_view", "b_view", "broken.view.lkml", "empty.model.lkml", "a_view"]
        );
        assert_eq!(report.len(), 5);
        assert!(Report::default().is_empty());
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name(Path::new("/data/lookml_project"), "_unused_views.csv"),
            "lookml_project_unused_views.csv"
        );
        assert_eq!(
            report_file_name(Path::new("/data/lookml_project/"), "_x.csv"),
            "lookml_project_x.csv"
        );
    }

    #[test]
    fn test_write_csv_layout() {
        let out = create_temp_dir("csv");
        let path = write_csv(&sample(), &out, Path::new("/data/proj"), "_unused_views.csv").unwrap();
        assert_eq!(path, out.join("proj_unused_views.csv"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            ",0\n0,a_view\n1,b_view\n2,broken.view.lkml\n3,empty.model.lkml\n4,a_view\n"
        );
        fs::remove_dir_all(&out).ok();
    }

    #[test]
    fn test_write_csv_empty_report_has_header_only() {
        let out = create_temp_dir("empty");
        let path = write_csv(&Report::default(), &out, Path::new("/data/proj"), "_r.csv").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), ",0\n");
        fs::remove_dir_all(&out).ok();
    }

    #[test]
    fn test_write_csv_unwritable_dir_fails() {
        let out = create_temp_dir("missing").join("nope");
        assert!(write_csv(&sample(), &out, Path::new("/data/proj"), "_r.csv").is_err());
    }
}
