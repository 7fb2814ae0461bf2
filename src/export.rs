// src/export.rs

use chrono::{DateTime, Local};
use color_eyre::eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::html_report::render_document;
use crate::core::models::Report;

const MAX_FILENAME_STEM: usize = 200;

/// Makes a domain safe to embed in a file name.
pub fn safe_filename(domain: &str) -> String {
    let safe: String = domain
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .take(MAX_FILENAME_STEM)
        .collect();
    if safe.is_empty() { "domain".to_string() } else { safe }
}

pub fn report_filename(report: &Report) -> String {
    format!("Vanguard_Mail_Report_{}.html", safe_filename(report.domain_or("unknown")))
}

/// Writes the standalone HTML document for `report` into `dir` and returns its path.
pub fn export_report(report: &Report, dir: &Path, generated_at: DateTime<Local>) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(report_filename(report));
    std::fs::write(&path, render_document(report, generated_at))
        .wrap_err_with(|| format!("Failed to write report to {}", path.display()))?;
    info!(path = %path.display(), "Report exported.");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("example.com"), "example.com");
        assert_eq!(safe_filename("../etc/passwd"), ".._etc_passwd");
        assert_eq!(safe_filename("a b<c>"), "a_b_c_");
        assert_eq!(safe_filename(""), "domain");
        assert_eq!(safe_filename(&"x".repeat(300)).len(), 200);
    }

    #[test]
    fn test_report_filename_falls_back_to_unknown() {
        assert_eq!(report_filename(&Report::default()), "Vanguard_Mail_Report_unknown.html");
    }

    #[test]
    fn test_export_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let report = Report { domain: Some("example.com".into()), ..Default::default() };
        let path = export_report(&report, &dir.path().join("reports"), Local::now()).unwrap();

        assert_eq!(path.file_name().unwrap(), "Vanguard_Mail_Report_example.com.html");
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("Target Domain: <span style=\"color: var(--green);\">example.com</span>"));
    }
}
