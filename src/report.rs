use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use crate::session::{Session, CATEGORIES};

/// Static follow-up guidance appended to every report.
const NEXT_STEPS: [&str; 5] = [
    "1. Review nmap results for open ports and service versions",
    "2. Check web technologies identified by whatweb",
    "3. Confirm WAF findings before any intrusive testing",
    "4. Triage nuclei matches for exposures and misconfigurations",
    "5. Inspect the captured TLS certificate chain and HTTP headers",
];

/// Writes the plain-text summary for a finished session: every file found
/// in the category subdirectories, grouped by category, plus the fixed
/// next-steps list. Never inspects file contents and never fails just
/// because a phase produced nothing.
pub fn generate(session: &Session) -> Result<PathBuf> {
    let mut report = String::new();
    report.push_str("STEALTH RECONNAISSANCE SUMMARY\n");
    report.push_str(&"=".repeat(50));
    report.push('\n');
    report.push_str(&format!(
        "Generated: {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    report.push_str(&format!("Target: {}\n\n", session.label()));

    report.push_str("FILES PRODUCED:\n");
    report.push_str(&"-".repeat(20));
    report.push('\n');

    for category in CATEGORIES {
        let files = list_files(session, category);
        if files.is_empty() {
            continue;
        }
        report.push_str(&format!("\n{}:\n", category.to_uppercase()));
        for name in files {
            report.push_str(&format!("  - {}\n", name));
        }
    }

    report.push('\n');
    report.push_str(&"=".repeat(50));
    report.push('\n');
    report.push_str("RECOMMENDED NEXT STEPS:\n");
    for step in NEXT_STEPS {
        report.push_str(step);
        report.push('\n');
    }

    let path = session.report_path();
    fs::write(&path, report)
        .with_context(|| format!("failed to write summary report {}", path.display()))?;
    Ok(path)
}

/// Regular files currently present in one category directory, sorted by
/// name so the report is deterministic.
fn list_files(session: &Session, category: &str) -> Vec<String> {
    let dir = session.category_dir(category);
    let Ok(entries) = fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_report_generates_for_empty_session() {
        let base = tempdir().unwrap();
        let session = Session::create(base.path(), "example.com").unwrap();

        let path = generate(&session).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("STEALTH RECONNAISSANCE SUMMARY"));
        assert!(text.contains("Target: example.com"));
        assert!(text.contains("RECOMMENDED NEXT STEPS:"));
        // no phase output, so no category headings
        assert!(!text.contains("NMAP:"));
    }

    #[test]
    fn test_report_lists_only_existing_files() {
        let base = tempdir().unwrap();
        let session = Session::create(base.path(), "example.com").unwrap();
        fs::write(session.category_dir("nmap").join("nmap_example_com.txt"), "scan").unwrap();
        fs::write(session.category_dir("nuclei").join("nuclei_example_com.json"), "{}").unwrap();

        let text = fs::read_to_string(generate(&session).unwrap()).unwrap();
        assert!(text.contains("NMAP:"));
        assert!(text.contains("  - nmap_example_com.txt"));
        assert!(text.contains("NUCLEI:"));
        assert!(text.contains("  - nuclei_example_com.json"));
        assert!(!text.contains("WEB_TECH:"));
        assert!(!text.contains("WAF_DETECTION:"));
    }

    #[test]
    fn test_report_skips_subdirectories() {
        let base = tempdir().unwrap();
        let session = Session::create(base.path(), "example.com").unwrap();
        fs::create_dir(session.category_dir("nmap").join("nested")).unwrap();

        let text = fs::read_to_string(generate(&session).unwrap()).unwrap();
        assert!(!text.contains("nested"));
    }

    #[test]
    fn test_report_is_sorted_within_category() {
        let base = tempdir().unwrap();
        let session = Session::create(base.path(), "batch_scan").unwrap();
        fs::write(session.category_dir("logs").join("b.txt"), "").unwrap();
        fs::write(session.category_dir("logs").join("a.txt"), "").unwrap();

        let text = fs::read_to_string(generate(&session).unwrap()).unwrap();
        let a = text.find("  - a.txt").unwrap();
        let b = text.find("  - b.txt").unwrap();
        assert!(a < b);
    }
}
