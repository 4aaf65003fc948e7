use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

/// Fixed per-session subdirectories, one per output category.
pub const CATEGORIES: [&str; 5] = ["nmap", "web_tech", "waf_detection", "nuclei", "logs"];

pub const COMMAND_LOG: &str = "commands.log";
pub const REPORT_FILE: &str = "SUMMARY_REPORT.txt";

/// One output directory tree for a single run, created up front and only
/// ever populated with files afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    root: PathBuf,
    label: String,
}

impl Session {
    /// Creates `recon_{label}_{timestamp}` under `base` along with every
    /// category subdirectory.
    pub fn create(base: &Path, label: &str) -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let root = base.join(format!("recon_{}_{}", sanitize(label), timestamp));

        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create session directory {}", root.display()))?;
        for category in CATEGORIES {
            fs::create_dir_all(root.join(category))
                .with_context(|| format!("failed to create {} subdirectory", category))?;
        }

        Ok(Self {
            root,
            label: label.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.root.join(category)
    }

    /// Deterministic output path for one target within a category, e.g.
    /// `nmap/nmap_example_com.txt` for `example.com`.
    pub fn output_path(&self, category: &str, prefix: &str, target: &str, ext: &str) -> PathBuf {
        self.root
            .join(category)
            .join(format!("{}_{}.{}", prefix, sanitize(target), ext))
    }

    /// Appends one invocation record to `logs/commands.log`.
    pub fn log_command(&self, command_line: &str, output_file: Option<&Path>) -> Result<()> {
        let log_path = self.root.join("logs").join(COMMAND_LOG);
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("failed to open {}", log_path.display()))?;

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(log, "[{}] {}", timestamp, command_line)?;
        if let Some(path) = output_file {
            writeln!(log, "    output: {}", path.display())?;
        }
        Ok(())
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }
}

/// Maps a target to a filesystem-safe stem: alphanumerics and `-` pass
/// through, everything else becomes `_`.
pub fn sanitize(target: &str) -> String {
    target
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
