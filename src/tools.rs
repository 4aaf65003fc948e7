use anyhow::{bail, Result};
use std::process::Command;

/// Every binary the phase drivers invoke. All of them are required; the
/// probe utilities (openssl, curl) are checked like the scanners so a run
/// can never reach a phase whose tool is absent.
pub const REQUIRED_TOOLS: [&str; 6] = ["nmap", "whatweb", "wafw00f", "nuclei", "openssl", "curl"];

fn on_path(tool: &str) -> bool {
    Command::new("which")
        .arg(tool)
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Verifies every required tool resolves on PATH before any work begins.
/// The error names all missing tools at once rather than the first.
pub fn preflight() -> Result<()> {
    let missing: Vec<&str> = REQUIRED_TOOLS
        .iter()
        .copied()
        .filter(|tool| !on_path(tool))
        .collect();

    if !missing.is_empty() {
        bail!(
            "required external tools not found on PATH: {}",
            missing.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_utilities_resolve() {
        assert!(on_path("sh"));
        assert!(on_path("echo"));
    }

    #[test]
    fn test_missing_tool_detected() {
        assert!(!on_path("definitely-not-a-real-binary"));
    }
}
