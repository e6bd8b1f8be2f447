//! Toolchain health checks.
//!
//! Fast environment checks for the three external tools the pipeline may
//! need, without invoking a build.

use std::fmt::Write;
use std::path::PathBuf;

use crate::builder::{select_strategy, Toolchain};
use crate::util::process::find_executable;

/// Result of a single tool check.
#[derive(Debug, Clone)]
pub struct ToolCheck {
    /// Tool binary name
    pub name: &'static str,

    /// What the tool does in the pipeline
    pub role: &'static str,

    /// Resolved path, if the tool was found
    pub path: Option<PathBuf>,
}

impl ToolCheck {
    /// Whether the tool was found.
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Report over all three tools.
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub checks: Vec<ToolCheck>,
}

impl DoctorReport {
    /// Reduce the report to the availability record the orchestrator uses.
    pub fn toolchain(&self) -> Toolchain {
        let found = |name: &str| self.checks.iter().any(|c| c.name == name && c.found());
        Toolchain {
            wasm_pack: found("wasm-pack"),
            cargo: found("cargo"),
            wasm_bindgen: found("wasm-bindgen"),
        }
    }

    /// Whether any build strategy can run with what was found.
    pub fn usable(&self) -> bool {
        select_strategy(&self.toolchain()).is_ok()
    }
}

/// Probe the environment and produce a report.
pub fn doctor() -> DoctorReport {
    let check = |name: &'static str, role: &'static str| ToolCheck {
        name,
        role,
        path: find_executable(name),
    };

    DoctorReport {
        checks: vec![
            check("wasm-pack", "managed build orchestrator"),
            check("cargo", "base compiler driver"),
            check("wasm-bindgen", "binding generator"),
        ],
    }
}

/// Format the report for terminal output.
pub fn format_report(report: &DoctorReport) -> String {
    let mut output = String::new();

    writeln!(output, "Gangway Doctor").unwrap();
    writeln!(output, "==============\n").unwrap();

    for check in &report.checks {
        let status = if check.found() { "[OK]" } else { "[!!]" };
        write!(output, "  {} {} ({})", status, check.name, check.role).unwrap();
        if let Some(ref path) = check.path {
            write!(output, " at {}", path.display()).unwrap();
        }
        writeln!(output).unwrap();
    }
    writeln!(output).unwrap();

    match select_strategy(&report.toolchain()) {
        Ok(_) => writeln!(output, "A usable build strategy is available.").unwrap(),
        Err(err) => writeln!(output, "No usable build strategy: {err}").unwrap(),
    }

    output
}
