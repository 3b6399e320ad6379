use crate::error::{DigestError, Result};
use crate::model::{AnalysisWindow, InspectorData};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Runs the external `gitinspector` tool for supplementary statistics.
pub struct Inspector {
    program: String,
}

impl Inspector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// JSON output first; on a failed exit, one retry in plain text.
    pub fn run(&self, repo: &Path, window: &AnalysisWindow) -> Result<InspectorData> {
        let since = format!("--since={}", window.start.format("%Y-%m-%d"));
        let until = format!("--until={}", window.end.format("%Y-%m-%d"));

        match self.invoke(repo, &["--format=json", &since, &until]) {
            Ok(stdout) => Ok(parse_output(stdout)),
            Err(e) => {
                debug!(
                    repository = %repo.display(),
                    error = %e,
                    "JSON run failed, retrying as text"
                );
                let stdout = self.invoke(repo, &[&since, &until])?;
                Ok(InspectorData::from_raw_text(stdout))
            }
        }
    }

    fn invoke(&self, repo: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .arg(repo)
            .current_dir(repo)
            .output()
            .map_err(|e| DigestError::Inspector(format!("Failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(DigestError::Inspector(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Structured data when `stdout` is JSON, the empty structure with raw text otherwise.
pub fn parse_output(stdout: String) -> InspectorData {
    match serde_json::from_str::<InspectorData>(&stdout) {
        Ok(data) => data,
        Err(e) => {
            warn!(error = %e, "gitinspector output is not valid JSON");
            InspectorData::from_raw_text(stdout)
        }
    }
}
