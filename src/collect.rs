use crate::git::GitRepo;
use crate::inspector::Inspector;
use crate::model::{AnalysisWindow, RepositoryData};
use std::path::PathBuf;
use tracing::{info, warn};

/// Gathers commits and supplementary statistics for each repository.
///
/// Failures are logged and leave that repository with empty data; they never
/// abort the run.
pub struct Collector {
    inspector: Inspector,
    window: AnalysisWindow,
}

impl Collector {
    pub fn new(inspector: Inspector, window: AnalysisWindow) -> Self {
        Self { inspector, window }
    }

    pub fn collect_all(&self, paths: &[PathBuf]) -> Vec<RepositoryData> {
        paths.iter().map(|p| self.collect_one(p.clone())).collect()
    }

    pub fn collect_one(&self, path: PathBuf) -> RepositoryData {
        info!(repository = %path.display(), "processing repository");
        let mut data = RepositoryData::new(path);

        match self.inspector.run(&data.path, &self.window) {
            Ok(stats) => data.inspector = Some(stats),
            Err(e) => warn!(repository = %data.name, error = %e, "failed to run gitinspector"),
        }

        match GitRepo::open(&data.path).and_then(|repo| repo.collect_commits(&self.window)) {
            Ok(commits) => data.commits = commits,
            Err(e) => warn!(repository = %data.name, error = %e, "failed to collect commits"),
        }

        data
    }
}
