use crate::config::{repository_problem, Config};
use crate::deliver::{transport_from_config, Delivery};
use crate::git::GitRepo;
use anyhow::{bail, Context};
use console::style;
use std::path::{Path, PathBuf};

const COMMIT_PROBE_LIMIT: usize = 100;

pub fn test_slack(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.require_slack().context("Slack is not configured")?;
    let transport = transport_from_config(&config).context("Slack is not configured")?;
    let delivery = Delivery::new(transport, config.slack_channel.clone());

    match delivery.test_connection() {
        Ok(identity) => {
            println!("{} {}", style("Slack connection successful:").green(), identity);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", style("Slack connection failed:").red(), e);
            bail!("Slack connection test failed");
        }
    }
}

/// One row of the validation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCheck {
    pub path: PathBuf,
    pub valid: bool,
    pub details: String,
}

pub fn check_repository(path: &Path) -> RepositoryCheck {
    let (valid, details) = match repository_problem(path) {
        Some(problem) => (false, problem.to_string()),
        None => match GitRepo::open(path).and_then(|repo| repo.count_commits(COMMIT_PROBE_LIMIT)) {
            Ok(count) => (true, format!("Valid Git repo (~{count} commits)")),
            Err(e) => (false, format!("Git error: {e}")),
        },
    };

    RepositoryCheck {
        path: path.to_path_buf(),
        valid,
        details,
    }
}

pub fn validate_repos(paths: &[PathBuf]) -> anyhow::Result<()> {
    let checks: Vec<RepositoryCheck> = paths.iter().map(|p| check_repository(p)).collect();

    println!(
        "{:<50} {:<10} {}",
        style("Path").bold(),
        style("Status").bold(),
        style("Details").bold()
    );
    println!("{}", "─".repeat(90));
    for check in &checks {
        let status = if check.valid {
            style("valid").green()
        } else {
            style("invalid").red()
        };
        println!(
            "{:<50} {:<10} {}",
            check.path.display().to_string(),
            status,
            check.details
        );
    }

    let invalid = checks.iter().filter(|c| !c.valid).count();
    if invalid > 0 {
        bail!("{invalid} of {} repositories are invalid", checks.len());
    }

    println!("\n{}", style("All repositories are valid").green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_path_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let check = check_repository(&dir.path().join("gone"));
        assert!(!check.valid);
        assert_eq!(check.details, "Path does not exist");
    }

    #[test]
    fn plain_directory_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let check = check_repository(dir.path());
        assert!(!check.valid);
        assert_eq!(check.details, "Not a Git repository");
    }
}
