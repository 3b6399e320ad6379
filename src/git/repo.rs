use crate::error::{DigestError, Result};
use crate::model::{AnalysisWindow, CommitInfo, CommitRecord, FileStats};
use chrono::DateTime;
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use similar::{ChangeTag, TextDiff};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Blobs with a NUL byte in this prefix are treated as binary.
const BINARY_SNIFF_BYTES: usize = 8192;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = discover(path.as_ref())?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    /// Tips of every local and remote branch plus `HEAD`.
    fn branch_tips(&self) -> Result<Vec<ObjectId>> {
        let mut tips = Vec::new();
        if let Ok(head) = self.repo.head_id() {
            tips.push(head.detach());
        }

        let platform = self
            .repo
            .references()
            .map_err(|e| DigestError::GitRepo(format!("Failed to list references: {e}")))?;
        let local = platform
            .local_branches()
            .map_err(|e| DigestError::GitRepo(format!("Failed to list branches: {e}")))?;
        let remote = platform
            .remote_branches()
            .map_err(|e| DigestError::GitRepo(format!("Failed to list remote branches: {e}")))?;

        for reference in local.chain(remote) {
            let reference = match reference {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable reference");
                    continue;
                }
            };
            let name = reference.name().as_bstr().to_string();
            match reference.into_fully_peeled_id() {
                Ok(id) => tips.push(id.detach()),
                Err(e) => warn!(reference = %name, error = %e, "skipping unpeelable reference"),
            }
        }

        Ok(tips)
    }

    /// Every commit reachable from any branch whose commit time falls in
    /// `window`, newest first.
    pub fn collect_commits(&self, window: &AnalysisWindow) -> Result<Vec<CommitRecord>> {
        let mut records = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = self.branch_tips()?.into();

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Collecting commits from {}", self.path.display()));

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let timestamp = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| DigestError::InvalidDate(format!("Invalid timestamp: {secs}")))?;

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.detach()).collect();
            for pid in &parents {
                stack.push_back(*pid);
            }

            if !window.contains(&timestamp) {
                continue;
            }

            let author = commit.author()?;
            let info = CommitInfo {
                id: commit_id.to_string(),
                author_name: author.name.to_string(),
                author_email: author.email.to_string(),
                message: commit.message_raw()?.to_string(),
                timestamp,
            };

            // Merges are measured against their first parent.
            let files = self.diff_stats(commit_id, parents.first().copied())?;
            records.push(CommitRecord::from_parts(info, &files));
            pb.inc(1);
        }

        pb.finish_and_clear();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        debug!(repository = %self.path.display(), commits = records.len(), "collected commits");
        Ok(records)
    }

    /// Up to `limit` commits reachable from `HEAD`.
    pub fn count_commits(&self, limit: usize) -> Result<usize> {
        let head = match self.repo.head_id() {
            Ok(id) => id.detach(),
            Err(_) => return Ok(0),
        };

        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack = vec![head];
        while let Some(id) = stack.pop() {
            if seen.len() >= limit {
                break;
            }
            if !seen.insert(id) {
                continue;
            }
            let commit = self.repo.find_commit(id)?;
            stack.extend(commit.parent_ids().map(|p| p.detach()));
        }
        Ok(seen.len())
    }

    fn diff_stats(
        &self,
        commit_id: ObjectId,
        parent_id: Option<ObjectId>,
    ) -> Result<Vec<FileStats>> {
        let commit_tree = self.repo.find_commit(commit_id)?.tree()?;
        let changes: Vec<ChangeDetached> = match parent_id {
            Some(pid) => {
                let parent_tree = self.repo.find_commit(pid)?.tree()?;
                self.repo
                    .diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
            }
            None => self.repo.diff_tree_to_tree(None, Some(&commit_tree), None)?,
        };

        let mut files = Vec::new();
        for change in changes {
            self.handle_change(change, &mut files);
        }
        Ok(files)
    }

    fn handle_change(&self, change: ChangeDetached, files: &mut Vec<FileStats>) {
        match change {
            ChangeDetached::Addition { id, location, entry_mode, .. } => {
                if entry_mode.is_tree() {
                    return;
                }
                if let Ok(obj) = self.repo.find_object(id) {
                    let is_binary = is_binary(&obj.data);
                    files.push(FileStats {
                        path: location.to_string(),
                        added_lines: if is_binary { 0 } else { count_lines(&obj.data) },
                        deleted_lines: 0,
                        is_binary,
                    });
                }
            }
            ChangeDetached::Deletion { id, location, entry_mode, .. } => {
                if entry_mode.is_tree() {
                    return;
                }
                if let Ok(obj) = self.repo.find_object(id) {
                    let is_binary = is_binary(&obj.data);
                    files.push(FileStats {
                        path: location.to_string(),
                        added_lines: 0,
                        deleted_lines: if is_binary { 0 } else { count_lines(&obj.data) },
                        is_binary,
                    });
                }
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                entry_mode,
                ..
            } => {
                if entry_mode.is_tree() {
                    return;
                }
                self.push_pair(previous_id, id, location.to_string(), files);
            }
            ChangeDetached::Rewrite {
                source_id,
                id,
                location,
                entry_mode,
                ..
            } => {
                if entry_mode.is_tree() {
                    return;
                }
                self.push_pair(source_id, id, location.to_string(), files);
            }
        }
    }

    fn push_pair(
        &self,
        old_id: ObjectId,
        new_id: ObjectId,
        path: String,
        files: &mut Vec<FileStats>,
    ) {
        if let (Ok(old_obj), Ok(new_obj)) =
            (self.repo.find_object(old_id), self.repo.find_object(new_id))
        {
            let is_binary = is_binary(&old_obj.data) || is_binary(&new_obj.data);
            let (added, deleted) = if is_binary {
                (0, 0)
            } else {
                line_diff(&old_obj.data, &new_obj.data)
            };
            files.push(FileStats {
                path,
                added_lines: added,
                deleted_lines: deleted,
                is_binary,
            });
        }
    }
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(BINARY_SNIFF_BYTES).any(|&b| b == 0)
}

fn count_lines(data: &[u8]) -> u32 {
    String::from_utf8_lossy(data).lines().count() as u32
}

/// Inserted and deleted line counts between two blobs.
fn line_diff(old: &[u8], new: &[u8]) -> (u32, u32) {
    let old_text = String::from_utf8_lossy(old);
    let new_text = String::from_utf8_lossy(new);
    let diff = TextDiff::from_lines(old_text.as_ref(), new_text.as_ref());

    let mut added = 0u32;
    let mut deleted = 0u32;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => deleted += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, deleted)
}
