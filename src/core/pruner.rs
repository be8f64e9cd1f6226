//! Branch pruner: read the branch list artifact and delete one remote branch per line.

use std::path::Path;

use serde::Serialize;

use crate::config::{NameMode, PruneConfig};
use crate::error::{Error, Result};
use crate::git::RemoteBranches;
use crate::output::BulkResult;
use crate::utils::io;

const SEPARATOR: char = '/';

/// What happened to one artifact line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    /// The artifact line the branch name was derived from.
    pub reference: String,
    pub command: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub skipped: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneReport {
    pub artifact: String,
    pub remote: String,
    pub dry_run: bool,
    /// Derived branch names in artifact order.
    pub derived_names: Vec<String>,
    pub deletions: BulkResult<DeleteOutcome>,
}

impl PruneReport {
    /// Process exit code for this report under the given policy.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && self.deletions.summary.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Branch name handed to `git push <remote> -d` for one artifact line.
pub fn derive_branch_name(line: &str, mode: NameMode, remote: &str) -> String {
    match mode {
        NameMode::StripSeparators => line.replace(SEPARATOR, ""),
        NameMode::RemotePrefix => {
            let name = line.trim();
            // listed lines already lost their remote part
            if let Some(listed) = name.strip_prefix(SEPARATOR) {
                return listed.to_string();
            }
            name.strip_prefix(remote)
                .and_then(|rest| rest.strip_prefix(SEPARATOR))
                .unwrap_or(name)
                .to_string()
        }
    }
}

/// Artifact lines without their terminators. A missing artifact is fatal.
pub fn read_branch_list(path: &Path) -> Result<Vec<String>> {
    let content = io::read_file_if_exists(path, &format!("read {}", path.display()))?
        .ok_or_else(|| Error::artifact_not_found(path.display().to_string()))?;

    Ok(content.lines().map(String::from).collect())
}

/// Run the pruning step against the artifact named in `config`.
///
/// Every line gets exactly one deletion attempt; failures are recorded, never retried.
pub fn prune_branch_list<R>(remote: &mut R, config: &PruneConfig) -> Result<PruneReport>
where
    R: RemoteBranches + ?Sized,
{
    let artifact = config.artifact_path();
    let lines = read_branch_list(&artifact)?;

    let mut derived_names = Vec::with_capacity(lines.len());
    let mut deletions = BulkResult::new(if config.dry_run { "prune.dry_run" } else { "prune" });

    for line in lines {
        let name = derive_branch_name(&line, config.name_mode, &config.remote);
        derived_names.push(name.clone());

        if config.dry_run {
            log_status!("prune", "Would delete {} on {}", name, config.remote);
            deletions.record_skipped(
                name,
                DeleteOutcome {
                    reference: line,
                    command: String::new(),
                    success: true,
                    exit_code: None,
                    skipped: true,
                },
            );
            continue;
        }

        match remote.delete_ref(&config.remote, &name) {
            Ok(outcome) if outcome.success => {
                log_status!("prune", "Deleted {} on {}", name, config.remote);
                deletions.record_success(
                    name,
                    DeleteOutcome {
                        reference: line,
                        command: outcome.command,
                        success: true,
                        exit_code: Some(outcome.exit_code),
                        skipped: false,
                    },
                );
            }
            Ok(outcome) => {
                let error = outcome.error_text();
                log_status!("prune", "Failed to delete {}: {}", name, error);
                deletions.record_failure(
                    name,
                    Some(DeleteOutcome {
                        reference: line,
                        command: outcome.command,
                        success: false,
                        exit_code: Some(outcome.exit_code),
                        skipped: false,
                    }),
                    error,
                );
            }
            Err(err) => {
                log_status!("prune", "Failed to delete {}: {}", name, err.message);
                let command = err.details["command"].as_str().unwrap_or_default().to_string();
                deletions.record_failure(
                    name,
                    Some(DeleteOutcome {
                        reference: line,
                        command,
                        success: false,
                        exit_code: None,
                        skipped: false,
                    }),
                    err.message,
                );
            }
        }
    }

    log_status!("prune", "Derived names: {:?}", derived_names);

    Ok(PruneReport {
        artifact: artifact.display().to_string(),
        remote: config.remote.clone(),
        dry_run: config.dry_run,
        derived_names,
        deletions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MemoryRemote;
    use std::fs;

    fn config_with_artifact(dir: &tempfile::TempDir, content: &str) -> PruneConfig {
        let path = dir.path().join("branch_list");
        fs::write(&path, content).unwrap();
        PruneConfig {
            artifact: path.display().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn strip_separators_removes_every_slash() {
        let mode = NameMode::StripSeparators;
        assert_eq!(derive_branch_name("origin/auto-patch-7", mode, "origin"), "originauto-patch-7");
        assert_eq!(derive_branch_name("/team/auto-patch-x", mode, "origin"), "teamauto-patch-x");
        assert_eq!(derive_branch_name("/auto-patch-1", mode, "origin"), "auto-patch-1");
    }

    #[test]
    fn remote_prefix_keeps_inner_separators() {
        let mode = NameMode::RemotePrefix;
        assert_eq!(derive_branch_name("origin/team/auto-patch-x", mode, "origin"), "team/auto-patch-x");
        assert_eq!(derive_branch_name("/team/auto-patch-x", mode, "origin"), "team/auto-patch-x");
        assert_eq!(derive_branch_name("  upstream/auto-patch-1", mode, "origin"), "upstream/auto-patch-1");
    }

    #[test]
    fn remote_prefix_strips_remote_only_once() {
        let mode = NameMode::RemotePrefix;
        assert_eq!(derive_branch_name("/origin/auto-patch-1", mode, "origin"), "origin/auto-patch-1");
        assert_eq!(derive_branch_name("origin/origin/auto-patch-1", mode, "origin"), "origin/auto-patch-1");
    }

    #[test]
    fn remote_prefix_deletes_branch_named_after_its_remote() {
        let dir = tempfile::tempdir().unwrap();
        let config = PruneConfig {
            artifact: dir.path().join("branch_list").display().to_string(),
            name_mode: NameMode::RemotePrefix,
            ..Default::default()
        };
        let mut remote = MemoryRemote::new([
            "origin/origin/auto-patch-1",
            "origin/auto-patch-1",
            "origin/main",
        ]);

        let report = crate::run::run(&mut remote, &config).unwrap();

        assert_eq!(report.prune.derived_names, vec!["origin/auto-patch-1", "auto-patch-1"]);
        assert_eq!(remote.deletions(), ["origin/auto-patch-1", "auto-patch-1"]);
        assert_eq!(report.prune.deletions.summary.succeeded, 2);
        assert_eq!(remote.branches(), ["origin/main"]);
    }

    #[test]
    fn blank_lines_still_get_a_deletion_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_artifact(&dir, "/auto-patch-1\n\n/auto-patch-2\n");
        let mut remote = MemoryRemote::new(["origin/auto-patch-1", "origin/auto-patch-2"]);

        let report = prune_branch_list(&mut remote, &config).unwrap();

        assert_eq!(remote.deletions(), ["auto-patch-1", "", "auto-patch-2"]);
        assert_eq!(report.derived_names, vec!["auto-patch-1", "", "auto-patch-2"]);
        assert_eq!(report.deletions.summary.total, 3);
        assert_eq!(report.deletions.summary.succeeded, 2);
        assert_eq!(report.deletions.summary.failed, 1);
    }

    #[test]
    fn derived_name_for_full_reference_is_deleted_literally() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_artifact(&dir, "origin/auto-patch-7\n");
        let mut remote = MemoryRemote::new(["origin/auto-patch-7"]);

        let report = prune_branch_list(&mut remote, &config).unwrap();

        assert_eq!(report.derived_names, vec!["originauto-patch-7"]);
        assert_eq!(remote.deletions(), ["originauto-patch-7"]);
        // the literal name does not exist on the remote
        assert_eq!(report.deletions.summary.failed, 1);
        assert_eq!(report.exit_code(false), 0);
        assert_eq!(report.exit_code(true), 1);
    }

    #[test]
    fn one_deletion_per_line_regardless_of_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_artifact(&dir, "/auto-patch-1\n/auto-patch-gone\n/auto-patch-2\n");
        let mut remote = MemoryRemote::new(["origin/auto-patch-1", "origin/auto-patch-2", "origin/main"]);

        let report = prune_branch_list(&mut remote, &config).unwrap();

        assert_eq!(remote.deletions(), ["auto-patch-1", "auto-patch-gone", "auto-patch-2"]);
        assert_eq!(report.deletions.summary.total, 3);
        assert_eq!(report.deletions.summary.succeeded, 2);
        assert_eq!(report.deletions.summary.failed, 1);
        assert_eq!(remote.branches(), ["origin/main"]);
        assert!(report.deletions.results[1]
            .error
            .as_deref()
            .unwrap()
            .contains("remote ref does not exist"));
    }

    #[test]
    fn empty_artifact_deletes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_artifact(&dir, "");
        let mut remote = MemoryRemote::new(["origin/auto-patch-1"]);

        let report = prune_branch_list(&mut remote, &config).unwrap();

        assert!(report.derived_names.is_empty());
        assert!(remote.deletions().is_empty());
        assert_eq!(report.deletions.summary.total, 0);
    }

    #[test]
    fn missing_artifact_aborts_before_any_deletion() {
        let dir = tempfile::tempdir().unwrap();
        let config = PruneConfig {
            artifact: dir.path().join("branch_list").display().to_string(),
            ..Default::default()
        };
        let mut remote = MemoryRemote::new(["origin/auto-patch-1"]);

        let err = prune_branch_list(&mut remote, &config).unwrap_err();

        assert_eq!(err.code.as_str(), "artifact.not_found");
        assert!(remote.deletions().is_empty());
    }

    #[test]
    fn crlf_terminators_are_not_part_of_the_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_artifact(&dir, "/auto-patch-1\r\n");
        let mut remote = MemoryRemote::new(["origin/auto-patch-1"]);

        let report = prune_branch_list(&mut remote, &config).unwrap();

        assert_eq!(report.derived_names, vec!["auto-patch-1"]);
        assert_eq!(report.deletions.summary.succeeded, 1);
    }

    #[test]
    fn dry_run_derives_names_without_deleting() {
        let dir = tempfile::tempdir().unwrap();
        let config = PruneConfig {
            dry_run: true,
            ..config_with_artifact(&dir, "/auto-patch-1\n/auto-patch-2\n")
        };
        let mut remote = MemoryRemote::new(["origin/auto-patch-1"]);

        let report = prune_branch_list(&mut remote, &config).unwrap();

        assert_eq!(report.derived_names, vec!["auto-patch-1", "auto-patch-2"]);
        assert!(remote.deletions().is_empty());
        assert_eq!(report.deletions.summary.skipped, 2);
        assert_eq!(report.deletions.action, "prune.dry_run");
    }

    #[test]
    fn unreachable_git_is_recorded_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_artifact(&dir, "/auto-patch-1\n/auto-patch-2\n");
        let mut remote = MemoryRemote::new(["origin/auto-patch-1"]).unreachable();

        let report = prune_branch_list(&mut remote, &config).unwrap();

        assert_eq!(report.deletions.summary.failed, 2);
        let first = report.deletions.results[0].result.as_ref().unwrap();
        assert_eq!(first.command, "git push origin -d auto-patch-1");
        assert_eq!(first.exit_code, None);
    }
}
