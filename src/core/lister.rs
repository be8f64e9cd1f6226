//! Branch lister: enumerate remote-tracking branches, keep the marked ones,
//! write them to the branch list artifact.

use regex::Regex;
use serde::Serialize;

use crate::config::PruneConfig;
use crate::error::{Error, GitCommandFailedDetails, Result};
use crate::git::{Listing, RemoteBranches};
use crate::utils::command::CommandOutcome;
use crate::utils::io;

/// Exit status reported when git could not be started, as a shell would.
const COMMAND_NOT_FOUND_EXIT_CODE: i32 = 127;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReport {
    pub artifact: String,
    pub command: String,
    pub exit_code: i32,
    pub success: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    /// Lines written to the artifact, in order.
    pub refs: Vec<String>,
}

/// Pattern selecting marked lines: from the first `/` through the end of the line.
pub fn marker_pattern(marker: &str) -> Result<Regex> {
    Regex::new(&format!("/.*{}.*", regex::escape(marker)))
        .map_err(|e| Error::internal_unexpected(format!("Invalid marker pattern: {}", e)))
}

/// Text kept from one `git branch -r` line, if the line is marked.
pub fn extract_marked(pattern: &Regex, line: &str) -> Option<String> {
    pattern.find(line).map(|m| m.as_str().to_string())
}

/// Artifact content: one reference per line, each newline-terminated.
pub fn render_artifact(refs: &[String]) -> String {
    refs.iter().map(|r| format!("{}\n", r)).collect()
}

/// Run the listing step and overwrite the artifact.
pub fn write_branch_list<R>(remote: &mut R, config: &PruneConfig) -> Result<ListReport>
where
    R: RemoteBranches + ?Sized,
{
    let pattern = marker_pattern(&config.marker)?;
    let select = |line: &str| extract_marked(&pattern, line);

    let listing = match remote.list_refs(&select) {
        Ok(listing) => listing,
        Err(err) if !config.strict => {
            log_status!("list", "{}", err.message);
            let command = err.details["command"].as_str().unwrap_or("git branch -r");
            let stderr = err.details["stderr"].as_str().unwrap_or_default();
            Listing {
                outcome: CommandOutcome::failed(command, COMMAND_NOT_FOUND_EXIT_CODE, stderr),
                refs: Vec::new(),
            }
        }
        Err(err) => return Err(err),
    };

    let outcome = listing.outcome;
    log_status!("list", "{} exited with {}", outcome.command, outcome.exit_code);

    if !outcome.success && config.strict {
        return Err(Error::git_command_failed(GitCommandFailedDetails {
            command: outcome.command,
            exit_code: Some(outcome.exit_code),
            stdout: outcome.stdout,
            stderr: outcome.stderr,
        }));
    }

    let artifact = config.artifact_path();
    io::write_file(
        &artifact,
        &render_artifact(&listing.refs),
        &format!("write {}", artifact.display()),
    )?;
    log_status!(
        "list",
        "Wrote {} marked branch(es) to {}",
        listing.refs.len(),
        artifact.display()
    );

    Ok(ListReport {
        artifact: artifact.display().to_string(),
        command: outcome.command,
        exit_code: outcome.exit_code,
        success: outcome.success,
        stderr: outcome.stderr.trim().to_string(),
        refs: listing.refs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MemoryRemote;
    use std::fs;

    fn config_in(dir: &tempfile::TempDir) -> PruneConfig {
        PruneConfig {
            artifact: dir.path().join("branch_list").display().to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn pattern_keeps_text_from_first_separator() {
        let pattern = marker_pattern("auto-patch").unwrap();

        assert_eq!(
            extract_marked(&pattern, "  origin/auto-patch-7"),
            Some("/auto-patch-7".to_string())
        );
        assert_eq!(
            extract_marked(&pattern, "  origin/team/auto-patch-x"),
            Some("/team/auto-patch-x".to_string())
        );
        assert_eq!(extract_marked(&pattern, "  origin/main"), None);
    }

    #[test]
    fn pattern_is_case_sensitive_substring() {
        let pattern = marker_pattern("auto-patch").unwrap();

        assert!(extract_marked(&pattern, "  origin/fix-auto-patch-later").is_some());
        assert!(extract_marked(&pattern, "  origin/Auto-Patch-1").is_none());
        // no separator, nothing to extract from
        assert!(extract_marked(&pattern, "auto-patch").is_none());
    }

    #[test]
    fn marker_is_matched_literally() {
        let pattern = marker_pattern("fix.1").unwrap();

        assert!(extract_marked(&pattern, "  origin/fix.1").is_some());
        assert!(extract_marked(&pattern, "  origin/fixx1").is_none());
    }

    #[test]
    fn artifact_holds_only_marked_lines() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let mut remote = MemoryRemote::new([
            "origin/HEAD -> origin/main",
            "origin/main",
            "origin/auto-patch-1",
            "origin/feature/login",
            "origin/auto-patch-2",
        ]);

        let report = write_branch_list(&mut remote, &config).unwrap();

        assert_eq!(report.exit_code, 0);
        assert_eq!(report.refs, vec!["/auto-patch-1", "/auto-patch-2"]);
        let content = fs::read_to_string(config.artifact_path()).unwrap();
        assert_eq!(content, "/auto-patch-1\n/auto-patch-2\n");
        assert!(content.lines().all(|line| line.contains("auto-patch")));
    }

    #[test]
    fn second_run_overwrites_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let mut first = MemoryRemote::new(["origin/auto-patch-1", "origin/auto-patch-2"]);
        write_branch_list(&mut first, &config).unwrap();

        let mut second = MemoryRemote::new(["origin/auto-patch-3"]);
        write_branch_list(&mut second, &config).unwrap();

        let content = fs::read_to_string(config.artifact_path()).unwrap();
        assert_eq!(content, "/auto-patch-3\n");
    }

    #[test]
    fn failed_listing_truncates_artifact_when_lenient() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        fs::write(config.artifact_path(), "/auto-patch-stale\n").unwrap();

        let mut remote = MemoryRemote::new(["origin/auto-patch-1"]).failing_listing(128);
        let report = write_branch_list(&mut remote, &config).unwrap();

        assert!(!report.success);
        assert_eq!(report.exit_code, 128);
        assert!(report.refs.is_empty());
        assert_eq!(fs::read_to_string(config.artifact_path()).unwrap(), "");
    }

    #[test]
    fn unreachable_git_reports_command_not_found_when_lenient() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let mut remote = MemoryRemote::new(["origin/auto-patch-1"]).unreachable();
        let report = write_branch_list(&mut remote, &config).unwrap();

        assert_eq!(report.exit_code, COMMAND_NOT_FOUND_EXIT_CODE);
        assert_eq!(report.command, "git branch -r");
        assert!(config.artifact_path().exists());
    }

    #[test]
    fn failed_listing_is_an_error_when_strict() {
        let dir = tempfile::tempdir().unwrap();
        let config = PruneConfig {
            strict: true,
            ..config_in(&dir)
        };

        let mut remote = MemoryRemote::new(["origin/auto-patch-1"]).failing_listing(128);
        let err = write_branch_list(&mut remote, &config).unwrap_err();

        assert_eq!(err.code.as_str(), "git.command_failed");
        assert_eq!(err.details["exitCode"], 128);
        assert!(!config.artifact_path().exists());
    }
}
