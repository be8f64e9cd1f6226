use std::path::{Path, PathBuf};

use crate::error::{Error, GitCommandFailedDetails, Result};
use crate::utils::command::{self, CommandOutcome};

use super::{Listing, RemoteBranches};

/// [`RemoteBranches`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutcome> {
        command::capture_in(&self.repo_dir, "git", args).map_err(|e| {
            Error::git_command_failed(GitCommandFailedDetails {
                command: command::display_command("git", args),
                exit_code: None,
                stdout: String::new(),
                stderr: e.details["error"].as_str().unwrap_or(&e.message).to_string(),
            })
        })
    }
}

impl RemoteBranches for GitCli {
    fn list_refs(&mut self, select: &dyn Fn(&str) -> Option<String>) -> Result<Listing> {
        let outcome = self.git(&["branch", "-r"])?;
        let refs = outcome
            .stdout
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter_map(select)
            .collect();

        Ok(Listing { outcome, refs })
    }

    fn delete_ref(&mut self, remote: &str, branch: &str) -> Result<CommandOutcome> {
        self.git(&["push", remote, "-d", branch])
    }
}

/// Check whether `path` is inside a git working tree.
pub fn is_git_repo(path: &Path) -> bool {
    command::succeeded_in(path, "git", &["rev-parse", "--git-dir"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_outside_a_repository_fails_without_refs() {
        let dir = tempfile::tempdir().unwrap();
        let mut git = GitCli::new(dir.path());

        match git.list_refs(&|line| Some(line.to_string())) {
            // git installed: non-zero exit, nothing selected
            Ok(listing) => {
                assert!(!listing.outcome.success);
                assert!(listing.refs.is_empty());
                assert_eq!(listing.outcome.command, "git branch -r");
            }
            // git missing
            Err(err) => assert_eq!(err.code.as_str(), "git.command_failed"),
        }
    }

    #[test]
    fn empty_directory_is_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_git_repo(dir.path()));
    }
}
