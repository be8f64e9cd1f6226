use crate::error::{Error, GitCommandFailedDetails, Result};
use crate::utils::command::{self, CommandOutcome};

use super::{Listing, RemoteBranches};

/// In-memory remote for dry experiments and tests.
///
/// Branches are stored as remote-tracking references (`origin/main`) and listed
/// the way `git branch -r` prints them.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    branches: Vec<String>,
    deletions: Vec<String>,
    listing_exit_code: Option<i32>,
    unreachable: bool,
}

impl MemoryRemote {
    pub fn new<I, S>(branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            branches: branches.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Make listing exit with `code` and print nothing.
    pub fn failing_listing(mut self, code: i32) -> Self {
        self.listing_exit_code = Some(code);
        self
    }

    /// Behave as if git could not be executed at all.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Remote-tracking references still present.
    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    /// Every branch name a deletion was attempted for, in order.
    pub fn deletions(&self) -> &[String] {
        &self.deletions
    }

    fn not_executable(args: &[&str]) -> Error {
        Error::git_command_failed(GitCommandFailedDetails {
            command: command::display_command("git", args),
            exit_code: None,
            stdout: String::new(),
            stderr: "No such file or directory (os error 2)".to_string(),
        })
    }
}

impl RemoteBranches for MemoryRemote {
    fn list_refs(&mut self, select: &dyn Fn(&str) -> Option<String>) -> Result<Listing> {
        let args = ["branch", "-r"];
        if self.unreachable {
            return Err(Self::not_executable(&args));
        }
        let command = command::display_command("git", &args);

        if let Some(code) = self.listing_exit_code {
            return Ok(Listing {
                outcome: CommandOutcome::failed(
                    command,
                    code,
                    "fatal: not a git repository (or any of the parent directories): .git",
                ),
                refs: Vec::new(),
            });
        }

        let stdout: String = self
            .branches
            .iter()
            .map(|branch| format!("  {}\n", branch))
            .collect();
        let refs = stdout.lines().filter_map(select).collect();

        Ok(Listing {
            outcome: CommandOutcome {
                command,
                success: true,
                exit_code: 0,
                stdout,
                stderr: String::new(),
            },
            refs,
        })
    }

    fn delete_ref(&mut self, remote: &str, branch: &str) -> Result<CommandOutcome> {
        let args = ["push", remote, "-d", branch];
        if self.unreachable {
            return Err(Self::not_executable(&args));
        }
        self.deletions.push(branch.to_string());
        let command = command::display_command("git", &args);

        let tracking = format!("{}/{}", remote, branch);
        match self.branches.iter().position(|b| *b == tracking) {
            Some(index) => {
                self.branches.remove(index);
                Ok(CommandOutcome {
                    command,
                    success: true,
                    exit_code: 0,
                    stdout: String::new(),
                    stderr: format!(" - [deleted]         {}\n", branch),
                })
            }
            None => Ok(CommandOutcome::failed(
                command,
                1,
                format!(
                    "error: unable to delete '{}': remote ref does not exist\n",
                    branch
                ),
            )),
        }
    }
}
