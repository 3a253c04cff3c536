// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace, warn};

use crate::client::{DiffOutcome, GitClient, RepoLocation};
use crate::error::GitError;

/// Git client implementation using the git CLI.
#[derive(Clone, Debug)]
pub struct CommandGitClient {
	git_binary: PathBuf,
}

impl CommandGitClient {
	pub fn new() -> Self {
		Self::with_binary("git")
	}

	/// Use a specific git executable instead of the one on `PATH`.
	pub fn with_binary(git_binary: impl Into<PathBuf>) -> Self {
		Self {
			git_binary: git_binary.into(),
		}
	}

	pub fn git_binary(&self) -> &Path {
		&self.git_binary
	}

	/// Runs a git command and returns its exit code and captured output,
	/// whatever the exit status.
	async fn run_git(&self, path: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
		let mut cmd = Command::new(&self.git_binary);
		cmd.arg("-C").arg(path).args(args).kill_on_drop(true);

		trace!(
				cmd = %format!("{} -C {} {}", self.git_binary.display(), path.display(), args.join(" ")),
				"running git command"
		);

		let output = cmd.output().await.map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				warn!(git = %self.git_binary.display(), "git not found");
				GitError::GitNotInstalled
			} else {
				GitError::Io(e)
			}
		})?;

		Ok(GitOutput {
			args: args.iter().map(|s| s.to_string()).collect(),
			code: output.status.code(),
			stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
			stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
		})
	}

	/// Runs a git command and returns the stdout on success.
	async fn run_git_ok(&self, path: &Path, args: &[&str]) -> Result<String, GitError> {
		let output = self.run_git(path, args).await?;
		if output.code == Some(0) {
			Ok(output.stdout)
		} else {
			Err(output.into_error())
		}
	}

	async fn run_quiet_diff(&self, path: &Path, args: &[&str]) -> Result<DiffOutcome, GitError> {
		let output = self.run_git(path, args).await?;
		match DiffOutcome::from_exit_code(output.code) {
			Some(outcome) => {
				trace!(args = ?args, outcome = ?outcome, "quiet diff finished");
				Ok(outcome)
			}
			None => Err(output.into_error()),
		}
	}
}

impl Default for CommandGitClient {
	fn default() -> Self {
		Self::new()
	}
}

struct GitOutput {
	args: Vec<String>,
	code: Option<i32>,
	stdout: String,
	stderr: String,
}

impl GitOutput {
	fn into_error(self) -> GitError {
		GitError::CommandFailed {
			cmd: "git",
			args: self.args,
			code: self.code,
			stderr: self.stderr,
		}
	}
}

#[async_trait]
impl GitClient for CommandGitClient {
	async fn discover(&self, path: &Path) -> Result<Option<RepoLocation>, GitError> {
		let output = self
			.run_git(
				path,
				&[
					"rev-parse",
					"--absolute-git-dir",
					"--is-bare-repository",
					"--is-inside-work-tree",
				],
			)
			.await?;

		if output.code != Some(0) {
			if is_not_a_repository(&output.stderr) {
				debug!(path = %path.display(), stderr = %output.stderr, "not a git repository");
				return Ok(None);
			}
			return Err(output.into_error());
		}

		let Some(probe) = parse_discovery(&output.stdout) else {
			return Err(GitError::NotAGitRepo(format!(
				"unexpected rev-parse output for {}: {:?}",
				path.display(),
				output.stdout
			)));
		};

		let work_tree = if probe.inside_work_tree && !probe.bare {
			let toplevel = self.run_git_ok(path, &["rev-parse", "--show-toplevel"]).await?;
			Some(PathBuf::from(toplevel))
		} else {
			None
		};

		debug!(
				path = %path.display(),
				git_dir = %probe.git_dir.display(),
				work_tree = ?work_tree,
				"discovered repository"
		);

		Ok(Some(RepoLocation {
			git_dir: probe.git_dir,
			work_tree,
		}))
	}

	async fn head_branch(&self, path: &Path) -> Result<Option<String>, GitError> {
		let output = self
			.run_git(path, &["symbolic-ref", "--quiet", "--short", "HEAD"])
			.await?;

		match output.code {
			Some(0) if !output.stdout.is_empty() => Ok(Some(output.stdout)),
			Some(1) => {
				trace!(path = %path.display(), "detached HEAD state");
				Ok(None)
			}
			_ => Err(output.into_error()),
		}
	}

	async fn head_commit(&self, path: &Path) -> Result<Option<String>, GitError> {
		let output = self
			.run_git(path, &["rev-parse", "--verify", "--quiet", "HEAD^{commit}"])
			.await?;

		match output.code {
			Some(0) => Ok(Some(output.stdout)),
			Some(1) => {
				trace!(path = %path.display(), "HEAD is unborn");
				Ok(None)
			}
			_ => Err(output.into_error()),
		}
	}

	async fn describe_exact(&self, path: &Path) -> Result<Option<String>, GitError> {
		let output = self
			.run_git(path, &["describe", "--all", "--exact-match", "HEAD"])
			.await?;

		if output.code == Some(0) && !output.stdout.is_empty() {
			Ok(Some(output.stdout))
		} else {
			trace!(path = %path.display(), stderr = %output.stderr, "no ref matches HEAD exactly");
			Ok(None)
		}
	}

	async fn short_head(&self, path: &Path) -> Result<String, GitError> {
		self.run_git_ok(path, &["rev-parse", "--short", "HEAD"]).await
	}

	async fn refresh_index(&self, path: &Path) -> Result<(), GitError> {
		self
			.run_git_ok(path, &["update-index", "-q", "--ignore-submodules", "--refresh"])
			.await?;
		Ok(())
	}

	async fn diff_index(&self, path: &Path) -> Result<DiffOutcome, GitError> {
		self
			.run_quiet_diff(
				path,
				&[
					"diff-index",
					"--cached",
					"--quiet",
					"--ignore-submodules",
					"HEAD",
					"--",
				],
			)
			.await
	}

	async fn index_has_entries(&self, path: &Path) -> Result<bool, GitError> {
		let stdout = self.run_git_ok(path, &["ls-files", "--cached"]).await?;
		Ok(stdout.lines().any(|line| !line.trim().is_empty()))
	}

	async fn diff_files(&self, path: &Path) -> Result<DiffOutcome, GitError> {
		self
			.run_quiet_diff(path, &["diff-files", "--quiet", "--ignore-submodules"])
			.await
	}

	async fn has_untracked(&self, path: &Path) -> Result<bool, GitError> {
		let stdout = self
			.run_git_ok(
				path,
				&[
					"ls-files",
					"--others",
					"--exclude-standard",
					"--directory",
					"--no-empty-directory",
				],
			)
			.await?;
		Ok(stdout.lines().any(|line| !line.trim().is_empty()))
	}

	async fn stash_list(&self, path: &Path) -> Result<String, GitError> {
		self.run_git_ok(path, &["stash", "list"]).await
	}
}

#[derive(Debug, PartialEq, Eq)]
struct DiscoveryProbe {
	git_dir: PathBuf,
	bare: bool,
	inside_work_tree: bool,
}

/// Parses the three lines printed by
/// `rev-parse --absolute-git-dir --is-bare-repository --is-inside-work-tree`.
fn parse_discovery(stdout: &str) -> Option<DiscoveryProbe> {
	let mut lines = stdout.lines().map(str::trim);
	let git_dir = lines.next().filter(|l| !l.is_empty())?;
	let bare = lines.next()? == "true";
	let inside_work_tree = lines.next()? == "true";

	Some(DiscoveryProbe {
		git_dir: PathBuf::from(git_dir),
		bare,
		inside_work_tree,
	})
}

fn is_not_a_repository(stderr: &str) -> bool {
	stderr.contains("not a git repository")
		|| stderr.contains("cannot change to")
		|| stderr.contains("dubious ownership")
}
