// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::GitError;

/// Where a repository lives on disk, as reported by git.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoLocation {
	/// Absolute path of the control directory (`.git`, or the bare repo).
	pub git_dir: PathBuf,
	/// Top of the working tree; `None` for bare repositories or when the
	/// path points inside the control directory.
	pub work_tree: Option<PathBuf>,
}

/// Result of a quiet diff query.
///
/// Git reports "there are differences" through exit status 1. That is a
/// value here, not an error; only other exit codes become [`GitError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffOutcome {
	Clean,
	Differs,
}

impl DiffOutcome {
	/// Maps the exit code of `diff-index --quiet` / `diff-files --quiet`.
	pub fn from_exit_code(code: Option<i32>) -> Option<Self> {
		match code {
			Some(0) => Some(DiffOutcome::Clean),
			Some(1) => Some(DiffOutcome::Differs),
			_ => None,
		}
	}

	pub fn differs(self) -> bool {
		self == DiffOutcome::Differs
	}
}

/// The git queries the status inspector needs.
///
/// Every method runs against `path`; callers pass the working tree root
/// (or the control directory for bare repositories) once discovery has
/// succeeded.
#[async_trait]
pub trait GitClient: Send + Sync {
	/// Locate the repository enclosing `path`. `Ok(None)` when there is none.
	async fn discover(&self, path: &Path) -> Result<Option<RepoLocation>, GitError>;

	/// Short name of the branch HEAD points to, or `None` when detached.
	async fn head_branch(&self, path: &Path) -> Result<Option<String>, GitError>;

	/// Full object name of HEAD, or `None` on an unborn branch.
	async fn head_commit(&self, path: &Path) -> Result<Option<String>, GitError>;

	/// `describe --all --exact-match HEAD`; `None` when no ref matches exactly.
	async fn describe_exact(&self, path: &Path) -> Result<Option<String>, GitError>;

	/// Abbreviated object name of HEAD.
	async fn short_head(&self, path: &Path) -> Result<String, GitError>;

	/// Reconcile cached stat information in the index.
	async fn refresh_index(&self, path: &Path) -> Result<(), GitError>;

	/// Compare the index against HEAD. Fails on an unborn branch.
	async fn diff_index(&self, path: &Path) -> Result<DiffOutcome, GitError>;

	/// Whether the index holds any entry at all. Stands in for the staged
	/// check while HEAD is unborn, independent of the object hash format.
	async fn index_has_entries(&self, path: &Path) -> Result<bool, GitError>;

	/// Compare the working tree against the index.
	async fn diff_files(&self, path: &Path) -> Result<DiffOutcome, GitError>;

	/// Whether any untracked, non-ignored file exists.
	async fn has_untracked(&self, path: &Path) -> Result<bool, GitError>;

	/// Raw `stash list` output.
	async fn stash_list(&self, path: &Path) -> Result<String, GitError>;
}
