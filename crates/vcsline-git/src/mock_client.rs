// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::{DiffOutcome, GitClient, RepoLocation};
use crate::error::GitError;

/// Recorded call to the mock git client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCall {
	Discover,
	HeadBranch,
	HeadCommit,
	DescribeExact,
	ShortHead,
	RefreshIndex,
	DiffIndex,
	IndexHasEntries,
	DiffFiles,
	HasUntracked,
	StashList,
}

/// Mock git client for testing.
///
/// Defaults describe a clean repository at `/mock` on branch `main`.
#[derive(Clone)]
pub struct MockGitClient {
	/// Location returned by discover; `None` means "not a repository".
	pub location: Option<RepoLocation>,
	/// Branch returned by head_branch; `None` means detached.
	pub branch: Option<String>,
	/// Commit returned by head_commit; `None` means unborn.
	pub head_commit: Option<String>,
	/// Result of describe_exact.
	pub describe: Option<String>,
	/// Result of short_head.
	pub short_head: String,
	/// If set, refresh_index fails with this stderr.
	pub refresh_error: Option<String>,
	pub staged: DiffOutcome,
	/// Result of index_has_entries.
	pub index_entries: bool,
	pub unstaged: DiffOutcome,
	/// If set, diff_index and diff_files fail with this stderr.
	pub diff_error: Option<String>,
	pub untracked: bool,
	pub stash_output: String,
	/// Track calls for verification.
	pub calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGitClient {
	pub fn new() -> Self {
		Self {
			location: Some(RepoLocation {
				git_dir: PathBuf::from("/mock/.git"),
				work_tree: Some(PathBuf::from("/mock")),
			}),
			branch: Some("main".to_string()),
			head_commit: Some("abc123def456789012345678901234567890abcd".to_string()),
			describe: None,
			short_head: "abc123d".to_string(),
			refresh_error: None,
			staged: DiffOutcome::Clean,
			index_entries: false,
			unstaged: DiffOutcome::Clean,
			diff_error: None,
			untracked: false,
			stash_output: String::new(),
			calls: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn not_a_repo(mut self) -> Self {
		self.location = None;
		self
	}

	/// Point discovery at a real control directory, e.g. a temp dir holding
	/// marker files.
	pub fn with_git_dir(mut self, git_dir: impl Into<PathBuf>) -> Self {
		let git_dir = git_dir.into();
		let work_tree = git_dir.parent().map(Path::to_path_buf);
		self.location = Some(RepoLocation { git_dir, work_tree });
		self
	}

	pub fn bare(mut self) -> Self {
		if let Some(location) = self.location.as_mut() {
			location.work_tree = None;
		}
		self
	}

	pub fn detached(mut self) -> Self {
		self.branch = None;
		self
	}

	pub fn unborn(mut self) -> Self {
		self.head_commit = None;
		self
	}

	pub fn with_describe(mut self, describe: impl Into<String>) -> Self {
		self.describe = Some(describe.into());
		self
	}

	pub fn with_short_head(mut self, short: impl Into<String>) -> Self {
		self.short_head = short.into();
		self
	}

	pub fn with_refresh_error(mut self, error: impl Into<String>) -> Self {
		self.refresh_error = Some(error.into());
		self
	}

	/// Something is staged: diff-index differs and the index is non-empty.
	pub fn with_staged(mut self) -> Self {
		self.staged = DiffOutcome::Differs;
		self.index_entries = true;
		self
	}

	pub fn with_unstaged(mut self) -> Self {
		self.unstaged = DiffOutcome::Differs;
		self
	}

	pub fn with_diff_error(mut self, error: impl Into<String>) -> Self {
		self.diff_error = Some(error.into());
		self
	}

	pub fn with_untracked(mut self) -> Self {
		self.untracked = true;
		self
	}

	pub fn with_stash_output(mut self, output: impl Into<String>) -> Self {
		self.stash_output = output.into();
		self
	}

	/// Returns the recorded calls.
	pub fn get_calls(&self) -> Vec<MockCall> {
		self.calls.lock().unwrap().clone()
	}

	/// Clears recorded calls.
	pub fn clear_calls(&self) {
		self.calls.lock().unwrap().clear();
	}

	fn record(&self, call: MockCall) {
		self.calls.lock().unwrap().push(call);
	}

	fn failure(args: &[&str], stderr: &str) -> GitError {
		GitError::CommandFailed {
			cmd: "git",
			args: args.iter().map(|s| s.to_string()).collect(),
			code: Some(128),
			stderr: stderr.to_string(),
		}
	}
}

impl Default for MockGitClient {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl GitClient for MockGitClient {
	async fn discover(&self, _path: &Path) -> Result<Option<RepoLocation>, GitError> {
		self.record(MockCall::Discover);
		Ok(self.location.clone())
	}

	async fn head_branch(&self, _path: &Path) -> Result<Option<String>, GitError> {
		self.record(MockCall::HeadBranch);
		Ok(self.branch.clone())
	}

	async fn head_commit(&self, _path: &Path) -> Result<Option<String>, GitError> {
		self.record(MockCall::HeadCommit);
		Ok(self.head_commit.clone())
	}

	async fn describe_exact(&self, _path: &Path) -> Result<Option<String>, GitError> {
		self.record(MockCall::DescribeExact);
		Ok(self.describe.clone())
	}

	async fn short_head(&self, _path: &Path) -> Result<String, GitError> {
		self.record(MockCall::ShortHead);
		Ok(self.short_head.clone())
	}

	async fn refresh_index(&self, _path: &Path) -> Result<(), GitError> {
		self.record(MockCall::RefreshIndex);
		match self.refresh_error {
			Some(ref error) => Err(Self::failure(&["update-index", "--refresh"], error)),
			None => Ok(()),
		}
	}

	async fn diff_index(&self, _path: &Path) -> Result<DiffOutcome, GitError> {
		self.record(MockCall::DiffIndex);
		match self.diff_error {
			Some(ref error) => Err(Self::failure(&["diff-index", "HEAD"], error)),
			None if self.head_commit.is_none() => Err(Self::failure(
				&["diff-index", "HEAD"],
				"fatal: bad revision 'HEAD'",
			)),
			None => Ok(self.staged),
		}
	}

	async fn index_has_entries(&self, _path: &Path) -> Result<bool, GitError> {
		self.record(MockCall::IndexHasEntries);
		match self.diff_error {
			Some(ref error) => Err(Self::failure(&["ls-files", "--cached"], error)),
			None => Ok(self.index_entries),
		}
	}

	async fn diff_files(&self, _path: &Path) -> Result<DiffOutcome, GitError> {
		self.record(MockCall::DiffFiles);
		match self.diff_error {
			Some(ref error) => Err(Self::failure(&["diff-files"], error)),
			None => Ok(self.unstaged),
		}
	}

	async fn has_untracked(&self, _path: &Path) -> Result<bool, GitError> {
		self.record(MockCall::HasUntracked);
		Ok(self.untracked)
	}

	async fn stash_list(&self, _path: &Path) -> Result<String, GitError> {
		self.record(MockCall::StashList);
		Ok(self.stash_output.clone())
	}
}
