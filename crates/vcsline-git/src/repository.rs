// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::client::GitClient;
use crate::error::GitError;

/// A discovered repository, valid for a single status computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryHandle {
	git_dir: PathBuf,
	work_tree: Option<PathBuf>,
	branch: Option<String>,
	head_commit: Option<String>,
}

impl RepositoryHandle {
	/// Resolve `path` to the repository that encloses it.
	///
	/// Returns `Ok(None)` when `path` is missing, empty, does not exist, or
	/// is not inside a work tree or control directory. Nothing on disk is
	/// modified.
	pub async fn discover<C>(client: &C, path: Option<&Path>) -> Result<Option<Self>, GitError>
	where
		C: GitClient + ?Sized,
	{
		let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) else {
			debug!("no working directory supplied");
			return Ok(None);
		};

		if !path.is_dir() {
			debug!(path = %path.display(), "working directory does not exist");
			return Ok(None);
		}

		let Some(location) = client.discover(path).await? else {
			return Ok(None);
		};

		let run_dir = location
			.work_tree
			.clone()
			.unwrap_or_else(|| location.git_dir.clone());
		let branch = client.head_branch(&run_dir).await?;
		let head_commit = client.head_commit(&run_dir).await?;

		Ok(Some(Self {
			git_dir: location.git_dir,
			work_tree: location.work_tree,
			branch,
			head_commit,
		}))
	}

	/// Build a handle from already-known parts.
	pub fn from_parts(
		git_dir: impl Into<PathBuf>,
		work_tree: Option<PathBuf>,
		branch: Option<String>,
		head_commit: Option<String>,
	) -> Self {
		Self {
			git_dir: git_dir.into(),
			work_tree,
			branch,
			head_commit,
		}
	}

	/// The control directory.
	pub fn git_dir(&self) -> &Path {
		&self.git_dir
	}

	/// Top of the working tree; `None` for bare repositories.
	pub fn work_tree(&self) -> Option<&Path> {
		self.work_tree.as_deref()
	}

	/// Directory git commands for this repository run in.
	pub fn command_dir(&self) -> &Path {
		self.work_tree.as_deref().unwrap_or(&self.git_dir)
	}

	/// Short branch name HEAD points to; `None` when detached.
	pub fn branch(&self) -> Option<&str> {
		self.branch.as_deref()
	}

	pub fn is_detached(&self) -> bool {
		self.branch.is_none()
	}

	/// True while the current branch has no commits yet.
	pub fn is_unborn(&self) -> bool {
		self.head_commit.is_none()
	}

	pub fn head_commit(&self) -> Option<&str> {
		self.head_commit.as_deref()
	}
}
