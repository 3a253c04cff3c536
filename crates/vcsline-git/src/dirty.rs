// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use serde::Serialize;
use tracing::debug;

use crate::client::GitClient;
use crate::error::GitError;
use crate::repository::RepositoryHandle;

/// Working tree dirtiness. Each field is computed independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DirtyFlags {
	/// Index differs from HEAD.
	pub staged: bool,
	/// Working tree differs from the index.
	pub unstaged: bool,
	/// At least one untracked, non-ignored file exists.
	pub untracked: bool,
	/// Number of stash entries.
	pub stash_count: usize,
}

impl DirtyFlags {
	/// True when any of staged, unstaged or untracked is set. Stashes do
	/// not make a tree dirty.
	pub fn is_dirty(&self) -> bool {
		self.staged || self.unstaged || self.untracked
	}
}

/// Run the four dirtiness checks for `repo`.
///
/// The index is refreshed first when `refresh_index` is set; a failed
/// refresh (read-only checkout, index.lock held by another process) is
/// logged and ignored. The checks themselves are read-only and run
/// concurrently. Repositories without a work tree report all-clean.
pub async fn inspect_dirty<C>(
	client: &C,
	repo: &RepositoryHandle,
	refresh_index: bool,
) -> Result<DirtyFlags, GitError>
where
	C: GitClient + ?Sized,
{
	let Some(work_tree) = repo.work_tree() else {
		debug!(git_dir = %repo.git_dir().display(), "no work tree, skipping dirty checks");
		return Ok(DirtyFlags::default());
	};

	if refresh_index {
		if let Err(e) = client.refresh_index(work_tree).await {
			debug!(path = %work_tree.display(), error = %e, "index refresh failed, continuing");
		}
	}

	// With no commit yet, anything in the index is staged.
	let staged = async {
		if repo.is_unborn() {
			client.index_has_entries(work_tree).await
		} else {
			Ok(client.diff_index(work_tree).await?.differs())
		}
	};

	let (staged, unstaged, untracked, stashes) = tokio::try_join!(
		staged,
		client.diff_files(work_tree),
		client.has_untracked(work_tree),
		client.stash_list(work_tree),
	)?;

	let flags = DirtyFlags {
		staged,
		unstaged: unstaged.differs(),
		untracked,
		stash_count: count_stashes(&stashes),
	};

	debug!(
			path = %work_tree.display(),
			staged = flags.staged,
			unstaged = flags.unstaged,
			untracked = flags.untracked,
			stash_count = flags.stash_count,
			"computed dirty flags"
	);

	Ok(flags)
}

/// Number of non-empty lines in `stash list` output.
pub fn count_stashes(output: &str) -> usize {
	output.lines().filter(|line| !line.trim().is_empty()).count()
}
