// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! "Where am I" label resolution.
//!
//! Layers are tried top to bottom and the first one that yields a value
//! wins. A marker file that exists but cannot be read (or is empty) makes
//! its layer yield nothing, so resolution falls through to the next one.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::action::{am_rebase_dir, MERGE_HEAD, REBASE_MERGE_DIRS};
use crate::client::GitClient;
use crate::error::GitError;
use crate::repository::RepositoryHandle;

const HEAD_NAME: &str = "head-name";

/// Which layer produced a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelSource {
	/// Branch name while an am/apply-style rebase is in progress.
	AmRebaseBranch,
	/// `head-name` from the am/apply-style rebase directory.
	AmRebaseHeadName,
	MergeHead,
	/// `head-name` from `rebase-merge/` or `.dotest-merge/`.
	RebaseMergeHeadName,
	Branch,
	/// Exact ref match for a detached HEAD.
	DescribedRef,
	/// Abbreviated hash for a detached HEAD.
	ShortHash,
}

/// Resolve the ref label for `repo`.
pub async fn resolve_label<C>(client: &C, repo: &RepositoryHandle) -> Result<String, GitError>
where
	C: GitClient + ?Sized,
{
	let (label, source) = resolve_label_with_source(client, repo).await?;
	debug!(label = %label, source = ?source, "resolved ref label");
	Ok(label)
}

/// Like [`resolve_label`], also reporting which layer answered.
pub async fn resolve_label_with_source<C>(
	client: &C,
	repo: &RepositoryHandle,
) -> Result<(String, LabelSource), GitError>
where
	C: GitClient + ?Sized,
{
	let git_dir = repo.git_dir();

	if let Some(dir) = am_rebase_dir(git_dir) {
		if let Some(branch) = repo.branch() {
			return Ok((branch.to_string(), LabelSource::AmRebaseBranch));
		}
		if let Some(name) = read_marker(&dir.join(HEAD_NAME)) {
			return Ok((name, LabelSource::AmRebaseHeadName));
		}
	}

	if let Some(merge_head) = read_marker(&git_dir.join(MERGE_HEAD)) {
		return Ok((merge_head, LabelSource::MergeHead));
	}

	for dir in REBASE_MERGE_DIRS {
		let dir = git_dir.join(dir);
		if dir.is_dir() {
			if let Some(name) = read_marker(&dir.join(HEAD_NAME)) {
				return Ok((name, LabelSource::RebaseMergeHeadName));
			}
		}
	}

	if let Some(branch) = repo.branch() {
		return Ok((branch.to_string(), LabelSource::Branch));
	}

	let run_dir = repo.command_dir();
	if let Some(described) = client.describe_exact(run_dir).await? {
		return Ok((described_ref_label(&described), LabelSource::DescribedRef));
	}

	let short = client.short_head(run_dir).await?;
	Ok((short, LabelSource::ShortHash))
}

/// Read a marker file as one trimmed string.
///
/// `None` when the file is absent, unreadable, or blank.
fn read_marker(path: &Path) -> Option<String> {
	if !path.is_file() {
		return None;
	}

	match fs::read_to_string(path) {
		Ok(content) => {
			let trimmed = content.trim();
			if trimmed.is_empty() {
				debug!(path = %path.display(), "marker file is empty, skipping layer");
				None
			} else {
				trace!(path = %path.display(), "read marker file");
				Some(trimmed.to_string())
			}
		}
		Err(e) => {
			debug!(path = %path.display(), error = %e, "unreadable marker file, skipping layer");
			None
		}
	}
}

/// `describe --all` prints refs without the `refs/` prefix (`tags/v1.0`,
/// `heads/main`); put it back so the label names a full ref.
fn described_ref_label(described: &str) -> String {
	let described = described.trim();
	if described.starts_with("refs/") {
		described.to_string()
	} else {
		format!("refs/{described}")
	}
}
