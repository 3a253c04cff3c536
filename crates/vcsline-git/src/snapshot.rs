// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use serde::Serialize;
use tracing::{debug, info};

use crate::action::{detect_action, ActionState};
use crate::client::GitClient;
use crate::context::SegmentContext;
use crate::dirty::{inspect_dirty, DirtyFlags};
use crate::error::GitError;
use crate::label::resolve_label;
use crate::repository::RepositoryHandle;

/// Knobs for a status computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InspectOptions {
	/// Refresh cached stat data in the index before diffing.
	pub refresh_index: bool,
}

impl Default for InspectOptions {
	fn default() -> Self {
		Self {
			refresh_index: true,
		}
	}
}

/// Display priority of the branch segment: an operation in progress beats
/// a detached HEAD, which beats a dirty tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BranchState {
	Action,
	Detached,
	Dirty,
	Clean,
}

/// State of a working copy at one point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
	label: String,
	action: ActionState,
	detached: bool,
	staged: bool,
	unstaged: bool,
	untracked: bool,
	stash_count: usize,
}

impl StatusSnapshot {
	pub fn new(label: String, action: ActionState, detached: bool, dirty: DirtyFlags) -> Self {
		Self {
			label,
			action,
			detached,
			staged: dirty.staged,
			unstaged: dirty.unstaged,
			untracked: dirty.untracked,
			stash_count: dirty.stash_count,
		}
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn action(&self) -> ActionState {
		self.action
	}

	pub fn detached(&self) -> bool {
		self.detached
	}

	pub fn staged(&self) -> bool {
		self.staged
	}

	pub fn unstaged(&self) -> bool {
		self.unstaged
	}

	pub fn untracked(&self) -> bool {
		self.untracked
	}

	pub fn stash_count(&self) -> usize {
		self.stash_count
	}

	pub fn dirty_flags(&self) -> DirtyFlags {
		DirtyFlags {
			staged: self.staged,
			unstaged: self.unstaged,
			untracked: self.untracked,
			stash_count: self.stash_count,
		}
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty_flags().is_dirty()
	}

	pub fn branch_state(&self) -> BranchState {
		if !self.action.is_none() {
			BranchState::Action
		} else if self.detached {
			BranchState::Detached
		} else if self.is_dirty() {
			BranchState::Dirty
		} else {
			BranchState::Clean
		}
	}
}

/// Compute the status snapshot for the directory in `ctx`.
///
/// Returns `Ok(None)` when there is no directory or it is not inside a
/// repository; the host renders nothing in that case. Every call opens
/// the repository afresh, so results are never stale.
pub async fn compute_status<C>(
	client: &C,
	ctx: &SegmentContext,
	options: &InspectOptions,
) -> Result<Option<StatusSnapshot>, GitError>
where
	C: GitClient + ?Sized,
{
	let Some(repo) = RepositoryHandle::discover(client, ctx.cwd()).await? else {
		debug!(cwd = ?ctx.cwd(), "no repository, nothing to report");
		return Ok(None);
	};

	let action = detect_action(repo.git_dir());
	let (label, dirty) = tokio::try_join!(
		resolve_label(client, &repo),
		inspect_dirty(client, &repo, options.refresh_index),
	)?;

	let snapshot = StatusSnapshot::new(label, action, repo.is_detached(), dirty);

	info!(
			git_dir = %repo.git_dir().display(),
			label = %snapshot.label(),
			action = ?snapshot.action(),
			detached = snapshot.detached(),
			branch_state = ?snapshot.branch_state(),
			stash_count = snapshot.stash_count(),
			"computed git status"
	);

	Ok(Some(snapshot))
}
