// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-progress operation detection from marker files in the control
//! directory.
//!
//! Several markers can coexist after an interrupted operation (a rebase
//! leaves a stale `sequencer/` behind, for instance), so the checks run in
//! a fixed order and the first match wins:
//!
//! 1. `rebase-apply/`, `rebase/`, `../.dotest/` (am / apply-style rebase)
//! 2. `rebase-merge/interactive`, `.dotest-merge/interactive`
//! 3. `rebase-merge/`, `.dotest-merge/`
//! 4. `MERGE_HEAD`
//! 5. `BISECT_LOG`
//! 6. `CHERRY_PICK_HEAD` (with or without `sequencer/`)
//! 7. `sequencer/` on its own

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::trace;

/// Directories left behind by `git am` and apply-style rebases.
pub const AM_REBASE_DIRS: &[&str] = &["rebase-apply", "rebase", "../.dotest"];

/// Marker files for interactive rebases.
pub const INTERACTIVE_MARKERS: &[&str] = &["rebase-merge/interactive", ".dotest-merge/interactive"];

/// Directories left behind by merge-style rebases.
pub const REBASE_MERGE_DIRS: &[&str] = &["rebase-merge", ".dotest-merge"];

pub const MERGE_HEAD: &str = "MERGE_HEAD";
pub const BISECT_LOG: &str = "BISECT_LOG";
pub const CHERRY_PICK_HEAD: &str = "CHERRY_PICK_HEAD";
pub const SEQUENCER_DIR: &str = "sequencer";

/// The operation in progress in a repository, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionState {
	#[default]
	None,
	/// Apply-style rebase (`rebase-apply/rebasing`).
	RebaseApply,
	/// Mailbox apply (`rebase-apply/applying`).
	Am,
	/// `rebase-apply/` without either marker.
	AmOrRebase,
	RebaseInteractive,
	RebaseMerge,
	Merge,
	Bisect,
	CherryPick,
	/// Cherry-pick of a range, tracked by the sequencer.
	CherryPickSequence,
	/// A sequencer directory without `CHERRY_PICK_HEAD`: a revert or a
	/// cherry-pick between steps.
	RevertOrCherryAmbiguous,
}

impl ActionState {
	/// The tag conventionally shown next to the branch in a prompt.
	pub fn short_label(self) -> &'static str {
		match self {
			ActionState::None => "",
			ActionState::RebaseApply => "rebase",
			ActionState::Am => "am",
			ActionState::AmOrRebase => "am/rebase",
			ActionState::RebaseInteractive => "rebase-i",
			ActionState::RebaseMerge => "rebase-m",
			ActionState::Merge => "merge",
			ActionState::Bisect => "bisect",
			ActionState::CherryPick => "cherry",
			ActionState::CherryPickSequence => "cherry-seq",
			ActionState::RevertOrCherryAmbiguous => "cherry-or-revert",
		}
	}

	pub fn is_none(self) -> bool {
		self == ActionState::None
	}
}

impl fmt::Display for ActionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.short_label())
	}
}

/// Classify the in-progress operation for the control directory `git_dir`.
pub fn detect_action(git_dir: &Path) -> ActionState {
	let action = classify(git_dir);
	trace!(git_dir = %git_dir.display(), action = ?action, "classified repository action");
	action
}

fn classify(git_dir: &Path) -> ActionState {
	if let Some(dir) = am_rebase_dir(git_dir) {
		return if dir.join("rebasing").is_file() {
			ActionState::RebaseApply
		} else if dir.join("applying").is_file() {
			ActionState::Am
		} else {
			ActionState::AmOrRebase
		};
	}

	if INTERACTIVE_MARKERS
		.iter()
		.any(|marker| git_dir.join(marker).is_file())
	{
		return ActionState::RebaseInteractive;
	}

	if REBASE_MERGE_DIRS
		.iter()
		.any(|dir| git_dir.join(dir).is_dir())
	{
		return ActionState::RebaseMerge;
	}

	if git_dir.join(MERGE_HEAD).is_file() {
		return ActionState::Merge;
	}

	if git_dir.join(BISECT_LOG).is_file() {
		return ActionState::Bisect;
	}

	let sequencer = git_dir.join(SEQUENCER_DIR).is_dir();
	if git_dir.join(CHERRY_PICK_HEAD).is_file() {
		return if sequencer {
			ActionState::CherryPickSequence
		} else {
			ActionState::CherryPick
		};
	}

	if sequencer {
		return ActionState::RevertOrCherryAmbiguous;
	}

	ActionState::None
}

/// The first am/apply-style rebase directory present under `git_dir`.
pub fn am_rebase_dir(git_dir: &Path) -> Option<PathBuf> {
	AM_REBASE_DIRS
		.iter()
		.map(|dir| git_dir.join(dir))
		.find(|dir| dir.is_dir())
}
