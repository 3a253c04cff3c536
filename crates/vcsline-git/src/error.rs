// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
	#[error("not a git repository: {0}")]
	NotAGitRepo(String),

	#[error("git command failed: {cmd} {args:?} (exit {code:?}): {stderr}")]
	CommandFailed {
		cmd: &'static str,
		args: Vec<String>,
		code: Option<i32>,
		stderr: String,
	},

	#[error("git is not installed or not in PATH")]
	GitNotInstalled,

	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
}

impl GitError {
	/// Returns true for failures where git ran but exited non-zero.
	pub fn is_command_failure(&self) -> bool {
		matches!(self, GitError::CommandFailed { .. })
	}
}
