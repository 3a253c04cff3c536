// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};

use serde::Serialize;

/// What the host renderer knows about the prompt being drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentContext {
	/// Directory the prompt is rendered for; `None` when unavailable.
	pub cwd: Option<PathBuf>,
	/// Exit code of the last command run in the shell.
	pub last_exit_code: i32,
}

impl SegmentContext {
	pub fn new(cwd: Option<PathBuf>) -> Self {
		Self {
			cwd,
			last_exit_code: 0,
		}
	}

	pub fn with_last_exit_code(mut self, code: i32) -> Self {
		self.last_exit_code = code;
		self
	}

	/// The working directory, treating an empty path as absent.
	pub fn cwd(&self) -> Option<&Path> {
		self
			.cwd
			.as_deref()
			.filter(|path| !path.as_os_str().is_empty())
	}

	pub fn last_status(&self) -> LastStatus {
		LastStatus::from_exit_code(self.last_exit_code)
	}
}

/// Outcome of the previous shell command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum LastStatus {
	Success,
	Failed { code: i32 },
}

impl LastStatus {
	pub fn from_exit_code(code: i32) -> Self {
		if code == 0 {
			LastStatus::Success
		} else {
			LastStatus::Failed { code }
		}
	}

	pub fn is_success(self) -> bool {
		self == LastStatus::Success
	}
}
