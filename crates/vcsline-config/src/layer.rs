// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer for merging from multiple sources.

use serde::Deserialize;
use std::path::PathBuf;

/// Partial configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigLayer {
	#[serde(default)]
	pub git: Option<GitLayer>,
	#[serde(default)]
	pub status: Option<StatusLayer>,
	#[serde(default)]
	pub logging: Option<LoggingLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GitLayer {
	#[serde(default)]
	pub binary: Option<PathBuf>,
	#[serde(default)]
	pub refresh_index: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusLayer {
	#[serde(default)]
	pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub format: Option<String>,
}

impl ConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: ConfigLayer) {
		merge_option(&mut self.git, other.git, GitLayer::merge);
		merge_option(&mut self.status, other.status, StatusLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingLayer::merge);
	}

	pub(crate) fn git_mut(&mut self) -> &mut GitLayer {
		self.git.get_or_insert_with(GitLayer::default)
	}

	pub(crate) fn status_mut(&mut self) -> &mut StatusLayer {
		self.status.get_or_insert_with(StatusLayer::default)
	}

	pub(crate) fn logging_mut(&mut self) -> &mut LoggingLayer {
		self.logging.get_or_insert_with(LoggingLayer::default)
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

impl GitLayer {
	fn merge(&mut self, other: GitLayer) {
		if other.binary.is_some() {
			self.binary = other.binary;
		}
		if other.refresh_index.is_some() {
			self.refresh_index = other.refresh_index;
		}
	}
}

impl StatusLayer {
	fn merge(&mut self, other: StatusLayer) {
		if other.timeout_ms.is_some() {
			self.timeout_ms = other.timeout_ms;
		}
	}
}

impl LoggingLayer {
	fn merge(&mut self, other: LoggingLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}
}
