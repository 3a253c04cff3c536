// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration types with resolved defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::layer::*;
use crate::paths::PathsConfig;
use crate::ConfigError;

pub const DEFAULT_GIT_BINARY: &str = "git";
pub const DEFAULT_TIMEOUT_MS: u64 = 1_000;

/// The final, validated configuration for vcsline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcslineConfig {
	pub git: GitConfig,
	pub status: StatusConfig,
	pub logging: LoggingConfig,

	/// Resolved config file paths (not serialized)
	#[serde(skip)]
	pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
	/// Executable used for every git invocation.
	pub binary: PathBuf,
	/// Refresh the index before the dirty checks.
	pub refresh_index: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
	/// Deadline for one status computation.
	pub timeout_ms: u64,
}

impl StatusConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_ms)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
	pub level: LogLevel,
	pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Error,
	#[default]
	Warn,
	Info,
	Debug,
	Trace,
}

impl LogLevel {
	pub fn as_str(self) -> &'static str {
		match self {
			LogLevel::Error => "error",
			LogLevel::Warn => "warn",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
			LogLevel::Trace => "trace",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Pretty,
	Json,
	#[default]
	Compact,
}

impl Default for GitConfig {
	fn default() -> Self {
		Self {
			binary: PathBuf::from(DEFAULT_GIT_BINARY),
			refresh_index: true,
		}
	}
}

impl Default for StatusConfig {
	fn default() -> Self {
		Self {
			timeout_ms: DEFAULT_TIMEOUT_MS,
		}
	}
}

impl VcslineConfig {
	/// Build runtime config from a merged layer and paths.
	pub fn from_layer(layer: ConfigLayer, paths: PathsConfig) -> Result<Self, ConfigError> {
		Ok(Self {
			git: build_git_config(layer.git),
			status: build_status_config(layer.status),
			logging: build_logging_config(layer.logging),
			paths,
		})
	}
}

fn build_git_config(layer: Option<GitLayer>) -> GitConfig {
	let layer = layer.unwrap_or_default();
	GitConfig {
		binary: layer
			.binary
			.unwrap_or_else(|| PathBuf::from(DEFAULT_GIT_BINARY)),
		refresh_index: layer.refresh_index.unwrap_or(true),
	}
}

fn build_status_config(layer: Option<StatusLayer>) -> StatusConfig {
	let layer = layer.unwrap_or_default();
	StatusConfig {
		timeout_ms: layer.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
	}
}

fn build_logging_config(layer: Option<LoggingLayer>) -> LoggingConfig {
	let layer = layer.unwrap_or_default();
	LoggingConfig {
		level: parse_log_level(layer.level.as_deref()),
		format: parse_log_format(layer.format.as_deref()),
	}
}

fn parse_log_level(s: Option<&str>) -> LogLevel {
	match s.map(str::to_ascii_lowercase).as_deref() {
		Some("error") => LogLevel::Error,
		Some("warn") | Some("warning") => LogLevel::Warn,
		Some("info") => LogLevel::Info,
		Some("debug") => LogLevel::Debug,
		Some("trace") => LogLevel::Trace,
		None => LogLevel::default(),
		Some(other) => {
			warn!(level = %other, "unknown log level, using default");
			LogLevel::default()
		}
	}
}

fn parse_log_format(s: Option<&str>) -> LogFormat {
	match s.map(str::to_ascii_lowercase).as_deref() {
		Some("json") => LogFormat::Json,
		Some("compact") => LogFormat::Compact,
		Some("pretty") => LogFormat::Pretty,
		None => LogFormat::default(),
		Some(other) => {
			warn!(format = %other, "unknown log format, using default");
			LogFormat::default()
		}
	}
}
