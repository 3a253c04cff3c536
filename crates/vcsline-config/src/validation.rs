// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration validation rules.

use crate::runtime::VcslineConfig;
use crate::ConfigError;

pub const MAX_TIMEOUT_MS: u64 = 60_000;

/// Validate the configuration.
///
/// Returns Ok(()) if valid, or ConfigError::InvalidValue with details.
pub fn validate_config(config: &VcslineConfig) -> Result<(), ConfigError> {
	validate_git(config)?;
	validate_status(config)?;

	Ok(())
}

fn validate_git(config: &VcslineConfig) -> Result<(), ConfigError> {
	if config.git.binary.as_os_str().is_empty() {
		return Err(ConfigError::invalid_value("git.binary", "cannot be empty"));
	}

	Ok(())
}

fn validate_status(config: &VcslineConfig) -> Result<(), ConfigError> {
	let timeout_ms = config.status.timeout_ms;

	if timeout_ms == 0 {
		return Err(ConfigError::invalid_value(
			"status.timeout_ms",
			"must be at least 1",
		));
	}

	if timeout_ms > MAX_TIMEOUT_MS {
		return Err(ConfigError::invalid_value(
			"status.timeout_ms",
			format!("must be at most {MAX_TIMEOUT_MS} (a prompt cannot wait that long)"),
		));
	}

	Ok(())
}
