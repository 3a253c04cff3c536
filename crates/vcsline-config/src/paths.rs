// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! XDG config file locations.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::ConfigError;

const APP_DIR: &str = "vcsline";
const CONFIG_FILE: &str = "config.toml";
const SYSTEM_CONFIG_FILE: &str = "/etc/vcsline/config.toml";

/// Resolved configuration file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
	/// User config file: ~/.config/vcsline/config.toml
	pub user_config_file: PathBuf,
	/// System config file: /etc/vcsline/config.toml
	pub system_config_file: PathBuf,
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self {
			user_config_file: PathBuf::from("~/.config/vcsline/config.toml"),
			system_config_file: PathBuf::from(SYSTEM_CONFIG_FILE),
		}
	}
}

/// Resolve paths from `XDG_CONFIG_HOME`, falling back to `~/.config`.
pub fn resolve_xdg_paths() -> Result<PathsConfig, ConfigError> {
	resolve_paths(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
}

fn resolve_paths(
	xdg_config_home: Option<OsString>,
	home: Option<PathBuf>,
) -> Result<PathsConfig, ConfigError> {
	// Relative XDG values are invalid per the base directory rules.
	let config_home = match xdg_config_home.map(PathBuf::from) {
		Some(dir) if dir.is_absolute() => dir,
		_ => home.ok_or(ConfigError::HomeDirNotFound)?.join(".config"),
	};

	tracing::debug!(config_home = %config_home.display(), "resolved XDG config home");

	Ok(PathsConfig {
		user_config_file: config_home.join(APP_DIR).join(CONFIG_FILE),
		system_config_file: PathBuf::from(SYSTEM_CONFIG_FILE),
	})
}
