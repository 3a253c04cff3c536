// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Where configuration layers come from.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::layer::{ConfigLayer, GitLayer, LoggingLayer, StatusLayer};
use crate::paths::PathsConfig;
use crate::ConfigError;

const ENV_PREFIX: &str = "VCSLINE_";

/// Order in which layers are applied. Later variants override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults,
	SystemFile,
	UserFile,
	/// File named with `--config`.
	ExplicitFile,
	Environment,
	Cli,
}

impl Precedence {
	pub fn label(self) -> &'static str {
		match self {
			Precedence::Defaults => "defaults",
			Precedence::SystemFile => "system-file",
			Precedence::UserFile => "user-file",
			Precedence::ExplicitFile => "explicit-file",
			Precedence::Environment => "environment",
			Precedence::Cli => "cli",
		}
	}
}

/// Something that yields one partial configuration layer.
pub trait ConfigSource: Send + Sync {
	fn precedence(&self) -> Precedence;

	fn load(&self) -> Result<ConfigLayer, ConfigError>;
}

/// Placeholder for the lowest layer; the actual defaults are filled in by
/// `VcslineConfig::from_layer`.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		Ok(ConfigLayer::default())
	}
}

/// A TOML file. A missing file is an empty layer, not an error.
pub struct FileSource {
	path: PathBuf,
	precedence: Precedence,
}

impl FileSource {
	pub fn system(paths: &PathsConfig) -> Self {
		Self {
			path: paths.system_config_file.clone(),
			precedence: Precedence::SystemFile,
		}
	}

	pub fn user(paths: &PathsConfig) -> Self {
		Self {
			path: paths.user_config_file.clone(),
			precedence: Precedence::UserFile,
		}
	}

	pub fn explicit(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			precedence: Precedence::ExplicitFile,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl ConfigSource for FileSource {
	fn precedence(&self) -> Precedence {
		self.precedence
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		let content = match std::fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(e) if e.kind() == ErrorKind::NotFound => {
				trace!(path = %self.path.display(), "no config file");
				return Ok(ConfigLayer::default());
			}
			Err(e) => return Err(e.into()),
		};

		debug!(path = %self.path.display(), scope = self.precedence.label(), "read config file");
		toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
			path: self.path.clone(),
			source,
		})
	}
}

/// `VCSLINE_*` environment variables:
///
/// | Variable | Field |
/// |----------|-------|
/// | `VCSLINE_GIT_BINARY` | `git.binary` |
/// | `VCSLINE_REFRESH_INDEX` | `git.refresh_index` |
/// | `VCSLINE_STATUS_TIMEOUT_MS` | `status.timeout_ms` |
/// | `VCSLINE_LOG_LEVEL` | `logging.level` |
/// | `VCSLINE_LOG_FORMAT` | `logging.format` |
pub struct EnvSource;

impl EnvSource {
	/// Unknown names, blank values and values of the wrong type are dropped.
	pub fn layer_from_vars<I>(vars: I) -> ConfigLayer
	where
		I: IntoIterator<Item = (String, String)>,
	{
		let mut layer = ConfigLayer::default();

		for (key, value) in vars {
			let Some(name) = key.strip_prefix(ENV_PREFIX) else {
				continue;
			};
			let value = value.trim();
			if value.is_empty() {
				continue;
			}
			if let Err(expected) = apply_env_var(&mut layer, name, value) {
				warn!(key = %key, value, expected, "ignoring malformed environment variable");
			}
		}

		layer
	}
}

fn apply_env_var(layer: &mut ConfigLayer, name: &str, value: &str) -> Result<(), &'static str> {
	match name {
		"GIT_BINARY" => layer.git_mut().binary = Some(PathBuf::from(value)),
		"REFRESH_INDEX" => {
			layer.git_mut().refresh_index = Some(parse_bool(value).ok_or("a boolean")?)
		}
		"STATUS_TIMEOUT_MS" => {
			layer.status_mut().timeout_ms = Some(value.parse().map_err(|_| "milliseconds")?)
		}
		"LOG_LEVEL" => layer.logging_mut().level = Some(value.to_string()),
		"LOG_FORMAT" => layer.logging_mut().format = Some(value.to_string()),
		other => trace!(name = other, "unrecognised variable"),
	}
	Ok(())
}

impl ConfigSource for EnvSource {
	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		Ok(Self::layer_from_vars(std::env::vars()))
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// Values given as command line flags. `config_file` selects an extra
/// file source and is not itself a setting.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
	pub config_file: Option<PathBuf>,
	pub refresh_index: Option<bool>,
	pub timeout_ms: Option<u64>,
	pub log_level: Option<String>,
	pub log_format: Option<String>,
}

impl CliOverrides {
	pub fn to_layer(&self) -> ConfigLayer {
		let git = self.refresh_index.map(|refresh| GitLayer {
			refresh_index: Some(refresh),
			..Default::default()
		});
		let status = self.timeout_ms.map(|timeout_ms| StatusLayer {
			timeout_ms: Some(timeout_ms),
		});
		let logging = (self.log_level.is_some() || self.log_format.is_some()).then(|| {
			LoggingLayer {
				level: self.log_level.clone(),
				format: self.log_format.clone(),
			}
		});

		ConfigLayer {
			git,
			status,
			logging,
		}
	}
}

impl ConfigSource for CliOverrides {
	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<ConfigLayer, ConfigError> {
		Ok(self.to_layer())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	fn env(pairs: &[(&str, &str)]) -> ConfigLayer {
		EnvSource::layer_from_vars(
			pairs
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string())),
		)
	}

	#[test]
	fn test_later_variants_win() {
		let order = [
			Precedence::Defaults,
			Precedence::SystemFile,
			Precedence::UserFile,
			Precedence::ExplicitFile,
			Precedence::Environment,
			Precedence::Cli,
		];
		assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
	}

	#[test]
	fn test_missing_file_is_an_empty_layer() {
		let temp = TempDir::new().unwrap();
		let source = FileSource::explicit(temp.path().join("absent.toml"));
		assert_eq!(source.load().unwrap(), ConfigLayer::default());
	}

	#[test]
	fn test_file_scopes() {
		let paths = PathsConfig {
			user_config_file: PathBuf::from("/home/u/.config/vcsline/config.toml"),
			system_config_file: PathBuf::from("/etc/vcsline/config.toml"),
		};
		let system = FileSource::system(&paths);
		let user = FileSource::user(&paths);
		assert_eq!(system.precedence(), Precedence::SystemFile);
		assert_eq!(system.path(), Path::new("/etc/vcsline/config.toml"));
		assert_eq!(user.precedence(), Precedence::UserFile);
	}

	#[test]
	fn test_file_layer_is_parsed() {
		let temp = TempDir::new().unwrap();
		let path = temp.path().join("config.toml");
		fs::write(&path, "[git]\nrefresh_index = false\n[status]\ntimeout_ms = 300\n").unwrap();

		let layer = FileSource::explicit(&path).load().unwrap();
		assert_eq!(layer.git.unwrap().refresh_index, Some(false));
		assert_eq!(layer.status.unwrap().timeout_ms, Some(300));
	}

	/// Test: a syntax error names the offending file.
	#[test]
	fn test_malformed_file_reports_its_path() {
		let temp = TempDir::new().unwrap();
		let path = temp.path().join("config.toml");
		fs::write(&path, "[status\ntimeout_ms = ").unwrap();

		match FileSource::explicit(&path).load() {
			Err(ConfigError::TomlParse { path: reported, .. }) => assert_eq!(reported, path),
			other => panic!("expected a parse error, got {other:?}"),
		}
	}

	#[test]
	fn test_env_vars_fill_every_field() {
		let layer = env(&[
			("VCSLINE_GIT_BINARY", "/opt/git/bin/git"),
			("VCSLINE_REFRESH_INDEX", "no"),
			("VCSLINE_STATUS_TIMEOUT_MS", " 750 "),
			("VCSLINE_LOG_LEVEL", "debug"),
			("VCSLINE_LOG_FORMAT", "json"),
			("PATH", "/usr/bin"),
		]);

		let git = layer.git.unwrap();
		assert_eq!(git.binary, Some(PathBuf::from("/opt/git/bin/git")));
		assert_eq!(git.refresh_index, Some(false));
		assert_eq!(layer.status.unwrap().timeout_ms, Some(750));
		let logging = layer.logging.unwrap();
		assert_eq!(logging.level.as_deref(), Some("debug"));
		assert_eq!(logging.format.as_deref(), Some("json"));
	}

	#[test]
	fn test_env_drops_unusable_values() {
		let layer = env(&[
			("VCSLINE_REFRESH_INDEX", "sometimes"),
			("VCSLINE_STATUS_TIMEOUT_MS", "soon"),
			("VCSLINE_LOG_LEVEL", "   "),
			("VCSLINE_UNKNOWN", "x"),
		]);
		assert_eq!(layer, ConfigLayer::default());
	}

	#[test]
	fn test_cli_layer_has_only_given_flags() {
		let layer = CliOverrides {
			refresh_index: Some(false),
			config_file: Some(PathBuf::from("/tmp/vcsline.toml")),
			..Default::default()
		}
		.load()
		.unwrap();

		assert_eq!(
			layer.git,
			Some(GitLayer {
				binary: None,
				refresh_index: Some(false),
			})
		);
		assert!(layer.status.is_none());
		assert!(layer.logging.is_none());
	}
}
