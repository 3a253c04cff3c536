// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the vcsline prompt segment.
//!
//! Sources, lowest precedence first: built-in defaults, the system file,
//! the user's XDG file, an explicit `--config` file, `VCSLINE_*`
//! environment variables, and command line flags.

pub mod error;
pub mod layer;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod sources;
pub mod validation;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use paths::PathsConfig;
pub use registry::ConfigRegistry;
pub use runtime::{GitConfig, LogFormat, LogLevel, LoggingConfig, StatusConfig, VcslineConfig};
pub use sources::{CliOverrides, ConfigSource, Precedence};
pub use validation::validate_config;

/// Load configuration from all sources with default precedence.
pub fn load_config() -> Result<VcslineConfig, ConfigError> {
	load_config_with_cli(CliOverrides::default())
}

/// Load configuration with CLI overrides.
pub fn load_config_with_cli(cli: CliOverrides) -> Result<VcslineConfig, ConfigError> {
	let paths = paths::resolve_xdg_paths()?;
	registry_for(&paths, cli).load(paths)
}

/// Configuration to run with when [`load_config_with_cli`] fails: defaults
/// with the command line flags applied. If the flags themselves do not
/// validate, plain defaults.
pub fn fallback_config(cli: &CliOverrides) -> VcslineConfig {
	VcslineConfig::from_layer(cli.to_layer(), PathsConfig::default())
		.and_then(|config| validate_config(&config).map(|()| config))
		.unwrap_or_default()
}

fn registry_for(paths: &PathsConfig, cli: CliOverrides) -> ConfigRegistry {
	let mut registry = ConfigRegistry::new();

	registry.register(Box::new(sources::DefaultsSource));
	registry.register(Box::new(sources::FileSource::system(paths)));
	registry.register(Box::new(sources::FileSource::user(paths)));
	if let Some(path) = cli.config_file.clone() {
		registry.register(Box::new(sources::FileSource::explicit(path)));
	}
	registry.register(Box::new(sources::EnvSource));
	registry.register(Box::new(cli));

	registry
}
