// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ordered collection of sources folded into one validated config.

use tracing::{debug, trace, warn};

use crate::layer::ConfigLayer;
use crate::paths::PathsConfig;
use crate::runtime::VcslineConfig;
use crate::sources::ConfigSource;
use crate::validation::validate_config;
use crate::ConfigError;

/// Sources kept sorted by precedence, lowest first. Sources with equal
/// precedence apply in registration order.
#[derive(Default)]
pub struct ConfigRegistry {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, source: Box<dyn ConfigSource>) {
		let precedence = source.precedence();
		let at = self
			.sources
			.partition_point(|existing| existing.precedence() <= precedence);
		trace!(source = precedence.label(), position = at, "registered config source");
		self.sources.insert(at, source);
	}

	pub fn len(&self) -> usize {
		self.sources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}

	/// Fold every source's layer over the previous ones. A source that
	/// cannot be read (unparseable file, permission error) contributes
	/// nothing.
	pub fn merged_layer(&self) -> ConfigLayer {
		self
			.sources
			.iter()
			.fold(ConfigLayer::default(), |mut merged, source| {
				match source.load() {
					Ok(layer) => merged.merge(layer),
					Err(e) => {
						warn!(source = source.precedence().label(), error = %e, "skipping unreadable config source")
					}
				}
				merged
			})
	}

	/// Merge, apply defaults, and validate.
	pub fn load(&self, paths: PathsConfig) -> Result<VcslineConfig, ConfigError> {
		if self.is_empty() {
			return Err(ConfigError::validation("no configuration sources registered"));
		}

		let config = VcslineConfig::from_layer(self.merged_layer(), paths)?;
		validate_config(&config)?;

		debug!(
				sources = self.len(),
				git_binary = %config.git.binary.display(),
				refresh_index = config.git.refresh_index,
				timeout_ms = config.status.timeout_ms,
				log_level = config.logging.level.as_str(),
				"configuration resolved"
		);

		Ok(config)
	}
}
