// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vcsline_config::{
	fallback_config, load_config_with_cli, CliOverrides, LogFormat, LogLevel, LoggingConfig,
	VcslineConfig,
};
use vcsline_git::{
	compute_status, BranchState, CommandGitClient, InspectOptions, SegmentContext, StatusSnapshot,
};

/// vcsline - git status segment for shell prompts
#[derive(Parser, Debug)]
#[command(name = "vcsline", version, about, long_about = None)]
struct Args {
	/// Path to custom configuration file
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Log level (overrides config)
	#[arg(short, long)]
	log_level: Option<String>,

	/// Output logs as JSON (overrides config)
	#[arg(long)]
	json_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the git status of a directory as JSON
	Status {
		/// Directory to inspect (defaults to the current directory)
		#[arg(long)]
		cwd: Option<PathBuf>,

		/// Do not refresh the index before checking for changes
		#[arg(long)]
		no_refresh: bool,

		/// Give up after this many milliseconds
		#[arg(long)]
		timeout_ms: Option<u64>,
	},
	/// Print the outcome of the previous shell command as JSON
	LastStatus {
		/// Exit code of the previous command
		#[arg(allow_negative_numbers = true)]
		code: i32,
	},
}

impl From<&Args> for CliOverrides {
	fn from(args: &Args) -> Self {
		let (refresh_index, timeout_ms) = match &args.command {
			Command::Status {
				no_refresh,
				timeout_ms,
				..
			} => (no_refresh.then_some(false), *timeout_ms),
			Command::LastStatus { .. } => (None, None),
		};

		Self {
			config_file: args.config.clone(),
			refresh_index,
			timeout_ms,
			log_level: args.log_level.clone(),
			log_format: if args.json_logs {
				Some("json".to_string())
			} else {
				None
			},
		}
	}
}

/// Snapshot plus the derived fields a prompt renderer needs.
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
	#[serde(flatten)]
	snapshot: &'a StatusSnapshot,
	action_label: &'static str,
	branch_state: BranchState,
	dirty: bool,
}

impl<'a> From<&'a StatusSnapshot> for StatusReport<'a> {
	fn from(snapshot: &'a StatusSnapshot) -> Self {
		Self {
			snapshot,
			action_label: snapshot.action().short_label(),
			branch_state: snapshot.branch_state(),
			dirty: snapshot.is_dirty(),
		}
	}
}

fn log_level_to_tracing(level: LogLevel) -> tracing::Level {
	match level {
		LogLevel::Trace => tracing::Level::TRACE,
		LogLevel::Debug => tracing::Level::DEBUG,
		LogLevel::Info => tracing::Level::INFO,
		LogLevel::Warn => tracing::Level::WARN,
		LogLevel::Error => tracing::Level::ERROR,
	}
}

/// Logs go to stderr; stdout carries only the JSON the prompt consumes.
fn init_tracing(logging: &LoggingConfig) {
	let level = log_level_to_tracing(logging.level);
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(format!(
			"vcsline_cli={level},vcsline_git={level},vcsline_config={level}"
		))
	});

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(io::stderr))
				.init();
		}
	}
}

/// Print the status for `cwd` as one JSON line.
///
/// Nothing is printed when there is no repository, git fails, or the
/// deadline passes; a prompt segment must never break the prompt.
#[instrument(skip(config))]
async fn run_status(config: &VcslineConfig, cwd: Option<PathBuf>) -> Result<()> {
	let cwd = cwd.or_else(|| std::env::current_dir().ok());
	let client = CommandGitClient::with_binary(&config.git.binary);
	let ctx = SegmentContext::new(cwd);
	let options = InspectOptions {
		refresh_index: config.git.refresh_index,
	};
	debug!(
			git = %client.git_binary().display(),
			refresh_index = options.refresh_index,
			"computing status"
	);

	let outcome = tokio::time::timeout(
		config.status.timeout(),
		compute_status(&client, &ctx, &options),
	)
	.await;

	match outcome {
		Ok(Ok(Some(snapshot))) => print_json(&StatusReport::from(&snapshot)),
		Ok(Ok(None)) => {
			debug!("not inside a repository");
			Ok(())
		}
		Ok(Err(e)) => {
			warn!(error = %e, "git status failed");
			Ok(())
		}
		Err(_) => {
			warn!(
				timeout_ms = config.status.timeout_ms,
				"git status timed out"
			);
			Ok(())
		}
	}
}

fn run_last_status(code: i32) -> Result<()> {
	let ctx = SegmentContext::new(None).with_last_exit_code(code);
	print_json(&ctx.last_status())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
	let json = serde_json::to_string(value).context("failed to serialize output")?;
	let mut stdout = io::stdout().lock();
	writeln!(stdout, "{json}").context("failed to write output")?;
	Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let cli_overrides = CliOverrides::from(&args);
	let (config, config_error) = match load_config_with_cli(cli_overrides.clone()) {
		Ok(config) => (config, None),
		Err(e) => (fallback_config(&cli_overrides), Some(e)),
	};

	init_tracing(&config.logging);

	if let Some(e) = config_error {
		warn!(error = %e, "failed to load configuration, using defaults and command line flags");
	}

	match args.command {
		Command::Status { cwd, .. } => run_status(&config, cwd).await,
		Command::LastStatus { code } => run_last_status(code),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;
	use vcsline_git::{ActionState, DirtyFlags};

	#[test]
	fn test_cli_definition_is_valid() {
		Args::command().debug_assert();
	}

	#[test]
	fn test_status_flags_become_overrides() {
		let args = Args::try_parse_from([
			"vcsline",
			"--config",
			"/tmp/vcsline.toml",
			"--json-logs",
			"status",
			"--cwd",
			"/tmp",
			"--no-refresh",
			"--timeout-ms",
			"250",
		])
		.unwrap();

		let overrides = CliOverrides::from(&args);
		assert_eq!(overrides.config_file, Some(PathBuf::from("/tmp/vcsline.toml")));
		assert_eq!(overrides.refresh_index, Some(false));
		assert_eq!(overrides.timeout_ms, Some(250));
		assert_eq!(overrides.log_format.as_deref(), Some("json"));
		assert_eq!(overrides.log_level, None);
	}

	/// Test: refresh stays unset unless asked for, so config files decide.
	#[test]
	fn test_status_without_flags_leaves_config_alone() {
		let args = Args::try_parse_from(["vcsline", "status"]).unwrap();
		let overrides = CliOverrides::from(&args);
		assert_eq!(overrides.refresh_index, None);
		assert_eq!(overrides.timeout_ms, None);
	}

	/// Test: flags survive a configuration load failure.
	#[test]
	fn test_flags_apply_when_config_cannot_load() {
		let args = Args::try_parse_from([
			"vcsline",
			"--log-level",
			"debug",
			"status",
			"--no-refresh",
			"--timeout-ms",
			"250",
		])
		.unwrap();

		let config = fallback_config(&CliOverrides::from(&args));
		assert!(!config.git.refresh_index);
		assert_eq!(config.status.timeout_ms, 250);
		assert_eq!(config.logging.level, LogLevel::Debug);
	}

	#[test]
	fn test_last_status_accepts_negative_codes() {
		let args = Args::try_parse_from(["vcsline", "last-status", "-1"]).unwrap();
		match args.command {
			Command::LastStatus { code } => assert_eq!(code, -1),
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn test_status_report_includes_derived_fields() {
		let snapshot = StatusSnapshot::new(
			"main".to_string(),
			ActionState::CherryPick,
			false,
			DirtyFlags {
				unstaged: true,
				..Default::default()
			},
		);

		let json = serde_json::to_value(StatusReport::from(&snapshot)).unwrap();
		assert_eq!(json["label"], "main");
		assert_eq!(json["action"], "cherry-pick");
		assert_eq!(json["action_label"], "cherry");
		assert_eq!(json["branch_state"], "action");
		assert_eq!(json["unstaged"], true);
		assert_eq!(json["dirty"], true);
	}
}
