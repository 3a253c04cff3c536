// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Git working copy inspection for shell prompt status lines.
//!
//! [`compute_status`] discovers the repository enclosing a directory and
//! reports the ref label, any in-progress operation, and dirtiness flags.

mod action;
mod client;
mod command_client;
mod context;
mod dirty;
mod error;
mod label;
mod mock_client;
mod repository;
mod snapshot;

pub use action::{detect_action, ActionState};
pub use client::{DiffOutcome, GitClient, RepoLocation};
pub use command_client::CommandGitClient;
pub use context::{LastStatus, SegmentContext};
pub use dirty::{count_stashes, inspect_dirty, DirtyFlags};
pub use error::GitError;
pub use label::{resolve_label, resolve_label_with_source, LabelSource};
pub use mock_client::{MockCall, MockGitClient};
pub use repository::RepositoryHandle;
pub use snapshot::{compute_status, BranchState, InspectOptions, StatusSnapshot};
