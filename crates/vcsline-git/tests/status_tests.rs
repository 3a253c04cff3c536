// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end status computation against real repositories.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use vcsline_git::{
	compute_status, ActionState, BranchState, CommandGitClient, InspectOptions, SegmentContext,
	StatusSnapshot,
};

fn git(dir: &Path, args: &[&str]) -> String {
	let output = Command::new("git")
		.args(args)
		.current_dir(dir)
		.output()
		.expect("failed to spawn git");
	assert!(
		output.status.success(),
		"git {:?} failed: {}",
		args,
		String::from_utf8_lossy(&output.stderr)
	);
	String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo() -> TempDir {
	let temp = TempDir::new().unwrap();
	let dir = temp.path();
	git(dir, &["init", "-q"]);
	git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
	git(dir, &["config", "user.email", "test@test.com"]);
	git(dir, &["config", "user.name", "Test"]);
	git(dir, &["config", "commit.gpgsign", "false"]);
	git(dir, &["config", "tag.gpgsign", "false"]);
	temp
}

fn commit_file(dir: &Path, name: &str, content: &str) {
	fs::write(dir.join(name), content).unwrap();
	git(dir, &["add", name]);
	let message = format!("update {name}");
	git(dir, &["commit", "-q", "-m", message.as_str()]);
}

fn repo_with_commit() -> TempDir {
	let temp = init_repo();
	commit_file(temp.path(), "README.md", "# Test\n");
	temp
}

async fn status_at(dir: &Path) -> Option<StatusSnapshot> {
	let client = CommandGitClient::new();
	let ctx = SegmentContext::new(Some(dir.to_path_buf()));
	compute_status(&client, &ctx, &InspectOptions::default())
		.await
		.unwrap()
}

async fn status_of(repo: &TempDir) -> StatusSnapshot {
	status_at(repo.path()).await.expect("expected a repository")
}

#[tokio::test]
async fn test_outside_repository_reports_nothing() {
	let temp = TempDir::new().unwrap();
	assert_eq!(status_at(temp.path()).await, None);
}

#[tokio::test]
async fn test_missing_directory_reports_nothing() {
	let temp = TempDir::new().unwrap();
	assert_eq!(status_at(&temp.path().join("gone")).await, None);
}

#[tokio::test]
async fn test_clean_repository_on_main() {
	let repo = repo_with_commit();
	let snap = status_of(&repo).await;

	assert_eq!(snap.label(), "main");
	assert_eq!(snap.action(), ActionState::None);
	assert!(!snap.detached());
	assert!(!snap.staged());
	assert!(!snap.unstaged());
	assert!(!snap.untracked());
	assert_eq!(snap.stash_count(), 0);
	assert_eq!(snap.branch_state(), BranchState::Clean);
}

/// Test: discovery walks up from a nested directory.
#[tokio::test]
async fn test_nested_directory_finds_enclosing_repository() {
	let repo = repo_with_commit();
	let nested = repo.path().join("src").join("deep");
	fs::create_dir_all(&nested).unwrap();

	let snap = status_at(&nested).await.unwrap();
	assert_eq!(snap.label(), "main");
}

/// Test: untracked files anywhere in the tree count, even when the prompt
/// is drawn from a subdirectory that holds none.
#[tokio::test]
async fn test_untracked_is_checked_from_work_tree_root() {
	let repo = repo_with_commit();
	let nested = repo.path().join("sub");
	fs::create_dir_all(&nested).unwrap();
	fs::write(nested.join("tracked.txt"), "x\n").unwrap();
	git(repo.path(), &["add", "sub/tracked.txt"]);
	git(repo.path(), &["commit", "-q", "-m", "sub"]);
	fs::write(repo.path().join("stray.txt"), "stray\n").unwrap();

	let snap = status_at(&nested).await.unwrap();
	assert!(snap.untracked());
	assert!(!snap.staged());
	assert!(!snap.unstaged());
}

/// Test: a lone MERGE_HEAD marker yields the merge action and its trimmed
/// contents as the label.
#[tokio::test]
async fn test_merge_head_marker() {
	let repo = repo_with_commit();
	let head = git(repo.path(), &["rev-parse", "HEAD"]);
	fs::write(repo.path().join(".git/MERGE_HEAD"), format!("{head}\n")).unwrap();

	let snap = status_of(&repo).await;
	assert_eq!(snap.action(), ActionState::Merge);
	assert_eq!(snap.label(), head);
	assert_eq!(snap.branch_state(), BranchState::Action);
}

/// Test: an apply-style rebase outranks a leftover sequencer directory.
///
/// Why this test is important: interrupted operations leave several
/// markers behind. The reported action must follow the fixed priority
/// order, not whichever marker was written last.
#[tokio::test]
async fn test_rebase_apply_outranks_sequencer() {
	let repo = repo_with_commit();
	let git_dir = repo.path().join(".git");
	fs::create_dir_all(git_dir.join("rebase-apply")).unwrap();
	fs::write(git_dir.join("rebase-apply/rebasing"), "").unwrap();
	fs::create_dir_all(git_dir.join("sequencer")).unwrap();

	let snap = status_of(&repo).await;
	assert_eq!(snap.action(), ActionState::RebaseApply);
	assert_eq!(snap.action().short_label(), "rebase");
	assert_eq!(snap.label(), "main");
}

#[tokio::test]
async fn test_staged_change_only() {
	let repo = repo_with_commit();
	fs::write(repo.path().join("README.md"), "# Changed\n").unwrap();
	git(repo.path(), &["add", "README.md"]);

	let snap = status_of(&repo).await;
	assert!(snap.staged());
	assert!(!snap.unstaged());
	assert!(!snap.untracked());
	assert_eq!(snap.branch_state(), BranchState::Dirty);
}

#[tokio::test]
async fn test_unstaged_change_only() {
	let repo = repo_with_commit();
	fs::write(repo.path().join("README.md"), "# Changed on disk\n").unwrap();

	let snap = status_of(&repo).await;
	assert!(!snap.staged());
	assert!(snap.unstaged());
	assert!(!snap.untracked());
}

#[tokio::test]
async fn test_ignored_files_are_not_untracked() {
	let repo = repo_with_commit();
	commit_file(repo.path(), ".gitignore", "*.log\n");
	fs::write(repo.path().join("build.log"), "noise\n").unwrap();

	let snap = status_of(&repo).await;
	assert!(!snap.untracked());
}

#[tokio::test]
async fn test_stash_count() {
	let repo = repo_with_commit();
	fs::write(repo.path().join("README.md"), "one\n").unwrap();
	git(repo.path(), &["stash", "-q"]);
	fs::write(repo.path().join("README.md"), "two\n").unwrap();
	git(repo.path(), &["stash", "-q"]);

	let snap = status_of(&repo).await;
	assert_eq!(snap.stash_count(), 2);
	assert!(!snap.is_dirty());
	assert_eq!(snap.branch_state(), BranchState::Clean);
}

/// Test: two computations with nothing changed in between agree.
#[tokio::test]
async fn test_repeated_computation_is_stable() {
	let repo = repo_with_commit();
	fs::write(repo.path().join("new.txt"), "new\n").unwrap();
	fs::write(repo.path().join("README.md"), "# Edited\n").unwrap();

	let first = status_of(&repo).await;
	let second = status_of(&repo).await;
	assert_eq!(first, second);
}

#[tokio::test]
async fn test_detached_at_annotated_tag_uses_full_ref() {
	let repo = repo_with_commit();
	git(repo.path(), &["tag", "-a", "v1", "-m", "release v1"]);
	commit_file(repo.path(), "CHANGELOG.md", "v2\n");
	git(repo.path(), &["checkout", "-q", "--detach", "v1"]);

	let snap = status_of(&repo).await;
	assert!(snap.detached());
	assert_eq!(snap.label(), "refs/tags/v1");
	assert_eq!(snap.branch_state(), BranchState::Detached);
}

#[tokio::test]
async fn test_detached_without_ref_uses_short_hash() {
	let repo = repo_with_commit();
	commit_file(repo.path(), "CHANGELOG.md", "v2\n");
	git(repo.path(), &["checkout", "-q", "--detach", "HEAD~1"]);
	let short = git(repo.path(), &["rev-parse", "--short", "HEAD"]);

	let snap = status_of(&repo).await;
	assert!(snap.detached());
	assert_eq!(snap.label(), short);
}

/// Test: a branch with no commits reports its name, and anything added to
/// the index counts as staged.
#[tokio::test]
async fn test_unborn_branch() {
	let repo = init_repo();

	let snap = status_of(&repo).await;
	assert_eq!(snap.label(), "main");
	assert!(!snap.detached());
	assert!(!snap.staged());

	fs::write(repo.path().join("first.txt"), "first\n").unwrap();
	git(repo.path(), &["add", "first.txt"]);

	let snap = status_of(&repo).await;
	assert!(snap.staged());
	assert!(!snap.untracked());
}

/// Test: an unborn branch in a SHA-256 repository still yields a segment.
///
/// Why this test is important: the staged check on an unborn branch must not
/// depend on a SHA-1 object name; a failing check would drop the whole
/// segment for a perfectly valid repository.
#[tokio::test]
async fn test_unborn_branch_in_sha256_repository() {
	let temp = TempDir::new().unwrap();
	git(temp.path(), &["init", "-q", "--object-format=sha256"]);
	git(temp.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);

	let snap = status_of(&temp).await;
	assert_eq!(snap.label(), "main");
	assert!(!snap.staged());
	assert_eq!(snap.branch_state(), BranchState::Clean);

	fs::write(temp.path().join("first.txt"), "first\n").unwrap();
	git(temp.path(), &["add", "first.txt"]);

	let snap = status_of(&temp).await;
	assert!(snap.staged());
	assert!(!snap.untracked());
	assert_eq!(snap.branch_state(), BranchState::Dirty);
}

#[tokio::test]
async fn test_bare_repository_is_clean() {
	let temp = TempDir::new().unwrap();
	git(temp.path(), &["init", "-q", "--bare"]);
	git(temp.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);

	let snap = status_of(&temp).await;
	assert_eq!(snap.label(), "main");
	assert!(!snap.is_dirty());
	assert_eq!(snap.stash_count(), 0);
}

#[tokio::test]
async fn test_refresh_can_be_disabled() {
	let repo = repo_with_commit();
	fs::write(repo.path().join("README.md"), "# Changed size\n").unwrap();

	let client = CommandGitClient::new();
	let ctx = SegmentContext::new(Some(repo.path().to_path_buf()));
	let options = InspectOptions {
		refresh_index: false,
	};
	let snap = compute_status(&client, &ctx, &options)
		.await
		.unwrap()
		.unwrap();
	assert!(snap.unstaged());
}
