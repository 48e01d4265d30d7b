//! Tests for the git CLI wrapper and branch resolution against real repositories.

mod common;

use common::TestRepo;
use gpit::commit::collect;
use gpit::git::{GitOps, SystemGit, list_unpushed, resolve};

#[test]
fn test_current_branch_and_missing_upstream() {
    let repo = TestRepo::new();
    repo.write_file("README.md", "hello\n");
    repo.commit_all("Initial commit");

    let git = SystemGit::in_dir(repo.path());
    assert_eq!(git.current_branch().unwrap().as_deref(), Some("main"));
    assert_eq!(git.upstream_ref().unwrap(), None);
}

#[test]
fn test_detached_head_has_no_current_branch() {
    let repo = TestRepo::new();
    repo.write_file("README.md", "hello\n");
    let oid = repo.commit_all("Initial commit");
    repo.repo.set_head_detached(oid).unwrap();

    let git = SystemGit::in_dir(repo.path());
    assert_eq!(git.current_branch().unwrap(), None);

    let ctx = resolve(&git);
    assert_eq!(ctx.current_branch, None);
    assert_eq!(ctx.compare_ref, None);
}

#[test]
fn test_resolve_without_remote_is_unknown() {
    let repo = TestRepo::new();
    repo.write_file("README.md", "hello\n");
    repo.commit_all("Initial commit");

    let ctx = resolve(&SystemGit::in_dir(repo.path()));
    assert_eq!(ctx.current_branch.as_deref(), Some("main"));
    assert_eq!(ctx.upstream_ref, None);
    assert_eq!(ctx.default_branch, None);
    assert_eq!(ctx.compare_ref, None);
    assert_eq!(ctx.remote(), "origin");
}

#[test]
fn test_resolve_prefers_upstream() {
    let repo = TestRepo::new();
    let _remote = repo.add_bare_remote();
    repo.write_file("README.md", "hello\n");
    repo.commit_all("Initial commit");
    repo.push_and_track();

    let ctx = resolve(&SystemGit::in_dir(repo.path()));
    assert_eq!(ctx.upstream_ref.as_deref(), Some("origin/main"));
    assert_eq!(ctx.compare_ref.as_deref(), Some("origin/main"));
}

#[test]
fn test_resolve_falls_back_to_remote_main() {
    let repo = TestRepo::new();
    let _remote = repo.add_bare_remote();
    repo.write_file("README.md", "hello\n");
    repo.commit_all("Initial commit");
    repo.push_and_track();

    // A feature branch with no upstream compares against origin/main.
    let head = repo.repo.head().unwrap().peel_to_commit().unwrap();
    repo.repo.branch("feature", &head, false).unwrap();
    repo.repo.set_head("refs/heads/feature").unwrap();

    let ctx = resolve(&SystemGit::in_dir(repo.path()));
    assert_eq!(ctx.current_branch.as_deref(), Some("feature"));
    assert_eq!(ctx.upstream_ref, None);
    assert_eq!(ctx.default_branch.as_deref(), Some("main"));
    assert_eq!(ctx.compare_ref.as_deref(), Some("origin/main"));
}

#[test]
fn test_list_unpushed_returns_local_only_commits() {
    let repo = TestRepo::new();
    let _remote = repo.add_bare_remote();
    repo.write_file("README.md", "hello\n");
    repo.commit_all("Initial commit");
    repo.push_and_track();

    let git = SystemGit::in_dir(repo.path());
    assert!(list_unpushed(&git, "origin/main").unwrap().is_empty());

    repo.write_file("a.txt", "a\n");
    repo.commit_all("Add a");
    repo.write_file("b.txt", "b\n");
    repo.commit_all("Add b");

    let commits = list_unpushed(&git, "origin/main").unwrap();
    assert_eq!(commits.len(), 2);
    assert!(commits[0].ends_with("Add b"));
    assert!(commits[1].ends_with("Add a"));
}

#[test]
fn test_list_unpushed_unknown_ref_is_error() {
    let repo = TestRepo::new();
    repo.write_file("README.md", "hello\n");
    repo.commit_all("Initial commit");

    let git = SystemGit::in_dir(repo.path());
    assert!(list_unpushed(&git, "origin/does-not-exist").is_err());
}

#[test]
fn test_collect_stages_and_bundles_changes() {
    let repo = TestRepo::new();
    repo.write_file("foo.py", "print('teh')\n");
    repo.commit_all("Initial commit");

    repo.write_file("foo.py", "print('the')\n");
    repo.write_file("docs/new file.md", "# Notes\n");

    let bundle = collect(&SystemGit::in_dir(repo.path())).unwrap();
    let paths: Vec<&str> = bundle.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["docs/new file.md", "foo.py"]);

    let foo = &bundle.entries()[1];
    assert!(foo.diff.contains("-print('teh')"));
    assert!(foo.diff.contains("+print('the')"));
}

#[test]
fn test_collect_clean_tree_is_empty() {
    let repo = TestRepo::new();
    repo.write_file("foo.py", "print('the')\n");
    repo.commit_all("Initial commit");

    let bundle = collect(&SystemGit::in_dir(repo.path())).unwrap();
    assert!(bundle.is_empty());
}

#[test]
fn test_commit_and_soft_reset() {
    let repo = TestRepo::new();
    repo.write_file("foo.py", "one\n");
    let first = repo.commit_all("Initial commit");

    repo.write_file("foo.py", "two\n");
    let git = SystemGit::in_dir(repo.path());
    git.stage_all().unwrap();
    git.commit("Second\n\n- Changed foo").unwrap();
    assert_eq!(repo.head_message().trim_end(), "Second\n\n- Changed foo");
    assert_eq!(repo.commit_count(), 2);

    git.reset_soft(&first.to_string()).unwrap();
    assert_eq!(repo.commit_count(), 1);
    // The change survives the reset, still staged.
    assert_eq!(git.list_staged_files().unwrap(), ["foo.py"]);
}

#[test]
fn test_collect_keeps_paths_git_would_quote() {
    let repo = TestRepo::new();
    repo.write_file("README.md", "hello\n");
    repo.commit_all("Initial commit");

    repo.write_file("say \"hi\".txt", "hi\n");
    repo.write_file("back\\slash.txt", "slash\n");

    let bundle = collect(&SystemGit::in_dir(repo.path())).unwrap();
    let paths: Vec<&str> = bundle.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["back\\slash.txt", "say \"hi\".txt"]);
    for entry in bundle.entries() {
        assert!(
            entry.diff.contains("new file mode"),
            "empty diff for {}",
            entry.path
        );
    }
}

#[test]
fn test_current_branch_on_unborn_branch() {
    let repo = TestRepo::new();

    let git = SystemGit::in_dir(repo.path());
    assert_eq!(git.current_branch().unwrap().as_deref(), Some("main"));
}

#[test]
fn test_resolve_reads_upstream_remote_and_branch_from_config() {
    let repo = TestRepo::new();
    let _remote = repo.add_bare_remote();
    repo.write_file("README.md", "hello\n");
    repo.commit_all("Initial commit");
    repo.push_and_track();
    repo.git(&["push", "--quiet", "origin", "main:feature"]);
    repo.git(&["checkout", "--quiet", "-b", "feature-local", "--track", "origin/feature"]);

    let ctx = resolve(&SystemGit::in_dir(repo.path()));
    assert_eq!(ctx.current_branch.as_deref(), Some("feature-local"));
    assert_eq!(ctx.upstream_ref.as_deref(), Some("origin/feature"));
    assert_eq!(ctx.upstream_remote.as_deref(), Some("origin"));
    assert_eq!(ctx.upstream_branch.as_deref(), Some("feature"));
    assert_eq!(ctx.push_target().unwrap().refspec(), "feature-local:feature");
}
