//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use git2::{BranchType, Oid, Repository, RepositoryInitOptions, Signature};

use gpit::config::{Config, DeclinePolicy};
use gpit::editor::MessageEditor;
use gpit::error::{EditorError, LlmError, PromptError};
use gpit::interact::Prompter;
use gpit::llm::ChatClient;

/// Config pointing the OpenAI client at `base_url`.
pub fn test_config(base_url: &str) -> Config {
    Config {
        api_key: "sk-test-key".to_string(),
        model: "gpt-4o-mini".to_string(),
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        editor: "true".to_string(),
        decline_policy: DeclinePolicy::Keep,
    }
}

fn init_options(bare: bool) -> RepositoryInitOptions {
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main").bare(bare);
    opts
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty repository on branch `main` in a temp directory.
    ///
    /// Identity and signing are set locally so the `git` CLI can commit
    /// regardless of the machine's global config.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo =
            Repository::init_opts(dir.path(), &init_options(false)).expect("Failed to init git repo");

        let mut config = repo.config().expect("Failed to open repo config");
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        config.set_bool("commit.gpgsign", false).unwrap();

        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write `content` to `relative` inside the working tree.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(path, content).expect("Failed to write test file");
    }

    /// Stage every change and commit it. Returns the commit OID.
    pub fn commit_all(&self, message: &str) -> Oid {
        let sig = self.signature();

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a bare repository and register it as `origin`.
    pub fn add_bare_remote(&self) -> BareRemote {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo =
            Repository::init_opts(dir.path(), &init_options(true)).expect("Failed to init bare repo");
        let url = dir.path().to_str().expect("Temp path is not UTF-8");
        self.repo
            .remote("origin", url)
            .expect("Failed to add remote");
        BareRemote { dir, repo }
    }

    /// Run the `git` CLI in the working tree, asserting success.
    pub fn git(&self, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(self.path())
            .status()
            .expect("Failed to run git");
        assert!(status.success(), "git {:?} failed", args);
    }

    /// Push `main` to `origin` with the `git` CLI and track it.
    pub fn push_and_track(&self) {
        self.git(&["push", "--quiet", "origin", "main"]);

        let mut branch = self
            .repo
            .find_branch("main", BranchType::Local)
            .expect("Failed to find main");
        branch
            .set_upstream(Some("origin/main"))
            .expect("Failed to set upstream");
    }

    /// Full message of the HEAD commit.
    pub fn head_message(&self) -> String {
        let head = self.repo.head().expect("No HEAD");
        let commit = head.peel_to_commit().expect("HEAD is not a commit");
        commit.message().unwrap_or_default().to_string()
    }

    pub fn commit_count(&self) -> usize {
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        if walk.push_head().is_err() {
            return 0;
        }
        walk.count()
    }
}

/// A bare repository used as a push target.
pub struct BareRemote {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl BareRemote {
    /// Full message of the commit at `refs/heads/<branch>`, if any.
    pub fn branch_message(&self, branch: &str) -> Option<String> {
        let reference = self
            .repo
            .find_reference(&format!("refs/heads/{}", branch))
            .ok()?;
        let commit = reference.peel_to_commit().ok()?;
        commit.message().map(String::from)
    }
}

/// [`Prompter`] that replays canned answers and records each prompt.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(PromptError::Closed)
    }
}

/// [`MessageEditor`] that returns a fixed replacement text.
pub struct FakeEditor {
    replacement: String,
    pub opened_with: Mutex<Vec<String>>,
}

impl FakeEditor {
    pub fn new(replacement: &str) -> Self {
        Self {
            replacement: replacement.to_string(),
            opened_with: Mutex::new(Vec::new()),
        }
    }
}

impl MessageEditor for FakeEditor {
    fn edit(&self, initial_text: &str) -> Result<String, EditorError> {
        self.opened_with
            .lock()
            .unwrap()
            .push(initial_text.to_string());
        Ok(self.replacement.clone())
    }
}

/// [`ChatClient`] that replays canned replies, repeating the last one.
pub struct ScriptedClient {
    replies: Vec<String>,
    calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _want_json: bool,
    ) -> Result<String, LlmError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(user_prompt.to_string());
        self.replies
            .get(n)
            .or_else(|| self.replies.last())
            .cloned()
            .ok_or(LlmError::EmptyResponse)
    }
}
