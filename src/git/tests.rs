use super::*;
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;

/// git runner answering from a script of `args prefix -> output`
///
/// the longest matching prefix wins; unscripted calls succeed with no output
#[derive(Default)]
pub(crate) struct ScriptedGit {
    script: Vec<(String, GitOutput)>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedGit {
    pub(crate) fn respond(mut self, prefix: &str, output: GitOutput) -> Self {
        self.script.push((prefix.to_string(), output));
        self
    }

    /// every recorded call whose first argument is `subcommand`
    pub(crate) fn calls_to(&self, subcommand: &str) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|args| args.first().is_some_and(|first| first == subcommand))
            .cloned()
            .collect()
    }
}

impl GitRunner for ScriptedGit {
    fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(ToString::to_string).collect());

        let joined = args.join(" ");
        Ok(self
            .script
            .iter()
            .filter(|(prefix, _)| joined.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| ok("")))
    }
}

pub(crate) fn ok(stdout: &str) -> GitOutput {
    GitOutput {
        success: true,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub(crate) fn failed(stderr: &str) -> GitOutput {
    GitOutput {
        success: false,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// a repository with one staged file whose diff is `diff`
pub(crate) fn staged_repo(diff: &str) -> ScriptedGit {
    ScriptedGit::default()
        .respond("rev-parse --git-dir", ok(".git\n"))
        .respond("diff --cached --name-only", ok("src/main.rs\n"))
        .respond("diff --cached", ok(diff))
}

#[test]
fn test_not_a_repository() {
    let git = Git::with_runner(
        ScriptedGit::default().respond("rev-parse --git-dir", failed("fatal: not a git repository")),
    );

    let result = git.staged_diff(10_000);
    assert!(matches!(result, Err(GitError::NotARepository)));
    assert!(git.runner().calls_to("diff").is_empty());
}

#[test]
fn test_no_staged_changes_regardless_of_size() {
    let git = Git::with_runner(
        staged_repo(&"x".repeat(50_000)).respond("diff --cached --name-only", ok("\n")),
    );

    for limit in [1, 10_000, usize::MAX] {
        assert!(matches!(
            git.staged_diff(limit),
            Err(GitError::NoStagedChanges)
        ));
    }
}

#[test]
fn test_diff_size_limit_is_inclusive() {
    let diff = "d".repeat(100);
    let git = Git::with_runner(staged_repo(&diff));

    assert_eq!(git.staged_diff(100).unwrap(), diff);
    assert_eq!(git.staged_diff(101).unwrap(), diff);

    match git.staged_diff(99) {
        Err(GitError::DiffTooLarge { size, max }) => {
            assert_eq!(size, 100);
            assert_eq!(max, 99);
        }
        other => panic!("expected DiffTooLarge, got {other:?}"),
    }
}

#[test]
fn test_diff_too_large_message_groups_digits() {
    let err = GitError::DiffTooLarge {
        size: 123_456,
        max: 10_000,
    };
    assert_eq!(
        err.to_string(),
        "diff size of 123,456 bytes exceeds maximum allowed size of 10,000 bytes"
    );
}

#[test]
fn test_diff_command_failure_is_reported() {
    let git = Git::with_runner(staged_repo("").respond("diff --cached", failed("boom")));

    match git.staged_diff(100) {
        Err(GitError::CommandFailed { command, output }) => {
            assert_eq!(command, "diff --cached");
            assert_eq!(output, "boom");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[test]
fn test_recent_commits_newest_first() {
    let git = Git::with_runner(
        ScriptedGit::default().respond("log", ok("fix: typo\nfeat: add login")),
    );

    let commits = git.recent_commits(2).unwrap();
    assert_eq!(commits, vec!["fix: typo", "feat: add login"]);
    assert_eq!(
        git.runner().calls_to("log"),
        vec![vec!["log", "-2", "--pretty=format:%s"]]
    );
}

#[test]
fn test_recent_commits_unborn_branch_is_empty() {
    let git = Git::with_runner(ScriptedGit::default().respond(
        "log",
        failed("fatal: your current branch 'main' does not have any commits yet"),
    ));
    assert!(git.recent_commits(5).unwrap().is_empty());

    // localised message, detected through the missing HEAD
    let git = Git::with_runner(
        ScriptedGit::default()
            .respond("log", failed("fatal: ..."))
            .respond("rev-parse --verify", failed("")),
    );
    assert!(git.recent_commits(5).unwrap().is_empty());
}

#[test]
fn test_recent_commits_other_failure_is_error() {
    let git = Git::with_runner(ScriptedGit::default().respond("log", failed("fatal: bad object")));
    assert!(matches!(
        git.recent_commits(5),
        Err(GitError::CommandFailed { .. })
    ));
}

#[test]
fn test_commit_passes_message_verbatim() {
    let git = Git::with_runner(ScriptedGit::default());
    let message = "feat: add logout\n\nAdds a logout endpoint.";

    git.commit(message).unwrap();
    assert_eq!(
        git.runner().calls_to("commit"),
        vec![vec!["commit", "-m", message]]
    );
}

#[test]
fn test_commit_failure_carries_combined_output() {
    let output = GitOutput {
        success: false,
        stdout: "On branch main\n".to_string(),
        stderr: "hook rejected\n".to_string(),
    };
    let git = Git::with_runner(ScriptedGit::default().respond("commit", output));

    match git.commit("fix: x") {
        Err(GitError::CommitFailed(output)) => assert_eq!(output, "On branch main\nhook rejected"),
        other => panic!("expected CommitFailed, got {other:?}"),
    }
}

#[test]
fn test_configured_editor() {
    let git = Git::with_runner(
        ScriptedGit::default().respond("config --get core.editor", ok("code --wait\n")),
    );
    assert_eq!(git.configured_editor().as_deref(), Some("code --wait"));

    let git = Git::with_runner(
        ScriptedGit::default().respond("config --get core.editor", failed("")),
    );
    assert_eq!(git.configured_editor(), None);
}

// the tests below drive the real git binary against a throwaway repository

fn git_available() -> bool {
    which::which("git").is_ok()
}

/// helper to initialise a test git repository
fn setup_test_repo() -> (TempDir, git2::Repository) {
    let temp_dir = TempDir::new().unwrap();
    let repo = git2::Repository::init(temp_dir.path()).unwrap();

    // configure git user for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
    config.set_bool("commit.gpgsign", false).unwrap();

    (temp_dir, repo)
}

/// helper to write a file and stage it
fn stage_file(repo: &git2::Repository, name: &str, content: &str) {
    let root = repo.workdir().unwrap();
    fs::write(root.join(name), content).unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
}

#[test]
fn test_real_repo_staged_diff_and_commit() {
    if !git_available() {
        return;
    }
    let (temp_dir, repo) = setup_test_repo();
    let git = Git::open(temp_dir.path());

    // unborn branch: no history, nothing staged
    assert!(git.recent_commits(5).unwrap().is_empty());
    assert!(matches!(
        git.staged_diff(10_000),
        Err(GitError::NoStagedChanges)
    ));

    stage_file(&repo, "hello.txt", "hello world\n");
    let diff = git.staged_diff(10_000).unwrap();
    assert!(diff.contains("+hello world"));

    // exact-size boundary against a real diff
    assert!(git.staged_diff(diff.len()).is_ok());
    assert!(matches!(
        git.staged_diff(diff.len() - 1),
        Err(GitError::DiffTooLarge { .. })
    ));

    git.commit("feat: add greeting\n\nSay hello.").unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message(), Some("feat: add greeting\n\nSay hello.\n"));

    stage_file(&repo, "bye.txt", "bye\n");
    git.commit("fix: say goodbye").unwrap();
    assert_eq!(
        git.recent_commits(5).unwrap(),
        vec!["fix: say goodbye", "feat: add greeting"]
    );
    assert_eq!(git.recent_commits(1).unwrap(), vec!["fix: say goodbye"]);
}

#[test]
fn test_real_repo_commit_with_nothing_staged_fails() {
    if !git_available() {
        return;
    }
    let (temp_dir, _repo) = setup_test_repo();
    let git = Git::open(temp_dir.path());

    assert!(matches!(
        git.commit("chore: nothing"),
        Err(GitError::CommitFailed(_))
    ));
}

#[test]
fn test_real_directory_outside_repository() {
    if !git_available() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("plain");
    fs::create_dir(&nested).unwrap();
    let git = Git::with_runner(CeilingGit(SystemGit::new(&nested), temp_dir.path().into()));

    assert!(matches!(
        git.staged_diff(10_000),
        Err(GitError::NotARepository)
    ));
}

/// system git with repository discovery capped at a ceiling directory
struct CeilingGit(SystemGit, PathBuf);

impl GitRunner for CeilingGit {
    fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let output = Command::new("git")
            .args(args)
            .env("GIT_CEILING_DIRECTORIES", &self.1)
            .current_dir(&self.0.dir)
            .output()
            .map_err(GitError::Spawn)?;
        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
