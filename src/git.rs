use crate::error::GitError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// captured result of a single git invocation
#[derive(Debug, Clone, Default)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// stdout and stderr joined, trimmed, for error reporting
    pub fn combined(&self) -> String {
        let mut output = String::new();
        for part in [self.stdout.trim(), self.stderr.trim()] {
            if part.is_empty() {
                continue;
            }
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(part);
        }
        output
    }
}

/// runs git with the given arguments
///
/// the seam between the adapter and the real git binary; tests substitute a
/// scripted runner so no repository is required
pub trait GitRunner {
    fn run(&self, args: &[&str]) -> Result<GitOutput, GitError>;
}

/// runs the `git` binary from `PATH`
pub struct SystemGit {
    dir: PathBuf,
}

impl SystemGit {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        tracing::debug!(?args, dir = %self.dir.display(), "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .output()
            .map_err(GitError::Spawn)?;

        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// the git operations the commit workflow needs
pub struct Git<R = SystemGit> {
    runner: R,
}

impl Git<SystemGit> {
    pub fn open(dir: &Path) -> Self {
        Self::with_runner(SystemGit::new(dir))
    }
}

impl<R: GitRunner> Git<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// staged diff, refusing empty or oversized changesets
    ///
    /// the size limit applies to the fetched diff; a diff of exactly
    /// `max_bytes` is accepted
    pub fn staged_diff(&self, max_bytes: usize) -> Result<String, GitError> {
        let in_repo = self.runner.run(&["rev-parse", "--git-dir"])?;
        if !in_repo.success {
            return Err(GitError::NotARepository);
        }

        let names = self.checked(&["diff", "--cached", "--name-only"])?;
        if names.stdout.trim().is_empty() {
            return Err(GitError::NoStagedChanges);
        }

        let diff = self.checked(&["diff", "--cached"])?.stdout;
        tracing::debug!(bytes = diff.len(), max_bytes, "fetched staged diff");
        if diff.len() > max_bytes {
            return Err(GitError::DiffTooLarge {
                size: diff.len(),
                max: max_bytes,
            });
        }

        Ok(diff)
    }

    /// up to `count` most recent commit subjects, newest first
    ///
    /// an unborn branch yields an empty list rather than an error
    pub fn recent_commits(&self, count: usize) -> Result<Vec<String>, GitError> {
        let limit = format!("-{count}");
        let output = self
            .runner
            .run(&["log", &limit, "--pretty=format:%s"])?;

        if !output.success {
            if output.stderr.contains("does not have any commits yet") || !self.has_head() {
                return Ok(Vec::new());
            }
            return Err(GitError::CommandFailed {
                command: "log".to_string(),
                output: output.combined(),
            });
        }

        Ok(output
            .stdout
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// create a commit with the given message
    ///
    /// uses the git binary so commit signing and hooks run as usual
    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        let output = self.runner.run(&["commit", "-m", message])?;
        if !output.success {
            return Err(GitError::CommitFailed(output.combined()));
        }
        Ok(())
    }

    /// `core.editor`, if configured
    pub fn configured_editor(&self) -> Option<String> {
        match self.runner.run(&["config", "--get", "core.editor"]) {
            Ok(output) if output.success => {
                let editor = output.stdout.trim();
                (!editor.is_empty()).then(|| editor.to_string())
            }
            _ => None,
        }
    }

    fn has_head(&self) -> bool {
        self.runner
            .run(&["rev-parse", "--verify", "--quiet", "HEAD"])
            .is_ok_and(|output| output.success)
    }

    fn checked(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let output = self.runner.run(args)?;
        if !output.success {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                output: output.combined(),
            });
        }
        Ok(output)
    }
}

#[cfg(test)]
pub(crate) mod tests;
