//! Construction and execution of external `git` invocations.
//!
//! [`GitCommand`] is a plain argument vector so callers (and tests) can
//! inspect exactly what will be run. [`GitCli`] executes commands with
//! `tokio::process` inside a fixed working directory.

use super::error::{GitError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Argument vector for a single `git` invocation (without the program name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    args: Vec<String>,
}

impl GitCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append one more argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn version() -> Self {
        Self::new(["--version"])
    }

    /// `git config --global <key>`
    pub fn config_get(key: &str) -> Self {
        Self::new(["config", "--global", key])
    }

    /// `git config --global <key> <value>`
    pub fn config_set(key: &str, value: &str) -> Self {
        Self::new(["config", "--global", key, value])
    }

    pub fn is_inside_repo() -> Self {
        Self::new(["rev-parse", "--git-dir"])
    }

    pub fn show_toplevel() -> Self {
        Self::new(["rev-parse", "--show-toplevel"])
    }

    pub fn remote_url(remote: &str) -> Self {
        Self::new(["remote", "get-url", remote])
    }

    pub fn clone_repo(url: &str) -> Self {
        Self::new(["clone", url])
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git")?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Trimmed stdout
    pub fn text(&self) -> &str {
        self.stdout.trim()
    }

    /// stdout followed by stderr, the way git's progress output is meant to be read
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }

    /// Non-empty trimmed stdout lines
    pub fn lines(&self) -> Vec<String> {
        self.stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Runs `git` (or a helper program) inside a working directory
#[derive(Debug, Clone, PartialEq)]
pub struct GitCli {
    program: String,
    workdir: PathBuf,
    /// Extra environment for every spawned process
    env: Vec<(String, String)>,
}

impl GitCli {
    pub fn new<P: AsRef<Path>>(workdir: P) -> Self {
        Self {
            program: "git".to_string(),
            workdir: workdir.as_ref().to_path_buf(),
            env: Vec::new(),
        }
    }

    /// Use a different executable, e.g. an absolute path to git
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set an environment variable for every command, e.g. `GIT_CONFIG_GLOBAL`
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Same program, different working directory
    pub fn in_dir<P: AsRef<Path>>(&self, workdir: P) -> Self {
        Self {
            program: self.program.clone(),
            workdir: workdir.as_ref().to_path_buf(),
            env: self.env.clone(),
        }
    }

    /// Run a command and capture its output regardless of exit status
    #[instrument(skip(self), fields(cmd = %cmd, dir = %self.workdir.display()))]
    pub async fn output(&self, cmd: &GitCommand) -> Result<CommandOutput> {
        debug!("spawning git");
        let output = Command::new(&self.program)
            .args(cmd.args())
            .current_dir(&self.workdir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                // A missing working directory also surfaces as NotFound
                if e.kind() == std::io::ErrorKind::NotFound && self.workdir.is_dir() {
                    GitError::NotInstalled
                } else {
                    GitError::Io(e)
                }
            })?;

        let result = CommandOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if result.success {
            debug!("git succeeded");
        } else {
            warn!(status = %result.status, stderr = %result.stderr.trim(), "git failed");
        }
        Ok(result)
    }

    /// Run a command and fail on a non-zero exit status
    pub async fn run(&self, cmd: &GitCommand) -> Result<CommandOutput> {
        let output = self.output(cmd).await?;
        if !output.success {
            return Err(GitError::CommandFailed {
                command: cmd.to_string(),
                status: output.status,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }

    /// Run a command and return its trimmed stdout, or `None` when it fails
    /// or prints nothing (e.g. an unset config key)
    pub async fn read(&self, cmd: &GitCommand) -> Result<Option<String>> {
        let output = self.output(cmd).await?;
        if output.success && !output.text().is_empty() {
            Ok(Some(output.text().to_string()))
        } else {
            Ok(None)
        }
    }

    /// Whether the configured git executable can be run at all
    pub async fn is_installed(&self) -> bool {
        matches!(self.output(&GitCommand::version()).await, Ok(out) if out.success)
    }

    /// Whether the working directory is inside a git repository
    pub async fn is_repository(&self) -> bool {
        if !self.workdir.is_dir() {
            return false;
        }
        matches!(self.output(&GitCommand::is_inside_repo()).await, Ok(out) if out.success)
    }

    /// Fail with [`GitError::NotARepo`] unless inside a repository
    pub async fn require_repository(&self) -> Result<()> {
        if self.is_repository().await {
            Ok(())
        } else {
            Err(GitError::NotARepo)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_set_args() {
        let cmd = GitCommand::config_set("user.name", "Ada Lovelace");
        assert_eq!(
            cmd.args(),
            &["config", "--global", "user.name", "Ada Lovelace"]
        );
    }

    #[test]
    fn test_display_quotes_whitespace() {
        let cmd = GitCommand::config_set("alias.lg", "log --graph");
        assert_eq!(cmd.to_string(), "git config --global alias.lg \"log --graph\"");
    }

    #[test]
    fn test_builder_arg() {
        let cmd = GitCommand::new(["log"]).arg("--oneline");
        assert_eq!(cmd.args(), &["log", "--oneline"]);
    }

    #[test]
    fn test_output_helpers() {
        let out = CommandOutput {
            success: true,
            status: "exit status: 0".to_string(),
            stdout: "v1\n\nv2\n".to_string(),
            stderr: "warning".to_string(),
        };
        assert_eq!(out.lines(), vec!["v1".to_string(), "v2".to_string()]);
        assert_eq!(out.combined(), "v1\n\nv2\nwarning");
    }

    #[tokio::test]
    async fn test_git_is_installed() {
        let temp_dir = TempDir::new().unwrap();
        let cli = GitCli::new(temp_dir.path());
        assert!(cli.is_installed().await);
    }

    #[tokio::test]
    async fn test_missing_program_is_not_installed() {
        let temp_dir = TempDir::new().unwrap();
        let cli = GitCli::new(temp_dir.path()).with_program("definitely-not-git-xyz");
        assert!(!cli.is_installed().await);
        let err = cli.run(&GitCommand::version()).await.unwrap_err();
        assert!(matches!(err, GitError::NotInstalled));
    }

    #[tokio::test]
    async fn test_env_reaches_git() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("gitconfig");
        std::fs::write(&global, "[user]\n\tname = From Env\n").unwrap();

        let cli = GitCli::new(temp_dir.path())
            .with_env("GIT_CONFIG_GLOBAL", global.to_string_lossy());
        let name = cli.read(&GitCommand::config_get("user.name")).await.unwrap();
        assert_eq!(name.as_deref(), Some("From Env"));
        assert_eq!(cli.in_dir("/").env, cli.env);
    }

    #[tokio::test]
    async fn test_is_repository() {
        let temp_dir = TempDir::new().unwrap();
        let cli = GitCli::new(temp_dir.path());
        assert!(!cli.is_repository().await);

        git2::Repository::init(temp_dir.path()).unwrap();
        assert!(cli.is_repository().await);
    }

    #[tokio::test]
    async fn test_run_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let cli = GitCli::new(temp_dir.path());
        let err = cli
            .run(&GitCommand::new(["tag", "-d", "nope"]))
            .await
            .unwrap_err();
        match err {
            GitError::CommandFailed { command, .. } => assert_eq!(command, "git tag -d nope"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
