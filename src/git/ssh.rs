//! SSH key material under `~/.ssh`.

use super::command::{GitCli, GitCommand};
use super::error::{GitError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, instrument};

pub const GITHUB_KEYS_URL: &str = "https://github.com/settings/keys";

/// Which public key was found, with its contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SshKeyStatus {
    Ed25519(String),
    Rsa(String),
    Missing,
}

impl SshKeyStatus {
    pub fn key(&self) -> Option<&str> {
        match self {
            SshKeyStatus::Ed25519(key) | SshKeyStatus::Rsa(key) => Some(key),
            SshKeyStatus::Missing => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            SshKeyStatus::Ed25519(_) => "SSH key found",
            SshKeyStatus::Rsa(_) => "SSH key (RSA) found",
            SshKeyStatus::Missing => "No SSH key found",
        }
    }
}

/// `~/.ssh`
pub fn default_ssh_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".ssh"))
        .ok_or_else(|| GitError::invalid("Could not determine home directory"))
}

/// Look for `id_ed25519.pub`, then `id_rsa.pub`
pub fn key_status(ssh_dir: &Path) -> SshKeyStatus {
    let read = |name: &str| std::fs::read_to_string(ssh_dir.join(name)).ok();
    if let Some(key) = read("id_ed25519.pub") {
        SshKeyStatus::Ed25519(key)
    } else if let Some(key) = read("id_rsa.pub") {
        SshKeyStatus::Rsa(key)
    } else {
        SshKeyStatus::Missing
    }
}

/// Arguments for `ssh-keygen`
pub fn keygen_args(email: &str, key_path: &Path) -> Vec<String> {
    vec![
        "-t".to_string(),
        "ed25519".to_string(),
        "-C".to_string(),
        email.to_string(),
        "-f".to_string(),
        key_path.to_string_lossy().into_owned(),
        "-N".to_string(),
        String::new(),
    ]
}

/// Email for the key comment: explicit input first, then `user.email`
pub async fn resolve_email(cli: &GitCli, input: &str) -> Result<String> {
    let input = input.trim();
    if !input.is_empty() {
        return Ok(input.to_string());
    }
    cli.read(&GitCommand::config_get("user.email"))
        .await?
        .ok_or_else(|| GitError::invalid("Please configure your email first"))
}

/// Generate a passphrase-less ed25519 key pair in `ssh_dir`
#[instrument(skip(ssh_dir), fields(dir = %ssh_dir.display()))]
pub async fn generate_key(ssh_dir: &Path, email: &str) -> Result<SshKeyStatus> {
    tokio::fs::create_dir_all(ssh_dir).await?;
    let key_path = ssh_dir.join("id_ed25519");

    let output = Command::new("ssh-keygen")
        .args(keygen_args(email, &key_path))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: "ssh-keygen".to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    info!("generated SSH key");
    Ok(key_status(ssh_dir))
}
