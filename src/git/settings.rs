//! Global (`--global`) git configuration: identity, preferences,
//! credential caching and aliases.

use super::command::{GitCli, GitCommand};
use super::error::Result;
use std::fmt;
use tracing::{debug, info};

/// Editors offered for `core.editor`
pub const EDITORS: [&str; 5] = ["geany", "nano", "vim", "code", "gedit"];

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_CREDENTIAL_TIMEOUT: u32 = 3600;
pub const MAX_CREDENTIAL_TIMEOUT: u32 = 86_400;

/// `user.name` and `user.email`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

impl UserIdentity {
    /// Commands to write the identity; blank fields are left untouched
    pub fn commands(&self) -> Vec<GitCommand> {
        let mut cmds = Vec::new();
        let name = self.name.trim();
        let email = self.email.trim();
        if !name.is_empty() {
            cmds.push(GitCommand::config_set("user.name", name));
        }
        if !email.is_empty() {
            cmds.push(GitCommand::config_set("user.email", email));
        }
        cmds
    }
}

/// Value of `push.default`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PushStrategy {
    #[default]
    Simple,
    Current,
    Matching,
}

impl PushStrategy {
    pub const ALL: [PushStrategy; 3] = [
        PushStrategy::Simple,
        PushStrategy::Current,
        PushStrategy::Matching,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PushStrategy::Simple => "simple",
            PushStrategy::Current => "current",
            PushStrategy::Matching => "matching",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value.trim())
    }
}

impl fmt::Display for PushStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editor, branch, color, push, rebase and credential cache preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    pub editor: String,
    pub default_branch: String,
    pub color_ui: bool,
    pub push_default: PushStrategy,
    pub pull_rebase: bool,
    pub credential_timeout: u32,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            editor: EDITORS[0].to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            color_ui: true,
            push_default: PushStrategy::Simple,
            pull_rebase: false,
            credential_timeout: DEFAULT_CREDENTIAL_TIMEOUT,
        }
    }
}

impl GlobalSettings {
    pub fn commands(&self) -> Vec<GitCommand> {
        vec![
            GitCommand::config_set("core.editor", &self.editor),
            GitCommand::config_set("init.defaultBranch", &self.default_branch),
            GitCommand::config_set("color.ui", if self.color_ui { "auto" } else { "false" }),
            GitCommand::config_set("push.default", self.push_default.as_str()),
            GitCommand::config_set("pull.rebase", if self.pull_rebase { "true" } else { "false" }),
            GitCommand::config_set("credential.helper", &credential_helper(self.credential_timeout)),
        ]
    }
}

/// `cache --timeout=<n>`, clamped to the supported range
pub fn credential_helper(timeout: u32) -> String {
    format!("cache --timeout={}", timeout.min(MAX_CREDENTIAL_TIMEOUT))
}

/// Extract the timeout from a `credential.helper` value such as
/// `cache --timeout=900`
pub fn parse_credential_timeout(helper: &str) -> Option<u32> {
    let rest = helper.split("timeout=").nth(1)?;
    rest.split_whitespace().next()?.parse().ok()
}

/// Index into [`EDITORS`] whose name appears in a `core.editor` value
pub fn match_editor(value: &str) -> Option<usize> {
    EDITORS.iter().position(|e| value.contains(e))
}

/// A git command shortcut, `alias.<name> = <command>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub command: String,
}

impl Alias {
    pub fn new(name: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            command: command.to_string(),
        }
    }

    pub fn key(&self) -> String {
        format!("alias.{}", self.name)
    }

    pub fn command_line(&self) -> GitCommand {
        GitCommand::config_set(&self.key(), &self.command)
    }
}

/// Shortcuts offered on the aliases page
pub fn recommended_aliases() -> Vec<Alias> {
    [
        ("st", "status"),
        ("co", "checkout"),
        ("br", "branch"),
        ("cm", "commit"),
        ("lg", "log --graph --oneline --decorate --all"),
        ("last", "log -1 HEAD"),
        ("unstage", "reset HEAD --"),
        ("amend", "commit --amend"),
    ]
    .into_iter()
    .map(|(name, command)| Alias::new(name, command))
    .collect()
}

/// Everything the settings pages show, as currently configured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentConfig {
    pub identity: UserIdentity,
    pub settings: GlobalSettings,
    /// Names of recommended aliases that are already defined
    pub configured_aliases: Vec<String>,
}

/// Read the current global configuration, falling back to defaults for
/// unset keys
pub async fn load_current(cli: &GitCli) -> Result<CurrentConfig> {
    let get = |key: &'static str| async move { cli.read(&GitCommand::config_get(key)).await };

    let identity = UserIdentity {
        name: get("user.name").await?.unwrap_or_default(),
        email: get("user.email").await?.unwrap_or_default(),
    };

    let mut settings = GlobalSettings::default();
    if let Some(idx) = get("core.editor").await?.as_deref().and_then(match_editor) {
        settings.editor = EDITORS[idx].to_string();
    }
    if let Some(branch) = get("init.defaultBranch").await? {
        settings.default_branch = branch;
    }
    settings.color_ui = get("color.ui").await?.as_deref() != Some("false");
    if let Some(push) = get("push.default").await?.as_deref().and_then(PushStrategy::parse) {
        settings.push_default = push;
    }
    settings.pull_rebase = get("pull.rebase").await?.as_deref() == Some("true");
    if let Some(timeout) = get("credential.helper")
        .await?
        .as_deref()
        .and_then(parse_credential_timeout)
    {
        settings.credential_timeout = timeout.min(MAX_CREDENTIAL_TIMEOUT);
    }

    let mut configured_aliases = Vec::new();
    for alias in recommended_aliases() {
        if cli.read(&GitCommand::config_get(&alias.key())).await?.is_some() {
            configured_aliases.push(alias.name);
        }
    }

    debug!(?identity, ?settings, "loaded global config");
    Ok(CurrentConfig {
        identity,
        settings,
        configured_aliases,
    })
}

/// Write the identity; returns the number of keys written
pub async fn save_identity(cli: &GitCli, identity: &UserIdentity) -> Result<usize> {
    let cmds = identity.commands();
    for cmd in &cmds {
        cli.run(cmd).await?;
    }
    info!(keys = cmds.len(), "saved user identity");
    Ok(cmds.len())
}

/// Apply every preference; keeps going past individual failures and returns
/// the error text of each failed key
pub async fn apply_settings(cli: &GitCli, settings: &GlobalSettings) -> Result<Vec<String>> {
    let mut failures = Vec::new();
    for cmd in settings.commands() {
        if let Err(e) = cli.run(&cmd).await {
            failures.push(e.to_string());
        }
    }
    info!(failed = failures.len(), "applied global settings");
    Ok(failures)
}

/// Define the given aliases; returns how many succeeded
pub async fn apply_aliases(cli: &GitCli, aliases: &[Alias]) -> Result<usize> {
    let mut count = 0;
    for alias in aliases {
        if cli.output(&alias.command_line()).await?.success {
            count += 1;
        }
    }
    info!(count, "configured aliases");
    Ok(count)
}
