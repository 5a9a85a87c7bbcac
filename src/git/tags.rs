use super::command::{CommandOutput, GitCli, GitCommand};
use super::error::{GitError, Result};
use std::fmt;
use tracing::info;

/// Ordering for `git tag -l`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagSort {
    /// Newest first
    #[default]
    Date,
    Name,
    Version,
}

impl TagSort {
    pub const ALL: [TagSort; 3] = [TagSort::Date, TagSort::Name, TagSort::Version];

    pub fn sort_arg(&self) -> &'static str {
        match self {
            TagSort::Date => "--sort=-creatordate",
            TagSort::Name => "--sort=refname",
            TagSort::Version => "--sort=version:refname",
        }
    }
}

impl fmt::Display for TagSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TagSort::Date => "Sort by: date",
            TagSort::Name => "Sort by: name",
            TagSort::Version => "Sort by: version",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Annotated,
    Lightweight,
    Unknown,
}

/// A tag with its date and subject line when available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub name: String,
    pub kind: TagKind,
    pub info: Option<String>,
}

pub fn list_command(sort: TagSort) -> GitCommand {
    GitCommand::new(["tag", "-l", sort.sort_arg()])
}

pub fn lookup_command(name: &str) -> GitCommand {
    GitCommand::new(["tag", "-l", name])
}

pub fn lightweight_command(name: &str) -> GitCommand {
    GitCommand::new(["tag", name])
}

pub fn annotated_command(name: &str, message: &str) -> GitCommand {
    GitCommand::new(["tag", "-a", name, "-m", message])
}

pub fn push_command(remote: &str, name: &str) -> GitCommand {
    GitCommand::new(["push", remote, name])
}

pub fn push_all_command(remote: &str) -> GitCommand {
    GitCommand::new(["push", remote, "--tags"])
}

pub fn delete_local_command(name: &str) -> GitCommand {
    GitCommand::new(["tag", "-d", name])
}

pub fn delete_remote_command(remote: &str, name: &str) -> GitCommand {
    GitCommand::new(["push", remote, "--delete", name])
}

pub fn show_command(name: &str) -> GitCommand {
    GitCommand::new(["show", name])
}

pub fn show_quiet_command(name: &str) -> GitCommand {
    GitCommand::new(["show", "--quiet", name])
}

fn tag_info_command(name: &str) -> GitCommand {
    GitCommand::new(["show", "--no-patch", "--format=%ci | %s", name])
}

fn commit_info_command(name: &str) -> GitCommand {
    GitCommand::new(["log", "-1", "--format=%ci | %s", name, "--"])
}

fn require_name(name: &str, message: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GitError::invalid(message));
    }
    Ok(name.to_string())
}

/// Exact-match lookup; `git tag -l` treats its argument as a pattern so
/// every returned line is compared against the name
pub async fn tag_exists(cli: &GitCli, name: &str) -> Result<bool> {
    let output = cli.run(&lookup_command(name)).await?;
    Ok(output.lines().iter().any(|line| line == name))
}

/// All tag names in the requested order
pub async fn tag_names(cli: &GitCli, sort: TagSort) -> Result<Vec<String>> {
    Ok(cli.run(&list_command(sort)).await?.lines())
}

/// List tags with per-tag details
pub async fn list_tags(cli: &GitCli, sort: TagSort) -> Result<Vec<TagEntry>> {
    cli.require_repository().await?;
    let mut entries = Vec::new();
    for name in tag_names(cli, sort).await? {
        let entry = describe_tag(cli, &name).await?;
        entries.push(entry);
    }
    Ok(entries)
}

async fn describe_tag(cli: &GitCli, name: &str) -> Result<TagEntry> {
    // `git show --no-patch` on an annotated tag prints the tag header before
    // the formatted commit line, so only the last line is the commit info.
    let output = cli.output(&tag_info_command(name)).await?;
    if output.success && is_annotated(&output) {
        return Ok(TagEntry {
            name: name.to_string(),
            kind: TagKind::Annotated,
            info: output.lines().last().cloned(),
        });
    }

    let output = cli.output(&commit_info_command(name)).await?;
    if output.success && !output.text().is_empty() {
        return Ok(TagEntry {
            name: name.to_string(),
            kind: TagKind::Lightweight,
            info: Some(output.text().to_string()),
        });
    }

    Ok(TagEntry {
        name: name.to_string(),
        kind: TagKind::Unknown,
        info: None,
    })
}

fn is_annotated(output: &CommandOutput) -> bool {
    output.stdout.lines().next().is_some_and(|l| l.starts_with("tag "))
}

/// Text shown in the tag pane after listing
pub fn format_listing(entries: &[TagEntry]) -> String {
    if entries.is_empty() {
        return "No tags found in this repository\n\n\
                You can create your first tag using the form above.\n\
                Recommended format: v1.0.0, release-2024, etc."
            .to_string();
    }

    let mut out = format!("Tags found: {}\n{}\n\n", entries.len(), "=".repeat(60));
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!("{:3}. {}\n", i + 1, entry.name));
        match (&entry.info, entry.kind) {
            (Some(info), TagKind::Annotated) => {
                out.push_str(&format!("     {}\n     Annotated tag\n", info));
            }
            (Some(info), _) => {
                out.push_str(&format!("     {}\n     Lightweight tag\n", info));
            }
            (None, _) => out.push_str("     No detailed info available\n"),
        }
        out.push('\n');
    }
    out
}

pub async fn create_lightweight(cli: &GitCli, name: &str) -> Result<CommandOutput> {
    let name = require_name(name, "Please enter a tag name")?;
    cli.require_repository().await?;
    let output = cli.run(&lightweight_command(&name)).await?;
    info!(tag = %name, "created lightweight tag");
    Ok(output)
}

/// Create an annotated tag and return `git show <tag>`
pub async fn create_annotated(cli: &GitCli, name: &str, message: &str) -> Result<String> {
    let name = require_name(name, "Please enter a tag name")?;
    if message.trim().is_empty() {
        return Err(GitError::invalid("Please enter a tag message"));
    }
    cli.require_repository().await?;
    cli.run(&annotated_command(&name, message.trim())).await?;
    info!(tag = %name, "created annotated tag");
    Ok(cli.output(&show_command(&name)).await?.stdout)
}

pub async fn push_tag(cli: &GitCli, remote: &str, name: &str) -> Result<CommandOutput> {
    let name = require_name(name, "Please enter a tag name to push")?;
    cli.require_repository().await?;
    let output = cli.run(&push_command(remote, &name)).await?;
    info!(tag = %name, %remote, "pushed tag");
    Ok(output)
}

pub async fn push_all(cli: &GitCli, remote: &str) -> Result<CommandOutput> {
    cli.require_repository().await?;
    let output = cli.run(&push_all_command(remote)).await?;
    info!(%remote, "pushed all tags");
    Ok(output)
}

/// Delete a local tag; returns the remaining tag names
pub async fn delete_local(cli: &GitCli, name: &str) -> Result<Vec<String>> {
    let name = require_name(name, "Please enter the EXACT name of the tag to delete")?;
    cli.require_repository().await?;
    if !tag_exists(cli, &name).await? {
        return Err(GitError::TagNotFound(name));
    }
    cli.run(&delete_local_command(&name)).await?;
    info!(tag = %name, "deleted local tag");
    tag_names(cli, TagSort::Name).await
}

pub async fn delete_remote(cli: &GitCli, remote: &str, name: &str) -> Result<CommandOutput> {
    let name = require_name(
        name,
        "Please enter the EXACT name of the tag to delete from remote",
    )?;
    cli.require_repository().await?;
    let output = cli.run(&delete_remote_command(remote, &name)).await?;
    info!(tag = %name, %remote, "deleted remote tag");
    Ok(output)
}
