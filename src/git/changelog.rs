//! Changelog generation from the commits since the most recent tag.

use super::command::{GitCli, GitCommand};
use super::error::{GitError, Result};
use tracing::debug;

const LOG_FORMAT: &str = "--format=%h | %s | %an";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Feature,
    Fix,
    Docs,
    Other,
}

impl Category {
    /// Classify a `hash | subject | author` line by its conventional prefix
    pub fn of(line: &str) -> Self {
        let lower = line.to_lowercase();
        if lower.contains("feat:") || lower.contains("feature:") {
            Category::Feature
        } else if lower.contains("fix:") || lower.contains("bug:") {
            Category::Fix
        } else if lower.contains("doc:") || lower.contains("docs:") {
            Category::Docs
        } else {
            Category::Other
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Category::Feature => "### New Features",
            Category::Fix => "### Bug Fixes",
            Category::Docs => "### Documentation",
            Category::Other => "### Other Changes",
        }
    }
}

pub fn last_tag_command() -> GitCommand {
    GitCommand::new(["describe", "--tags", "--abbrev=0"])
}

pub fn log_command(since: Option<&str>) -> GitCommand {
    match since {
        Some(tag) => GitCommand::new(["log", &format!("{}..HEAD", tag), LOG_FORMAT]),
        None => GitCommand::new(["log", LOG_FORMAT]),
    }
}

/// Render commit lines as Markdown grouped by category
pub fn render(commits: &[String], last_tag: Option<&str>) -> String {
    let mut out = format!(
        "## Changelog from {}\n\n",
        if last_tag.is_some() { "last release" } else { "start" }
    );

    let categories = [
        Category::Feature,
        Category::Fix,
        Category::Docs,
        Category::Other,
    ];
    for category in categories {
        let items: Vec<&String> = commits
            .iter()
            .filter(|c| Category::of(c) == category)
            .collect();
        if items.is_empty() {
            continue;
        }
        out.push_str(category.heading());
        out.push('\n');
        for item in items {
            out.push_str(&format!("- {}\n", item));
        }
        out.push('\n');
    }

    if let Some(tag) = last_tag {
        out.push_str(&format!("*Compared with tag: {}*\n", tag));
    }
    out
}

/// Build the changelog for `HEAD` since the most recent reachable tag
pub async fn generate(cli: &GitCli) -> Result<String> {
    cli.require_repository().await?;
    let last_tag = cli.read(&last_tag_command()).await?;
    debug!(?last_tag, "generating changelog");

    let output = cli.output(&log_command(last_tag.as_deref())).await?;
    let commits = if output.success { output.lines() } else { Vec::new() };
    if commits.is_empty() {
        return Err(GitError::invalid("No new commits found"));
    }
    Ok(render(&commits, last_tag.as_deref()))
}
