//! Release bookkeeping: annotated release tags and `RELEASE_<tag>.md` notes.

use super::command::{GitCli, GitCommand};
use super::error::{GitError, Result};
use super::tags;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_CHANGELOG: &str = "## New Features\n\
- Functionality implemented\n\
- Performance improvement\n\
- Bug fixes\n\
\n\
## Technical Changes\n\
- Code refactoring\n\
- Documentation improvements\n\
\n\
## Acknowledgments\n\
Thanks to all contributors!";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReleaseKind {
    #[default]
    Stable,
    PreRelease,
    Beta,
}

impl ReleaseKind {
    pub const ALL: [ReleaseKind; 3] = [ReleaseKind::Stable, ReleaseKind::PreRelease, ReleaseKind::Beta];

    pub fn is_prerelease(&self) -> bool {
        !matches!(self, ReleaseKind::Stable)
    }

    /// Short form used in generated notes
    pub fn label(&self) -> &'static str {
        if self.is_prerelease() {
            "pre-release"
        } else {
            "stable"
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReleaseKind::Stable => "Stable",
            ReleaseKind::PreRelease => "Pre-release",
            ReleaseKind::Beta => "Beta",
        })
    }
}

/// Hosting service whose release page is linked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    GitHub,
    GitLab,
}

/// Form contents of the releases page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDraft {
    pub version: String,
    pub title: String,
    pub kind: ReleaseKind,
    pub changelog: String,
}

impl Default for ReleaseDraft {
    fn default() -> Self {
        Self {
            version: String::new(),
            title: String::new(),
            kind: ReleaseKind::Stable,
            changelog: DEFAULT_CHANGELOG.to_string(),
        }
    }
}

impl ReleaseDraft {
    /// Reject drafts without a version
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(GitError::invalid("Please enter a version"));
        }
        Ok(())
    }

    pub fn version(&self) -> &str {
        self.version.trim()
    }

    pub fn tag_name(&self) -> String {
        format!("v{}", self.version())
    }

    /// Title, or `Release v<version>` when left blank
    pub fn title(&self) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            format!("Release {}", self.tag_name())
        } else {
            title.to_string()
        }
    }

    /// Message stored in the annotated tag
    pub fn tag_message(&self) -> String {
        format!("{}\n\n{}", self.title(), self.changelog)
    }

    pub fn file_name(&self) -> String {
        format!("RELEASE_{}.md", self.tag_name())
    }

    pub fn tag_command(&self) -> GitCommand {
        tags::annotated_command(&self.tag_name(), &self.tag_message())
    }

    /// Markdown notes written by the export action
    pub fn render_notes(&self, date: DateTime<Local>) -> String {
        let tag = self.tag_name();
        let title = self.title();
        format!(
            "# Release {tag}\n\
             \n\
             ## Basic Information\n\
             \n\
             - **Version:** {version}\n\
             - **Tag:** {tag}\n\
             - **Title:** {title}\n\
             - **Type:** {kind}\n\
             - **Date:** {date}\n\
             - **Pre-release:** {pre}\n\
             \n\
             ## Changelog\n\
             \n\
             {changelog}\n\
             \n\
             ## Assets to Include (optional)\n\
             \n\
             - [ ] Compiled binaries\n\
             - [ ] PDF documentation\n\
             - [ ] SHA256 checksums\n\
             - [ ] Source code .zip\n\
             \n\
             ## Git Commands\n\
             \n\
             ```bash\n\
             # Create tag\n\
             git tag -a {tag} -m \"{title}\"\n\
             \n\
             # Push tag\n\
             git push origin {tag}\n\
             \n\
             # Create release from existing tag\n\
             # (use GitHub/GitLab web interface)\n\
             ```\n",
            version = self.version(),
            kind = self.kind.label(),
            date = date.format("%Y-%m-%d"),
            pre = if self.kind.is_prerelease() { "Yes" } else { "No" },
            changelog = self.changelog.trim_end(),
        )
    }

    /// Markdown written alongside a freshly prepared release tag
    pub fn render_prepared(&self, date: DateTime<Local>) -> String {
        let tag = self.tag_name();
        format!(
            "# Release {tag}\n\
             \n\
             **Title:** {title}\n\
             **Type:** {kind}\n\
             **Tag:** {tag}\n\
             **Date:** {date}\n\
             \n\
             ## Changelog\n\
             \n\
             {changelog}\n\
             \n\
             ## Commands to publish\n\
             \n\
             ```bash\n\
             # Push tag to remote\n\
             git push origin {tag}\n\
             \n\
             # Then create the release in the web interface\n\
             # GitHub: https://github.com/USER/REPO/releases/new?tag={tag}\n\
             # GitLab: https://gitlab.com/USER/REPO/-/releases/new\n\
             ```\n",
            title = self.title(),
            kind = self.kind.label(),
            date = date.format("%Y-%m-%d %H:%M:%S"),
            changelog = self.changelog.trim_end(),
        )
    }
}

/// Write the release notes into `dir`; returns the absolute file path
pub fn export_notes(draft: &ReleaseDraft, dir: &Path) -> Result<PathBuf> {
    draft.validate()?;
    let path = dir.join(draft.file_name());
    std::fs::write(&path, draft.render_notes(Local::now()))?;
    let path = std::fs::canonicalize(&path).unwrap_or(path);
    info!(path = %path.display(), "exported release notes");
    Ok(path)
}

/// Create the annotated release tag; returns `git show --quiet <tag>`
pub async fn create_release_tag(cli: &GitCli, draft: &ReleaseDraft) -> Result<String> {
    draft.validate()?;
    cli.require_repository().await?;
    let tag = draft.tag_name();
    if tags::tag_exists(cli, &tag).await? {
        return Err(GitError::TagExists(tag));
    }
    cli.run(&draft.tag_command()).await?;
    info!(%tag, kind = draft.kind.label(), "created release tag");
    Ok(cli.output(&tags::show_quiet_command(&tag)).await?.stdout)
}

/// Push the release tag, which must already exist locally
pub async fn push_release_tag(cli: &GitCli, remote: &str, draft: &ReleaseDraft) -> Result<String> {
    draft.validate()?;
    cli.require_repository().await?;
    let tag = draft.tag_name();
    if !tags::tag_exists(cli, &tag).await? {
        return Err(GitError::TagNotFound(tag));
    }
    let output = cli.run(&tags::push_command(remote, &tag)).await?;
    Ok(output.combined())
}

/// Outcome of [`prepare`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRelease {
    pub tag: String,
    pub tag_info: String,
    pub notes_path: PathBuf,
}

/// Create the release tag and write the prepared notes next to the repository
pub async fn prepare(cli: &GitCli, draft: &ReleaseDraft) -> Result<PreparedRelease> {
    let tag_info = create_release_tag(cli, draft).await?;
    let path = cli.workdir().join(draft.file_name());
    std::fs::write(&path, draft.render_prepared(Local::now()))?;
    info!(path = %path.display(), "prepared release");
    Ok(PreparedRelease {
        tag: draft.tag_name(),
        tag_info,
        notes_path: path,
    })
}

/// Convert a remote URL into the web page listing releases
pub fn releases_url(remote_url: &str, platform: Platform) -> String {
    let mut url = remote_url.trim().to_string();
    if let Some(rest) = url.strip_prefix("ssh://") {
        // ssh://[user@]host[:port]/path
        let rest = rest.split_once('@').map_or(rest, |(_, host)| host);
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        let host = host.split(':').next().unwrap_or(host);
        url = format!("https://{}/{}", host, path);
    } else if let Some(rest) = url.strip_prefix("git@") {
        url = format!("https://{}", rest.replacen(':', "/", 1));
    }
    if let Some(stripped) = url.strip_suffix(".git") {
        url = stripped.to_string();
    }
    let suffix = match platform {
        Platform::GitHub => "/releases",
        Platform::GitLab => "/-/releases",
    };
    if !url.ends_with(suffix) {
        url.push_str(suffix);
    }
    url
}

/// Release page for the given remote, or `None` when it has no URL
pub async fn remote_releases_url(cli: &GitCli, remote: &str, platform: Platform) -> Result<Option<String>> {
    Ok(cli
        .read(&GitCommand::remote_url(remote))
        .await?
        .map(|url| releases_url(&url, platform)))
}
