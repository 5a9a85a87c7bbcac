//! User actions as data, and their execution.
//!
//! Views return an [`Operation`]; the UI runs it with [`execute`] on a
//! background task and applies the resulting [`TaskReport`] on the UI loop.

use crate::git::{
    self, changelog, clone, release, settings, ssh, tags, Alias, CurrentConfig, GitCli, GitError,
    GlobalSettings, Platform, ReleaseDraft, RepoSummary, Repository, SshKeyStatus, TagSort,
    UserIdentity,
};
use crate::state::LastRepo;
use crate::views::ViewType;
use std::path::PathBuf;
use tracing::{info, warn};

/// One user-triggered action
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    LoadConfig,
    SaveIdentity(UserIdentity),
    ApplySettings(GlobalSettings),
    ApplyAliases(Vec<Alias>),
    CheckSshKey,
    GenerateSshKey { email: String },
    Clone { url: String, dest: PathBuf },
    SelectRepository(PathBuf),
    RefreshRepository,
    ListTags(TagSort),
    CreateLightweightTag(String),
    CreateAnnotatedTag { name: String, message: String },
    PushTag(String),
    PushAllTags,
    /// Exact-match lookup feeding a confirmation dialog
    CheckTag(String),
    DeleteLocalTag(String),
    DeleteRemoteTag(String),
    GenerateChangelog,
    CreateReleaseTag(ReleaseDraft),
    PushReleaseTag(ReleaseDraft),
    PrepareRelease(ReleaseDraft),
    ExportRelease(ReleaseDraft),
    ReleasesUrl(Platform),
}

impl Operation {
    /// View whose output pane receives the report
    pub fn target(&self) -> ViewType {
        match self {
            Operation::LoadConfig | Operation::SaveIdentity(_) => ViewType::User,
            Operation::ApplySettings(_) => ViewType::Settings,
            Operation::ApplyAliases(_) => ViewType::Aliases,
            Operation::CheckSshKey | Operation::GenerateSshKey { .. } => ViewType::Ssh,
            Operation::Clone { .. } => ViewType::Clone,
            Operation::SelectRepository(_)
            | Operation::RefreshRepository
            | Operation::ListTags(_)
            | Operation::CreateLightweightTag(_)
            | Operation::CreateAnnotatedTag { .. }
            | Operation::PushTag(_)
            | Operation::PushAllTags
            | Operation::DeleteLocalTag(_)
            | Operation::DeleteRemoteTag(_) => ViewType::Tags,
            Operation::CheckTag(_) => ViewType::Confirm,
            Operation::GenerateChangelog
            | Operation::CreateReleaseTag(_)
            | Operation::PushReleaseTag(_)
            | Operation::PrepareRelease(_)
            | Operation::ExportRelease(_)
            | Operation::ReleasesUrl(_) => ViewType::Releases,
        }
    }

    /// Status shown while the operation runs
    pub fn progress(&self) -> String {
        match self {
            Operation::LoadConfig => "Loading current configuration...".to_string(),
            Operation::SaveIdentity(_) => "Saving user configuration...".to_string(),
            Operation::ApplySettings(_) => "Applying configuration...".to_string(),
            Operation::ApplyAliases(_) => "Configuring aliases...".to_string(),
            Operation::CheckSshKey => "Checking SSH keys...".to_string(),
            Operation::GenerateSshKey { .. } => "Generating SSH key...".to_string(),
            Operation::Clone { url, .. } => format!("Cloning {}...", url.trim()),
            Operation::SelectRepository(path) => format!("Opening {}...", path.display()),
            Operation::RefreshRepository => "Refreshing repository status...".to_string(),
            Operation::ListTags(_) => "Listing tags...".to_string(),
            Operation::CreateLightweightTag(name) | Operation::CreateAnnotatedTag { name, .. } => {
                format!("Creating tag {}...", name.trim())
            }
            Operation::PushTag(name) => format!("Pushing tag {}...", name.trim()),
            Operation::PushAllTags => "Pushing all tags...".to_string(),
            Operation::CheckTag(name) => format!("Looking up tag {}...", name),
            Operation::DeleteLocalTag(name) => format!("Deleting local tag '{}'...", name),
            Operation::DeleteRemoteTag(name) => format!("Deleting remote tag '{}'...", name),
            Operation::GenerateChangelog => "Generating changelog...".to_string(),
            Operation::CreateReleaseTag(d) | Operation::PrepareRelease(d) => {
                format!("Preparing release {}...", d.tag_name())
            }
            Operation::PushReleaseTag(d) => format!("Pushing tag to remote: {}...", d.tag_name()),
            Operation::ExportRelease(d) => format!("Exporting {}...", d.file_name()),
            Operation::ReleasesUrl(_) => "Looking up remote URL...".to_string(),
        }
    }

    /// Status prefix used when the operation fails
    fn failure(&self) -> &'static str {
        match self {
            Operation::LoadConfig => "Error loading configuration",
            Operation::SaveIdentity(_) => "Error saving user configuration",
            Operation::ApplySettings(_) => "Error applying configuration",
            Operation::ApplyAliases(_) => "Error configuring aliases",
            Operation::CheckSshKey | Operation::GenerateSshKey { .. } => "SSH error",
            Operation::Clone { .. } => "Error cloning repository",
            Operation::SelectRepository(_) | Operation::RefreshRepository => "Repository error",
            Operation::ListTags(_) => "Error listing tags",
            Operation::CreateLightweightTag(_)
            | Operation::CreateAnnotatedTag { .. }
            | Operation::CreateReleaseTag(_) => "Error creating tag",
            Operation::PushTag(_) | Operation::PushAllTags | Operation::PushReleaseTag(_) => {
                "Error pushing tags"
            }
            Operation::CheckTag(_) => "Error checking tag",
            Operation::DeleteLocalTag(_) => "Error deleting local tag",
            Operation::DeleteRemoteTag(_) => "Error deleting remote tag",
            Operation::GenerateChangelog => "Error generating changelog",
            Operation::PrepareRelease(_) => "Error preparing release",
            Operation::ExportRelease(_) => "Error exporting",
            Operation::ReleasesUrl(_) => "No remote repository URL detected",
        }
    }
}

/// Data handed back to the target view alongside the text output
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Config(CurrentConfig),
    SshKey(SshKeyStatus),
    Changelog(String),
    /// A new working repository was selected
    Repository { path: PathBuf, summary: RepoSummary },
    Summary(Option<RepoSummary>),
    TagExists { name: String, exists: bool },
    /// The input naming a deleted tag can be cleared
    TagDeleted(String),
    Url(String),
}

/// Result of running one [`Operation`]
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub target: ViewType,
    pub ok: bool,
    pub status: String,
    /// Replaces the target view's output pane when present
    pub output: Option<String>,
    pub payload: Payload,
}

impl TaskReport {
    fn success(target: ViewType, status: impl Into<String>) -> Self {
        Self {
            target,
            ok: true,
            status: status.into(),
            output: None,
            payload: Payload::None,
        }
    }

    fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    fn failure(target: ViewType, status: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            target,
            ok: false,
            status: status.into(),
            output: Some(output.into()),
            payload: Payload::None,
        }
    }
}

/// Environment an operation runs in
#[derive(Debug, Clone)]
pub struct OpContext {
    pub cli: GitCli,
    pub remote: String,
    pub ssh_dir: Option<PathBuf>,
    /// Persist repository selection to the last-repo file
    pub remember_repo: bool,
}

impl OpContext {
    pub fn new(cli: GitCli, remote: impl Into<String>) -> Self {
        Self {
            cli,
            remote: remote.into(),
            ssh_dir: ssh::default_ssh_dir().ok(),
            remember_repo: true,
        }
    }

    fn ssh_dir(&self) -> git::Result<PathBuf> {
        match &self.ssh_dir {
            Some(dir) => Ok(dir.clone()),
            None => ssh::default_ssh_dir(),
        }
    }
}

/// Run an operation to completion; errors become failed reports
pub async fn execute(op: Operation, ctx: &OpContext) -> TaskReport {
    let target = op.target();
    match run(&op, ctx).await {
        Ok(report) => {
            info!(status = %report.status, "operation finished");
            report
        }
        Err(e) => {
            warn!(error = %e, "operation failed");
            let status = match &e {
                GitError::InvalidInput(msg) => msg.clone(),
                _ => op.failure().to_string(),
            };
            let output = match &e {
                GitError::NotARepo => format!(
                    "Not a Git repository\n\nPlease select a Git repository first ({}).\n\
                     You can clone one on the Clone page.",
                    ctx.cli.workdir().display()
                ),
                other => format!("Error: {}", other),
            };
            TaskReport::failure(target, status, output)
        }
    }
}

async fn run(op: &Operation, ctx: &OpContext) -> git::Result<TaskReport> {
    let cli = &ctx.cli;
    let target = op.target();

    match op {
        Operation::LoadConfig => {
            let current = settings::load_current(cli).await?;
            Ok(TaskReport::success(target, "Current configuration loaded")
                .with_payload(Payload::Config(current)))
        }
        Operation::SaveIdentity(identity) => {
            if identity.commands().is_empty() {
                return Err(GitError::invalid("Please enter a name or email"));
            }
            settings::save_identity(cli, identity).await?;
            let current = settings::load_current(cli).await?;
            Ok(TaskReport::success(target, "User configuration saved")
                .with_payload(Payload::Config(current)))
        }
        Operation::ApplySettings(prefs) => {
            let failures = settings::apply_settings(cli, prefs).await?;
            if failures.is_empty() {
                Ok(TaskReport::success(target, "Configuration applied successfully"))
            } else {
                Ok(TaskReport::failure(
                    target,
                    format!("{} settings could not be applied", failures.len()),
                    failures.join("\n"),
                ))
            }
        }
        Operation::ApplyAliases(aliases) => {
            let count = settings::apply_aliases(cli, aliases).await?;
            Ok(TaskReport::success(target, format!("{} aliases configured", count)))
        }
        Operation::CheckSshKey => {
            let status = ssh::key_status(&ctx.ssh_dir()?);
            Ok(TaskReport::success(target, status.describe()).with_payload(Payload::SshKey(status)))
        }
        Operation::GenerateSshKey { email } => {
            let email = ssh::resolve_email(cli, email).await?;
            let status = ssh::generate_key(&ctx.ssh_dir()?, &email).await?;
            Ok(TaskReport::success(target, "SSH key generated").with_payload(Payload::SshKey(status)))
        }
        Operation::Clone { url, dest } => {
            let output = clone::clone_into(cli, url, dest).await?;
            let report = if output.success {
                TaskReport::success(target, "Repository cloned successfully")
            } else {
                TaskReport::failure(target, "Error cloning repository", String::new())
            };
            Ok(report.with_output(output.combined()))
        }
        Operation::SelectRepository(path) => {
            let repo = Repository::discover_from(path).await?;
            let workdir = repo
                .workdir()
                .await?
                .ok_or_else(|| GitError::invalid("Bare repositories are not supported"))?;
            let summary = repo.summary().await?;
            if ctx.remember_repo {
                if let Err(e) = LastRepo::remember(&workdir) {
                    warn!(error = %e, "could not persist last repository");
                }
            }
            Ok(TaskReport::success(target, format!("Working in: {}", workdir.display()))
                .with_payload(Payload::Repository {
                    path: workdir,
                    summary,
                }))
        }
        Operation::RefreshRepository => {
            let summary = match Repository::discover_from(cli.workdir()).await {
                Ok(repo) => Some(repo.summary().await?),
                Err(GitError::NotARepo) => None,
                Err(e) => return Err(e),
            };
            let status = match &summary {
                Some(s) => s.line(),
                None => "Not a Git repository".to_string(),
            };
            Ok(TaskReport::success(target, status).with_payload(Payload::Summary(summary)))
        }
        Operation::ListTags(sort) => {
            let entries = tags::list_tags(cli, *sort).await?;
            let status = if entries.is_empty() {
                "No tags found".to_string()
            } else {
                format!("Found {} tags", entries.len())
            };
            Ok(TaskReport::success(target, status).with_output(tags::format_listing(&entries)))
        }
        Operation::CreateLightweightTag(name) => {
            tags::create_lightweight(cli, name).await?;
            let names = tags::tag_names(cli, TagSort::Date).await?;
            Ok(
                TaskReport::success(target, format!("Lightweight tag '{}' created", name.trim()))
                    .with_output(format!("Current tags:\n{}", names.join("\n"))),
            )
        }
        Operation::CreateAnnotatedTag { name, message } => {
            let shown = tags::create_annotated(cli, name, message).await?;
            Ok(
                TaskReport::success(target, format!("Annotated tag '{}' created", name.trim()))
                    .with_output(shown),
            )
        }
        Operation::PushTag(name) => {
            let output = tags::push_tag(cli, &ctx.remote, name).await?;
            Ok(
                TaskReport::success(target, format!("Tag '{}' pushed", name.trim()))
                    .with_output(output.combined()),
            )
        }
        Operation::PushAllTags => {
            let output = tags::push_all(cli, &ctx.remote).await?;
            Ok(TaskReport::success(target, "All tags pushed").with_output(output.combined()))
        }
        Operation::CheckTag(name) => {
            cli.require_repository().await?;
            let exists = tags::tag_exists(cli, name).await?;
            let status = if exists {
                format!("Tag '{}' found", name)
            } else {
                format!("Tag not found locally: '{}'", name)
            };
            Ok(TaskReport::success(target, status).with_payload(Payload::TagExists {
                name: name.clone(),
                exists,
            }))
        }
        Operation::DeleteLocalTag(name) => {
            let remaining = tags::delete_local(cli, name).await?;
            Ok(
                TaskReport::success(target, format!("Local tag '{}' deleted successfully", name))
                    .with_output(format!("Remaining tags:\n{}", remaining.join("\n")))
                    .with_payload(Payload::TagDeleted(name.clone())),
            )
        }
        Operation::DeleteRemoteTag(name) => {
            let output = tags::delete_remote(cli, &ctx.remote, name).await?;
            Ok(
                TaskReport::success(target, format!("Tag '{}' deleted from remote", name))
                    .with_output(format!(
                        "{}\nRecommendation: you should also delete the local tag\n   git tag -d {}",
                        output.combined(),
                        name
                    ))
                    .with_payload(Payload::TagDeleted(name.clone())),
            )
        }
        Operation::GenerateChangelog => {
            let text = changelog::generate(cli).await?;
            Ok(TaskReport::success(target, "Changelog generated").with_payload(Payload::Changelog(text)))
        }
        Operation::CreateReleaseTag(draft) => {
            let info = release::create_release_tag(cli, draft).await?;
            Ok(
                TaskReport::success(target, format!("Tag created: {}", draft.tag_name())).with_output(
                    format!(
                        "Tag information:\n{}\n{}\n\nNext step: push tag to remote",
                        "=".repeat(60),
                        info
                    ),
                ),
            )
        }
        Operation::PushReleaseTag(draft) => {
            let output = release::push_release_tag(cli, &ctx.remote, draft).await?;
            Ok(
                TaskReport::success(target, format!("Tag pushed: {}", draft.tag_name())).with_output(
                    format!("{}\nNext step: create the release on the web", output),
                ),
            )
        }
        Operation::PrepareRelease(draft) => {
            let prepared = release::prepare(cli, draft).await?;
            Ok(
                TaskReport::success(target, format!("Release {} prepared", prepared.tag)).with_output(
                    format!(
                        "Preparing release {} ({})\n{}\n\nTag information:\n{}\n\
                         Information saved in: {}\n\
                         Use this file to create the release on GitHub/GitLab",
                        prepared.tag,
                        draft.kind.label(),
                        "=".repeat(50),
                        prepared.tag_info,
                        prepared.notes_path.display()
                    ),
                ),
            )
        }
        Operation::ExportRelease(draft) => {
            let path = release::export_notes(draft, cli.workdir())?;
            Ok(
                TaskReport::success(target, format!("Exported to {}", draft.file_name())).with_output(
                    format!(
                        "Release information exported\n\nFile: {}\n\n\
                         You can use this file as reference when creating the release",
                        path.display()
                    ),
                ),
            )
        }
        Operation::ReleasesUrl(platform) => {
            match release::remote_releases_url(cli, &ctx.remote, *platform).await? {
                Some(url) => Ok(TaskReport::success(target, format!("Releases page: {}", url))
                    .with_output(format!("Open in your browser:\n{}", url))
                    .with_payload(Payload::Url(url))),
                None => Err(GitError::invalid("No remote repository URL detected")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(dir: &std::path::Path) -> OpContext {
        OpContext {
            cli: GitCli::new(dir),
            remote: "origin".to_string(),
            ssh_dir: Some(dir.join(".ssh")),
            remember_repo: false,
        }
    }

    #[test]
    fn test_targets() {
        assert_eq!(Operation::PushAllTags.target(), ViewType::Tags);
        assert_eq!(Operation::GenerateChangelog.target(), ViewType::Releases);
        assert_eq!(Operation::CheckTag("v1".into()).target(), ViewType::Confirm);
    }

    #[tokio::test]
    async fn test_invalid_input_becomes_status() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());
        let report = execute(
            Operation::Clone {
                url: String::new(),
                dest: temp_dir.path().to_path_buf(),
            },
            &ctx,
        )
        .await;
        assert!(!report.ok);
        assert_eq!(report.status, "Please enter a URL");
        assert_eq!(report.target, ViewType::Clone);
    }

    #[tokio::test]
    async fn test_not_a_repo_message() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());
        let report = execute(Operation::ListTags(TagSort::Date), &ctx).await;
        assert!(!report.ok);
        assert_eq!(report.status, "Error listing tags");
        assert!(report.output.unwrap().starts_with("Not a Git repository"));
    }

    #[tokio::test]
    async fn test_check_ssh_key_missing() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());
        let report = execute(Operation::CheckSshKey, &ctx).await;
        assert!(report.ok);
        assert_eq!(report.payload, Payload::SshKey(SshKeyStatus::Missing));
    }

    #[tokio::test]
    async fn test_refresh_outside_repo() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());
        let report = execute(Operation::RefreshRepository, &ctx).await;
        assert!(report.ok);
        assert_eq!(report.status, "Not a Git repository");
        assert_eq!(report.payload, Payload::Summary(None));
    }

    #[tokio::test]
    async fn test_select_repository() {
        let temp_dir = TempDir::new().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();
        let ctx = context(temp_dir.path());
        let report = execute(Operation::SelectRepository(temp_dir.path().to_path_buf()), &ctx).await;
        assert!(report.ok, "{:?}", report);
        match report.payload {
            Payload::Repository { summary, .. } => {
                assert_eq!(summary.tag_count, 0);
                assert_eq!(summary.branch, None);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_export_release_requires_version() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path());
        let report = execute(Operation::ExportRelease(ReleaseDraft::default()), &ctx).await;
        assert!(!report.ok);
        assert_eq!(report.status, "Please enter a version");
    }

    #[tokio::test]
    async fn test_releases_url_without_remote() {
        let temp_dir = TempDir::new().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();
        let ctx = context(temp_dir.path());
        let report = execute(Operation::ReleasesUrl(Platform::GitHub), &ctx).await;
        assert!(!report.ok);
        assert_eq!(report.status, "No remote repository URL detected");
    }

    #[tokio::test]
    async fn test_identity_and_aliases_through_operations() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("gitconfig");
        std::fs::write(&global, "").unwrap();
        let mut ctx = context(temp_dir.path());
        ctx.cli = ctx
            .cli
            .with_env("GIT_CONFIG_GLOBAL", global.to_string_lossy())
            .with_env("GIT_CONFIG_NOSYSTEM", "1");

        let identity = UserIdentity {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        let report = execute(Operation::SaveIdentity(identity.clone()), &ctx).await;
        assert_eq!(report.status, "User configuration saved");
        match report.payload {
            Payload::Config(current) => assert_eq!(current.identity, identity),
            other => panic!("unexpected payload: {:?}", other),
        }

        let aliases = settings::recommended_aliases()[..2].to_vec();
        let report = execute(Operation::ApplyAliases(aliases), &ctx).await;
        assert_eq!(report.status, "2 aliases configured");

        let report = execute(Operation::LoadConfig, &ctx).await;
        match report.payload {
            Payload::Config(current) => {
                assert_eq!(current.configured_aliases, vec!["st", "co"]);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        assert!(std::fs::read_to_string(&global).unwrap().contains("name = Ada"));
    }
}
