use super::command::{CommandOutput, GitCli, GitCommand};
use super::error::{GitError, Result};
use std::path::Path;
use tracing::info;

/// Run `git clone <url>` inside `dest`
///
/// The full output is returned even when git fails, since clone progress
/// and errors both go to stderr.
pub async fn clone_into(cli: &GitCli, url: &str, dest: &Path) -> Result<CommandOutput> {
    let url = url.trim();
    if url.is_empty() {
        return Err(GitError::invalid("Please enter a URL"));
    }
    if !dest.is_dir() {
        return Err(GitError::invalid(format!(
            "Destination directory does not exist: {}",
            dest.display()
        )));
    }

    let output = cli.in_dir(dest).output(&GitCommand::clone_repo(url)).await?;
    if output.success {
        info!(%url, dest = %dest.display(), "cloned repository");
    }
    Ok(output)
}
