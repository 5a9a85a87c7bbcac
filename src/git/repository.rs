use super::error::{GitError, Result};
use git2::Repository as Git2Repo;
use std::path::{Path, PathBuf};

/// Async handle to the repository the tag and release pages operate on
///
/// Note: git2::Repository is not Send/Sync, so we store the path
/// and open a fresh repository handle in each async operation
#[derive(Clone, Debug, PartialEq)]
pub struct Repository {
    path: PathBuf,
}

/// One-line overview shown above the tag list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub name: String,
    pub branch: Option<String>,
    pub tag_count: usize,
}

impl RepoSummary {
    pub fn line(&self) -> String {
        format!(
            "{} | {} | {} tags",
            self.name,
            self.branch.as_deref().unwrap_or("No branch"),
            self.tag_count
        )
    }
}

impl Repository {
    /// Open a repository from the given path
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let path_clone = path.clone();

        // Verify we can open it
        tokio::task::spawn_blocking(move || Git2Repo::open(path_clone))
            .await
            .map_err(|_| GitError::NotARepo)??;

        Ok(Self { path })
    }

    /// Discover and open a repository starting from a specific path
    pub async fn discover_from<P: AsRef<Path>>(start_path: P) -> Result<Self> {
        let start_path = start_path.as_ref().to_path_buf();

        let repo_path = tokio::task::spawn_blocking(move || Git2Repo::discover(&start_path))
            .await
            .map_err(|_| GitError::NotARepo)?
            .map_err(|_| GitError::NotARepo)?;

        Self::open(repo_path.path()).await
    }

    /// Get the path to the repository's git directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the short name of the current branch (e.g., "main" instead of "refs/heads/main")
    ///
    /// Returns `None` for an unborn branch in an empty repository.
    pub async fn current_branch(&self) -> Result<Option<String>> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let repo = Git2Repo::open(path)?;
            let head = match repo.head() {
                Ok(head) => head,
                Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            Ok(head.shorthand().map(|s| s.to_string()))
        })
        .await
        .map_err(|_| GitError::NotARepo)?
    }

    /// Get the workdir path
    pub async fn workdir(&self) -> Result<Option<PathBuf>> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let repo = Git2Repo::open(path)?;
            Ok(repo.workdir().map(|p| p.to_path_buf()))
        })
        .await
        .map_err(|_| GitError::NotARepo)?
    }

    /// Number of tags in the repository
    pub async fn tag_count(&self) -> Result<usize> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let repo = Git2Repo::open(path)?;
            Ok(repo.tag_names(None)?.len())
        })
        .await
        .map_err(|_| GitError::NotARepo)?
    }

    /// Name, branch and tag count in one call
    pub async fn summary(&self) -> Result<RepoSummary> {
        let workdir = self.workdir().await?.unwrap_or_else(|| self.path.clone());
        let name = workdir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Repository".to_string());

        Ok(RepoSummary {
            name,
            branch: self.current_branch().await?,
            tag_count: self.tag_count().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_repo() -> (TempDir, Repository) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path();

        // Create a git repository
        let repo = Git2Repo::init(repo_path).unwrap();

        // Create an initial commit
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
        let tree_id = {
            let mut index = repo.index().unwrap();
            index.write_tree().unwrap()
        };
        let tree = repo.find_tree(tree_id).unwrap();
        let commit_id = repo
            .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();
        let commit = repo.find_object(commit_id, None).unwrap();
        repo.tag_lightweight("v0.1.0", &commit, false).unwrap();

        let our_repo = Repository::open(repo_path).await.unwrap();
        (temp_dir, our_repo)
    }

    #[tokio::test]
    async fn test_open_repository() {
        let (_temp_dir, repo) = create_test_repo().await;
        assert!(repo.path().exists());
    }

    #[tokio::test]
    async fn test_current_branch() {
        let (_temp_dir, repo) = create_test_repo().await;
        let branch = repo.current_branch().await.unwrap();
        // Default branch is usually "master" or "main"
        let branch_name = branch.unwrap();
        assert!(branch_name == "master" || branch_name == "main");
    }

    #[tokio::test]
    async fn test_unborn_branch_is_none() {
        let temp_dir = TempDir::new().unwrap();
        Git2Repo::init(temp_dir.path()).unwrap();
        let repo = Repository::open(temp_dir.path()).await.unwrap();
        assert_eq!(repo.current_branch().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_summary() {
        let (temp_dir, repo) = create_test_repo().await;
        let summary = repo.summary().await.unwrap();
        let expected = temp_dir
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert_eq!(summary.name, expected);
        assert_eq!(summary.tag_count, 1);
        assert!(summary.line().ends_with("| 1 tags"));
    }

    #[tokio::test]
    async fn test_discover() {
        let (temp_dir, _repo) = create_test_repo().await;

        // Create a subdirectory and try to discover from there
        let subdir = temp_dir.path().join("subdir");
        std::fs::create_dir(&subdir).unwrap();

        let discovered = Repository::discover_from(&subdir).await;
        assert!(discovered.is_ok());
    }

    #[tokio::test]
    async fn test_discover_outside_repo() {
        let temp_dir = TempDir::new().unwrap();
        let result = Repository::discover_from(temp_dir.path()).await;
        assert!(matches!(result, Err(GitError::NotARepo)));
    }

    #[tokio::test]
    async fn test_open_nonexistent() {
        let result = Repository::open("/nonexistent/path").await;
        assert!(result.is_err());
    }
}
