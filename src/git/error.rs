use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git is not installed or not on PATH")]
    NotInstalled,

    #[error("Not a Git repository")]
    NotARepo,

    #[error("{command} failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error("Tag already exists: {0}")]
    TagExists(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// Shorthand for rejecting blank or malformed user input
    pub fn invalid(message: impl Into<String>) -> Self {
        GitError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message() {
        let err = GitError::CommandFailed {
            command: "git tag -d v1".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "error: tag 'v1' not found.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git tag -d v1 failed (exit status: 1): error: tag 'v1' not found."
        );
    }

    #[test]
    fn test_invalid_input_is_bare_message() {
        let err = GitError::invalid("Please enter a URL");
        assert_eq!(err.to_string(), "Please enter a URL");
    }
}
