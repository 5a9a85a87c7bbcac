// Git command construction, execution and the operations built on them

pub mod changelog;
pub mod clone;
pub mod command;
pub mod error;
pub mod release;
pub mod repository;
pub mod settings;
pub mod ssh;
pub mod tags;

pub use command::{CommandOutput, GitCli, GitCommand};
pub use error::{GitError, Result};
pub use release::{Platform, ReleaseDraft, ReleaseKind};
pub use repository::{RepoSummary, Repository};
pub use settings::{Alias, CurrentConfig, GlobalSettings, PushStrategy, UserIdentity};
pub use ssh::SshKeyStatus;
pub use tags::{TagEntry, TagKind, TagSort};
