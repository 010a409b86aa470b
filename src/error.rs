use thiserror::Error;

/// Grammar accepted by [`crate::domain::SemanticVersion::parse`], quoted in format errors.
pub const VERSION_GRAMMAR: &str = "<major>.<minor>.<patch>[-(alpha|beta|rc).<counter>]";

/// Unified error type for release-flow operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version format error: {0} (expected {VERSION_GRAMMAR})")]
    Version(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Branch '{0}' already exists")]
    BranchExists(String),

    #[error("Tag '{0}' already exists")]
    TagExists(String),

    #[error("Ancestor is ambiguous between {0}; pass -a/--ancestor explicitly")]
    AmbiguousAncestor(String),

    #[error("No ancestor found among {0}; pass -a/--ancestor explicitly")]
    AncestorNotFound(String),

    #[error("Merge failed: {0}")]
    Merge(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Build step failed: {0}")]
    Build(String),

    #[error("Issue tracker error: {0}")]
    IssueTracker(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-flow
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        ReleaseError::Precondition(msg.into())
    }

    pub fn merge(msg: impl Into<String>) -> Self {
        ReleaseError::Merge(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    pub fn build(msg: impl Into<String>) -> Self {
        ReleaseError::Build(msg.into())
    }

    pub fn issue_tracker(msg: impl Into<String>) -> Self {
        ReleaseError::IssueTracker(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        ReleaseError::Input(msg.into())
    }

    /// Collision errors abort before anything is mutated.
    pub fn is_collision(&self) -> bool {
        matches!(self, ReleaseError::BranchExists(_) | ReleaseError::TagExists(_))
    }
}
