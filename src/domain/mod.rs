//! Domain logic - pure business rules independent of git operations

pub mod branch;
pub mod phase;
pub mod prerelease;
pub mod version;

pub use branch::BranchKind;
pub use phase::{classify_continue, classify_release, ContinuePhase, ReleasePhase};
pub use prerelease::PreReleaseStage;
pub use version::{PreRelease, SemanticVersion};
