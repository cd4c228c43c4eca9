//! Records fetched from the hosting service.
//!
//! Every record here is immutable once fetched. Branch records carry no
//! activity timestamp of their own; they are paired with the head commit's
//! [`CommitInfo`] to form a [`DecoratedBranch`] before classification.

mod branch;
mod commit;
mod pull_request;
mod target;

pub use branch::{BranchRecord, DecoratedBranch};
pub use commit::{CommitInfo, UNKNOWN_IDENTITY};
pub use pull_request::PullRequestRecord;
pub use target::{RepositoryRecord, ScanTarget};
