#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod fetch;
pub mod github;
pub mod model;
pub mod rate_limit;
pub mod resolve;
pub mod runner;
pub mod summary;

pub use aggregate::{accumulate, Bucketed, Flagged, ScanResult, UserBuckets};
pub use classify::{classify_age, days_until_stale, Classifier, Exemption, Verdict};
pub use config::{
    parse_name_list, ConfigError, ConfigFile, ScanConfig, Settings, ThresholdPolicy,
};
pub use fetch::{
    FetchError, PageFetcher, PageResponse, PageSource, Pagination, RawRecord, Resource,
    ResourceKind,
};
pub use github::GitHubClient;
pub use model::{
    BranchRecord, CommitInfo, DecoratedBranch, PullRequestRecord, RepositoryRecord, ScanTarget,
};
pub use rate_limit::{check_core_rate_limit, wait_if_needed, RateLimitInfo, RequestGate};
pub use resolve::{CachingResolver, CommitResolver};
pub use runner::{GitHubRunner, Runner, RunnerConfig, RunnerError, ScanReport};
pub use summary::{RepositoryOutcome, RunSummary};
