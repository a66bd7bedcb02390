//! GitHub client and organization operations

pub mod github_manager;
pub mod org_operations;

pub use github_manager::{
    GitHubClient, GitHubConfig, DEFAULT_API_URL, DEFAULT_API_VERSION, MAX_PER_PAGE,
};
pub use org_operations::OrgClient;
