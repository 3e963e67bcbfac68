use serde::{Deserialize, Serialize};

/// The single persisted GitHub "connection" record. At most one instance
/// lives in storage at a time; saving replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubConfig {
    /// Personal access token, never transmitted anywhere but api.github.com
    pub token: String,
    /// Repository owner (user or organization login)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// GitHub Project (v2) node id for board integration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// State of a GitHub issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Read-only projection of an issue as returned by the GitHub API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIssue {
    pub id: i64,
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: IssueState,
}
