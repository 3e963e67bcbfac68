//! GitHub API adapter.
//!
//! Thin client over the fixed REST/GraphQL endpoints: token verification,
//! repository and project listing, and issue creation. Nothing here
//! retries; listing failures degrade to empty results and only the
//! single-issue-creation boundary surfaces an error.


use crate::application::export::{github_issue_body, github_labels};
use crate::config::Brand;
use crate::domain::{Annotation, GitHubConfig, GitHubError, GitHubIssue};
use crate::infra::storage::StorageArea;
use anyhow::Context;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

const GITHUB_API: &str = "https://api.github.com";
const ACCEPT_JSON: &str = "application/vnd.github.v3+json";

/// Result of a token check. Never an error: invalid tokens and network
/// failures both come back as `valid: false` with a message.
#[derive(Debug, Clone, Default)]
pub struct TokenVerification {
    pub valid: bool,
    pub username: Option<String>,
    pub scopes: Vec<String>,
    pub error: Option<String>,
}

/// One repository the token can reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub owner: String,
    pub name: String,
    pub full_name: String,
}

/// One project board visible to the token.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// Outcome of a batch issue creation. Order matches the input order.
#[derive(Debug, Default)]
pub struct IssueBatch {
    pub created: Vec<GitHubIssue>,
    pub failed: Vec<IssueFailure>,
}

/// A single failed creation, paired with the annotation that caused it.
#[derive(Debug)]
pub struct IssueFailure {
    pub annotation: Annotation,
    pub error: String,
}

/// `owner`/`repo` pair parsed from a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

lazy_static! {
    static ref GH_REMOTE_RE: Regex =
        Regex::new(r"github\.com[:/]([^/]+)/([^/.]+)(?:\.git)?$").expect("github remote regex");
    static ref GH_WEB_RE: Regex =
        Regex::new(r"github\.com/([^/]+)/([^/]+)/?$").expect("github web url regex");
}

/// Extract `owner/repo` from common GitHub URL shapes (https, ssh, with
/// or without `.git`).
pub fn parse_github_url(url: &str) -> Option<RepoRef> {
    let trimmed = url.trim();
    for re in [&*GH_REMOTE_RE, &*GH_WEB_RE] {
        if let Some(caps) = re.captures(trimmed) {
            return Some(RepoRef {
                owner: caps.get(1)?.as_str().to_string(),
                repo: caps.get(2)?.as_str().to_string(),
            });
        }
    }
    None
}

/// The seam batch creation runs through, so partial-failure handling is
/// testable without a network.
#[async_trait]
pub trait IssueCreator: Send + Sync {
    async fn create_issue(
        &self,
        config: &GitHubConfig,
        annotation: &Annotation,
    ) -> Result<GitHubIssue, GitHubError>;
}

/// Client over the GitHub REST and GraphQL APIs.
#[derive(Debug, Clone, Default)]
pub struct GitHubClient {
    http: reqwest::Client,
}

impl GitHubClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    fn get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{GITHUB_API}{path}"))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .header(reqwest::header::USER_AGENT, "grabqa")
    }

    fn post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{GITHUB_API}{path}"))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .header(reqwest::header::USER_AGENT, "grabqa")
    }

    /// Check that a token authenticates and report who it belongs to.
    pub async fn verify_token(&self, token: &str) -> TokenVerification {
        #[derive(Deserialize)]
        struct User {
            login: String,
        }

        let response = match self.get("/user", token).send().await {
            Ok(response) => response,
            Err(err) => {
                return TokenVerification {
                    error: Some(err.to_string()),
                    ..Default::default()
                };
            }
        };

        if !response.status().is_success() {
            return TokenVerification {
                error: Some("Invalid token".to_string()),
                ..Default::default()
            };
        }

        let scopes = response
            .headers()
            .get("x-oauth-scopes")
            .and_then(|value| value.to_str().ok())
            .map(parse_scopes)
            .unwrap_or_default();

        match response.json::<User>().await {
            Ok(user) => TokenVerification {
                valid: true,
                username: Some(user.login),
                scopes,
                error: None,
            },
            Err(err) => TokenVerification {
                error: Some(err.to_string()),
                ..Default::default()
            },
        }
    }

    /// Up to 50 most-recently-pushed repositories the token can reach.
    /// Empty on any failure; callers cannot distinguish "no repos" from
    /// "request failed".
    pub async fn list_user_repos(&self, token: &str) -> Vec<RepoSummary> {
        #[derive(Deserialize)]
        struct RepoOwner {
            login: String,
        }
        #[derive(Deserialize)]
        struct Repo {
            owner: RepoOwner,
            name: String,
            full_name: String,
        }

        let response = match self
            .get("/user/repos?sort=pushed&per_page=50", token)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            _ => return Vec::new(),
        };

        response
            .json::<Vec<Repo>>()
            .await
            .map(|repos| {
                repos
                    .into_iter()
                    .map(|r| RepoSummary {
                        owner: r.owner.login,
                        name: r.name,
                        full_name: r.full_name,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Project boards for a login, querying it both as a user and as an
    /// organization and merging whichever side answered.
    pub async fn list_projects(&self, token: &str, owner: &str) -> Vec<ProjectSummary> {
        let query = r#"
            query($owner: String!) {
              user(login: $owner) {
                projectsV2(first: 20) { nodes { id title url } }
              }
              organization(login: $owner) {
                projectsV2(first: 20) { nodes { id title url } }
              }
            }
        "#;

        let payload = serde_json::json!({
            "query": query,
            "variables": { "owner": owner },
        });

        let response = match self.post("/graphql", token).json(&payload).send().await {
            Ok(response) if response.status().is_success() => response,
            _ => return Vec::new(),
        };

        let data = match response.json::<serde_json::Value>().await {
            Ok(data) => data,
            Err(_) => return Vec::new(),
        };

        let mut projects = Vec::new();
        for side in ["user", "organization"] {
            let nodes = data
                .pointer(&format!("/data/{side}/projectsV2/nodes"))
                .and_then(serde_json::Value::as_array);
            if let Some(nodes) = nodes {
                for node in nodes {
                    if let Ok(project) = serde_json::from_value(node.clone()) {
                        projects.push(project);
                    }
                }
            }
        }
        projects
    }

    /// Add an issue to a GitHub Project (v2) board. Requires the issue's
    /// GraphQL content id. Not wired into any export flow; failures are
    /// logged, not surfaced.
    pub async fn add_issue_to_project(&self, config: &GitHubConfig, content_id: &str) {
        let Some(project_id) = &config.project_id else {
            return;
        };

        let query = r#"
            mutation($projectId: ID!, $contentId: ID!) {
              addProjectV2ItemById(input: {projectId: $projectId, contentId: $contentId}) {
                item { id }
              }
            }
        "#;

        let payload = serde_json::json!({
            "query": query,
            "variables": { "projectId": project_id, "contentId": content_id },
        });

        match self.post("/graphql", &config.token).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {}
            _ => log::warn!("failed to add issue to project"),
        }
    }
}

#[async_trait]
impl IssueCreator for GitHubClient {
    /// Create one issue for an annotation: `[QA]`-prefixed title, the
    /// standard body, the standard labels.
    async fn create_issue(
        &self,
        config: &GitHubConfig,
        annotation: &Annotation,
    ) -> Result<GitHubIssue, GitHubError> {
        let payload = serde_json::json!({
            "title": format!("[QA] {}", annotation.title),
            "body": github_issue_body(annotation),
            "labels": github_labels(annotation),
        });

        let response = self
            .post(
                &format!("/repos/{}/{}/issues", config.owner, config.repo),
                &config.token,
            )
            .json(&payload)
            .send()
            .await
            .context("send issue creation request")?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("message")?.as_str().map(str::to_string))
                .unwrap_or_else(|| format!("GitHub API error: {}", status.as_u16()));
            return Err(GitHubError::Api(message));
        }

        let issue = response
            .json::<GitHubIssue>()
            .await
            .context("parse issue creation response")?;
        Ok(issue)
    }
}

/// Create one issue per annotation, strictly sequentially. A failure is
/// recorded alongside its annotation and never aborts the batch.
pub async fn create_issues(
    creator: &dyn IssueCreator,
    config: &GitHubConfig,
    annotations: &[Annotation],
) -> IssueBatch {
    let mut batch = IssueBatch::default();

    for annotation in annotations {
        match creator.create_issue(config, annotation).await {
            Ok(issue) => batch.created.push(issue),
            Err(err) => batch.failed.push(IssueFailure {
                annotation: annotation.clone(),
                error: err.to_string(),
            }),
        }
    }

    batch
}

fn parse_scopes(header: &str) -> Vec<String> {
    header
        .split(',')
        .map(str::trim)
        .filter(|scope| !scope.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load the persisted GitHub connection, if one exists.
pub fn load_github_config(storage: &dyn StorageArea, brand: &Brand) -> Option<GitHubConfig> {
    let raw = storage.get(&brand.github_config_key())?;
    match serde_json::from_str(&raw) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("failed to load GitHub config from storage: {err}");
            None
        }
    }
}

/// Persist the GitHub connection, replacing any prior value.
pub fn save_github_config(storage: &mut dyn StorageArea, brand: &Brand, config: &GitHubConfig) {
    let raw = match serde_json::to_string(config) {
        Ok(raw) => raw,
        Err(err) => {
            log::error!("failed to serialize GitHub config: {err}");
            return;
        }
    };
    if let Err(err) = storage.set(&brand.github_config_key(), &raw) {
        log::error!("failed to save GitHub config: {err}");
    }
}

/// Remove the persisted GitHub connection wholesale.
pub fn clear_github_config(storage: &mut dyn StorageArea, brand: &Brand) {
    storage.remove(&brand.github_config_key());
}
