//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub:
//! - Repositories: `GET/PATCH /repos/{owner}/{repo}`, created via
//!   `POST /orgs/{owner}/repos` with a fallback to `POST /user/repos`
//!   when the owner is not an organization
//! - Branch protection: `GET/PUT /repos/{owner}/{repo}/branches/{pattern}/protection`
//! - Labels: `GET/POST/PATCH` under `/repos/{owner}/{repo}/labels`
//!
//! # Authentication
//!
//! A personal access token or App installation token, supplied by the
//! caller (the CLI reads it from the environment variable named in the
//! manifest).
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation returns
//! `ForgeError::RateLimited` when limits are hit and does not retry;
//! retrying is the caller's decision.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::traits::{
    ApplyProtectionRequest, CreateLabelRequest, CreateRepositoryRequest, Forge, ForgeError,
    RemoteLabel, RemoteProtection, RemoteRepository, UpdateLabelRequest, UpdateRepositoryRequest,
};

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "forgeform-cli";

/// GitHub forge implementation.
///
/// Bound to a single `owner/repo` pair; all trait operations act on that
/// repository.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// API token
    token: String,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token or GitHub App token
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Create a new GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installations
    /// (e.g., `https://github.example.com/api/v3`).
    pub fn with_api_base(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    fn repo_url(&self, suffix: &[&str]) -> Result<Url, ForgeError> {
        let base = format!("{}/repos/{}/{}", self.api_base, self.owner, self.repo);
        let mut url =
            Url::parse(&base).map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ForgeError::NetworkError("API base cannot be a base URL".into()))?;
            for segment in suffix {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    async fn error_from_response(response: Response) -> ForgeError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed(message),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                if message.to_lowercase().contains("rate limit") {
                    ForgeError::RateLimited
                } else {
                    ForgeError::AuthFailed(message)
                }
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn read_repository(&self, response: Response) -> Result<RemoteRepository, ForgeError> {
        let repo: RepoResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Ok(repo.into_remote())
    }
}

fn network_error(err: reqwest::Error) -> ForgeError {
    ForgeError::NetworkError(err.to_string())
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_repository(&self) -> Result<Option<RemoteRepository>, ForgeError> {
        let url = self.repo_url(&[])?;
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(network_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(Some(self.read_repository(response).await?))
    }

    async fn create_repository(
        &self,
        request: CreateRepositoryRequest,
    ) -> Result<RemoteRepository, ForgeError> {
        let body = CreateRepoBody::from_request(&request);

        // Organization endpoint first; fall back to the user endpoint when
        // the owner is a user account.
        let org_url = format!("{}/orgs/{}/repos", self.api_base, self.owner);
        let response = self
            .client
            .post(&org_url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            let user_url = format!("{}/user/repos", self.api_base);
            let response = self
                .client
                .post(&user_url)
                .headers(self.headers()?)
                .json(&body)
                .send()
                .await
                .map_err(network_error)?;
            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }
            return self.read_repository(response).await;
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        self.read_repository(response).await
    }

    async fn update_repository(
        &self,
        request: UpdateRepositoryRequest,
    ) -> Result<RemoteRepository, ForgeError> {
        let url = self.repo_url(&[])?;
        let body = UpdateRepoBody {
            description: request.description.clone(),
            visibility: request.visibility.clone(),
            allow_auto_merge: request.allow_auto_merge,
            allow_squash_merge: request.allow_squash_merge,
            allow_rebase_merge: request.allow_rebase_merge,
            delete_branch_on_merge: request.delete_branch_on_merge,
            has_downloads: request.has_downloads,
            has_issues: request.has_issues,
            has_projects: request.has_projects,
            default_branch: None,
        };
        let response = self
            .client
            .patch(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        self.read_repository(response).await
    }

    async fn set_default_branch(&self, branch: &str) -> Result<(), ForgeError> {
        let url = self.repo_url(&[])?;
        let body = serde_json::json!({ "default_branch": branch });
        let response = self
            .client
            .patch(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    async fn get_branch_protection(
        &self,
        pattern: &str,
    ) -> Result<Option<RemoteProtection>, ForgeError> {
        let url = self.repo_url(&["branches", pattern, "protection"])?;
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(network_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let protection: ProtectionResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Ok(Some(protection.into_remote(pattern)))
    }

    async fn apply_branch_protection(
        &self,
        request: ApplyProtectionRequest,
    ) -> Result<(), ForgeError> {
        let url = self.repo_url(&["branches", &request.pattern, "protection"])?;
        let body = ProtectionBody {
            required_status_checks: Some(StatusChecksBody {
                strict: request.strict_status_checks,
                contexts: request.required_status_checks.clone(),
            }),
            enforce_admins: request.enforce_admins,
            required_pull_request_reviews: Some(ReviewsBody {
                required_approving_review_count: request.required_approving_review_count,
            }),
            restrictions: None,
            required_conversation_resolution: request.require_conversation_resolution,
        };
        let response = self
            .client
            .put(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        Ok(())
    }

    async fn get_label(&self, name: &str) -> Result<Option<RemoteLabel>, ForgeError> {
        let url = self.repo_url(&["labels", name])?;
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(network_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let label: LabelResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Ok(Some(label.into_remote()))
    }

    async fn create_label(&self, request: CreateLabelRequest) -> Result<RemoteLabel, ForgeError> {
        let url = self.repo_url(&["labels"])?;
        let body = LabelBody {
            name: request.name.clone(),
            color: request.color.clone(),
            description: request.description.clone(),
        };
        let response = self
            .client
            .post(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let label: LabelResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Ok(label.into_remote())
    }

    async fn update_label(&self, request: UpdateLabelRequest) -> Result<RemoteLabel, ForgeError> {
        let url = self.repo_url(&["labels", &request.name])?;
        let body = LabelBody {
            name: request.name.clone(),
            color: request.color.clone(),
            description: request.description.clone(),
        };
        let response = self
            .client
            .patch(url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let label: LabelResponse = response
            .json()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;
        Ok(label.into_remote())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    visibility: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    allow_auto_merge: bool,
    #[serde(default)]
    allow_squash_merge: bool,
    #[serde(default)]
    allow_rebase_merge: bool,
    #[serde(default)]
    delete_branch_on_merge: bool,
    #[serde(default)]
    has_downloads: bool,
    #[serde(default)]
    has_issues: bool,
    #[serde(default)]
    has_projects: bool,
}

impl RepoResponse {
    fn into_remote(self) -> RemoteRepository {
        let visibility = self.visibility.unwrap_or_else(|| {
            if self.private { "private" } else { "public" }.to_string()
        });
        RemoteRepository {
            name: self.name,
            description: self.description.filter(|d| !d.is_empty()),
            visibility,
            default_branch: self.default_branch.unwrap_or_else(|| "main".to_string()),
            allow_auto_merge: self.allow_auto_merge,
            allow_squash_merge: self.allow_squash_merge,
            allow_rebase_merge: self.allow_rebase_merge,
            delete_branch_on_merge: self.delete_branch_on_merge,
            has_downloads: self.has_downloads,
            has_issues: self.has_issues,
            has_projects: self.has_projects,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateRepoBody {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    visibility: String,
    auto_init: bool,
    allow_auto_merge: bool,
    allow_squash_merge: bool,
    allow_rebase_merge: bool,
    delete_branch_on_merge: bool,
    has_downloads: bool,
    has_issues: bool,
    has_projects: bool,
}

impl CreateRepoBody {
    fn from_request(request: &CreateRepositoryRequest) -> Self {
        Self {
            name: request.name.clone(),
            description: request.description.clone(),
            visibility: request.visibility.clone(),
            auto_init: request.auto_init,
            allow_auto_merge: request.allow_auto_merge,
            allow_squash_merge: request.allow_squash_merge,
            allow_rebase_merge: request.allow_rebase_merge,
            delete_branch_on_merge: request.delete_branch_on_merge,
            has_downloads: request.has_downloads,
            has_issues: request.has_issues,
            has_projects: request.has_projects,
        }
    }
}

#[derive(Debug, Serialize)]
struct UpdateRepoBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    visibility: String,
    allow_auto_merge: bool,
    allow_squash_merge: bool,
    allow_rebase_merge: bool,
    delete_branch_on_merge: bool,
    has_downloads: bool,
    has_issues: bool,
    has_projects: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProtectionResponse {
    #[serde(default)]
    required_status_checks: Option<StatusChecksResponse>,
    #[serde(default)]
    required_pull_request_reviews: Option<ReviewsResponse>,
    #[serde(default)]
    required_conversation_resolution: Option<EnabledFlag>,
    #[serde(default)]
    enforce_admins: Option<EnabledFlag>,
}

impl ProtectionResponse {
    fn into_remote(self, pattern: &str) -> RemoteProtection {
        let (strict, contexts) = self
            .required_status_checks
            .map(|c| (c.strict, c.contexts))
            .unwrap_or((false, Vec::new()));
        RemoteProtection {
            pattern: pattern.to_string(),
            require_conversation_resolution: self
                .required_conversation_resolution
                .map(|f| f.enabled)
                .unwrap_or(false),
            required_approving_review_count: self
                .required_pull_request_reviews
                .map(|r| r.required_approving_review_count)
                .unwrap_or(0),
            required_status_checks: contexts,
            strict_status_checks: strict,
            enforce_admins: self.enforce_admins.map(|f| f.enabled).unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusChecksResponse {
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    contexts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    #[serde(default)]
    required_approving_review_count: u8,
}

#[derive(Debug, Deserialize)]
struct EnabledFlag {
    #[serde(default)]
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct ProtectionBody {
    required_status_checks: Option<StatusChecksBody>,
    enforce_admins: bool,
    required_pull_request_reviews: Option<ReviewsBody>,
    restrictions: Option<()>,
    required_conversation_resolution: bool,
}

#[derive(Debug, Serialize)]
struct StatusChecksBody {
    strict: bool,
    contexts: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ReviewsBody {
    required_approving_review_count: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct LabelBody {
    name: String,
    color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    name: String,
    color: String,
    #[serde(default)]
    description: Option<String>,
}

impl LabelResponse {
    fn into_remote(self) -> RemoteLabel {
        RemoteLabel {
            name: self.name,
            color: self.color.to_ascii_lowercase(),
            description: self.description.filter(|d| !d.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_expose_token() {
        let forge = GitHubForge::new("ghp_secret", "owner", "repo");
        let debug = format!("{:?}", forge);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("owner"));
    }

    #[test]
    fn repo_response_visibility_falls_back_to_private_flag() {
        let parsed: RepoResponse = serde_json::from_str(
            r#"{"name": "x", "private": true, "default_branch": "main"}"#,
        )
        .unwrap();
        let remote = parsed.into_remote();
        assert_eq!(remote.visibility, "private");
    }

    #[test]
    fn protection_response_tolerates_missing_sections() {
        let parsed: ProtectionResponse = serde_json::from_str("{}").unwrap();
        let remote = parsed.into_remote("main");
        assert_eq!(remote.pattern, "main");
        assert_eq!(remote.required_approving_review_count, 0);
        assert!(remote.required_status_checks.is_empty());
        assert!(!remote.enforce_admins);
    }

    #[test]
    fn protection_body_serializes_null_restrictions() {
        let body = ProtectionBody {
            required_status_checks: Some(StatusChecksBody {
                strict: false,
                contexts: vec!["Compile and test".to_string()],
            }),
            enforce_admins: false,
            required_pull_request_reviews: Some(ReviewsBody {
                required_approving_review_count: 1,
            }),
            restrictions: None,
            required_conversation_resolution: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("restrictions").unwrap().is_null());
        assert_eq!(
            json["required_status_checks"]["contexts"][0],
            "Compile and test"
        );
    }

    #[test]
    fn label_response_normalizes_color_case() {
        let parsed: LabelResponse =
            serde_json::from_str(r#"{"name": "Critical", "color": "FF0000"}"#).unwrap();
        assert_eq!(parsed.into_remote().color, "ff0000");
    }

    #[test]
    fn repo_url_encodes_path_segments() {
        let forge = GitHubForge::new("t", "owner", "repo");
        let url = forge.repo_url(&["labels", "needs triage"]).unwrap();
        assert!(url.as_str().ends_with("/repos/owner/repo/labels/needs%20triage"));
    }
}
