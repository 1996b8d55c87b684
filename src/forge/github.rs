//! forge::github
//!
//! GitHub forge implementation using the REST API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub. Issues and pull
//! requests are listed from `/repos/{owner}/{repo}/issues` and
//! `/repos/{owner}/{repo}/pulls`; the next page is taken from the `Link`
//! response header.
//!
//! # Authentication
//!
//! [`Credentials`] are attached to every request: bearer auth for tokens,
//! basic auth for username/password, nothing when anonymous.
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation:
//! - Returns `ForgeError::RateLimited` when limits are hit
//! - Does not retry (the export stops)
//!
//! # Example
//!
//! ```ignore
//! use ghexport::auth::Credentials;
//! use ghexport::core::types::{Category, PageCursor, Scope};
//! use ghexport::forge::github::GitHubForge;
//! use ghexport::forge::{Forge, ListRequest};
//!
//! let forge = GitHubForge::new(Scope::new("golang", "go")?, Credentials::Anonymous);
//! let page = forge
//!     .list_page(Category::Issue, &ListRequest::new(PageCursor::first(), 100))
//!     .await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT, LINK, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::traits::{Forge, ForgeError, ItemPage, ListRequest};
use crate::auth::Credentials;
use crate::core::types::{Author, Category, Item, PageCursor, Scope};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("ghexport/", env!("CARGO_PKG_VERSION"));

/// REST API version pinned for every request.
const API_VERSION: &str = "2022-11-28";

/// Listing order the cutoff traversal relies on: every state, newest first.
const LIST_ORDER: [(&str, &str); 3] = [
    ("state", "all"),
    ("sort", "created"),
    ("direction", "desc"),
];

/// GitHub forge implementation.
///
/// Implements the `Forge` trait for GitHub using the REST API.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Credentials attached to each request
    credentials: Credentials,
    /// Repository being exported
    scope: Scope,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing credentials
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("auth", &self.credentials.kind())
            .field("scope", &self.scope)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a GitHub forge for `scope` against api.github.com.
    pub fn new(scope: Scope, credentials: Credentials) -> Self {
        Self::with_api_base(scope, credentials, DEFAULT_API_BASE)
    }

    /// Create a GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installations
    /// (e.g. `https://github.example.com/api/v3`).
    pub fn with_api_base(
        scope: Scope,
        credentials: Credentials,
        api_base: impl Into<String>,
    ) -> Self {
        let api_base: String = api_base.into();
        Self {
            client: Client::new(),
            credentials,
            scope,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Get the repository being exported.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base,
            self.scope.owner(),
            self.scope.repo(),
            path
        )
    }

    /// Attach headers and credentials to a request.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header("X-GitHub-Api-Version", API_VERSION);

        match &self.credentials {
            Credentials::Anonymous => builder,
            Credentials::Token(token) => builder.bearer_auth(token),
            Credentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ForgeError> {
        let rate_limit_exhausted = rate_limit_exhausted(response.headers());

        // Try to get error message from body
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                ForgeError::AuthFailed("Invalid or expired credentials".into())
            }
            StatusCode::FORBIDDEN if rate_limit_exhausted => ForgeError::RateLimited,
            StatusCode::FORBIDDEN => {
                ForgeError::AuthFailed(format!("Permission denied: {}", message))
            }
            StatusCode::NOT_FOUND => ForgeError::NotFound(format!("{}: {}", self.scope, message)),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ if status.is_server_error() => ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("GitHub server error: {}", message),
            },
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn list_page(
        &self,
        category: Category,
        request: &ListRequest,
    ) -> Result<ItemPage, ForgeError> {
        let url = self.repo_url(category.endpoint());
        let per_page = request.per_page.to_string();
        let page = request.cursor.number().to_string();

        tracing::debug!(
            %category,
            scope = %self.scope,
            page = request.cursor.number(),
            per_page = request.per_page,
            "requesting page"
        );

        let response = self
            .authorize(self.client.get(&url))
            .query(&LIST_ORDER)
            .query(&[("per_page", per_page.as_str()), ("page", page.as_str())])
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return self.handle_error_response(response, status).await;
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_page);

        let raw: Vec<GitHubListItem> = response.json().await.map_err(|e| ForgeError::ApiError {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })?;

        let items = raw
            .into_iter()
            .map(Item::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            %category,
            items = items.len(),
            next = next.map(|c| c.number()),
            "received page"
        );

        Ok(ItemPage { items, next })
    }
}

/// Whether the rate-limit headers say no requests are left.
fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false)
}

// --------------------------------------------------------------------------
// Link Header Parsing
// --------------------------------------------------------------------------

/// Extract the next page from a `Link` header.
///
/// GitHub sends links such as
/// `<https://api.github.com/repos/o/r/issues?page=2&per_page=100>; rel="next", <...>; rel="last"`.
///
/// # Returns
///
/// The cursor of the `rel="next"` link, or `None` if there is no next
/// link or its URL carries no valid `page` parameter.
///
/// # Example
///
/// ```
/// use ghexport::forge::github::parse_next_page;
///
/// let link = r#"<https://api.github.com/repositories/1/issues?page=3>; rel="next", <https://api.github.com/repositories/1/issues?page=9>; rel="last""#;
/// assert_eq!(parse_next_page(link).unwrap().number(), 3);
/// assert!(parse_next_page(r#"<https://x/issues?page=1>; rel="prev""#).is_none());
/// ```
pub fn parse_next_page(link_header: &str) -> Option<PageCursor> {
    link_header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|p| {
            let p = p.trim();
            p == "rel=\"next\"" || p == "rel=next"
        });
        if !is_next {
            return None;
        }

        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let query = url.split_once('?')?.1;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "page")
            .and_then(|(_, value)| value.parse::<u32>().ok())
            .and_then(PageCursor::page)
    })
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Issue or PR list entry.
///
/// Fields are optional on the wire so that a missing field produces a
/// precise `InvalidItem` error instead of a generic decoding failure.
#[derive(Deserialize)]
struct GitHubListItem {
    number: Option<u64>,
    title: Option<String>,
    html_url: Option<String>,
    created_at: Option<DateTime<Utc>>,
    user: Option<GitHubUser>,
}

/// Item author.
#[derive(Deserialize)]
struct GitHubUser {
    login: Option<String>,
    html_url: Option<String>,
}

impl TryFrom<GitHubListItem> for Item {
    type Error = ForgeError;

    fn try_from(gh: GitHubListItem) -> Result<Self, Self::Error> {
        let number = gh
            .number
            .ok_or_else(|| ForgeError::InvalidItem("item without a number".into()))?;
        let missing =
            |field: &str| ForgeError::InvalidItem(format!("#{} missing {}", number, field));

        let user = gh.user.ok_or_else(|| missing("user"))?;

        Ok(Item {
            number,
            title: gh.title.ok_or_else(|| missing("title"))?,
            url: gh.html_url.ok_or_else(|| missing("html_url"))?,
            created_at: gh.created_at.ok_or_else(|| missing("created_at"))?,
            author: Author {
                login: user.login.ok_or_else(|| missing("user.login"))?,
                url: user.html_url.ok_or_else(|| missing("user.html_url"))?,
            },
        })
    }
}
