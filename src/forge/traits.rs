//! forge::traits
//!
//! Forge trait definition for listing a repository's history.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! One call is one remote request for one page; pagination policy lives
//! in the engine, not here.
//!
//! # Example
//!
//! ```ignore
//! use ghexport::core::types::{Category, PageCursor};
//! use ghexport::forge::{Forge, ForgeError, ListRequest};
//!
//! async fn first_issues(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     let page = forge
//!         .list_page(Category::Issue, &ListRequest::new(PageCursor::first(), 100))
//!         .await?;
//!     for item in &page.items {
//!         println!("#{} {}", item.number, item.title);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{Category, Item, PageCursor};

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// A listed item is missing a required field.
    #[error("invalid item in response: {0}")]
    InvalidItem(String),
}

/// Request for one page of a listing.
///
/// Listings always cover every state, newest first by creation time;
/// only the page and its size vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest {
    /// Page to fetch
    pub cursor: PageCursor,
    /// Maximum items per page
    pub per_page: u8,
}

impl ListRequest {
    /// Request page `cursor` holding at most `per_page` items.
    pub fn new(cursor: PageCursor, per_page: u8) -> Self {
        Self { cursor, per_page }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPage {
    /// Items on this page, in the order the forge returned them
    pub items: Vec<Item>,
    /// Cursor of the next page, `None` on the last page
    pub next: Option<PageCursor>,
}

impl ItemPage {
    /// Whether this is the last page.
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// The Forge trait for listing repository history.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// Every failure is terminal for the export; callers do not retry.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Fetch one page of issues or pull requests.
    ///
    /// Issues exactly one remote request.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the credentials are rejected
    /// - `NotFound` if the repository does not exist or is not visible
    /// - `RateLimited` if the API refuses further requests
    /// - `InvalidItem` if an item lacks a required field
    /// - `NetworkError` / `ApiError` for transport and other HTTP failures
    async fn list_page(
        &self,
        category: Category,
        request: &ListRequest,
    ) -> Result<ItemPage, ForgeError>;
}
