//! forge
//!
//! Abstraction for the remote issue tracker.
//!
//! # Architecture
//!
//! The `Forge` trait is the single seam between the export engine and the
//! network. The engine asks for one page of one category at a time and
//! never sees request or response shapes.
//!
//! - Forge failures abort the export; nothing is retried
//! - Items leave the forge already validated
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub REST implementation
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```no_run
//! use ghexport::auth::Credentials;
//! use ghexport::core::types::{Category, PageCursor, Scope};
//! use ghexport::forge::github::GitHubForge;
//! use ghexport::forge::{Forge, ListRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scope = Scope::new("golang", "go")?;
//! let forge = GitHubForge::new(scope, Credentials::Anonymous);
//!
//! let page = forge
//!     .list_page(Category::Issue, &ListRequest::new(PageCursor::first(), 100))
//!     .await?;
//!
//! for item in &page.items {
//!     println!("#{} {}", item.number, item.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;
