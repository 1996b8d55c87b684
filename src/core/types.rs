//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Scope`] - Validated `(owner, repo)` pair identifying a collection
//! - [`Category`] - Issue or pull request, with its output label
//! - [`Item`] - Typed issue/PR record consumed by the traversal
//! - [`Author`] - Item author (login + profile URL)
//! - [`Cutoff`] - Lower time bound for an export
//! - [`PageCursor`] - Opaque pointer to the next page of a listing
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so the traversal never deals with half-filled
//! payloads or empty repository names.
//!
//! # Examples
//!
//! ```
//! use ghexport::core::types::{Cutoff, Scope};
//!
//! let scope = Scope::new("acme", "widgets").unwrap();
//! assert_eq!(scope.to_string(), "acme/widgets");
//!
//! let cutoff = Cutoff::parse_date("2024-01-01").unwrap();
//! assert_eq!(cutoff.to_string(), "2024-01-01T00:00:00Z");
//!
//! assert!(Scope::new("", "widgets").is_err());
//! assert!(Cutoff::parse_date("01/01/2024").is_err());
//! ```

use chrono::{DateTime, Months, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format accepted for `--since` values.
pub const SINCE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    #[error("invalid since date '{value}': expected YYYY-MM-DD")]
    InvalidCutoff { value: String },
}

/// The `(owner, repository)` pair identifying which collection to export.
///
/// # Example
///
/// ```
/// use ghexport::core::types::Scope;
///
/// let scope = Scope::new("golang", "go").unwrap();
/// assert_eq!(scope.owner(), "golang");
/// assert_eq!(scope.repo(), "go");
///
/// assert!(Scope::new("golang", "").is_err());
/// assert!(Scope::new("a/b", "go").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    owner: String,
    repo: String,
}

impl Scope {
    /// Create a new validated scope.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidScope` if either part is empty, is `.` or
    /// `..`, or holds a character outside `[A-Za-z0-9._-]`. Both parts are
    /// pasted into request paths, so nothing else may get through.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Result<Self, TypeError> {
        let owner = owner.into();
        let repo = repo.into();
        Self::check_owner(&owner)?;
        Self::check_repo(&repo)?;
        Ok(Self { owner, repo })
    }

    /// Validate an owner name on its own.
    pub fn check_owner(owner: &str) -> Result<(), TypeError> {
        Self::validate_part("owner", owner)
    }

    /// Validate a repository name on its own.
    pub fn check_repo(repo: &str) -> Result<(), TypeError> {
        Self::validate_part("repository", repo)
    }

    fn validate_part(what: &str, value: &str) -> Result<(), TypeError> {
        if value.is_empty() {
            return Err(TypeError::InvalidScope(format!("{} cannot be empty", what)));
        }
        if value == "." || value == ".." {
            return Err(TypeError::InvalidScope(format!("{} cannot be '{}'", what, value)));
        }
        if let Some(c) = value.chars().find(|c| !is_name_char(*c)) {
            return Err(TypeError::InvalidScope(format!(
                "{} '{}' cannot contain {:?}",
                what,
                value.escape_debug(),
                c
            )));
        }
        Ok(())
    }

    /// Repository owner (user or organization).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

/// Characters GitHub allows in account and repository names.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Which collection an item comes from.
///
/// Both categories follow the same traversal; they differ only in the
/// endpoint they are listed from and the label written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Repository issue
    Issue,
    /// Pull request
    PullRequest,
}

impl Category {
    /// All categories, in export order.
    pub const ALL: [Category; 2] = [Category::Issue, Category::PullRequest];

    /// Label written in the output "type" column.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Issue => "Issue",
            Category::PullRequest => "Pull Request",
        }
    }

    /// REST path segment under `/repos/{owner}/{repo}/`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Category::Issue => "issues",
            Category::PullRequest => "pulls",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Author of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Account login
    pub login: String,
    /// Profile page URL
    pub url: String,
}

/// An issue or pull request as consumed by the export.
///
/// Only the fields needed for a row are kept. Forge adapters build this
/// from their wire payloads and reject payloads missing any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Issue/PR number
    pub number: u64,
    /// Title
    pub title: String,
    /// Web URL for viewing the item
    pub url: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Who opened it
    pub author: Author,
}

/// The lower time bound of an export.
///
/// Items created strictly before the cutoff are excluded and end the
/// traversal of their collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cutoff(DateTime<Utc>);

impl Cutoff {
    /// Create a cutoff at an exact instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Create a cutoff at midnight UTC of the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Parse a date-only `YYYY-MM-DD` value.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCutoff` if the value is not a valid date
    /// in that format.
    pub fn parse_date(value: &str) -> Result<Self, TypeError> {
        NaiveDate::parse_from_str(value.trim(), SINCE_DATE_FORMAT)
            .map(Self::from_date)
            .map_err(|_| TypeError::InvalidCutoff {
                value: value.to_string(),
            })
    }

    /// Default cutoff: one calendar month before `now`, at midnight UTC.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use ghexport::core::types::Cutoff;
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 3, 31, 15, 0, 0).unwrap();
    /// assert_eq!(Cutoff::one_month_before(now).to_string(), "2024-02-29T00:00:00Z");
    /// ```
    pub fn one_month_before(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let date = today.checked_sub_months(Months::new(1)).unwrap_or(today);
        Self::from_date(date)
    }

    /// The cutoff instant.
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Whether an item created at `created_at` falls before the cutoff.
    pub fn excludes(&self, created_at: DateTime<Utc>) -> bool {
        created_at < self.0
    }
}

impl std::fmt::Display for Cutoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Opaque pointer to a page of a paginated listing.
///
/// Backed by a 1-based page number, the scheme the GitHub REST API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageCursor(u32);

impl PageCursor {
    /// Cursor for the first page.
    pub fn first() -> Self {
        Self(1)
    }

    /// Cursor for a specific page number. Page numbers start at 1.
    pub fn page(number: u32) -> Option<Self> {
        (number >= 1).then_some(Self(number))
    }

    /// The page number this cursor points at.
    pub fn number(&self) -> u32 {
        self.0
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::first()
    }
}

impl std::fmt::Display for PageCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {}", self.0)
    }
}
