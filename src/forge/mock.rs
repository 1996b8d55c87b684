//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge` trait
//! for use in tests. It serves pre-built pages from memory, records every
//! request, and can be told to fail on a specific page.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use ghexport::core::types::{Author, Category, Item, PageCursor};
//! use ghexport::forge::mock::MockForge;
//! use ghexport::forge::{Forge, ListRequest};
//!
//! # tokio_test::block_on(async {
//! let item = Item {
//!     number: 1,
//!     title: "First".to_string(),
//!     url: "https://github.com/mock/repo/issues/1".to_string(),
//!     created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
//!     author: Author {
//!         login: "mock".to_string(),
//!         url: "https://github.com/mock".to_string(),
//!     },
//! };
//!
//! let forge = MockForge::new().with_pages(Category::Issue, vec![vec![item]]);
//!
//! let page = forge
//!     .list_page(Category::Issue, &ListRequest::new(PageCursor::first(), 100))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(page.items.len(), 1);
//! assert!(page.is_last());
//! assert_eq!(forge.request_count(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{Forge, ForgeError, ItemPage, ListRequest};
use crate::core::types::{Category, Item, PageCursor};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping. Clones share state,
/// so a test can keep a handle for inspecting recorded requests.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// Pages per category; index 0 is page 1.
    pages: HashMap<Category, Vec<Vec<Item>>>,
    /// Page to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which request should fail.
#[derive(Debug, Clone)]
pub struct FailOn {
    /// Category whose listing fails
    pub category: Category,
    /// 1-based page number that fails
    pub page: u32,
    /// Error to return
    pub error: ForgeError,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    ListPage {
        category: Category,
        page: u32,
        per_page: u8,
    },
}

impl MockForge {
    /// Create a new mock forge with no items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the given pages for `category`.
    ///
    /// Every page except the last reports a next page; the last reports
    /// none. An empty `pages` behaves like a single empty page.
    pub fn with_pages(self, category: Category, pages: Vec<Vec<Item>>) -> Self {
        self.lock().pages.insert(category, pages);
        self
    }

    /// Serve `items` for `category`, split into pages of `page_size`.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    pub fn with_items(self, category: Category, items: Vec<Item>, page_size: usize) -> Self {
        assert!(page_size > 0, "page_size must be positive");
        let pages = items.chunks(page_size).map(|c| c.to_vec()).collect();
        self.with_pages(category, pages)
    }

    /// Configure the mock to fail on a specific page.
    ///
    /// # Example
    ///
    /// ```
    /// use ghexport::core::types::Category;
    /// use ghexport::forge::mock::{FailOn, MockForge};
    /// use ghexport::forge::ForgeError;
    ///
    /// let forge = MockForge::new().fail_on(FailOn {
    ///     category: Category::Issue,
    ///     page: 2,
    ///     error: ForgeError::RateLimited,
    /// });
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Get all recorded operations.
    ///
    /// Useful for verifying the mock was called correctly.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.lock().operations.len()
    }

    /// Page numbers requested for `category`, in request order.
    pub fn pages_requested(&self, category: Category) -> Vec<u32> {
        self.lock()
            .operations
            .iter()
            .filter_map(|op| match op {
                MockOperation::ListPage {
                    category: c, page, ..
                } if *c == category => Some(*page),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockForgeInner> {
        // A panic in another test thread must not hide this test's result
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_page(
        &self,
        category: Category,
        request: &ListRequest,
    ) -> Result<ItemPage, ForgeError> {
        let mut inner = self.lock();
        let page = request.cursor.number();

        inner.operations.push(MockOperation::ListPage {
            category,
            page,
            per_page: request.per_page,
        });

        if let Some(fail) = &inner.fail_on {
            if fail.category == category && fail.page == page {
                return Err(fail.error.clone());
            }
        }

        let pages = inner.pages.get(&category).map(Vec::as_slice).unwrap_or(&[]);
        let index = (page - 1) as usize;
        let items = pages.get(index).cloned().unwrap_or_default();
        let next = if index + 1 < pages.len() {
            PageCursor::page(page + 1)
        } else {
            None
        };

        Ok(ItemPage { items, next })
    }
}
