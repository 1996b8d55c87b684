//! engine::pager
//!
//! Lazy, finite page sequence over one forge listing.
//!
//! # Invariants
//!
//! - The first request is for page 1.
//! - Each call to [`Pager::next_page`] issues at most one request.
//! - No request is issued after a page that reported no next page.
//! - After an error the pager is finished; it never restarts.

use crate::core::types::{Category, Item, PageCursor};
use crate::forge::{Forge, ForgeError, ListRequest};

/// Where the pager is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PagerState {
    /// The next call fetches this page.
    Pending(PageCursor),
    /// No more pages will be fetched.
    Done,
}

/// Fetches successive pages of one category from a forge.
///
/// # Example
///
/// ```
/// use ghexport::core::types::Category;
/// use ghexport::engine::Pager;
/// use ghexport::forge::mock::MockForge;
///
/// # tokio_test::block_on(async {
/// let forge = MockForge::new();
/// let mut pager = Pager::new(&forge, Category::Issue, 100);
///
/// assert_eq!(pager.next_page().await.unwrap(), Some(vec![]));
/// assert_eq!(pager.next_page().await.unwrap(), None);
/// assert_eq!(pager.pages_fetched(), 1);
/// # });
/// ```
pub struct Pager<'a, F: Forge + ?Sized> {
    forge: &'a F,
    category: Category,
    per_page: u8,
    state: PagerState,
    pages_fetched: usize,
}

impl<'a, F: Forge + ?Sized> Pager<'a, F> {
    /// Create a pager positioned at the first page.
    pub fn new(forge: &'a F, category: Category, per_page: u8) -> Self {
        Self {
            forge,
            category,
            per_page,
            state: PagerState::Pending(PageCursor::first()),
            pages_fetched: 0,
        }
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the sequence is exhausted. An empty page is
    /// still a page and is returned as `Ok(Some(vec![]))`.
    ///
    /// # Errors
    ///
    /// Returns the forge error unchanged. The pager is finished afterwards.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Item>>, ForgeError> {
        let cursor = match self.state {
            PagerState::Pending(cursor) => cursor,
            PagerState::Done => return Ok(None),
        };

        // Finished unless the page below says otherwise
        self.state = PagerState::Done;

        let request = ListRequest::new(cursor, self.per_page);
        let page = self.forge.list_page(self.category, &request).await?;
        self.pages_fetched += 1;

        if let Some(next) = page.next {
            // A forge pointing backwards would loop forever
            if next.number() > cursor.number() {
                self.state = PagerState::Pending(next);
            } else {
                tracing::warn!(
                    category = %self.category,
                    current = cursor.number(),
                    next = next.number(),
                    "next page does not advance, stopping"
                );
            }
        }

        Ok(Some(page.items))
    }

    /// Whether the sequence is exhausted.
    pub fn is_done(&self) -> bool {
        self.state == PagerState::Done
    }

    /// Number of pages fetched successfully so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}
