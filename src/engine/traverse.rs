//! engine::traverse
//!
//! Time-bounded traversal of one category.
//!
//! Items arrive newest first. Every item at or after the cutoff is handed to
//! the sink in order; the first item before the cutoff ends the traversal
//! without fetching any further page.

use super::pager::Pager;
use super::ExportError;
use crate::core::types::{Category, Cutoff};
use crate::forge::Forge;
use crate::output::ItemSink;

/// Outcome of a completed traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalSummary {
    /// Category traversed
    pub category: Category,
    /// Pages fetched from the forge
    pub pages_fetched: usize,
    /// Items handed to the sink
    pub items_emitted: usize,
    /// Whether an item older than the cutoff ended the traversal
    pub reached_cutoff: bool,
}

/// Traverse `category` newest first, emitting items until the cutoff.
///
/// # Errors
///
/// - [`ExportError::Fetch`] if a page request fails
/// - [`ExportError::Sink`] if the sink rejects an item
///
/// Items already emitted stay emitted.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ghexport::core::types::{Author, Category, Cutoff, Item};
/// use ghexport::engine::traverse;
/// use ghexport::forge::mock::MockForge;
///
/// # tokio_test::block_on(async {
/// let item = |n: u64, day: u32| Item {
///     number: n,
///     title: format!("#{}", n),
///     url: format!("https://github.com/acme/widgets/issues/{}", n),
///     created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
///     author: Author { login: "a".into(), url: "https://github.com/a".into() },
/// };
/// let forge = MockForge::new()
///     .with_pages(Category::Issue, vec![vec![item(3, 20), item(2, 10), item(1, 1)]]);
///
/// let mut sink: Vec<(Category, Item)> = Vec::new();
/// let cutoff = Cutoff::parse_date("2024-01-05").unwrap();
/// let summary = traverse(&forge, Category::Issue, cutoff, 100, &mut sink).await.unwrap();
///
/// assert_eq!(summary.items_emitted, 2);
/// assert!(summary.reached_cutoff);
/// # });
/// ```
pub async fn traverse<F, S>(
    forge: &F,
    category: Category,
    cutoff: Cutoff,
    per_page: u8,
    sink: &mut S,
) -> Result<TraversalSummary, ExportError>
where
    F: Forge + ?Sized,
    S: ItemSink + ?Sized,
{
    let mut pager = Pager::new(forge, category, per_page);
    let mut items_emitted = 0;
    let mut reached_cutoff = false;

    'pages: while let Some(items) = pager.next_page().await? {
        tracing::debug!(
            %category,
            page = pager.pages_fetched(),
            items = items.len(),
            "processing page"
        );

        for item in &items {
            if cutoff.excludes(item.created_at) {
                tracing::debug!(
                    %category,
                    number = item.number,
                    created_at = %item.created_at,
                    "reached cutoff"
                );
                reached_cutoff = true;
                break 'pages;
            }
            sink.accept(category, item)?;
            items_emitted += 1;
        }
    }

    let summary = TraversalSummary {
        category,
        pages_fetched: pager.pages_fetched(),
        items_emitted,
        reached_cutoff,
    };

    tracing::info!(
        %category,
        pages = summary.pages_fetched,
        items = summary.items_emitted,
        reached_cutoff = summary.reached_cutoff,
        "traversal complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Author, Item};
    use crate::forge::mock::{FailOn, MockForge};
    use crate::forge::ForgeError;
    use crate::output::SinkError;
    use chrono::{TimeZone, Utc};

    fn item(number: u64, y: i32, m: u32, d: u32) -> Item {
        Item {
            number,
            title: format!("Item {}", number),
            url: format!("https://github.com/acme/widgets/issues/{}", number),
            created_at: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            author: Author {
                login: "alice".to_string(),
                url: "https://github.com/alice".to_string(),
            },
        }
    }

    type Recorded = Vec<(Category, Item)>;

    fn numbers(sink: &[(Category, Item)]) -> Vec<u64> {
        sink.iter().map(|(_, i)| i.number).collect()
    }

    fn cutoff(date: &str) -> Cutoff {
        Cutoff::parse_date(date).unwrap()
    }

    #[tokio::test]
    async fn stops_at_first_older_item() {
        let forge = MockForge::new().with_pages(
            Category::Issue,
            vec![
                vec![item(5, 2024, 3, 1), item(4, 2024, 2, 1)],
                vec![item(3, 2024, 1, 15), item(2, 2023, 12, 20)],
                vec![item(1, 2023, 11, 1)],
            ],
        );
        let mut sink: Recorded = Vec::new();

        let summary = traverse(&forge, Category::Issue, cutoff("2024-01-01"), 2, &mut sink)
            .await
            .unwrap();

        assert_eq!(numbers(&sink), vec![5, 4, 3]);
        assert_eq!(summary.pages_fetched, 2);
        assert_eq!(summary.items_emitted, 3);
        assert!(summary.reached_cutoff);
        assert_eq!(forge.pages_requested(Category::Issue), vec![1, 2]);
    }

    #[tokio::test]
    async fn item_exactly_at_cutoff_is_included() {
        let at_midnight = Item {
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            ..item(1, 2024, 1, 1)
        };
        let forge = MockForge::new().with_pages(Category::Issue, vec![vec![at_midnight]]);
        let mut sink: Recorded = Vec::new();

        traverse(&forge, Category::Issue, cutoff("2024-01-01"), 100, &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn empty_first_page() {
        let forge = MockForge::new();
        let mut sink: Recorded = Vec::new();

        let summary = traverse(&forge, Category::Issue, cutoff("2024-01-01"), 100, &mut sink)
            .await
            .unwrap();

        assert!(sink.is_empty());
        assert_eq!(summary.pages_fetched, 1);
        assert!(!summary.reached_cutoff);
    }

    #[tokio::test]
    async fn tags_items_with_category() {
        let forge =
            MockForge::new().with_pages(Category::PullRequest, vec![vec![item(7, 2024, 5, 5)]]);
        let mut sink: Recorded = Vec::new();

        traverse(
            &forge,
            Category::PullRequest,
            cutoff("2024-01-01"),
            100,
            &mut sink,
        )
        .await
        .unwrap();

        assert_eq!(sink[0].0, Category::PullRequest);
    }

    #[tokio::test]
    async fn fetch_error_keeps_emitted_items() {
        let forge = MockForge::new()
            .with_pages(
                Category::Issue,
                vec![
                    vec![item(4, 2024, 4, 1), item(3, 2024, 3, 1)],
                    vec![item(2, 2024, 2, 1), item(1, 2024, 1, 2)],
                ],
            )
            .fail_on(FailOn {
                category: Category::Issue,
                page: 2,
                error: ForgeError::NetworkError("connection reset".into()),
            });
        let mut sink: Recorded = Vec::new();

        let err = traverse(&forge, Category::Issue, cutoff("2024-01-01"), 2, &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Fetch(ForgeError::NetworkError(_))));
        assert_eq!(numbers(&sink), vec![4, 3]);
        assert_eq!(forge.request_count(), 2);
    }

    struct RejectingSink {
        accepted: usize,
        limit: usize,
    }

    impl ItemSink for RejectingSink {
        fn accept(&mut self, _category: Category, _item: &Item) -> Result<(), SinkError> {
            if self.accepted == self.limit {
                return Err(SinkError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.accepted += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn sink_error_aborts() {
        let forge = MockForge::new().with_items(
            Category::Issue,
            vec![
                item(3, 2024, 3, 1),
                item(2, 2024, 2, 1),
                item(1, 2024, 1, 2),
            ],
            1,
        );
        let mut sink = RejectingSink {
            accepted: 0,
            limit: 1,
        };

        let err = traverse(&forge, Category::Issue, cutoff("2024-01-01"), 1, &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Sink(_)));
        assert_eq!(sink.accepted, 1);
        assert_eq!(forge.request_count(), 2);
    }
}
