//! Integration tests for the cutoff traversal.
//!
//! These tests drive the export engine against MockForge and check which
//! items reach the sink and which pages are requested.

use chrono::{DateTime, Duration, TimeZone, Utc};

use ghexport::core::types::{Author, Category, Cutoff, Item};
use ghexport::engine::{export, traverse, ExportError, ExportOptions};
use ghexport::forge::mock::{FailOn, MockForge};
use ghexport::forge::ForgeError;
use ghexport::output::{DelimitedWriter, Delimiter};

type Recorded = Vec<(Category, Item)>;

fn item(number: u64, created_at: DateTime<Utc>) -> Item {
    Item {
        number,
        title: format!("Item {}", number),
        url: format!("https://github.com/acme/widgets/issues/{}", number),
        created_at,
        author: Author {
            login: "alice".to_string(),
            url: "https://github.com/alice".to_string(),
        },
    }
}

fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// `count` items, newest first, one day apart ending at 2024-06-30.
fn daily_items(count: u64) -> Vec<Item> {
    let newest = day(2024, 6, 30);
    (0..count)
        .map(|i| item(count - i, newest - Duration::days(i as i64)))
        .collect()
}

fn numbers(sink: &Recorded) -> Vec<u64> {
    sink.iter().map(|(_, i)| i.number).collect()
}

mod scenario_tests {
    use super::*;

    #[tokio::test]
    async fn acme_widgets_since_new_year() {
        let forge = MockForge::new().with_pages(
            Category::Issue,
            vec![vec![
                item(3, day(2024, 2, 1)),
                item(2, day(2024, 1, 15)),
                item(1, day(2023, 12, 20)),
            ]],
        );
        let cutoff = Cutoff::parse_date("2024-01-01").unwrap();
        let mut sink: Recorded = Vec::new();

        let summary = traverse(&forge, Category::Issue, cutoff, 100, &mut sink)
            .await
            .unwrap();

        assert_eq!(numbers(&sink), vec![3, 2]);
        assert!(summary.reached_cutoff);
    }

    #[tokio::test]
    async fn empty_first_page_emits_nothing() {
        let forge = MockForge::new();
        let cutoff = Cutoff::parse_date("2024-01-01").unwrap();
        let mut sink: Recorded = Vec::new();

        let summary = export(&forge, &ExportOptions::new(cutoff), &mut sink)
            .await
            .unwrap();

        assert!(sink.is_empty());
        assert_eq!(summary.items_emitted(), 0);
        assert_eq!(forge.request_count(), 2);
    }

    #[tokio::test]
    async fn page_two_error_after_page_one_rows() {
        let forge = MockForge::new()
            .with_items(Category::Issue, daily_items(6), 3)
            .fail_on(FailOn {
                category: Category::Issue,
                page: 2,
                error: ForgeError::ApiError {
                    status: 502,
                    message: "Bad Gateway".into(),
                },
            });
        let cutoff = Cutoff::parse_date("2024-01-01").unwrap();
        let mut writer = DelimitedWriter::new(Vec::new(), Delimiter::Comma);

        let err = export(&forge, &ExportOptions::new(cutoff).with_per_page(3), &mut writer)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExportError::Fetch(ForgeError::ApiError { status: 502, .. })
        ));
        assert_eq!(writer.rows_written(), 3);
        assert_eq!(forge.pages_requested(Category::Issue), vec![1, 2]);
        assert!(forge.pages_requested(Category::PullRequest).is_empty());
    }
}

mod boundary_tests {
    use super::*;

    #[tokio::test]
    async fn cutoff_after_every_item() {
        let forge = MockForge::new().with_items(Category::Issue, daily_items(10), 4);
        let cutoff = Cutoff::parse_date("2025-01-01").unwrap();
        let mut sink: Recorded = Vec::new();

        let summary = traverse(&forge, Category::Issue, cutoff, 4, &mut sink)
            .await
            .unwrap();

        assert!(sink.is_empty());
        assert_eq!(summary.pages_fetched, 1);
        assert_eq!(forge.request_count(), 1);
    }

    #[tokio::test]
    async fn cutoff_before_every_item() {
        let items = daily_items(10);
        let forge = MockForge::new().with_items(Category::Issue, items.clone(), 4);
        let cutoff = Cutoff::parse_date("2000-01-01").unwrap();
        let mut sink: Recorded = Vec::new();

        let summary = traverse(&forge, Category::Issue, cutoff, 4, &mut sink)
            .await
            .unwrap();

        let emitted: Vec<Item> = sink.into_iter().map(|(_, i)| i).collect();
        assert_eq!(emitted, items);
        assert_eq!(summary.pages_fetched, 3);
        assert!(!summary.reached_cutoff);
    }

    #[tokio::test]
    async fn exact_multiple_of_page_size() {
        let forge = MockForge::new().with_items(Category::Issue, daily_items(8), 4);
        let cutoff = Cutoff::parse_date("2000-01-01").unwrap();
        let mut sink: Recorded = Vec::new();

        traverse(&forge, Category::Issue, cutoff, 4, &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.len(), 8);
        assert_eq!(forge.pages_requested(Category::Issue), vec![1, 2]);
    }

    #[tokio::test]
    async fn cutoff_on_first_item_of_later_page() {
        // Items 10..=1, dated 2024-06-30 back to 2024-06-21
        let forge = MockForge::new().with_items(Category::Issue, daily_items(10), 4);
        let cutoff = Cutoff::at(day(2024, 6, 27));
        let mut sink: Recorded = Vec::new();

        traverse(&forge, Category::Issue, cutoff, 4, &mut sink)
            .await
            .unwrap();

        // 06-30, 06-29, 06-28, 06-27 fill page 1; 06-26 opens page 2
        assert_eq!(numbers(&sink), vec![10, 9, 8, 7]);
        assert_eq!(forge.pages_requested(Category::Issue), vec![1, 2]);
    }

    #[tokio::test]
    async fn idempotent_over_unchanged_collection() {
        let forge = MockForge::new()
            .with_items(Category::Issue, daily_items(9), 2)
            .with_items(Category::PullRequest, daily_items(5), 2);
        let options = ExportOptions::new(Cutoff::at(day(2024, 6, 25))).with_per_page(2);

        let mut first: Recorded = Vec::new();
        let mut second: Recorded = Vec::new();
        let a = export(&forge, &options, &mut first).await.unwrap();
        let b = export(&forge, &options, &mut second).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(a, b);
    }
}

mod sink_tests {
    use super::*;

    #[tokio::test]
    async fn rows_follow_traversal_order() {
        let forge = MockForge::new()
            .with_items(Category::Issue, daily_items(3), 2)
            .with_items(Category::PullRequest, daily_items(2), 2);
        let options = ExportOptions::new(Cutoff::parse_date("2024-01-01").unwrap());
        let mut writer = DelimitedWriter::new(Vec::new(), Delimiter::Tab).with_header(true);

        export(&forge, &options, &mut writer).await.unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let types: Vec<&str> = out
            .lines()
            .skip(1)
            .map(|l| l.split('\t').nth(1).unwrap())
            .collect();
        assert_eq!(
            types,
            vec!["Issue", "Issue", "Issue", "Pull Request", "Pull Request"]
        );
    }
}
