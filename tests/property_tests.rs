//! Property-based tests for the export engine.
//!
//! These tests use proptest to verify traversal invariants hold across
//! randomly generated collections, page sizes and cutoffs.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use ghexport::core::types::{Author, Category, Cutoff, Item, PageCursor};
use ghexport::engine::traverse;
use ghexport::forge::github::parse_next_page;
use ghexport::forge::mock::MockForge;
use ghexport::output::{DelimitedWriter, Delimiter};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Strategy for a collection ordered newest first.
///
/// Values are minute offsets from 2024-01-01; duplicates are allowed since
/// items may share a creation time.
fn ordered_offsets() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..10_000, 0..60).prop_map(|mut offsets| {
        offsets.sort_unstable_by(|a, b| b.cmp(a));
        offsets
    })
}

fn items_from(offsets: &[i64], title: impl Fn(usize) -> String) -> Vec<Item> {
    offsets
        .iter()
        .enumerate()
        .map(|(i, offset)| Item {
            number: (offsets.len() - i) as u64,
            title: title(i),
            url: format!("https://github.com/acme/widgets/issues/{}", offsets.len() - i),
            created_at: epoch() + Duration::minutes(*offset),
            author: Author {
                login: "alice".to_string(),
                url: "https://github.com/alice".to_string(),
            },
        })
        .collect()
}

/// Pages a correct traversal needs: up to and including the page holding
/// the first excluded item, or every page when nothing is excluded.
fn expected_pages(total: usize, first_excluded: Option<usize>, page_size: usize) -> usize {
    match first_excluded {
        Some(index) => index / page_size + 1,
        None => total.div_ceil(page_size).max(1),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn emits_exactly_the_prefix_newer_than_cutoff(
        offsets in ordered_offsets(),
        page_size in 1usize..12,
        cutoff_offset in -100i64..10_100,
    ) {
        let items = items_from(&offsets, |i| format!("Item {}", i));
        let forge = MockForge::new().with_items(Category::Issue, items.clone(), page_size);
        let cutoff = Cutoff::at(epoch() + Duration::minutes(cutoff_offset));

        let mut sink: Vec<(Category, Item)> = Vec::new();
        let summary = tokio_test::block_on(traverse(
            &forge,
            Category::Issue,
            cutoff,
            page_size as u8,
            &mut sink,
        ))
        .unwrap();

        let expected: Vec<Item> = items
            .iter()
            .take_while(|i| i.created_at >= cutoff.instant())
            .cloned()
            .collect();
        let emitted: Vec<Item> = sink.into_iter().map(|(_, i)| i).collect();
        prop_assert_eq!(&emitted, &expected);

        let first_excluded = items.iter().position(|i| cutoff.excludes(i.created_at));
        prop_assert_eq!(summary.reached_cutoff, first_excluded.is_some());
        prop_assert_eq!(summary.items_emitted, expected.len());

        let pages = expected_pages(items.len(), first_excluded, page_size);
        prop_assert_eq!(summary.pages_fetched, pages);
        let requested = forge.pages_requested(Category::Issue);
        prop_assert_eq!(requested, (1..=pages as u32).collect::<Vec<_>>());
    }

    #[test]
    fn one_line_per_emitted_item(
        offsets in ordered_offsets(),
        titles in prop::collection::vec("[ -~]{0,40}", 60),
    ) {
        let items = items_from(&offsets, |i| titles[i].clone());
        let forge = MockForge::new().with_items(Category::PullRequest, items.clone(), 7);
        let mut writer = DelimitedWriter::new(Vec::new(), Delimiter::Comma);

        tokio_test::block_on(traverse(
            &forge,
            Category::PullRequest,
            Cutoff::at(epoch()),
            7,
            &mut writer,
        ))
        .unwrap();

        prop_assert_eq!(writer.rows_written(), items.len());
        let out = String::from_utf8(writer.into_inner()).unwrap();
        prop_assert_eq!(out.lines().count(), items.len());
    }

    #[test]
    fn next_link_round_trips_page_number(page in 1u32..100_000, last in 1u32..100_000) {
        let link = format!(
            "<https://api.github.com/repos/acme/widgets/issues?state=all&page={}>; rel=\"next\", \
             <https://api.github.com/repos/acme/widgets/issues?state=all&page={}>; rel=\"last\"",
            page, last
        );
        prop_assert_eq!(parse_next_page(&link), PageCursor::page(page));
    }

    #[test]
    fn since_dates_parse_to_midnight(y in 1970i32..2100, m in 1u32..=12, d in 1u32..=28) {
        let cutoff = Cutoff::parse_date(&format!("{:04}-{:02}-{:02}", y, m, d)).unwrap();
        prop_assert_eq!(cutoff.instant(), Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap());
    }
}
