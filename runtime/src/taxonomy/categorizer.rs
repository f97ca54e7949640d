//! Group URLs by segment tuple and count them.
//!
//! Row order: ascending on every segment column except the last, then
//! descending count, then ascending last segment. Siblings under one parent
//! are therefore ranked by popularity while parent groups stay in a
//! deterministic lexicographic order.

use crate::config::MAX_DEPTH;
use crate::taxonomy::segments::segment_tuple;
use crate::taxonomy::table::{AggregationTable, Row};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Build the aggregation table for `urls` at `depth` path segments.
///
/// `depth` is clamped to [`MAX_DEPTH`].
pub fn categorize<S: AsRef<str>>(urls: &[S], depth: usize) -> AggregationTable {
    let depth = if depth > MAX_DEPTH {
        warn!("depth {depth} exceeds the maximum of {MAX_DEPTH}, using {MAX_DEPTH}");
        MAX_DEPTH
    } else {
        depth
    };

    let mut counts: HashMap<Vec<String>, u64> = HashMap::new();
    for url in urls {
        *counts.entry(segment_tuple(url.as_ref(), depth)).or_insert(0) += 1;
    }

    let mut rows: Vec<Row> = counts
        .into_iter()
        .map(|(segments, count)| Row { segments, count })
        .collect();
    rows.sort_by(compare_rows);

    debug!(
        "categorized {} URL(s) into {} row(s) at depth {}",
        urls.len(),
        rows.len(),
        depth
    );

    AggregationTable::from_parts(depth, rows)
}

/// Total order over rows of equal arity.
fn compare_rows(a: &Row, b: &Row) -> Ordering {
    let split = a.segments.len().saturating_sub(1);
    let (a_lead, a_last) = a.segments.split_at(split);
    let (b_lead, b_last) = b.segments.split_at(split);

    a_lead
        .cmp(b_lead)
        .then_with(|| b.count.cmp(&a.count))
        .then_with(|| a_last.cmp(b_last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::segments::host;
    use std::collections::BTreeMap;

    fn tuples(table: &AggregationTable) -> Vec<(Vec<&str>, u64)> {
        table
            .rows()
            .iter()
            .map(|r| (r.segments.iter().map(String::as_str).collect(), r.count))
            .collect()
    }

    fn corpus() -> Vec<String> {
        [
            "https://shop.com/men/shoes/a",
            "https://shop.com/men/shoes/b",
            "https://shop.com/men/hats/a",
            "https://shop.com/women/shoes/a",
            "https://shop.com/women/shoes/b",
            "https://shop.com/women/shoes/c",
            "https://shop.com/women/bags",
            "https://shop.com/women/bags/x",
            "https://shop.com/",
            "https://shop.com",
            "https://blog.shop.com/2024/01/post",
            "https://blog.shop.com/2024/02/post",
            "https://blog.shop.com/2023/12/post",
            "not-a-url",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_oversized_depth_is_clamped() {
        let table = categorize(&["http://a.com"], usize::MAX);
        assert_eq!(table.depth(), MAX_DEPTH);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].segments.len(), MAX_DEPTH + 1);
        assert_eq!(table.rows()[0].segments[0], "a.com");
    }

    #[test]
    fn test_basic_grouping() {
        let urls = ["http://a.com/x/y", "http://a.com/x/z", "http://a.com/x/y"];
        let table = categorize(&urls, 2);
        assert_eq!(
            tuples(&table),
            vec![
                (vec!["a.com", "x", "y"], 2),
                (vec!["a.com", "x", "z"], 1),
            ]
        );
        assert_eq!(table.total(), 3);
        assert_eq!(table.columns(), vec!["0", "1", "2", "counts"]);
    }

    #[test]
    fn test_url_without_path() {
        let table = categorize(&["http://a.com"], 2);
        assert_eq!(tuples(&table), vec![(vec!["a.com", "", ""], 1)]);
    }

    #[test]
    fn test_empty_input() {
        let urls: Vec<String> = Vec::new();
        let table = categorize(&urls, 3);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.depth(), 3);
    }

    #[test]
    fn test_counts_sum_to_input_length() {
        let urls = corpus();
        for depth in 0..6 {
            let table = categorize(&urls, depth);
            assert_eq!(table.total(), urls.len() as u64, "depth {depth}");
        }
    }

    #[test]
    fn test_every_row_has_depth_plus_one_segments() {
        let urls = corpus();
        for depth in 0..6 {
            let table = categorize(&urls, depth);
            assert!(table.rows().iter().all(|r| r.segments.len() == depth + 1));
        }
    }

    #[test]
    fn test_rows_are_unique() {
        let table = categorize(&corpus(), 3);
        let mut seen = std::collections::HashSet::new();
        for row in table.rows() {
            assert!(seen.insert(row.segments.clone()), "duplicate {:?}", row.segments);
        }
    }

    #[test]
    fn test_idempotent() {
        let urls = corpus();
        assert_eq!(categorize(&urls, 3), categorize(&urls, 3));

        let mut reversed = urls.clone();
        reversed.reverse();
        assert_eq!(categorize(&urls, 3), categorize(&reversed, 3));
    }

    #[test]
    fn test_sort_invariant() {
        let depth = 2;
        let table = categorize(&corpus(), depth);
        for pair in table.rows().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let lead_a = &a.segments[..depth];
            let lead_b = &b.segments[..depth];
            assert!(lead_a <= lead_b, "{lead_a:?} after {lead_b:?}");
            if lead_a == lead_b {
                assert!(a.count >= b.count);
            }
        }
    }

    #[test]
    fn test_siblings_ranked_by_count() {
        let table = categorize(&corpus(), 2);
        let women: Vec<_> = tuples(&table)
            .into_iter()
            .filter(|(s, _)| s[0] == "shop.com" && s[1] == "women")
            .collect();
        assert_eq!(
            women,
            vec![
                (vec!["shop.com", "women", "shoes"], 3),
                (vec!["shop.com", "women", "bags"], 2),
            ]
        );
    }

    #[test]
    fn test_depth_zero_matches_host_counts() {
        let urls = corpus();
        let table = categorize(&urls, 0);

        let mut expected: BTreeMap<&str, u64> = BTreeMap::new();
        for url in &urls {
            *expected.entry(host(url)).or_default() += 1;
        }

        let got: BTreeMap<&str, u64> = table
            .rows()
            .iter()
            .map(|r| (r.segments[0].as_str(), r.count))
            .collect();
        assert_eq!(got, expected);

        // No leading columns: ordered by count alone, then host.
        let counts: Vec<u64> = table.rows().iter().map(|r| r.count).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_shallow_urls_group_under_empty_suffix() {
        let urls = ["https://a.com/x", "https://a.com/x/", "https://a.com/x/y"];
        let table = categorize(&urls, 3);
        assert_eq!(
            tuples(&table),
            vec![
                (vec!["a.com", "x", "", ""], 2),
                (vec!["a.com", "x", "y", ""], 1),
            ]
        );
    }
}
