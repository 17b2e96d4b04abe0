//! Activity bucketing: posts → one record per publishing day.
//!
//! Only published posts count: drafts, category placeholders and posts
//! without a usable date are skipped. Timestamps with an offset are
//! normalized to UTC before the date is taken, so a post dated
//! `2024-01-01T23:30:00-02:00` lands on `2024-01-02`.
//!
//! Output is sorted by date and is byte-identical for the same input.

use crate::types::{ActivityRecord, ActivitySummary, DateRange, Post, PostSummary};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use std::collections::BTreeMap;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a frontmatter date into a UTC calendar day.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`
/// (both optionally with fractional seconds, read as UTC) and `YYYY-MM-DD`.
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Group published posts by publication day.
pub fn bucket_posts(posts: &[Post]) -> Vec<ActivityRecord> {
    let mut by_day: BTreeMap<NaiveDate, Vec<PostSummary>> = BTreeMap::new();

    for post in posts.iter().filter(|p| p.is_published()) {
        let Some(raw) = post.date.as_deref() else {
            continue;
        };
        let Some(day) = parse_post_date(raw) else {
            warn!(
                "{}: unparseable date '{}', post left out of activity",
                post.source_path, raw
            );
            continue;
        };
        by_day.entry(day).or_default().push(PostSummary {
            title: post.title.clone(),
            slug: post.slug.clone(),
        });
    }

    by_day
        .into_iter()
        .map(|(day, posts)| ActivityRecord {
            date: format_date(day),
            count: posts.len() as u32,
            posts,
        })
        .collect()
}

/// Records whose date lies within `start..=end`.
pub fn filter_by_date_range(
    records: &[ActivityRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ActivityRecord> {
    let (start, end) = (format_date(start), format_date(end));
    records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .cloned()
        .collect()
}

/// Summary numbers for the stats artifact and the preview header.
pub fn activity_stats(records: &[ActivityRecord]) -> ActivitySummary {
    let total_posts: u32 = records.iter().map(|r| r.count).sum();
    let active_days = records.iter().filter(|r| r.count > 0).count();
    let max_posts_in_day = records.iter().map(|r| r.count).max().unwrap_or(0);

    ActivitySummary {
        total_days: records.len(),
        total_posts,
        active_days,
        max_posts_in_day,
        average_posts_per_active_day: if active_days > 0 {
            f64::from(total_posts) / active_days as f64
        } else {
            0.0
        },
        date_range: DateRange {
            start: records.iter().map(|r| r.date.clone()).min(),
            end: records.iter().map(|r| r.date.clone()).max(),
        },
    }
}

/// Additively merge two activity series.
///
/// Days present in both have their counts summed and post lists
/// concatenated (`blog` first).
pub fn merge_activity(blog: &[ActivityRecord], external: &[ActivityRecord]) -> Vec<ActivityRecord> {
    let mut merged: BTreeMap<String, ActivityRecord> = BTreeMap::new();
    for record in blog.iter().chain(external) {
        merged
            .entry(record.date.clone())
            .and_modify(|existing| {
                existing.count += record.count;
                existing.posts.extend(record.posts.iter().cloned());
            })
            .or_insert_with(|| record.clone());
    }
    merged.into_values().collect()
}

/// GitHub-style intensity level for a day's count.
///
/// `0 → 0`, `1 → 1`, `2 → 2`, `3..=4 → 3`, `5+ → 4`.
pub fn intensity(count: u32) -> u8 {
    match count {
        0 => 0,
        1 => 1,
        2 => 2,
        3 | 4 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::post;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn two_posts_same_day_one_other() {
        let posts = vec![
            post("First", Some("2024-01-01"), &[]),
            post("Second", Some("2024-01-01"), &[]),
            post("Third", Some("2024-01-03"), &[]),
        ];
        let records = bucket_posts(&posts);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "2024-01-01");
        assert_eq!(records[0].count, 2);
        assert_eq!(records[0].posts[1].title, "Second");
        assert_eq!(records[1].date, "2024-01-03");
        assert_eq!(records[1].count, 1);
    }

    #[test]
    fn excludes_drafts_categories_and_undated() {
        let mut draft = post("Draft", Some("2024-01-01"), &[]);
        draft.draft = true;
        let mut index = post("Index", Some("2024-01-01"), &[]);
        index.category = true;
        let undated = post("Undated", None, &[]);
        let garbage = post("Garbage", Some("last tuesday"), &[]);
        let kept = post("Kept", Some("2024-01-02"), &[]);

        let records = bucket_posts(&[draft, index, undated, garbage, kept]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].posts[0].title, "Kept");
    }

    #[test]
    fn counts_match_post_lists_and_total() {
        let posts: Vec<Post> = (0..20)
            .map(|i| post(&format!("P{i}"), Some(&format!("2024-02-{:02}", i % 7 + 1)), &[]))
            .collect();
        let records = bucket_posts(&posts);
        assert!(records.iter().all(|r| r.count as usize == r.posts.len()));
        assert_eq!(records.iter().map(|r| r.count).sum::<u32>(), 20);
        assert!(records.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn output_sorted_regardless_of_input_order() {
        let posts = vec![
            post("Late", Some("2024-03-01"), &[]),
            post("Early", Some("2023-12-31"), &[]),
        ];
        let records = bucket_posts(&posts);
        assert_eq!(records[0].date, "2023-12-31");
        assert_eq!(records[1].date, "2024-03-01");
    }

    #[test]
    fn timestamp_formats() {
        assert_eq!(parse_post_date("2024-01-05"), Some(date("2024-01-05")));
        assert_eq!(parse_post_date("2024-01-05T10:00:00"), Some(date("2024-01-05")));
        assert_eq!(parse_post_date("2024-01-05 10:00:00.250"), Some(date("2024-01-05")));
        assert_eq!(parse_post_date("2024-01-05T10:00:00Z"), Some(date("2024-01-05")));
        assert_eq!(parse_post_date("not a date"), None);
    }

    #[test]
    fn offsets_normalize_to_utc() {
        assert_eq!(
            parse_post_date("2024-01-01T23:30:00-02:00"),
            Some(date("2024-01-02"))
        );
        assert_eq!(
            parse_post_date("2024-01-02T01:00:00+05:00"),
            Some(date("2024-01-01"))
        );
    }

    #[test]
    fn date_range_filter_is_inclusive() {
        let records = bucket_posts(&[
            post("A", Some("2024-01-01"), &[]),
            post("B", Some("2024-01-10"), &[]),
            post("C", Some("2024-01-20"), &[]),
        ]);
        let filtered = filter_by_date_range(&records, date("2024-01-01"), date("2024-01-10"));
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn stats_over_records() {
        let records = bucket_posts(&[
            post("A", Some("2024-01-01"), &[]),
            post("B", Some("2024-01-01"), &[]),
            post("C", Some("2024-01-01"), &[]),
            post("D", Some("2024-01-05"), &[]),
        ]);
        let stats = activity_stats(&records);
        assert_eq!(stats.total_posts, 4);
        assert_eq!(stats.active_days, 2);
        assert_eq!(stats.max_posts_in_day, 3);
        assert_eq!(stats.average_posts_per_active_day, 2.0);
        assert_eq!(stats.date_range.start.as_deref(), Some("2024-01-01"));
        assert_eq!(stats.date_range.end.as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn stats_of_nothing() {
        let stats = activity_stats(&[]);
        assert_eq!(stats.total_posts, 0);
        assert_eq!(stats.average_posts_per_active_day, 0.0);
        assert_eq!(stats.date_range.start, None);
    }

    #[test]
    fn merge_sums_and_concatenates() {
        let blog = bucket_posts(&[
            post("Blog", Some("2024-01-01"), &[]),
            post("Later", Some("2024-01-04"), &[]),
        ]);
        let external = vec![
            ActivityRecord {
                date: "2024-01-01".into(),
                count: 2,
                posts: vec![
                    PostSummary {
                        title: "fix".into(),
                        slug: "abc".into(),
                    },
                    PostSummary {
                        title: "feat".into(),
                        slug: "def".into(),
                    },
                ],
            },
            ActivityRecord {
                date: "2024-01-02".into(),
                count: 1,
                posts: vec![PostSummary {
                    title: "docs".into(),
                    slug: "123".into(),
                }],
            },
        ];
        let merged = merge_activity(&blog, &external);
        let dates: Vec<_> = merged.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-04"]);
        assert_eq!(merged[0].count, 3);
        assert_eq!(merged[0].posts[0].title, "Blog");
        assert_eq!(merged[0].posts.len(), 3);
    }

    #[test]
    fn intensity_steps() {
        let levels: Vec<u8> = (0..=7).map(intensity).collect();
        assert_eq!(levels, vec![0, 1, 2, 3, 3, 4, 4, 4]);
    }
}
