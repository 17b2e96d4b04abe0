//! Tag aggregation for the treemap.
//!
//! Tag usage is counted over published posts (a tag repeated inside one post
//! counts once). The counts are then either listed flat, or grouped into
//! categories by a [`TagHierarchy`]:
//!
//! - a user hierarchy from `[treemap.tag_hierarchy]`, with every tag it does
//!   not mention collected under `Other`;
//! - otherwise the built-in hierarchy, which sorts tags into Technology,
//!   Computer Science, Web Development, Tutorials and Other by name.
//!
//! Every category's count is the sum of its children, and categories that
//! end up empty are dropped.

use crate::config::TreemapConfig;
use crate::types::{NamedCount, Post, TagRecord, TagSummary};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

pub const OTHER_CATEGORY: &str = "Other";

/// Ordered category definitions.
pub type TagHierarchy = Vec<CategorySpec>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    pub name: String,
    pub tags: Vec<String>,
    /// Overrides both tag and category colors inside this category.
    pub color: Option<String>,
    pub subcategories: Vec<CategorySpec>,
}

impl CategorySpec {
    pub fn new(name: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            tags,
            color: None,
            subcategories: Vec::new(),
        }
    }

    fn all_tags<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        out.extend(self.tags.iter().map(String::as_str));
        for sub in &self.subcategories {
            sub.all_tags(out);
        }
    }
}

/// Tag → number of published posts carrying it.
pub fn count_tags(posts: &[Post]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for post in posts.iter().filter(|p| p.is_published()) {
        let unique: BTreeSet<&str> = post.tags.iter().map(String::as_str).collect();
        for tag in unique {
            *counts.entry(tag.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Flat tag list, most used first, ties by name.
pub fn flat_tags(counts: &BTreeMap<String, u32>) -> Vec<TagRecord> {
    let mut records: Vec<TagRecord> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(name, count)| TagRecord {
            color: Some(tag_color(name, *count)),
            ..TagRecord::leaf(name.clone(), *count)
        })
        .collect();
    sort_by_count(&mut records);
    records
}

/// Group counts by `hierarchy`. Categories are ordered by total count.
pub fn hierarchical_tags(counts: &BTreeMap<String, u32>, hierarchy: &[CategorySpec]) -> Vec<TagRecord> {
    let mut result: Vec<TagRecord> = hierarchy
        .iter()
        .filter_map(|spec| build_category(counts, spec))
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count));
    result
}

fn build_category(counts: &BTreeMap<String, u32>, spec: &CategorySpec) -> Option<TagRecord> {
    let mut children: Vec<TagRecord> = spec
        .tags
        .iter()
        .filter_map(|tag| {
            let count = counts.get(tag).copied().unwrap_or(0);
            (count > 0).then(|| TagRecord {
                color: Some(
                    spec.color
                        .clone()
                        .unwrap_or_else(|| tag_color(tag, count)),
                ),
                category: Some(spec.name.clone()),
                ..TagRecord::leaf(tag.clone(), count)
            })
        })
        .collect();
    sort_by_count(&mut children);
    children.extend(hierarchical_tags(counts, &spec.subcategories));

    let total: u32 = children.iter().map(|c| c.count).sum();
    (total > 0).then(|| TagRecord {
        name: spec.name.clone(),
        count: total,
        color: Some(
            spec.color
                .clone()
                .unwrap_or_else(|| category_color(&spec.name)),
        ),
        category: None,
        children: Some(children),
    })
}

macro_rules! tag_pattern {
    ($re:literal) => {
        LazyLock::new(|| Regex::new($re).expect("tag pattern is valid"))
    };
}

static TECH: LazyLock<Regex> = tag_pattern!(
    r"(?i)^(react|vue|angular|javascript|typescript|node|python|java|go|rust|css|html|api|database|sql|nosql)$"
);
static COMPUTER_SCIENCE: LazyLock<Regex> =
    tag_pattern!(r"(?i)^(algorithm|data-structure|system-design|computer-science|math|statistics)$");
static WEB: LazyLock<Regex> =
    tag_pattern!(r"(?i)^(frontend|backend|fullstack|web|mobile|responsive|ui|ux|design)$");
static TUTORIALS: LazyLock<Regex> =
    tag_pattern!(r"(?i)^(tutorial|guide|howto|tips|tricks|best-practices)$");

/// Built-in hierarchy: classify every counted tag by name pattern.
///
/// Empty categories are omitted.
pub fn default_hierarchy(counts: &BTreeMap<String, u32>) -> TagHierarchy {
    let buckets: [(&str, Option<&Regex>); 5] = [
        ("Technology", Some(&*TECH)),
        ("Computer Science", Some(&*COMPUTER_SCIENCE)),
        ("Web Development", Some(&*WEB)),
        ("Tutorials", Some(&*TUTORIALS)),
        (OTHER_CATEGORY, None),
    ];
    let mut grouped: Vec<Vec<String>> = vec![Vec::new(); buckets.len()];
    for tag in counts.keys() {
        let slot = buckets
            .iter()
            .position(|(_, re)| re.is_none_or(|re| re.is_match(tag)))
            .unwrap_or(buckets.len() - 1);
        grouped[slot].push(tag.clone());
    }
    buckets
        .iter()
        .zip(grouped)
        .filter(|(_, tags)| !tags.is_empty())
        .map(|((name, _), tags)| CategorySpec::new(*name, tags))
        .collect()
}

/// Hierarchy from `[treemap.tag_hierarchy]`, plus `Other` for unlisted tags.
pub fn user_hierarchy(
    config: &BTreeMap<String, Vec<String>>,
    counts: &BTreeMap<String, u32>,
) -> TagHierarchy {
    let mut hierarchy: TagHierarchy = config
        .iter()
        .map(|(name, tags)| CategorySpec::new(name.clone(), tags.clone()))
        .collect();

    let mut listed = BTreeSet::new();
    for spec in &hierarchy {
        spec.all_tags(&mut listed);
    }
    let unlisted: Vec<String> = counts
        .keys()
        .filter(|t| !listed.contains(t.as_str()))
        .cloned()
        .collect();
    if !unlisted.is_empty() {
        match hierarchy.iter_mut().find(|c| c.name == OTHER_CATEGORY) {
            Some(other) => other.tags.extend(unlisted),
            None => hierarchy.push(CategorySpec::new(OTHER_CATEGORY, unlisted)),
        }
    }
    hierarchy
}

/// Tag records for the configured treemap mode.
pub fn tag_records(posts: &[Post], config: &TreemapConfig) -> Vec<TagRecord> {
    let counts = count_tags(posts);
    if !config.hierarchical {
        return flat_tags(&counts);
    }
    let hierarchy = match &config.tag_hierarchy {
        Some(user) => user_hierarchy(user, &counts),
        None => default_hierarchy(&counts),
    };
    hierarchical_tags(&counts, &hierarchy)
}

/// Name-hashed HSL color. Frequency nudges saturation and lightness.
///
/// The hash is the classic `h * 31 + c` string hash over UTF-16 code units,
/// with the shift step truncated to 32 bits, so colors match those generated
/// by a browser for the same tag.
pub fn tag_color(name: &str, count: u32) -> String {
    let mut hash: i64 = 0;
    for unit in name.encode_utf16() {
        let shifted = i64::from((hash as i32) << 5);
        hash = i64::from(unit) + shifted - hash;
    }
    let hue = hash.unsigned_abs() % 360;
    let saturation = 45 + count % 30;
    let lightness = 60 + count % 20;
    format!("hsl({hue}, {saturation}%, {lightness}%)")
}

/// Fixed palette for well-known category names.
pub fn category_color(name: &str) -> String {
    let fixed = match name {
        "Technology" => "#3b82f6",
        "Computer Science" => "#8b5cf6",
        "Web Development" => "#10b981",
        "Programming" => "#f59e0b",
        "Design" => "#ef4444",
        "Tutorial" => "#06b6d4",
        "Opinion" => "#84cc16",
        "Review" => "#f97316",
        _ => return tag_color(name, 1),
    };
    fixed.to_string()
}

/// Drop records (at any depth) used fewer than `min_count` times.
///
/// A category's count is recomputed from the children that survive, and the
/// category is dropped when that total falls below `min_count`.
pub fn filter_by_min_count(records: &[TagRecord], min_count: u32) -> Vec<TagRecord> {
    records
        .iter()
        .filter_map(|r| {
            let Some(children) = &r.children else {
                return (r.count >= min_count).then(|| r.clone());
            };
            let kept = filter_by_min_count(children, min_count);
            let count: u32 = kept.iter().map(|c| c.count).sum();
            (count > 0 && count >= min_count).then(|| TagRecord {
                count,
                children: Some(kept),
                ..r.clone()
            })
        })
        .collect()
}

/// The `limit` most used top-level records.
pub fn top_tags(records: &[TagRecord], limit: usize) -> Vec<TagRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(limit);
    sorted
}

/// Leaf tags of a (possibly hierarchical) record list, depth first.
pub fn flatten(records: &[TagRecord]) -> Vec<&TagRecord> {
    let mut out = Vec::new();
    for record in records {
        match &record.children {
            Some(children) if !children.is_empty() => out.extend(flatten(children)),
            _ => out.push(record),
        }
    }
    out
}

pub fn tag_stats(records: &[TagRecord]) -> TagSummary {
    let leaves = flatten(records);
    let most_used = leaves
        .iter()
        .filter(|t| t.count > 0)
        .fold(None::<&TagRecord>, |best, t| match best {
            Some(b) if b.count >= t.count => Some(b),
            _ => Some(t),
        });
    TagSummary {
        total_tags: leaves.len(),
        total_categories: records.iter().filter(|r| r.has_children()).count(),
        most_used_tag: most_used.map(|t| NamedCount {
            name: t.name.clone(),
            count: t.count,
        }),
    }
}

fn sort_by_count(records: &mut [TagRecord]) {
    records.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::post;

    fn counts(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        pairs.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    fn names(records: &[TagRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn assert_parent_sums(records: &[TagRecord]) {
        for r in records {
            if let Some(children) = &r.children {
                assert_eq!(r.count, children.iter().map(|c| c.count).sum::<u32>(), "{}", r.name);
                assert_parent_sums(children);
            }
        }
    }

    #[test]
    fn flat_order_by_count() {
        let records = flat_tags(&counts(&[("React", 5), ("TypeScript", 8), ("CSS", 2)]));
        assert_eq!(names(&records), vec!["TypeScript", "React", "CSS"]);
        assert!(records.iter().all(|r| r.color.is_some()));
    }

    #[test]
    fn flat_ties_break_by_name() {
        let records = flat_tags(&counts(&[("b", 1), ("a", 1), ("c", 2)]));
        assert_eq!(names(&records), vec!["c", "a", "b"]);
    }

    #[test]
    fn counting_skips_unpublished_and_duplicates() {
        let mut draft = post("Draft", Some("2024-01-01"), &["rust"]);
        draft.draft = true;
        let posts = vec![
            post("A", Some("2024-01-01"), &["rust", "web", "rust"]),
            post("B", None, &["rust"]),
            draft,
        ];
        let c = count_tags(&posts);
        assert_eq!(c["rust"], 2);
        assert_eq!(c["web"], 1);
    }

    #[test]
    fn default_hierarchy_classifies_case_insensitively() {
        let c = counts(&[
            ("React", 3),
            ("rust", 2),
            ("algorithm", 1),
            ("frontend", 4),
            ("howto", 1),
            ("life", 2),
        ]);
        let hierarchy = default_hierarchy(&c);
        let cats: Vec<(&str, Vec<&str>)> = hierarchy
            .iter()
            .map(|s| (s.name.as_str(), s.tags.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(
            cats,
            vec![
                ("Technology", vec!["React", "rust"]),
                ("Computer Science", vec!["algorithm"]),
                ("Web Development", vec!["frontend"]),
                ("Tutorials", vec!["howto"]),
                ("Other", vec!["life"]),
            ]
        );
    }

    #[test]
    fn default_hierarchy_omits_empty_categories() {
        let hierarchy = default_hierarchy(&counts(&[("rust", 1)]));
        assert_eq!(hierarchy.len(), 1);
        assert_eq!(hierarchy[0].name, "Technology");
    }

    #[test]
    fn hierarchical_sums_children() {
        let c = counts(&[("react", 5), ("typescript", 8), ("css", 2), ("travel", 4)]);
        let records = hierarchical_tags(&c, &default_hierarchy(&c));
        assert_eq!(names(&records), vec!["Technology", "Other"]);
        assert_eq!(records[0].count, 15);
        let children = records[0].children.as_ref().unwrap();
        assert_eq!(names(children), vec!["typescript", "react", "css"]);
        assert_eq!(children[0].category.as_deref(), Some("Technology"));
        assert_eq!(records[0].color.as_deref(), Some("#3b82f6"));
        assert_parent_sums(&records);
    }

    #[test]
    fn zero_total_categories_are_dropped() {
        let c = counts(&[("rust", 1)]);
        let hierarchy = vec![
            CategorySpec::new("Lang", vec!["rust".into()]),
            CategorySpec::new("Empty", vec!["cobol".into()]),
        ];
        let records = hierarchical_tags(&c, &hierarchy);
        assert_eq!(names(&records), vec!["Lang"]);
    }

    #[test]
    fn subcategories_nest_and_sum() {
        let c = counts(&[("rust", 3), ("go", 1), ("sql", 2)]);
        let hierarchy = vec![CategorySpec {
            name: "Engineering".into(),
            tags: vec!["sql".into()],
            color: Some("#123456".into()),
            subcategories: vec![CategorySpec::new("Languages", vec!["rust".into(), "go".into()])],
        }];
        let records = hierarchical_tags(&c, &hierarchy);
        assert_eq!(records[0].count, 6);
        let children = records[0].children.as_ref().unwrap();
        assert_eq!(names(children), vec!["sql", "Languages"]);
        assert_eq!(children[0].color.as_deref(), Some("#123456"));
        assert_eq!(children[1].count, 4);
        assert_parent_sums(&records);
    }

    #[test]
    fn user_hierarchy_collects_unlisted_into_other() {
        let c = counts(&[("react", 2), ("css", 1), ("cooking", 3)]);
        let mut config = BTreeMap::new();
        config.insert("Frontend".to_string(), vec!["react".to_string(), "css".to_string()]);
        let hierarchy = user_hierarchy(&config, &c);
        assert_eq!(hierarchy.len(), 2);
        assert_eq!(hierarchy[1].name, OTHER_CATEGORY);
        assert_eq!(hierarchy[1].tags, vec!["cooking"]);

        let records = hierarchical_tags(&c, &hierarchy);
        assert_eq!(records.iter().map(|r| r.count).sum::<u32>(), 6);
    }

    #[test]
    fn tag_records_follows_mode() {
        let posts = vec![post("A", Some("2024-01-01"), &["rust", "life"])];
        let flat = tag_records(
            &posts,
            &TreemapConfig {
                hierarchical: false,
                ..TreemapConfig::default()
            },
        );
        assert!(flat.iter().all(|r| r.children.is_none()));

        let nested = tag_records(&posts, &TreemapConfig::default());
        assert!(nested.iter().all(|r| r.has_children()));
    }

    #[test]
    fn hash_color_is_stable() {
        assert_eq!(tag_color("a", 0), "hsl(97, 45%, 60%)");
        assert_eq!(tag_color("ab", 1), "hsl(225, 46%, 61%)");
        assert_eq!(tag_color("rust", 31), tag_color("rust", 1));
    }

    #[test]
    fn hash_color_long_names_do_not_overflow() {
        let long = "a-very-long-tag-name-that-overflows-thirty-two-bits-many-times-over";
        assert!(tag_color(long, 3).starts_with("hsl("));
    }

    #[test]
    fn category_palette_and_fallback() {
        assert_eq!(category_color("Design"), "#ef4444");
        assert_eq!(category_color("Gardening"), tag_color("Gardening", 1));
    }

    #[test]
    fn min_count_filter_recurses() {
        let c = counts(&[("react", 5), ("css", 1)]);
        let records = hierarchical_tags(&c, &default_hierarchy(&c));
        let filtered = filter_by_min_count(&records, 2);
        assert_eq!(names(filtered[0].children.as_ref().unwrap()), vec!["react"]);
        assert_parent_sums(&filtered);
    }

    #[test]
    fn min_count_filter_recomputes_category_totals() {
        let c = counts(&[("react", 5), ("rust", 1)]);
        let records = hierarchical_tags(&c, &default_hierarchy(&c));
        let technology = records.iter().find(|r| r.name == "Technology").unwrap();
        assert_eq!(technology.count, 6);

        let filtered = filter_by_min_count(&records, 2);
        assert_parent_sums(&filtered);
        let technology = filtered.iter().find(|r| r.name == "Technology").unwrap();
        assert_eq!(technology.count, 5);
        assert_eq!(names(technology.children.as_ref().unwrap()), vec!["react"]);
    }

    #[test]
    fn min_count_filter_drops_categories_left_below_threshold() {
        let c = counts(&[("react", 1), ("css", 1), ("life", 4)]);
        let mut records = hierarchical_tags(&c, &default_hierarchy(&c));
        records.push(TagRecord {
            children: Some(Vec::new()),
            ..TagRecord::leaf("Empty", 3)
        });
        let filtered = filter_by_min_count(&records, 2);
        assert_parent_sums(&filtered);
        assert_eq!(names(&filtered), vec!["Other"]);
    }

    #[test]
    fn top_n() {
        let records = flat_tags(&counts(&[("a", 1), ("b", 3), ("c", 2)]));
        assert_eq!(names(&top_tags(&records, 2)), vec!["b", "c"]);
    }

    #[test]
    fn stats_over_leaves() {
        let c = counts(&[("react", 5), ("css", 1), ("life", 7)]);
        let records = hierarchical_tags(&c, &default_hierarchy(&c));
        let stats = tag_stats(&records);
        assert_eq!(stats.total_tags, 3);
        assert_eq!(stats.total_categories, 2);
        assert_eq!(
            stats.most_used_tag,
            Some(NamedCount {
                name: "life".into(),
                count: 7
            })
        );
        assert_eq!(tag_stats(&[]).most_used_tag, None);
    }
}
