//! Shared types used across all pipeline stages.
//!
//! These types are serialized to JSON between stages (scan → generate) and
//! into the public artifacts the client fetches, so field names follow the
//! wire format (`camelCase` where the client expects it).

use serde::{Deserialize, Serialize};

/// A blog post as supplied by the content scan.
///
/// Only the metadata needed by the visualizations and the table of contents
/// is kept; rendering the post itself happens elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    /// URL slug, relative to the blog root (e.g. `rust/ownership`).
    pub slug: String,
    /// Raw publication date from frontmatter. Parsed lazily by
    /// [`crate::activity::parse_post_date`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft: bool,
    /// Category index placeholder posts are excluded from every visualization.
    #[serde(default)]
    pub category: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Per-post table-of-contents override from frontmatter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc: Option<crate::toc::PostTocOverride>,
    /// Path of the source file relative to the content root.
    pub source_path: String,
    /// Markdown body with frontmatter stripped.
    #[serde(default)]
    pub body: String,
}

impl Post {
    /// Published posts are neither drafts nor category placeholders.
    pub fn is_published(&self) -> bool {
        !self.draft && !self.category
    }
}

/// Title and slug of a post, as listed under a heatmap day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    pub slug: String,
}

/// One calendar day with at least one published item.
///
/// `count` always equals `posts.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// `YYYY-MM-DD`
    pub date: String,
    pub count: u32,
    #[serde(default)]
    pub posts: Vec<PostSummary>,
}

/// A tag, or a category aggregating child tags.
///
/// For categories, `count` equals the sum of the children's counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Name of the enclosing category, for tags placed by a hierarchy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TagRecord>>,
}

impl TagRecord {
    pub fn leaf(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
            color: None,
            category: None,
            children: None,
        }
    }

    /// True when this record is a category with at least one child.
    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Summary statistics written next to the data artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationStats {
    pub activity_stats: ActivitySummary,
    pub tag_stats: TagSummary,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_days: usize,
    pub total_posts: u32,
    pub active_days: usize,
    pub max_posts_in_day: u32,
    pub average_posts_per_active_day: f64,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSummary {
    pub total_tags: usize,
    pub total_categories: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_used_tag: Option<NamedCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    pub count: u32,
}
