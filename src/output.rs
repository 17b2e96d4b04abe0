//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Posts lead with their
//! positional index and title; source paths are secondary context on
//! indented `Source:` lines. Artifacts lead with what they contain and name
//! the file they were written to.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Posts
//! 001 Hello World (2024-01-05)
//!     Source: hello-world.md
//!     Tags: rust, tutorial
//! 002 Rust [category index]
//!     Source: rust/index.md
//!
//! Config
//!     config.toml
//!
//! Scanned 2 posts: 1 published, 1 category index
//! ```
//!
//! ## Generate
//!
//! ```text
//! Activity → activity-data.json
//!     12 active days, 14 posts (max 3 in a day)
//!     Range: 2024-01-05 to 2024-03-11
//!     Busiest week: 2024-W11 (4 posts)
//! Tags → tag-data.json
//!     9 tags in 4 categories, most used: rust (5)
//! Stats → visualization-stats.json
//! Preview → visualizations.html
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::config::{ConfigError, VisualizationConfig};
use crate::features::FeatureFlags;
use crate::generate::{ACTIVITY_FILE, GenerateReport, PREVIEW_FILE, STATS_FILE, TAGS_FILE};
use crate::scan::PostManifest;
use crate::toc::TocItem;
use crate::types::Post;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

/// Header line for a post: index, title, then date or status.
///
/// ```text
/// 001 Hello World (2024-01-05)
/// 002 Next Steps [draft]
/// 003 Rust [category index]
/// ```
fn post_header(index: usize, post: &Post) -> String {
    let title = truncate(&post.title, 60);
    let head = format!("{} {}", format_index(index), title);
    if post.category {
        format!("{head} [category index]")
    } else if post.draft {
        format!("{head} [draft]")
    } else {
        match &post.date {
            Some(date) => format!("{head} ({date})"),
            None => format!("{head} (undated)"),
        }
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output listing discovered posts.
pub fn format_scan_output(manifest: &PostManifest, config_present: bool) -> Vec<String> {
    let mut lines = Vec::new();

    if !manifest.posts.is_empty() {
        lines.push("Posts".to_string());
        for (i, post) in manifest.posts.iter().enumerate() {
            lines.push(post_header(i + 1, post));
            lines.push(format!("{}Source: {}", indent(1), post.source_path));
            if !post.tags.is_empty() {
                lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
            }
        }
        lines.push(String::new());
    }

    lines.push("Config".to_string());
    if config_present {
        lines.push(format!("{}config.toml", indent(1)));
    } else {
        lines.push(format!("{}(defaults)", indent(1)));
    }

    if !manifest.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for w in &manifest.warnings {
            lines.push(format!("{}{}", indent(1), w));
        }
    }

    let published = manifest.published().count();
    let drafts = manifest.posts.iter().filter(|p| p.draft).count();
    let indexes = manifest.posts.iter().filter(|p| p.category).count();
    let mut parts = vec![format!("{published} published")];
    if drafts > 0 {
        parts.push(plural(drafts, "draft", "drafts"));
    }
    if indexes > 0 {
        parts.push(plural(indexes, "category index", "category indexes"));
    }
    lines.push(String::new());
    lines.push(format!(
        "Scanned {}: {}",
        plural(manifest.posts.len(), "post", "posts"),
        parts.join(", ")
    ));

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &PostManifest, config_present: bool) {
    for line in format_scan_output(manifest, config_present) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output summarizing each artifact.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let activity = &report.stats.activity_stats;
    let tags = &report.stats.tag_stats;

    if report.cached {
        lines.push(format!(
            "Artifacts unchanged in {} (cached)",
            report.output_dir.display()
        ));
    }

    lines.push(format!("Activity → {ACTIVITY_FILE}"));
    lines.push(format!(
        "{}{}, {} (max {} in a day)",
        indent(1),
        plural(activity.active_days, "active day", "active days"),
        plural(activity.total_posts as usize, "post", "posts"),
        activity.max_posts_in_day
    ));
    if let (Some(start), Some(end)) = (&activity.date_range.start, &activity.date_range.end) {
        lines.push(format!("{}Range: {start} to {end}", indent(1)));
    }
    if let Some((week, count)) = &report.busiest_week {
        lines.push(format!(
            "{}Busiest week: {week} ({})",
            indent(1),
            plural(*count as usize, "post", "posts")
        ));
    }
    if report.external_days > 0 {
        lines.push(format!(
            "{}External: {}",
            indent(1),
            plural(report.external_days, "day", "days")
        ));
    }

    lines.push(format!("Tags → {TAGS_FILE}"));
    let mut tag_line = format!("{}{}", indent(1), plural(tags.total_tags, "tag", "tags"));
    if tags.total_categories > 0 {
        tag_line.push_str(&format!(
            " in {}",
            plural(tags.total_categories, "category", "categories")
        ));
    }
    if let Some(top) = &tags.most_used_tag {
        tag_line.push_str(&format!(", most used: {} ({})", top.name, top.count));
    }
    lines.push(tag_line);

    lines.push(format!("Stats → {STATS_FILE}"));
    lines.push(format!("Preview → {PREVIEW_FILE}"));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the `check` command: effective feature flags plus validation.
pub fn format_check_output(
    flags: &FeatureFlags,
    validation: &Result<(), ConfigError>,
    warnings: &[String],
) -> Vec<String> {
    let mut lines = vec!["Features".to_string()];
    for (feature, enabled) in flags.status() {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            feature,
            if enabled { "on" } else { "off" }
        ));
    }

    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for w in warnings {
            lines.push(format!("{}{}", indent(1), w));
        }
    }

    lines.push(String::new());
    match validation {
        Ok(()) => lines.push("Config is valid".to_string()),
        Err(e) => lines.push(format!("Config is invalid: {e}")),
    }
    lines
}

pub fn print_check_output(
    flags: &FeatureFlags,
    validation: &Result<(), ConfigError>,
    warnings: &[String],
) {
    for line in format_check_output(flags, validation, warnings) {
        println!("{}", line);
    }
}

// ============================================================================
// TOC output
// ============================================================================

/// Format a post's table of contents as an indented outline.
///
/// ```text
/// Hello World
///     Introduction  #introduction
///         Details  #details
/// ```
///
/// Nesting is relative to the shallowest heading present.
pub fn format_toc_output(post: &Post, items: Option<&[TocItem]>) -> Vec<String> {
    let mut lines = vec![post.title.clone()];
    match items {
        None => lines.push(format!("{}(no table of contents)", indent(1))),
        Some(items) => {
            let top = items.iter().map(|i| i.depth).min().unwrap_or(1);
            for item in items {
                let depth = usize::from(item.depth - top) + 1;
                lines.push(format!("{}{}  {}", indent(depth), item.value, item.url));
            }
        }
    }
    lines
}

pub fn print_toc_output(post: &Post, items: Option<&[TocItem]>) {
    for line in format_toc_output(post, items) {
        println!("{}", line);
    }
}

/// Format the resolved configuration as TOML for `check --verbose`.
pub fn format_config(config: &VisualizationConfig) -> Vec<String> {
    match toml::to_string_pretty(config) {
        Ok(text) => text.lines().map(str::to_string).collect(),
        Err(e) => vec![format!("(config could not be displayed: {e})")],
    }
}

// ============================================================================
// Tests
// ============================================================================
