//! HTML rendering of the visualizations.
//!
//! Stage 3 of the pipeline: turns the generated data into markup. The same
//! components back the static preview page (`visualizations.html`) and can
//! be embedded by a site template.
//!
//! ## Failure Handling
//!
//! Visualizations are optional page content. Each one is rendered through
//! [`boundary`], which swaps a failed render for a static fallback offering
//! a retry and a full page reload, so one broken chart never takes the page
//! down with it. With no data at all, a text summary or an empty state is
//! shown instead of an empty chart.
//!
//! ## Treemap Zoom Without Script
//!
//! Every zoom level is rendered as its own section with an id; categories
//! link to their level's fragment and CSS `:target` shows it. The root
//! level is visible whenever no other level is targeted.
//!
//! [`TreemapView`] only lays out a level when it is zoomed into. A static
//! page has no code that could do that on click, so the preview walks the
//! view through every category ahead of time and ships all levels.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.

use crate::calendar::{CalendarError, CalendarGrid, build_calendar, heatmap_palette};
use crate::config::{HeatmapConfig, TreemapConfig, VisualizationConfig};
use crate::loader::{Artifacts, LoadFailure, LoadState};
use crate::slug::slugify;
use crate::toc::{TocConfig, TocItem, TocPosition};
use crate::treemap::{Canvas, TreemapError, TreemapRect, TreemapView, apply_color_scheme, tag_link};
use crate::types::{ActivityRecord, ActivitySummary, TagRecord, TagSummary};
use chrono::NaiveDate;
use log::warn;
use maud::{DOCTYPE, Markup, html};
use thiserror::Error;

const CSS: &str = include_str!("../static/visualizations.css");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("calendar: {0}")]
    Calendar(#[from] CalendarError),
    #[error("treemap: {0}")]
    Treemap(#[from] TreemapError),
}

// ============================================================================
// Page
// ============================================================================

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

/// The standalone preview page written next to the artifacts.
pub fn render_preview(
    artifacts: &Artifacts,
    config: &VisualizationConfig,
    today: NaiveDate,
) -> Markup {
    let content = html! {
        main.visualizations {
            h1 { "Blog Activity" }
            (render_load_state(&LoadState::Ready(artifacts.clone()), config, today))
        }
    };
    base_document("Blog Activity", content)
}

/// Markup for each state of a client-side load.
pub fn render_load_state(state: &LoadState, config: &VisualizationConfig, today: NaiveDate) -> Markup {
    match state {
        LoadState::Loading => html! {
            div.viz-loading role="status" { "Loading visualizations..." }
        },
        LoadState::Failed(failure) => load_error(failure),
        LoadState::Ready(artifacts) => html! {
            @if let Some(stats) = &artifacts.stats {
                (render_summary(&stats.activity_stats, &stats.tag_stats))
            }
            @if config.heatmap.enabled {
                section.viz-section #activity {
                    h2 { "Publishing Activity" }
                    (boundary("activity heatmap", render_heatmap(&artifacts.activity, &config.heatmap, today)))
                }
            }
            @if config.treemap.enabled {
                section.viz-section #topics {
                    h2 { "Topics" }
                    (boundary("tag treemap", render_treemap(&artifacts.tags, &config.treemap)))
                }
            }
        },
    }
}

fn load_error(failure: &LoadFailure) -> Markup {
    html! {
        div.viz-error role="alert" {
            p { "Failed to load visualization data: " (failure.message) }
            @if failure.retryable {
                a.viz-retry href="" { "Try again" }
            }
        }
    }
}

/// Render `result`, or a static fallback if rendering failed.
///
/// Both fallback links request the page again, which re-runs every
/// component; "Retry" keeps the reader at the failed section.
pub fn boundary(name: &str, result: Result<Markup, RenderError>) -> Markup {
    match result {
        Ok(markup) => markup,
        Err(e) => {
            warn!("{name} failed to render: {e}");
            html! {
                div.viz-error id=(slugify(name)) role="alert" {
                    p { "The " (name) " could not be displayed." }
                    p.viz-error-detail { (e) }
                    a.viz-retry href={ "?retry=" (slugify(name)) "#" (slugify(name)) } { "Retry" }
                    a.viz-reload href="" { "Reload page" }
                }
            }
        }
    }
}

/// One-line text summary, also used when the charts are unavailable.
pub fn render_summary(activity: &ActivitySummary, tags: &TagSummary) -> Markup {
    let posts = plural(activity.total_posts as usize, "post", "posts");
    let days = plural(activity.active_days, "day", "days");
    html! {
        p.viz-summary {
            (activity.total_posts) " " (posts) " across " (activity.active_days) " " (days)
            @if let (Some(start), Some(end)) = (&activity.date_range.start, &activity.date_range.end) {
                ", from " (start) " to " (end)
            }
            ". "
            (tags.total_tags) " " (plural(tags.total_tags, "tag", "tags"))
            @if let Some(top) = &tags.most_used_tag {
                ", most used: " strong { (top.name) } " (" (top.count) ")"
            }
            "."
        }
    }
}

fn empty_state(message: &str) -> Markup {
    html! {
        div.viz-empty { (message) }
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

// ============================================================================
// Heatmap
// ============================================================================

pub fn render_heatmap(
    records: &[ActivityRecord],
    config: &HeatmapConfig,
    today: NaiveDate,
) -> Result<Markup, RenderError> {
    if records.is_empty() {
        return Ok(empty_state("No posts yet."));
    }
    let grid = build_calendar(records, today, config.weeks_to_show)?;
    Ok(heatmap_grid(&grid, config))
}

fn heatmap_grid(grid: &CalendarGrid, config: &HeatmapConfig) -> Markup {
    let palette = heatmap_palette(config, false);
    let weeks_style = format!("--weeks: {}", grid.weeks.len());
    let labels = grid.month_labels();
    let total = grid.total_count();

    html! {
        div.heatmap style=(weeks_style) {
            div.heatmap-months {
                @for (week, month) in &labels {
                    span style={ "grid-column: " (week + 1) } { (month) }
                }
            }
            div.heatmap-grid {
                @for week in &grid.weeks {
                    div.heatmap-week data-week=(week.label) {
                        @for cell in &week.days {
                            @let style = format!("background-color: {}", palette[usize::from(cell.level)]);
                            @let class = format!("heatmap-cell level-{}{}", cell.level, if cell.future { " future" } else { "" });
                            @let title = config.show_tooltips.then(|| cell.tooltip());
                            @if let [only] = cell.posts.as_slice() {
                                a class=(class) style=(style) data-date=(cell.date) title=[title] href={ "/blog/" (only.slug) } {}
                            } @else {
                                span class=(class) style=(style) data-date=(cell.date) title=[title] {}
                            }
                        }
                    }
                }
            }
            div.heatmap-legend {
                span { "Less" }
                @for color in &palette {
                    span.heatmap-cell style={ "background-color: " (color) } {}
                }
                span { "More" }
            }
            p.viz-summary {
                (total) " " (plural(total as usize, "post", "posts")) " in the last "
                (grid.weeks.len()) " " (plural(grid.weeks.len(), "week", "weeks"))
            }
        }
    }
}

// ============================================================================
// Treemap
// ============================================================================

/// The treemap with one section per zoom level (root only when zoom is off).
pub fn render_treemap(records: &[TagRecord], config: &TreemapConfig) -> Result<Markup, RenderError> {
    if records.iter().all(|r| r.count == 0) {
        return Ok(empty_state("No tags yet."));
    }
    let canvas = Canvas::from_config(config);

    let mut paths: Vec<Vec<String>> = vec![Vec::new()];
    if config.enable_zoom {
        collect_zoom_paths(records, &mut Vec::new(), &mut paths);
    }

    let mut levels = Vec::with_capacity(paths.len());
    for path in &paths {
        let mut view = TreemapView::new(records);
        for name in path {
            view.zoom_in(name);
        }
        let mut rects = view.layout(&canvas)?;
        apply_color_scheme(
            &mut rects,
            config.color_scheme,
            config.custom_colors.as_deref(),
        );
        levels.push(treemap_level(path, &rects, &canvas, config));
    }

    Ok(html! {
        div.treemap {
            @for level in &levels {
                (level)
            }
        }
    })
}

fn collect_zoom_paths(records: &[TagRecord], prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    for record in records.iter().filter(|r| r.has_children()) {
        prefix.push(record.name.clone());
        out.push(prefix.clone());
        if let Some(children) = &record.children {
            collect_zoom_paths(children, prefix, out);
        }
        prefix.pop();
    }
}

fn level_id(path: &[String]) -> String {
    path.iter().fold("treemap".to_string(), |mut id, name| {
        id.push('-');
        id.push_str(&slugify(name));
        id
    })
}

fn treemap_level(path: &[String], rects: &[TreemapRect], canvas: &Canvas, config: &TreemapConfig) -> Markup {
    let bottom = rects.iter().map(|r| r.y2 + canvas.padding).fold(canvas.height, f64::max);
    let canvas_style = format!("width: {}px; height: {:.0}px", canvas.width, bottom);
    let shown = rects.len();

    html! {
        section.treemap-level.root[path.is_empty()] id=(level_id(path)) {
            @if !path.is_empty() {
                nav.treemap-breadcrumb {
                    a href="#treemap" { "All Tags" }
                    @for i in 0..path.len() {
                        " / "
                        a href={ "#" (level_id(&path[..=i])) } { (path[i]) }
                    }
                }
            }
            div.treemap-canvas style=(canvas_style) {
                @for rect in rects {
                    @let style = format!(
                        "left: {:.1}px; top: {:.1}px; width: {:.1}px; height: {:.1}px; background-color: {}; font-size: {:.0}px",
                        rect.x1, rect.y1, rect.width(), rect.height(), rect.color, rect.font_size()
                    );
                    a.treemap-rect style=(style) title=(rect.title()) href=[rect_href(path, rect, config)] {
                        @if let Some(label) = rect.label() {
                            span { (label) }
                        }
                    }
                }
            }
            p.treemap-hint {
                @if config.enable_zoom { "Click on categories to zoom in • " }
                "Hover for details • " (shown) " " (plural(shown, "tag", "tags")) " shown"
            }
        }
    }
}

/// Categories link to their zoom level, leaves to their tag page.
fn rect_href(path: &[String], rect: &TreemapRect, config: &TreemapConfig) -> Option<String> {
    if rect.zoomable {
        config.enable_zoom.then(|| {
            let mut child = path.to_vec();
            child.push(rect.name.clone());
            format!("#{}", level_id(&child))
        })
    } else {
        config.link_to_tag_pages.then(|| tag_link(&rect.name))
    }
}

// ============================================================================
// Table of contents
// ============================================================================

/// A post's table of contents. `active` is the heading to highlight.
pub fn render_toc(items: &[TocItem], config: &TocConfig, active: Option<&str>) -> Markup {
    let position = match config.position {
        TocPosition::Auto => "auto",
        TocPosition::Sidebar => "sidebar",
        TocPosition::Top => "top",
        TocPosition::Floating => "floating",
    };
    let list = html! {
        ul {
            @for item in items {
                li class={ "depth-" (item.depth) } {
                    a.active[active == Some(item.id())] href=(item.url) { (item.value) }
                }
            }
        }
    };

    html! {
        nav class={ "toc toc-" (position) @if config.sticky { " sticky" } } aria-label="Table of contents" {
            @if config.show_toggle {
                details open {
                    summary { "On this page" }
                    (list)
                }
            } @else {
                p.toc-title { "On this page" }
                (list)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{activity_stats, bucket_posts};
    use crate::tags::{flat_tags, tag_stats, tag_records};
    use crate::test_helpers::{post, sample_posts};
    use crate::types::VisualizationStats;
    use std::collections::BTreeMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()
    }

    fn artifacts() -> Artifacts {
        let posts = sample_posts();
        let activity = bucket_posts(&posts);
        let tags = tag_records(&posts, &TreemapConfig::default());
        Artifacts {
            stats: Some(VisualizationStats {
                activity_stats: activity_stats(&activity),
                tag_stats: tag_stats(&tags),
                generated_at: "2024-03-16T00:00:00Z".into(),
            }),
            activity,
            tags,
        }
    }

    #[test]
    fn preview_is_a_full_document() {
        let html = render_preview(&artifacts(), &VisualizationConfig::default(), today()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Publishing Activity"));
        assert!(html.contains("Topics"));
        assert!(html.contains("viz-summary"));
    }

    #[test]
    fn disabled_visualizations_are_omitted() {
        let mut config = VisualizationConfig::default();
        config.treemap.enabled = false;
        let html = render_preview(&artifacts(), &config, today()).into_string();
        assert!(html.contains("Publishing Activity"));
        assert!(!html.contains("treemap-canvas"));
    }

    #[test]
    fn heatmap_has_one_cell_per_day() {
        let config = HeatmapConfig {
            weeks_to_show: 4,
            ..HeatmapConfig::default()
        };
        let records = bucket_posts(&[post("Only", Some("2024-03-11"), &[])]);
        let html = render_heatmap(&records, &config, today()).unwrap().into_string();
        assert_eq!(html.matches("data-date=").count(), 28);
        assert!(html.contains(r#"href="/blog/only""#));
        assert!(html.contains("1 post on Mar 11, 2024"));
    }

    #[test]
    fn heatmap_tooltips_can_be_disabled() {
        let config = HeatmapConfig {
            show_tooltips: false,
            ..HeatmapConfig::default()
        };
        let records = bucket_posts(&[post("Only", Some("2024-03-11"), &[])]);
        let html = render_heatmap(&records, &config, today()).unwrap().into_string();
        assert!(!html.contains("title="));
    }

    #[test]
    fn heatmap_without_posts_is_empty_state() {
        let html = render_heatmap(&[], &HeatmapConfig::default(), today()).unwrap().into_string();
        assert!(html.contains("No posts yet."));
    }

    #[test]
    fn heatmap_with_zero_weeks_fails() {
        let config = HeatmapConfig {
            weeks_to_show: 0,
            ..HeatmapConfig::default()
        };
        let records = bucket_posts(&[post("Only", Some("2024-03-11"), &[])]);
        assert!(matches!(
            render_heatmap(&records, &config, today()),
            Err(RenderError::Calendar(CalendarError::NoWeeks))
        ));
    }

    #[test]
    fn treemap_renders_zoom_levels() {
        let html = render_treemap(&artifacts().tags, &TreemapConfig::default())
            .unwrap()
            .into_string();
        assert!(html.contains(r#"id="treemap""#));
        assert!(html.contains(r#"id="treemap-technology""#));
        assert!(html.contains(r##"href="#treemap-technology""##));
        assert!(html.contains("All Tags"));
        assert!(html.contains(r#"href="/tags/rust""#));
    }

    #[test]
    fn treemap_without_zoom_renders_root_only() {
        let config = TreemapConfig {
            enable_zoom: false,
            ..TreemapConfig::default()
        };
        let html = render_treemap(&artifacts().tags, &config).unwrap().into_string();
        assert_eq!(html.matches("treemap-level").count(), 1);
        assert!(!html.contains("Click on categories"));
    }

    #[test]
    fn flat_treemap_links_tags() {
        let counts: BTreeMap<String, u32> = [("Web Dev".to_string(), 3)].into_iter().collect();
        let html = render_treemap(&flat_tags(&counts), &TreemapConfig::default())
            .unwrap()
            .into_string();
        assert!(html.contains(r#"href="/tags/web-dev""#));
        assert!(html.contains("Web Dev: 3 posts"));
    }

    #[test]
    fn invalid_canvas_goes_through_boundary() {
        let config = TreemapConfig {
            width: 0.0,
            ..TreemapConfig::default()
        };
        let html = boundary("tag treemap", render_treemap(&artifacts().tags, &config)).into_string();
        assert!(html.contains("viz-error"));
        assert!(html.contains(r#"id="tag-treemap""#));
        assert!(html.contains(r##"href="?retry=tag-treemap#tag-treemap">Retry</a>"##));
        assert!(html.contains(r#"href="">Reload page</a>"#));
    }

    #[test]
    fn load_states() {
        let config = VisualizationConfig::default();
        let loading = render_load_state(&LoadState::Loading, &config, today()).into_string();
        assert!(loading.contains("Loading visualizations"));

        let failed = render_load_state(
            &LoadState::Failed(LoadFailure {
                message: "failed to load /activity-data.json: 500 Internal Server Error".into(),
                retryable: true,
            }),
            &config,
            today(),
        )
        .into_string();
        assert!(failed.contains("500 Internal Server Error"));
        assert!(failed.contains("Try again"));
    }

    #[test]
    fn toc_marks_active_and_depth() {
        let items = vec![
            TocItem {
                value: "Intro".into(),
                url: "#intro".into(),
                depth: 2,
            },
            TocItem {
                value: "Details".into(),
                url: "#details".into(),
                depth: 3,
            },
        ];
        let html = render_toc(&items, &TocConfig::default(), Some("details")).into_string();
        assert!(html.contains(r#"class="toc toc-auto sticky""#));
        assert!(html.contains(r##"<a class="active" href="#details">"##));
        assert!(html.contains("depth-3"));
        assert!(!html.contains("<details"));

        let toggled = TocConfig {
            show_toggle: true,
            sticky: false,
            ..TocConfig::default()
        };
        let html = render_toc(&items, &toggled, None).into_string();
        assert!(html.contains("<details open>"));
        assert!(!html.contains("sticky"));
    }

    #[test]
    fn markup_is_escaped() {
        let counts: BTreeMap<String, u32> =
            [("<script>".to_string(), 1)].into_iter().collect();
        let config = TreemapConfig {
            width: 1000.0,
            ..TreemapConfig::default()
        };
        let html = render_treemap(&flat_tags(&counts), &config).unwrap().into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
