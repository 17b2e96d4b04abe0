//! Table-of-contents extraction.
//!
//! Headings are collected from a post's markdown (or from HTML that was
//! rendered elsewhere) and every heading gets a fragment id. Explicit ids win:
//! `## Setup {#install}` keeps `install`. Other headings are slugified with a
//! per-document [`Slugger`], so two `## Setup` headings become `setup` and
//! `setup-1`.
//!
//! Whether a post shows its TOC is decided by the site `[toc]` section merged
//! with the post's own `toc:` frontmatter (see [`resolve_toc_config`]).

use crate::config::Section;
use crate::slug::{Slugger, slugify};
use crate::types::Post;
use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// One entry of a table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocItem {
    /// Heading text with markup stripped.
    pub value: String,
    /// `#fragment` pointing at the heading.
    pub url: String,
    /// Heading level, 1-6.
    pub depth: u8,
}

impl TocItem {
    /// The fragment id without the leading `#`.
    pub fn id(&self) -> &str {
        self.url.trim_start_matches('#')
    }
}

/// Headings plus the HTML they were found in, with ids injected.
#[derive(Debug, Clone, PartialEq)]
pub struct TocDocument {
    pub items: Vec<TocItem>,
    pub html: String,
}

/// Where the TOC is placed on the post page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocPosition {
    #[default]
    Auto,
    Sidebar,
    Top,
    Floating,
}

const POSITIONS: &[(&str, TocPosition)] = &[
    ("auto", TocPosition::Auto),
    ("sidebar", TocPosition::Sidebar),
    ("top", TocPosition::Top),
    ("floating", TocPosition::Floating),
];

impl TocPosition {
    fn parse(name: &str) -> Option<Self> {
        POSITIONS.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
    }
}

/// Site-wide `[toc]` configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    pub enabled: bool,
    /// Posts with fewer headings get no TOC.
    pub min_headings: u32,
    /// Deepest heading level listed.
    pub max_depth: u8,
    pub position: TocPosition,
    pub sticky: bool,
    pub show_toggle: bool,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_headings: 3,
            max_depth: 6,
            position: TocPosition::Auto,
            sticky: true,
            show_toggle: false,
        }
    }
}

impl TocConfig {
    pub(crate) fn overlay(self, s: &mut Section<'_>) -> Self {
        Self {
            enabled: s.bool("enabled", self.enabled),
            min_headings: s.uint_in("min_headings", 1..=u32::MAX, self.min_headings),
            max_depth: s.uint_in("max_depth", 1..=6, u32::from(self.max_depth)) as u8,
            position: s.choice("position", POSITIONS, self.position),
            sticky: s.bool("sticky", self.sticky),
            show_toggle: s.bool("show_toggle", self.show_toggle),
        }
    }

    /// True when a TOC should be shown for these headings.
    pub fn shows(&self, items: &[TocItem]) -> bool {
        self.enabled && should_show_toc(items, self.min_headings)
    }
}

/// The `toc:` frontmatter of a post: either `toc: false` or a partial table.
///
/// Numeric fields are kept wide so out-of-range values survive parsing and
/// can be replaced by defaults in [`resolve_toc_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostTocOverride {
    Enabled(bool),
    Custom(PartialTocConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialTocConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(alias = "min_headings", skip_serializing_if = "Option::is_none")]
    pub min_headings: Option<i64>,
    #[serde(alias = "max_depth", skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticky: Option<bool>,
    #[serde(alias = "show_toggle", skip_serializing_if = "Option::is_none")]
    pub show_toggle: Option<bool>,
}

/// Merge a post's frontmatter override on top of the site configuration.
///
/// Values the post sets out of range fall back to the stock defaults
/// (`min_headings` 3, `max_depth` 6, `position` auto).
pub fn resolve_toc_config(site: &TocConfig, post: Option<&PostTocOverride>) -> TocConfig {
    let defaults = TocConfig::default();
    match post {
        None => site.clone(),
        Some(PostTocOverride::Enabled(enabled)) => TocConfig {
            enabled: *enabled,
            ..site.clone()
        },
        Some(PostTocOverride::Custom(p)) => TocConfig {
            enabled: p.enabled.unwrap_or(site.enabled),
            min_headings: match p.min_headings {
                None => site.min_headings,
                Some(n) => u32::try_from(n)
                    .ok()
                    .filter(|n| *n >= 1)
                    .unwrap_or(defaults.min_headings),
            },
            max_depth: match p.max_depth {
                None => site.max_depth,
                Some(n) => u8::try_from(n)
                    .ok()
                    .filter(|n| (1..=6).contains(n))
                    .unwrap_or(defaults.max_depth),
            },
            position: match &p.position {
                None => site.position,
                Some(name) => TocPosition::parse(name).unwrap_or(defaults.position),
            },
            sticky: p.sticky.unwrap_or(site.sticky),
            show_toggle: p.show_toggle.unwrap_or(site.show_toggle),
        },
    }
}

pub fn should_show_toc(items: &[TocItem], min_headings: u32) -> bool {
    items.len() >= min_headings as usize
}

/// Drop headings deeper than `max_depth`.
pub fn filter_by_depth(items: Vec<TocItem>, max_depth: u8) -> Vec<TocItem> {
    items.into_iter().filter(|i| i.depth <= max_depth).collect()
}

/// Render markdown to HTML, assigning an id to every heading.
pub fn extract_toc(markdown: &str) -> TocDocument {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, options).collect();

    let mut slugger = Slugger::new();
    for event in &events {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            slugger.reserve(id);
        }
    }

    let mut items = Vec::new();
    let mut i = 0;
    while i < events.len() {
        let Event::Start(Tag::Heading { level, id, .. }) = &events[i] else {
            i += 1;
            continue;
        };
        let depth = heading_depth(*level);
        let explicit = id.as_ref().map(|id| id.to_string());

        let mut text = String::new();
        let mut end = i + 1;
        while end < events.len() && !matches!(events[end], Event::End(TagEnd::Heading(_))) {
            match &events[end] {
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                _ => {}
            }
            end += 1;
        }

        let id = match explicit {
            Some(id) => id,
            None => {
                let id = unique_slug(&mut slugger, &text);
                if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[i] {
                    *slot = Some(CowStr::from(id.clone()));
                }
                id
            }
        };

        items.push(TocItem {
            value: text.trim().to_string(),
            url: format!("#{id}"),
            depth,
        });
        i = end + 1;
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    TocDocument { items, html: out }
}

/// Extract headings from already-rendered HTML.
///
/// Headings without an `id` attribute get one injected into the returned
/// HTML. Nested markup inside a heading is stripped from its TOC text.
pub fn extract_toc_from_html(input: &str) -> TocDocument {
    static HEADING: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<h([1-6])(\s[^>]*)?>(.*?)</h[1-6]\s*>").expect("heading pattern is valid")
    });
    static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(?i)\sid\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("id pattern is valid")
    });
    static TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

    let existing_id = |attrs: &str| {
        ID_ATTR
            .captures(attrs)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().to_string())
            .filter(|id| !id.is_empty())
    };

    let mut slugger = Slugger::new();
    for caps in HEADING.captures_iter(input) {
        if let Some(id) = caps.get(2).and_then(|a| existing_id(a.as_str())) {
            slugger.reserve(&id);
        }
    }

    let mut items = Vec::new();
    let mut out = String::with_capacity(input.len() + 64);
    let mut last = 0;
    for caps in HEADING.captures_iter(input) {
        let whole = &caps[0];
        let start = caps.get(0).map_or(0, |m| m.start());
        let depth = caps[1].parse::<u8>().unwrap_or(1);
        let attrs = caps.get(2).map_or("", |m| m.as_str());
        let text = decode_entities(&TAG.replace_all(&caps[3], ""));
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        out.push_str(&input[last..start]);
        let id = match existing_id(attrs) {
            Some(id) => {
                out.push_str(whole);
                id
            }
            None => {
                let id = unique_slug(&mut slugger, &text);
                let open_len = 3 + attrs.len();
                out.push_str(&whole[..open_len]);
                out.push_str(&format!(" id=\"{id}\""));
                out.push_str(&whole[open_len..]);
                id
            }
        };
        last = start + whole.len();

        items.push(TocItem {
            value: text,
            url: format!("#{id}"),
            depth,
        });
    }
    out.push_str(&input[last..]);

    TocDocument { items, html: out }
}

/// Table of contents for a post, or `None` if the post should not show one.
pub fn post_toc(post: &Post, site: &TocConfig) -> Option<Vec<TocItem>> {
    let config = resolve_toc_config(site, post.toc.as_ref());
    if !config.enabled {
        return None;
    }
    let items = filter_by_depth(extract_toc(&post.body).items, config.max_depth);
    config.shows(&items).then_some(items)
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Headings whose text slugifies to nothing share the `section` base.
fn unique_slug(slugger: &mut Slugger, text: &str) -> String {
    if slugify(text).is_empty() {
        slugger.next_slug("section")
    } else {
        slugger.next_slug(text)
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
