//! Visualization configuration.
//!
//! Handles loading and layering `config.toml`. Configuration is resolved in
//! four layers, each overriding the one below:
//!
//! ```text
//! stock defaults  ←  preset  ←  content/config.toml  ←  environment
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! preset = "standard"          # minimal | standard | comprehensive
//!
//! [heatmap]
//! enabled = true
//! weeks_to_show = 52           # 1-104
//! color_scheme = "github"      # github | custom
//! # custom_colors = ["#eee", "#9be9a8", "#40c463", "#30a14e", "#216e39"]
//! show_tooltips = true
//!
//! [treemap]
//! enabled = true
//! hierarchical = true
//! color_scheme = "category"    # category | frequency | custom
//! enable_zoom = true
//! link_to_tag_pages = true
//! width = 600.0
//! height = 400.0
//! padding = 2.0
//!
//! [treemap.tag_hierarchy]
//! Frontend = ["react", "css"]
//!
//! [external.github]
//! enabled = false
//! username = "octocat"
//! include_private = false
//! events_file = "github-events.json"
//!
//! [toc]
//! enabled = true
//! min_headings = 3
//! max_depth = 6
//! position = "auto"            # auto | sidebar | top | floating
//! sticky = true
//! show_toggle = false
//! ```
//!
//! ## Invalid Values
//!
//! Visualizations are optional page decoration, so a bad value never fails
//! the build. Out-of-range numbers, unknown schemes, wrongly-typed keys, and
//! even a `config.toml` that is not valid TOML are replaced by the value of
//! the layer below, and a warning is recorded and logged. Use
//! [`VisualizationConfig::validate`] (the `check` command) for a strict pass.

use crate::toc::TocConfig;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "config.toml";
pub const WEEKS_RANGE: RangeInclusive<u32> = 1..=104;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Fully resolved configuration for all visualizations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    pub heatmap: HeatmapConfig,
    pub treemap: TreemapConfig,
    pub external: ExternalConfig,
    pub toc: TocConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub enabled: bool,
    /// Number of week columns in the calendar grid.
    pub weeks_to_show: u32,
    pub color_scheme: HeatmapColorScheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_colors: Option<Vec<String>>,
    pub show_tooltips: bool,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weeks_to_show: 52,
            color_scheme: HeatmapColorScheme::Github,
            custom_colors: None,
            show_tooltips: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapColorScheme {
    #[default]
    Github,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapConfig {
    pub enabled: bool,
    pub hierarchical: bool,
    /// Category name → member tag names. `None` uses the built-in patterns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_hierarchy: Option<BTreeMap<String, Vec<String>>>,
    pub color_scheme: TreemapColorScheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_colors: Option<Vec<String>>,
    pub enable_zoom: bool,
    pub link_to_tag_pages: bool,
    /// Canvas size used for the static layout.
    pub width: f64,
    pub height: f64,
    /// Gap left on the right/bottom of every rectangle and between rows.
    pub padding: f64,
}

impl Default for TreemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hierarchical: true,
            tag_hierarchy: None,
            color_scheme: TreemapColorScheme::Category,
            custom_colors: None,
            enable_zoom: true,
            link_to_tag_pages: true,
            width: 600.0,
            height: 400.0,
            padding: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreemapColorScheme {
    #[default]
    Category,
    Frequency,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubConfig>,
}

impl ExternalConfig {
    /// True when any external integration is switched on.
    pub fn any_enabled(&self) -> bool {
        self.github.as_ref().is_some_and(|g| g.enabled)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub enabled: bool,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub include_private: bool,
    /// Saved response of the user-events API, relative to the content root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_file: Option<String>,
}

/// Named starting points for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    Minimal,
    #[default]
    Standard,
    Comprehensive,
}

impl Preset {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "minimal" => Some(Self::Minimal),
            "standard" => Some(Self::Standard),
            "comprehensive" => Some(Self::Comprehensive),
            _ => None,
        }
    }

    pub fn config(self) -> VisualizationConfig {
        match self {
            Preset::Standard => VisualizationConfig::default(),
            Preset::Minimal => VisualizationConfig {
                heatmap: HeatmapConfig {
                    weeks_to_show: 26,
                    show_tooltips: false,
                    ..HeatmapConfig::default()
                },
                treemap: TreemapConfig {
                    enabled: false,
                    hierarchical: false,
                    enable_zoom: false,
                    link_to_tag_pages: false,
                    ..TreemapConfig::default()
                },
                ..VisualizationConfig::default()
            },
            Preset::Comprehensive => VisualizationConfig {
                heatmap: HeatmapConfig {
                    weeks_to_show: 78,
                    ..HeatmapConfig::default()
                },
                treemap: TreemapConfig {
                    color_scheme: TreemapColorScheme::Frequency,
                    ..TreemapConfig::default()
                },
                external: ExternalConfig {
                    github: Some(GithubConfig::default()),
                },
                ..VisualizationConfig::default()
            },
        }
    }
}

/// Result of [`load_config`]: the resolved config plus every coercion made.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: VisualizationConfig,
    pub warnings: Vec<String>,
    /// The `config.toml` that contributed, if one was read successfully.
    pub source: Option<PathBuf>,
}

impl VisualizationConfig {
    /// Apply a sparse TOML table on top of `self`.
    ///
    /// Keys that are missing keep the current value. Keys with invalid values
    /// also keep the current value (or the first valid choice for enum-like
    /// keys) and add a warning.
    pub fn overlay(mut self, table: &toml::Table, warnings: &mut Vec<String>) -> Self {
        if let Some(t) = subtable(table, "", "heatmap", warnings) {
            let mut s = Section::new("heatmap", t, warnings);
            let h = &mut self.heatmap;
            h.enabled = s.bool("enabled", h.enabled);
            h.weeks_to_show = s.uint_in("weeks_to_show", WEEKS_RANGE, h.weeks_to_show);
            h.color_scheme = s.choice(
                "color_scheme",
                &[
                    ("github", HeatmapColorScheme::Github),
                    ("custom", HeatmapColorScheme::Custom),
                ],
                h.color_scheme,
            );
            h.custom_colors = s.colors("custom_colors", h.custom_colors.take());
            h.show_tooltips = s.bool("show_tooltips", h.show_tooltips);
        }

        if let Some(t) = subtable(table, "", "treemap", warnings) {
            let mut s = Section::new("treemap", t, warnings);
            let tm = &mut self.treemap;
            tm.enabled = s.bool("enabled", tm.enabled);
            tm.hierarchical = s.bool("hierarchical", tm.hierarchical);
            tm.tag_hierarchy = s.hierarchy("tag_hierarchy", tm.tag_hierarchy.take());
            tm.color_scheme = s.choice(
                "color_scheme",
                &[
                    ("category", TreemapColorScheme::Category),
                    ("frequency", TreemapColorScheme::Frequency),
                    ("custom", TreemapColorScheme::Custom),
                ],
                tm.color_scheme,
            );
            tm.custom_colors = s.colors("custom_colors", tm.custom_colors.take());
            tm.enable_zoom = s.bool("enable_zoom", tm.enable_zoom);
            tm.link_to_tag_pages = s.bool("link_to_tag_pages", tm.link_to_tag_pages);
            tm.width = s.positive("width", tm.width);
            tm.height = s.positive("height", tm.height);
            tm.padding = s.non_negative("padding", tm.padding);
        }

        if let Some(ext) = subtable(table, "", "external", warnings)
            && let Some(t) = subtable(ext, "external", "github", warnings)
        {
            let mut s = Section::new("external.github", t, warnings);
            let current = self.external.github.take().unwrap_or_default();
            self.external.github = Some(GithubConfig {
                enabled: s.bool("enabled", current.enabled),
                username: s.string("username", current.username),
                token: s.opt_string("token", current.token),
                include_private: s.bool("include_private", current.include_private),
                events_file: s.opt_string("events_file", current.events_file),
            });
        }

        if let Some(t) = subtable(table, "", "toc", warnings) {
            self.toc = self.toc.overlay(&mut Section::new("toc", t, warnings));
        }

        self
    }

    /// Strict validation for the `check` command.
    ///
    /// Reports combinations that coercion cannot fix on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.heatmap.enabled && !self.treemap.enabled {
            return Err(ConfigError::Validation(
                "at least one visualization must be enabled".into(),
            ));
        }
        if let Some(github) = &self.external.github
            && github.enabled
            && github.username.is_empty()
        {
            return Err(ConfigError::Validation(
                "external.github.username is required when the GitHub integration is enabled"
                    .into(),
            ));
        }
        if self.heatmap.color_scheme == HeatmapColorScheme::Custom
            && self.heatmap.custom_colors.is_none()
        {
            return Err(ConfigError::Validation(
                "heatmap.custom_colors must be provided for the custom color scheme".into(),
            ));
        }
        if self.treemap.color_scheme == TreemapColorScheme::Custom
            && self.treemap.custom_colors.is_none()
        {
            return Err(ConfigError::Validation(
                "treemap.custom_colors must be provided for the custom color scheme".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Layering
// =============================================================================

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Build an override table from environment variables.
///
/// `lookup` is `std::env::var(..).ok()` in production and a map in tests.
pub fn env_overlay(lookup: impl Fn(&str) -> Option<String>) -> toml::Table {
    let mut table = toml::Table::new();
    let mut set = |section: &str, key: &str, value: toml::Value| {
        let entry = table
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        if let toml::Value::Table(t) = entry {
            t.insert(key.to_string(), value);
        }
    };

    if let Some(v) = lookup("BLOG_VIZ_HEATMAP_ENABLED") {
        set("heatmap", "enabled", toml::Value::Boolean(v == "true"));
    }
    if let Some(weeks) = lookup("BLOG_VIZ_HEATMAP_WEEKS").and_then(|v| v.trim().parse::<i64>().ok())
    {
        set("heatmap", "weeks_to_show", toml::Value::Integer(weeks));
    }
    if let Some(v) = lookup("BLOG_VIZ_TREEMAP_ENABLED") {
        set("treemap", "enabled", toml::Value::Boolean(v == "true"));
    }

    if let Some(username) = lookup("GITHUB_USERNAME") {
        let mut github = toml::Table::new();
        github.insert(
            "enabled".into(),
            toml::Value::Boolean(lookup("BLOG_VIZ_GITHUB_INTEGRATION").as_deref() == Some("true")),
        );
        github.insert("username".into(), toml::Value::String(username));
        if let Some(token) = lookup("GITHUB_TOKEN") {
            github.insert("token".into(), toml::Value::String(token));
        }
        github.insert(
            "include_private".into(),
            toml::Value::Boolean(lookup("GITHUB_INCLUDE_PRIVATE").as_deref() == Some("true")),
        );
        set("external", "github", toml::Value::Table(github));
    }

    table
}

/// Read `config.toml` from a directory as a raw TOML table.
///
/// Returns `Ok(None)` if the file does not exist. A file that is not valid
/// TOML is reported as a warning and treated as absent.
pub fn load_raw_config(
    dir: &Path,
    warnings: &mut Vec<String>,
) -> Result<Option<toml::Table>, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    match content.parse::<toml::Table>() {
        Ok(table) => Ok(Some(table)),
        Err(e) => {
            warnings.push(format!(
                "{}: not valid TOML, using defaults ({})",
                path.display(),
                e.message()
            ));
            Ok(None)
        }
    }
}

/// Resolve the configuration from a user table and an environment table.
pub fn resolve_config(
    user: Option<toml::Table>,
    env: toml::Table,
    warnings: &mut Vec<String>,
) -> VisualizationConfig {
    let merged = match user {
        Some(user) => merge_toml(toml::Value::Table(user), toml::Value::Table(env)),
        None => toml::Value::Table(env),
    };
    let table = match merged {
        toml::Value::Table(t) => t,
        _ => toml::Table::new(),
    };

    let preset = match table.get("preset") {
        None => Preset::default(),
        Some(toml::Value::String(name)) => Preset::parse(name).unwrap_or_else(|| {
            warnings.push(format!("preset: unknown preset '{name}', using standard"));
            Preset::default()
        }),
        Some(other) => {
            warnings.push(format!(
                "preset: expected string, got {}",
                other.type_str()
            ));
            Preset::default()
        }
    };

    preset.config().overlay(&table, warnings)
}

/// Load the configuration for a content root.
///
/// Merges stock defaults, the selected preset, `config.toml`, and the process
/// environment. Every coercion is logged at `warn` level.
pub fn load_config(root: &Path) -> Result<LoadedConfig, ConfigError> {
    let mut warnings = Vec::new();
    let user = load_raw_config(root, &mut warnings)?;
    let source = user.as_ref().map(|_| root.join(CONFIG_FILENAME));
    let env = env_overlay(|key| std::env::var(key).ok());
    let config = resolve_config(user, env, &mut warnings);
    for w in &warnings {
        warn!("config: {w}");
    }
    Ok(LoadedConfig {
        config,
        warnings,
        source,
    })
}

// =============================================================================
// Field coercion
// =============================================================================

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#[0-9A-Fa-f]{3,8}|rgba?\(.*\)|hsla?\(.*\)|[a-zA-Z]+)$")
        .expect("color pattern is valid")
});

/// True for hex, `rgb()`/`rgba()`, `hsl()`/`hsla()` and named CSS colors.
pub fn is_css_color(value: &str) -> bool {
    COLOR_RE.is_match(value)
}

fn subtable<'a>(
    table: &'a toml::Table,
    parent: &str,
    key: &str,
    warnings: &mut Vec<String>,
) -> Option<&'a toml::Table> {
    match table.get(key)? {
        toml::Value::Table(t) => Some(t),
        other => {
            let path = if parent.is_empty() {
                key.to_string()
            } else {
                format!("{parent}.{key}")
            };
            warnings.push(format!("{path}: expected table, got {}", other.type_str()));
            None
        }
    }
}

/// One config section being read with coercion.
pub(crate) struct Section<'a> {
    name: &'a str,
    table: &'a toml::Table,
    warnings: &'a mut Vec<String>,
}

impl<'a> Section<'a> {
    pub(crate) fn new(name: &'a str, table: &'a toml::Table, warnings: &'a mut Vec<String>) -> Self {
        Self {
            name,
            table,
            warnings,
        }
    }

    fn warn(&mut self, key: &str, message: impl std::fmt::Display) {
        self.warnings
            .push(format!("{}.{}: {}", self.name, key, message));
    }

    pub(crate) fn bool(&mut self, key: &str, current: bool) -> bool {
        match self.table.get(key) {
            None => current,
            Some(toml::Value::Boolean(b)) => *b,
            Some(other) => {
                self.warn(key, format!("expected boolean, got {}", other.type_str()));
                current
            }
        }
    }

    /// Integers (or floats, floored) within `range`.
    pub(crate) fn uint_in(&mut self, key: &str, range: RangeInclusive<u32>, current: u32) -> u32 {
        let raw = match self.table.get(key) {
            None => return current,
            Some(toml::Value::Integer(i)) => Some(*i),
            Some(toml::Value::Float(f)) if f.is_finite() => Some(f.floor() as i64),
            Some(_) => None,
        };
        match raw.and_then(|i| u32::try_from(i).ok()) {
            Some(v) if range.contains(&v) => v,
            _ => {
                self.warn(
                    key,
                    format!(
                        "must be a number in {}..={}, keeping {current}",
                        range.start(),
                        range.end()
                    ),
                );
                current
            }
        }
    }

    fn number(&mut self, key: &str) -> Option<Result<f64, ()>> {
        match self.table.get(key)? {
            toml::Value::Integer(i) => Some(Ok(*i as f64)),
            toml::Value::Float(f) if f.is_finite() => Some(Ok(*f)),
            _ => Some(Err(())),
        }
    }

    pub(crate) fn positive(&mut self, key: &str, current: f64) -> f64 {
        match self.number(key) {
            None => current,
            Some(Ok(v)) if v > 0.0 => v,
            Some(_) => {
                self.warn(key, format!("must be a positive number, keeping {current}"));
                current
            }
        }
    }

    pub(crate) fn non_negative(&mut self, key: &str, current: f64) -> f64 {
        match self.number(key) {
            None => current,
            Some(Ok(v)) if v >= 0.0 => v,
            Some(_) => {
                self.warn(key, format!("must be zero or more, keeping {current}"));
                current
            }
        }
    }

    pub(crate) fn string(&mut self, key: &str, current: String) -> String {
        match self.table.get(key) {
            None => current,
            Some(toml::Value::String(s)) => s.clone(),
            Some(other) => {
                self.warn(key, format!("expected string, got {}", other.type_str()));
                current
            }
        }
    }

    pub(crate) fn opt_string(&mut self, key: &str, current: Option<String>) -> Option<String> {
        match self.table.get(key) {
            None => current,
            Some(toml::Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.warn(key, format!("expected string, got {}", other.type_str()));
                current
            }
        }
    }

    /// One of a fixed set of names. Unknown names fall back to the first
    /// choice, not to `current`.
    pub(crate) fn choice<T: Copy>(&mut self, key: &str, choices: &[(&str, T)], current: T) -> T {
        let Some(value) = self.table.get(key) else {
            return current;
        };
        if let toml::Value::String(name) = value
            && let Some((_, v)) = choices.iter().find(|(n, _)| *n == name.as_str())
        {
            return *v;
        }
        let names: Vec<&str> = choices.iter().map(|(n, _)| *n).collect();
        self.warn(
            key,
            format!("expected one of {names:?}, using '{}'", choices[0].0),
        );
        choices[0].1
    }

    /// A list of CSS colors. Invalid entries are dropped; an empty result is
    /// `None`.
    fn colors(&mut self, key: &str, current: Option<Vec<String>>) -> Option<Vec<String>> {
        let Some(value) = self.table.get(key) else {
            return current;
        };
        let toml::Value::Array(items) = value else {
            self.warn(key, format!("expected array, got {}", value.type_str()));
            return current;
        };
        let valid: Vec<String> = items
            .iter()
            .filter_map(|v| v.as_str())
            .filter(|s| is_css_color(s))
            .map(str::to_string)
            .collect();
        if valid.len() != items.len() {
            self.warn(
                key,
                format!("dropped {} invalid color(s)", items.len() - valid.len()),
            );
        }
        if valid.is_empty() { None } else { Some(valid) }
    }

    /// Category → non-empty list of non-empty tag names.
    fn hierarchy(
        &mut self,
        key: &str,
        current: Option<BTreeMap<String, Vec<String>>>,
    ) -> Option<BTreeMap<String, Vec<String>>> {
        let Some(value) = self.table.get(key) else {
            return current;
        };
        let toml::Value::Table(categories) = value else {
            self.warn(key, format!("expected table, got {}", value.type_str()));
            return current;
        };
        let mut result = BTreeMap::new();
        for (category, tags) in categories {
            let tags: Vec<String> = match tags {
                toml::Value::Array(items) => items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                _ => Vec::new(),
            };
            if tags.is_empty() {
                self.warn(key, format!("category '{category}' has no valid tags, ignored"));
            } else {
                result.insert(category.clone(), tags);
            }
        }
        if result.is_empty() { None } else { Some(result) }
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# blog-viz Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults of the "standard" preset.
#
# Invalid values never fail the build: they fall back to the default and a
# warning is printed. Run `blog-viz check` for a strict validation pass.

# Starting point for every value below: minimal | standard | comprehensive
preset = "standard"

# ---------------------------------------------------------------------------
# Activity heatmap
# ---------------------------------------------------------------------------
[heatmap]
enabled = true

# Number of week columns in the calendar (1-104).
weeks_to_show = 52

# github | custom. "custom" requires custom_colors (5 entries, empty → busiest).
color_scheme = "github"
# custom_colors = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"]

show_tooltips = true

# ---------------------------------------------------------------------------
# Tag treemap
# ---------------------------------------------------------------------------
[treemap]
enabled = true

# Group tags into categories; categories zoom into their tags.
hierarchical = true

# category | frequency | custom
color_scheme = "category"
# custom_colors = ["#3b82f6", "#10b981", "#f59e0b"]

enable_zoom = true
link_to_tag_pages = true

# Canvas used for the static layout, in CSS pixels.
width = 600.0
height = 400.0
padding = 2.0

# Category name -> member tags. Without this table tags are grouped by
# built-in patterns (Technology, Computer Science, Web Development, ...).
# [treemap.tag_hierarchy]
# Frontend = ["react", "css", "html"]
# Backend = ["rust", "postgres"]

# ---------------------------------------------------------------------------
# External activity (additive to blog posts)
# ---------------------------------------------------------------------------
# [external.github]
# enabled = false
# username = "octocat"
# include_private = false
# Saved response of https://api.github.com/users/<username>/events
# events_file = "github-events.json"

# ---------------------------------------------------------------------------
# Table of contents
# ---------------------------------------------------------------------------
[toc]
enabled = true
# Posts with fewer headings get no TOC.
min_headings = 3
# Deepest heading level listed (1-6).
max_depth = 6
# auto | sidebar | top | floating
position = "auto"
sticky = true
show_toggle = false
"##
}
