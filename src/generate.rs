//! Artifact generation.
//!
//! Stage 2 of the blog-viz pipeline. Takes the scanned posts and writes the
//! files the blog front-end fetches, plus a static preview of both charts.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── activity-data.json         # ActivityRecord[] (blog + external)
//! ├── tag-data.json              # TagRecord[] (flat or hierarchical)
//! ├── visualization-stats.json   # Summary numbers + generatedAt
//! ├── visualizations.html        # Static preview (heatmap + treemap)
//! └── .viz-cache.json            # Generation cache manifest
//! ```
//!
//! JSON is pretty-printed so the artifacts diff well when committed.
//!
//! ## Caching
//!
//! When the inputs hash matches the previous run and every artifact is
//! intact, nothing is written. See [`crate::cache`].

use crate::activity::{activity_stats, bucket_posts, merge_activity};
use crate::cache::{GenerationCache, hash_inputs};
use crate::calendar::{build_calendar, weekly_activity};
use crate::config::VisualizationConfig;
use crate::external::load_github_activity;
use crate::loader::Artifacts;
use crate::render::render_preview;
use crate::scan::PostManifest;
use crate::tags::{tag_records, tag_stats};
use crate::types::{ActivityRecord, Post, TagRecord, VisualizationStats};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ACTIVITY_FILE: &str = "activity-data.json";
pub const TAGS_FILE: &str = "tag-data.json";
pub const STATS_FILE: &str = "visualization-stats.json";
pub const PREVIEW_FILE: &str = "visualizations.html";

/// Every file the generate stage writes, in write order.
pub const ARTIFACT_FILES: [&str; 4] = [ACTIVITY_FILE, TAGS_FILE, STATS_FILE, PREVIEW_FILE];

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Day the heatmap preview ends on.
    pub today: NaiveDate,
    /// Timestamp written as `generatedAt`.
    pub now: DateTime<Utc>,
    pub use_cache: bool,
}

impl GenerateOptions {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            today: now.date_naive(),
            now,
            use_cache: true,
        }
    }
}

/// In-memory artifacts, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub activity: Vec<ActivityRecord>,
    pub tags: Vec<TagRecord>,
    pub stats: VisualizationStats,
}

impl Generated {
    pub fn into_artifacts(self) -> Artifacts {
        Artifacts {
            activity: self.activity,
            tags: self.tags,
            stats: Some(self.stats),
        }
    }
}

/// What a generate run did, for the output module.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    /// True when the cache was fresh and nothing was written.
    pub cached: bool,
    pub files: Vec<String>,
    pub stats: VisualizationStats,
    /// Days contributed by external sources.
    pub external_days: usize,
    /// Busiest ISO week of the heatmap window and its post count.
    pub busiest_week: Option<(String, u32)>,
}

/// Derive all artifacts from posts. Pure; no filesystem access.
pub fn build_artifacts(
    posts: &[Post],
    config: &VisualizationConfig,
    external: &[ActivityRecord],
    now: DateTime<Utc>,
) -> Generated {
    let blog = bucket_posts(posts);
    let activity = if external.is_empty() {
        blog
    } else {
        merge_activity(&blog, external)
    };
    let tags = tag_records(posts, &config.treemap);
    let stats = VisualizationStats {
        activity_stats: activity_stats(&activity),
        tag_stats: tag_stats(&tags),
        generated_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Generated {
        activity,
        tags,
        stats,
    }
}

/// External activity for the configured integrations.
///
/// A broken integration is logged and skipped so the blog's own charts
/// still build.
pub fn external_activity(config: &VisualizationConfig, source_root: &Path) -> Vec<ActivityRecord> {
    let Some(github) = &config.external.github else {
        return Vec::new();
    };
    match load_github_activity(source_root, github) {
        Ok(records) => records,
        Err(e) => {
            warn!("GitHub activity skipped: {e}");
            Vec::new()
        }
    }
}

pub fn generate(
    manifest: &PostManifest,
    source_root: &Path,
    output_dir: &Path,
    options: &GenerateOptions,
) -> Result<GenerateReport, GenerateError> {
    let config = &manifest.config;
    let external = external_activity(config, source_root);
    let input_hash = hash_inputs(&manifest.posts, config, &external, options.today)?;

    let mut cache = if options.use_cache {
        GenerationCache::load(output_dir)
    } else {
        GenerationCache::empty()
    };

    if options.use_cache && cache.is_fresh(&input_hash, output_dir) {
        info!("{}: artifacts up to date", output_dir.display());
        let stats: VisualizationStats =
            serde_json::from_str(&fs::read_to_string(output_dir.join(STATS_FILE))?)?;
        let activity: Vec<ActivityRecord> =
            serde_json::from_str(&fs::read_to_string(output_dir.join(ACTIVITY_FILE))?)?;
        return Ok(GenerateReport {
            output_dir: output_dir.to_path_buf(),
            cached: true,
            files: Vec::new(),
            stats,
            external_days: external.len(),
            busiest_week: busiest_week(&activity, config, options.today),
        });
    }

    let generated = build_artifacts(&manifest.posts, config, &external, options.now);
    let busiest = busiest_week(&generated.activity, config, options.today);
    let stats = generated.stats.clone();

    let activity_json = serde_json::to_string_pretty(&generated.activity)?;
    let tags_json = serde_json::to_string_pretty(&generated.tags)?;
    let stats_json = serde_json::to_string_pretty(&generated.stats)?;
    let preview = render_preview(&generated.into_artifacts(), config, options.today).into_string();

    fs::create_dir_all(output_dir)?;
    let contents = [
        (ACTIVITY_FILE, activity_json.as_str()),
        (TAGS_FILE, tags_json.as_str()),
        (STATS_FILE, stats_json.as_str()),
        (PREVIEW_FILE, preview.as_str()),
    ];
    for (name, content) in contents {
        fs::write(output_dir.join(name), content)?;
        debug!("wrote {}", output_dir.join(name).display());
    }

    cache.record(input_hash, contents);
    if let Err(e) = cache.save(output_dir) {
        warn!("could not save generation cache: {e}");
    }

    Ok(GenerateReport {
        output_dir: output_dir.to_path_buf(),
        cached: false,
        files: ARTIFACT_FILES.iter().map(|f| f.to_string()).collect(),
        stats,
        external_days: external.len(),
        busiest_week: busiest,
    })
}

fn busiest_week(
    activity: &[ActivityRecord],
    config: &VisualizationConfig,
    today: NaiveDate,
) -> Option<(String, u32)> {
    let grid = build_calendar(activity, today, config.heatmap.weeks_to_show).ok()?;
    weekly_activity(&grid)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
}

/// Remove generated artifacts and the cache manifest.
///
/// Returns the names of the files that were removed.
pub fn cleanup(output_dir: &Path) -> Result<Vec<String>, GenerateError> {
    let mut removed = Vec::new();
    let cache_file = crate::cache::manifest_path(output_dir);
    let targets = ARTIFACT_FILES
        .iter()
        .map(|name| output_dir.join(name))
        .chain(std::iter::once(cache_file));
    for path in targets {
        match fs::remove_file(&path) {
            Ok(()) => removed.push(
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(removed)
}
