//! # blog-viz
//!
//! Build-time data for a blog's activity heatmap, tag treemap, and tables of
//! contents. Your content directory is the data source: post frontmatter
//! becomes per-day activity and tag counts, headings become TOC entries.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/     →  posts.json                 (frontmatter → posts)
//! 2. Generate  posts.json   →  public/*.json              (activity, tags, stats)
//! 3. Render    artifacts    →  public/visualizations.html (static preview)
//! ```
//!
//! Each stage is a function from the previous stage's data, so tests can
//! exercise the pipeline without a browser and mostly without the filesystem.
//! Rendering runs inside the generate stage but is its own module.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the content directory and reads post frontmatter |
//! | [`generate`] | Stage 2: writes the JSON artifacts and the preview page |
//! | [`render`] | Maud components for heatmap, treemap, TOC, and failure fallbacks |
//! | [`activity`] | Posts → one record per publishing day |
//! | [`calendar`] | Day records → week × weekday grid for the heatmap |
//! | [`tags`] | Tag counting, hierarchies, colors, and stats |
//! | [`treemap`] | Greedy rectangle packing and zoom navigation |
//! | [`toc`] | Heading extraction, id assignment, and TOC configuration |
//! | [`scroll_spy`] | Active-heading tracking and smooth-scroll math |
//! | [`loader`] | Artifact fetch state machine with retry |
//! | [`external`] | GitHub push events → activity records |
//! | [`features`] | Feature flags over the resolved configuration |
//! | [`config`] | Layered `config.toml` loading, presets, and validation |
//! | [`cache`] | Input hashing so unchanged builds skip writing |
//! | [`frontmatter`] | YAML frontmatter splitting |
//! | [`slug`] | Heading and tag slugs |
//! | [`types`] | Shared types serialized between stages and to the client |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit "Today"
//!
//! The heatmap grid ends in the week containing "today". Every function that
//! depends on the current day takes it as a parameter; only the binary reads
//! the clock. Builds are reproducible with `--today`.
//!
//! ## Zoom Without JavaScript
//!
//! The preview renders every treemap zoom level up front and switches between
//! them with URL fragments and CSS `:target`. The same [`treemap::TreemapView`]
//! that drives an interactive front-end produces each level.
//!
//! ## Client State as Data
//!
//! Loading, failure and retry of the artifacts are modelled by
//! [`loader::VisualizationData`] over an [`loader::ArtifactSource`], and
//! scroll-spy by [`scroll_spy::ScrollSpy`]. Both are synchronous and take
//! their inputs explicitly, so a browser binding only forwards events.

pub mod activity;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod external;
pub mod features;
pub mod frontmatter;
pub mod generate;
pub mod loader;
pub mod output;
pub mod render;
pub mod scan;
pub mod scroll_spy;
pub mod slug;
pub mod tags;
pub mod toc;
pub mod treemap;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
