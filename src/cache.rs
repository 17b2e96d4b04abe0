//! Generation cache for incremental builds.
//!
//! Generating the artifacts is cheap compared to an image pipeline, but the
//! artifacts are usually committed or deployed, and rewriting them on every
//! build churns their `generatedAt` stamp and every downstream cache. This
//! module lets the generate stage skip the write when nothing it depends on
//! has changed.
//!
//! ## Cache keys
//!
//! - **`input_hash`**: SHA-256 over everything the artifacts are derived
//!   from: the published posts' metadata, the resolved configuration, the
//!   external activity, and the day the calendar is anchored on. Post bodies
//!   are not part of it; they never reach the artifacts.
//!
//! - **artifact hashes**: SHA-256 of each file as last written. A hit also
//!   requires every artifact to still be on disk with that content, so a
//!   hand-edited or deleted file is regenerated.
//!
//! ## Storage
//!
//! The manifest is a JSON file at `<output_dir>/.viz-cache.json`, next to
//! the artifacts it describes.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to `build` or `generate`.

use crate::config::VisualizationConfig;
use crate::types::{ActivityRecord, Post};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache manifest file within the output directory.
const MANIFEST_FILENAME: &str = ".viz-cache.json";

/// Version of the cache manifest format. Bump this to invalidate all
/// existing caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationCache {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_hash: Option<String>,
    /// Artifact file name → SHA-256 of its contents.
    #[serde(default)]
    pub artifacts: BTreeMap<String, String>,
}

impl GenerationCache {
    /// Create an empty cache (used for `--no-cache` or a first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            input_hash: None,
            artifacts: BTreeMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty cache if the file
    /// doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(output_dir: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(manifest_path(output_dir)) else {
            return Self::empty();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(cache) if cache.version == MANIFEST_VERSION => cache,
            _ => Self::empty(),
        }
    }

    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(output_dir), json)
    }

    /// True when the last generation used the same inputs and its
    /// artifacts are still on disk, unmodified.
    pub fn is_fresh(&self, input_hash: &str, output_dir: &Path) -> bool {
        if self.input_hash.as_deref() != Some(input_hash) || self.artifacts.is_empty() {
            return false;
        }
        self.artifacts.iter().all(|(name, expected)| {
            std::fs::read(output_dir.join(name)).is_ok_and(|bytes| hash_bytes(&bytes) == *expected)
        })
    }

    /// Remember a completed generation.
    pub fn record<'a>(
        &mut self,
        input_hash: String,
        artifacts: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        self.input_hash = Some(input_hash);
        self.artifacts = artifacts
            .into_iter()
            .map(|(name, content)| (name.to_string(), hash_bytes(content.as_bytes())))
            .collect();
    }
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// The slice of a post that reaches the artifacts.
#[derive(Serialize)]
struct PostKey<'a> {
    title: &'a str,
    slug: &'a str,
    date: Option<&'a str>,
    tags: &'a [String],
}

/// SHA-256 of every generation input.
pub fn hash_inputs(
    posts: &[Post],
    config: &VisualizationConfig,
    external: &[ActivityRecord],
    today: NaiveDate,
) -> Result<String, serde_json::Error> {
    let keys: Vec<PostKey<'_>> = posts
        .iter()
        .filter(|p| p.is_published())
        .map(|p| PostKey {
            title: &p.title,
            slug: &p.slug,
            date: p.date.as_deref(),
            tags: &p.tags,
        })
        .collect();

    let mut hasher = Sha256::new();
    hasher.update(b"posts\0");
    hasher.update(serde_json::to_vec(&keys)?);
    hasher.update(b"\0config\0");
    hasher.update(serde_json::to_vec(config)?);
    hasher.update(b"\0external\0");
    hasher.update(serde_json::to_vec(external)?);
    hasher.update(b"\0today\0");
    hasher.update(today.to_string().as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Resolve the cache manifest path for an output directory.
pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_FILENAME)
}
