//! Content scanning and post manifest generation.
//!
//! Stage 1 of the blog-viz pipeline. Walks a content directory for posts
//! and reads their frontmatter, producing a [`PostManifest`] that the
//! generate stage consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Visualization config (optional)
//! ├── github-events.json           # Saved GitHub events (optional)
//! ├── hello-world.md               # Post → slug "hello-world"
//! ├── rust/
//! │   ├── index.md                 # Category index → excluded from charts
//! │   └── ownership.mdx            # Post → slug "rust/ownership"
//! └── .drafts/                     # Hidden → never scanned
//! ```
//!
//! ## Frontmatter
//!
//! Fields are read leniently: a field with an unexpected type is ignored
//! with a warning instead of failing the scan.
//!
//! | Field      | Type                          | Notes                              |
//! |------------|-------------------------------|------------------------------------|
//! | `title`    | string                        | falls back to first `# ` heading   |
//! | `date`     | string                        | kept raw; parsed by `activity`     |
//! | `tags`     | list or comma-separated string|                                    |
//! | `draft`    | bool                          |                                    |
//! | `category` | bool or non-empty string      | marks a category index page        |
//! | `summary`  | string                        |                                    |
//! | `slug`     | string                        | overrides the path-derived slug    |
//! | `toc`      | bool or table                 | per-post table-of-contents override|
//!
//! Files are parsed in parallel; the manifest lists posts sorted by source
//! path so repeated scans produce identical output.

use crate::config::{self, CONFIG_FILENAME, VisualizationConfig};
use crate::frontmatter::{self, FrontmatterError};
use crate::toc::PostTocOverride;
use crate::types::Post;
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("{path}: {source}")]
    Frontmatter {
        path: PathBuf,
        source: FrontmatterError,
    },
}

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostManifest {
    pub posts: Vec<Post>,
    pub config: VisualizationConfig,
    /// Configuration coercions and lenient-field notices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl PostManifest {
    pub fn published(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.is_published())
    }
}

const POST_EXTENSIONS: &[&str] = &["md", "mdx"];

pub fn scan(root: &Path) -> Result<PostManifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let files = collect_post_files(root)?;
    debug!("{}: {} post files", root.display(), files.len());

    let parsed: Vec<(Post, Vec<String>)> = files
        .par_iter()
        .map(|path| parse_post(root, path))
        .collect::<Result<_, _>>()?;

    let loaded = config::load_config(root)?;
    let mut warnings = loaded.warnings;
    let mut posts = Vec::with_capacity(parsed.len());
    for (post, post_warnings) in parsed {
        for w in &post_warnings {
            warn!("{w}");
        }
        warnings.extend(post_warnings);
        posts.push(post);
    }
    posts.sort_by(|a, b| a.source_path.cmp(&b.source_path));

    Ok(PostManifest {
        posts,
        config: loaded.config,
        warnings,
    })
}

fn collect_post_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_post_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_post_file(path: &Path) -> bool {
    if path.file_name().is_some_and(|n| n == CONFIG_FILENAME) {
        return false;
    }
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| POST_EXTENSIONS.contains(&ext.as_str()))
}

/// Read one post file. Returns the post and any lenient-field warnings.
fn parse_post(root: &Path, path: &Path) -> Result<(Post, Vec<String>), ScanError> {
    let content = fs::read_to_string(path)?;
    let doc = frontmatter::split(&content).map_err(|source| ScanError::Frontmatter {
        path: path.to_path_buf(),
        source,
    })?;

    let rel = path.strip_prefix(root).unwrap_or(path);
    let source_path = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let mut fields = Fields {
        source_path: &source_path,
        fields: &doc.fields,
        warnings: Vec::new(),
    };

    let title = fields
        .string("title")
        .or_else(|| first_heading(doc.body))
        .unwrap_or_else(|| file_stem(rel));
    let slug = fields.string("slug").unwrap_or_else(|| path_slug(rel));
    let post = Post {
        title,
        slug,
        date: fields.date("date"),
        tags: fields.tags("tags"),
        draft: fields.flag("draft"),
        category: fields.flag("category") || is_index(rel),
        summary: fields.string("summary"),
        toc: fields.toc("toc"),
        source_path: source_path.clone(),
        body: doc.body.to_string(),
    };
    Ok((post, fields.warnings))
}

const FALSE_STRINGS: [&str; 4] = ["false", "no", "off", "0"];

/// Lenient accessors over a frontmatter mapping.
struct Fields<'a> {
    source_path: &'a str,
    fields: &'a serde_json::Map<String, Value>,
    warnings: Vec<String>,
}

impl Fields<'_> {
    fn warn_type(&mut self, key: &str, expected: &str, got: &Value) {
        self.warnings.push(format!(
            "{}: frontmatter '{key}' should be {expected}, got {got}; ignored",
            self.source_path
        ));
    }

    fn string(&mut self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            other => {
                self.warn_type(key, "a string", other);
                None
            }
        }
    }

    /// Dates stay raw; a bare number (e.g. a year) is kept as text.
    fn date(&mut self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Number(n) => Some(n.to_string()),
            _ => self.string(key),
        }
    }

    /// `true`, or a non-empty string other than a quoted negative
    /// (`"false"`, `"no"`, `"off"`, `"0"`), sets the flag.
    fn flag(&mut self, key: &str) -> bool {
        match self.fields.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => {
                let s = s.trim();
                !s.is_empty() && !FALSE_STRINGS.iter().any(|f| s.eq_ignore_ascii_case(f))
            }
            Some(other) => {
                let other = other.clone();
                self.warn_type(key, "a boolean", &other);
                false
            }
        }
    }

    fn tags(&mut self, key: &str) -> Vec<String> {
        let raw: Vec<String> = match self.fields.get(key) {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
            Some(other) => {
                let other = other.clone();
                self.warn_type(key, "a list of strings", &other);
                return Vec::new();
            }
        };
        let mut tags: Vec<String> = Vec::with_capacity(raw.len());
        for tag in raw.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }

    fn toc(&mut self, key: &str) -> Option<PostTocOverride> {
        let value = self.fields.get(key)?;
        if value.is_null() {
            return None;
        }
        match serde_json::from_value(value.clone()) {
            Ok(toc) => Some(toc),
            Err(e) => {
                self.warnings.push(format!(
                    "{}: frontmatter 'toc' ignored ({e})",
                    self.source_path
                ));
                None
            }
        }
    }
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .filter(|t| !t.is_empty())
}

fn file_stem(rel: &Path) -> String {
    rel.file_stem()
        .map(|s| s.to_string_lossy().replace('-', " "))
        .unwrap_or_default()
}

/// `rust/ownership.mdx` → `rust/ownership`; `rust/index.md` → `rust`.
fn path_slug(rel: &Path) -> String {
    let stem = rel.with_extension("");
    let mut parts: Vec<String> = stem
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.len() > 1 && parts.last().is_some_and(|p| p == "index") {
        parts.pop();
    }
    parts.join("/")
}

fn is_index(rel: &Path) -> bool {
    rel.parent().is_some_and(|p| !p.as_os_str().is_empty())
        && rel.file_stem().is_some_and(|s| s == "index")
}
