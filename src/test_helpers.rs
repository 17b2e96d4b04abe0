//! Shared test utilities for the blog-viz test suite.
//!
//! Provides post builders, a canned blog, and fixture setup for tests that
//! touch the filesystem.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//! let post = find_post(&manifest, "hello-world");
//! assert!(post.is_published());
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::PostManifest;
use crate::slug::slugify;
use crate::types::Post;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Post builders
// =========================================================================

/// A published post. The slug is the slugified title.
pub fn post(title: &str, date: Option<&str>, tags: &[&str]) -> Post {
    let slug = slugify(title);
    Post {
        title: title.to_string(),
        source_path: format!("posts/{slug}.md"),
        slug,
        date: date.map(str::to_string),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        draft: false,
        category: false,
        summary: None,
        toc: None,
        body: String::new(),
    }
}

/// Four published posts on three days, one draft, one category index.
///
/// | Title          | Date       | Tags              |
/// |----------------|------------|-------------------|
/// | Sorting        | 2024-01-05 | algorithm, rust   |
/// | Trip to Lisbon | 2024-02-20 | travel            |
/// | Rust Ownership | 2024-03-11 | rust, tutorial    |
/// | React Hooks    | 2024-03-11 | react, frontend   |
/// | Upcoming       | 2024-03-14 | rust (draft)      |
/// | Rust           |            | (category index)  |
pub fn sample_posts() -> Vec<Post> {
    vec![
        post("Sorting", Some("2024-01-05"), &["algorithm", "rust"]),
        post("Trip to Lisbon", Some("2024-02-20T09:30:00Z"), &["travel"]),
        post("Rust Ownership", Some("2024-03-11"), &["rust", "tutorial"]),
        post("React Hooks", Some("2024-03-11 18:00:00"), &["react", "frontend"]),
        Post {
            draft: true,
            ..post("Upcoming", Some("2024-03-14"), &["rust"])
        },
        Post {
            category: true,
            ..post("Rust", None, &[])
        },
    ]
}

// =========================================================================
// Manifest lookups (panic with a clear message on miss)
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(manifest: &'a PostManifest, slug: &str) -> &'a Post {
    manifest
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.posts.iter().map(|p| p.slug.as_str()).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

/// Titles of all posts in manifest order.
pub fn post_titles(manifest: &PostManifest) -> Vec<&str> {
    manifest.posts.iter().map(|p| p.title.as_str()).collect()
}
