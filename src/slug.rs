//! URL fragment generation for headings and tag pages.
//!
//! Every heading in a post needs a stable `#fragment`, and every tag needs a
//! `/tags/<slug>` link. Both go through [`slugify`] so links agree with the
//! ids injected into the rendered HTML.
//!
//! ## Rules
//!
//! - `"Hello World"` → `"hello-world"`
//! - `"What's new in 2.0?"` → `"whats-new-in-20"`
//! - `"  --Trim me--  "` → `"trim-me"`
//! - `"a  -  b"` → `"a-b"`
//!
//! Only ASCII word characters (`[A-Za-z0-9_]`), whitespace, and `-` survive;
//! everything else is dropped.

use std::collections::HashMap;

/// Generate a URL-safe slug from heading or tag text.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' {
            pending_dash = true;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
        // Anything else is dropped without breaking the current word.
    }
    slug
}

/// Slug generator that de-duplicates within one document.
///
/// The first `"Setup"` heading becomes `setup`, the second `setup-1`, and so
/// on. Ids already present in the document are reserved up front so generated
/// slugs never collide with them.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an existing id.
    pub fn reserve(&mut self, id: &str) {
        *self.counts.entry(id.to_string()).or_insert(0) += 1;
    }

    /// Slugify `text` and make the result unique within this slugger.
    pub fn next_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let seen = self.counts.get(&base).copied().unwrap_or(0);
        if seen == 0 {
            self.counts.insert(base.clone(), 1);
            return base;
        }

        let mut n = seen;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.counts.contains_key(&candidate) {
                self.counts.insert(base, n + 1);
                self.counts.insert(candidate.clone(), 1);
                return candidate;
            }
            n += 1;
        }
    }
}
