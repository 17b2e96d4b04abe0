//! YAML frontmatter splitting for post sources.
//!
//! A post starts with an optional `---` fenced YAML block. Leading blank lines
//! and a UTF-8 BOM before the opening fence are tolerated. The block must be a
//! mapping; it is converted to a `serde_json::Value` so the scan stage can read
//! loosely-typed fields (`category: true` vs `category: "rust"`) uniformly.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("unterminated frontmatter block: expected closing '---'")]
    Unterminated,
    #[error("frontmatter parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("frontmatter must be a mapping at the top level")]
    NotAMapping,
}

/// Frontmatter fields plus the markdown body that follows them.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub fields: serde_json::Map<String, Value>,
    pub body: &'a str,
}

/// Split `input` into frontmatter fields and body.
///
/// Documents without a fence yield empty fields and the whole input as body.
pub fn split(input: &str) -> Result<Document<'_>, FrontmatterError> {
    let content = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut lines = LineCursor::new(content);
    let Some(first) = lines.by_ref().find(|(line, _)| !line.trim().is_empty()) else {
        return Ok(Document {
            fields: Default::default(),
            body: content,
        });
    };
    if !is_fence(first.0) {
        return Ok(Document {
            fields: Default::default(),
            body: content,
        });
    }

    let block_start = first.1;
    for (line, next) in lines {
        if is_fence(line) {
            let block_end = next - line.len() - usize::from(content[..next].ends_with('\n'));
            let block = &content[block_start..block_end.max(block_start)];
            return Ok(Document {
                fields: parse_block(block)?,
                body: &content[next..],
            });
        }
    }
    Err(FrontmatterError::Unterminated)
}

fn parse_block(block: &str) -> Result<serde_json::Map<String, Value>, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Default::default());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(block)?;
    match serde_yaml::from_value::<Value>(yaml)? {
        Value::Null => Ok(Default::default()),
        Value::Object(map) => Ok(map),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}

/// Iterates `(line_without_newline, offset_after_newline)` pairs.
struct LineCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];
        let (line, advance) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        Some((line, self.pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_frontmatter_returns_whole_body() {
        let doc = split("# Title\nBody").unwrap();
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, "# Title\nBody");
    }

    #[test]
    fn parses_fields_and_body() {
        let input = "---\ntitle: Hello\ntags:\n  - rust\n  - web\n---\n# Content\n";
        let doc = split(input).unwrap();
        assert_eq!(doc.fields["title"], "Hello");
        assert_eq!(doc.fields["tags"][1], "web");
        assert_eq!(doc.body, "# Content\n");
    }

    #[test]
    fn dates_stay_strings() {
        let doc = split("---\ndate: 2024-01-03\n---\n").unwrap();
        assert_eq!(doc.fields["date"], "2024-01-03");
    }

    #[test]
    fn empty_block_is_empty_mapping() {
        let doc = split("---\n---\nBody").unwrap();
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn tolerates_bom_and_leading_blank_lines() {
        let doc = split("\u{feff}\n  \n---\nfoo: bar\n---\nBody").unwrap();
        assert_eq!(doc.fields["foo"], "bar");
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn crlf_fences() {
        let doc = split("---\r\ntitle: Win\r\n---\r\nBody").unwrap();
        assert_eq!(doc.fields["title"], "Win");
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn unterminated_block_is_error() {
        let err = split("---\ntitle: nope").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }

    #[test]
    fn invalid_yaml_is_error() {
        let err = split("---\ninvalid: [unterminated\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Parse(_)), "{err:?}");
    }

    #[test]
    fn scalar_root_is_error() {
        let err = split("---\njust a string\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::NotAMapping));
    }
}
