//! External activity sources merged into the heatmap.
//!
//! The GitHub integration reads a saved response of the user-events API
//! (`GET /users/<name>/events`) from `events_file`. Fetching it is left to
//! the operator (a cron job or CI step with `curl`), which keeps the build
//! offline and reproducible.
//!
//! Each commit of a push event becomes one activity item: the first line of
//! its message as title and its sha as slug.

use crate::activity::{format_date, parse_post_date};
use crate::config::GithubConfig;
use crate::types::{ActivityRecord, PostSummary};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExternalError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid GitHub events JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The subset of a GitHub event this crate reads.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub repo: Option<EventRepo>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub payload: Option<PushPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub sha: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub date: Option<String>,
}

impl GithubEvent {
    fn is_private(&self) -> bool {
        self.repo.as_ref().is_some_and(|r| r.private) || self.public == Some(false)
    }
}

pub fn parse_events(json: &str) -> Result<Vec<GithubEvent>, ExternalError> {
    Ok(serde_json::from_str(json)?)
}

/// Turn push events into per-day activity records.
///
/// A commit is dated by its author date, falling back to the event's
/// `created_at`. Commits with neither are dropped.
pub fn github_activity(events: &[GithubEvent], include_private: bool) -> Vec<ActivityRecord> {
    let mut by_day: BTreeMap<NaiveDate, Vec<PostSummary>> = BTreeMap::new();

    let pushes = events
        .iter()
        .filter(|e| e.kind == "PushEvent")
        .filter(|e| include_private || !e.is_private());
    for event in pushes {
        let Some(payload) = &event.payload else {
            continue;
        };
        for commit in &payload.commits {
            let date = commit
                .author
                .as_ref()
                .and_then(|a| a.date.as_deref())
                .or(event.created_at.as_deref())
                .and_then(parse_post_date);
            let Some(date) = date else {
                debug!("commit {} has no usable date, skipped", commit.sha);
                continue;
            };
            by_day.entry(date).or_default().push(PostSummary {
                title: commit.message.lines().next().unwrap_or_default().to_string(),
                slug: commit.sha.clone(),
            });
        }
    }

    by_day
        .into_iter()
        .map(|(day, posts)| ActivityRecord {
            date: format_date(day),
            count: posts.len() as u32,
            posts,
        })
        .collect()
}

/// Load GitHub activity for a content root, if the integration is enabled.
pub fn load_github_activity(
    root: &Path,
    config: &GithubConfig,
) -> Result<Vec<ActivityRecord>, ExternalError> {
    if !config.enabled {
        return Ok(Vec::new());
    }
    let Some(file) = &config.events_file else {
        warn!(
            "GitHub integration for '{}' is enabled but external.github.events_file is not set",
            config.username
        );
        return Ok(Vec::new());
    };
    let path = root.join(file);
    let json = fs::read_to_string(&path).map_err(|source| ExternalError::Io {
        path: path.clone(),
        source,
    })?;
    let events = parse_events(&json)?;
    let records = github_activity(&events, config.include_private);
    debug!(
        "{}: {} events → {} active days",
        path.display(),
        events.len(),
        records.len()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EVENTS: &str = r#"[
      {
        "type": "PushEvent",
        "public": true,
        "repo": {"name": "me/blog"},
        "created_at": "2024-01-02T10:00:00Z",
        "payload": {"commits": [
          {"sha": "aaa111", "message": "Fix typo\n\nLonger body", "author": {"name": "me"}},
          {"sha": "bbb222", "message": "Add post", "author": {"date": "2024-01-01T23:00:00-03:00"}}
        ]}
      },
      {
        "type": "PushEvent",
        "repo": {"name": "me/secret", "private": true},
        "created_at": "2024-01-02T11:00:00Z",
        "payload": {"commits": [{"sha": "ccc333", "message": "hidden"}]}
      },
      {
        "type": "WatchEvent",
        "repo": {"name": "other/repo"},
        "created_at": "2024-01-02T12:00:00Z",
        "payload": {}
      }
    ]"#;

    #[test]
    fn push_commits_become_items() {
        let events = parse_events(EVENTS).unwrap();
        let records = github_activity(&events, false);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "2024-01-02");
        assert_eq!(records[0].count, 2);
        assert_eq!(records[0].posts[0].title, "Fix typo");
        assert_eq!(records[0].posts[0].slug, "aaa111");
    }

    #[test]
    fn private_repos_only_when_requested() {
        let events = parse_events(EVENTS).unwrap();
        let records = github_activity(&events, true);
        assert_eq!(records[0].count, 3);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(parse_events("{nope"), Err(ExternalError::Parse(_))));
    }

    #[test]
    fn disabled_integration_reads_nothing() {
        let tmp = TempDir::new().unwrap();
        let config = GithubConfig {
            enabled: false,
            events_file: Some("missing.json".into()),
            ..GithubConfig::default()
        };
        assert!(load_github_activity(tmp.path(), &config).unwrap().is_empty());
    }

    #[test]
    fn loads_events_file_relative_to_root() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("events.json"), EVENTS).unwrap();
        let config = GithubConfig {
            enabled: true,
            username: "me".into(),
            events_file: Some("events.json".into()),
            ..GithubConfig::default()
        };
        let records = load_github_activity(tmp.path(), &config).unwrap();
        assert_eq!(records[0].count, 2);
    }

    #[test]
    fn missing_events_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let config = GithubConfig {
            enabled: true,
            username: "me".into(),
            events_file: Some("nope.json".into()),
            ..GithubConfig::default()
        };
        assert!(matches!(
            load_github_activity(tmp.path(), &config),
            Err(ExternalError::Io { .. })
        ));
    }
}
