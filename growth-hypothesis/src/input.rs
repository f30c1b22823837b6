//! Loading view-count samples from JSON.
//!
//! Two shapes are accepted: a plain array of `{timestamp, views}` records, or a
//! video-platform listing whose items carry `snippet.publishedAt` and
//! `statistics.viewCount` (either bare or wrapped in an `items` object).

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use growth_hypothesis_core::Sample;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed sample JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record {index}: invalid view count '{value}'")]
    InvalidViews { index: usize, value: String },

    #[error("Record {index}: invalid timestamp '{value}'")]
    InvalidTimestamp { index: usize, value: String },
}

/// A view count given either as a JSON number or as a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ViewCount {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct PlainRecord {
    timestamp: String,
    #[serde(alias = "viewCount", alias = "value")]
    views: ViewCount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    published_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: ViewCount,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing {
    Wrapped { items: Vec<VideoItem> },
    Videos(Vec<VideoItem>),
    Plain(Vec<PlainRecord>),
}

fn parse_views(index: usize, views: ViewCount) -> Result<u64, InputError> {
    match views {
        ViewCount::Number(n) => Ok(n),
        ViewCount::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| InputError::InvalidViews { index, value: text }),
    }
}

fn parse_timestamp(index: usize, value: String) -> Result<DateTime<Utc>, InputError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| InputError::InvalidTimestamp { index, value })
}

/// Parse samples from a JSON document.
///
/// # Errors
///
/// Returns an error if the document matches neither shape, or if any record has an
/// unparseable timestamp or view count.
pub fn parse_samples(json: &str) -> Result<Vec<Sample>, InputError> {
    let listing: Listing = serde_json::from_str(json)?;

    let raw: Vec<(String, ViewCount)> = match listing {
        Listing::Wrapped { items } | Listing::Videos(items) => items
            .into_iter()
            .map(|item| (item.snippet.published_at, item.statistics.view_count))
            .collect(),
        Listing::Plain(records) => records
            .into_iter()
            .map(|record| (record.timestamp, record.views))
            .collect(),
    };

    raw.into_iter()
        .enumerate()
        .map(|(index, (timestamp, views))| {
            Ok(Sample::new(
                parse_timestamp(index, timestamp)?,
                parse_views(index, views)?,
            ))
        })
        .collect()
}

/// Load samples from a file, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed.
pub fn load_samples(path: &Path) -> Result<Vec<Sample>, InputError> {
    let mut content = String::new();
    let io_error = |source| InputError::Io {
        path: path.to_path_buf(),
        source,
    };

    if path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(io_error)?;
    } else {
        content = std::fs::read_to_string(path).map_err(io_error)?;
    }

    let samples = parse_samples(&content)?;
    debug!(path = %path.display(), samples = samples.len(), "loaded samples");
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_plain_records() {
        let json = r#"[
            {"timestamp": "2024-01-01T00:00:00Z", "views": 100},
            {"timestamp": "2024-02-01T00:00:00Z", "views": "250"}
        ]"#;

        let samples = parse_samples(json).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].value, 100);
        assert_eq!(samples[1].value, 250);
        assert_eq!(
            samples[1].timestamp,
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_platform_listing() {
        let json = r#"{
            "kind": "youtube#videoListResponse",
            "items": [
                {
                    "id": "abc",
                    "snippet": {"publishedAt": "2023-07-04T15:00:00Z", "title": "First"},
                    "statistics": {"viewCount": "123456", "likeCount": "10"}
                }
            ]
        }"#;

        let samples = parse_samples(json).unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 123_456);
        assert_eq!(
            samples[0].timestamp,
            Utc.with_ymd_and_hms(2023, 7, 4, 15, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_bare_item_array() {
        let json = r#"[
            {"snippet": {"publishedAt": "2023-07-04T15:00:00Z"}, "statistics": {"viewCount": "5"}}
        ]"#;

        let samples = parse_samples(json).unwrap();
        assert_eq!(samples[0].value, 5);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_samples("[]").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_view_count() {
        let json = r#"[
            {"timestamp": "2024-01-01T00:00:00Z", "views": "10"},
            {"timestamp": "2024-01-02T00:00:00Z", "views": "lots"}
        ]"#;

        let result = parse_samples(json);

        assert!(matches!(
            result,
            Err(InputError::InvalidViews { index: 1, ref value }) if value == "lots"
        ));
    }

    #[test]
    fn test_invalid_timestamp() {
        let json = r#"[{"timestamp": "yesterday", "views": 10}]"#;

        assert!(matches!(
            parse_samples(json),
            Err(InputError::InvalidTimestamp { index: 0, .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_samples("{not json"),
            Err(InputError::Json(_))
        ));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_samples(Path::new("/nonexistent/samples.json"));
        assert!(matches!(result, Err(InputError::Io { .. })));
    }
}
