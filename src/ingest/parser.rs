//! Streaming-history JSON parser
//!
//! An export file is a JSON array of play records. Arrays nested one level
//! deep are flattened. Records are validated one by one so a bad record
//! never costs the rest of the file.

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::core::ListeningEvent;
use crate::error::{IngestError, ParseError};
use crate::utils::parse_timestamp;

// ============================================================================
// Internal types for JSON parsing
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRecord {
    ts: Option<String>,
    platform: Option<String>,
    ms_played: Option<f64>,
    conn_country: Option<String>,
    master_metadata_track_name: Option<String>,
    master_metadata_album_artist_name: Option<String>,
    master_metadata_album_album_name: Option<String>,
    shuffle: Option<bool>,
    skipped: Option<bool>,
    offline: Option<bool>,
    reason_start: Option<String>,
    reason_end: Option<String>,
    episode_name: Option<String>,
    episode_show_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum RecordError {
    #[error("not an object")]
    NotObject,
    #[error("{0}")]
    Fields(serde_json::Error),
    #[error("missing ts")]
    MissingTimestamp,
    #[error("unparseable ts \"{0}\"")]
    BadTimestamp(String),
}

/// Events parsed from one file plus the number of records that were dropped
#[derive(Debug, Default)]
pub(crate) struct ParsedHistory {
    pub(crate) events: Vec<ListeningEvent>,
    pub(crate) invalid: usize,
}

// ============================================================================
// Parsing
// ============================================================================

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn to_event(value: Value) -> Result<ListeningEvent, RecordError> {
    if !value.is_object() {
        return Err(RecordError::NotObject);
    }
    let raw: RawRecord = serde_json::from_value(value).map_err(RecordError::Fields)?;

    let ts = raw.ts.ok_or(RecordError::MissingTimestamp)?;
    let timestamp = parse_timestamp(&ts).ok_or(RecordError::BadTimestamp(ts))?;

    // Negative or fractional play times are clamped/rounded rather than rejected
    let ms_played = raw.ms_played.map_or(0, |ms| ms.max(0.0).round() as u64);

    Ok(ListeningEvent {
        timestamp,
        platform: raw.platform.unwrap_or_default(),
        ms_played,
        country: raw.conn_country.unwrap_or_default(),
        track_name: non_empty(raw.master_metadata_track_name),
        artist_name: non_empty(raw.master_metadata_album_artist_name),
        album_name: non_empty(raw.master_metadata_album_album_name),
        shuffle: raw.shuffle.unwrap_or(false),
        skipped: raw.skipped.unwrap_or(false),
        offline: raw.offline.unwrap_or(false),
        reason_start: non_empty(raw.reason_start),
        reason_end: non_empty(raw.reason_end),
        episode_name: non_empty(raw.episode_name),
        episode_show_name: non_empty(raw.episode_show_name),
    })
}

impl ParsedHistory {
    fn push(&mut self, index: usize, value: Value) {
        match to_event(value) {
            Ok(event) => self.events.push(event),
            Err(err) => {
                tracing::debug!(record = index, "Skipping invalid record: {}", err);
                self.invalid += 1;
            }
        }
    }
}

/// Parse the contents of one export file
pub(crate) fn parse_history(content: &str) -> Result<ParsedHistory, ParseError> {
    let value: Value = serde_json::from_str(content.trim_start_matches('\u{feff}'))?;
    let Value::Array(items) = value else {
        return Err(ParseError::NotArray);
    };

    let mut parsed = ParsedHistory::default();
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Array(nested) => {
                for value in nested {
                    parsed.push(index, value);
                }
            }
            other => parsed.push(index, other),
        }
    }
    Ok(parsed)
}

/// Display name of a file for notices and the loaded-files list
pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn parse_file(path: &Path) -> Result<ParsedHistory, IngestError> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::Read {
        file: file_label(path),
        source,
    })?;
    parse_history(&content).map_err(|source| IngestError::Parse {
        file: file_label(path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_RECORD: &str = r#"{
        "ts": "2024-03-15T10:00:00Z",
        "platform": "iOS 17.1 (iPhone15,2)",
        "ms_played": 215000,
        "conn_country": "SE",
        "ip_addr": "192.0.2.1",
        "master_metadata_track_name": "Song",
        "master_metadata_album_artist_name": "Artist",
        "master_metadata_album_album_name": "Album",
        "spotify_track_uri": "spotify:track:abc",
        "episode_name": null,
        "episode_show_name": null,
        "reason_start": "trackdone",
        "reason_end": "endplay",
        "shuffle": true,
        "skipped": false,
        "offline": false,
        "incognito_mode": false
    }"#;

    #[test]
    fn parses_full_record_and_ignores_unknown_fields() {
        let parsed = parse_history(&format!("[{FULL_RECORD}]")).unwrap();
        assert_eq!(parsed.invalid, 0);
        assert_eq!(parsed.events.len(), 1);
        let e = &parsed.events[0];
        assert_eq!(e.platform, "iOS 17.1 (iPhone15,2)");
        assert_eq!(e.ms_played, 215_000);
        assert_eq!(e.country, "SE");
        assert_eq!(e.track_name.as_deref(), Some("Song"));
        assert_eq!(e.artist_name.as_deref(), Some("Artist"));
        assert_eq!(e.album_name.as_deref(), Some("Album"));
        assert_eq!(e.reason_start.as_deref(), Some("trackdone"));
        assert_eq!(e.reason_end.as_deref(), Some("endplay"));
        assert!(e.shuffle);
        assert!(!e.skipped);
        assert!(!e.is_podcast());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let parsed = parse_history(r#"[{"ts": "2024-03-15T10:00:00Z"}]"#).unwrap();
        let e = &parsed.events[0];
        assert_eq!(e.platform, "");
        assert_eq!(e.ms_played, 0);
        assert_eq!(e.country, "");
        assert!(e.artist_name.is_none());
        assert!(!e.shuffle && !e.skipped && !e.offline);
    }

    #[test]
    fn null_flags_and_empty_names_normalize() {
        let parsed = parse_history(
            r#"[{"ts": "2024-03-15T10:00:00Z", "skipped": null,
                 "master_metadata_album_artist_name": "",
                 "episode_show_name": ""}]"#,
        )
        .unwrap();
        let e = &parsed.events[0];
        assert!(!e.skipped);
        assert!(e.artist_name.is_none());
        assert!(!e.is_podcast());
    }

    #[test]
    fn podcast_record_is_marked() {
        let parsed = parse_history(
            r#"[{"ts": "2024-03-15T10:00:00Z", "ms_played": 1000,
                 "episode_name": "Ep 1", "episode_show_name": "The Show"}]"#,
        )
        .unwrap();
        let e = &parsed.events[0];
        assert!(e.is_podcast());
        assert_eq!(e.episode_name.as_deref(), Some("Ep 1"));
    }

    #[test]
    fn nested_arrays_flatten_one_level() {
        let parsed = parse_history(
            r#"[
                [{"ts": "2024-01-01T00:00:00Z"}, {"ts": "2024-01-02T00:00:00Z"}],
                {"ts": "2024-01-03T00:00:00Z"},
                [[{"ts": "2024-01-04T00:00:00Z"}]]
            ]"#,
        )
        .unwrap();
        assert_eq!(parsed.events.len(), 3);
        // the doubly nested array is not flattened further
        assert_eq!(parsed.invalid, 1);
    }

    #[test]
    fn bad_records_are_counted_not_fatal() {
        let parsed = parse_history(
            r#"[
                {"ts": "2024-01-01T00:00:00Z", "ms_played": 10},
                {"ms_played": 10},
                {"ts": "not a date"},
                {"ts": "2024-01-01T00:00:00Z", "ms_played": "ten"},
                42,
                "text"
            ]"#,
        )
        .unwrap();
        assert_eq!(parsed.events.len(), 1);
        assert_eq!(parsed.invalid, 5);
    }

    #[test]
    fn negative_and_fractional_ms_played() {
        let parsed = parse_history(
            r#"[{"ts": "2024-01-01T00:00:00Z", "ms_played": -5},
                {"ts": "2024-01-01T00:00:00Z", "ms_played": 1500.6}]"#,
        )
        .unwrap();
        assert_eq!(parsed.events[0].ms_played, 0);
        assert_eq!(parsed.events[1].ms_played, 1501);
    }

    #[test]
    fn empty_array_is_valid() {
        let parsed = parse_history("[]").unwrap();
        assert!(parsed.events.is_empty());
        assert_eq!(parsed.invalid, 0);
    }

    #[test]
    fn leading_bom_is_ignored() {
        let parsed = parse_history("\u{feff}[]").unwrap();
        assert!(parsed.events.is_empty());
    }

    #[test]
    fn non_array_is_rejected() {
        assert!(matches!(
            parse_history(r#"{"ts": "2024-01-01T00:00:00Z"}"#),
            Err(ParseError::NotArray)
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(parse_history("[{"), Err(ParseError::Json(_))));
    }

    #[test]
    fn parse_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{FULL_RECORD}]").unwrap();
        let parsed = parse_file(file.path()).unwrap();
        assert_eq!(parsed.events.len(), 1);
    }

    #[test]
    fn parse_file_reports_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Streaming_History_Audio_2024.json");
        std::fs::write(&path, "not json").unwrap();
        let err = parse_file(&path).unwrap_err();
        assert_eq!(err.file(), "Streaming_History_Audio_2024.json");
        assert!(matches!(err, IngestError::Parse { .. }));
    }

    #[test]
    fn parse_file_missing_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
    }
}
