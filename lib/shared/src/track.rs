use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One archived episode as stored on disk by the catalog fetch.
///
/// Only `title` and `created_at` are required; everything else is optional so
/// that hand-written or older record files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub permalink_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_url: Option<String>,
}

// The catalog sends `"description": null` for episodes without one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn minimal_record_defaults_optional_fields() {
        let json = r#"{"title": "Episode 42", "created_at": "2021-02-27T00:00:00Z"}"#;
        let record: TrackRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.title, "Episode 42");
        assert_eq!(record.description, "");
        assert_eq!(record.permalink_url, "");
        assert_eq!(record.id, None);
        assert_eq!(
            record.created_at,
            Utc.with_ymd_and_hms(2021, 2, 27, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn null_description_reads_as_empty() {
        let json = r#"{"title": "x", "description": null, "created_at": "2021-02-27T00:00:00Z"}"#;
        let record: TrackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.description, "");
    }

    #[test]
    fn missing_title_is_rejected() {
        let json = r#"{"created_at": "2021-02-27T00:00:00Z"}"#;
        assert!(serde_json::from_str::<TrackRecord>(json).is_err());
    }

    #[test]
    fn missing_created_at_is_rejected() {
        let json = r#"{"title": "Episode 42"}"#;
        assert!(serde_json::from_str::<TrackRecord>(json).is_err());
    }

    #[test]
    fn catalog_timestamps_with_offset_parse() {
        let json = r#"{"title": "x", "created_at": "2019-01-03T18:22:41+00:00", "id": 12345}"#;
        let record: TrackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, Some(12345));
        assert_eq!(
            record.created_at,
            Utc.with_ymd_and_hms(2019, 1, 3, 18, 22, 41).unwrap()
        );
    }
}
