//! Core scrapbook domain types.
//!
//! Defines the dated entry record and its owned photos, plus the
//! rules that govern the entry key (the calendar date string) and
//! timeline ordering.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Calendar date format used as the entry key (`2026-01-29`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ────────────────────────────────────────────
// Records
// ────────────────────────────────────────────

/// A single photo owned by an entry.
///
/// Order inside [`ScrapbookEntry::photos`] is meaningful and is
/// preserved through every storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Photo identifier (client supplied).
    pub id: String,
    /// Resolvable location: root-relative for local storage,
    /// absolute HTTPS for the blob store.
    pub url: String,
    /// Optional caption shown under the photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Width in pixels (placeholder, no image inspection happens).
    pub width: u32,
    /// Height in pixels (placeholder, no image inspection happens).
    pub height: u32,
}

/// One dated scrapbook record.
///
/// The `date` string is the primary key: it names the stored
/// document (`<date>.json`) and there is at most one entry per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapbookEntry {
    /// Opaque identifier.
    pub id: String,
    /// Calendar date key, `YYYY-MM-DD`.
    pub date: String,
    /// Entry headline.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Ordered photos owned by this entry.
    pub photos: Vec<Photo>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
}

impl ScrapbookEntry {
    /// Parsed calendar date, if the key is a well-formed date.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

// ────────────────────────────────────────────
// Keys and ordering
// ────────────────────────────────────────────

/// Whether `key` can safely name a stored object.
///
/// Rejects empty keys, path separators, parent-directory segments
/// and control characters so a key can never escape its directory
/// or prefix.
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && !key.contains("..")
        && !key.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}

/// Parse `date` only when it is already in canonical `YYYY-MM-DD` form.
///
/// chrono accepts unpadded fields and signed years, which would let
/// `2026-1-5` and `2026-01-05` name two documents for one day.
pub fn parse_canonical_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        .filter(|parsed| parsed.format(DATE_FORMAT).to_string() == date)
}

/// File/object name of the document holding the entry for `date`.
pub fn entry_file_name(date: &str) -> String {
    format!("{date}.json")
}

/// Timeline ordering: newest date first.
///
/// Dates that fail to parse sort after every valid date, and
/// compare by their raw string among themselves.
pub fn newest_first(a: &ScrapbookEntry, b: &ScrapbookEntry) -> Ordering {
    match (a.calendar_date(), b.calendar_date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.date.cmp(&a.date),
    }
}

/// Sort entries for the timeline (newest first).
pub fn sort_newest_first(entries: &mut [ScrapbookEntry]) {
    entries.sort_by(newest_first);
}

// ────────────────────────────────────────────
// Create requests
// ────────────────────────────────────────────

/// Rejection reasons for an incoming entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: date, title, and at least one photo")]
    MissingFields,
    #[error("Invalid date: expected YYYY-MM-DD")]
    InvalidDate,
}

/// Entry as submitted by the admin client.
///
/// Every field is optional on the wire; [`EntryDraft::into_entry`]
/// decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Option<Vec<Photo>>,
}

impl EntryDraft {
    /// Validate the draft and stamp both timestamps with `now`.
    ///
    /// Requires a date, a title and at least one photo. A missing
    /// `id` is filled with a fresh UUID.
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<ScrapbookEntry, ValidationError> {
        let date = non_blank(self.date).ok_or(ValidationError::MissingFields)?;
        let title = non_blank(self.title).ok_or(ValidationError::MissingFields)?;
        let photos = self
            .photos
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingFields)?;

        if !is_safe_key(&date) || parse_canonical_date(&date).is_none() {
            return Err(ValidationError::InvalidDate);
        }

        let stamp = now.to_rfc3339();
        Ok(ScrapbookEntry {
            id: non_blank(self.id).unwrap_or_else(|| Uuid::new_v4().to_string()),
            date,
            title,
            description: self.description.unwrap_or_default(),
            photos,
            created_at: stamp.clone(),
            updated_at: stamp,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str) -> ScrapbookEntry {
        ScrapbookEntry {
            id: format!("id-{date}"),
            date: date.to_string(),
            title: "T".to_string(),
            description: String::new(),
            photos: vec![],
            created_at: "2026-01-29T12:00:00Z".to_string(),
            updated_at: "2026-01-29T12:00:00Z".to_string(),
        }
    }

    fn photo(id: &str) -> Photo {
        Photo {
            id: id.to_string(),
            url: format!("/uploads/{id}.jpg"),
            caption: None,
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn test_json_field_names_match_record_format() {
        let mut e = entry("2026-01-29");
        e.photos.push(photo("p1"));
        let json = serde_json::to_value(&e).unwrap();

        assert_eq!(json["createdAt"], "2026-01-29T12:00:00Z");
        assert_eq!(json["updatedAt"], "2026-01-29T12:00:00Z");
        assert_eq!(json["photos"][0]["width"], 800);
        assert!(json["photos"][0].get("caption").is_none());
    }

    #[test]
    fn test_caption_survives_when_present() {
        let mut p = photo("p1");
        p.caption = Some("Beach".to_string());
        let json = serde_json::to_string(&p).unwrap();
        let back: Photo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.caption.as_deref(), Some("Beach"));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut entries = vec![entry("2024-01-15"), entry("2026-01-29"), entry("2025-06-01")];
        sort_newest_first(&mut entries);
        let dates: Vec<_> = entries.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, ["2026-01-29", "2025-06-01", "2024-01-15"]);
    }

    #[test]
    fn test_unparseable_dates_sort_last() {
        let mut entries = vec![entry("someday"), entry("2024-01-15")];
        sort_newest_first(&mut entries);
        assert_eq!(entries[0].date, "2024-01-15");
        assert_eq!(entries[1].date, "someday");
    }

    #[test]
    fn test_safe_key() {
        assert!(is_safe_key("2026-01-29"));
        assert!(is_safe_key("a1b2.jpg"));
        assert!(!is_safe_key(""));
        assert!(!is_safe_key("../etc/passwd"));
        assert!(!is_safe_key("entries/2026-01-29"));
        assert!(!is_safe_key("a\\b"));
        assert!(!is_safe_key(".."));
    }

    #[test]
    fn test_draft_requires_date_title_and_photo() {
        let now = Utc::now();
        let missing_photos = EntryDraft {
            date: Some("2026-01-29".to_string()),
            title: Some("T".to_string()),
            photos: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(missing_photos.into_entry(now), Err(ValidationError::MissingFields));

        let missing_title = EntryDraft {
            date: Some("2026-01-29".to_string()),
            title: Some("  ".to_string()),
            photos: Some(vec![photo("p1")]),
            ..Default::default()
        };
        assert_eq!(missing_title.into_entry(now), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_draft_rejects_malformed_date() {
        let draft = EntryDraft {
            date: Some("../2026".to_string()),
            title: Some("T".to_string()),
            photos: Some(vec![photo("p1")]),
            ..Default::default()
        };
        assert_eq!(draft.into_entry(Utc::now()), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn test_draft_rejects_non_canonical_dates() {
        for date in ["2026-1-5", "2026-01-5", "+2026-01-05", "2026-02-30"] {
            let draft = EntryDraft {
                date: Some(date.to_string()),
                title: Some("T".to_string()),
                photos: Some(vec![photo("p1")]),
                ..Default::default()
            };
            assert_eq!(draft.into_entry(Utc::now()), Err(ValidationError::InvalidDate), "{date}");
        }
    }

    #[test]
    fn test_canonical_date_parsing() {
        assert_eq!(
            parse_canonical_date("2026-01-05"),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
        assert!(parse_canonical_date("2026-1-5").is_none());
        assert!(parse_canonical_date("+2026-01-05").is_none());
    }

    #[test]
    fn test_draft_stamps_timestamps_and_keeps_id() {
        let now = Utc::now();
        let draft = EntryDraft {
            id: Some("keep-me".to_string()),
            date: Some("2026-01-29".to_string()),
            title: Some("T".to_string()),
            description: None,
            photos: Some(vec![photo("p1"), photo("p2")]),
        };
        let e = draft.into_entry(now).unwrap();

        assert_eq!(e.id, "keep-me");
        assert_eq!(e.created_at, now.to_rfc3339());
        assert_eq!(e.created_at, e.updated_at);
        assert_eq!(e.description, "");
        assert_eq!(e.photos[1].id, "p2");
    }

    #[test]
    fn test_draft_assigns_id_when_missing() {
        let draft = EntryDraft {
            date: Some("2026-01-29".to_string()),
            title: Some("T".to_string()),
            photos: Some(vec![photo("p1")]),
            ..Default::default()
        };
        let e = draft.into_entry(Utc::now()).unwrap();
        assert!(Uuid::parse_str(&e.id).is_ok());
    }
}
