//! Journal record types
//!
//! Records serialize with camelCase keys; this is the shape stored inside
//! the `data.json` entry of an archive.

use crate::date;
use crate::types::{now_millis, AnniversaryId, MemoryId, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated journal entry with optional photos and a voice note
///
/// Media are referenced by path; the files themselves live in the media
/// store. Title and message are expected to be non-empty, but that is
/// checked by the journal's create and edit operations, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    /// Store-assigned identifier
    #[serde(default)]
    pub id: MemoryId,
    /// Short title
    pub title: String,
    /// Calendar date the memory is about
    #[serde(with = "date::iso")]
    pub date: NaiveDate,
    /// Body text
    pub message: String,
    /// Photo paths in display order
    #[serde(default)]
    pub photo_paths: Vec<String>,
    /// Voice note path, if any
    #[serde(default)]
    pub audio_path: Option<String>,
    /// Creation time (millis since epoch)
    #[serde(default)]
    pub created_at: i64,
}

impl MemoryRecord {
    /// Create a record with no media, stamped with the current time
    pub fn new(title: impl Into<String>, date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            id: MemoryId::default(),
            title: title.into(),
            date,
            message: message.into(),
            photo_paths: Vec::new(),
            audio_path: None,
            created_at: now_millis(),
        }
    }

    /// Attach photo paths
    pub fn with_photos<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photo_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a voice note path
    pub fn with_audio(mut self, path: impl Into<String>) -> Self {
        self.audio_path = Some(path.into());
        self
    }

    /// Number of attached photos
    pub fn photo_count(&self) -> usize {
        self.photo_paths.len()
    }

    /// Whether a voice note is attached
    pub fn has_audio(&self) -> bool {
        self.audio_path.is_some()
    }

    /// All media paths referenced by this record (photos first, then audio)
    pub fn media_paths(&self) -> impl Iterator<Item = &str> {
        self.photo_paths
            .iter()
            .map(String::as_str)
            .chain(self.audio_path.as_deref())
    }
}

/// A date tracked for day-count reminders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnniversaryRecord {
    /// Store-assigned identifier
    #[serde(default)]
    pub id: AnniversaryId,
    /// Short title
    pub title: String,
    /// The date being remembered
    #[serde(with = "date::iso")]
    pub date: NaiveDate,
    /// Optional free-text description
    #[serde(default, with = "date::optional_text")]
    pub description: Option<String>,
    /// Flagged as important by the user
    #[serde(default)]
    pub is_important: bool,
    /// Creation time (millis since epoch)
    #[serde(default)]
    pub created_at: i64,
}

impl AnniversaryRecord {
    /// Create an unflagged anniversary with no description
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: AnniversaryId::default(),
            title: title.into(),
            date,
            description: None,
            is_important: false,
            created_at: now_millis(),
        }
    }

    /// Set the description; an empty string clears it
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// Flag as important
    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }
}

/// A co-author of the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Optional avatar image path
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether this is the user the journal is acting as
    #[serde(default)]
    pub is_current_user: bool,
    /// Creation time (millis since epoch)
    #[serde(default)]
    pub created_at: i64,
}

impl User {
    /// Create a non-current user with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            avatar: None,
            is_current_user: false,
            created_at: now_millis(),
        }
    }

    /// Set the avatar image path
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_memory_serializes_camel_case() {
        let mut memory = MemoryRecord::new("Beach", ymd(2024, 3, 15), "Sunny day")
            .with_photos(["/a/img_1.jpg"])
            .with_audio("/b/audio_1.3gp");
        memory.id = MemoryId(7);
        memory.created_at = 1_710_460_800_000;

        let value = serde_json::to_value(&memory).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "title": "Beach",
                "date": "2024-03-15",
                "message": "Sunny day",
                "photoPaths": ["/a/img_1.jpg"],
                "audioPath": "/b/audio_1.3gp",
                "createdAt": 1_710_460_800_000i64,
            })
        );
    }

    #[test]
    fn test_memory_null_audio_roundtrips() {
        let value = json!({
            "id": 1, "title": "t", "date": "2020-01-02", "message": "m",
            "photoPaths": [], "audioPath": null, "createdAt": 5
        });
        let memory: MemoryRecord = serde_json::from_value(value).unwrap();
        assert_eq!(memory.audio_path, None);
        assert!(!memory.has_audio());
    }

    #[test]
    fn test_memory_rejects_bad_date() {
        let value = json!({
            "id": 1, "title": "t", "date": "02/01/2020", "message": "m"
        });
        let err = serde_json::from_value::<MemoryRecord>(value).unwrap_err();
        assert!(err.to_string().contains("02/01/2020"));
    }

    #[test]
    fn test_anniversary_empty_description_is_none() {
        let value = json!({
            "id": 3, "title": "First date", "date": "2019-05-20",
            "description": "", "isImportant": true, "createdAt": 9
        });
        let anniversary: AnniversaryRecord = serde_json::from_value(value).unwrap();
        assert_eq!(anniversary.description, None);
        assert!(anniversary.is_important);
    }

    #[test]
    fn test_anniversary_none_description_serializes_empty() {
        let anniversary = AnniversaryRecord::new("Wedding", ymd(2021, 10, 1));
        let value = serde_json::to_value(&anniversary).unwrap();
        assert_eq!(value["description"], json!(""));
        assert_eq!(value["isImportant"], json!(false));
    }

    #[test]
    fn test_media_paths_lists_photos_then_audio() {
        let memory = MemoryRecord::new("t", ymd(2024, 1, 1), "m")
            .with_photos(["p1", "p2"])
            .with_audio("a1");
        let paths: Vec<&str> = memory.media_paths().collect();
        assert_eq!(paths, vec!["p1", "p2", "a1"]);
    }

    #[test]
    fn test_user_avatar_serialized() {
        let user = User::new("Sam").with_avatar("/m/images/img_2.jpg");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["avatar"], json!("/m/images/img_2.jpg"));
        assert_eq!(value["isCurrentUser"], json!(false));

        let back: User = serde_json::from_value(value).unwrap();
        assert_eq!(back, user);
    }
}
