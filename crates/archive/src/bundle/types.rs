//! Archive schema, entry layout and result types

use crate::bundle::error::{ArchiveError, ArchiveResult};
use chrono::{Local, NaiveDate};
use keepsake_core::date;
use keepsake_core::{AnniversaryRecord, MemoryRecord};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot format version written by this build
pub const ARCHIVE_FORMAT_VERSION: &str = "1.0";

/// File extension for archives
pub const ARCHIVE_EXTENSION: &str = "tar.zst";

/// Default zstd compression level
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Entry names inside the archive
pub mod paths {
    /// Structured snapshot entry
    pub const DATA: &str = "data.json";
    /// Directory holding photo bytes
    pub const PHOTOS_DIR: &str = "photos";
    /// Directory holding audio bytes
    pub const AUDIOS_DIR: &str = "audios";

    /// Entry name for a photo file
    pub fn photo(file_name: &str) -> String {
        format!("{}/{}", PHOTOS_DIR, file_name)
    }

    /// Entry name for an audio file
    pub fn audio(file_name: &str) -> String {
        format!("{}/{}", AUDIOS_DIR, file_name)
    }
}

/// What an archive entry holds, judged by its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EntryKind {
    /// The `data.json` snapshot
    Data,
    /// A photo, with the name after `photos/`
    Photo(String),
    /// An audio file, with the name after `audios/`
    Audio(String),
    /// Anything else; ignored
    Other,
}

impl EntryKind {
    /// Classify an entry by its stored name
    pub(crate) fn classify(name: &str) -> Self {
        let name = name.strip_prefix("./").unwrap_or(name);
        if name == paths::DATA {
            return EntryKind::Data;
        }
        if let Some(rest) = name.strip_prefix(paths::PHOTOS_DIR).and_then(|r| r.strip_prefix('/')) {
            return EntryKind::Photo(rest.to_string());
        }
        if let Some(rest) = name.strip_prefix(paths::AUDIOS_DIR).and_then(|r| r.strip_prefix('/')) {
            return EntryKind::Audio(rest.to_string());
        }
        EntryKind::Other
    }
}

/// The structured content of an archive
///
/// Serialized as the `data.json` entry:
///
/// ```json
/// { "memories": [...], "anniversaries": [...], "exportDate": "2024-03-15", "version": "1.0" }
/// ```
///
/// Media paths inside the records are the paths on the exporting device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSnapshot {
    /// Memories, in the order given at export
    pub memories: Vec<MemoryRecord>,
    /// Anniversaries, in the order given at export
    pub anniversaries: Vec<AnniversaryRecord>,
    /// Day the archive was produced
    #[serde(with = "date::iso")]
    pub export_date: NaiveDate,
    /// Snapshot format version
    pub version: String,
}

impl ArchiveSnapshot {
    /// Snapshot stamped with today's local date and the current format version
    pub fn new(memories: Vec<MemoryRecord>, anniversaries: Vec<AnniversaryRecord>) -> Self {
        Self {
            memories,
            anniversaries,
            export_date: Local::now().date_naive(),
            version: ARCHIVE_FORMAT_VERSION.to_string(),
        }
    }

    /// Override the export date
    pub fn with_export_date(mut self, export_date: NaiveDate) -> Self {
        self.export_date = export_date;
        self
    }

    /// Encode as pretty-printed UTF-8 JSON
    pub fn encode(&self) -> ArchiveResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| ArchiveError::invalid_snapshot(e.to_string()))
    }

    /// Decode and validate a `data.json` payload
    ///
    /// The version is checked before the records so an archive from a
    /// newer format fails with [`ArchiveError::UnsupportedVersion`] rather
    /// than a field-level decode error.
    pub fn decode(data: &[u8]) -> ArchiveResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| ArchiveError::invalid_snapshot(format!("malformed JSON: {}", e)))?;

        match value.get("version") {
            Some(serde_json::Value::String(v)) if v == ARCHIVE_FORMAT_VERSION => {}
            Some(serde_json::Value::String(v)) => {
                return Err(ArchiveError::UnsupportedVersion { version: v.clone() })
            }
            Some(other) => {
                return Err(ArchiveError::invalid_snapshot(format!(
                    "version must be a string, got {}",
                    other
                )))
            }
            None => return Err(ArchiveError::invalid_snapshot("missing version")),
        }

        serde_json::from_value(value).map_err(|e| ArchiveError::invalid_snapshot(e.to_string()))
    }

    /// Distinct photo paths across all memories, in first-seen order
    pub fn photo_sources(&self) -> Vec<&str> {
        distinct(
            self.memories
                .iter()
                .flat_map(|m| m.photo_paths.iter().map(String::as_str)),
        )
    }

    /// Distinct audio paths across all memories, in first-seen order
    pub fn audio_sources(&self) -> Vec<&str> {
        distinct(self.memories.iter().filter_map(|m| m.audio_path.as_deref()))
    }
}

fn distinct<'a>(paths: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    paths.filter(|p| seen.insert(*p)).collect()
}

/// Options for writing archives
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// zstd compression level (1-22)
    pub compression_level: i32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl ExportOptions {
    /// Set the compression level
    pub fn with_compression_level(mut self, level: i32) -> Self {
        self.compression_level = level;
        self
    }
}

/// Summary of a completed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveExportInfo {
    /// Where the archive was written; `None` for in-memory exports
    pub path: Option<PathBuf>,
    /// Memories in the snapshot
    pub memory_count: usize,
    /// Anniversaries in the snapshot
    pub anniversary_count: usize,
    /// Entries written under `photos/`
    pub photo_entries: usize,
    /// Entries written under `audios/`
    pub audio_entries: usize,
    /// Referenced media paths that did not exist and were left out
    pub skipped_media: Vec<String>,
    /// Size of the archive in bytes
    pub size_bytes: u64,
}

/// Result of importing an archive
#[derive(Debug, Clone)]
pub struct ImportedArchive {
    /// Decoded snapshot, with the original embedded media paths
    pub snapshot: ArchiveSnapshot,
    /// Photo files written into the media store
    pub photos_written: Vec<PathBuf>,
    /// Audio files written into the media store
    pub audios_written: Vec<PathBuf>,
    /// Media entries that could not be written
    pub media_skipped: Vec<String>,
}

/// Archive contents, read without touching the media store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Snapshot format version
    pub version: String,
    /// Day the archive was produced
    pub export_date: NaiveDate,
    /// Memories in the snapshot
    pub memory_count: usize,
    /// Anniversaries in the snapshot
    pub anniversary_count: usize,
    /// Filenames stored under `photos/`
    pub photo_entries: Vec<String>,
    /// Filenames stored under `audios/`
    pub audio_entries: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_classify_entries() {
        assert_eq!(EntryKind::classify("data.json"), EntryKind::Data);
        assert_eq!(EntryKind::classify("./data.json"), EntryKind::Data);
        assert_eq!(
            EntryKind::classify("photos/img_1.jpg"),
            EntryKind::Photo("img_1.jpg".to_string())
        );
        assert_eq!(
            EntryKind::classify("audios/audio_1.3gp"),
            EntryKind::Audio("audio_1.3gp".to_string())
        );
        assert_eq!(EntryKind::classify("photosx/img.jpg"), EntryKind::Other);
        assert_eq!(EntryKind::classify("README"), EntryKind::Other);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = ArchiveSnapshot::new(vec![], vec![]).with_export_date(ymd(2024, 3, 15));
        let value: serde_json::Value = serde_json::from_slice(&snapshot.encode().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "memories": [],
                "anniversaries": [],
                "exportDate": "2024-03-15",
                "version": "1.0"
            })
        );
    }

    #[test]
    fn test_decode_missing_version() {
        let data = br#"{"memories": [], "anniversaries": [], "exportDate": "2024-03-15"}"#;
        let err = ArchiveSnapshot::decode(data).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidSnapshot(_)), "{}", err);
    }

    #[test]
    fn test_decode_unknown_version() {
        let data = br#"{"memories": [], "anniversaries": [],
            "exportDate": "2024-03-15", "version": "2.0"}"#;
        let err = ArchiveSnapshot::decode(data).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::UnsupportedVersion { ref version } if version == "2.0"
        ));
    }

    #[test]
    fn test_decode_bad_date_names_value() {
        let data = br#"{"memories": [], "anniversaries": [],
            "exportDate": "March 15", "version": "1.0"}"#;
        let err = ArchiveSnapshot::decode(data).unwrap_err();
        assert!(err.to_string().contains("March 15"), "{}", err);
    }

    #[test]
    fn test_decode_original_layout() {
        let data = br#"{
            "memories": [{
                "id": 3, "title": "Picnic", "date": "2023-06-01", "message": "Park",
                "photoPaths": ["/data/images/img_1.jpg"], "audioPath": null,
                "createdAt": 1685577600000
            }],
            "anniversaries": [{
                "id": 1, "title": "Met", "date": "2019-05-20", "description": "",
                "isImportant": true, "createdAt": 1685577600000
            }],
            "exportDate": "2024-03-15",
            "version": "1.0"
        }"#;
        let snapshot = ArchiveSnapshot::decode(data).unwrap();
        assert_eq!(snapshot.memories.len(), 1);
        assert_eq!(snapshot.memories[0].photo_paths, vec!["/data/images/img_1.jpg"]);
        assert_eq!(snapshot.anniversaries[0].description, None);
        assert_eq!(snapshot.export_date, ymd(2024, 3, 15));
    }

    #[test]
    fn test_sources_are_distinct_in_order() {
        let d = ymd(2024, 1, 1);
        let snapshot = ArchiveSnapshot::new(
            vec![
                MemoryRecord::new("a", d, "m")
                    .with_photos(["/p/2.jpg", "/p/1.jpg"])
                    .with_audio("/a/1.3gp"),
                MemoryRecord::new("b", d, "m")
                    .with_photos(["/p/1.jpg"])
                    .with_audio("/a/1.3gp"),
            ],
            vec![],
        );
        assert_eq!(snapshot.photo_sources(), vec!["/p/2.jpg", "/p/1.jpg"]);
        assert_eq!(snapshot.audio_sources(), vec!["/a/1.3gp"]);
    }
}
