//! Archive reader
//!
//! Reads `.tar.zst` archives in a single pass. Entries are handled in the
//! order they are stored, so `data.json` may come before or after the media.

use crate::bundle::error::{ArchiveError, ArchiveResult};
use crate::bundle::types::{paths, ArchiveSnapshot, ArchiveSummary, EntryKind, ImportedArchive};
use keepsake_storage::{MediaKind, MediaStore};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tar::Archive;
use tracing::{info, warn};

/// Reader for journal archives
pub struct ArchiveReader;

impl ArchiveReader {
    /// Import an archive file, writing its media into `media`
    ///
    /// Fails if the archive cannot be opened or decompressed, or if
    /// `data.json` is missing or invalid. Individual media entries that
    /// cannot be written are logged and skipped; media written before a
    /// failure stays on disk.
    pub fn import(path: &Path, media: &MediaStore) -> ArchiveResult<ImportedArchive> {
        let file = File::open(path)?;
        let imported = Self::import_from_reader(BufReader::new(file), media)?;
        info!(
            "Imported {} memories, {} anniversaries, {} photos, {} audio files from {}",
            imported.snapshot.memories.len(),
            imported.snapshot.anniversaries.len(),
            imported.photos_written.len(),
            imported.audios_written.len(),
            path.display()
        );
        Ok(imported)
    }

    /// Import an archive held in memory
    pub fn import_from_bytes(data: &[u8], media: &MediaStore) -> ArchiveResult<ImportedArchive> {
        Self::import_from_reader(data, media)
    }

    /// Decode only the snapshot, ignoring media
    pub fn read_snapshot(path: &Path) -> ArchiveResult<ArchiveSnapshot> {
        let file = File::open(path)?;
        Ok(Self::scan(BufReader::new(file))?.0)
    }

    /// Describe an archive file without writing anything
    pub fn inspect(path: &Path) -> ArchiveResult<ArchiveSummary> {
        let file = File::open(path)?;
        Self::summarize(BufReader::new(file))
    }

    /// Describe an in-memory archive without writing anything
    pub fn inspect_bytes(data: &[u8]) -> ArchiveResult<ArchiveSummary> {
        Self::summarize(data)
    }

    fn import_from_reader<R: Read>(
        reader: R,
        media: &MediaStore,
    ) -> ArchiveResult<ImportedArchive> {
        let mut snapshot = None;
        let mut photos_written = Vec::new();
        let mut audios_written = Vec::new();
        let mut media_skipped = Vec::new();

        for_each_entry(reader, |kind, entry| {
            let (media_kind, name) = match kind {
                EntryKind::Data => {
                    snapshot = Some(decode_data(entry)?);
                    return Ok(());
                }
                EntryKind::Photo(name) => (MediaKind::Image, name),
                EntryKind::Audio(name) => (MediaKind::Audio, name),
                EntryKind::Other => return Ok(()),
            };

            match media.write_named_from(media_kind, &name, entry) {
                Ok(path) => match media_kind {
                    MediaKind::Image => photos_written.push(path),
                    MediaKind::Audio => audios_written.push(path),
                },
                Err(e) => {
                    warn!("Skipping {} entry {:?}: {}", media_kind.dir_name(), name, e);
                    media_skipped.push(name);
                }
            }
            Ok(())
        })?;

        let snapshot = snapshot.ok_or_else(|| ArchiveError::missing_entry(paths::DATA))?;
        Ok(ImportedArchive {
            snapshot,
            photos_written,
            audios_written,
            media_skipped,
        })
    }

    fn summarize<R: Read>(reader: R) -> ArchiveResult<ArchiveSummary> {
        let (snapshot, photo_entries, audio_entries) = Self::scan(reader)?;
        Ok(ArchiveSummary {
            version: snapshot.version,
            export_date: snapshot.export_date,
            memory_count: snapshot.memories.len(),
            anniversary_count: snapshot.anniversaries.len(),
            photo_entries,
            audio_entries,
        })
    }

    /// Decode the snapshot and list media entry names
    fn scan<R: Read>(reader: R) -> ArchiveResult<(ArchiveSnapshot, Vec<String>, Vec<String>)> {
        let mut snapshot = None;
        let mut photos = Vec::new();
        let mut audios = Vec::new();

        for_each_entry(reader, |kind, entry| {
            match kind {
                EntryKind::Data => snapshot = Some(decode_data(entry)?),
                EntryKind::Photo(name) => photos.push(name),
                EntryKind::Audio(name) => audios.push(name),
                EntryKind::Other => {}
            }
            Ok(())
        })?;

        let snapshot = snapshot.ok_or_else(|| ArchiveError::missing_entry(paths::DATA))?;
        Ok((snapshot, photos, audios))
    }
}

/// Walk every regular entry of a `.tar.zst` stream in stored order
fn for_each_entry<R, F>(reader: R, mut visit: F) -> ArchiveResult<()>
where
    R: Read,
    F: FnMut(EntryKind, &mut dyn Read) -> ArchiveResult<()>,
{
    let decoder = zstd::Decoder::new(reader)
        .map_err(|e| ArchiveError::compression(format!("zstd decode: {}", e)))?;
    let mut archive = Archive::new(decoder);

    for entry in archive.entries().map_err(|e| ArchiveError::archive(e.to_string()))? {
        let mut entry = entry.map_err(|e| ArchiveError::archive(e.to_string()))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let entry_path = entry
            .path()
            .map_err(|e| ArchiveError::archive(e.to_string()))?
            .to_string_lossy()
            .to_string();

        visit(EntryKind::classify(&entry_path), &mut entry)?;
    }

    Ok(())
}

fn decode_data(entry: &mut dyn Read) -> ArchiveResult<ArchiveSnapshot> {
    let mut data = Vec::new();
    entry
        .read_to_end(&mut data)
        .map_err(|e| ArchiveError::archive(format!("read {}: {}", paths::DATA, e)))?;
    ArchiveSnapshot::decode(&data)
}
