//! Archive writer
//!
//! Produces `.tar.zst` archives: `data.json` first, then `photos/*`, then
//! `audios/*`. Entry headers carry fixed mode and mtime, so the same
//! snapshot and media always produce the same bytes.

use crate::bundle::error::{ArchiveError, ArchiveResult};
use crate::bundle::types::{paths, ArchiveExportInfo, ArchiveSnapshot, ExportOptions};
use keepsake_storage::file_name_of;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tar::{Builder, Header};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Writer for journal archives
pub struct ArchiveWriter {
    compression_level: i32,
}

impl ArchiveWriter {
    /// Create a writer with the given options
    pub fn new(options: &ExportOptions) -> Self {
        Self {
            compression_level: options.compression_level,
        }
    }

    /// Write an archive to `path`
    ///
    /// The archive is staged in a temporary file beside `path` and renamed
    /// into place only once complete. On any error the staged file is
    /// removed and `path` is left untouched.
    pub fn write(
        &self,
        snapshot: &ArchiveSnapshot,
        path: &Path,
    ) -> ArchiveResult<ArchiveExportInfo> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let tmp = NamedTempFile::new_in(dir)?;
        let mut info = {
            let writer = BufWriter::new(tmp.as_file());
            let (mut writer, info) = self.write_to(snapshot, writer)?;
            writer.flush()?;
            info
        };
        tmp.as_file().sync_all()?;
        info.size_bytes = tmp.as_file().metadata()?.len();

        tmp.persist(path).map_err(|e| ArchiveError::Io(e.error))?;
        info.path = Some(path.to_path_buf());

        info!(
            "Exported {} memories, {} anniversaries, {} photos, {} audio files to {} ({} bytes)",
            info.memory_count,
            info.anniversary_count,
            info.photo_entries,
            info.audio_entries,
            path.display(),
            info.size_bytes
        );
        Ok(info)
    }

    /// Write an archive into memory
    pub fn write_to_vec(
        &self,
        snapshot: &ArchiveSnapshot,
    ) -> ArchiveResult<(Vec<u8>, ArchiveExportInfo)> {
        let (data, mut info) = self.write_to(snapshot, Vec::new())?;
        info.size_bytes = data.len() as u64;
        Ok((data, info))
    }

    /// Stream the archive into `writer`, handing the writer back when done
    fn write_to<W: Write>(
        &self,
        snapshot: &ArchiveSnapshot,
        writer: W,
    ) -> ArchiveResult<(W, ArchiveExportInfo)> {
        let encoder = zstd::Encoder::new(writer, self.compression_level)
            .map_err(|e| ArchiveError::compression(format!("zstd encoder: {}", e)))?;
        let mut builder = Builder::new(encoder);

        let data = snapshot.encode()?;
        append_entry(&mut builder, paths::DATA, data.len() as u64, &data[..])?;

        let mut info = ArchiveExportInfo {
            path: None,
            memory_count: snapshot.memories.len(),
            anniversary_count: snapshot.anniversaries.len(),
            photo_entries: 0,
            audio_entries: 0,
            skipped_media: Vec::new(),
            size_bytes: 0,
        };

        for source in snapshot.photo_sources() {
            if append_media(&mut builder, source, paths::photo)? {
                info.photo_entries += 1;
            } else {
                info.skipped_media.push(source.to_string());
            }
        }
        for source in snapshot.audio_sources() {
            if append_media(&mut builder, source, paths::audio)? {
                info.audio_entries += 1;
            } else {
                info.skipped_media.push(source.to_string());
            }
        }

        let encoder = builder
            .into_inner()
            .map_err(|e| ArchiveError::archive(format!("finish tar: {}", e)))?;
        let writer = encoder
            .finish()
            .map_err(|e| ArchiveError::compression(format!("zstd finish: {}", e)))?;

        Ok((writer, info))
    }
}

fn append_entry<W: Write, R: Read>(
    builder: &mut Builder<W>,
    name: &str,
    size: u64,
    data: R,
) -> ArchiveResult<()> {
    let mut header = Header::new_gnu();
    header.set_size(size);
    header.set_mode(0o644);
    header.set_mtime(0);
    builder
        .append_data(&mut header, name, data)
        .map_err(|e| ArchiveError::archive(format!("append {}: {}", name, e)))
}

/// Append one media file; returns `false` if it was skipped as missing
fn append_media<W: Write>(
    builder: &mut Builder<W>,
    source: &str,
    entry_name: fn(&str) -> String,
) -> ArchiveResult<bool> {
    let Some(file_name) = file_name_of(source) else {
        debug!("Skipping media path without a file name: {}", source);
        return Ok(false);
    };

    let file = match File::open(source) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Skipping missing media file {}", source);
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    let metadata = file.metadata()?;
    if !metadata.is_file() {
        debug!("Skipping non-file media path {}", source);
        return Ok(false);
    }

    append_entry(builder, &entry_name(file_name), metadata.len(), file)?;
    Ok(true)
}
