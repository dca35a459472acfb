//! Media store: photo and audio files on local disk
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/
//! ├── images/   # img_<millis>.jpg
//! └── audio/    # audio_<millis>.3gp
//! ```
//!
//! Directories are created on demand. Records only hold paths into these
//! directories; the store never tracks which record owns which file.

use crate::error::{StorageError, StorageResult};
use keepsake_core::now_millis;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Upper bound on `_<n>` suffixes tried when a generated name is taken
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// The two kinds of media a memory can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Photo, stored as JPEG
    Image,
    /// Voice note, stored as 3GP
    Audio,
}

impl MediaKind {
    /// Directory name under the store root
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Audio => "audio",
        }
    }

    /// Prefix of generated filenames
    pub fn file_prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "img",
            MediaKind::Audio => "audio",
        }
    }

    /// Extension of generated filenames
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Audio => "3gp",
        }
    }
}

/// Final path segment of `path`, accepting both `/` and `\` separators
///
/// Paths recorded on another device may use either separator, so this does
/// not go through [`Path::file_name`]. Returns `None` for empty names and for
/// `.` or `..`.
///
/// # Examples
///
/// ```
/// use keepsake_storage::file_name_of;
///
/// assert_eq!(file_name_of("/old/device/img_1.jpg"), Some("img_1.jpg"));
/// assert_eq!(file_name_of(r"C:\photos\img_2.jpg"), Some("img_2.jpg"));
/// assert_eq!(file_name_of("/old/device/"), None);
/// ```
pub fn file_name_of(path: &str) -> Option<&str> {
    let name = path.rsplit(['/', '\\']).next()?;
    match name {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}

/// Manages the on-device image and audio directories
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Open a media store rooted at `root`, creating the directory if needed
    ///
    /// The root is canonicalized so every path handed out is absolute.
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        fs::create_dir_all(root.as_ref())?;
        let root = fs::canonicalize(root.as_ref())?;
        Ok(Self { root })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for `kind`, without creating it
    pub fn dir_path(&self, kind: MediaKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Directory for `kind`, created on demand
    pub fn dir(&self, kind: MediaKind) -> StorageResult<PathBuf> {
        let dir = self.dir_path(kind);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Image directory, created on demand
    pub fn image_dir(&self) -> StorageResult<PathBuf> {
        self.dir(MediaKind::Image)
    }

    /// Audio directory, created on demand
    pub fn audio_dir(&self) -> StorageResult<PathBuf> {
        self.dir(MediaKind::Audio)
    }

    /// Save incoming bytes under a freshly generated filename
    ///
    /// Names are `<prefix>_<millis>.<ext>`; if that name is taken a `_<n>`
    /// suffix is added. Files are created with create-new semantics so an
    /// existing file is never overwritten.
    pub fn save_incoming(&self, bytes: &[u8], kind: MediaKind) -> StorageResult<PathBuf> {
        let dir = self.dir(kind)?;
        let millis = now_millis();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = dir.join(generated_name(kind, millis, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
                        drop(file);
                        let _ = fs::remove_file(&path);
                        return Err(e.into());
                    }
                    debug!("Saved {} bytes to {}", bytes.len(), path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free {} name for timestamp {}", kind.dir_name(), millis),
        )))
    }

    /// Allocate a path for a new voice note without creating the file
    ///
    /// The audio recorder writes to the returned path.
    pub fn new_audio_path(&self) -> StorageResult<PathBuf> {
        let dir = self.audio_dir()?;
        let millis = now_millis();
        (0..MAX_NAME_ATTEMPTS)
            .map(|attempt| dir.join(generated_name(MediaKind::Audio, millis, attempt)))
            .find(|path| !path.exists())
            .ok_or_else(|| {
                StorageError::Io(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("no free audio name for timestamp {}", millis),
                ))
            })
    }

    /// Write `bytes` under an exact filename, replacing any existing file
    pub fn write_named(&self, kind: MediaKind, name: &str, bytes: &[u8]) -> StorageResult<PathBuf> {
        self.write_named_from(kind, name, &mut &bytes[..])
    }

    /// Stream `reader` into an exact filename, replacing any existing file
    ///
    /// `name` must be a plain filename. On failure the partially written file
    /// is removed.
    pub fn write_named_from<R: Read + ?Sized>(
        &self,
        kind: MediaKind,
        name: &str,
        reader: &mut R,
    ) -> StorageResult<PathBuf> {
        if file_name_of(name) != Some(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let path = self.dir(kind)?.join(name);
        let result = File::create(&path).and_then(|mut file| {
            io::copy(reader, &mut file)?;
            file.flush()
        });

        match result {
            Ok(()) => Ok(path),
            Err(e) => {
                let _ = fs::remove_file(&path);
                Err(e.into())
            }
        }
    }

    /// Whether a file exists at `path`; `None` is never an error
    pub fn exists(&self, path: Option<&Path>) -> bool {
        path.map(|p| p.is_file()).unwrap_or(false)
    }

    /// Delete the file at `path`
    ///
    /// Returns `Ok(true)` if a file was removed. `None` and a missing file
    /// are no-ops returning `Ok(false)`.
    pub fn delete(&self, path: Option<&Path>) -> StorageResult<bool> {
        let Some(path) = path else {
            return Ok(false);
        };
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Deleted media file {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                warn!("Failed to delete media file {}: {}", path.display(), e);
                Err(e.into())
            }
        }
    }

    /// Re-home a foreign media path under this store's directory for `kind`
    ///
    /// Only the filename survives; the original directory is discarded.
    /// Returns `None` if the path has no filename.
    pub fn remap(&self, kind: MediaKind, original: &str) -> Option<PathBuf> {
        file_name_of(original).map(|name| self.dir_path(kind).join(name))
    }

    /// Files currently stored for `kind`, sorted by path
    pub fn list(&self, kind: MediaKind) -> StorageResult<Vec<PathBuf>> {
        let dir = self.dir_path(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

fn generated_name(kind: MediaKind, millis: i64, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}_{}.{}", kind.file_prefix(), millis, kind.extension())
    } else {
        format!(
            "{}_{}_{}.{}",
            kind.file_prefix(),
            millis,
            attempt,
            kind.extension()
        )
    }
}
