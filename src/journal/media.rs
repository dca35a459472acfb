//! Media operations

use super::Journal;
use crate::error::Result;
use keepsake_storage::MediaKind;
use std::path::{Path, PathBuf};

impl Journal {
    /// Store photo bytes under a generated name and return the path
    pub fn save_photo(&self, bytes: &[u8]) -> Result<PathBuf> {
        Ok(self.media.save_incoming(bytes, MediaKind::Image)?)
    }

    /// Store voice note bytes under a generated name and return the path
    pub fn save_audio(&self, bytes: &[u8]) -> Result<PathBuf> {
        Ok(self.media.save_incoming(bytes, MediaKind::Audio)?)
    }

    /// Fresh path for a recorder to write a voice note to
    pub fn new_audio_path(&self) -> Result<PathBuf> {
        Ok(self.media.new_audio_path()?)
    }

    /// Whether a referenced media file is present
    pub fn media_exists(&self, path: Option<&str>) -> bool {
        self.media.exists(path.map(Path::new))
    }
}
