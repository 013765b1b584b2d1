use std::path::{Path, PathBuf};

use chrono::Local;

use crate::{error::StoreError, types::TrackRecord, utils};

/// A point-in-time export of the liked songs.
///
/// Written once to a timestamp-named file; it is never read back by the
/// program.
pub struct LikedSnapshot {
    tracks: Vec<TrackRecord>,
}

impl LikedSnapshot {
    pub fn new(tracks: Vec<TrackRecord>) -> Self {
        Self { tracks }
    }

    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    /// Writes the snapshot into `dir` and returns the file path.
    pub async fn persist(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        async_fs::create_dir_all(dir).await?;

        let path = dir.join(utils::backup_file_name(Local::now()));
        let json = serde_json::to_string_pretty(&self.tracks)?;
        async_fs::write(&path, json).await?;
        Ok(path)
    }
}
