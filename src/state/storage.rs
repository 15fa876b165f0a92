use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    error::Result,
    utils::{entity_name, struct_to_snake_case, write_atomically},
};

/// JSON snapshot of a value kept between two runs of the CLI, one file per
/// type under the data directory.
pub trait FileSaver: Serialize + Sized
where
    for<'de> Self: Deserialize<'de>,
{
    /// Value used when nothing was saved yet.
    fn seed() -> Self;

    fn file_name() -> String {
        format!("{}.json", struct_to_snake_case(&entity_name::<Self>()))
    }

    fn get_file_path(dir: &Path) -> PathBuf {
        dir.join(Self::file_name())
    }

    fn get_or_create(dir: &Path) -> Result<Self> {
        let path = Self::get_file_path(dir);
        if !path.exists() {
            debug!(path = %path.display(), "no snapshot yet, seeding");
            return Ok(Self::seed());
        }
        let file = File::open(&path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    fn save_changes(&self, dir: &Path) -> Result<()> {
        let path = Self::get_file_path(dir);
        let content = serde_json::to_string_pretty(self)?;
        write_atomically(&path, content.as_bytes())?;
        debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }

    fn clear(dir: &Path) -> Result<()> {
        let path = Self::get_file_path(dir);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
