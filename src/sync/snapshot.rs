use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

use crate::game::settings::data_dir;
use crate::model::UserProfile;

pub const STORAGE_NAMESPACE: &str = "math-adventure-storage";

/// The whole profile as one JSON document on local disk.
#[derive(Debug, Clone)]
pub struct LocalSnapshot {
    path: PathBuf,
}

impl LocalSnapshot {
    pub fn in_data_dir() -> Self {
        Self::in_dir(&data_dir())
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{STORAGE_NAMESPACE}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nothing was saved yet or the file no longer parses.
    pub fn load(&self) -> Option<UserProfile> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!(target: "sync", "Ignoring unreadable snapshot {:?}: {}", self.path, err);
                None
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string(profile)?;
        fs::write(&self.path, contents)
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}
