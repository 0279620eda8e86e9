use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use arcade_core::{SettingsStore, StoreError};
use serde_json::{Map, Value};

/// Settings kept as one JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Loads `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let values = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Could not parse settings in {}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, starting fresh", path.display());
                Map::new()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Could not read {}", path.display()));
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &self.values)?;
        writer.flush()?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::SettingsStoreExt;

    #[test]
    fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get::<u64>("game2048.bestScore"), None);
        store.set("game2048.bestScore", &2048_u64).unwrap();
        store.set("games.lastSelected", &"minesweeper").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get::<u64>("game2048.bestScore"), Some(2048));
        assert_eq!(
            reopened.get::<String>("games.lastSelected").as_deref(),
            Some("minesweeper")
        );
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2").unwrap();

        assert!(JsonFileStore::open(file.path()).is_err());
    }
}
