//! Best score persisted as a small JSON key/value file.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use paper_snake_session::{parse_best, BestScoreStore, StoreError, BEST_SCORE_KEY};

/// JSON file holding string-encoded values keyed like browser local storage.
#[derive(Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location used when no explicit best-score file is configured.
    pub(crate) fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "paper-snake", "PaperSnake")
            .context("could not resolve project directories")?;
        Ok(dirs.data_local_dir().join("best.json"))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Option<BTreeMap<String, String>>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|error| StoreError::Malformed(error.to_string()))
    }
}

impl BestScoreStore for FileStore {
    fn load(&mut self) -> Result<Option<u32>, StoreError> {
        let Some(entries) = self.read_entries()? else {
            return Ok(None);
        };
        entries.get(BEST_SCORE_KEY).map(|raw| parse_best(raw)).transpose()
    }

    fn save(&mut self, best: u32) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?.unwrap_or_default();
        let _ = entries.insert(BEST_SCORE_KEY.to_owned(), best.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&entries)
            .map_err(|error| StoreError::Unavailable(error.to_string()))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, data)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "paper-snake-store-{}-{name}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir.join("best.json")
    }

    #[test]
    fn missing_file_loads_nothing() {
        let mut store = FileStore::new(scratch("missing"));
        assert_eq!(store.load().expect("missing file is not an error"), None);
    }

    #[test]
    fn saved_best_is_loaded_back() {
        let path = scratch("round-trip");
        let mut store = FileStore::new(path.clone());
        store.save(23).expect("writable temp dir");

        let contents = fs::read_to_string(&path).expect("file written");
        assert!(contents.contains("\"paperSnakeBest\": \"23\""));
        assert_eq!(FileStore::new(path).load().expect("readable"), Some(23));
    }

    #[test]
    fn unrelated_keys_survive_saves() {
        let path = scratch("foreign-keys");
        fs::create_dir_all(path.parent().expect("has parent")).expect("create dir");
        fs::write(&path, r#"{"volume":"0.4","paperSnakeBest":"2"}"#).expect("seed file");

        let mut store = FileStore::new(path.clone());
        assert_eq!(store.load().expect("readable"), Some(2));
        store.save(5).expect("writable");

        let contents = fs::read_to_string(&path).expect("file written");
        assert!(contents.contains("volume"));
        assert_eq!(store.load().expect("readable"), Some(5));
    }

    #[test]
    fn garbage_is_reported_as_malformed() {
        let path = scratch("garbage");
        fs::create_dir_all(path.parent().expect("has parent")).expect("create dir");
        fs::write(&path, r#"{"paperSnakeBest":"lots"}"#).expect("seed file");

        let mut store = FileStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn unreadable_file_is_left_untouched_on_save() {
        let path = scratch("not-json");
        fs::create_dir_all(path.parent().expect("has parent")).expect("create dir");
        fs::write(&path, "volume=0.4").expect("seed file");

        let mut store = FileStore::new(path.clone());
        assert!(matches!(store.save(9), Err(StoreError::Malformed(_))));
        assert_eq!(fs::read_to_string(&path).expect("file kept"), "volume=0.4");
    }
}
