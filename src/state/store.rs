use std::{
    collections::HashMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::error::StoreError;

const TMP_SUFFIX: &str = "tmp";

/// Key-value persistence port for serialized inputs. Values are JSON strings.
pub trait InputStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, key: &str, json: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, json: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), json.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl InputStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, json: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), json.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside `root`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", canonical_key(key)))
    }
}

impl InputStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn save(&mut self, key: &str, json: &str) -> Result<(), StoreError> {
        write_atomic(&self.path_for(key), json)
    }
}

fn canonical_key(key: &str) -> String {
    key.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn write_atomic(path: &Path, data: &str) -> Result<(), StoreError> {
    let tmp = path.with_extension(TMP_SUFFIX);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("k").expect("load"), None);
        store.save("k", "{\"a\":1}").expect("save");
        assert_eq!(store.load("k").expect("load").as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn file_store_writes_one_file_per_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonFileStore::new(dir.path().join("state")).expect("store");

        assert_eq!(store.load("break-calculator-inputs").expect("load"), None);
        store
            .save("break-calculator-inputs", "{\"currentAge\":40}")
            .expect("save");

        let path = store.path_for("break-calculator-inputs");
        assert!(path.ends_with("break-calculator-inputs.json"));
        assert!(path.exists());
        assert!(!path.with_extension(TMP_SUFFIX).exists());
        assert_eq!(
            store.load("break-calculator-inputs").expect("load").as_deref(),
            Some("{\"currentAge\":40}")
        );
    }

    #[test]
    fn file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path()).expect("store");
        assert!(store.path_for("../Escape Key").ends_with("___escape_key.json"));
    }
}
