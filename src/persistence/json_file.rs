//! Whole-collection JSON file store.
//!
//! Every save rewrites the complete collection. Writes go to a sibling
//! `.tmp` file first and are renamed over the target on commit, so a crash
//! mid-write leaves the previous contents intact.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::MenuError;

/// A JSON document holding one collection of type `T`.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

/// A fully written temporary file awaiting [`StagedWrite::commit`].
#[derive(Debug)]
#[must_use = "a staged write does nothing until committed"]
pub struct StagedWrite {
    tmp: PathBuf,
    target: PathBuf,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the collection, creating the file with an empty collection if
    /// it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::PersistenceError`] if the file cannot be read,
    /// created, or parsed.
    pub async fn load_or_init(&self) -> Result<T, MenuError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                MenuError::PersistenceError(format!("{}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = T::default();
                self.save(&empty).await?;
                tracing::info!(path = %self.path.display(), "initialized empty collection");
                Ok(empty)
            }
            Err(e) => Err(MenuError::PersistenceError(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Writes `value` to the temporary sibling file without touching the
    /// target.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::PersistenceError`] on serialization or I/O
    /// failure.
    pub async fn stage(&self, value: &T) -> Result<StagedWrite, MenuError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| MenuError::PersistenceError(e.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes).await?;
        Ok(StagedWrite {
            tmp,
            target: self.path.clone(),
        })
    }

    /// Stages and commits `value` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::PersistenceError`] on serialization or I/O
    /// failure.
    pub async fn save(&self, value: &T) -> Result<(), MenuError> {
        self.stage(value).await?.commit().await
    }
}

impl StagedWrite {
    /// Atomically replaces the target file with the staged contents.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::PersistenceError`] if the rename fails.
    pub async fn commit(self) -> Result<(), MenuError> {
        tokio::fs::rename(&self.tmp, &self.target).await?;
        Ok(())
    }

    /// Removes the staged file without touching the target.
    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.tmp).await {
            tracing::warn!(path = %self.tmp.display(), error = %e, "failed to discard staged write");
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    type Mapping = BTreeMap<String, u32>;

    #[tokio::test]
    async fn missing_file_is_initialized_empty() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let store = JsonFileStore::<Mapping>::new(dir.path().join("map.json"));
        let Ok(loaded) = store.load_or_init().await else {
            panic!("load should succeed");
        };
        assert!(loaded.is_empty());
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn reads_what_was_last_written() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let store = JsonFileStore::<Mapping>::new(dir.path().join("nested/map.json"));
        let mapping = Mapping::from([("tok".to_string(), 4)]);
        assert!(store.save(&mapping).await.is_ok());
        let Ok(loaded) = store.load_or_init().await else {
            panic!("load should succeed");
        };
        assert_eq!(loaded, mapping);
    }

    #[tokio::test]
    async fn staged_write_is_invisible_until_commit() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let store = JsonFileStore::<Mapping>::new(dir.path().join("map.json"));
        let _ = store.load_or_init().await;

        let Ok(staged) = store.stage(&Mapping::from([("a".to_string(), 1)])).await else {
            panic!("stage should succeed");
        };
        let Ok(before) = store.load_or_init().await else {
            panic!("load should succeed");
        };
        assert!(before.is_empty());

        assert!(staged.commit().await.is_ok());
        let Ok(after) = store.load_or_init().await else {
            panic!("load should succeed");
        };
        assert_eq!(after.len(), 1);
    }

    #[tokio::test]
    async fn discarded_write_leaves_target() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let store = JsonFileStore::<Mapping>::new(dir.path().join("map.json"));
        let _ = store.load_or_init().await;
        let Ok(staged) = store.stage(&Mapping::from([("a".to_string(), 1)])).await else {
            panic!("stage should succeed");
        };
        staged.discard().await;
        assert!(!dir.path().join("map.json.tmp").exists());
        let Ok(loaded) = store.load_or_init().await else {
            panic!("load should succeed");
        };
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let path = dir.path().join("map.json");
        assert!(std::fs::write(&path, b"{not json").is_ok());
        let store = JsonFileStore::<Mapping>::new(path);
        assert!(matches!(
            store.load_or_init().await,
            Err(MenuError::PersistenceError(_))
        ));
    }
}
