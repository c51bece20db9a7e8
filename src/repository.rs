//! Record storage behind the [`Repository`] seam.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{PlannerError, Result};
use crate::traits::Repository;

/// A JSON array in a single file.
///
/// A missing file loads as an empty collection; the parent directory is
/// created on first save.
#[derive(Debug, Clone)]
pub struct JsonRepository<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonRepository<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PlannerError {
        PlannerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<T> Repository<T> for JsonRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|source| PlannerError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, items: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(items).map_err(|source| PlannerError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// In-process store, handy for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryRepository<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Clone> MemoryRepository<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

impl<T: Clone> Repository<T> for MemoryRepository<T> {
    fn load(&self) -> Result<Vec<T>> {
        Ok(self.snapshot())
    }

    fn save(&self, items: &[T]) -> Result<()> {
        *self.items.lock() = items.to_vec();
        Ok(())
    }
}
