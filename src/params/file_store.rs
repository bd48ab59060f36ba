//! JSON-file parameter store
//!
//! The file holds a single JSON object mapping fully qualified keys to string
//! lists:
//!
//! ```json
//! { "/ambf/env/World/point_cloud_topics": ["/ambf/env/pc/a"] }
//! ```
//!
//! The file is re-read on every fetch so external edits are picked up by the
//! next reconciliation cycle. A missing, unreadable or malformed file is
//! reported as `Unreachable`. Writes are staged in a temporary file next to
//! the target and renamed over it.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use super::ParamStore;
use crate::utils::error::{Error, Result};
use crate::utils::lock;

type Document = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub struct FileParamStore {
    path: PathBuf,
    // serializes read-modify-write cycles from this process
    write_guard: Mutex<()>,
}

impl FileParamStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document> {
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl ParamStore for FileParamStore {
    fn list_string_param(&self, key: &str) -> Result<Vec<String>> {
        let mut doc = self.load().map_err(|e| Error::Unreachable {
            key: key.to_string(),
            reason: format!("{}: {e}", self.path.display()),
        })?;
        Ok(doc.remove(key).unwrap_or_default())
    }

    fn set_string_param(&self, key: &str, values: &[String]) -> Result<()> {
        let _guard = lock(&self.write_guard);

        let mut doc = match self.load() {
            Ok(doc) => doc,
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => Document::new(),
            Err(e) => return Err(e),
        };
        doc.insert(key.to_string(), values.to_vec());

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        // readers see either the old document or the new one, never a prefix
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(serde_json::to_string_pretty(&doc)?.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| e.error)?;

        debug!("Wrote {} values for '{key}' to {}", values.len(), self.path.display());
        Ok(())
    }
}
