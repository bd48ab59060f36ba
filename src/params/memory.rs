use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::ParamStore;
use crate::utils::error::{Error, Result};
use crate::utils::{read, write};

/// In-process parameter store.
///
/// `set_reachable(false)` makes every call fail with `Unreachable`, which is
/// how an unavailable server is simulated.
#[derive(Debug)]
pub struct MemoryParamStore {
    values: RwLock<HashMap<String, Vec<String>>>,
    reachable: AtomicBool,
}

impl MemoryParamStore {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            reachable: AtomicBool::new(true),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::Unreachable {
                key: key.to_string(),
                reason: "store marked unreachable".to_string(),
            })
        }
    }
}

impl Default for MemoryParamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamStore for MemoryParamStore {
    fn list_string_param(&self, key: &str) -> Result<Vec<String>> {
        self.check(key)?;
        Ok(read(&self.values).get(key).cloned().unwrap_or_default())
    }

    fn set_string_param(&self, key: &str, values: &[String]) -> Result<()> {
        self.check(key)?;
        write(&self.values).insert(key.to_string(), values.to_vec());
        Ok(())
    }
}
