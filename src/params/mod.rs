//! The `params` module is the seam to the parameter server holding the
//! desired list of point-cloud topics.
//!
//! - `ParamStore`: the trait the reconciler fetches through
//! - `MemoryParamStore`: an in-process store, also used for failure injection
//! - `FileParamStore`: a JSON file standing in for a remote parameter server

pub mod file_store;
pub mod memory;


use crate::utils::error::Result;

pub use file_store::FileParamStore;
pub use memory::MemoryParamStore;

/// Parameter holding the desired point-cloud topic list.
pub const POINT_CLOUD_TOPICS: &str = "point_cloud_topics";

pub trait ParamStore: Send + Sync {
    /// Fetch a string-list parameter. A key that was never set reads as empty.
    ///
    /// Fails with `Error::Unreachable` when the store cannot be contacted.
    fn list_string_param(&self, key: &str) -> Result<Vec<String>>;

    fn set_string_param(&self, key: &str, values: &[String]) -> Result<()>;
}

/// Build the fully qualified parameter key, e.g.
/// `/ambf/env/World/point_cloud_topics`.
pub fn qualified_key(namespace: &str, name: &str, param: &str) -> String {
    let segments: Vec<&str> = [namespace, name, param]
        .into_iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}
