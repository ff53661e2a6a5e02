//! Deployment knobs: how deep a [DescriptorCache](crate::cache::DescriptorCache)
//! walks on materialization, whether definitions load eagerly or lazily,
//! and whether `children` writes pay for an acyclicity check.
//!
//! Deserialized from TOML the way the teacher's `util::files::load_toml`
//! loads its own perf/CLI configuration files.

use serde::{Deserialize, Serialize};

use std::{fs, path::Path};

use crate::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// How many `children` levels [DescriptorCache](crate::cache::DescriptorCache)
    /// materializes below a structure's root before stopping.
    #[serde(default = "StoreConfig::default_cache_depth")]
    pub cache_depth: usize,
    /// Eager mode bulk-reads every definition a materialized structure
    /// references in one query; lazy mode defers each to first access.
    #[serde(default)]
    pub eager_definitions: bool,
    /// Validate `children` writes stay acyclic. Off by default: a
    /// dangling or cyclic reference is tolerated and cleaned up lazily
    /// rather than rejected outright.
    #[serde(default)]
    pub validate_acyclic: bool,
}

impl StoreConfig {
    fn default_cache_depth() -> usize {
        100
    }

    pub fn from_toml_str(s: &str) -> Result<StoreConfig> {
        err_at!(FailConvert, toml::from_str(s))
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<StoreConfig> {
        let path = path.as_ref();
        let data = err_at!(IOError, fs::read_to_string(path))?;
        let prefix = format!("{}:{}", file!(), line!());
        StoreConfig::from_toml_str(&data).map_err(|err| {
            crate::Error::FailConvert(format!("{} file:{:?} err:{}", prefix, path, err))
        })
    }
}

impl Default for StoreConfig {
    fn default() -> StoreConfig {
        StoreConfig {
            cache_depth: StoreConfig::default_cache_depth(),
            eager_definitions: false,
            validate_acyclic: false,
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
