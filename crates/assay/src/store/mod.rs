//! Descriptor persistence, keyed by a dataset-derived identifier.
//!
//! Descriptors are plain JSON documents with deterministic key order,
//! readable without shared code. Writes go through a temporary file and
//! a rename, so a failed write never leaves a partial document; the last
//! writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AssayError, Result};
use crate::schema::SchemaDescriptor;
use crate::stats::ThresholdDescriptor;

/// Domain keywords recognized in dataset names, in priority order.
const KEY_TAGS: &[&str] = &[
    "cy",
    "fy",
    "monthly",
    "company",
    "federal",
    "native",
    "production",
    "revenue",
    "disbursements",
];

/// Derive a descriptor key from a dataset name: the concatenation, in
/// priority order, of every tag appearing as a case-insensitive
/// substring of the name. Names matching no tag map to "default".
pub fn descriptor_key(dataset_name: &str) -> String {
    let lower = dataset_name.to_lowercase();
    let key: String = KEY_TAGS
        .iter()
        .copied()
        .filter(|tag| lower.contains(tag))
        .collect();
    if key.is_empty() { "default".to_string() } else { key }
}

/// Serialize a value to `path` via a sibling temp file and rename.
fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AssayError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let json = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json).map_err(|e| AssayError::Io {
        path: tmp.clone(),
        source: e,
    })?;
    fs::rename(&tmp, path).map_err(|e| AssayError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a JSON document, mapping a missing file to `ConfigNotFound`.
fn read_document<T: DeserializeOwned>(path: &Path, key: &str) -> Result<T> {
    if !path.exists() {
        return Err(AssayError::ConfigNotFound {
            key: key.to_string(),
        });
    }
    let bytes = fs::read(path).map_err(|e| AssayError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Persists [`SchemaDescriptor`]s under a config directory.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    root: PathBuf,
}

impl SchemaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.schema.json"))
    }

    /// Whether a descriptor is persisted under the key.
    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Write the descriptor, replacing any previous one wholesale.
    pub fn persist(&self, descriptor: &SchemaDescriptor, key: &str) -> Result<()> {
        write_atomic(&self.path_for(key), descriptor)
    }

    /// Load the descriptor for the key.
    pub fn load(&self, key: &str) -> Result<SchemaDescriptor> {
        read_document(&self.path_for(key), key)
    }
}

/// Persists [`ThresholdDescriptor`]s under a config directory.
#[derive(Debug, Clone)]
pub struct ThresholdStore {
    root: PathBuf,
}

impl ThresholdStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.thresholds.json"))
    }

    /// Whether a descriptor is persisted under the key.
    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Write the descriptor, replacing any previous one wholesale.
    pub fn persist(&self, descriptor: &ThresholdDescriptor, key: &str) -> Result<()> {
        write_atomic(&self.path_for(key), descriptor)
    }

    /// Load the descriptor for the key.
    pub fn load(&self, key: &str) -> Result<ThresholdDescriptor> {
        read_document(&self.path_for(key), key)
    }
}
