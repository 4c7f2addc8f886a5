// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local key-value store holding JSON snapshots.
//!
//! Values are kept in an in-memory map and, when a data directory is
//! configured, mirrored to one file per key. Without a directory the store
//! is purely in memory (tests, ephemeral runs).

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt snapshot for {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode snapshot for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value store client.
#[derive(Clone)]
pub struct LocalStore {
    root: Option<PathBuf>,
    cache: Arc<DashMap<String, String>>,
}

impl LocalStore {
    /// Open a store backed by `dir`, creating the directory if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| StoreError::Io {
                key: root.display().to_string(),
                source,
            })?;

        tracing::info!(path = %root.display(), "Opened local store");

        Ok(Self {
            root: Some(root),
            cache: Arc::new(DashMap::new()),
        })
    }

    /// Create an in-memory store with no backing directory.
    pub fn new_memory() -> Self {
        Self {
            root: None,
            cache: Arc::new(DashMap::new()),
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.root.is_some()
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(format!("{}.json", encode_key(key))))
    }

    // ─── Raw Operations ──────────────────────────────────────────

    /// Read a raw value.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.clone()));
        }

        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(value) => {
                self.cache.insert(key.to_string(), value.clone());
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Write a raw value.
    ///
    /// The in-memory copy is updated even when the file write fails.
    pub async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.cache.insert(key.to_string(), value.clone());

        let Some(path) = self.path_for(key) else {
            return Ok(());
        };

        // Write to a sibling temp file, then rename over the target.
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        tokio::fs::write(&tmp, value.as_bytes())
            .await
            .map_err(io_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_err)?;
        Ok(())
    }

    // ─── Typed Operations ────────────────────────────────────────

    /// Read and decode a JSON snapshot.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            })
    }

    /// Encode and write a JSON snapshot.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.set(key, raw).await
    }

    /// Drop cached values so the next read goes to disk.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Map a key to a file-name-safe string.
///
/// Bytes outside `[A-Za-z0-9._-]` become `%XX`, so distinct keys never
/// share a file.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}
