//! Directory-backed database
//!
//! One file per key, named by the SHA-256 of the key. Each file starts with
//! a header line holding the key itself so that prefix deletion can match
//! keys without a separate index; the stored bytes follow verbatim.
//!
//! Writes go to a temporary sibling and are renamed into place, so readers
//! never observe a half-written entry.

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::traits::Database;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const EXTENSION: &str = "entry";

#[derive(Debug)]
pub struct DirectoryDatabase {
    root: PathBuf,
    temp_counter: AtomicU64,
}

impl DirectoryDatabase {
    /// Open (creating if needed) a database rooted at `root`
    pub async fn open(root: impl Into<PathBuf>) -> BackendResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| BackendError::io("create storage directory", e))?;
        log::debug!("Directory database at {}", root.display());
        Ok(Self {
            root,
            temp_counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let name: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        self.root.join(format!("{}.{}", name, EXTENSION))
    }
}

fn check_key(key: &str) -> BackendResult<()> {
    if key.is_empty() || key.contains('\n') {
        return Err(BackendError::Io {
            operation: "validate key".to_string(),
            message: format!("key {:?} cannot be stored", key),
        });
    }
    Ok(())
}

/// Split stored bytes into (key, value)
fn split_entry(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let newline = bytes.iter().position(|b| *b == b'\n')?;
    Some((&bytes[..newline], &bytes[newline + 1..]))
}

#[async_trait::async_trait]
impl Database for DirectoryDatabase {
    async fn get(&self, key: &str) -> BackendResult<Option<Vec<u8>>> {
        check_key(key)?;
        let bytes = match tokio::fs::read(self.entry_path(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BackendError::io("read entry", e)),
        };

        match split_entry(&bytes) {
            Some((stored_key, value)) if stored_key == key.as_bytes() => Ok(Some(value.to_vec())),
            Some(_) => {
                log::warn!("Hash collision or foreign file for key '{}'", key);
                Ok(None)
            }
            None => Err(BackendError::Serialization {
                what: format!("entry for '{}'", key),
                message: "missing key header".to_string(),
            }),
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> BackendResult<()> {
        check_key(key)?;
        let path = self.entry_path(key);
        let temp = path.with_extension(format!(
            "tmp{}",
            self.temp_counter.fetch_add(1, Ordering::Relaxed)
        ));

        let mut contents = Vec::with_capacity(key.len() + 1 + value.len());
        contents.extend_from_slice(key.as_bytes());
        contents.push(b'\n');
        contents.extend_from_slice(&value);

        tokio::fs::write(&temp, contents)
            .await
            .map_err(|e| BackendError::io("write entry", e))?;
        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(BackendError::io("commit entry", e));
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> BackendResult<()> {
        check_key(key)?;
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::io("delete entry", e)),
        }
    }

    async fn delete_all_matching_prefix(&self, prefix: &str) -> BackendResult<usize> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| BackendError::io("list storage directory", e))?;

        let mut removed = 0;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| BackendError::io("list storage directory", e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                // Deleted concurrently
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(BackendError::io("read entry", e)),
            };
            let matches = split_entry(&bytes)
                .map(|(key, _)| key.starts_with(prefix.as_bytes()))
                .unwrap_or(false);
            if matches {
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(BackendError::io("delete entry", e)),
                }
            }
        }

        log::debug!("Removed {} entries with prefix '{}'", removed, prefix);
        Ok(removed)
    }
}
