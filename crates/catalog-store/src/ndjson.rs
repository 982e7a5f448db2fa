//! File-backed collection: one JSON document per line, append-only.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use catalog_core::Product;
use serde::Deserialize;

use crate::{duplicate_reason, DocumentWriter, StoreError};

/// Only the key is needed to rebuild the uniqueness index on open.
#[derive(Deserialize)]
struct DocumentKey {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug)]
pub struct NdjsonStore {
    path: PathBuf,
    ids: HashSet<String>,
}

impl NdjsonStore {
    /// Opens the collection file at `path`, creating parent directories. An
    /// absent file is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or file cannot be accessed,
    /// or [`StoreError::Corrupt`] if an existing line has no string `_id`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let ids = if path.exists() {
            load_ids(&path)?
        } else {
            HashSet::new()
        };
        tracing::debug!(path = %path.display(), documents = ids.len(), "opened collection");
        Ok(Self { path, ids })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn load_ids(path: &Path) -> Result<HashSet<String>, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut ids = HashSet::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let key: DocumentKey = serde_json::from_str(&line).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        ids.insert(key.id);
    }
    Ok(ids)
}

/// Appends each encoded line followed by a newline. Returns how many lines
/// were written in full, and the error that stopped the loop if any.
fn append_lines<W: Write>(mut writer: W, lines: &[String]) -> (usize, Option<std::io::Error>) {
    let mut written = 0;
    for line in lines {
        if let Err(e) = writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
        {
            return (written, Some(e));
        }
        written += 1;
    }
    match writer.flush() {
        Ok(()) => (written, None),
        Err(e) => (written, Some(e)),
    }
}

impl DocumentWriter for NdjsonStore {
    fn insert_batch(&mut self, batch: &[Product]) -> Result<usize, StoreError> {
        let mut ids = Vec::with_capacity(batch.len());
        let mut lines = Vec::with_capacity(batch.len());
        let mut rejected = Vec::new();
        let mut batch_ids = HashSet::new();

        for product in batch {
            if self.ids.contains(&product.id) || !batch_ids.insert(product.id.as_str()) {
                rejected.push(product.id.clone());
                continue;
            }
            let line = serde_json::to_string(product).map_err(|source| StoreError::Encode {
                id: product.id.clone(),
                source,
            })?;
            ids.push(product.id.as_str());
            lines.push(line);
        }

        let mut write_error = None;
        let mut inserted = 0;
        if !lines.is_empty() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| self.io_error(e))?;
            (inserted, write_error) = append_lines(file, &lines);
        }

        // Lines written before a failure are in the file; index them.
        self.ids
            .extend(ids[..inserted].iter().map(|id| (*id).to_string()));

        if let Some(e) = write_error {
            tracing::error!(
                path = %self.path.display(),
                written = inserted,
                unwritten = lines.len() - inserted,
                error = %e,
                "append interrupted"
            );
            if inserted == 0 && rejected.is_empty() {
                return Err(self.io_error(e));
            }
            let mut reason = format!("write failed after {inserted} documents: {e}");
            if !rejected.is_empty() {
                reason.push_str("; ");
                reason.push_str(&duplicate_reason(&rejected));
            }
            return Err(StoreError::PartialBatch {
                inserted,
                failed: batch.len() - inserted,
                reason,
            });
        }

        if rejected.is_empty() {
            Ok(inserted)
        } else {
            Err(StoreError::PartialBatch {
                inserted,
                failed: rejected.len(),
                reason: duplicate_reason(&rejected),
            })
        }
    }

    fn count_documents(&self) -> usize {
        self.ids.len()
    }
}
