//! JSONL file-backed store, one file per namespace.

use crate::error::StoreError;
use crate::model::MemoryRecord;
use crate::namespace::Namespace;
use crate::store::{MemoryStore, upsert};
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Durable store writing one JSONL file per namespace under a root
/// directory. Batches commit via a temp-file rename, so a namespace file
/// always holds either the pre-batch or the post-batch record set.
#[derive(Debug)]
pub struct FileStore {
    /// Root directory for namespace files.
    root: PathBuf,
    /// Serialize rewrites across namespaces.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open or create a store rooted at the given directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!("initialized file store (root={})", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Path to the namespace JSONL file.
    fn namespace_path(&self, namespace: &Namespace) -> PathBuf {
        self.root
            .join(format!("{}.jsonl", namespace.storage_stem()))
    }

    /// Path to the temporary namespace file.
    fn temp_path(&self, namespace: &Namespace) -> PathBuf {
        self.root
            .join(format!("{}.jsonl.tmp", namespace.storage_stem()))
    }

    /// Load all records for a namespace.
    fn load_records(&self, namespace: &Namespace) -> Result<Vec<MemoryRecord>, StoreError> {
        let path = self.namespace_path(namespace);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: MemoryRecord = serde_json::from_str(&line)?;
            records.push(record);
        }
        Ok(records)
    }

    /// Rewrite a namespace's records atomically.
    fn write_records(
        &self,
        namespace: &Namespace,
        records: &[MemoryRecord],
    ) -> Result<(), StoreError> {
        let path = self.namespace_path(namespace);
        let temp_path = self.temp_path(namespace);
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            for record in records {
                let line = serde_json::to_string(record)?;
                writeln!(file, "{line}")?;
            }
        }
        std::fs::rename(temp_path, path)?;
        Ok(())
    }
}

#[async_trait]
impl MemoryStore for FileStore {
    async fn get(
        &self,
        namespace: &Namespace,
        key: &str,
    ) -> Result<Option<MemoryRecord>, StoreError> {
        let records = self.load_records(namespace)?;
        Ok(records.into_iter().find(|record| record.key == key))
    }

    async fn search(&self, namespace: &Namespace) -> Result<Vec<MemoryRecord>, StoreError> {
        self.load_records(namespace)
    }

    async fn put_many(
        &self,
        namespace: &Namespace,
        entries: Vec<(String, Value)>,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut records = self.load_records(namespace)?;
        for (key, value) in entries {
            upsert(&mut records, namespace, key, value);
        }
        self.write_records(namespace, &records)?;
        debug!(
            "committed batch (namespace={}, records={})",
            namespace,
            records.len()
        );
        Ok(())
    }
}
