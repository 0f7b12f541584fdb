use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use uuid::Uuid;

use super::interfaces::{BlobStore, ConvertTask, PortError, Publisher, TaskStatus, TaskStatusStore};

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

///
/// [`BlobStore`] keeping blobs in memory, spilling downloads to a temp directory
///
#[derive(Debug)]
pub struct InMemoryBlobStore {
    dir: tempfile::TempDir,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// Create an empty store with its own temp directory for downloads
    pub fn new() -> Result<Self, PortError> {
        Ok(Self {
            dir: tempfile::tempdir()?,
            blobs: Mutex::new(HashMap::new()),
        })
    }

    /// Insert a blob directly (e.g., to seed test fixtures)
    pub fn insert(&self, path: impl Into<String>, bytes: Vec<u8>) {
        lock_unpoisoned(&self.blobs).insert(path.into(), bytes);
    }

    /// Get a stored blob's bytes
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        lock_unpoisoned(&self.blobs).get(path).cloned()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn download(&self, uri: &str, file_name: &str) -> Result<PathBuf, PortError> {
        let bytes = self
            .get(uri)
            .ok_or_else(|| PortError::NotFound(uri.to_string()))?;
        let local_path = self.dir.path().join(file_name);
        std::fs::write(&local_path, bytes)?;
        Ok(local_path)
    }

    fn upload_bytes(
        &self,
        path: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, PortError> {
        self.insert(path, bytes.to_vec());
        Ok(path.to_string())
    }

    fn upload_file(&self, path: &str, local_path: &Path) -> Result<String, PortError> {
        let bytes = std::fs::read(local_path)?;
        self.insert(path, bytes);
        Ok(path.to_string())
    }

    fn signed_url(
        &self,
        path: &str,
        mimetype: &str,
        method: &str,
        ttl: Duration,
    ) -> Result<String, PortError> {
        if !lock_unpoisoned(&self.blobs).contains_key(path) && method != "PUT" {
            return Err(PortError::NotFound(path.to_string()));
        }
        Ok(format!(
            "memory://{path}?method={method}&type={mimetype}&expires={}",
            ttl.as_secs()
        ))
    }
}

/// [`TaskStatusStore`] backed by an in-memory map
#[derive(Debug, Default)]
pub struct InMemoryTaskStatusStore {
    statuses: Mutex<HashMap<Uuid, TaskStatus>>,
}

impl InMemoryTaskStatusStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStatusStore for InMemoryTaskStatusStore {
    fn get(&self, task_id: &Uuid) -> Option<TaskStatus> {
        lock_unpoisoned(&self.statuses).get(task_id).cloned()
    }

    fn set(&self, task_id: Uuid, status: TaskStatus) {
        lock_unpoisoned(&self.statuses).insert(task_id, status);
    }
}

/// [`Publisher`] collecting published tasks in memory
#[derive(Debug, Default)]
pub struct InMemoryPublisher {
    messages: Mutex<Vec<ConvertTask>>,
}

impl InMemoryPublisher {
    /// Create an empty publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// All tasks published so far, in publish order
    pub fn published(&self) -> Vec<ConvertTask> {
        lock_unpoisoned(&self.messages).clone()
    }
}

impl Publisher for InMemoryPublisher {
    fn publish(&self, task: &ConvertTask) -> Result<(), PortError> {
        // Round-trip through the wire encoding, as a real queue would
        let payload = task.to_json()?;
        lock_unpoisoned(&self.messages).push(ConvertTask::from_json(&payload)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ColumnMapping;

    #[test]
    fn test_blob_store_round_trip() {
        let store = InMemoryBlobStore::new().unwrap();
        store
            .upload_bytes("raw/data.csv", b"case,activity\n", "text/csv")
            .unwrap();
        let local = store.download("raw/data.csv", "data.csv").unwrap();
        assert_eq!(std::fs::read(local).unwrap(), b"case,activity\n");
        assert!(matches!(
            store.download("raw/missing.csv", "missing.csv"),
            Err(PortError::NotFound(_))
        ));
    }

    #[test]
    fn test_status_store() {
        let store = InMemoryTaskStatusStore::new();
        let id = Uuid::new_v4();
        assert_eq!(store.get(&id), None);
        store.set(id, TaskStatus::Processing);
        assert_eq!(store.get(&id), Some(TaskStatus::Processing));
        store.set(
            id,
            TaskStatus::Done {
                url: "memory://done.xes".to_string(),
            },
        );
        assert!(matches!(store.get(&id), Some(TaskStatus::Done { .. })));
    }

    #[test]
    fn test_publisher_round_trips_wire_encoding() {
        let publisher = InMemoryPublisher::new();
        let task = ConvertTask {
            task_id: Uuid::new_v4(),
            url: "gs://bucket/raw/data.csv".to_string(),
            email_address: "analyst@example.com".to_string(),
            mapping: ColumnMapping::new("case", "activity", "timestamp"),
            delimiter: b';',
        };
        publisher.publish(&task).unwrap();
        assert_eq!(publisher.published(), vec![task]);
    }
}
