use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::convert::mapping::ColumnMapping;

/// MIME type of converted XES documents
pub const XES_CONTENT_TYPE: &str = "application/xml+xes";

/// Error returned by collaborator implementations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PortError {
    /// A requested resource does not exist
    NotFound(String),
    /// IO error while reading or writing data
    Io(String),
    /// Message or payload (de)serialization error
    Serialization(String),
    /// The conversion core rejected the input
    Conversion(String),
}

impl Display for PortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "Not found: {what}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Serialization(e) => write!(f, "Serialization error: {e}"),
            Self::Conversion(e) => write!(f, "Conversion failed: {e}"),
        }
    }
}

impl std::error::Error for PortError {}

impl From<std::io::Error> for PortError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PortError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

///
/// Blob storage the orchestration layer downloads sources from and uploads
/// converted documents to
///
pub trait BlobStore {
    /// Download the blob at `uri` to a local file named `file_name`
    fn download(&self, uri: &str, file_name: &str) -> Result<PathBuf, PortError>;
    /// Upload raw bytes under `path`, returning the stored blob's identifier
    fn upload_bytes(&self, path: &str, bytes: &[u8], content_type: &str)
        -> Result<String, PortError>;
    /// Upload a local file under `path`, returning the stored blob's identifier
    fn upload_file(&self, path: &str, local_path: &Path) -> Result<String, PortError>;
    /// Generate a signed URL for `path`, valid for `ttl`
    fn signed_url(
        &self,
        path: &str,
        mimetype: &str,
        method: &str,
        ttl: Duration,
    ) -> Result<String, PortError>;
}

/// Status of an asynchronous conversion task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// The task has been accepted and is being processed
    Processing,
    /// The task finished; the converted document is available at `url`
    Done {
        /// Signed URL of the converted document
        url: String,
    },
    /// The task failed
    Failed {
        /// Human-readable failure reason
        message: String,
    },
}

///
/// Key-value store for task statuses
///
/// Injected into the orchestration layer with an explicit lifecycle; never a
/// module-level global.
///
pub trait TaskStatusStore {
    /// Look up the status of a task
    fn get(&self, task_id: &Uuid) -> Option<TaskStatus>;
    /// Record the status of a task
    fn set(&self, task_id: Uuid, status: TaskStatus);
}

///
/// Message describing one asynchronous conversion task
///
/// Encoded as JSON on the wire (see [`ConvertTask::to_json`]).
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertTask {
    /// Unique task identifier
    pub task_id: Uuid,
    /// URI of the source CSV blob
    pub url: String,
    /// Address to notify once the task finishes
    pub email_address: String,
    /// Column mapping to convert with
    pub mapping: ColumnMapping,
    /// CSV field delimiter
    pub delimiter: u8,
}

impl ConvertTask {
    /// Encode the task as a JSON payload
    pub fn to_json(&self) -> Result<Vec<u8>, PortError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a task from a JSON payload
    pub fn from_json(data: &[u8]) -> Result<Self, PortError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Message-queue dispatch for asynchronous processing
pub trait Publisher {
    /// Publish a conversion task; returns once the queue acknowledged it
    fn publish(&self, task: &ConvertTask) -> Result<(), PortError>;
}
