use std::time::Duration;

use super::interfaces::{BlobStore, ConvertTask, PortError, TaskStatus, TaskStatusStore, XES_CONTENT_TYPE};
use crate::convert::pipeline::{convert_csv_to_log, ConvertOptions};
use crate::event_log::export_xes::export_xes_event_log;

/// How long signed URLs for converted documents stay valid
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

///
/// Execute one conversion task end to end
///
/// Downloads the source CSV, runs the conversion core, uploads the XES
/// document and records the task status: `Processing` while running, then
/// `Done` with a signed URL or `Failed` with the error message. The core call
/// itself is atomic; retry policy belongs to the caller.
///
pub fn run_convert_task(
    blob_store: &impl BlobStore,
    status_store: &impl TaskStatusStore,
    task: &ConvertTask,
    options: &ConvertOptions,
) -> Result<String, PortError> {
    status_store.set(task.task_id, TaskStatus::Processing);
    match execute(blob_store, task, options) {
        Ok(url) => {
            status_store.set(task.task_id, TaskStatus::Done { url: url.clone() });
            Ok(url)
        }
        Err(e) => {
            status_store.set(
                task.task_id,
                TaskStatus::Failed {
                    message: e.to_string(),
                },
            );
            Err(e)
        }
    }
}

fn execute(
    blob_store: &impl BlobStore,
    task: &ConvertTask,
    options: &ConvertOptions,
) -> Result<String, PortError> {
    let file_name = task.url.rsplit('/').next().unwrap_or(&task.url);
    let local_path = blob_store.download(&task.url, file_name)?;
    let data = std::fs::read(&local_path)?;

    let mut options = options.clone();
    options.delimiter = task.delimiter;
    let log = convert_csv_to_log(&data, &task.mapping, &options)
        .map_err(|e| PortError::Conversion(e.to_string()))?;

    let mut xes_bytes: Vec<u8> = Vec::new();
    export_xes_event_log(&mut xes_bytes, &log).map_err(|e| PortError::Io(e.to_string()))?;

    let upload_name = format!(
        "{}.xes",
        file_name.split('.').next().unwrap_or(file_name)
    );
    blob_store.upload_bytes(&upload_name, &xes_bytes, XES_CONTENT_TYPE)?;
    blob_store.signed_url(&upload_name, XES_CONTENT_TYPE, "GET", SIGNED_URL_TTL)
}
