#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

///
/// XES event log structures and XML serialization
///
pub mod event_log {
    /// Standard attribute keys and XES schema constants
    pub mod constants;
    /// [`EventLog`] struct and sub-structs
    pub mod event_log_struct;
    /// XES Export
    pub mod export_xes;
    /// Timestamp parsing and ISO 8601 normalization
    pub mod timestamp;

    pub use event_log_struct::{
        Attribute, AttributeValue, Attributes, AttributesExt, Event, EventLog,
        EventLogClassifier, EventLogExtension, Trace,
    };
    pub use timestamp::Timestamp;
}

///
/// CSV to XES conversion pipeline
///
pub mod convert {
    /// Assembly of the [`EventLog`](crate::EventLog) document from grouped event records
    pub mod assembler;
    /// Column mapping (raw CSV row to canonical event-field record)
    pub mod mapping;
    /// Conversion entry point, options and errors
    pub mod pipeline;
    /// Grouping of event records into per-case traces
    pub mod trace_grouper;

    pub use mapping::{ColumnMapping, EventRecord, FieldMapping};
    pub use pipeline::{convert_csv_to_log, ConversionError, ConvertOptions, CsvEncoding};
    pub use trace_grouper::TraceGrouper;

    #[cfg(test)]
    mod tests;
}

///
/// Collaborator interfaces (blob storage, task status, message publishing)
///
/// The conversion core itself is decoupled from all of these; they exist for
/// the orchestration layer wrapping the core.
///
pub mod ports {
    /// Interface traits and message/status types
    pub mod interfaces;
    /// In-memory implementations (tests and single-process deployments)
    pub mod memory;
    /// Queue-task orchestration around the conversion core
    pub mod task;

    pub use interfaces::{
        BlobStore, ConvertTask, PortError, Publisher, TaskStatus, TaskStatusStore,
    };
}

#[doc(inline)]
pub use convert::pipeline::{convert_csv_to_log, ConversionError, ConvertOptions};

#[doc(inline)]
pub use event_log::export_xes::{
    export_xes_event_log, export_xes_event_log_to_file, export_xes_event_log_to_file_path,
};

#[doc(inline)]
pub use event_log::EventLog;
