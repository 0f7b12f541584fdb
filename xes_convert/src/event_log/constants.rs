use super::event_log_struct::EventLogExtension;

/// Standard key for the activity name of an event (concept XES extension)
pub const ACTIVITY_NAME: &str = "concept:name";
/// Standard key for trace identities (i.e., case IDs)
///
/// Same key as [`ACTIVITY_NAME`] but scoped to traces.
pub const TRACE_ID_NAME: &str = "concept:name";
/// Standard key for the timestamp of an event (time XES extension)
pub const TIMESTAMP_NAME: &str = "time:timestamp";
/// Standard key for the lifecycle phase of an event (lifecycle XES extension)
pub const LIFECYCLE_TRANSITION_NAME: &str = "lifecycle:transition";
/// Lifecycle transition used when no lifecycle column is mapped
pub const LIFECYCLE_COMPLETE: &str = "complete";

/// XES schema version written to the `<log>` root element
pub const XES_VERSION: &str = "2.0";
/// XES features flag written to the `<log>` root element
pub const XES_FEATURES: &str = "nested-attributes";
/// Value of the fixed descriptive `concept:name` attribute of the log itself
pub const LOG_NAME: &str = "XES Event Log";

///
/// The three default XES extensions (Time, Lifecycle, Concept), in that order
///
/// Installed before any caller-supplied extensions when default extensions are
/// enabled (see [`ConvertOptions`](crate::ConvertOptions)).
///
pub fn default_extensions() -> Vec<EventLogExtension> {
    vec![
        EventLogExtension {
            name: "Time".to_string(),
            prefix: "time".to_string(),
            uri: "http://www.xes-standard.org/time.xesext".to_string(),
        },
        EventLogExtension {
            name: "Lifecycle".to_string(),
            prefix: "lifecycle".to_string(),
            uri: "http://www.xes-standard.org/lifecycle.xesext".to_string(),
        },
        EventLogExtension {
            name: "Concept".to_string(),
            prefix: "concept".to_string(),
            uri: "http://www.xes-standard.org/concept.xesext".to_string(),
        },
    ]
}
