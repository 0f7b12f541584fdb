use super::mapping::EventRecord;
use super::pipeline::ConvertOptions;
use crate::event_log::constants::{
    default_extensions, ACTIVITY_NAME, LIFECYCLE_TRANSITION_NAME, LOG_NAME, TIMESTAMP_NAME,
    TRACE_ID_NAME,
};
use crate::event_log::event_log_struct::{
    Attribute, Attributes, Event, EventLog, EventLogClassifier, EventLogExtension, Trace,
};

///
/// Assembles the final [`EventLog`] document from grouped event records
///
/// [`LogAssembler::build`] consumes the assembler, so a document can never be
/// built twice from the same configuration state.
///
#[derive(Debug)]
pub struct LogAssembler {
    use_default_extensions: bool,
    extensions: Vec<EventLogExtension>,
    classifiers: Vec<EventLogClassifier>,
    global_trace_attrs: Attributes,
    global_event_attrs: Attributes,
    log_attrs: Attributes,
}

impl LogAssembler {
    /// Create an assembler from conversion options
    pub fn new(options: &ConvertOptions) -> Self {
        Self {
            use_default_extensions: options.use_default_extensions,
            extensions: options.extensions.clone(),
            classifiers: options.classifiers.clone(),
            global_trace_attrs: options.global_trace_attrs.clone(),
            global_event_attrs: options.global_event_attrs.clone(),
            log_attrs: options.log_attrs.clone(),
        }
    }

    ///
    /// Build the [`EventLog`] from the trace grouper's output
    ///
    /// An empty classifier list degrades downstream analysis tools but does
    /// not invalidate the document; it only triggers a warning.
    ///
    pub fn build(self, groups: Vec<(String, Vec<EventRecord>)>) -> EventLog {
        if self.classifiers.is_empty() {
            eprintln!("XES warning: no classifiers configured");
        }

        let mut extensions = Vec::new();
        if self.use_default_extensions {
            extensions.extend(default_extensions());
        }
        extensions.extend(self.extensions);

        let mut attributes = self.log_attrs;
        attributes.push(Attribute::string(ACTIVITY_NAME, LOG_NAME));

        let traces = groups
            .into_iter()
            .map(|(case_id, events)| build_trace(case_id, events))
            .collect();

        EventLog {
            extensions,
            global_trace_attrs: self.global_trace_attrs,
            global_event_attrs: self.global_event_attrs,
            classifiers: self.classifiers,
            attributes,
            traces,
        }
    }
}

fn build_trace(case_id: String, events: Vec<EventRecord>) -> Trace {
    Trace {
        attributes: vec![Attribute::string(TRACE_ID_NAME, case_id)],
        events: events.into_iter().map(build_event).collect(),
    }
}

/// Attribute order: name, timestamp, then mapped fields, then extras
fn build_event(record: EventRecord) -> Event {
    let mut attributes = Vec::with_capacity(3 + record.additional.len() + record.extras.len());
    attributes.push(Attribute::string(ACTIVITY_NAME, record.activity));
    attributes.push(Attribute::date(TIMESTAMP_NAME, record.timestamp));
    attributes.push(Attribute::string(
        LIFECYCLE_TRANSITION_NAME,
        record.lifecycle,
    ));
    for (key, value) in record.additional {
        attributes.push(Attribute::string(key, value));
    }
    for (key, value) in record.extras {
        attributes.push(Attribute::string(key, value));
    }
    Event { attributes }
}
