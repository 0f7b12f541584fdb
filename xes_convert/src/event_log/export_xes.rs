use std::{
    fs::File,
    io::{BufWriter, Write},
};

use flate2::{write::GzEncoder, Compression};
use quick_xml::{events::BytesDecl, Writer};

use super::constants::{XES_FEATURES, XES_VERSION};
use super::event_log_struct::{Attribute, AttributeValue, EventLog};

const OK: Result<(), std::io::Error> = Ok(());

///
/// Export an [`EventLog`] as an XES XML document to a writer
///
/// The output starts with a UTF-8 XML declaration and is indented with two
/// spaces. Serialization is a pure function of the log tree: identical trees
/// always produce byte-identical output.
///
pub fn export_xes_event_log<W: Write>(
    writer: W,
    log: &EventLog,
) -> Result<(), quick_xml::Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);
    writer.write_event(quick_xml::events::Event::Decl(BytesDecl::new(
        "1.0",
        Some("UTF-8"),
        None,
    )))?;
    writer
        .create_element("log")
        .with_attributes(vec![
            ("xes.version", XES_VERSION),
            ("xes.features", XES_FEATURES),
            ("xmlns", "http://www.xes-standard.org/"),
        ])
        .write_inner_content(|w| {
            // Extensions
            for ext in &log.extensions {
                w.create_element("extension")
                    .with_attributes(vec![
                        ("name", ext.name.as_str()),
                        ("prefix", ext.prefix.as_str()),
                        ("uri", ext.uri.as_str()),
                    ])
                    .write_empty()?;
            }
            // Global trace attributes (only when declared)
            if !log.global_trace_attrs.is_empty() {
                w.create_element("global")
                    .with_attribute(("scope", "trace"))
                    .write_inner_content(|w| {
                        for a in &log.global_trace_attrs {
                            write_xes_attribute(w, a)?;
                        }
                        OK
                    })?;
            }
            // Global event attributes (only when declared)
            if !log.global_event_attrs.is_empty() {
                w.create_element("global")
                    .with_attribute(("scope", "event"))
                    .write_inner_content(|w| {
                        for a in &log.global_event_attrs {
                            write_xes_attribute(w, a)?;
                        }
                        OK
                    })?;
            }
            // Classifiers
            for cl in &log.classifiers {
                w.create_element("classifier")
                    .with_attributes(vec![
                        ("name", cl.name.as_str()),
                        ("keys", &serialize_classifier_keys(&cl.keys)),
                    ])
                    .write_empty()?;
            }
            // Top-level log attributes
            for a in &log.attributes {
                write_xes_attribute(w, a)?;
            }
            // Traces: attributes first, then events in original row order
            for t in &log.traces {
                w.create_element("trace").write_inner_content(|w| {
                    for a in &t.attributes {
                        write_xes_attribute(w, a)?;
                    }
                    for e in &t.events {
                        w.create_element("event").write_inner_content(|w| {
                            for a in &e.attributes {
                                write_xes_attribute(w, a)?;
                            }
                            OK
                        })?;
                    }
                    OK
                })?;
            }
            OK
        })?;
    Ok(())
}

fn write_xes_attribute<T>(w: &mut Writer<T>, a: &Attribute) -> Result<(), std::io::Error>
where
    T: Write,
{
    let (tag_name, value_opt): (&str, Option<String>) = match &a.value {
        AttributeValue::String(s) => ("string", Some(s.clone())),
        AttributeValue::Date(d) => ("date", Some(d.to_string())),
        AttributeValue::Int(i) => ("int", Some(i.to_string())),
        AttributeValue::Float(f) => ("float", Some(f.to_string())),
        AttributeValue::Boolean(b) => ("boolean", Some(b.to_string())),
        AttributeValue::Id(id) => ("id", Some(id.to_string())),
        AttributeValue::List(_) => ("list", None),
        AttributeValue::Container(_) => ("container", None),
    };
    let e = match value_opt {
        Some(value) => w
            .create_element(tag_name)
            .with_attributes(vec![("key", a.key.as_str()), ("value", &value)]),
        None => w
            .create_element(tag_name)
            .with_attribute(("key", a.key.as_str())),
    };
    match a.value.children() {
        Some(children) => {
            e.write_inner_content(|inner_w| {
                for attr in children {
                    write_xes_attribute(inner_w, attr)?;
                }
                OK
            })?;
        }
        None => {
            e.write_empty()?;
        }
    }
    OK
}

/// Export an [`EventLog`] to a [`File`]
pub fn export_xes_event_log_to_file(
    log: &EventLog,
    file: File,
    compress_gz: bool,
) -> Result<(), quick_xml::Error> {
    if compress_gz {
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::fast());
        return export_xes_event_log(BufWriter::new(encoder), log);
    }
    export_xes_event_log(BufWriter::new(file), log)
}

/// Export an [`EventLog`] to a filepath
///
/// Automatically selects gz-compression if the filepath ends with `.gz`
pub fn export_xes_event_log_to_file_path<P: AsRef<std::path::Path>>(
    log: &EventLog,
    path: P,
) -> Result<(), quick_xml::Error> {
    let is_gz = path
        .as_ref()
        .as_os_str()
        .to_str()
        .is_some_and(|p| p.ends_with(".gz"));
    let file = File::create(path)?;
    export_xes_event_log_to_file(log, file, is_gz)
}

///
/// Join classifier keys with spaces, single-quoting each key if any key
/// contains a space
///
fn serialize_classifier_keys(classifier_keys: &[String]) -> String {
    let should_quote = classifier_keys.iter().any(|key| key.contains(' '));
    if should_quote {
        classifier_keys
            .iter()
            .map(|k| format!("'{k}'"))
            .collect::<Vec<String>>()
            .join(" ")
    } else {
        classifier_keys.join(" ")
    }
}

#[cfg(test)]
mod export_xes_tests {
    use super::*;
    use crate::event_log::constants::default_extensions;
    use crate::event_log::event_log_struct::{Event, Trace};
    use crate::event_log::timestamp::parse_timestamp;
    use crate::event_log::EventLogClassifier;

    fn sample_log() -> EventLog {
        let ts = parse_timestamp("2020-01-01T00:00:00", None).unwrap();
        EventLog {
            extensions: default_extensions(),
            global_trace_attrs: vec![Attribute::string("concept:name", "UNKNOWN")],
            global_event_attrs: Vec::new(),
            classifiers: vec![EventLogClassifier::new("Event Name", vec!["concept:name"])],
            attributes: vec![Attribute::string("concept:name", "XES Event Log")],
            traces: vec![Trace {
                attributes: vec![Attribute::string("concept:name", "case-1")],
                events: vec![Event {
                    attributes: vec![
                        Attribute::string("concept:name", "A"),
                        Attribute::date("time:timestamp", ts),
                    ],
                }],
            }],
        }
    }

    fn export_to_string(log: &EventLog) -> String {
        let mut out: Vec<u8> = Vec::new();
        export_xes_event_log(&mut out, log).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_export_structure() {
        let xml = export_to_string(&sample_log());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<log xes.version=\"2.0\" xes.features=\"nested-attributes\""));
        assert!(xml.contains(
            "<extension name=\"Time\" prefix=\"time\" uri=\"http://www.xes-standard.org/time.xesext\"/>"
        ));
        assert!(xml.contains("<global scope=\"trace\">"));
        // No global event attributes declared, so no event-scope block
        assert!(!xml.contains("<global scope=\"event\">"));
        assert!(xml.contains("<classifier name=\"Event Name\" keys=\"concept:name\"/>"));
        assert!(xml.contains("<string key=\"concept:name\" value=\"case-1\"/>"));
        assert!(xml.contains("<date key=\"time:timestamp\" value=\"2020-01-01T00:00:00\"/>"));
    }

    #[test]
    fn test_element_order() {
        let xml = export_to_string(&sample_log());
        let ext = xml.find("<extension").unwrap();
        let global = xml.find("<global").unwrap();
        let classifier = xml.find("<classifier").unwrap();
        let log_attr = xml.find("value=\"XES Event Log\"").unwrap();
        let trace = xml.find("<trace>").unwrap();
        assert!(ext < global && global < classifier && classifier < log_attr && log_attr < trace);
    }

    #[test]
    fn test_export_is_deterministic() {
        let log = sample_log();
        let first = export_to_string(&log);
        let second = export_to_string(&log);
        assert_eq!(first, second);
    }

    #[test]
    fn test_nested_attributes() {
        let mut log = sample_log();
        log.attributes.push(Attribute::list(
            "meta",
            vec![
                Attribute::string("inner", "a"),
                Attribute::container("deeper", vec![Attribute::int("n", 7)]),
            ],
        ));
        let xml = export_to_string(&log);
        assert!(xml.contains("<list key=\"meta\">"));
        assert!(xml.contains("<container key=\"deeper\">"));
        assert!(xml.contains("<int key=\"n\" value=\"7\"/>"));
        // list/container elements never carry a value attribute
        assert!(!xml.contains("<list key=\"meta\" value"));
    }

    #[test]
    fn test_classifier_key_quoting() {
        assert_eq!(
            serialize_classifier_keys(&["concept:name".to_string(), "lifecycle:transition".to_string()]),
            "concept:name lifecycle:transition"
        );
        assert_eq!(
            serialize_classifier_keys(&["Event Name".to_string(), "org:resource".to_string()]),
            "'Event Name' 'org:resource'"
        );
    }
}
