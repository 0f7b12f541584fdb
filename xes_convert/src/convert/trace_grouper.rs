use std::collections::HashMap;

use super::mapping::EventRecord;

///
/// Buffers event records into per-case groups, preserving order
///
/// Cases appear in first-seen order; events within a case keep their original
/// row-encounter order. The grouper requires a full pass over the input before
/// any trace can be emitted, since later rows may still belong to an earlier
/// case; [`TraceGrouper::into_groups`] therefore consumes the grouper.
///
#[derive(Debug, Default)]
pub struct TraceGrouper {
    index: HashMap<String, usize>,
    groups: Vec<(String, Vec<EventRecord>)>,
}

impl TraceGrouper {
    /// Create an empty grouper
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event record to its case, creating the case on first sight
    pub fn push(&mut self, case_id: String, event: EventRecord) {
        match self.index.get(&case_id) {
            Some(&i) => self.groups[i].1.push(event),
            None => {
                self.index.insert(case_id.clone(), self.groups.len());
                self.groups.push((case_id, vec![event]));
            }
        }
    }

    /// Number of distinct cases seen so far
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no case has been seen yet
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Finish grouping and return `(case id, events)` pairs in case-ID-first-seen order
    pub fn into_groups(self) -> Vec<(String, Vec<EventRecord>)> {
        self.groups
    }
}
