use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bps_core::Timestamp;

/// One row of the event log discovery was trained on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingEvent {
    pub case_id:  String,
    pub resource: String,
    pub activity: String,
    pub start:    Timestamp,
    pub end:      Timestamp,
}

/// Start instant of every training case, in time order.
pub fn case_starts(events: &[TrainingEvent]) -> Vec<Timestamp> {
    let mut first: BTreeMap<&str, Timestamp> = BTreeMap::new();
    for ev in events {
        first
            .entry(ev.case_id.as_str())
            .and_modify(|t| *t = (*t).min(ev.start))
            .or_insert(ev.start);
    }
    let mut starts: Vec<Timestamp> = first.into_values().collect();
    starts.sort_unstable();
    starts
}

/// Earliest training case start, the default simulation start time.
pub fn earliest_start(events: &[TrainingEvent]) -> Option<Timestamp> {
    events.iter().map(|ev| ev.start).min()
}
