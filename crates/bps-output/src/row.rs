//! Plain data row written by output backends.

use chrono::SecondsFormat;

use bps_core::Timestamp;
use bps_sim::SimEvent;

/// Column names, in order.
pub const EVENT_LOG_HEADER: [&str; 7] = [
    "case_id",
    "agent",
    "resource",
    "activity",
    "start_timestamp",
    "end_timestamp",
    "kind",
];

/// One event log row, already rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub case_id:         u32,
    /// Agent id, empty on `incomplete` and `waiting` rows.
    pub agent:           String,
    pub resource:        String,
    pub activity:        String,
    /// RFC 3339, millisecond precision, UTC.
    pub start_timestamp: String,
    pub end_timestamp:   String,
    pub kind:            &'static str,
}

impl EventRow {
    pub fn fields(&self) -> [String; 7] {
        [
            self.case_id.to_string(),
            self.agent.clone(),
            self.resource.clone(),
            self.activity.clone(),
            self.start_timestamp.clone(),
            self.end_timestamp.clone(),
            self.kind.to_owned(),
        ]
    }
}

impl From<&SimEvent> for EventRow {
    fn from(ev: &SimEvent) -> Self {
        Self {
            case_id:         ev.case_id.0,
            agent:           ev.agent.map(|a| a.0.to_string()).unwrap_or_default(),
            resource:        ev.resource.clone(),
            activity:        ev.activity.clone(),
            start_timestamp: format_timestamp(&ev.start),
            end_timestamp:   format_timestamp(&ev.end),
            kind:            ev.kind.as_str(),
        }
    }
}

pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
