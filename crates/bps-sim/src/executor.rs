//! Resource executor: places one activity on an agent's calendar.

use bps_core::{ActivityId, AgentId, SimRng, Timestamp, duration_from_secs};
use bps_model::Configuration;

use crate::{Case, RecordKind, SimEvent};

/// Per-run "agent is busy until" instants.
#[cfg(feature = "fx-hash")]
pub type BusyMap = rustc_hash::FxHashMap<AgentId, Timestamp>;
/// Per-run "agent is busy until" instants.
#[cfg(not(feature = "fx-hash"))]
pub type BusyMap = std::collections::HashMap<AgentId, Timestamp>;

/// Execute `activity` for `case` on the candidate that can start first and
/// append the resulting rows to `log`.
///
/// The activity's extraneous delay (if the configuration has one) is sampled
/// once and pushed onto the case clock before any calendar lookup.  For each
/// candidate, `start = next_available(max(case.now + delay, busy_until))`.
/// The earliest start wins; ties go to the earlier candidate.  The activity
/// then runs for one sampled duration, and the case clock and the agent's
/// busy-until instant move to its end.
///
/// A case's log always begins at its arrival: when the first activity starts
/// later, a `Waiting` row covering `[arrival, start)` precedes it.
///
/// Returns the chosen agent, or `None` (and changes nothing but the RNG)
/// when no candidate has a calendar slot or a duration model.
pub fn execute(
    candidates: &[AgentId],
    case:       &mut Case,
    activity:   ActivityId,
    config:     &Configuration,
    busy:       &mut BusyMap,
    rng:        &mut SimRng,
    log:        &mut Vec<SimEvent>,
) -> Option<AgentId> {
    let delay = config
        .delays
        .get(&activity)
        .map_or(0.0, |model| model.sample(rng));
    let released = case.now + duration_from_secs(delay);

    let mut best: Option<(Timestamp, AgentId)> = None;
    for &agent in candidates {
        let Some(record) = config.agents.get(agent) else {
            continue;
        };
        if config.duration_for(agent, activity).is_none() {
            continue;
        }
        let ready = busy.get(&agent).map_or(released, |&until| until.max(released));
        let Some(start) = record.calendar.next_available(&ready) else {
            continue;
        };
        if best.is_none_or(|(earliest, _)| start < earliest) {
            best = Some((start, agent));
        }
    }

    let (start, agent) = best?;
    let model = config.duration_for(agent, activity)?;
    let end = start + duration_from_secs(model.sample(rng));
    let label = config.activities.label(activity);

    if case.steps() == 0 && start > case.now {
        log.push(SimEvent {
            case_id:  case.id,
            agent:    None,
            resource: String::new(),
            activity: format!("Waiting for {label}"),
            start:    case.now,
            end:      start,
            kind:     RecordKind::Waiting,
        });
    }

    busy.insert(agent, end);
    case.record(agent, activity, end);

    log.push(SimEvent {
        case_id:  case.id,
        agent:    Some(agent),
        resource: config.agent_name(agent),
        activity: label,
        start,
        end,
        kind:     RecordKind::Activity,
    });
    Some(agent)
}
