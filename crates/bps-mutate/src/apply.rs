//! Edit application.
//!
//! # Failure semantics
//!
//! Every edit resolves and checks everything it references before its first
//! write, so a failing edit leaves the configuration exactly as it found it.
//! A batch is applied in caller order and is *not* transactional: when edit
//! `k` fails, edits `0..k` stay applied and [`apply_patch`] reports `k`.

use std::collections::BTreeSet;

use tracing::{debug, info};

use bps_calendar::Interval;
use bps_core::{ActivityId, AgentId, Timestamp, Weekday};
use bps_model::{
    Configuration, DurationModel, Handoff, InterArrivalKind, ModelError, TableKind,
    TransitionKey, TransitionTable, check_override,
};

use crate::{
    Edit, MutateError, MutateResult, Patch, PopulationChange, StepRef, TransitionEntry,
};

/// Apply every edit of `patch` in order.  Returns the number applied.
pub fn apply_patch(config: &mut Configuration, patch: &Patch) -> MutateResult<usize> {
    patch.check_version()?;
    for (index, edit) in patch.edits.iter().enumerate() {
        apply_edit(config, edit).map_err(|source| MutateError::Edit {
            index,
            op: edit.op(),
            source: Box::new(source),
        })?;
    }
    info!(edits = patch.edits.len(), "patch applied");
    Ok(patch.edits.len())
}

/// Apply one edit.  On error the configuration is unchanged.
pub fn apply_edit(config: &mut Configuration, edit: &Edit) -> MutateResult<()> {
    match edit {
        Edit::SetStartTime { timestamp } => set_start_time(config, *timestamp),
        Edit::SetInterArrivalDistribution { kind } => set_inter_arrival(config, *kind),
        Edit::SetCaseCount { count } => set_case_count(config, *count),
        Edit::SetRepetitions { count } => set_repetitions(config, *count),
        Edit::OverrideActivityDuration { activity, seconds } => {
            override_activity(config, activity, *seconds)
        }
        Edit::OverrideAgentActivityDuration { agent, activity, seconds } => {
            override_agent_activity(config, *agent, activity, *seconds)
        }
        Edit::SetAgentSchedule { agent, weekday, intervals } => {
            set_schedule(config, *agent, *weekday, intervals)
        }
        Edit::MergeTransitionProbabilities { table, entries } => {
            merge_probabilities(config, *table, entries)
        }
        Edit::UpdateAgentPopulation { changes } => update_population(config, changes),
        Edit::RenameAgent { agent, name } => rename(config, *agent, name),
    }?;
    debug!(op = edit.op(), "edit applied");
    Ok(())
}

// ── Arrivals and run settings ─────────────────────────────────────────────────

fn set_start_time(config: &mut Configuration, start: Timestamp) -> MutateResult<()> {
    let count = series_len(config);
    config.rederive_arrivals(start, count);
    Ok(())
}

fn set_inter_arrival(config: &mut Configuration, kind: InterArrivalKind) -> MutateResult<()> {
    let start = current_start(config)?;
    let count = series_len(config);
    config.arrivals.model = config.arrivals.model.with_kind(kind);
    config.rederive_arrivals(start, count);
    Ok(())
}

/// Length a re-derived series keeps: the current one, or the case count
/// when there is no series yet.
fn series_len(config: &Configuration) -> usize {
    match config.arrivals.len() {
        0 => config.settings.case_count as usize,
        n => n,
    }
}

fn set_case_count(config: &mut Configuration, count: u32) -> MutateResult<()> {
    if count == 0 {
        return Err(MutateError::Capacity("case count must be at least 1".into()));
    }
    let start = current_start(config)?;
    config.settings.case_count = count;
    config.rederive_arrivals(start, count as usize);
    Ok(())
}

fn set_repetitions(config: &mut Configuration, count: u32) -> MutateResult<()> {
    if count == 0 {
        return Err(MutateError::Capacity("repetitions must be at least 1".into()));
    }
    config.settings.repetitions = count;
    Ok(())
}

fn current_start(config: &Configuration) -> MutateResult<Timestamp> {
    config
        .start_time()
        .ok_or_else(|| ModelError::Config("configuration has no start time".into()).into())
}

// ── Durations ─────────────────────────────────────────────────────────────────

fn override_activity(config: &mut Configuration, activity: &str, seconds: f64) -> MutateResult<()> {
    let activity = config.activities.require(activity)?;
    check_override(seconds)?;

    let fixed = DurationModel::fixed(seconds);
    let ids: Vec<AgentId> = config.performers(activity);
    for id in ids {
        if let Some(agent) = config.agents.get_mut(id) {
            agent.durations.insert(activity, fixed.clone());
        }
    }
    for role in config.roles.values_mut() {
        if let Some(model) = role.durations.get_mut(&activity) {
            *model = fixed.clone();
        }
    }
    config.overrides.activity.insert(activity, seconds);
    Ok(())
}

fn override_agent_activity(
    config: &mut Configuration,
    agent: AgentId,
    activity: &str,
    seconds: f64,
) -> MutateResult<()> {
    let activity = config.activities.require(activity)?;
    check_override(seconds)?;

    let record = config.agents.require(agent)?;
    // A mapping added to an original is mirrored onto its duplicates so the
    // pool keeps covering the original's activities.
    let mirror: Vec<AgentId> = if record.performs(activity) || record.is_duplicate() {
        Vec::new()
    } else {
        config.duplicate_pool(agent).into_iter().filter(|&id| id != agent).collect()
    };

    let fixed = DurationModel::fixed(seconds);
    for id in mirror {
        if let Some(dup) = config.agents.get_mut(id) {
            dup.durations.entry(activity).or_insert_with(|| fixed.clone());
        }
    }
    config.agents.require_mut(agent)?.durations.insert(activity, fixed);
    config.overrides.agent_activity.insert((agent, activity), seconds);
    Ok(())
}

// ── Calendars ─────────────────────────────────────────────────────────────────

fn set_schedule(
    config: &mut Configuration,
    agent: AgentId,
    weekday: Weekday,
    intervals: &[Interval],
) -> MutateResult<()> {
    let record = config.agents.require_mut(agent)?;
    record.calendar.replace_day(weekday, intervals.to_vec())?;
    Ok(())
}

// ── Transition tables ─────────────────────────────────────────────────────────

fn merge_probabilities(
    config: &mut Configuration,
    kind: TableKind,
    entries: &[TransitionEntry],
) -> MutateResult<()> {
    let mut overlay = TransitionTable::new();
    for entry in entries {
        let key = match &entry.after {
            None => TransitionKey::Start,
            Some(step) => {
                let (agent, activity) = resolve(config, step)?;
                TransitionKey::after(agent, activity)
            }
        };
        let (agent, activity) = resolve(config, &entry.to)?;
        overlay.set(key, Handoff::new(agent, activity), entry.probability);
    }

    let current = config.table(kind);
    let mut merged = current.clone();
    merged.merge(&overlay);

    // Rows this merge creates for an original are mirrored onto its
    // duplicates so every pool member keeps a full row set.
    let created: Vec<TransitionKey> = overlay
        .rows()
        .map(|(key, _)| *key)
        .filter(|key| current.get(key).is_none())
        .collect();
    let origins = config.origin_map();
    for key in created {
        let TransitionKey::After { agent, activity } = key else {
            continue;
        };
        let Some(row) = merged.get(&key).cloned() else {
            continue;
        };
        for (&dup, _) in origins.iter().filter(|&(_, &origin)| origin == agent) {
            let dup_key = TransitionKey::after(dup, activity);
            if merged.get(&dup_key).is_none() {
                *merged.row_mut(dup_key) = row.clone();
            }
        }
    }

    for (key, _) in overlay.rows() {
        if let Some(row) = merged.get(key) {
            row.check(key)?;
        }
    }

    *config.table_mut(kind) = merged;
    Ok(())
}

fn resolve(config: &Configuration, step: &StepRef) -> MutateResult<(AgentId, ActivityId)> {
    config.agents.check(step.agent)?;
    let activity = config.activities.require(&step.activity)?;
    Ok((step.agent, activity))
}

// ── Population ────────────────────────────────────────────────────────────────

fn update_population(config: &mut Configuration, changes: &[PopulationChange]) -> MutateResult<()> {
    for change in changes {
        config.agents.check(change.agent)?;
    }
    let mut seen = BTreeSet::new();
    if let Some(dup) = changes.iter().find(|c| !seen.insert(c.agent)) {
        return Err(MutateError::Model(ModelError::Config(format!(
            "agent {} listed twice in one population change",
            dup.agent
        ))));
    }

    for change in changes {
        if change.count == 0 {
            config.deactivated.insert(change.agent);
            info!(agent = %change.agent, "agent deactivated");
            continue;
        }
        config.deactivated.remove(&change.agent);
        for _ in 1..change.count {
            config.clone_agent(change.agent)?;
        }
        if change.count > 1 {
            info!(agent = %change.agent, added = change.count - 1, "agent duplicated");
        }
    }
    Ok(())
}

fn rename(config: &mut Configuration, agent: AgentId, name: &str) -> MutateResult<()> {
    config.agents.require_mut(agent)?.name = name.to_owned();
    Ok(())
}
