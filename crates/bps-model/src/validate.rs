//! Referential and structural checks run before every simulation.

use bps_core::AgentId;

use crate::{
    Configuration, LookupError, ModelError, ModelResult, TableKind, TransitionKey, TransitionTable,
};

impl Configuration {
    /// Check every cross-reference in the configuration.
    ///
    /// - every agent id named by a table, override, or the deactivated set
    ///   exists, and so does every activity id;
    /// - every row's probabilities are in `[0, 1]` and sum to at most one;
    /// - every duration and delay model is well formed, every role an agent
    ///   names exists;
    /// - a duplicate's origin is an original, its durations cover the
    ///   origin's, and it has an outbound row for every outbound row of the
    ///   origin in both tables;
    /// - case count, repetitions and the step guard are non-zero and the
    ///   arrival series has an anchor.
    pub fn validate(&self) -> ModelResult<()> {
        self.validate_agents()?;
        for kind in [TableKind::Orchestrated, TableKind::Autonomous] {
            self.validate_table(self.table(kind))?;
        }
        self.validate_duplicates()?;
        self.validate_overrides()?;
        self.validate_settings()
    }

    fn validate_agents(&self) -> ModelResult<()> {
        for agent in self.agents.iter() {
            for (activity, model) in &agent.durations {
                self.activities.check(*activity)?;
                model.check()?;
            }
            if let Some(role) = &agent.role {
                if !self.roles.contains_key(role) {
                    return Err(LookupError::Role(role.clone()).into());
                }
            }
        }
        for role in self.roles.values() {
            for (activity, model) in &role.durations {
                self.activities.check(*activity)?;
                model.check()?;
            }
        }
        for &agent in &self.deactivated {
            self.agents.check(agent)?;
        }
        for (activity, model) in &self.delays {
            self.activities.check(*activity)?;
            if activity.is_terminal() {
                return Err(ModelError::Config("the end marker cannot carry a delay".into()));
            }
            model.check()?;
        }
        Ok(())
    }

    pub(crate) fn validate_table(&self, table: &TransitionTable) -> ModelResult<()> {
        for (key, dist) in table.rows() {
            if let TransitionKey::After { agent, activity } = key {
                self.agents.check(*agent)?;
                self.activities.check(*activity)?;
            }
            for (handoff, _) in dist.iter() {
                self.agents.check(handoff.agent)?;
                self.activities.check(handoff.activity)?;
            }
            dist.check(key)?;
        }
        Ok(())
    }

    fn validate_duplicates(&self) -> ModelResult<()> {
        for dup in self.agents.iter() {
            let Some(origin_id) = dup.origin else {
                continue;
            };
            let origin = self.agents.require(origin_id)?;
            if origin.is_duplicate() {
                return Err(ModelError::Config(format!(
                    "{} names duplicate {} as its origin",
                    dup.id, origin_id
                )));
            }
            if let Some(missing) = origin.durations.keys().find(|a| !dup.durations.contains_key(a)) {
                return Err(incomplete(dup.id, origin_id, format!("duration for {missing}")));
            }
            for kind in [TableKind::Orchestrated, TableKind::Autonomous] {
                let table = self.table(kind);
                for (activity, _) in table.outbound(origin_id) {
                    if table.get(&TransitionKey::after(dup.id, activity)).is_none() {
                        return Err(incomplete(
                            dup.id,
                            origin_id,
                            format!("{kind} row after {activity}"),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_overrides(&self) -> ModelResult<()> {
        for (&activity, &secs) in &self.overrides.activity {
            self.activities.check(activity)?;
            check_override(secs)?;
        }
        for (&(agent, activity), &secs) in &self.overrides.agent_activity {
            self.agents.check(agent)?;
            self.activities.check(activity)?;
            check_override(secs)?;
        }
        Ok(())
    }

    fn validate_settings(&self) -> ModelResult<()> {
        let s = &self.settings;
        if s.case_count == 0 {
            return Err(ModelError::Capacity("case count must be at least 1".into()));
        }
        if s.repetitions == 0 {
            return Err(ModelError::Capacity("repetitions must be at least 1".into()));
        }
        if s.max_steps_per_case == 0 {
            return Err(ModelError::Capacity("max steps per case must be at least 1".into()));
        }
        if self.arrivals.is_empty() {
            return Err(ModelError::Config("arrival series is empty".into()));
        }
        Ok(())
    }
}

fn incomplete(agent: AgentId, origin: AgentId, missing: String) -> ModelError {
    ModelError::IncompleteDuplicate { agent, origin, missing }
}

/// Override durations must be finite and non-negative.
pub fn check_override(secs: f64) -> ModelResult<()> {
    if secs.is_finite() && secs >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::Duration(format!("override of {secs} seconds")))
    }
}
