//! Fluent construction of a [`Configuration`].
//!
//! Discovery hands over a JSON document; tests and demos build one in code:
//!
//! ```rust
//! use bps_calendar::{Interval, ResourceCalendar};
//! use bps_core::{AgentId, WEEKDAYS};
//! use bps_model::{
//!     AgentRecord, ConfigurationBuilder, DurationModel, Handoff, InterArrivalModel,
//!     TableKind, TransitionKey,
//! };
//! use chrono::{TimeZone, Utc};
//!
//! let mut b = ConfigurationBuilder::new();
//! let review = b.activity("Review").unwrap();
//! let office = ResourceCalendar::weekly(
//!     &WEEKDAYS[..5],
//!     &[Interval::parse("09:00", "17:00").unwrap()],
//! ).unwrap();
//!
//! b.agent(AgentRecord::new(AgentId(0), "Ann", office)
//!         .with_duration(review, DurationModel::fixed(600.0)))
//!  .transition(TableKind::Autonomous, TransitionKey::Start, Handoff::new(AgentId(0), review), 1.0)
//!  .start(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
//!  .inter_arrival(InterArrivalModel::fixed_mean(3_600.0))
//!  .case_count(10);
//!
//! let config = b.build().unwrap();
//! assert_eq!(config.arrivals.len(), 10);
//! ```

use std::collections::BTreeMap;

use tracing::info;

use bps_core::{ActivityId, Timestamp};

use crate::training::earliest_start;
use crate::{
    ActivityRegistry, AgentTable, AgentRecord, ArrivalSeries, Configuration, DurationModel,
    DurationOverrides, Handoff, InterArrivalKind, InterArrivalModel, ModelError, ModelResult, RoleRecord,
    RoutingMode, RunSettings, TableKind, TrainingEvent, TransitionKey, TransitionTable,
};

/// Inter-arrival model used when neither an explicit model nor enough
/// training cases are available: one case per hour.
const DEFAULT_GAP_SECS: f64 = 3_600.0;

#[derive(Default)]
pub struct ConfigurationBuilder {
    activities:    ActivityRegistry,
    agents:        Vec<AgentRecord>,
    roles:         BTreeMap<String, RoleRecord>,
    orchestrated:  TransitionTable,
    autonomous:    TransitionTable,
    routing:       RoutingMode,
    training:      Vec<TrainingEvent>,
    settings:      RunSettings,
    start:         Option<Timestamp>,
    inter_arrival: Option<InterArrivalModel>,
    delays:        BTreeMap<ActivityId, DurationModel>,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or look up) an activity name.
    pub fn activity(&mut self, name: &str) -> ModelResult<ActivityId> {
        self.activities.intern(name)
    }

    pub fn agent(&mut self, record: AgentRecord) -> &mut Self {
        self.agents.push(record);
        self
    }

    pub fn role(&mut self, name: impl Into<String>, role: RoleRecord) -> &mut Self {
        self.roles.insert(name.into(), role);
        self
    }

    pub fn transition(
        &mut self,
        kind: TableKind,
        key: TransitionKey,
        handoff: Handoff,
        probability: f64,
    ) -> &mut Self {
        match kind {
            TableKind::Orchestrated => self.orchestrated.set(key, handoff, probability),
            TableKind::Autonomous => self.autonomous.set(key, handoff, probability),
        }
        self
    }

    /// Same entry in both tables.
    pub fn handoff(&mut self, key: TransitionKey, handoff: Handoff, probability: f64) -> &mut Self {
        self.orchestrated.set(key, handoff, probability);
        self.autonomous.set(key, handoff, probability);
        self
    }

    /// Extraneous delay sampled before every execution of `activity`.
    pub fn delay(&mut self, activity: ActivityId, model: DurationModel) -> &mut Self {
        self.delays.insert(activity, model);
        self
    }

    pub fn routing(&mut self, mode: RoutingMode) -> &mut Self {
        self.routing = mode;
        self
    }

    pub fn training(&mut self, events: Vec<TrainingEvent>) -> &mut Self {
        self.training = events;
        self
    }

    pub fn settings(&mut self, settings: RunSettings) -> &mut Self {
        self.settings = settings;
        self
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.settings.seed = seed;
        self
    }

    pub fn case_count(&mut self, count: u32) -> &mut Self {
        self.settings.case_count = count;
        self
    }

    pub fn repetitions(&mut self, count: u32) -> &mut Self {
        self.settings.repetitions = count;
        self
    }

    /// First arrival.  Defaults to the earliest training case start.
    pub fn start(&mut self, at: Timestamp) -> &mut Self {
        self.start = Some(at);
        self
    }

    /// Defaults to a normal model fitted on the training data.
    pub fn inter_arrival(&mut self, model: InterArrivalModel) -> &mut Self {
        self.inter_arrival = Some(model);
        self
    }

    /// Derive the arrival series and validate the result.
    pub fn build(self) -> ModelResult<Configuration> {
        let start = self
            .start
            .or_else(|| earliest_start(&self.training))
            .ok_or_else(|| ModelError::Config("no start time and no training data".into()))?;
        let model = self
            .inter_arrival
            .or_else(|| InterArrivalModel::fit(&self.training, InterArrivalKind::Normal))
            .unwrap_or_else(|| InterArrivalModel::fixed_mean(DEFAULT_GAP_SECS));

        let mut config = Configuration {
            activities:   self.activities,
            agents:       AgentTable::try_from(self.agents)?,
            roles:        self.roles,
            orchestrated: self.orchestrated,
            autonomous:   self.autonomous,
            routing:      self.routing,
            arrivals:     ArrivalSeries::empty(model),
            training:     self.training,
            settings:     self.settings,
            deactivated:  Default::default(),
            overrides:    DurationOverrides::default(),
            delays:       self.delays,
        };
        config.rederive_arrivals(start, config.settings.case_count as usize);
        config.validate()?;

        info!(
            agents = config.agents.len(),
            activities = config.activities.len(),
            cases = config.settings.case_count,
            "configuration built"
        );
        Ok(config)
    }
}
