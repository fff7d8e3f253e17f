//! The case-stepping loop for one repetition.

use std::collections::VecDeque;

use tracing::{debug, trace};

use bps_core::{CaseId, SimRng, Timestamp};
use bps_model::Configuration;

use crate::executor::{BusyMap, execute};
use crate::{Case, CaseState, DeadEnd, RecordKind, SimEvent, SimObserver, Step, TaskRouter};

/// Everything one repetition produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutput {
    pub repetition: u32,
    /// Event log rows in the order they were produced.
    pub log:        Vec<SimEvent>,
    /// Every case, in completion order.
    pub cases:      Vec<Case>,
}

impl RunOutput {
    pub fn failed_cases(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.state == CaseState::CompletedWithFailure)
            .count()
    }
}

/// Single-threaded scheduler for one repetition.
///
/// # Tick
///
/// ```text
/// ① Admit   — pop the next arrival if no case is active, or if the
///             furthest-advanced active case has reached it.
/// ② Order   — sort active cases by (current timestamp, case id).
/// ③ Advance — ask the router about the earliest case; execute, finish,
///             or failure-complete it.
/// ```
///
/// Exactly one case moves per tick.  The loop ends when no arrival is
/// pending and no case is active.
pub struct Scheduler<'c, R: TaskRouter> {
    config:     &'c Configuration,
    router:     &'c R,
    repetition: u32,
    max_steps:  u32,
    rng:        SimRng,
    pending:    VecDeque<Timestamp>,
    next_case:  u32,
    active:     Vec<Case>,
    completed:  Vec<Case>,
    busy:       BusyMap,
    log:        Vec<SimEvent>,
}

impl<'c, R: TaskRouter> Scheduler<'c, R> {
    /// Prepare repetition `repetition` of `case_count` cases.
    ///
    /// The run's RNG is stream `repetition` of `seed`.  The configuration's
    /// arrival series supplies the arrival instants; if it is shorter than
    /// `case_count` it is extended with gaps drawn from its model.
    pub fn new(
        config:     &'c Configuration,
        router:     &'c R,
        case_count: u32,
        seed:       u64,
        repetition: u32,
    ) -> Self {
        let mut rng = SimRng::stream(seed, u64::from(repetition));
        let count = case_count as usize;

        let mut arrivals = config.arrivals.clone();
        if arrivals.len() < count {
            arrivals.extend_to(count, &mut rng);
        }
        let pending: VecDeque<Timestamp> = arrivals.instants().iter().take(count).copied().collect();

        Self {
            config,
            router,
            repetition,
            max_steps: config.settings.max_steps_per_case,
            rng,
            pending,
            next_case: 0,
            active: Vec::new(),
            completed: Vec::with_capacity(count),
            busy: BusyMap::default(),
            log: Vec::new(),
        }
    }

    /// `true` while arrivals are pending or cases are active.
    pub fn has_work(&self) -> bool {
        !self.pending.is_empty() || !self.active.is_empty()
    }

    /// Run until every case is complete.
    pub fn run<O: SimObserver>(mut self, observer: &mut O) -> RunOutput {
        observer.on_run_start(self.repetition);
        while self.has_work() {
            self.tick(observer);
        }
        observer.on_run_end(self.repetition, self.completed.len());
        debug!(
            repetition = self.repetition,
            cases = self.completed.len(),
            events = self.log.len(),
            "repetition finished"
        );
        RunOutput { repetition: self.repetition, log: self.log, cases: self.completed }
    }

    /// Advance exactly one case.  No-op when there is no work.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) {
        // ── ① Admit ───────────────────────────────────────────────────────
        if let Some(&next) = self.pending.front() {
            let furthest = self.active.iter().map(|c| c.now).max();
            if furthest.is_none_or(|t| t >= next) {
                self.pending.pop_front();
                let case = Case::new(CaseId(self.next_case), next);
                self.next_case += 1;
                trace!(case = case.id.0, arrival = %next, "case admitted");
                observer.on_case_admitted(&case);
                self.active.push(case);
            }
        }

        // ── ② Order ───────────────────────────────────────────────────────
        if self.active.is_empty() {
            return;
        }
        self.active.sort_unstable_by_key(|c| (c.now, c.id));

        // ── ③ Advance ─────────────────────────────────────────────────────
        let case = &mut self.active[0];
        let step = if case.steps() >= self.max_steps as usize {
            Step::DeadEnd(DeadEnd::StepLimit(self.max_steps))
        } else {
            self.router.next_step(case, self.config, &mut self.rng)
        };

        let outcome = match step {
            Step::Finish => Some(CaseState::Completed),
            Step::DeadEnd(reason) => {
                let row = incomplete(case, reason);
                observer.on_event(&row);
                self.log.push(row);
                Some(CaseState::CompletedWithFailure)
            }
            Step::Perform { activity, candidates } => {
                let first_row = self.log.len();
                let placed = execute(
                    &candidates,
                    case,
                    activity,
                    self.config,
                    &mut self.busy,
                    &mut self.rng,
                    &mut self.log,
                );
                match placed {
                    Some(_) => {
                        for event in &self.log[first_row..] {
                            observer.on_event(event);
                        }
                        None
                    }
                    None => {
                        let row = incomplete(case, DeadEnd::NoEligibleAgent(activity));
                        observer.on_event(&row);
                        self.log.push(row);
                        Some(CaseState::CompletedWithFailure)
                    }
                }
            }
        };

        if let Some(state) = outcome {
            let mut case = self.active.swap_remove(0);
            case.state = state;
            observer.on_case_completed(&case);
            self.completed.push(case);
        }
    }
}

/// Marker row for a failure-completed case.
fn incomplete(case: &Case, reason: DeadEnd) -> SimEvent {
    debug!(case = case.id.0, %reason, "case dead-ended");
    SimEvent {
        case_id:  case.id,
        agent:    None,
        resource: String::new(),
        activity: format!("Could not finish case: {} ({reason})", case.id.0),
        start:    case.now,
        end:      case.now,
        kind:     RecordKind::Incomplete,
    }
}
