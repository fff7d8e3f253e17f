//! Unit tests for bps-sim.

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};

use bps_calendar::{Interval, ResourceCalendar};
use bps_core::{ActivityId, AgentId, CaseId, SimRng, Timestamp, WEEKDAYS};
use bps_model::{
    AgentRecord, Configuration, ConfigurationBuilder, DistributionKind, DurationModel, Handoff,
    InterArrivalModel, RoleRecord, RoutingMode, TransitionKey,
};
use bps_mutate::{Edit, PopulationChange, apply_edit};

use crate::{
    BusyMap, Case, CaseState, DeadEnd, NoopObserver, ProbabilisticRouter, RecordKind, RunOutput,
    Scheduler, SimBuilder, SimError, SimEvent, SimObserver, Step, TaskRouter, execute,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const INTAKE: ActivityId = ActivityId(1);
const REVIEW: ActivityId = ActivityId(2);
const APPROVE: ActivityId = ActivityId(3);

const ANN: AgentId = AgentId(0);
const BOB: AgentId = AgentId(1);
const CAT: AgentId = AgentId(2);
const DAN: AgentId = AgentId(3);

/// 2024-01-01 was a Monday.
fn at(day: u32, h: u32, m: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, day, h, m, 0).unwrap()
}

fn office() -> ResourceCalendar {
    ResourceCalendar::weekly(&WEEKDAYS[..5], &[Interval::parse("09:00", "17:00").unwrap()]).unwrap()
}

fn builder() -> ConfigurationBuilder {
    let mut b = ConfigurationBuilder::new();
    b.activity("Intake").unwrap();
    b.activity("Review").unwrap();
    b.activity("Approve").unwrap();
    b
}

/// Intake (Ann or Dan, even odds) → Review (Bob, role fallback) → Approve
/// (Cat) → end.  Intake durations are random; the rest are fixed.
fn fixture(gap_secs: f64, cases: u32) -> Configuration {
    let intake = DurationModel::new(DistributionKind::Normal, 600.0, 10_000.0, 120.0, 1_200.0).unwrap();
    let mut clerk = RoleRecord::default();
    clerk.durations.insert(REVIEW, DurationModel::fixed(1_800.0));

    let mut b = builder();
    b.agent(AgentRecord::new(ANN, "Ann", office()).with_duration(INTAKE, intake.clone()))
        .agent(AgentRecord::new(BOB, "Bob", office()).with_role("clerk"))
        .agent(AgentRecord::new(CAT, "Cat", office()).with_duration(APPROVE, DurationModel::fixed(900.0)))
        .agent(AgentRecord::new(DAN, "Dan", office()).with_duration(INTAKE, intake))
        .role("clerk", clerk)
        .handoff(TransitionKey::Start, Handoff::new(ANN, INTAKE), 0.5)
        .handoff(TransitionKey::Start, Handoff::new(DAN, INTAKE), 0.5)
        .handoff(TransitionKey::after(ANN, INTAKE), Handoff::new(BOB, REVIEW), 1.0)
        .handoff(TransitionKey::after(DAN, INTAKE), Handoff::new(BOB, REVIEW), 1.0)
        .handoff(TransitionKey::after(BOB, REVIEW), Handoff::new(CAT, APPROVE), 1.0)
        .handoff(TransitionKey::after(CAT, APPROVE), Handoff::new(CAT, ActivityId::TERMINAL), 1.0)
        .start(at(1, 9, 0))
        .inter_arrival(InterArrivalModel::fixed_mean(gap_secs))
        .case_count(cases)
        .seed(42);
    b.build().unwrap()
}

fn run_once(config: &Configuration) -> RunOutput {
    SimBuilder::new(config).repetitions(1).build().unwrap().run().remove(0)
}

fn rows_of(output: &RunOutput, agent: AgentId) -> Vec<&SimEvent> {
    output.log.iter().filter(|e| e.agent == Some(agent)).collect()
}

#[derive(Default)]
struct Counter {
    admitted:  usize,
    events:    usize,
    completed: usize,
    runs:      Vec<(u32, usize)>,
}

impl SimObserver for Counter {
    fn on_case_admitted(&mut self, _case: &Case) {
        self.admitted += 1;
    }
    fn on_event(&mut self, _event: &SimEvent) {
        self.events += 1;
    }
    fn on_case_completed(&mut self, case: &Case) {
        assert!(!case.is_active());
        self.completed += 1;
    }
    fn on_run_end(&mut self, repetition: u32, cases: usize) {
        self.runs.push((repetition, cases));
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use super::*;

    fn after(agent: AgentId, activity: ActivityId) -> Case {
        let mut case = Case::new(CaseId(0), at(1, 9, 0));
        case.record(agent, activity, at(1, 9, 30));
        case
    }

    #[test]
    fn fresh_case_reads_start_row() {
        let config = fixture(600.0, 5);
        let mut rng = SimRng::new(1);
        let case = Case::new(CaseId(0), at(1, 9, 0));
        match ProbabilisticRouter.next_step(&case, &config, &mut rng) {
            Step::Perform { activity, candidates } => {
                assert_eq!(activity, INTAKE);
                assert!(candidates == vec![ANN] || candidates == vec![DAN]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn terminal_handoff_finishes() {
        let config = fixture(600.0, 5);
        let step = ProbabilisticRouter.next_step(&after(CAT, APPROVE), &config, &mut SimRng::new(1));
        assert_eq!(step, Step::Finish);
    }

    #[test]
    fn residual_mass_finishes() {
        let mut config = fixture(600.0, 5);
        config.autonomous.set(TransitionKey::after(CAT, APPROVE), Handoff::new(CAT, ActivityId::TERMINAL), 0.0);
        let step = ProbabilisticRouter.next_step(&after(CAT, APPROVE), &config, &mut SimRng::new(1));
        assert_eq!(step, Step::Finish);
    }

    #[test]
    fn missing_row_is_no_transition() {
        let config = fixture(600.0, 5);
        let step = ProbabilisticRouter.next_step(&after(BOB, APPROVE), &config, &mut SimRng::new(1));
        assert_eq!(step, Step::DeadEnd(DeadEnd::NoTransition));
    }

    #[test]
    fn autonomous_candidates_are_duplicate_pool() {
        let mut config = fixture(600.0, 5);
        let dup = config.clone_agent(BOB).unwrap();
        let step = ProbabilisticRouter.next_step(&after(ANN, INTAKE), &config, &mut SimRng::new(1));
        assert_eq!(step, Step::Perform { activity: REVIEW, candidates: vec![BOB, dup] });
    }

    #[test]
    fn orchestrated_candidates_are_all_performers() {
        let mut config = fixture(600.0, 5);
        config.routing = RoutingMode::Orchestrated;
        config.orchestrated.set(TransitionKey::Start, Handoff::new(ANN, INTAKE), 0.0);
        config.orchestrated.set(TransitionKey::Start, Handoff::new(DAN, INTAKE), 1.0);
        let case = Case::new(CaseId(0), at(1, 9, 0));
        let step = ProbabilisticRouter.next_step(&case, &config, &mut SimRng::new(1));
        assert_eq!(step, Step::Perform { activity: INTAKE, candidates: vec![DAN, ANN] });
    }

    #[test]
    fn ineligible_candidates_dropped() {
        let mut config = fixture(600.0, 5);
        config.deactivated.insert(BOB);
        let step = ProbabilisticRouter.next_step(&after(ANN, INTAKE), &config, &mut SimRng::new(1));
        assert_eq!(step, Step::DeadEnd(DeadEnd::NoEligibleAgent(REVIEW)));
    }
}

// ── Executor ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod executor {
    use super::*;

    /// Run `execute` with a fresh RNG and return the chosen agent and rows.
    fn place(
        candidates: &[AgentId],
        case: &mut Case,
        activity: ActivityId,
        config: &Configuration,
        busy: &mut BusyMap,
    ) -> (Option<AgentId>, Vec<SimEvent>) {
        let mut log = Vec::new();
        let agent = execute(candidates, case, activity, config, busy, &mut SimRng::new(3), &mut log);
        (agent, log)
    }

    /// A case that has already executed one step, now at `now`.
    fn underway(now: Timestamp) -> Case {
        let mut case = Case::new(CaseId(0), now);
        case.record(ANN, INTAKE, now);
        case
    }

    #[test]
    fn earliest_available_candidate_wins() {
        let config = fixture(600.0, 5);
        let mut busy = BusyMap::default();
        busy.insert(ANN, at(1, 10, 0));
        let mut case = Case::new(CaseId(0), at(1, 9, 0));

        let (agent, log) = place(&[ANN, DAN], &mut case, INTAKE, &config, &mut busy);
        assert_eq!(agent, Some(DAN));
        assert_eq!(log.len(), 1);
        let event = &log[0];
        assert_eq!(event.agent, Some(DAN));
        assert_eq!(event.start, at(1, 9, 0));
        assert_eq!(case.now, event.end);
        assert_eq!(busy.get(&DAN), Some(&event.end));
        assert_eq!(case.history(), &[(DAN, INTAKE)]);
    }

    #[test]
    fn ties_go_to_candidate_order() {
        let config = fixture(600.0, 5);
        let mut case = Case::new(CaseId(0), at(1, 9, 0));
        let (agent, _) = place(&[DAN, ANN], &mut case, INTAKE, &config, &mut BusyMap::default());
        assert_eq!(agent, Some(DAN));
    }

    #[test]
    fn off_hours_wait_for_calendar() {
        let config = fixture(600.0, 5);
        let mut case = underway(at(1, 18, 0));
        let (_, log) = place(&[CAT], &mut case, APPROVE, &config, &mut BusyMap::default());
        assert_eq!(log.len(), 1);
        let event = &log[0];
        assert_eq!(event.start, at(2, 9, 0));
        assert_eq!(event.end, at(2, 9, 15));
        assert_eq!(event.resource, "Cat");
        assert_eq!(event.activity, "Approve");
    }

    #[test]
    fn first_activity_after_arrival_gets_waiting_row() {
        let config = fixture(600.0, 5);
        let mut case = Case::new(CaseId(4), at(1, 18, 0));
        let (_, log) = place(&[CAT], &mut case, APPROVE, &config, &mut BusyMap::default());
        assert_eq!(log.len(), 2);
        let wait = &log[0];
        assert_eq!(wait.kind, RecordKind::Waiting);
        assert_eq!(wait.case_id, CaseId(4));
        assert_eq!(wait.agent, None);
        assert_eq!(wait.resource, "");
        assert_eq!(wait.activity, "Waiting for Approve");
        assert_eq!((wait.start, wait.end), (at(1, 18, 0), at(2, 9, 0)));
        assert_eq!(log[1].kind, RecordKind::Activity);
        assert_eq!(log[1].start, wait.end);
    }

    #[test]
    fn first_activity_at_arrival_has_no_waiting_row() {
        let config = fixture(600.0, 5);
        let mut case = Case::new(CaseId(0), at(1, 9, 0));
        let (_, log) = place(&[CAT], &mut case, APPROVE, &config, &mut BusyMap::default());
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, RecordKind::Activity);
    }

    #[test]
    fn delay_postpones_start() {
        let mut config = fixture(600.0, 5);
        config.delays.insert(APPROVE, DurationModel::fixed(1_800.0));
        let mut case = underway(at(1, 10, 0));
        let (_, log) = place(&[CAT], &mut case, APPROVE, &config, &mut BusyMap::default());
        assert_eq!(log[0].start, at(1, 10, 30));
        assert_eq!(case.now, at(1, 10, 45));
    }

    #[test]
    fn delay_is_added_before_the_calendar_lookup() {
        // 16:45 + 30 min lands after closing, so Cat starts the next morning.
        let mut config = fixture(600.0, 5);
        config.delays.insert(APPROVE, DurationModel::fixed(1_800.0));
        let mut case = underway(at(1, 16, 45));
        let (_, log) = place(&[CAT], &mut case, APPROVE, &config, &mut BusyMap::default());
        assert_eq!(log[0].start, at(2, 9, 0));
    }

    #[test]
    fn delay_and_busy_time_do_not_add_up() {
        let mut config = fixture(600.0, 5);
        config.delays.insert(APPROVE, DurationModel::fixed(600.0));
        let mut busy = BusyMap::default();
        busy.insert(CAT, at(1, 11, 0));
        let mut case = underway(at(1, 10, 0));
        let (_, log) = place(&[CAT], &mut case, APPROVE, &config, &mut busy);
        assert_eq!(log[0].start, at(1, 11, 0));
    }

    #[test]
    fn no_slot_changes_nothing() {
        let mut config = fixture(600.0, 5);
        config.agents.get_mut(CAT).unwrap().calendar = ResourceCalendar::empty();
        let mut case = Case::new(CaseId(0), at(1, 9, 0));
        let mut busy = BusyMap::default();
        let (agent, log) = place(&[CAT], &mut case, APPROVE, &config, &mut busy);
        assert!(agent.is_none());
        assert!(log.is_empty());
        assert!(busy.is_empty());
        assert_eq!(case.steps(), 0);
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn every_case_completes() {
        let config = fixture(600.0, 30);
        let out = run_once(&config);
        assert_eq!(out.cases.len(), 30);
        assert!(out.cases.iter().all(|c| c.state == CaseState::Completed));
        let activity_rows = out.log.iter().filter(|e| e.kind == RecordKind::Activity).count();
        assert_eq!(activity_rows, 90);
        assert_eq!(out.failed_cases(), 0);
    }

    #[test]
    fn agents_never_overlap() {
        let config = fixture(60.0, 40);
        let out = run_once(&config);
        for agent in [ANN, BOB, CAT, DAN] {
            let rows = rows_of(&out, agent);
            assert!(rows.windows(2).all(|w| w[0].end <= w[1].start), "{agent} double-booked");
        }
    }

    #[test]
    fn activities_fall_inside_working_hours() {
        let config = fixture(300.0, 60);
        let out = run_once(&config);
        for row in out.log.iter().filter(|e| e.kind == RecordKind::Activity) {
            let agent = row.agent.unwrap();
            assert!(config.agents.get(agent).unwrap().calendar.is_working_at(&row.start));
        }
    }

    #[test]
    fn observer_sees_every_case() {
        let config = fixture(600.0, 12);
        let router = ProbabilisticRouter;
        let mut counter = Counter::default();
        let out = Scheduler::new(&config, &router, 12, 42, 0).run(&mut counter);
        assert_eq!(counter.admitted, 12);
        assert_eq!(counter.completed, 12);
        assert_eq!(counter.events, out.log.len());
        assert_eq!(counter.runs, vec![(0, 12)]);
    }

    #[test]
    fn sparse_arrivals_complete_in_order() {
        // One case per day: each case finishes before the next is admitted.
        let config = fixture(86_400.0, 4);
        let out = run_once(&config);
        let ids: Vec<u32> = out.cases.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn plan_longer_than_series_extends_arrivals() {
        let config = fixture(600.0, 5);
        let out = SimBuilder::new(&config).case_count(8).build().unwrap().run().remove(0);
        assert_eq!(out.cases.len(), 8);
    }

    #[test]
    fn step_limit_failure_completes_cycles() {
        let mut b = builder();
        b.agent(AgentRecord::new(ANN, "Ann", office()).with_duration(INTAKE, DurationModel::fixed(60.0)))
            .handoff(TransitionKey::Start, Handoff::new(ANN, INTAKE), 1.0)
            .handoff(TransitionKey::after(ANN, INTAKE), Handoff::new(ANN, INTAKE), 1.0)
            .start(at(1, 9, 0))
            .case_count(2);
        let mut config = b.build().unwrap();
        config.settings.max_steps_per_case = 5;

        let out = run_once(&config);
        assert_eq!(out.failed_cases(), 2);
        let activity_rows = out.log.iter().filter(|e| e.kind == RecordKind::Activity).count();
        assert_eq!(activity_rows, 10);
    }

    #[test]
    fn missing_row_writes_incomplete_marker() {
        let mut b = builder();
        b.agent(AgentRecord::new(ANN, "Ann", office()).with_duration(INTAKE, DurationModel::fixed(60.0)))
            .handoff(TransitionKey::Start, Handoff::new(ANN, INTAKE), 1.0)
            .start(at(1, 9, 0))
            .case_count(1);
        let config = b.build().unwrap();

        let out = run_once(&config);
        assert_eq!(out.log.len(), 2);
        let marker = &out.log[1];
        assert_eq!(marker.kind, RecordKind::Incomplete);
        assert_eq!(marker.agent, None);
        assert_eq!(marker.start, out.log[0].end);
        assert!(marker.activity.starts_with("Could not finish case: 0 ("));
        assert_eq!(out.cases[0].state, CaseState::CompletedWithFailure);
    }
}

// ── Runs and plans ────────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use super::*;

    #[test]
    fn zero_cases_or_repetitions_is_capacity_error() {
        let config = fixture(600.0, 5);
        assert!(matches!(SimBuilder::new(&config).case_count(0).build(), Err(SimError::Capacity(_))));
        assert!(matches!(SimBuilder::new(&config).repetitions(0).build(), Err(SimError::Capacity(_))));
    }

    #[test]
    fn invalid_configuration_fails_before_running() {
        let mut config = fixture(600.0, 5);
        config.autonomous.set(TransitionKey::Start, Handoff::new(AgentId(77), INTAKE), 0.0);
        assert!(matches!(SimBuilder::new(&config).build(), Err(SimError::Model(_))));
    }

    #[test]
    fn same_seed_same_log() {
        let config = fixture(300.0, 25);
        let a = SimBuilder::new(&config).seed(9).build().unwrap().run();
        let b = SimBuilder::new(&config).seed(9).build().unwrap().run();
        assert_eq!(a, b);
    }

    #[test]
    fn repetitions_use_independent_streams() {
        let config = fixture(300.0, 25);
        let outs = SimBuilder::new(&config).repetitions(3).build().unwrap().run();
        assert_eq!(outs.len(), 3);
        assert_eq!(outs.iter().map(|o| o.repetition).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_ne!(outs[0].log, outs[1].log);

        // A repetition is reproducible on its own.
        let sim = SimBuilder::new(&config).repetitions(3).build().unwrap();
        assert_eq!(sim.run_repetition(2, &mut NoopObserver), outs[2]);
    }

    #[test]
    fn run_with_builds_one_observer_per_repetition() {
        let config = fixture(600.0, 6);
        let sim = SimBuilder::new(&config).repetitions(2).build().unwrap();
        let results = sim.run_with(|_| Counter::default());
        for (i, (out, counter)) in results.iter().enumerate() {
            assert_eq!(out.repetition, i as u32);
            assert_eq!(counter.runs, vec![(i as u32, 6)]);
        }
    }

    #[test]
    fn run_leaves_configuration_unchanged() {
        let config = fixture(600.0, 10);
        let before = config.to_bytes().unwrap();
        run_once(&config);
        assert_eq!(Configuration::from_bytes(&before).unwrap(), config);
    }
}

// ── Edit + run scenarios ──────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn case_ids_are_contiguous_after_set_case_count() {
        let mut config = fixture(600.0, 5);
        apply_edit(&mut config, &Edit::SetCaseCount { count: 17 }).unwrap();
        let out = run_once(&config);
        let ids: BTreeSet<u32> = out.log.iter().map(|e| e.case_id.0).collect();
        assert_eq!(ids, (0..17).collect());
        assert_eq!(ids.iter().max(), Some(&16));
    }

    #[test]
    fn deactivated_agent_never_appears() {
        let mut config = fixture(600.0, 30);
        apply_edit(
            &mut config,
            &Edit::UpdateAgentPopulation { changes: vec![PopulationChange { agent: DAN, count: 0 }] },
        )
        .unwrap();
        let out = run_once(&config);
        assert!(rows_of(&out, DAN).is_empty());
        // Cases routed to Dan dead-end instead of being rewired.
        assert!(out.failed_cases() > 0);
        assert!(
            out.log
                .iter()
                .filter(|e| e.kind == RecordKind::Incomplete)
                .all(|e| e.activity.ends_with("(No agents to perform activity)"))
        );
    }

    #[test]
    fn orchestrated_routing_covers_deactivated_agent() {
        let mut config = fixture(600.0, 30);
        config.routing = RoutingMode::Orchestrated;
        config.deactivated.insert(DAN);
        let out = run_once(&config);
        assert!(rows_of(&out, DAN).is_empty());
        assert_eq!(out.failed_cases(), 0);
    }

    #[test]
    fn first_row_starts_at_new_start_time() {
        let mut config = fixture(600.0, 5);
        let t = at(2, 10, 30);
        apply_edit(&mut config, &Edit::SetStartTime { timestamp: t }).unwrap();
        let out = run_once(&config);
        assert_eq!(out.log[0].start, t);
        assert_eq!(out.log[0].kind, RecordKind::Activity);
    }

    #[test]
    fn off_hours_start_time_still_opens_the_log() {
        // Saturday 03:00: nobody works until Monday 09:00.
        let mut config = fixture(600.0, 3);
        let t = Utc.with_ymd_and_hms(2024, 1, 6, 3, 0, 0).unwrap();
        apply_edit(&mut config, &Edit::SetStartTime { timestamp: t }).unwrap();
        let out = run_once(&config);

        let first = &out.log[0];
        assert_eq!(first.start, t);
        assert_eq!(first.kind, RecordKind::Waiting);
        assert_eq!(first.end, at(8, 9, 0));
        assert_eq!(out.log[1].kind, RecordKind::Activity);
        assert_eq!(out.log[1].start, at(8, 9, 0));
        assert_eq!(out.failed_cases(), 0);
    }

    #[test]
    fn every_case_log_opens_at_its_arrival() {
        let config = fixture(60.0, 40);
        let out = run_once(&config);
        let arrivals = config.arrivals.instants();
        for case in &out.cases {
            let first = out.log.iter().find(|e| e.case_id == case.id).unwrap();
            assert_eq!(first.start, arrivals[case.id.0 as usize]);
            assert_eq!(first.start, case.arrival);
        }
    }

    #[test]
    fn activity_delays_separate_handoffs() {
        let mut config = fixture(600.0, 10);
        config.delays.insert(APPROVE, DurationModel::fixed(3_600.0));
        let out = run_once(&config);
        assert_eq!(out.failed_cases(), 0);

        for case in &out.cases {
            let rows: Vec<&SimEvent> = out.log.iter().filter(|e| e.case_id == case.id).collect();
            let review = rows.iter().find(|e| e.activity == "Review").unwrap();
            let approve = rows.iter().find(|e| e.activity == "Approve").unwrap();
            assert!(approve.start - review.end >= chrono::Duration::hours(1));
        }
    }

    #[test]
    fn duplicates_share_the_load() {
        let mut config = fixture(60.0, 20);
        apply_edit(
            &mut config,
            &Edit::UpdateAgentPopulation { changes: vec![PopulationChange { agent: BOB, count: 2 }] },
        )
        .unwrap();
        let dup = AgentId(4);
        let out = run_once(&config);
        assert!(!rows_of(&out, dup).is_empty());
        assert_eq!(out.failed_cases(), 0);
        assert!(rows_of(&out, dup).iter().all(|e| e.resource == "DUPE_Bob_1_(0)"));
    }

    #[test]
    fn byte_snapshot_survives_a_run() {
        let config = fixture(600.0, 10);
        run_once(&config);
        let restored = Configuration::from_bytes(&config.to_bytes().unwrap()).unwrap();
        assert_eq!(run_once(&restored), run_once(&config));
    }

    #[test]
    fn shorter_monday_pushes_work_to_tuesday() {
        let mut config = fixture(1_800.0, 20);
        apply_edit(
            &mut config,
            &Edit::SetAgentSchedule {
                agent:     CAT,
                weekday:   bps_core::Weekday::Mon,
                intervals: vec![Interval::parse("09:00", "10:00").unwrap()],
            },
        )
        .unwrap();
        let out = run_once(&config);
        let cat_rows = rows_of(&out, CAT);
        assert!(cat_rows.iter().all(|e| e.start < at(1, 10, 0) || e.start >= at(2, 9, 0)));
    }
}
