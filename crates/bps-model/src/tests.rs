//! Unit tests for bps-model.

use chrono::{Duration, TimeZone, Utc};

use bps_calendar::{Interval, ResourceCalendar};
use bps_core::{ActivityId, AgentId, SimRng, Timestamp, WEEKDAYS, Weekday};

use crate::{
    ActivityRegistry, AgentRecord, ArrivalSeries, CodecError, Configuration, ConfigurationBuilder,
    DistributionKind, DurationModel, Handoff, HandoffDistribution, InterArrivalKind,
    InterArrivalModel, LookupError, ModelError, RoleRecord, TERMINAL_NAME, TableKind,
    TrainingEvent, TransitionKey, TransitionTable,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const INTAKE: ActivityId = ActivityId(1);
const REVIEW: ActivityId = ActivityId(2);
const APPROVE: ActivityId = ActivityId(3);

const ANN: AgentId = AgentId(0);
const BOB: AgentId = AgentId(1);
const CAT: AgentId = AgentId(2);

fn monday_9am() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

fn office() -> ResourceCalendar {
    ResourceCalendar::weekly(&WEEKDAYS[..5], &[Interval::parse("09:00", "17:00").unwrap()]).unwrap()
}

/// Intake (Ann) → Review (Bob, role fallback) → Approve (Cat) → end.
fn fixture() -> Configuration {
    let mut b = ConfigurationBuilder::new();
    assert_eq!(b.activity("Intake").unwrap(), INTAKE);
    assert_eq!(b.activity("Review").unwrap(), REVIEW);
    assert_eq!(b.activity("Approve").unwrap(), APPROVE);

    let mut clerk = RoleRecord::default();
    clerk.durations.insert(REVIEW, DurationModel::fixed(1_800.0));

    b.agent(AgentRecord::new(ANN, "Ann", office()).with_duration(INTAKE, DurationModel::fixed(600.0)))
        .agent(AgentRecord::new(BOB, "Bob", office()).with_role("clerk"))
        .agent(AgentRecord::new(CAT, "Cat", office()).with_duration(APPROVE, DurationModel::fixed(900.0)))
        .role("clerk", clerk)
        .handoff(TransitionKey::Start, Handoff::new(ANN, INTAKE), 1.0)
        .handoff(TransitionKey::after(ANN, INTAKE), Handoff::new(BOB, REVIEW), 1.0)
        .handoff(TransitionKey::after(BOB, REVIEW), Handoff::new(CAT, APPROVE), 0.9)
        .handoff(TransitionKey::after(CAT, APPROVE), Handoff::new(CAT, ActivityId::TERMINAL), 1.0)
        .start(monday_9am())
        .inter_arrival(InterArrivalModel::normal(1_200.0, 300.0))
        .case_count(20)
        .seed(7);
    b.build().unwrap()
}

fn event(case: &str, start: Timestamp) -> TrainingEvent {
    TrainingEvent {
        case_id:  case.to_owned(),
        resource: "Ann".to_owned(),
        activity: "Intake".to_owned(),
        start,
        end:      start + Duration::minutes(5),
    }
}

// ── ActivityRegistry ──────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use super::*;

    #[test]
    fn terminal_is_first() {
        let reg = ActivityRegistry::new();
        assert_eq!(reg.get(TERMINAL_NAME), Some(ActivityId::TERMINAL));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn intern_is_idempotent() {
        let mut reg = ActivityRegistry::new();
        let a = reg.intern("Review").unwrap();
        assert_eq!(reg.intern("Review").unwrap(), a);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.name(a), Some("Review"));
    }

    #[test]
    fn unknown_name_is_lookup_error() {
        let reg = ActivityRegistry::new();
        assert_eq!(reg.require("Nope"), Err(LookupError::ActivityName("Nope".into())));
    }

    #[test]
    fn decoding_requires_terminal_first() {
        let bad: Result<ActivityRegistry, _> = serde_json::from_str(r#"["Review"]"#);
        assert!(bad.is_err());
        let dup: Result<ActivityRegistry, _> =
            serde_json::from_str(r#"["zzz_end", "Review", "Review"]"#);
        assert!(dup.is_err());
    }
}

// ── DurationModel ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod duration {
    use super::*;

    #[test]
    fn fixed_always_returns_mean() {
        let mut rng = SimRng::new(1);
        let m = DurationModel::fixed(42.0);
        assert!((0..10).all(|_| m.sample(&mut rng) == 42.0));
    }

    #[test]
    fn draws_respect_bounds() {
        let mut rng = SimRng::new(2);
        for kind in [
            DistributionKind::Normal,
            DistributionKind::Exponential,
            DistributionKind::Uniform,
            DistributionKind::Lognormal,
            DistributionKind::Gamma,
        ] {
            let m = DurationModel::new(kind, 600.0, 250_000.0, 60.0, 1_200.0).unwrap();
            for _ in 0..200 {
                let d = m.sample(&mut rng);
                assert!((60.0..=1_200.0).contains(&d), "{kind:?} drew {d}");
            }
        }
    }

    #[test]
    fn degenerate_parameters_fall_back_to_mean() {
        let mut rng = SimRng::new(3);
        let m = DurationModel::new(DistributionKind::Lognormal, 300.0, 0.0, 0.0, 1_000.0).unwrap();
        assert_eq!(m.sample(&mut rng), 300.0);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = DurationModel::new(DistributionKind::Normal, 10.0, 1.0, 20.0, 5.0).unwrap_err();
        assert!(matches!(err, ModelError::Duration(_)));
    }

    #[test]
    fn discovery_aliases_decode() {
        let m: DurationModel = serde_json::from_str(
            r#"{"kind":"lognorm","mean":5.0,"var":1.0,"min":0.0,"max":10.0}"#,
        )
        .unwrap();
        assert_eq!(m.kind, DistributionKind::Lognormal);
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod transitions {
    use super::*;

    #[test]
    fn full_mass_never_finishes() {
        let mut dist = HandoffDistribution::new();
        dist.set(Handoff::new(ANN, INTAKE), 0.5);
        dist.set(Handoff::new(BOB, REVIEW), 0.5);
        let mut rng = SimRng::new(9);
        assert!((0..500).all(|_| dist.sample(&mut rng).is_some()));
    }

    #[test]
    fn zero_mass_always_finishes() {
        let mut dist = HandoffDistribution::new();
        dist.set(Handoff::new(ANN, INTAKE), 0.0);
        let mut rng = SimRng::new(9);
        assert!((0..100).all(|_| dist.sample(&mut rng).is_none()));
    }

    #[test]
    fn sum_above_one_rejected() {
        let mut dist = HandoffDistribution::new();
        dist.set(Handoff::new(ANN, INTAKE), 0.7);
        dist.set(Handoff::new(BOB, REVIEW), 0.4);
        let err = dist.check(&TransitionKey::Start).unwrap_err();
        assert!(matches!(err, ModelError::Probability { .. }));
    }

    #[test]
    fn tolerance_accepts_rounding() {
        let mut dist = HandoffDistribution::new();
        for (i, agent) in [ANN, BOB, CAT].into_iter().enumerate() {
            dist.set(Handoff::new(agent, ActivityId(i as u16 + 1)), 1.0 / 3.0);
        }
        assert!(dist.check(&TransitionKey::Start).is_ok());
    }

    #[test]
    fn merge_twice_equals_once() {
        let mut table = fixture().autonomous;
        let mut patch = TransitionTable::new();
        patch.set(TransitionKey::after(BOB, REVIEW), Handoff::new(CAT, APPROVE), 0.5);
        patch.set(TransitionKey::after(BOB, REVIEW), Handoff::new(BOB, REVIEW), 0.2);

        table.merge(&patch);
        let once = table.clone();
        table.merge(&patch);
        assert_eq!(table, once);

        let row = table.get(&TransitionKey::after(BOB, REVIEW)).unwrap();
        assert_eq!(row.get(&Handoff::new(CAT, APPROVE)), Some(0.5));
        assert_eq!(row.get(&Handoff::new(BOB, REVIEW)), Some(0.2));
    }

    #[test]
    fn outbound_lists_only_that_agent() {
        let config = fixture();
        let rows: Vec<ActivityId> = config.autonomous.outbound(BOB).map(|(a, _)| a).collect();
        assert_eq!(rows, vec![REVIEW]);
    }

    #[test]
    fn start_sorts_before_after() {
        assert!(TransitionKey::Start < TransitionKey::after(AgentId(0), ActivityId(0)));
    }
}

// ── Arrivals ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arrivals {
    use super::*;

    #[test]
    fn derive_anchors_at_start() {
        let mut rng = SimRng::new(5);
        let s = ArrivalSeries::derive(InterArrivalModel::normal(600.0, 120.0), monday_9am(), 50, &mut rng);
        assert_eq!(s.len(), 50);
        assert_eq!(s.start(), Some(monday_9am()));
        assert!(s.instants().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn fixed_mean_is_evenly_spaced() {
        let mut rng = SimRng::new(5);
        let s = ArrivalSeries::derive(InterArrivalModel::fixed_mean(900.0), monday_9am(), 4, &mut rng);
        assert_eq!(s.instants()[3], monday_9am() + Duration::minutes(45));
    }

    #[test]
    fn fit_from_training_cases() {
        let t0 = monday_9am();
        let events = vec![
            event("c1", t0),
            event("c1", t0 + Duration::minutes(30)),
            event("c2", t0 + Duration::minutes(10)),
            event("c3", t0 + Duration::minutes(30)),
        ];
        let m = InterArrivalModel::fit(&events, InterArrivalKind::Normal).unwrap();
        assert_eq!(m.mean_secs, 900.0);
        assert_eq!(m.std_secs, 300.0);
        assert!(InterArrivalModel::fit(&events[..1], InterArrivalKind::Normal).is_none());
    }

    #[test]
    fn kind_accepts_legacy_spellings() {
        for spelling in ["\"fixed_mean\"", "\"fixed-mean\"", "\"mean\""] {
            let kind: InterArrivalKind = serde_json::from_str(spelling).unwrap();
            assert_eq!(kind, InterArrivalKind::FixedMean);
        }
        assert_eq!(serde_json::to_string(&InterArrivalKind::FixedMean).unwrap(), "\"fixed_mean\"");
    }

    #[test]
    fn builder_defaults_to_earliest_training_start() {
        let t0 = monday_9am();
        let mut b = ConfigurationBuilder::new();
        b.training(vec![event("c2", t0 + Duration::hours(1)), event("c1", t0)]).case_count(3);
        let config = b.build().unwrap();
        assert_eq!(config.arrivals.start(), Some(t0));
        assert_eq!(config.arrivals.model.mean_secs, 3_600.0);
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod configuration {
    use super::*;

    #[test]
    fn fixture_is_valid() {
        let config = fixture();
        config.validate().unwrap();
        assert_eq!(config.arrivals.len(), 20);
    }

    #[test]
    fn role_fallback_duration() {
        let config = fixture();
        assert_eq!(config.duration_for(BOB, REVIEW), Some(&DurationModel::fixed(1_800.0)));
        assert!(config.is_eligible(BOB, REVIEW));
        assert!(!config.is_eligible(ANN, REVIEW));
    }

    #[test]
    fn deactivated_agent_not_eligible() {
        let mut config = fixture();
        config.deactivated.insert(ANN);
        assert!(!config.is_eligible(ANN, INTAKE));
    }

    #[test]
    fn empty_calendar_not_eligible() {
        let mut config = fixture();
        config.agents.get_mut(ANN).unwrap().calendar = ResourceCalendar::empty();
        assert!(!config.is_eligible(ANN, INTAKE));
    }

    #[test]
    fn performers_by_own_mapping() {
        assert_eq!(fixture().performers(INTAKE), vec![ANN]);
    }

    #[test]
    fn unknown_handoff_agent_fails_validation() {
        let mut config = fixture();
        config.autonomous.set(TransitionKey::Start, Handoff::new(AgentId(99), INTAKE), 0.0);
        let err = config.validate().unwrap_err();
        assert_eq!(err, ModelError::Lookup(LookupError::Agent(AgentId(99))));
    }

    #[test]
    fn zero_case_count_is_capacity_error() {
        let mut config = fixture();
        config.settings.case_count = 0;
        assert!(config.validate().unwrap_err().is_capacity());
    }

    #[test]
    fn builder_records_delays() {
        let mut b = ConfigurationBuilder::new();
        let review = b.activity("Review").unwrap();
        b.agent(AgentRecord::new(ANN, "Ann", office()).with_duration(review, DurationModel::fixed(60.0)))
            .handoff(TransitionKey::Start, Handoff::new(ANN, review), 1.0)
            .delay(review, DurationModel::fixed(300.0))
            .start(monday_9am())
            .case_count(2);
        let config = b.build().unwrap();
        assert_eq!(config.delays.get(&review), Some(&DurationModel::fixed(300.0)));
    }

    #[test]
    fn delay_for_unknown_activity_fails_validation() {
        let mut config = fixture();
        config.delays.insert(ActivityId(40), DurationModel::fixed(60.0));
        let err = config.validate().unwrap_err();
        assert_eq!(err, ModelError::Lookup(LookupError::Activity(ActivityId(40))));
    }

    #[test]
    fn malformed_delay_fails_validation() {
        let mut config = fixture();
        let mut model = DurationModel::fixed(60.0);
        model.min = 120.0;
        config.delays.insert(REVIEW, model);
        assert!(matches!(config.validate(), Err(ModelError::Duration(_))));
    }

    #[test]
    fn end_marker_cannot_carry_a_delay() {
        let mut config = fixture();
        config.delays.insert(ActivityId::TERMINAL, DurationModel::fixed(60.0));
        assert!(matches!(config.validate(), Err(ModelError::Config(_))));
    }
}

// ── clone_agent ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod clone_agent {
    use super::*;

    #[test]
    fn appends_after_max_id() {
        let mut config = fixture();
        let dup = config.clone_agent(BOB).unwrap();
        assert_eq!(dup, AgentId(3));
        let rec = config.agents.get(dup).unwrap();
        assert_eq!(rec.name, "DUPE_Bob_1_(0)");
        assert_eq!(rec.origin, Some(BOB));
        assert_eq!(rec.role.as_deref(), Some("clerk"));
        assert_eq!(config.origin_map().get(&dup), Some(&BOB));
    }

    #[test]
    fn copies_outbound_rows_in_both_tables() {
        let mut config = fixture();
        let dup = config.clone_agent(BOB).unwrap();
        for kind in [TableKind::Orchestrated, TableKind::Autonomous] {
            let table = config.table(kind);
            assert_eq!(
                table.get(&TransitionKey::after(dup, REVIEW)),
                table.get(&TransitionKey::after(BOB, REVIEW)),
            );
        }
        config.validate().unwrap();
    }

    #[test]
    fn clone_is_deep() {
        let mut config = fixture();
        let dup = config.clone_agent(ANN).unwrap();
        config
            .agents
            .get_mut(dup)
            .unwrap()
            .calendar
            .replace_day(Weekday::Mon, vec![Interval::parse("09:00", "10:00").unwrap()])
            .unwrap();
        assert_eq!(config.agents.get(ANN).unwrap().calendar.work_on(Weekday::Mon), 8 * 3_600);
        assert_eq!(config.agents.get(dup).unwrap().calendar.work_on(Weekday::Mon), 3_600);
    }

    #[test]
    fn clone_of_clone_joins_root_pool() {
        let mut config = fixture();
        let first = config.clone_agent(CAT).unwrap();
        let second = config.clone_agent(first).unwrap();
        let rec = config.agents.get(second).unwrap();
        assert_eq!(rec.origin, Some(CAT));
        assert_eq!(rec.name, "DUPE_Cat_2_(1)");
        assert_eq!(config.duplicate_pool(second), vec![CAT, first, second]);
    }

    #[test]
    fn unknown_source_is_lookup_error() {
        let mut config = fixture();
        assert!(config.clone_agent(AgentId(42)).unwrap_err().is_lookup());
        assert_eq!(config.agents.len(), 3);
    }

    #[test]
    fn missing_cloned_row_is_detected() {
        let mut config = fixture();
        let dup = config.clone_agent(BOB).unwrap();
        let mut rebuilt = TransitionTable::new();
        for (key, dist) in config.autonomous.rows() {
            if key.agent() != Some(dup) {
                for (h, p) in dist.iter() {
                    rebuilt.set(*key, *h, p);
                }
            }
        }
        config.autonomous = rebuilt;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ModelError::IncompleteDuplicate { agent, .. } if agent == dup));
    }
}

// ── Codec ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod codec {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let mut config = fixture();
        config.clone_agent(BOB).unwrap();
        config.deactivated.insert(ANN);
        config.overrides.activity.insert(REVIEW, 120.0);
        config.delays.insert(APPROVE, DurationModel::fixed(600.0));
        let bytes = config.to_bytes().unwrap();
        assert_eq!(&bytes[..4], b"BPSC");
        assert_eq!(Configuration::from_bytes(&bytes).unwrap(), config);
    }

    #[test]
    fn json_round_trip() {
        let config = fixture();
        let json = config.to_json().unwrap();
        assert_eq!(Configuration::from_json(&json).unwrap(), config);
    }

    #[test]
    fn json_without_delays_decodes() {
        let config = fixture();
        let mut doc: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        doc.as_object_mut().unwrap().remove("delays");
        let restored = Configuration::from_json(&doc.to_string()).unwrap();
        assert!(restored.delays.is_empty());
        assert_eq!(restored, config);
    }

    #[test]
    fn rejects_foreign_bytes() {
        assert!(matches!(Configuration::from_bytes(b"nope"), Err(CodecError::BadMagic)));
        assert!(matches!(Configuration::from_bytes(b""), Err(CodecError::BadMagic)));
    }

    #[test]
    fn rejects_future_version() {
        let mut bytes = fixture().to_bytes().unwrap();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        assert!(matches!(
            Configuration::from_bytes(&bytes),
            Err(CodecError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn file_format_follows_extension() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture();
        for name in ["config.json", "config.bpsc"] {
            let path = dir.path().join(name);
            config.save_file(&path).unwrap();
            assert_eq!(Configuration::load_file(&path).unwrap(), config);
        }
        let text = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
        assert!(text.contains("\"zzz_end\""));
    }
}
