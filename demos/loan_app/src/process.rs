//! Synthetic loan application process.
//!
//! ```text
//!   start ─┬─ Ana: Check application ─┬─ Ana: Request documents ─┐
//!          │                          │          (loops back) ◄──┘
//!          └─ Ben: Check application ─┴─ Cara/Dev/Eli: Assess risk
//!                                          │
//!                               Fay: Approve │ Fay: Reject
//!                                          │
//!                                 Ben: Notify customer → end
//! ```
//!
//! Dev works Monday to Wednesday only; everyone else keeps office hours
//! with a lunch break.

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

use bps_calendar::{Interval, ResourceCalendar};
use bps_core::{ActivityId, AgentId, WEEKDAYS};
use bps_model::{
    AgentRecord, Configuration, ConfigurationBuilder, DistributionKind, DurationModel, Handoff,
    InterArrivalModel, RoleRecord, TransitionKey,
};

pub const ANA:  AgentId = AgentId(0);
pub const BEN:  AgentId = AgentId(1);
pub const CARA: AgentId = AgentId(2);
pub const DEV:  AgentId = AgentId(3);
pub const ELI:  AgentId = AgentId(4);
pub const FAY:  AgentId = AgentId(5);

pub const CHECK:   &str = "Check application";
pub const REQUEST: &str = "Request documents";
pub const ASSESS:  &str = "Assess risk";
pub const APPROVE: &str = "Approve";
pub const REJECT:  &str = "Reject";
pub const NOTIFY:  &str = "Notify customer";

const ANALYSTS: [(AgentId, f64); 3] = [(CARA, 0.4), (DEV, 0.35), (ELI, 0.25)];

fn office(days: usize) -> Result<ResourceCalendar> {
    let hours = [Interval::parse("09:00", "12:00")?, Interval::parse("13:00", "17:00")?];
    Ok(ResourceCalendar::weekly(&WEEKDAYS[..days], &hours)?)
}

pub fn build(cases: u32, repetitions: u32, seed: u64) -> Result<Configuration> {
    let mut b = ConfigurationBuilder::new();
    let check = b.activity(CHECK)?;
    let request = b.activity(REQUEST)?;
    let assess = b.activity(ASSESS)?;
    let approve = b.activity(APPROVE)?;
    let reject = b.activity(REJECT)?;
    let notify = b.activity(NOTIFY)?;

    let check_time = DurationModel::new(DistributionKind::Normal, 900.0, 90_000.0, 300.0, 2_400.0)?;
    let mut analyst = RoleRecord::default();
    analyst.durations.insert(
        assess,
        DurationModel::new(DistributionKind::Lognormal, 3_600.0, 1.0e6, 900.0, 10_800.0)?,
    );

    b.agent(
        AgentRecord::new(ANA, "Ana", office(5)?)
            .with_role("clerk")
            .with_duration(check, check_time.clone())
            .with_duration(request, DurationModel::fixed(600.0)),
    )
    .agent(
        AgentRecord::new(BEN, "Ben", office(5)?)
            .with_role("clerk")
            .with_duration(check, check_time)
            .with_duration(notify, DurationModel::new(DistributionKind::Exponential, 300.0, 0.0, 60.0, 1_200.0)?),
    )
    .agent(AgentRecord::new(CARA, "Cara", office(5)?).with_role("analyst"))
    .agent(AgentRecord::new(DEV, "Dev", office(3)?).with_role("analyst"))
    .agent(AgentRecord::new(ELI, "Eli", office(5)?).with_role("analyst"))
    .agent(
        AgentRecord::new(FAY, "Fay", office(5)?)
            .with_duration(approve, DurationModel::fixed(1_200.0))
            .with_duration(reject, DurationModel::fixed(600.0)),
    )
    .role("analyst", analyst)
    // Approvals wait for the next sign-off round.
    .delay(approve, DurationModel::new(DistributionKind::Exponential, 1_800.0, 0.0, 0.0, 7_200.0)?);

    b.handoff(TransitionKey::Start, Handoff::new(ANA, check), 0.5)
        .handoff(TransitionKey::Start, Handoff::new(BEN, check), 0.5)
        .handoff(TransitionKey::after(ANA, check), Handoff::new(ANA, request), 0.1)
        .handoff(TransitionKey::after(ANA, request), Handoff::new(ANA, check), 1.0);
    for (clerk, scale) in [(ANA, 0.9), (BEN, 1.0)] {
        for (who, p) in ANALYSTS {
            b.handoff(TransitionKey::after(clerk, check), Handoff::new(who, assess), p * scale);
        }
    }
    for (who, _) in ANALYSTS {
        b.handoff(TransitionKey::after(who, assess), Handoff::new(FAY, approve), 0.7)
            .handoff(TransitionKey::after(who, assess), Handoff::new(FAY, reject), 0.3);
    }
    b.handoff(TransitionKey::after(FAY, approve), Handoff::new(BEN, notify), 1.0)
        .handoff(TransitionKey::after(FAY, reject), Handoff::new(BEN, notify), 1.0)
        .handoff(TransitionKey::after(BEN, notify), Handoff::new(BEN, ActivityId::TERMINAL), 1.0);

    let start = Utc
        .with_ymd_and_hms(2024, 3, 4, 9, 0, 0)
        .single()
        .context("invalid start instant")?;
    b.start(start)
        .inter_arrival(InterArrivalModel::normal(1_800.0, 600.0))
        .case_count(cases)
        .repetitions(repetitions)
        .seed(seed);

    Ok(b.build()?)
}
