//! Repetition runner.

use tracing::info;

use bps_model::{Configuration, RunSettings};

use crate::{NoopObserver, RunOutput, Scheduler, SimError, SimObserver, SimResult, TaskRouter};

/// How much to simulate.  Defaults come from the configuration's
/// [`RunSettings`]; [`SimBuilder`][crate::SimBuilder] overrides per call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunPlan {
    pub case_count:  u32,
    pub repetitions: u32,
    pub seed:        u64,
}

impl RunPlan {
    pub fn from_settings(settings: &RunSettings) -> Self {
        Self {
            case_count:  settings.case_count,
            repetitions: settings.repetitions,
            seed:        settings.seed,
        }
    }

    pub fn check(&self) -> SimResult<()> {
        if self.case_count == 0 {
            return Err(SimError::Capacity("case count must be at least 1".into()));
        }
        if self.repetitions == 0 {
            return Err(SimError::Capacity("repetitions must be at least 1".into()));
        }
        Ok(())
    }
}

/// A validated configuration plus a plan, ready to run.
///
/// Create via [`SimBuilder`][crate::SimBuilder].  Running borrows the
/// configuration immutably; each repetition owns its scheduler, RNG stream,
/// busy map, and log.
pub struct Simulation<'c, R: TaskRouter> {
    pub(crate) config: &'c Configuration,
    pub(crate) plan:   RunPlan,
    pub(crate) router: R,
}

impl<'c, R: TaskRouter> Simulation<'c, R> {
    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    pub fn config(&self) -> &'c Configuration {
        self.config
    }

    /// Run repetition `repetition` alone.
    pub fn run_repetition<O: SimObserver>(&self, repetition: u32, observer: &mut O) -> RunOutput {
        Scheduler::new(self.config, &self.router, self.plan.case_count, self.plan.seed, repetition)
            .run(observer)
    }

    /// Run every repetition with a fresh observer from `make_observer`.
    ///
    /// Results are in repetition order.  With the `parallel` feature the
    /// repetitions run on Rayon's thread pool; output is identical either way.
    pub fn run_with<O, F>(&self, make_observer: F) -> Vec<(RunOutput, O)>
    where
        O: SimObserver + Send,
        F: Fn(u32) -> O + Sync,
    {
        info!(
            cases = self.plan.case_count,
            repetitions = self.plan.repetitions,
            seed = self.plan.seed,
            "simulation started"
        );
        let one = |repetition: u32| {
            let mut observer = make_observer(repetition);
            let output = self.run_repetition(repetition, &mut observer);
            (output, observer)
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<(RunOutput, O)> = (0..self.plan.repetitions).map(one).collect();

        #[cfg(feature = "parallel")]
        let results: Vec<(RunOutput, O)> = {
            use rayon::prelude::*;
            (0..self.plan.repetitions).into_par_iter().map(one).collect()
        };

        let failed: usize = results.iter().map(|(out, _)| out.failed_cases()).sum();
        info!(repetitions = results.len(), failed_cases = failed, "simulation finished");
        results
    }

    /// Run every repetition without callbacks.
    pub fn run(&self) -> Vec<RunOutput> {
        self.run_with(|_| NoopObserver).into_iter().map(|(out, _)| out).collect()
    }
}
