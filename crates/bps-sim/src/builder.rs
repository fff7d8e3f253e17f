//! Fluent builder for a [`Simulation`].

use tracing::debug;

use bps_model::Configuration;

use crate::{ProbabilisticRouter, RunPlan, SimResult, Simulation, TaskRouter};

/// Fluent builder for [`Simulation<R>`].
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                  |
/// |---------------------|------------------------------------------|
/// | `.case_count(n)`    | `config.settings.case_count`             |
/// | `.repetitions(n)`   | `config.settings.repetitions`            |
/// | `.seed(s)`          | `config.settings.seed`                   |
/// | `.router(r)`        | [`ProbabilisticRouter`]                  |
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimBuilder::new(&config).repetitions(5).seed(42).build()?;
/// for output in sim.run() {
///     println!("run {}: {} rows", output.repetition, output.log.len());
/// }
/// ```
pub struct SimBuilder<'c, R: TaskRouter = ProbabilisticRouter> {
    config: &'c Configuration,
    plan:   RunPlan,
    router: R,
}

impl<'c> SimBuilder<'c, ProbabilisticRouter> {
    pub fn new(config: &'c Configuration) -> Self {
        Self {
            config,
            plan: RunPlan::from_settings(&config.settings),
            router: ProbabilisticRouter,
        }
    }
}

impl<'c, R: TaskRouter> SimBuilder<'c, R> {
    pub fn case_count(mut self, count: u32) -> Self {
        self.plan.case_count = count;
        self
    }

    pub fn repetitions(mut self, count: u32) -> Self {
        self.plan.repetitions = count;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.plan.seed = seed;
        self
    }

    /// Replace the whole plan.
    pub fn plan(mut self, plan: RunPlan) -> Self {
        self.plan = plan;
        self
    }

    /// Swap in a different routing policy.
    pub fn router<R2: TaskRouter>(self, router: R2) -> SimBuilder<'c, R2> {
        SimBuilder { config: self.config, plan: self.plan, router }
    }

    /// Check the plan and validate the configuration.  Nothing runs if
    /// either fails.
    pub fn build(self) -> SimResult<Simulation<'c, R>> {
        self.plan.check()?;
        self.config.validate()?;
        debug!(plan = ?self.plan, "simulation built");
        Ok(Simulation { config: self.config, plan: self.plan, router: self.router })
    }
}
