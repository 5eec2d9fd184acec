// MicroLP adapter: pure-Rust branch-and-bound through good_lp
// Needs no native library, which makes it the default backend.

use crate::domain::{
    models::{DecisionModel, Solution, SolverConfig},
    solver_service::{Result, SolverService},
};
use crate::solver::good_lp_model;
use good_lp::solvers::microlp;
use tracing::debug;

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, model: &DecisionModel, config: &SolverConfig) -> Result<Solution> {
        self.validate(model)?;

        if config.time_limit.is_some() || !config.options.is_empty() {
            debug!(
                options = config.options.len(),
                "MicroLP takes no options, ignoring time limit and backend options"
            );
        }

        good_lp_model::solve_with(model, microlp::microlp, self.name(), |_| {})
    }

    fn name(&self) -> &str {
        "MicroLP"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
