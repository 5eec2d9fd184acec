use crate::domain::{
    models::{DecisionModel, Solution, SolverConfig},
    solver_service::{Result, SolverService},
};
use crate::solver::good_lp_model;
use good_lp::solvers::coin_cbc::{self, CoinCbcProblem};

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, model: &DecisionModel, config: &SolverConfig) -> Result<Solution> {
        // Validate first
        self.validate(model)?;

        let tune = |problem: &mut CoinCbcProblem| {
            if !config.verbose {
                problem.set_parameter("logLevel", "0");
            }
            if let Some(seconds) = config.time_limit {
                problem.set_parameter("seconds", &seconds.to_string());
            }
            for (name, value) in &config.options {
                problem.set_parameter(name, &value.to_string());
            }
        };

        good_lp_model::solve_with(model, coin_cbc::coin_cbc, self.name(), tune)
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
