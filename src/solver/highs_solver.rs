// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates our domain models to HiGHS API

use crate::domain::{
    models::{
        DecisionModel, OptionValue, Solution as DomainSolution, SolverConfig, SolverStatistics,
    },
    solver_service::{CflpError, Result, SolverService},
    value_objects::{
        ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus, VariableType,
    },
};
use highs::{HighsModelStatus, Model, RowProblem, Sense};
use std::time::Instant;
use tracing::debug;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, model: &DecisionModel, config: &SolverConfig) -> Result<DomainSolution> {
        // Validate first
        self.validate(model)?;

        let start_time = Instant::now();

        // Use HiGHS RowProblem (add variables first, then constraints)
        let mut pb = RowProblem::default();
        let mut cols = Vec::with_capacity(model.num_variables());

        for (var_def, &obj_coeff) in model.variables.iter().zip(&model.objective.coefficients) {
            let lower = var_def.lower_bound;
            let col = match (var_def.variable_type, var_def.upper_bound) {
                (VariableType::Binary, Some(upper)) => {
                    pb.add_integer_column(obj_coeff, lower..=upper)
                }
                (VariableType::Binary, None) => pb.add_integer_column(obj_coeff, lower..),
                (VariableType::Continuous, Some(upper)) => pb.add_column(obj_coeff, lower..=upper),
                (VariableType::Continuous, None) => pb.add_column(obj_coeff, lower..),
            };
            cols.push(col);
        }

        for constraint in &model.constraints {
            let terms: Vec<_> = constraint
                .terms
                .iter()
                .filter(|(_, coeff)| *coeff != 0.0)
                .map(|&(index, coeff)| (cols[index], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = if model.objective.optimization_type == OptimizationType::Maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        let mut highs_model = pb.optimise(sense);
        apply_config(&mut highs_model, config);

        let solved = highs_model.solve();

        let statistics = SolverStatistics {
            solve_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
            ..SolverStatistics::for_model(model)
        };

        debug!(
            model = %model.name,
            status = ?solved.status(),
            elapsed_ms = statistics.solve_time_ms,
            "HiGHS solve returned"
        );

        match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let actual_obj = model.objective.evaluate(&variable_values);

                let mut solution = DomainSolution::optimal(actual_obj, variable_values)
                    .with_statistics(statistics);
                solution.message = format!("Optimal solution found for '{}'", model.name);
                Ok(solution)
            }
            HighsModelStatus::Infeasible => Ok(DomainSolution::new(
                DomainSolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            HighsModelStatus::Unbounded => Ok(DomainSolution::new(
                DomainSolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            HighsModelStatus::UnboundedOrInfeasible => Ok(DomainSolution::new(
                DomainSolutionStatus::Undefined,
                "Problem is unbounded or infeasible",
            )
            .with_statistics(statistics)),
            status @ (HighsModelStatus::NotSet
            | HighsModelStatus::ReachedTimeLimit
            | HighsModelStatus::ReachedIterationLimit) => Ok(DomainSolution::new(
                DomainSolutionStatus::NotSolved,
                format!("HiGHS stopped before a verdict: {:?}", status),
            )
            .with_statistics(statistics)),
            status => Err(CflpError::SolveFailure(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

fn apply_config(model: &mut Model, config: &SolverConfig) {
    if !config.verbose {
        model.make_quiet();
    }
    if let Some(seconds) = config.time_limit {
        model.set_option("time_limit", seconds);
    }
    for (name, value) in &config.options {
        match value {
            OptionValue::Bool(b) => model.set_option(name.as_str(), *b),
            OptionValue::Int(i) => model.set_option(name.as_str(), *i as i32),
            OptionValue::Float(x) => model.set_option(name.as_str(), *x),
            OptionValue::Text(s) => model.set_option(name.as_str(), s.as_str()),
        }
    }
}
