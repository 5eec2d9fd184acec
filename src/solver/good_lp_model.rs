// Shared translation of a DecisionModel into a good_lp problem
// Used by every backend reached through good_lp (CBC, MicroLP)

use crate::domain::{
    models::{DecisionModel, Solution as DomainSolution, SolverStatistics},
    solver_service::{CflpError, Result},
    value_objects::{
        ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus, VariableType,
    },
};
use good_lp::{
    variable, variables, Expression, ResolutionError, Solution as GoodLpSolutionTrait, Solver,
    SolverModel, Variable as GoodLpVariable,
};
use std::time::Instant;
use tracing::debug;

/// Translate `model`, let `tune` apply backend options, solve, and map the outcome
pub(crate) fn solve_with<S, F>(
    model: &DecisionModel,
    solver: S,
    backend_name: &str,
    tune: F,
) -> Result<DomainSolution>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
    F: FnOnce(&mut S::Model),
{
    let start_time = Instant::now();

    let mut vars = variables!();
    let lp_variables: Vec<GoodLpVariable> = model
        .variables
        .iter()
        .map(|var_def| {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
            match var_def.variable_type {
                VariableType::Binary => vars.add(variable().integer().min(lower).max(upper)),
                VariableType::Continuous => vars.add(variable().min(lower).max(upper)),
            }
        })
        .collect();

    // good_lp minimises, so negate for maximisation
    let is_maximize = model.objective.optimization_type == OptimizationType::Maximize;
    let mut obj_expr: Expression = 0.into();
    for (i, &coeff) in model.objective.coefficients.iter().enumerate() {
        if coeff != 0.0 {
            let c = if is_maximize { -coeff } else { coeff };
            obj_expr += c * lp_variables[i];
        }
    }

    let mut lp_model = vars.minimise(obj_expr).using(solver);

    for constraint in &model.constraints {
        let mut lhs: Expression = 0.into();
        for &(index, coeff) in &constraint.terms {
            if coeff != 0.0 {
                lhs += coeff * lp_variables[index];
            }
        }

        match constraint.constraint_type {
            ConstraintType::LessThanOrEqual => {
                lp_model.add_constraint(lhs.leq(constraint.bound));
            }
            ConstraintType::Equal => {
                lp_model.add_constraint(lhs.eq(constraint.bound));
            }
            ConstraintType::GreaterThanOrEqual => {
                lp_model.add_constraint(lhs.geq(constraint.bound));
            }
        }
    }

    tune(&mut lp_model);

    let solution_result = lp_model.solve();

    let statistics = SolverStatistics {
        solve_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
        ..SolverStatistics::for_model(model)
    };

    debug!(
        backend = backend_name,
        model = %model.name,
        elapsed_ms = statistics.solve_time_ms,
        "good_lp solve returned"
    );

    match solution_result {
        Ok(sol) => {
            let variable_values: Vec<f64> = lp_variables.iter().map(|&var| sol.value(var)).collect();
            let actual_obj = model.objective.evaluate(&variable_values);

            let mut solution =
                DomainSolution::optimal(actual_obj, variable_values).with_statistics(statistics);
            solution.message = format!("Optimal solution found for '{}'", model.name);
            Ok(solution)
        }
        Err(ResolutionError::Infeasible) => Ok(DomainSolution::new(
            DomainSolutionStatus::Infeasible,
            "Problem is infeasible: no solution satisfies all constraints",
        )
        .with_statistics(statistics)),
        Err(ResolutionError::Unbounded) => Ok(DomainSolution::new(
            DomainSolutionStatus::Unbounded,
            "Problem is unbounded: objective can be improved infinitely",
        )
        .with_statistics(statistics)),
        Err(e) => Err(CflpError::SolveFailure(format!("{}: {:?}", backend_name, e))),
    }
}
