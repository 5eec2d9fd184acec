// Domain service interface for solving facility location models
// Defines the contract that any solver implementation must follow (Dependency Inversion Principle)

use super::models::{DecisionModel, Solution, SolverConfig};

/// Error types for building, exporting and solving facility location problems
#[derive(Debug, thiserror::Error)]
pub enum CflpError {
    /// Structurally invalid input data (sizes, indices, negative values)
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// A decision model that a backend refuses to accept
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solve failed: {0}")]
    SolveFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CflpError {
    /// True when the external solve collaborator could not be used at all.
    ///
    /// Never true for a legitimate infeasible or unbounded outcome, which is a
    /// [`SolutionStatus`](super::SolutionStatus) and not an error.
    pub fn is_solve_failure(&self) -> bool {
        matches!(
            self,
            CflpError::InvalidModel(_) | CflpError::SolverNotAvailable(_) | CflpError::SolveFailure(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CflpError>;

/// Domain service interface for MIP backends
///
/// This trait defines the contract that all solver implementations must follow.
/// It allows us to swap solver backends without changing business logic (Open/Closed Principle).
pub trait SolverService: Send + Sync {
    /// Solve a decision model with an explicit configuration
    fn solve(&self, model: &DecisionModel, config: &SolverConfig) -> Result<Solution>;

    /// Validate a model without solving it
    fn validate(&self, model: &DecisionModel) -> Result<()> {
        let mut errors = Vec::new();
        let num_vars = model.num_variables();

        if num_vars == 0 {
            errors.push("Model must have at least one variable".to_string());
        }

        if model.objective.num_variables() != num_vars {
            errors.push(format!(
                "Objective has {} coefficients but model has {} variables",
                model.objective.num_variables(),
                num_vars
            ));
        }

        for (i, constraint) in model.constraints.iter().enumerate() {
            if let Some(&(index, _)) = constraint.terms.iter().find(|(index, _)| *index >= num_vars) {
                errors.push(format!(
                    "Constraint {} '{}' references variable {} but model has {} variables",
                    i, constraint.name, index, num_vars
                ));
            }
            if !constraint.bound.is_finite() {
                errors.push(format!(
                    "Constraint {} '{}' has a non-finite bound",
                    i, constraint.name
                ));
            }
        }

        for (i, var) in model.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CflpError::InvalidModel(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, ConstraintRole, ConstraintType, VariableLayout};

    struct NoopSolver;

    impl SolverService for NoopSolver {
        fn solve(&self, _model: &DecisionModel, _config: &SolverConfig) -> Result<Solution> {
            Err(CflpError::SolveFailure("not implemented".to_string()))
        }

        fn name(&self) -> &str {
            "noop"
        }

        fn supports_mip(&self) -> bool {
            false
        }
    }

    fn tiny_model() -> DecisionModel {
        DecisionModel::new("tiny", VariableLayout::new(1, 1))
    }

    #[test]
    fn test_validate_accepts_empty_constraint_set() {
        assert!(NoopSolver.validate(&tiny_model()).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_terms() {
        let mut model = tiny_model();
        model.constraints.push(Constraint::new(
            ConstraintRole::Demand { zone: 0 },
            ConstraintType::Equal,
            vec![(7, 1.0)],
            1.0,
        ));

        let err = NoopSolver.validate(&model).unwrap_err();
        assert!(matches!(err, CflpError::InvalidModel(_)));
        assert!(err.is_solve_failure());
    }

    #[test]
    fn test_invalid_instance_is_not_a_solve_failure() {
        assert!(!CflpError::InvalidInstance("x".to_string()).is_solve_failure());
    }
}
