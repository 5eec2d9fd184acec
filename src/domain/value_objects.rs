// Domain value objects representing core business concepts

use serde::Deserialize;
use std::fmt;

/// Type of decision variable in the optimization problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    /// Continuous real number (x ∈ ℝ)
    Continuous,
    /// Binary variable (x ∈ {0, 1})
    Binary,
}

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationType {
    /// Minimize the objective function
    Minimize,
    /// Maximize the objective function
    Maximize,
}

/// Terminal status of a solve
///
/// Only `Optimal` carries a usable assignment. Everything else is a valid
/// outcome of the model, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Found optimal solution
    Optimal,
    /// Problem has no feasible solution
    Infeasible,
    /// Objective can be improved infinitely
    Unbounded,
    /// The backend stopped before reaching a verdict (limits, cancellation)
    NotSolved,
    /// The backend reported something we cannot classify
    Undefined,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Infeasible => write!(f, "Infeasible"),
            SolutionStatus::Unbounded => write!(f, "Unbounded"),
            SolutionStatus::NotSolved => write!(f, "Not Solved"),
            SolutionStatus::Undefined => write!(f, "Undefined"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverBackend {
    /// Automatically select best compiled-in solver
    #[default]
    Auto,
    /// COIN-OR CBC solver
    #[serde(alias = "coin_cbc")]
    Cbc,
    /// HiGHS solver
    Highs,
    /// Pure-Rust MicroLP solver
    MicroLp,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::Cbc => write!(f, "COIN-OR CBC"),
            SolverBackend::Highs => write!(f, "HiGHS"),
            SolverBackend::MicroLp => write!(f, "MicroLP"),
        }
    }
}

impl std::str::FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SolverBackend::Auto),
            "cbc" | "coin_cbc" | "coin-cbc" => Ok(SolverBackend::Cbc),
            "highs" => Ok(SolverBackend::Highs),
            "microlp" => Ok(SolverBackend::MicroLp),
            other => Err(format!(
                "unknown solver backend '{}' (expected auto, cbc, highs or microlp)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("auto".parse::<SolverBackend>(), Ok(SolverBackend::Auto));
        assert_eq!("CBC".parse::<SolverBackend>(), Ok(SolverBackend::Cbc));
        assert_eq!("coin-cbc".parse::<SolverBackend>(), Ok(SolverBackend::Cbc));
        assert_eq!("HiGHS".parse::<SolverBackend>(), Ok(SolverBackend::Highs));
        assert_eq!("microlp".parse::<SolverBackend>(), Ok(SolverBackend::MicroLp));
        assert!("gurobi".parse::<SolverBackend>().is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolutionStatus::NotSolved.to_string(), "Not Solved");
        assert_eq!(SolutionStatus::Optimal.to_string(), "Optimal");
    }
}
