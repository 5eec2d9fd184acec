// Domain layer: Business logic and rules
pub mod domain;

// Application layer: Model building, export, result interpretation
pub mod application;

// Infrastructure layer: External concerns (logging, scenario files, gRPC server)
pub mod infrastructure;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    CflpError, Constraint, ConstraintRole, ConstraintType, DecisionModel, InconsistencyKind,
    Matrix, OptimizationType, OptionValue, ProblemInstance, Result, Solution, SolutionDetails,
    SolutionInconsistency, SolutionReport, SolutionStatus, SolverBackend, SolverConfig,
    SolverService, Variable, VariableLayout, VariableType,
};

pub use application::{
    FacilityLocationService, LindoExporter, ModelBuilder, ResultInterpreter, DEFAULT_TOLERANCE,
};

pub use infrastructure::{init_logger, Scenario, ScenarioError};

#[cfg(feature = "server")]
pub use application::GrpcFacilityLocationService;

#[cfg(feature = "server")]
pub use infrastructure::{start_server, ServerConfig};

pub use solver::SolverFactory;

#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
#[cfg(feature = "microlp")]
pub use solver::MicroLpSolver;
