use super::value_objects::{
    ConstraintType, OptimizationType, SolutionStatus, SolverBackend, VariableType,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Decision variable in an optimization problem
#[derive(Debug, Clone)]
pub struct Variable {
    pub variable_type: VariableType,
    pub lower_bound: f64,
    pub upper_bound: Option<f64>,
    pub name: String,
}

impl Variable {
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Continuous,
            lower_bound: 0.0,
            upper_bound: None,
            name: name.into(),
        }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            variable_type: VariableType::Binary,
            lower_bound: 0.0,
            upper_bound: Some(1.0),
            name: name.into(),
        }
    }

    pub fn is_integer(&self) -> bool {
        self.variable_type == VariableType::Binary
    }
}

/// Objective function to minimize or maximize
///
/// Dense: one coefficient per model column, zeros included.
#[derive(Debug, Clone)]
pub struct ObjectiveFunction {
    pub optimization_type: OptimizationType,
    pub coefficients: Vec<f64>,
}

impl ObjectiveFunction {
    pub fn minimize(num_variables: usize) -> Self {
        Self {
            optimization_type: OptimizationType::Minimize,
            coefficients: vec![0.0; num_variables],
        }
    }

    pub fn num_variables(&self) -> usize {
        self.coefficients.len()
    }

    /// Value of the objective at `values`
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coeff, value)| coeff * value)
            .sum()
    }
}

/// What a constraint stands for in the facility location model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintRole {
    /// Σ_j flow[i][j] - capacity[i] · open[i] ≤ 0
    Capacity { center: usize },
    /// Σ_i flow[i][j] = demand[j]
    Demand { zone: usize },
    /// open[i] = 1
    ForcedOpen { center: usize },
}

impl fmt::Display for ConstraintRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintRole::Capacity { center } => write!(f, "capacity_c{}", center + 1),
            ConstraintRole::Demand { zone } => write!(f, "demand_z{}", zone + 1),
            ConstraintRole::ForcedOpen { center } => write!(f, "pre_opened_c{}", center + 1),
        }
    }
}

/// Sparse linear constraint: Σ coeff · x[index] (≤ | = | ≥) bound
#[derive(Debug, Clone)]
pub struct Constraint {
    pub constraint_type: ConstraintType,
    pub terms: Vec<(usize, f64)>,
    pub bound: f64,
    pub name: String,
    pub role: ConstraintRole,
}

impl Constraint {
    pub fn new(
        role: ConstraintRole,
        constraint_type: ConstraintType,
        terms: Vec<(usize, f64)>,
        bound: f64,
    ) -> Self {
        Self {
            constraint_type,
            terms,
            bound,
            name: role.to_string(),
            role,
        }
    }

    /// Left-hand side at `values`
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(index, coeff)| coeff * values.get(index).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Column numbering of a facility location model
///
/// Open variables come first (one per center), followed by the flow
/// variables in center-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLayout {
    pub num_centers: usize,
    pub num_zones: usize,
}

impl VariableLayout {
    pub fn new(num_centers: usize, num_zones: usize) -> Self {
        Self {
            num_centers,
            num_zones,
        }
    }

    pub fn open(&self, center: usize) -> usize {
        center
    }

    pub fn flow(&self, center: usize, zone: usize) -> usize {
        self.num_centers + center * self.num_zones + zone
    }

    pub fn num_variables(&self) -> usize {
        self.num_centers + self.num_centers * self.num_zones
    }
}

/// Mixed-integer program derived from a [`ProblemInstance`](super::ProblemInstance)
///
/// Owns every variable and constraint. Handed by reference to a
/// [`SolverService`](super::SolverService); nothing mutates it after that.
#[derive(Debug, Clone)]
pub struct DecisionModel {
    pub name: String,
    pub objective: ObjectiveFunction,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    layout: VariableLayout,
}

impl DecisionModel {
    /// Empty model with every variable declared and a zero objective
    pub fn new(name: impl Into<String>, layout: VariableLayout) -> Self {
        let mut variables = Vec::with_capacity(layout.num_variables());
        for i in 0..layout.num_centers {
            variables.push(Variable::binary(format!("Y{}", i + 1)));
        }
        for i in 0..layout.num_centers {
            for j in 0..layout.num_zones {
                variables.push(Variable::continuous(format!("X{}{}", i + 1, j + 1)));
            }
        }

        Self {
            name: name.into(),
            objective: ObjectiveFunction::minimize(layout.num_variables()),
            constraints: Vec::new(),
            variables,
            layout,
        }
    }

    pub fn layout(&self) -> VariableLayout {
        self.layout
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_binary_variables(&self) -> usize {
        self.variables.iter().filter(|v| v.is_integer()).count()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints_with_role<'a>(
        &'a self,
        matches: impl Fn(&ConstraintRole) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Constraint> + 'a {
        self.constraints.iter().filter(move |c| matches(&c.role))
    }
}

/// Backend option value, forwarded without interpretation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl OptionValue {
    /// Best-effort typing of a textual option (gRPC and CLI hand us strings)
    pub fn parse(raw: &str) -> Self {
        if let Ok(b) = raw.parse::<bool>() {
            OptionValue::Bool(b)
        } else if let Ok(i) = raw.parse::<i64>() {
            OptionValue::Int(i)
        } else if let Ok(f) = raw.parse::<f64>() {
            OptionValue::Float(f)
        } else {
            OptionValue::Text(raw.to_string())
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::Float(x) => write!(f, "{}", x),
            OptionValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Configuration for the solver, passed explicitly to every solve
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub time_limit: Option<f64>,
    pub verbose: bool,
    pub options: BTreeMap<String, OptionValue>,
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(name.into(), value);
        self
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub solve_time_ms: f64,
    pub num_variables: u32,
    pub num_constraints: u32,
    pub num_binary_vars: u32,
}

impl SolverStatistics {
    pub fn for_model(model: &DecisionModel) -> Self {
        Self {
            solve_time_ms: 0.0,
            num_variables: model.num_variables() as u32,
            num_constraints: model.num_constraints() as u32,
            num_binary_vars: model.num_binary_variables() as u32,
        }
    }
}

/// Raw outcome of a solve: one value per model column plus a status
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub variable_values: Vec<f64>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl Solution {
    pub fn new(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            variable_values: Vec::new(),
            message: message.into(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn optimal(value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            objective_value: Some(value),
            variable_values,
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}
