// Scenario files: one or more instances plus solver settings, in TOML
//
//   [solver]
//   backend = "auto"
//
//   [[instances]]
//   label = "fuel-a"
//   opening_costs = [0, 500000, 450000]
//   capacities = [50, 75, 85]
//   demands = [16, 20, 12, 18, 14]
//   pre_opened = [1]                       # 1-based center numbers
//   transport_costs = [[60, 65, 78, 67, 84], ...]

use crate::domain::{CflpError, Matrix, ProblemInstance, SolverConfig};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scenario parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Instance '{label}': {source}")]
    Instance {
        label: String,
        #[source]
        source: CflpError,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    solver: SolverConfig,
    #[serde(default)]
    instances: Vec<InstanceData>,
}

#[derive(Debug, Clone, Deserialize)]
struct InstanceData {
    label: String,
    opening_costs: Vec<f64>,
    capacities: Vec<f64>,
    demands: Vec<f64>,
    transport_costs: Vec<Vec<f64>>,
    #[serde(default)]
    pre_opened: Vec<usize>,
}

impl InstanceData {
    fn into_instance(self) -> Result<ProblemInstance, ScenarioError> {
        let label = self.label;
        let wrap = |source: CflpError| ScenarioError::Instance {
            label: label.clone(),
            source,
        };

        let pre_opened = self
            .pre_opened
            .iter()
            .map(|&number| {
                number.checked_sub(1).ok_or_else(|| {
                    CflpError::InvalidInstance("center numbers are 1-based, got 0".to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(wrap)?;

        let transport_costs = Matrix::from_rows(self.transport_costs).map_err(wrap)?;
        let instance = ProblemInstance::new(
            self.opening_costs,
            transport_costs,
            self.capacities,
            self.demands,
            pre_opened,
        )
        .map_err(wrap)?;

        Ok(instance.with_label(label))
    }
}

/// Validated contents of a scenario file
#[derive(Debug, Clone)]
pub struct Scenario {
    pub solver: SolverConfig,
    pub instances: Vec<ProblemInstance>,
}

impl Scenario {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = toml::from_str(content)?;
        let instances = file
            .instances
            .into_iter()
            .map(InstanceData::into_instance)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            solver: file.solver,
            instances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OptionValue, SolverBackend};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = r#"
[solver]
backend = "microlp"
time_limit = 30.0

[solver.options]
threads = 2
presolve = "off"

[[instances]]
label = "fuel-a"
opening_costs = [0, 500000, 450000]
capacities = [50, 75, 85]
demands = [16, 20, 12, 18, 14]
pre_opened = [1]
transport_costs = [
    [60, 65, 78, 67, 84],
    [45, 54, 76, 53, 32],
    [31, 43, 54, 65, 72],
]
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();

        assert_eq!(scenario.solver.backend, SolverBackend::MicroLp);
        assert_eq!(scenario.solver.time_limit, Some(30.0));
        assert_eq!(scenario.solver.options.get("threads"), Some(&OptionValue::Int(2)));
        assert_eq!(
            scenario.solver.options.get("presolve"),
            Some(&OptionValue::Text("off".to_string()))
        );

        assert_eq!(scenario.instances.len(), 1);
        let instance = &scenario.instances[0];
        assert_eq!(instance.label(), "fuel-a");
        assert_eq!(instance.num_centers(), 3);
        assert_eq!(instance.num_zones(), 5);
        assert!(instance.is_pre_opened(0));
        assert_eq!(instance.transport_cost(2, 0), 31.0);
    }

    #[test]
    fn test_solver_table_is_optional() {
        let scenario = Scenario::from_toml_str(
            r#"
[[instances]]
label = "x"
opening_costs = [1]
capacities = [1]
demands = [1]
transport_costs = [[1]]
"#,
        )
        .unwrap();
        assert_eq!(scenario.solver.backend, SolverBackend::Auto);
        assert!(scenario.instances[0].pre_opened().is_empty());
    }

    #[test]
    fn test_invalid_instance_names_label() {
        let err = Scenario::from_toml_str(
            r#"
[[instances]]
label = "broken"
opening_costs = [1]
capacities = [1]
demands = [-1]
transport_costs = [[1]]
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ScenarioError::Instance { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_zero_center_number_rejected() {
        let err = Scenario::from_toml_str(
            r#"
[[instances]]
label = "zero"
opening_costs = [1]
capacities = [1]
demands = [1]
pre_opened = [0]
transport_costs = [[1]]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::Instance { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCENARIO.as_bytes()).unwrap();

        let scenario = Scenario::from_file(file.path()).unwrap();
        assert_eq!(scenario.instances.len(), 1);
    }

    #[test]
    fn test_malformed_toml() {
        let err = Scenario::from_toml_str("instances = 3").unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }
}
