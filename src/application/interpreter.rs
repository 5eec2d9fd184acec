// Result Interpreter: maps solver values back to centers, zones and costs,
// then checks them against the equations that defined the model.

use crate::domain::{
    CflpError, DecisionModel, InconsistencyKind, Matrix, ProblemInstance, Result, Solution,
    SolutionDetails, SolutionInconsistency, SolutionReport,
};
use tracing::warn;

/// Relative tolerance used when none is configured
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Resolved binary values at or above this are read as "open"
const OPEN_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct ResultInterpreter {
    tolerance: f64,
}

impl Default for ResultInterpreter {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl ResultInterpreter {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Build the report of `solution`, a solve of `model`, itself built from `instance`
    ///
    /// Non-optimal statuses produce a report with no details. Disagreements
    /// between the values and the model end up in `report.warnings`; only a
    /// structural mismatch is an error.
    pub fn interpret(
        &self,
        instance: &ProblemInstance,
        model: &DecisionModel,
        solution: &Solution,
    ) -> Result<SolutionReport> {
        let layout = model.layout();
        if layout.num_centers != instance.num_centers() || layout.num_zones != instance.num_zones()
        {
            return Err(CflpError::InvalidInstance(format!(
                "model '{}' is {}x{} but the instance is {}x{}",
                model.name,
                layout.num_centers,
                layout.num_zones,
                instance.num_centers(),
                instance.num_zones()
            )));
        }

        if !solution.is_optimal() {
            return Ok(SolutionReport::without_details(
                instance.label(),
                solution.status,
                solution.message.clone(),
            ));
        }

        let values = &solution.variable_values;
        if values.len() != model.num_variables() {
            return Err(CflpError::SolveFailure(format!(
                "solver returned {} values for {} variables",
                values.len(),
                model.num_variables()
            )));
        }

        let n = layout.num_centers;
        let m = layout.num_zones;

        let open: Vec<bool> = (0..n)
            .map(|i| values[layout.open(i)] >= OPEN_THRESHOLD)
            .collect();

        let mut flows = Matrix::zeros(n, m);
        let mut center_outbound = vec![0.0; n];
        let mut zone_inbound = vec![0.0; m];
        let mut transport_cost_total = 0.0;

        for i in 0..n {
            for j in 0..m {
                let flow = values[layout.flow(i, j)];
                flows.set(i, j, flow);
                center_outbound[i] += flow;
                zone_inbound[j] += flow;
                transport_cost_total += flow * instance.transport_cost(i, j);
            }
        }

        let opening_cost_total: f64 = (0..n)
            .filter(|&i| open[i])
            .map(|i| instance.opening_cost(i))
            .sum();

        let recomputed = opening_cost_total + transport_cost_total;
        let objective_value = solution.objective_value.unwrap_or(recomputed);

        let mut warnings = Vec::new();

        if !self.close(objective_value, recomputed) {
            warnings.push(SolutionInconsistency {
                kind: InconsistencyKind::Objective,
                expected: recomputed,
                actual: objective_value,
            });
        }

        for (j, &inbound) in zone_inbound.iter().enumerate() {
            let demand = instance.demand(j);
            if !self.close(inbound, demand) {
                warnings.push(SolutionInconsistency {
                    kind: InconsistencyKind::ZoneDemand { zone: j },
                    expected: demand,
                    actual: inbound,
                });
            }
        }

        for (i, &outbound) in center_outbound.iter().enumerate() {
            if open[i] {
                let capacity = instance.capacity(i);
                if outbound > capacity && !self.close(outbound, capacity) {
                    warnings.push(SolutionInconsistency {
                        kind: InconsistencyKind::CenterCapacity { center: i },
                        expected: capacity,
                        actual: outbound,
                    });
                }
            } else if !self.close(outbound, 0.0) {
                warnings.push(SolutionInconsistency {
                    kind: InconsistencyKind::ClosedCenterFlow { center: i },
                    expected: 0.0,
                    actual: outbound,
                });
            }
        }

        for &i in instance.pre_opened() {
            if !open[i] {
                warnings.push(SolutionInconsistency {
                    kind: InconsistencyKind::ForcedOpen { center: i },
                    expected: 1.0,
                    actual: values[layout.open(i)],
                });
            }
        }

        for warning in &warnings {
            warn!(model = %model.name, "solution inconsistency: {}", warning);
        }

        Ok(SolutionReport {
            label: instance.label().to_string(),
            status: solution.status,
            details: Some(SolutionDetails {
                objective_value,
                open,
                flows,
                opening_cost_total,
                transport_cost_total,
                center_outbound,
                zone_inbound,
            }),
            warnings,
            message: solution.message.clone(),
        })
    }

    fn close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.tolerance * 1f64.max(a.abs()).max(b.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ModelBuilder;
    use crate::domain::SolutionStatus;

    fn instance() -> ProblemInstance {
        let costs = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        ProblemInstance::new(vec![0.0, 10.0], costs, vec![5.0, 5.0], vec![3.0, 4.0], [0])
            .unwrap()
            .with_label("tiny")
    }

    /// Values in model column order: Y1 Y2 X11 X12 X21 X22
    fn solution(values: Vec<f64>, objective: f64) -> Solution {
        Solution::optimal(objective, values)
    }

    #[test]
    fn test_consistent_solution() {
        let instance = instance();
        let model = ModelBuilder::build(&instance);
        // Center 1 is full at 5, center 2 takes the remaining 2 units of zone 2
        let sol = solution(vec![1.0, 1.0, 3.0, 2.0, 0.0, 2.0], 10.0 + 3.0 + 4.0 + 8.0);

        let report = ResultInterpreter::default()
            .interpret(&instance, &model, &sol)
            .unwrap();

        assert!(report.is_optimal());
        assert!(report.is_consistent(), "{:?}", report.warnings);
        let details = report.details.unwrap();
        assert_eq!(details.open, vec![true, true]);
        assert_eq!(details.opening_cost_total, 10.0);
        assert_eq!(details.transport_cost_total, 15.0);
        assert_eq!(details.center_outbound, vec![5.0, 2.0]);
        assert_eq!(details.zone_inbound, vec![3.0, 4.0]);
        assert_eq!(details.flows[(1, 1)], 2.0);
        assert_eq!(details.objective_value, 25.0);
    }

    #[test]
    fn test_open_threshold_tolerates_noise() {
        let instance = instance();
        let model = ModelBuilder::build(&instance);
        let sol = solution(vec![0.9999999, 1e-9, 3.0, 4.0, 0.0, 0.0], 11.0);

        let report = ResultInterpreter::default()
            .interpret(&instance, &model, &sol)
            .unwrap();
        assert_eq!(report.open_centers(), vec![0]);
    }

    #[test]
    fn test_inconsistencies_are_reported_not_fatal() {
        let instance = instance();
        let model = ModelBuilder::build(&instance);
        // Center 1 closed yet shipping, zone 2 short, center 1 over capacity,
        // objective off
        let sol = solution(vec![0.0, 0.0, 3.0, 3.5, 0.0, 0.0], 100.0);

        let report = ResultInterpreter::default()
            .interpret(&instance, &model, &sol)
            .unwrap();

        let kinds: Vec<InconsistencyKind> = report.warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&InconsistencyKind::Objective));
        assert!(kinds.contains(&InconsistencyKind::ZoneDemand { zone: 1 }));
        assert!(kinds.contains(&InconsistencyKind::ClosedCenterFlow { center: 0 }));
        assert!(kinds.contains(&InconsistencyKind::ForcedOpen { center: 0 }));
        assert!(!kinds.contains(&InconsistencyKind::ZoneDemand { zone: 0 }));
        assert!(report.details.is_some());
    }

    #[test]
    fn test_capacity_overflow_detected() {
        let instance = instance();
        let model = ModelBuilder::build(&instance);
        let sol = solution(vec![1.0, 0.0, 3.0, 4.0, 0.0, 0.0], 11.0);

        let report = ResultInterpreter::default()
            .interpret(&instance, &model, &sol)
            .unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            report.warnings[0].kind,
            InconsistencyKind::CenterCapacity { center: 0 }
        );
    }

    #[test]
    fn test_relative_tolerance() {
        let interpreter = ResultInterpreter::default();
        assert!(interpreter.close(1_000_000.0, 1_000_000.5));
        assert!(!interpreter.close(1_000_000.0, 1_000_002.0));
        assert!(interpreter.close(0.0, 1e-7));
    }

    #[test]
    fn test_non_optimal_has_no_details() {
        let instance = instance();
        let model = ModelBuilder::build(&instance);
        let sol = Solution::new(SolutionStatus::Infeasible, "infeasible");

        let report = ResultInterpreter::default()
            .interpret(&instance, &model, &sol)
            .unwrap();
        assert_eq!(report.status, SolutionStatus::Infeasible);
        assert!(report.details.is_none());
        assert!(report.warnings.is_empty());
        assert_eq!(report.label, "tiny");
    }

    #[test]
    fn test_value_count_mismatch_is_solve_failure() {
        let instance = instance();
        let model = ModelBuilder::build(&instance);
        let sol = solution(vec![1.0, 0.0], 0.0);

        let err = ResultInterpreter::default()
            .interpret(&instance, &model, &sol)
            .unwrap_err();
        assert!(err.is_solve_failure());
    }

    #[test]
    fn test_model_from_other_instance_rejected() {
        let costs = Matrix::from_rows(vec![vec![1.0]]).unwrap();
        let other = ProblemInstance::new(vec![0.0], costs, vec![1.0], vec![1.0], []).unwrap();
        let model = ModelBuilder::build(&other);
        let sol = solution(vec![1.0, 1.0], 1.0);

        let err = ResultInterpreter::default()
            .interpret(&instance(), &model, &sol)
            .unwrap_err();
        assert!(matches!(err, CflpError::InvalidInstance(_)));
    }
}
