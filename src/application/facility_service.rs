// Use case: solve facility location instances end to end
// build → external solve → interpret, one independent model per instance

use super::interpreter::ResultInterpreter;
use super::model_builder::ModelBuilder;
use crate::domain::{
    CflpError, ProblemInstance, Result, SolutionReport, SolutionStatus, SolverConfig,
    SolverService,
};
use crate::solver::SolverFactory;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct FacilityLocationService {
    solver: Arc<dyn SolverService>,
    config: SolverConfig,
    interpreter: ResultInterpreter,
}

impl FacilityLocationService {
    pub fn new(solver: Arc<dyn SolverService>, config: SolverConfig) -> Self {
        Self {
            solver,
            config,
            interpreter: ResultInterpreter::default(),
        }
    }

    /// Pick the backend named by `config`
    pub fn from_config(config: SolverConfig) -> Result<Self> {
        let solver = SolverFactory::create_from_backend(config.backend)?;
        Ok(Self::new(solver, config))
    }

    pub fn with_interpreter(mut self, interpreter: ResultInterpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve one instance synchronously
    pub fn solve(&self, instance: &ProblemInstance) -> Result<SolutionReport> {
        let model = ModelBuilder::build(instance);

        info!(
            instance = instance.label(),
            solver = self.solver.name(),
            centers = instance.num_centers(),
            zones = instance.num_zones(),
            "solving facility location model"
        );

        let solution = self.solver.solve(&model, &self.config)?;
        let report = self.interpreter.interpret(instance, &model, &solution)?;

        info!(
            instance = instance.label(),
            status = %report.status,
            objective = ?report.objective_value(),
            elapsed_ms = solution.statistics.solve_time_ms,
            "solve finished"
        );

        Ok(report)
    }

    /// Solve independent instances in parallel, one blocking task each
    ///
    /// Results come back in input order. A cancelled task is reported as
    /// `NotSolved`; a panicked one as a solve failure.
    pub async fn solve_batch(&self, instances: Vec<ProblemInstance>) -> Vec<Result<SolutionReport>> {
        let tasks = instances.into_iter().map(|instance| {
            let service = self.clone();
            let label = instance.label().to_string();
            let handle = tokio::task::spawn_blocking(move || service.solve(&instance));

            async move {
                match handle.await {
                    Ok(result) => result,
                    Err(e) if e.is_cancelled() => {
                        warn!(instance = %label, "solve task cancelled");
                        Ok(SolutionReport::without_details(
                            label,
                            SolutionStatus::NotSolved,
                            "Solve was cancelled",
                        ))
                    }
                    Err(e) => Err(CflpError::SolveFailure(format!(
                        "solve task for '{}' panicked: {}",
                        label, e
                    ))),
                }
            }
        });

        join_all(tasks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DecisionModel, Matrix, Solution};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns every model's values as "everything from center 1", counting calls
    struct FirstCenterSolver {
        calls: AtomicUsize,
    }

    impl SolverService for FirstCenterSolver {
        fn solve(&self, model: &DecisionModel, _config: &SolverConfig) -> Result<Solution> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let layout = model.layout();
            let mut values = vec![0.0; model.num_variables()];
            values[layout.open(0)] = 1.0;
            for c in model.constraints.iter() {
                if let crate::domain::ConstraintRole::Demand { zone } = c.role {
                    values[layout.flow(0, zone)] = c.bound;
                }
            }
            let objective = model.objective.evaluate(&values);
            Ok(Solution::optimal(objective, values))
        }

        fn name(&self) -> &str {
            "first-center"
        }

        fn supports_mip(&self) -> bool {
            true
        }
    }

    struct FailingSolver;

    impl SolverService for FailingSolver {
        fn solve(&self, _model: &DecisionModel, _config: &SolverConfig) -> Result<Solution> {
            Err(CflpError::SolverNotAvailable("backend offline".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn supports_mip(&self) -> bool {
            true
        }
    }

    fn instance(label: &str, demand: f64) -> ProblemInstance {
        let costs = Matrix::from_rows(vec![vec![2.0], vec![1.0]]).unwrap();
        ProblemInstance::new(vec![5.0, 7.0], costs, vec![100.0, 100.0], vec![demand], [0])
            .unwrap()
            .with_label(label)
    }

    #[test]
    fn test_solve_runs_builder_solver_and_interpreter() {
        let solver = Arc::new(FirstCenterSolver {
            calls: AtomicUsize::new(0),
        });
        let service = FacilityLocationService::new(solver.clone(), SolverConfig::default());

        let report = service.solve(&instance("one", 10.0)).unwrap();

        assert_eq!(solver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.solver_name(), "first-center");
        assert!(report.is_consistent());
        assert_eq!(report.label, "one");
        assert_eq!(report.open_centers(), vec![0]);
        assert_eq!(report.objective_value(), Some(5.0 + 20.0));
    }

    #[test]
    fn test_solver_failure_is_propagated() {
        let service = FacilityLocationService::new(Arc::new(FailingSolver), SolverConfig::default());
        let err = service.solve(&instance("x", 1.0)).unwrap_err();
        assert!(err.is_solve_failure());
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order() {
        let solver = Arc::new(FirstCenterSolver {
            calls: AtomicUsize::new(0),
        });
        let service = FacilityLocationService::new(solver.clone(), SolverConfig::default());

        let instances = vec![instance("a", 1.0), instance("b", 2.0), instance("c", 3.0)];
        let reports = service.solve_batch(instances).await;

        assert_eq!(solver.calls.load(Ordering::SeqCst), 3);
        let labels: Vec<String> = reports
            .into_iter()
            .map(|r| r.unwrap().label)
            .collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }
}
