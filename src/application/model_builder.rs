// Model Builder: turns raw facility location data into a mixed-integer program
//
//   min  Σ_i f_i·y_i + Σ_i Σ_j c_ij·x_ij
//   s.t. Σ_j x_ij - a_i·y_i ≤ 0      ∀ i   (capacity)
//        Σ_i x_ij = b_j              ∀ j   (demand)
//        y_i = 1                     ∀ i pre-opened
//        x_ij ≥ 0, y_i ∈ {0, 1}

use crate::domain::{
    Constraint, ConstraintRole, ConstraintType, DecisionModel, ProblemInstance, VariableLayout,
};
use tracing::debug;

pub struct ModelBuilder;

impl ModelBuilder {
    /// Build the decision model of `instance`
    ///
    /// Construction never fails: the instance is validated when it is created,
    /// and an instance whose open capacity cannot cover demand is a solve-time
    /// `Infeasible`, not a build error.
    pub fn build(instance: &ProblemInstance) -> DecisionModel {
        let layout = VariableLayout::new(instance.num_centers(), instance.num_zones());
        let mut model = DecisionModel::new(model_name(instance), layout);

        // Zero opening costs stay in the sum as 0·y_i
        for i in 0..layout.num_centers {
            model.objective.coefficients[layout.open(i)] = instance.opening_cost(i);
            for j in 0..layout.num_zones {
                model.objective.coefficients[layout.flow(i, j)] = instance.transport_cost(i, j);
            }
        }

        // The big-M of each capacity row is the center's own capacity
        for i in 0..layout.num_centers {
            let mut terms: Vec<(usize, f64)> = (0..layout.num_zones)
                .map(|j| (layout.flow(i, j), 1.0))
                .collect();
            terms.push((layout.open(i), -instance.capacity(i)));

            model.constraints.push(Constraint::new(
                ConstraintRole::Capacity { center: i },
                ConstraintType::LessThanOrEqual,
                terms,
                0.0,
            ));
        }

        for j in 0..layout.num_zones {
            let terms = (0..layout.num_centers)
                .map(|i| (layout.flow(i, j), 1.0))
                .collect();

            model.constraints.push(Constraint::new(
                ConstraintRole::Demand { zone: j },
                ConstraintType::Equal,
                terms,
                instance.demand(j),
            ));
        }

        // Explicit rows rather than tightened bounds, so they show up in the constraint set
        for &i in instance.pre_opened() {
            model.constraints.push(Constraint::new(
                ConstraintRole::ForcedOpen { center: i },
                ConstraintType::Equal,
                vec![(layout.open(i), 1.0)],
                1.0,
            ));
        }

        if instance.total_capacity() < instance.total_demand() {
            debug!(
                "total capacity {} is below total demand {}, expect an infeasible model",
                instance.total_capacity(),
                instance.total_demand()
            );
        }

        debug!(
            model = %model.name,
            variables = model.num_variables(),
            binaries = model.num_binary_variables(),
            constraints = model.num_constraints(),
            "built facility location model"
        );

        model
    }
}

fn model_name(instance: &ProblemInstance) -> String {
    if instance.label().is_empty() {
        "cflp".to_string()
    } else {
        instance.label().to_string()
    }
}
