use super::matrix::Matrix;
use super::solver_service::{CflpError, Result};
use std::collections::BTreeSet;

/// Raw data of one capacitated facility location problem
///
/// Centers are the rows of the transport cost matrix, zones its columns.
/// All indices are 0-based; the 1-based numbering only appears in names.
/// Construction validates sizes, indices and signs, so every accessor below
/// can index without further checks.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    label: String,
    opening_costs: Vec<f64>,
    transport_costs: Matrix,
    capacities: Vec<f64>,
    demands: Vec<f64>,
    pre_opened: BTreeSet<usize>,
}

impl ProblemInstance {
    pub fn new(
        opening_costs: Vec<f64>,
        transport_costs: Matrix,
        capacities: Vec<f64>,
        demands: Vec<f64>,
        pre_opened: impl IntoIterator<Item = usize>,
    ) -> Result<Self> {
        let num_centers = opening_costs.len();
        let num_zones = demands.len();

        if num_centers == 0 {
            return Err(invalid("instance must have at least one center"));
        }
        if num_zones == 0 {
            return Err(invalid("instance must have at least one zone"));
        }
        if capacities.len() != num_centers {
            return Err(invalid(format!(
                "{} capacities given for {} centers",
                capacities.len(),
                num_centers
            )));
        }
        if transport_costs.rows() != num_centers || transport_costs.cols() != num_zones {
            return Err(invalid(format!(
                "transport cost matrix is {}x{}, expected {}x{}",
                transport_costs.rows(),
                transport_costs.cols(),
                num_centers,
                num_zones
            )));
        }

        check_non_negative("opening cost", &opening_costs)?;
        check_non_negative("capacity", &capacities)?;
        check_non_negative("demand", &demands)?;
        for i in 0..num_centers {
            for (j, &cost) in transport_costs.row(i).iter().enumerate() {
                if !cost.is_finite() || cost < 0.0 {
                    return Err(invalid(format!(
                        "transport cost from center {} to zone {} must be a non-negative number, got {}",
                        i + 1,
                        j + 1,
                        cost
                    )));
                }
            }
        }

        let pre_opened: BTreeSet<usize> = pre_opened.into_iter().collect();
        check_centers(&pre_opened, num_centers)?;

        Ok(Self {
            label: String::new(),
            opening_costs,
            transport_costs,
            capacities,
            demands,
            pre_opened,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn num_centers(&self) -> usize {
        self.opening_costs.len()
    }

    pub fn num_zones(&self) -> usize {
        self.demands.len()
    }

    pub fn opening_cost(&self, center: usize) -> f64 {
        self.opening_costs[center]
    }

    pub fn opening_costs(&self) -> &[f64] {
        &self.opening_costs
    }

    pub fn transport_cost(&self, center: usize, zone: usize) -> f64 {
        self.transport_costs[(center, zone)]
    }

    pub fn transport_costs(&self) -> &Matrix {
        &self.transport_costs
    }

    pub fn capacity(&self, center: usize) -> f64 {
        self.capacities[center]
    }

    pub fn capacities(&self) -> &[f64] {
        &self.capacities
    }

    pub fn demand(&self, zone: usize) -> f64 {
        self.demands[zone]
    }

    pub fn demands(&self) -> &[f64] {
        &self.demands
    }

    pub fn pre_opened(&self) -> &BTreeSet<usize> {
        &self.pre_opened
    }

    pub fn is_pre_opened(&self, center: usize) -> bool {
        self.pre_opened.contains(&center)
    }

    pub fn total_capacity(&self) -> f64 {
        self.capacities.iter().sum()
    }

    pub fn total_demand(&self) -> f64 {
        self.demands.iter().sum()
    }
}

/// Reject center indices outside `0..num_centers`
pub(crate) fn check_centers(centers: &BTreeSet<usize>, num_centers: usize) -> Result<()> {
    match centers.iter().find(|&&c| c >= num_centers) {
        Some(&c) => Err(invalid(format!(
            "pre-opened center {} does not exist (instance has {} centers)",
            c + 1,
            num_centers
        ))),
        None => Ok(()),
    }
}

fn check_non_negative(field: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        Some(i) => Err(invalid(format!(
            "{} {} must be a non-negative number, got {}",
            field,
            i + 1,
            values[i]
        ))),
        None => Ok(()),
    }
}

fn invalid(message: impl Into<String>) -> CflpError {
    CflpError::InvalidInstance(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn costs() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap()
    }

    #[test]
    fn test_valid_instance() {
        let instance =
            ProblemInstance::new(vec![0.0, 10.0], costs(), vec![5.0, 5.0], vec![3.0, 4.0], [0])
                .unwrap()
                .with_label("small");

        assert_eq!(instance.label(), "small");
        assert_eq!(instance.num_centers(), 2);
        assert_eq!(instance.num_zones(), 2);
        assert_eq!(instance.transport_cost(1, 0), 3.0);
        assert_eq!(instance.total_capacity(), 10.0);
        assert_eq!(instance.total_demand(), 7.0);
        assert!(instance.is_pre_opened(0));
        assert!(!instance.is_pre_opened(1));
    }

    #[test]
    fn test_negative_demand_rejected() {
        let err = ProblemInstance::new(vec![0.0, 10.0], costs(), vec![5.0, 5.0], vec![3.0, -4.0], [])
            .unwrap_err();
        match err {
            CflpError::InvalidInstance(message) => assert!(message.contains("demand 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_transport_cost_rejected() {
        let bad = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, -0.5]]).unwrap();
        let err = ProblemInstance::new(vec![0.0, 10.0], bad, vec![5.0, 5.0], vec![3.0, 4.0], [])
            .unwrap_err();
        assert!(matches!(err, CflpError::InvalidInstance(_)));
    }

    #[test]
    fn test_nan_capacity_rejected() {
        let err =
            ProblemInstance::new(vec![0.0, 10.0], costs(), vec![f64::NAN, 5.0], vec![3.0, 4.0], [])
                .unwrap_err();
        assert!(matches!(err, CflpError::InvalidInstance(_)));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        assert!(ProblemInstance::new(vec![0.0], costs(), vec![5.0], vec![3.0, 4.0], []).is_err());
        assert!(
            ProblemInstance::new(vec![0.0, 1.0], costs(), vec![5.0], vec![3.0, 4.0], []).is_err()
        );
        assert!(
            ProblemInstance::new(vec![0.0, 1.0], costs(), vec![5.0, 5.0], vec![3.0], []).is_err()
        );
    }

    #[test]
    fn test_pre_opened_out_of_range_rejected() {
        let err = ProblemInstance::new(vec![0.0, 10.0], costs(), vec![5.0, 5.0], vec![3.0, 4.0], [2])
            .unwrap_err();
        match err {
            CflpError::InvalidInstance(message) => assert!(message.contains("center 3")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_insufficient_capacity_is_not_an_error() {
        let instance =
            ProblemInstance::new(vec![0.0, 10.0], costs(), vec![1.0, 1.0], vec![3.0, 4.0], []);
        assert!(instance.is_ok());
    }
}
