// Mappers: Convert between gRPC protobuf types and domain models
// This keeps protobuf dependencies isolated from business logic (Dependency Inversion)

use crate::domain::{
    models::{OptionValue, SolverConfig},
    report::SolutionReport,
    value_objects::{SolutionStatus, SolverBackend},
    CflpError, Matrix, ProblemInstance,
};
use std::collections::BTreeSet;
use tonic::Status;

pub mod facility_location {
    tonic::include_proto!("facility_location");
}

use facility_location as proto;

/// Map domain errors to gRPC status codes
pub fn error_to_status(error: CflpError) -> Status {
    match error {
        CflpError::InvalidInstance(message) => Status::invalid_argument(message),
        CflpError::SolverNotAvailable(message) => Status::unavailable(message),
        other => Status::internal(other.to_string()),
    }
}

/// 1-based center numbers on the wire, 0-based indices in the domain
fn proto_to_center_indices(numbers: &[u32]) -> std::result::Result<BTreeSet<usize>, Box<Status>> {
    numbers
        .iter()
        .map(|&n| {
            if n == 0 {
                Err(Box::new(Status::invalid_argument(
                    "Center numbers are 1-based, got 0",
                )))
            } else {
                Ok(n as usize - 1)
            }
        })
        .collect()
}

/// Convert protobuf ProblemInstance to a validated domain ProblemInstance
pub fn proto_to_domain_instance(
    proto_instance: proto::ProblemInstance,
) -> std::result::Result<ProblemInstance, Box<Status>> {
    let pre_opened = proto_to_center_indices(&proto_instance.pre_opened)?;
    let rows = proto_instance
        .transport_costs
        .into_iter()
        .map(|row| row.costs)
        .collect();

    let transport_costs = Matrix::from_rows(rows).map_err(|e| Box::new(error_to_status(e)))?;
    let instance = ProblemInstance::new(
        proto_instance.opening_costs,
        transport_costs,
        proto_instance.capacities,
        proto_instance.demands,
        pre_opened,
    )
    .map_err(|e| Box::new(error_to_status(e)))?;

    Ok(instance.with_label(proto_instance.label))
}

/// Convert optional protobuf SolverConfig to the domain configuration
pub fn proto_to_domain_config(proto_config: Option<proto::SolverConfig>) -> SolverConfig {
    let Some(cfg) = proto_config else {
        return SolverConfig::default();
    };

    let backend = match proto::SolverBackend::try_from(cfg.backend) {
        Ok(proto::SolverBackend::Auto) => SolverBackend::Auto,
        Ok(proto::SolverBackend::CoinCbc) => SolverBackend::Cbc,
        Ok(proto::SolverBackend::Highs) => SolverBackend::Highs,
        Ok(proto::SolverBackend::MicroLp) => SolverBackend::MicroLp,
        Err(_) => SolverBackend::Auto,
    };

    SolverConfig {
        backend,
        time_limit: cfg.time_limit.filter(|t| *t > 0.0),
        verbose: cfg.verbose,
        options: cfg
            .options
            .iter()
            .map(|(name, value)| (name.clone(), OptionValue::parse(value)))
            .collect(),
    }
}

/// Convert an export request's override list, if any
pub fn proto_to_override(
    request: &proto::ExportRequest,
) -> std::result::Result<Option<BTreeSet<usize>>, Box<Status>> {
    if request.override_pre_opened {
        proto_to_center_indices(&request.pre_opened_override).map(Some)
    } else {
        Ok(None)
    }
}

fn domain_to_proto_status(status: SolutionStatus) -> proto::SolutionStatus {
    match status {
        SolutionStatus::Optimal => proto::SolutionStatus::Optimal,
        SolutionStatus::Infeasible => proto::SolutionStatus::Infeasible,
        SolutionStatus::Unbounded => proto::SolutionStatus::Unbounded,
        SolutionStatus::NotSolved => proto::SolutionStatus::NotSolved,
        SolutionStatus::Undefined => proto::SolutionStatus::Undefined,
    }
}

/// Convert domain SolutionReport to protobuf SolveResponse
pub fn domain_to_proto_report(
    report: SolutionReport,
    solver_name: &str,
    index: usize,
) -> proto::SolveResponse {
    let details = report.details.map(|d| proto::SolutionDetails {
        objective_value: d.objective_value,
        open: d.open,
        flows: d
            .flows
            .to_rows()
            .into_iter()
            .map(|flows| proto::FlowRow { flows })
            .collect(),
        opening_cost_total: d.opening_cost_total,
        transport_cost_total: d.transport_cost_total,
        center_outbound: d.center_outbound,
        zone_inbound: d.zone_inbound,
    });

    proto::SolveResponse {
        label: report.label,
        status: domain_to_proto_status(report.status) as i32,
        details,
        warnings: report.warnings.iter().map(ToString::to_string).collect(),
        message: report.message,
        solver_name: solver_name.to_string(),
        index: index as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proto_instance() -> proto::ProblemInstance {
        proto::ProblemInstance {
            label: "wire".to_string(),
            opening_costs: vec![0.0, 10.0],
            capacities: vec![5.0, 5.0],
            demands: vec![3.0],
            transport_costs: vec![
                proto::CostRow { costs: vec![1.0] },
                proto::CostRow { costs: vec![2.0] },
            ],
            pre_opened: vec![1],
        }
    }

    #[test]
    fn test_instance_mapping_converts_center_numbers() {
        let instance = proto_to_domain_instance(proto_instance()).unwrap();
        assert_eq!(instance.label(), "wire");
        assert!(instance.is_pre_opened(0));
        assert_eq!(instance.transport_cost(1, 0), 2.0);
    }

    #[test]
    fn test_zero_center_number_rejected() {
        let mut bad = proto_instance();
        bad.pre_opened = vec![0];
        let status = proto_to_domain_instance(bad).unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[test]
    fn test_negative_demand_is_invalid_argument() {
        let mut bad = proto_instance();
        bad.demands = vec![-1.0];
        let status = proto_to_domain_instance(bad).unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[test]
    fn test_config_mapping() {
        let mut options = std::collections::HashMap::new();
        options.insert("threads".to_string(), "2".to_string());
        let config = proto_to_domain_config(Some(proto::SolverConfig {
            backend: proto::SolverBackend::MicroLp as i32,
            time_limit: Some(0.0),
            verbose: true,
            options,
        }));

        assert_eq!(config.backend, SolverBackend::MicroLp);
        assert_eq!(config.time_limit, None);
        assert_eq!(config.options.get("threads"), Some(&OptionValue::Int(2)));
    }
}
