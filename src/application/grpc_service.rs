use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use super::mappers::{self, facility_location as proto};
use super::{FacilityLocationService, LindoExporter};
use crate::domain::SolverConfig;
use crate::solver::SolverFactory;

/// gRPC service implementation
pub struct GrpcFacilityLocationService {
    default_config: SolverConfig,
}

impl GrpcFacilityLocationService {
    pub fn new(default_config: SolverConfig) -> Self {
        Self { default_config }
    }

    /// Request configuration wins over the server default
    fn service_for(
        &self,
        config: Option<proto::SolverConfig>,
    ) -> Result<FacilityLocationService, Status> {
        let config = match config {
            Some(cfg) => mappers::proto_to_domain_config(Some(cfg)),
            None => self.default_config.clone(),
        };
        FacilityLocationService::from_config(config).map_err(mappers::error_to_status)
    }
}

impl Default for GrpcFacilityLocationService {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

#[tonic::async_trait]
impl proto::facility_location_solver_server::FacilityLocationSolver
    for GrpcFacilityLocationService
{
    type SolveBatchStream = ReceiverStream<Result<proto::SolveResponse, Status>>;

    async fn solve(
        &self,
        request: Request<proto::SolveRequest>,
    ) -> Result<Response<proto::SolveResponse>, Status> {
        let request = request.into_inner();
        let proto_instance = request
            .instance
            .ok_or_else(|| Status::invalid_argument("Instance is required"))?;

        let instance = mappers::proto_to_domain_instance(proto_instance).map_err(|e| *e)?;
        let service = self.service_for(request.solver_config)?;
        let solver_name = service.solver_name().to_string();

        info!(instance = instance.label(), solver = %solver_name, "solve requested");

        let report = tokio::task::spawn_blocking(move || service.solve(&instance))
            .await
            .map_err(|e| Status::internal(format!("Solve task failed: {}", e)))?
            .map_err(mappers::error_to_status)?;

        Ok(Response::new(mappers::domain_to_proto_report(
            report,
            &solver_name,
            0,
        )))
    }

    async fn solve_batch(
        &self,
        request: Request<proto::BatchRequest>,
    ) -> Result<Response<Self::SolveBatchStream>, Status> {
        let request = request.into_inner();
        let service = self.service_for(request.solver_config)?;

        let instances = request
            .instances
            .into_iter()
            .map(mappers::proto_to_domain_instance)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| *e)?;

        info!(
            instances = instances.len(),
            solver = service.solver_name(),
            "batch solve requested"
        );

        let (tx, rx) = mpsc::channel(instances.len().max(1));

        for (index, instance) in instances.into_iter().enumerate() {
            let service = service.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let solver_name = service.solver_name().to_string();
                let outcome = tokio::task::spawn_blocking(move || service.solve(&instance)).await;

                let response = match outcome {
                    Ok(Ok(report)) => Ok(mappers::domain_to_proto_report(
                        report,
                        &solver_name,
                        index,
                    )),
                    Ok(Err(e)) => Err(mappers::error_to_status(e)),
                    Err(e) => Err(Status::internal(format!("Solve task failed: {}", e))),
                };

                if tx.send(response).await.is_err() {
                    warn!(index, "client went away before the batch finished");
                }
            });
        }

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn export(
        &self,
        request: Request<proto::ExportRequest>,
    ) -> Result<Response<proto::ExportResponse>, Status> {
        let request = request.into_inner();
        let pre_opened_override = mappers::proto_to_override(&request).map_err(|e| *e)?;
        let proto_instance = request
            .instance
            .ok_or_else(|| Status::invalid_argument("Instance is required"))?;
        let instance = mappers::proto_to_domain_instance(proto_instance).map_err(|e| *e)?;

        let label = if instance.label().is_empty() {
            "cflp"
        } else {
            instance.label()
        };

        let text = LindoExporter::export(&instance, pre_opened_override.as_ref(), label)
            .map_err(mappers::error_to_status)?;

        Ok(Response::new(proto::ExportResponse { text }))
    }

    async fn get_available_solvers(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::AvailableSolvers>, Status> {
        let solvers = SolverFactory::available_backends()
            .into_iter()
            .filter_map(|backend| SolverFactory::create_from_backend(backend).ok())
            .map(|solver| proto::SolverInfo {
                name: solver.name().to_string(),
                supports_mip: solver.supports_mip(),
            })
            .collect();

        Ok(Response::new(proto::AvailableSolvers { solvers }))
    }
}
