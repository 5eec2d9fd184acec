// Infrastructure: gRPC server setup and configuration

use std::net::SocketAddr;
use tonic::transport::Server;
use tracing::info;

use crate::application::mappers::facility_location::facility_location_solver_server::FacilityLocationSolverServer;
use crate::application::GrpcFacilityLocationService;
use crate::domain::SolverConfig;
use crate::solver::SolverFactory;

pub struct ServerConfig {
    pub address: SocketAddr,
    /// Used for requests that carry no solver configuration
    pub solver_config: SolverConfig,
}

impl ServerConfig {
    pub fn new(address: SocketAddr, solver_config: SolverConfig) -> Self {
        Self {
            address,
            solver_config,
        }
    }
}

pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Fail at startup rather than on the first request
    let default_solver = SolverFactory::create_from_backend(config.solver_config.backend)?;

    info!(
        address = %config.address,
        default_solver = default_solver.name(),
        backends = ?SolverFactory::available_backends(),
        "facility location solver listening"
    );

    let service = GrpcFacilityLocationService::new(config.solver_config);

    Server::builder()
        .add_service(FacilityLocationSolverServer::new(service))
        .serve(config.address)
        .await?;

    Ok(())
}
