// Application layer: facility location use cases

pub mod facility_service;
pub mod interpreter;
pub mod lindo_export;
pub mod model_builder;

#[cfg(feature = "server")]
pub mod grpc_service;
#[cfg(feature = "server")]
pub mod mappers;

pub use facility_service::FacilityLocationService;
pub use interpreter::{ResultInterpreter, DEFAULT_TOLERANCE};
pub use lindo_export::LindoExporter;
pub use model_builder::ModelBuilder;

#[cfg(feature = "server")]
pub use grpc_service::GrpcFacilityLocationService;
