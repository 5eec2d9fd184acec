// Infrastructure layer: logging, scenario files, gRPC server

pub mod logging;
pub mod scenario;
#[cfg(feature = "server")]
pub mod server;

pub use logging::init_logger;
pub use scenario::{Scenario, ScenarioError};
#[cfg(feature = "server")]
pub use server::{start_server, ServerConfig};
