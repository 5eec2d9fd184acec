// Domain module: Business logic and models

pub mod instance;
pub mod matrix;
pub mod models;
pub mod report;
pub mod solver_service;
pub mod value_objects;

pub use instance::*;
pub use matrix::*;
pub use models::*;
pub use report::*;
pub use solver_service::*;
pub use value_objects::*;
