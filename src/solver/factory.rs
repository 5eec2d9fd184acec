use crate::domain::{
    solver_service::{CflpError, Result, SolverService},
    value_objects::SolverBackend,
};
use std::sync::Arc;

#[cfg(feature = "cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
#[cfg(feature = "microlp")]
use crate::solver::MicroLpSolver;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver for a specific backend
    ///
    /// `Auto` picks the first compiled-in backend among HiGHS, CBC and MicroLP.
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Self::default_solver(),
            SolverBackend::Cbc => Self::cbc(),
            SolverBackend::Highs => Self::highs(),
            SolverBackend::MicroLp => Self::microlp(),
        }
    }

    /// Get the preferred compiled-in solver
    pub fn default_solver() -> Result<Arc<dyn SolverService>> {
        Self::highs()
            .or_else(|_| Self::cbc())
            .or_else(|_| Self::microlp())
            .map_err(|_| {
                CflpError::SolverNotAvailable(
                    "no solver backend compiled in (enable one of: highs, cbc, microlp)"
                        .to_string(),
                )
            })
    }

    /// Every backend compiled into this build
    pub fn available_backends() -> Vec<SolverBackend> {
        [SolverBackend::Highs, SolverBackend::Cbc, SolverBackend::MicroLp]
            .into_iter()
            .filter(|&backend| Self::create_from_backend(backend).is_ok())
            .collect()
    }

    fn highs() -> Result<Arc<dyn SolverService>> {
        #[cfg(feature = "highs")]
        {
            Ok(Arc::new(HighsSolver::new()))
        }
        #[cfg(not(feature = "highs"))]
        {
            Err(not_compiled(SolverBackend::Highs, "highs"))
        }
    }

    fn cbc() -> Result<Arc<dyn SolverService>> {
        #[cfg(feature = "cbc")]
        {
            Ok(Arc::new(CoinCbcSolver::new()))
        }
        #[cfg(not(feature = "cbc"))]
        {
            Err(not_compiled(SolverBackend::Cbc, "cbc"))
        }
    }

    fn microlp() -> Result<Arc<dyn SolverService>> {
        #[cfg(feature = "microlp")]
        {
            Ok(Arc::new(MicroLpSolver::new()))
        }
        #[cfg(not(feature = "microlp"))]
        {
            Err(not_compiled(SolverBackend::MicroLp, "microlp"))
        }
    }
}

#[allow(dead_code)]
fn not_compiled(backend: SolverBackend, feature: &str) -> CflpError {
    CflpError::SolverNotAvailable(format!(
        "{} backend is not compiled in (enable the '{}' feature)",
        backend, feature
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_backends_can_be_created() {
        for backend in SolverFactory::available_backends() {
            let solver = SolverFactory::create_from_backend(backend).unwrap();
            assert_eq!(solver.name(), backend.to_string());
            assert!(solver.supports_mip());
        }
    }

    #[cfg(feature = "microlp")]
    #[test]
    fn test_microlp_available() {
        assert!(SolverFactory::available_backends().contains(&SolverBackend::MicroLp));
        assert!(SolverFactory::default_solver().is_ok());
    }

    #[cfg(not(feature = "highs"))]
    #[test]
    fn test_missing_backend_is_solver_not_available() {
        let err = SolverFactory::create_from_backend(SolverBackend::Highs)
            .err()
            .unwrap();
        assert!(matches!(err, CflpError::SolverNotAvailable(_)));
        assert!(err.is_solve_failure());
    }
}
