use nalgebra::{Cholesky, DMatrix, DVector, SymmetricEigen};

use super::CovarianceError;

/// Iteration cap of the symmetric eigen-decomposition fallback.
const MAX_EIGEN_ITERATIONS: usize = 1000;

/// The factorization used to solve against a covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decomposition {
    /// The matrix was positive definite and factored as `L·Lᵗ`.
    Cholesky,

    /// Cholesky failed and a floored eigen-decomposition was used instead.
    Eigen,
}

/// The result of [`solve_covariance_inverse`].
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceSolution {
    /// `Σ⁻¹·dev`, using the pseudo-inverse on the eigen path.
    pub inv_cov_dev: DVector<f64>,

    /// Half the log-determinant of `Σ`, over the kept eigenvalues on the
    /// eigen path.
    pub half_log_det: f64,

    /// The factorization that produced this solution.
    pub decomposition: Decomposition,
}

impl CovarianceSolution {
    /// Returns the quadratic form `devᵗ·Σ⁻¹·dev`.
    #[must_use]
    pub fn quadratic_form(&self, dev: &DVector<f64>) -> f64 {
        dev.dot(&self.inv_cov_dev)
    }
}

/// Solves `Σ·x = dev` and computes `½·log det Σ`.
///
/// `sigma` is symmetrised as `(Σ + Σᵗ)/2` before factoring. A Cholesky
/// factorization `Σ = L·Lᵗ` is tried first, giving `½·log det Σ = Σᵢ log Lᵢᵢ`.
/// If `Σ` is not numerically positive definite, a symmetric eigen-decomposition
/// `Σ = V·Λ·Vᵗ` is used instead: eigenvalues below the floor are set to zero
/// and excluded from the determinant, and the rest are inverted to form the
/// pseudo-inverse `V·Λ⁺·Vᵗ`.
///
/// The floor is `eps` scaled by the largest diagonal entry of `Σ` when that
/// exceeds one. A Cholesky factor with a squared pivot at or below the floor
/// counts as a failure, so directions that vanish only up to rounding, such
/// as the total of a closed population, always take the eigen path.
///
/// # Errors
///
/// Returns a [`CovarianceError`] if the shapes are inconsistent, if `sigma`
/// has non-finite entries, or if the eigen-decomposition does not converge.
pub fn solve_covariance_inverse(
    sigma: &DMatrix<f64>,
    dev: &DVector<f64>,
    eps: f64,
) -> Result<CovarianceSolution, CovarianceError> {
    let (rows, cols) = sigma.shape();
    if rows != cols {
        return Err(CovarianceError::NotSquare { rows, cols });
    }
    if dev.len() != rows {
        return Err(CovarianceError::DimensionMismatch {
            expected: rows,
            found: dev.len(),
        });
    }
    if sigma.iter().any(|value| !value.is_finite()) {
        return Err(CovarianceError::NonFinite);
    }

    let symmetric = (sigma + sigma.transpose()) * 0.5;
    let floor = eps * symmetric.diagonal().amax().max(1.0);

    if let Some(cholesky) = Cholesky::new(symmetric.clone()) {
        let pivots = cholesky.l_dirty().diagonal();
        if pivots.iter().all(|&l| l * l > floor) {
            return Ok(CovarianceSolution {
                inv_cov_dev: cholesky.solve(dev),
                half_log_det: pivots.iter().map(|l| l.ln()).sum(),
                decomposition: Decomposition::Cholesky,
            });
        }
    }

    tracing::debug!(
        dim = rows,
        floor,
        "covariance is not numerically positive definite, using eigen-decomposition"
    );

    let eigen = SymmetricEigen::try_new(symmetric, f64::EPSILON, MAX_EIGEN_ITERATIONS)
        .ok_or(CovarianceError::NoConvergence)?;

    let mut log_det = 0.0;
    let inverted = eigen.eigenvalues.map(|lambda| {
        if lambda <= floor {
            0.0
        } else {
            log_det += lambda.ln();
            lambda.recip()
        }
    });

    let vectors = &eigen.eigenvectors;
    let projected = vectors.tr_mul(dev).component_mul(&inverted);

    Ok(CovarianceSolution {
        inv_cov_dev: vectors * projected,
        half_log_det: log_det / 2.0,
        decomposition: Decomposition::Eigen,
    })
}
