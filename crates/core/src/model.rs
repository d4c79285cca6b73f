use nalgebra::{DMatrix, DVector};

/// A compartmental ODE model `dy/dt = f(y, t)`.
///
/// Implementors describe a population split into a fixed number of mutually
/// exclusive compartments together with the flows between them. Simulations
/// and likelihood estimators take ownership of (a copy of) the model, so the
/// trait only needs shared access for evaluation.
///
/// Right-hand side evaluations receive two state vectors: `pop` is the
/// population snapshot used for interaction terms (e.g. the number of
/// infectious people a susceptible person may meet), and `y` is the state
/// being differentiated. Plain simulations pass the same vector for both.
pub trait CompartmentModel {
    /// The error reported when the model's parameters are invalid.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the number of compartments `D`.
    ///
    /// This value must not change for the lifetime of the model.
    fn num_compartments(&self) -> usize;

    /// Returns the state at the start of a simulation.
    fn initial_values(&self) -> DVector<f64>;

    /// Evaluates the time derivative of `y` at time `t` into `dydt`.
    ///
    /// All vectors have [`CompartmentModel::num_compartments`] entries.
    fn eval_right_hand_side(
        &self,
        pop: &DVector<f64>,
        y: &DVector<f64>,
        t: f64,
        dydt: &mut DVector<f64>,
    );

    /// Validates the model's parameters.
    ///
    /// Called once before a simulation starts. The default implementation
    /// accepts every model.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] describing the first violated constraint.
    fn check_constraints(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A compartment model with a linear noise approximation.
///
/// The approximation treats the underlying stochastic population process as
/// the deterministic trajectory plus Gaussian fluctuations whose covariance
/// `Σ` evolves according to
///
/// ```text
/// dΣ/dt = Σ·Jᵗ + J·Σ + Q
/// ```
///
/// where `J` is the [drift](StochasticModel::drift) and `Q` the
/// [noise correlation](StochasticModel::noise_correlation), both evaluated
/// along the deterministic trajectory.
pub trait StochasticModel: CompartmentModel {
    /// Evaluates the Jacobian of the right-hand side with respect to `y` into
    /// the `D×D` matrix `drift`.
    fn drift(&self, pop: &DVector<f64>, y: &DVector<f64>, t: f64, drift: &mut DMatrix<f64>);

    /// Evaluates the diffusion term into the `D×D` matrix `noise`.
    ///
    /// By convention the result is symmetric positive semi-definite.
    fn noise_correlation(
        &self,
        pop: &DVector<f64>,
        y: &DVector<f64>,
        t: f64,
        noise: &mut DMatrix<f64>,
    );
}
