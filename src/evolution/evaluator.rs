use crate::{architecture::Architecture, error::Result};

/// Trains a configuration and returns its quality.
///
/// This is the only call into the outside world the search makes. It is
/// expected to be expensive and may be non-deterministic. An evaluator that
/// needs a dataset or a device owns a handle to it; the driver borrows the
/// evaluator for the whole run.
///
/// Any `Fn(&A) -> Result<f64>` closure is an evaluator.
pub trait Evaluator<A: Architecture> {
    fn evaluate(&self, architecture: &A) -> Result<f64>;
}

impl<A, F> Evaluator<A> for F
where
    A: Architecture,
    F: Fn(&A) -> Result<f64>,
{
    fn evaluate(&self, architecture: &A) -> Result<f64> {
        self(architecture)
    }
}

/// What to do when the evaluator fails for one genome.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FailurePolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Give the genome this score and keep going.
    Penalize(f64),
}
