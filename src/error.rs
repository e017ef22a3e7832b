//! # Error Types
//!
//! This module defines the error type shared by every stage of the search:
//! building a search space, evaluating genomes, selecting, breeding and
//! driving generations.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use hyperevo::error::{EvolveError, Result};
//!
//! fn train_and_score() -> Result<f64> {
//!     Err(EvolveError::Evaluation("training diverged".to_string()))
//! }
//!
//! match train_and_score() {
//!     Ok(score) => println!("Score: {}", score),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use hyperevo::error::{EvolveError, OptionExt};
//!
//! fn best_score(scores: &[f64]) -> hyperevo::error::Result<f64> {
//!     scores
//!         .iter()
//!         .copied()
//!         .reduce(f64::max)
//!         .ok_or_else_evolve(|| EvolveError::EmptyPopulation)
//! }
//! ```

use thiserror::Error;

/// Represents errors that can occur during a hyperparameter search.
#[derive(Error, Debug)]
pub enum EvolveError {
    /// Error that occurs when a breeding operation fails.
    #[error("Breeding error: {0}")]
    Breeding(String),

    /// Error that occurs when an evolution step is run on a population in the wrong state.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// Error that occurs when an invalid search space or option set is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when the evaluator fails or returns a non-finite score.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// The run was stopped through its stop flag.
    #[error("Search cancelled")]
    Cancelled,

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for search operations.
pub type Result<T> = std::result::Result<T, EvolveError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, EvolveError>` using
    /// a closure to generate the error.
    fn ok_or_else_evolve<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolveError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_evolve<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolveError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EvolveError::Configuration("Population size cannot be zero".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: Population size cannot be zero"
        );
        assert_eq!(EvolveError::Cancelled.to_string(), "Search cancelled");
    }

    #[test]
    fn test_option_ext() {
        let some: Option<u8> = Some(3);
        assert_eq!(some.ok_or_else_evolve(|| EvolveError::EmptyPopulation).unwrap(), 3);

        let none: Option<u8> = None;
        match none.ok_or_else_evolve(|| EvolveError::EmptyPopulation) {
            Err(EvolveError::EmptyPopulation) => (),
            _ => panic!("Expected EmptyPopulation error"),
        }
    }
}
