//! Genetic-algorithm search over multilayer-perceptron hyperparameters.
//!
//! A population of candidate configurations is scored by an injected
//! [`Evaluator`](evolution::Evaluator), then selected, mutated and bred into
//! the next generation by an [`EvolutionDriver`](evolution::EvolutionDriver).

pub mod architecture;
pub mod breeding;
pub mod caching;
pub mod error;
pub mod evolution;
pub mod genome;
pub mod mutation;
pub mod population;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use error::{EvolveError, OptionExt, Result};
pub use evolution::{run, EvolutionDriver, Evaluator, SearchOptions};
pub use genome::Genome;
