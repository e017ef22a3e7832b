//! # Architecture Trait
//!
//! The `Architecture` trait defines the interface for types that describe one
//! candidate network configuration. It is the genome payload the search evolves:
//! it can be drawn at random from a search space, crossed with another
//! configuration, and mutated in place.
//!
//! Two representations ship with the crate:
//!
//! - [`keyed::HyperParams`]: one value per named hyperparameter
//!   (`nb_neurons`, `nb_layers`, `activation`, `optimizer`).
//! - [`layered::LayerWidths`]: an ordered list of layer widths of variable depth.
//!
//! ## Example
//!
//! ```rust
//! use hyperevo::architecture::{Architecture, SearchSpace};
//! use hyperevo::architecture::layered::{LayerSpace, LayerWidths};
//! use hyperevo::rng::RandomNumberGenerator;
//!
//! let space = LayerSpace::new(vec![32, 64], 3).unwrap();
//! let mut rng = RandomNumberGenerator::from_seed(3);
//!
//! let mother = LayerWidths::random(&space, &mut rng);
//! let father = LayerWidths::random(&space, &mut rng);
//! let mut child = mother.crossover(&father, &mut rng);
//! child.mutate(&space, &mut rng);
//!
//! assert!(space.validate().is_ok());
//! assert!((1..=3).contains(&child.depth()));
//! ```

pub mod keyed;
pub mod layered;

use std::fmt::Debug;

use crate::{error::Result, rng::RandomNumberGenerator};

/// The set of legal values a configuration may be drawn from.
///
/// Spaces validate themselves when constructed. `validate` is exposed so that
/// spaces obtained some other way (deserialization, for instance) can be
/// checked again before a population is built from them.
pub trait SearchSpace: Debug + Send + Sync {
    /// Checks that at least one legal configuration can be drawn from the space.
    fn validate(&self) -> Result<()>;
}

/// Trait for types that represent a candidate network configuration.
///
/// Types implementing this trait must also implement `Clone`, `Debug`, `Send`, and `Sync`
/// so that populations can be evaluated in parallel and logged.
pub trait Architecture: Clone + Debug + Send + Sync {
    /// The search space this representation draws its values from.
    type Space: SearchSpace;

    /// Draws a configuration uniformly from `space`.
    ///
    /// Use [`Genome::random`](crate::genome::Genome::random) or
    /// [`Population::random`](crate::population::Population::random), which
    /// validate the space first.
    ///
    /// # Panics
    ///
    /// May panic if `space` fails [`SearchSpace::validate`], e.g. a
    /// deserialized space with no layer widths or a zero layer bound.
    fn random(space: &Self::Space, rng: &mut RandomNumberGenerator) -> Self;

    /// Produces one child from `self` (the mother) and `other` (the father).
    ///
    /// Every value of the child is taken from one of the two parents.
    fn crossover(&self, other: &Self, rng: &mut RandomNumberGenerator) -> Self;

    /// Replaces one uniformly chosen field with a fresh uniform draw from `space`.
    ///
    /// The new value is independent of the old one, so the mutation can be a
    /// no-op by chance.
    fn mutate(&mut self, space: &Self::Space, rng: &mut RandomNumberGenerator);
}
