//! # Breeder
//!
//! Crossover of parent genomes. Each pairing yields exactly two children, and
//! the refill loop keeps pairing distinct parents until the next generation
//! is full.
use tracing::debug;

use crate::{
    architecture::Architecture,
    error::{EvolveError, Result},
    genome::Genome,
    rng::RandomNumberGenerator,
};

/// Pairs distinct parents and crosses them over.
#[derive(Debug, Clone, Copy, Default)]
pub struct Breeder;

impl Breeder {
    pub fn new() -> Self {
        Self
    }

    /// Makes two unevaluated children out of `mother` and `father`.
    pub fn breed<A>(
        &self,
        mother: &Genome<A>,
        father: &Genome<A>,
        rng: &mut RandomNumberGenerator,
    ) -> [Genome<A>; 2]
    where
        A: Architecture,
    {
        [mother.crossover(father, rng), mother.crossover(father, rng)]
    }

    /// Breeds `desired` children from random pairs of distinct parents.
    ///
    /// The surplus child of the last pair is dropped, so exactly `desired`
    /// children are returned. Nothing is bred when `desired` is zero.
    ///
    /// # Errors
    ///
    /// Returns a breeding error if children are wanted but there are fewer
    /// than two parents to pair.
    pub fn refill<A>(
        &self,
        parents: &[Genome<A>],
        desired: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Genome<A>>>
    where
        A: Architecture,
    {
        let mut children = Vec::with_capacity(desired);
        if desired == 0 {
            return Ok(children);
        }

        if parents.len() < 2 {
            return Err(EvolveError::Breeding(format!(
                "Need at least two parents to breed {} children, got {}",
                desired,
                parents.len()
            )));
        }

        while children.len() < desired {
            let (male, female) = pick_pair(parents.len(), rng)?;
            debug!(male, female, "Breeding pair");

            for child in self.breed(&parents[male], &parents[female], rng) {
                if children.len() < desired {
                    children.push(child);
                }
            }
        }

        Ok(children)
    }
}

/// Draws two distinct indices in `[0, len)`, retrying coincident draws.
pub(crate) fn pick_pair(len: usize, rng: &mut RandomNumberGenerator) -> Result<(usize, usize)> {
    if len < 2 {
        return Err(EvolveError::Breeding(format!(
            "Cannot pick two distinct parents out of {}",
            len
        )));
    }

    loop {
        let male = rng.index(len);
        let female = rng.index(len);
        if male != female {
            return Ok((male, female));
        }
    }
}
