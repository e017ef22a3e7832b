//! # Mutation

use crate::{architecture::Architecture, genome::Genome, rng::RandomNumberGenerator};

/// Applies random single-field mutations to surviving parents.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Mutator {
    mutate_chance: f64,
}

impl Mutator {
    pub fn new(mutate_chance: f64) -> Self {
        Self { mutate_chance }
    }

    /// Mutates each genome independently with probability `mutate_chance` and
    /// returns how many were mutated. Mutated genomes lose their fitness.
    pub fn apply<A>(
        &self,
        genomes: &mut [Genome<A>],
        space: &A::Space,
        rng: &mut RandomNumberGenerator,
    ) -> usize
    where
        A: Architecture,
    {
        let mut mutated = 0;
        for genome in genomes.iter_mut() {
            if rng.chance(self.mutate_chance) {
                genome.mutate(space, rng);
                mutated += 1;
            }
        }
        mutated
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new(0.1)
    }
}
