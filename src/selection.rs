//! # Selection
//!
//! Picks the parents of the next generation from a fully scored population.

use crate::{
    architecture::Architecture,
    error::{EvolveError, Result},
    genome::Genome,
    population::Population,
    rng::RandomNumberGenerator,
};

/// Elite retention with diversity injection.
///
/// The top `retain` fraction of a scored population is always kept. Every
/// other genome survives an independent Bernoulli trial with probability
/// `random_select`, which keeps some weaker configurations around for variety.
///
/// # Examples
///
/// ```
/// use hyperevo::architecture::layered::LayerWidths;
/// use hyperevo::genome::Genome;
/// use hyperevo::population::Population;
/// use hyperevo::rng::RandomNumberGenerator;
/// use hyperevo::selection::Selector;
///
/// let population = Population::from_genomes(vec![
///     Genome::with_fitness(LayerWidths::new(vec![64]).unwrap(), 0.2),
///     Genome::with_fitness(LayerWidths::new(vec![128]).unwrap(), 0.9),
///     Genome::with_fitness(LayerWidths::new(vec![256]).unwrap(), 0.5),
///     Genome::with_fitness(LayerWidths::new(vec![512]).unwrap(), 0.1),
/// ]);
///
/// let mut rng = RandomNumberGenerator::new();
/// let parents = Selector::new(0.5, 0.0).select(population, &mut rng).unwrap();
///
/// assert_eq!(parents.len(), 2);
/// assert_eq!(parents[0].fitness(), Some(0.9));
/// assert_eq!(parents[1].fitness(), Some(0.5));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    retain: f64,
    random_select: f64,
}

impl Selector {
    pub fn new(retain: f64, random_select: f64) -> Self {
        Self {
            retain,
            random_select,
        }
    }

    /// Number of genomes kept unconditionally out of `population_size`.
    pub fn elite_count(&self, population_size: usize) -> usize {
        (population_size as f64 * self.retain) as usize
    }

    /// Picks the parents of the next generation.
    ///
    /// The elites come first, in descending fitness order; randomly retained
    /// genomes follow.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPopulation` for an empty population and an evolution
    /// error if any genome has not been scored.
    pub fn select<A>(
        &self,
        population: Population<A>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Genome<A>>>
    where
        A: Architecture,
    {
        if population.is_empty() {
            return Err(EvolveError::EmptyPopulation);
        }
        population.ensure_evaluated()?;

        let keep = self.elite_count(population.len());
        let mut ranked = population.ranked().into_iter();

        let mut parents: Vec<Genome<A>> = ranked.by_ref().take(keep).collect();
        parents.extend(ranked.filter(|_| rng.chance(self.random_select)));

        Ok(parents)
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(0.6, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::architecture::keyed::{HyperParams, Param, Value};

    fn scored(population: &[f64]) -> Population<HyperParams> {
        Population::from_genomes(
            population
                .iter()
                .enumerate()
                .map(|(i, fitness)| {
                    let params = HyperParams::new([(Param::NbNeurons, Value::Count(i as u32 + 1))]);
                    Genome::with_fitness(params, *fitness)
                })
                .collect(),
        )
    }

    #[test]
    fn test_elite_count_is_floor() {
        let selector = Selector::new(0.6, 0.0);
        assert_eq!(selector.elite_count(20), 12);
        assert_eq!(selector.elite_count(4), 2);
        assert_eq!(selector.elite_count(7), 4);
        assert_eq!(selector.elite_count(1), 0);
    }

    #[test]
    fn test_retains_exactly_the_elites() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let fitness: Vec<f64> = (0..10).map(|i| i as f64 / 10.0).collect();

        let parents = Selector::new(0.6, 0.0)
            .select(scored(&fitness), &mut rng)
            .unwrap();

        assert_eq!(parents.len(), 6);
        let kept: Vec<f64> = parents.iter().filter_map(|g| g.fitness()).collect();
        assert_eq!(kept, vec![0.9, 0.8, 0.7, 0.6, 0.5, 0.4]);
    }

    #[test]
    fn test_random_select_one_keeps_everyone() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let parents = Selector::new(0.2, 1.0)
            .select(scored(&[0.3, 0.1, 0.2, 0.5, 0.4]), &mut rng)
            .unwrap();

        assert_eq!(parents.len(), 5);
        assert_eq!(parents[0].fitness(), Some(0.5));
    }

    #[test]
    fn test_random_select_is_a_superset_of_elites() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let fitness: Vec<f64> = (0..100).map(|i| i as f64).collect();

        for _ in 0..20 {
            let parents = Selector::new(0.3, 0.5)
                .select(scored(&fitness), &mut rng)
                .unwrap();
            assert!(parents.len() >= 30);
            assert!(parents.len() <= 100);
            for (i, parent) in parents.iter().take(30).enumerate() {
                assert_eq!(parent.fitness(), Some(99.0 - i as f64));
            }
        }
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let parents = Selector::new(0.5, 0.0)
            .select(scored(&[0.5, 0.5, 0.5, 0.5]), &mut rng)
            .unwrap();

        let neurons: Vec<u32> = parents
            .iter()
            .filter_map(|g| g.architecture().neurons())
            .collect();
        assert_eq!(neurons, vec![1, 2]);
    }

    #[test]
    fn test_empty_population() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let result = Selector::default().select(scored(&[]), &mut rng);
        assert!(matches!(result, Err(EvolveError::EmptyPopulation)));
    }

    #[test]
    fn test_unevaluated_population() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mut genomes = scored(&[0.1, 0.2]).into_genomes();
        genomes.push(Genome::new(HyperParams::new([(
            Param::NbNeurons,
            Value::Count(99),
        )])));

        let result = Selector::default().select(Population::from_genomes(genomes), &mut rng);
        assert!(matches!(result, Err(EvolveError::Evolution(_))));
    }
}
