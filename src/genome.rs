//! # Genome
//!
//! A `Genome` pairs one candidate configuration with its fitness. Fitness is
//! `None` until the genome has been scored, and it is computed at most once:
//! asking an already scored genome to evaluate itself returns the cached value
//! without calling the evaluator again.
//!
//! The configuration is private. Every way of changing it (`mutate`,
//! `set_architecture`) clears the cached fitness, so a changed genome is always
//! re-scored before it is judged.
//!
//! ## Example
//!
//! ```rust
//! use hyperevo::architecture::layered::LayerWidths;
//! use hyperevo::error::Result;
//! use hyperevo::genome::Genome;
//!
//! let mut genome = Genome::new(LayerWidths::new(vec![128, 64]).unwrap());
//! assert_eq!(genome.fitness(), None);
//!
//! let evaluator = |net: &LayerWidths| -> Result<f64> { Ok(net.depth() as f64 / 4.0) };
//! assert_eq!(genome.evaluate(&evaluator).unwrap(), 0.5);
//! assert_eq!(genome.fitness(), Some(0.5));
//! ```

use crate::{
    architecture::{Architecture, SearchSpace},
    error::{EvolveError, Result},
    evolution::Evaluator,
    rng::RandomNumberGenerator,
};

/// One candidate configuration and its cached fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Genome<A> {
    architecture: A,
    fitness: Option<f64>,
}

impl<A: Architecture> Genome<A> {
    /// Wraps an unevaluated configuration.
    pub fn new(architecture: A) -> Self {
        Self {
            architecture,
            fitness: None,
        }
    }

    /// Wraps a configuration whose score is already known, e.g. restored from
    /// an earlier run. The evaluator will not be asked about it again.
    pub fn with_fitness(architecture: A, fitness: f64) -> Self {
        Self {
            architecture,
            fitness: Some(fitness),
        }
    }

    /// Draws an unevaluated genome uniformly from `space`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `space` cannot produce a legal
    /// configuration.
    pub fn random(space: &A::Space, rng: &mut RandomNumberGenerator) -> Result<Self> {
        space.validate()?;
        Ok(Self::new(A::random(space, rng)))
    }

    pub fn architecture(&self) -> &A {
        &self.architecture
    }

    pub fn into_architecture(self) -> A {
        self.architecture
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Replaces the configuration and forgets the old score.
    pub fn set_architecture(&mut self, architecture: A) {
        self.architecture = architecture;
        self.fitness = None;
    }

    /// Mutates one field of the configuration and forgets the old score.
    pub fn mutate(&mut self, space: &A::Space, rng: &mut RandomNumberGenerator) {
        self.architecture.mutate(space, rng);
        self.fitness = None;
    }

    /// Produces one unevaluated child with `self` as the mother.
    pub fn crossover(&self, father: &Self, rng: &mut RandomNumberGenerator) -> Self {
        Self::new(self.architecture.crossover(&father.architecture, rng))
    }

    /// Scores the genome, calling `evaluator` only if no score is cached yet.
    ///
    /// # Errors
    ///
    /// Propagates the evaluator's error, and returns an evaluation error for a
    /// non-finite score. Nothing is cached on failure.
    pub fn evaluate<E>(&mut self, evaluator: &E) -> Result<f64>
    where
        E: Evaluator<A> + ?Sized,
    {
        if let Some(fitness) = self.fitness {
            return Ok(fitness);
        }

        let score = evaluator.evaluate(&self.architecture)?;
        if !score.is_finite() {
            return Err(EvolveError::Evaluation(format!(
                "Non-finite fitness score encountered: {}",
                score
            )));
        }

        self.fitness = Some(score);
        Ok(score)
    }

    /// Records a score chosen by the caller, such as a failure penalty.
    pub(crate) fn assign_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::architecture::keyed::{HyperParams, Param, ParameterSpace, Value};

    fn params(neurons: u32) -> HyperParams {
        HyperParams::new([(Param::NbNeurons, Value::Count(neurons))])
    }

    #[test]
    fn test_evaluate_once() {
        let calls = AtomicUsize::new(0);
        let evaluator = |p: &HyperParams| -> Result<f64> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(p.neurons().unwrap_or(0) as f64 / 1000.0)
        };

        let mut genome = Genome::new(params(500));
        assert_eq!(genome.evaluate(&evaluator).unwrap(), 0.5);
        assert_eq!(genome.evaluate(&evaluator).unwrap(), 0.5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cached_zero_is_not_rescored() {
        let calls = AtomicUsize::new(0);
        let evaluator = |_: &HyperParams| -> Result<f64> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(0.9)
        };

        let mut genome = Genome::with_fitness(params(64), 0.0);
        assert_eq!(genome.evaluate(&evaluator).unwrap(), 0.0);
        assert_eq!(genome.fitness(), Some(0.0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failure_caches_nothing() {
        let failing = |_: &HyperParams| -> Result<f64> {
            Err(EvolveError::Evaluation("out of memory".to_string()))
        };
        let not_a_number = |_: &HyperParams| -> Result<f64> { Ok(f64::NAN) };

        let mut genome = Genome::new(params(64));
        assert!(matches!(
            genome.evaluate(&failing),
            Err(EvolveError::Evaluation(_))
        ));
        assert!(matches!(
            genome.evaluate(&not_a_number),
            Err(EvolveError::Evaluation(_))
        ));
        assert!(!genome.is_evaluated());
    }

    #[test]
    fn test_changes_reset_fitness() {
        let space = ParameterSpace::default();
        let mut rng = RandomNumberGenerator::from_seed(1);

        let mut genome = Genome::with_fitness(params(64), 0.7);
        genome.mutate(&space, &mut rng);
        assert_eq!(genome.fitness(), None);

        let mut genome = Genome::with_fitness(params(64), 0.7);
        genome.set_architecture(params(128));
        assert_eq!(genome.fitness(), None);
        assert_eq!(genome.architecture().neurons(), Some(128));
    }

    #[test]
    fn test_crossover_child_is_unevaluated() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let mother = Genome::with_fitness(params(64), 0.4);
        let father = Genome::with_fitness(params(128), 0.6);

        let child = mother.crossover(&father, &mut rng);
        assert!(!child.is_evaluated());
        assert!(matches!(child.architecture().neurons(), Some(64 | 128)));
    }
}
