//! # Population
//!
//! An ordered collection of genomes plus the operations the driver runs on the
//! whole collection at once: random instantiation, the evaluation step,
//! grading and ranking.

use std::{
    cmp::Ordering,
    sync::atomic::{AtomicBool, Ordering as AtomicOrdering},
};

use rayon::prelude::*;
use tracing::warn;

use crate::{
    architecture::{Architecture, SearchSpace},
    error::{EvolveError, OptionExt, Result},
    evolution::{options::SearchOptions, Evaluator, FailurePolicy},
    genome::Genome,
    rng::RandomNumberGenerator,
};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Population<A> {
    genomes: Vec<Genome<A>>,
}

impl<A: Architecture> Population<A> {
    /// Draws `size` unevaluated genomes from `space`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `size` is zero or the space cannot
    /// produce a legal configuration.
    pub fn random(space: &A::Space, size: usize, rng: &mut RandomNumberGenerator) -> Result<Self> {
        if size == 0 {
            return Err(EvolveError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        space.validate()?;

        let genomes = (0..size)
            .map(|_| Genome::new(A::random(space, rng)))
            .collect();
        Ok(Self { genomes })
    }

    pub fn from_genomes(genomes: Vec<Genome<A>>) -> Self {
        Self { genomes }
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn genomes(&self) -> &[Genome<A>] {
        &self.genomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Genome<A>> {
        self.genomes.iter()
    }

    pub fn into_genomes(self) -> Vec<Genome<A>> {
        self.genomes
    }

    /// Number of genomes still waiting for a score.
    pub fn pending(&self) -> usize {
        self.genomes.iter().filter(|g| !g.is_evaluated()).count()
    }

    /// Scores every genome that has no fitness yet and returns how many were
    /// sent to the evaluator.
    ///
    /// Already scored genomes are skipped. When the number of pending genomes
    /// reaches the options' parallel threshold they are scored on the rayon
    /// pool; either way every score is in place when this returns.
    ///
    /// # Errors
    ///
    /// With `FailurePolicy::Abort` the first evaluation error is returned.
    /// `EvolveError::Cancelled` is returned as soon as `stop` is observed set.
    pub fn evaluate<E>(
        &mut self,
        evaluator: &E,
        options: &SearchOptions,
        stop: Option<&AtomicBool>,
    ) -> Result<usize>
    where
        E: Evaluator<A> + Sync + ?Sized,
    {
        let policy = options.get_failure_policy();
        let pending: Vec<&mut Genome<A>> = self
            .genomes
            .iter_mut()
            .filter(|g| !g.is_evaluated())
            .collect();
        let count = pending.len();

        if count >= options.get_parallel_threshold() {
            pending
                .into_par_iter()
                .try_for_each(|genome| score(genome, evaluator, policy, stop))?;
        } else {
            for genome in pending {
                score(genome, evaluator, policy, stop)?;
            }
        }

        Ok(count)
    }

    /// Average fitness over the whole population.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPopulation` for an empty population and an evolution
    /// error if some genome has not been scored.
    pub fn average_fitness(&self) -> Result<f64> {
        if self.genomes.is_empty() {
            return Err(EvolveError::EmptyPopulation);
        }

        let total = self
            .genomes
            .iter()
            .enumerate()
            .map(|(idx, genome)| {
                genome.fitness().ok_or_else_evolve(|| {
                    EvolveError::Evolution(format!("Genome {} has not been evaluated", idx))
                })
            })
            .sum::<Result<f64>>()?;

        Ok(total / self.genomes.len() as f64)
    }

    /// Fails unless every genome has been scored.
    pub fn ensure_evaluated(&self) -> Result<()> {
        match self.genomes.iter().position(|g| !g.is_evaluated()) {
            Some(idx) => Err(EvolveError::Evolution(format!(
                "Genome {} has not been evaluated",
                idx
            ))),
            None => Ok(()),
        }
    }

    /// The fittest genome, if any has been scored.
    pub fn best(&self) -> Option<&Genome<A>> {
        self.genomes
            .iter()
            .filter(|g| g.is_evaluated())
            .min_by(|a, b| by_fitness_desc(a, b))
    }

    /// Genomes sorted by descending fitness.
    ///
    /// The sort is stable, so equal scores keep their insertion order.
    /// Unscored genomes go last.
    pub fn ranked(self) -> Vec<Genome<A>> {
        let mut genomes = self.genomes;
        genomes.sort_by(by_fitness_desc);
        genomes
    }
}

impl<A> IntoIterator for Population<A> {
    type Item = Genome<A>;
    type IntoIter = std::vec::IntoIter<Genome<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.genomes.into_iter()
    }
}

fn by_fitness_desc<A>(a: &Genome<A>, b: &Genome<A>) -> Ordering
where
    A: Architecture,
{
    match (a.fitness(), b.fitness()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn score<A, E>(
    genome: &mut Genome<A>,
    evaluator: &E,
    policy: FailurePolicy,
    stop: Option<&AtomicBool>,
) -> Result<()>
where
    A: Architecture,
    E: Evaluator<A> + ?Sized,
{
    if stop.map_or(false, |flag| flag.load(AtomicOrdering::Relaxed)) {
        return Err(EvolveError::Cancelled);
    }

    match genome.evaluate(evaluator) {
        Ok(_) => Ok(()),
        Err(EvolveError::Cancelled) => Err(EvolveError::Cancelled),
        Err(e) => match policy {
            FailurePolicy::Abort => Err(e),
            FailurePolicy::Penalize(penalty) => {
                warn!(
                    architecture = ?genome.architecture(),
                    error = %e,
                    penalty,
                    "Evaluation failed, assigning penalty"
                );
                genome.assign_fitness(penalty);
                Ok(())
            }
        },
    }
}
