use std::sync::{atomic::AtomicBool, Arc};

use tracing::{debug, info, info_span};

use super::{
    options::{LogLevel, SearchOptions},
    report::{GenerationObserver, GenerationReport},
    Evaluator,
};
use crate::{
    architecture::Architecture,
    breeding::Breeder,
    error::Result,
    genome::Genome,
    mutation::Mutator,
    population::Population,
    rng::RandomNumberGenerator,
    selection::Selector,
};

/// Runs the generational search: evaluate, report, select, mutate, breed.
///
/// The driver owns the search space, the evaluator and the options for the
/// whole run and lends the space to the selection, mutation and breeding
/// steps.
pub struct EvolutionDriver<A, E>
where
    A: Architecture,
{
    space: A::Space,
    evaluator: E,
    options: SearchOptions,
    stop: Option<Arc<AtomicBool>>,
}

impl<A, E> EvolutionDriver<A, E>
where
    A: Architecture,
    E: Evaluator<A> + Sync,
{
    /// Creates a new `EvolutionDriver`.
    ///
    /// # Arguments
    ///
    /// * `space` - The values each genome may take.
    /// * `evaluator` - Trains a configuration and returns its score.
    /// * `options` - Population size, generation count, rates and logging.
    pub fn new(space: A::Space, evaluator: E, options: SearchOptions) -> Self {
        Self {
            space,
            evaluator,
            options,
            stop: None,
        }
    }

    /// Lets another thread stop the run by setting `flag`.
    ///
    /// The flag is checked before each evaluation; once it is seen set the run
    /// returns `EvolveError::Cancelled`.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    pub fn space(&self) -> &A::Space {
        &self.space
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Evolves a random population and returns the last generation, ranked by
    /// descending fitness.
    pub fn run(&self, rng: &mut RandomNumberGenerator) -> Result<Vec<Genome<A>>> {
        self.run_with_observer(rng, |_: &GenerationReport<'_, A>| {})
    }

    /// Like [`run`](Self::run), handing a [`GenerationReport`] to `observer`
    /// after every generation has been scored.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The options or the search space are invalid
    /// - An evaluation fails under `FailurePolicy::Abort`
    /// - The stop flag is raised
    pub fn run_with_observer<O>(
        &self,
        rng: &mut RandomNumberGenerator,
        mut observer: O,
    ) -> Result<Vec<Genome<A>>>
    where
        O: GenerationObserver<A>,
    {
        self.options.validate()?;

        let generations = self.options.get_generations();
        let mut population =
            Population::random(&self.space, self.options.get_population_size(), rng)?;

        for generation in 0..generations {
            let span = info_span!("generation", index = generation + 1, of = generations);
            let _enter = span.enter();

            let evaluations =
                population.evaluate(&self.evaluator, &self.options, self.stop.as_deref())?;

            let report = GenerationReport {
                generation,
                generations,
                average_fitness: population.average_fitness()?,
                evaluations,
                genomes: population.genomes(),
            };
            self.log_generation(&report);
            observer.on_generation(&report);

            if report.is_last() {
                break;
            }

            population = self.evolve(population, rng)?;
        }

        let ranked = population.ranked();
        if self.options.get_log_level() == LogLevel::Verbose {
            for (rank, genome) in ranked.iter().take(self.options.get_top_k()).enumerate() {
                info!(
                    rank = rank + 1,
                    fitness = ?genome.fitness(),
                    architecture = ?genome.architecture(),
                    "Top network"
                );
            }
        }

        Ok(ranked)
    }

    /// Produces the next generation from a fully scored one.
    ///
    /// Parents are selected, possibly mutated, and the remaining slots are
    /// filled with children of distinct parent pairs. The returned population
    /// has the same size as the input: parents first, then children.
    pub fn evolve(
        &self,
        population: Population<A>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population<A>> {
        let target = population.len();

        let selector = Selector::new(self.options.get_retain(), self.options.get_random_select());
        let mut parents = selector.select(population, rng)?;

        let mutated = Mutator::new(self.options.get_mutate_chance()).apply(
            &mut parents,
            &self.space,
            rng,
        );

        let desired = target.saturating_sub(parents.len());
        let children = Breeder::new().refill(&parents, desired, rng)?;

        debug!(
            parents = parents.len(),
            mutated,
            children = children.len(),
            "Bred next generation"
        );

        parents.extend(children);
        Ok(Population::from_genomes(parents))
    }

    fn log_generation(&self, report: &GenerationReport<'_, A>) {
        match self.options.get_log_level() {
            LogLevel::None => {}
            LogLevel::Minimal => {
                info!(
                    average_fitness = report.average_fitness,
                    evaluations = report.evaluations,
                    "Generation average: {:.2}%",
                    report.average_fitness * 100.0
                );
            }
            LogLevel::Verbose => {
                for genome in report.genomes {
                    info!(
                        fitness = ?genome.fitness(),
                        architecture = ?genome.architecture(),
                        "Network scored"
                    );
                }
                info!(
                    average_fitness = report.average_fitness,
                    evaluations = report.evaluations,
                    "Generation average: {:.2}%",
                    report.average_fitness * 100.0
                );
            }
        }
    }
}

/// Runs a search with default options and an entropy-seeded RNG.
///
/// The architecture type cannot be inferred from the space alone, so it is
/// usually named explicitly:
///
/// ```rust
/// use hyperevo::architecture::keyed::{HyperParams, ParameterSpace};
/// use hyperevo::error::Result;
///
/// let ranked = hyperevo::run::<HyperParams, _>(
///     ParameterSpace::default(),
///     10,
///     2,
///     |p: &HyperParams| -> Result<f64> { Ok(p.neurons().unwrap_or(0) as f64 / 1024.0) },
/// )
/// .unwrap();
///
/// assert_eq!(ranked.len(), 10);
/// ```
pub fn run<A, E>(
    space: A::Space,
    population_size: usize,
    generations: usize,
    evaluator: E,
) -> Result<Vec<Genome<A>>>
where
    A: Architecture,
    E: Evaluator<A> + Sync,
{
    let options = SearchOptions::builder()
        .population_size(population_size)
        .generations(generations)
        .build();
    let mut rng = RandomNumberGenerator::new();
    EvolutionDriver::new(space, evaluator, options).run(&mut rng)
}
