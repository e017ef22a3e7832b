use crate::{architecture::Architecture, genome::Genome};

/// Snapshot of one scored generation, handed to a [`GenerationObserver`].
///
/// The report borrows the population; observers copy out whatever they want
/// to keep.
#[derive(Debug, Clone)]
pub struct GenerationReport<'a, A> {
    /// Zero-based generation index.
    pub generation: usize,
    /// Total number of generations in the run.
    pub generations: usize,
    /// Sum of fitness divided by population size.
    pub average_fitness: f64,
    /// Genomes sent to the evaluator during this generation.
    pub evaluations: usize,
    /// The scored population, in population order.
    pub genomes: &'a [Genome<A>],
}

impl<'a, A: Architecture> GenerationReport<'a, A> {
    /// Per-genome fitness, in population order.
    pub fn fitness(&self) -> Vec<f64> {
        self.genomes.iter().filter_map(Genome::fitness).collect()
    }

    /// The fittest genome of the generation; the earliest one wins ties.
    pub fn best(&self) -> Option<&'a Genome<A>> {
        self.genomes.iter().fold(None, |best, genome| match best {
            Some(b) if b.fitness() >= genome.fitness() => Some(b),
            _ => Some(genome),
        })
    }

    pub fn is_last(&self) -> bool {
        self.generation + 1 == self.generations
    }
}

/// Receives a report after every generation has been scored.
///
/// Any `FnMut(&GenerationReport<'_, A>)` closure is an observer.
pub trait GenerationObserver<A> {
    fn on_generation(&mut self, report: &GenerationReport<'_, A>);
}

impl<A, F> GenerationObserver<A> for F
where
    F: FnMut(&GenerationReport<'_, A>),
{
    fn on_generation(&mut self, report: &GenerationReport<'_, A>) {
        self(report)
    }
}
