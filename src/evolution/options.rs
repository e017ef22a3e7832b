//! # SearchOptions
//!
//! The `SearchOptions` struct holds the knobs of a hyperparameter search: how
//! many genomes live in each generation, how many generations run, how parents
//! are retained and mutated, how evaluation is scheduled and how much is logged.
//!
//! ## Example
//!
//! ```rust
//! use hyperevo::evolution::options::{LogLevel, SearchOptions};
//!
//! // Create a new SearchOptions instance with custom parameters
//! let custom_options = SearchOptions::new(10, 30, LogLevel::Verbose);
//!
//! // Create a new SearchOptions instance with default parameters
//! let default_options = SearchOptions::default();
//! assert_eq!(default_options.get_retain(), 0.6);
//! ```
//!
//! ## Defaults
//!
//! - `population_size`: 20
//! - `generations`: 5
//! - `retain`: 0.6, fraction of each generation kept unconditionally
//! - `random_select`: 0.1, chance for each other genome to be kept anyway
//! - `mutate_chance`: 0.1, chance for each kept genome to be mutated
//! - `log_level`: `Minimal`
//! - `parallel_threshold`: `usize::MAX`, so evaluation is sequential
//! - `failure_policy`: `Abort`
//! - `top_k`: 5, genomes listed in the final verbose log

use super::FailurePolicy;
use crate::error::{EvolveError, Result};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Verbose,
    Minimal,
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    population_size: usize,
    generations: usize,
    retain: f64,
    random_select: f64,
    mutate_chance: f64,
    log_level: LogLevel,
    /// Minimum number of pending evaluations to evaluate in parallel
    parallel_threshold: usize,
    failure_policy: FailurePolicy,
    top_k: usize,
}

impl SearchOptions {
    pub fn new(generations: usize, population_size: usize, log_level: LogLevel) -> Self {
        Self {
            generations,
            population_size,
            log_level,
            ..Self::default()
        }
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_generations(&self) -> usize {
        self.generations
    }

    pub fn get_retain(&self) -> f64 {
        self.retain
    }

    pub fn get_random_select(&self) -> f64 {
        self.random_select
    }

    pub fn get_mutate_chance(&self) -> f64 {
        self.mutate_chance
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Returns the minimum number of pending evaluations to evaluate in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn get_top_k(&self) -> usize {
        self.top_k
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_generations(&mut self, generations: usize) {
        self.generations = generations;
    }

    pub fn set_retain(&mut self, retain: f64) {
        self.retain = retain;
    }

    pub fn set_random_select(&mut self, random_select: f64) {
        self.random_select = random_select;
    }

    pub fn set_mutate_chance(&mut self, mutate_chance: f64) {
        self.mutate_chance = mutate_chance;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    pub fn set_failure_policy(&mut self, policy: FailurePolicy) {
        self.failure_policy = policy;
    }

    pub fn set_top_k(&mut self, top_k: usize) {
        self.top_k = top_k;
    }

    /// Number of genomes kept unconditionally out of `population_size`.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.retain) as usize
    }

    /// Checks that a search with these options can run to completion.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the population size or the number of
    /// generations is zero, a probability lies outside `[0, 1]`, the failure
    /// penalty is not finite, or a run that breeds retains too few genomes to
    /// breed from.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(EvolveError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        if self.generations == 0 {
            return Err(EvolveError::Configuration(
                "Number of generations cannot be zero".to_string(),
            ));
        }

        for (name, value) in [
            ("retain", self.retain),
            ("random_select", self.random_select),
            ("mutate_chance", self.mutate_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EvolveError::Configuration(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }

        if let FailurePolicy::Penalize(score) = self.failure_policy {
            if !score.is_finite() {
                return Err(EvolveError::Configuration(format!(
                    "Failure penalty must be finite, got {}",
                    score
                )));
            }
        }

        // A single generation is only scored and ranked, never bred.
        let elites = self.elite_count();
        if self.generations > 1 && elites < 2 && elites < self.population_size {
            return Err(EvolveError::Configuration(format!(
                "Retaining {} of {} genomes leaves fewer than two parents to breed from",
                elites, self.population_size
            )));
        }

        Ok(())
    }

    /// Returns a builder for creating a `SearchOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hyperevo::evolution::options::{LogLevel, SearchOptions};
    /// use hyperevo::evolution::FailurePolicy;
    ///
    /// let options = SearchOptions::builder()
    ///     .population_size(30)
    ///     .generations(10)
    ///     .retain(0.4)
    ///     .log_level(LogLevel::None)
    ///     .failure_policy(FailurePolicy::Penalize(0.0))
    ///     .build();
    ///
    /// assert!(options.validate().is_ok());
    /// ```
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::default()
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            population_size: 20,
            generations: 5,
            retain: 0.6,
            random_select: 0.1,
            mutate_chance: 0.1,
            log_level: LogLevel::Minimal,
            parallel_threshold: usize::MAX,
            failure_policy: FailurePolicy::Abort,
            top_k: 5,
        }
    }
}

/// Builder for `SearchOptions`.
#[derive(Debug, Clone, Default)]
pub struct SearchOptionsBuilder {
    population_size: Option<usize>,
    generations: Option<usize>,
    retain: Option<f64>,
    random_select: Option<f64>,
    mutate_chance: Option<f64>,
    log_level: Option<LogLevel>,
    parallel_threshold: Option<usize>,
    failure_policy: Option<FailurePolicy>,
    top_k: Option<usize>,
}

impl SearchOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn generations(mut self, value: usize) -> Self {
        self.generations = Some(value);
        self
    }

    pub fn retain(mut self, value: f64) -> Self {
        self.retain = Some(value);
        self
    }

    pub fn random_select(mut self, value: f64) -> Self {
        self.random_select = Some(value);
        self
    }

    pub fn mutate_chance(mut self, value: f64) -> Self {
        self.mutate_chance = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn failure_policy(mut self, value: FailurePolicy) -> Self {
        self.failure_policy = Some(value);
        self
    }

    pub fn top_k(mut self, value: usize) -> Self {
        self.top_k = Some(value);
        self
    }

    pub fn build(self) -> SearchOptions {
        let defaults = SearchOptions::default();
        SearchOptions {
            population_size: self.population_size.unwrap_or(defaults.population_size),
            generations: self.generations.unwrap_or(defaults.generations),
            retain: self.retain.unwrap_or(defaults.retain),
            random_select: self.random_select.unwrap_or(defaults.random_select),
            mutate_chance: self.mutate_chance.unwrap_or(defaults.mutate_chance),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
            top_k: self.top_k.unwrap_or(defaults.top_k),
        }
    }
}
