//! # Caching Module
//!
//! Genome-level memoization stops a single genome from being trained twice, but
//! breeding regularly produces children identical to configurations that were
//! already trained. `CachedEvaluator` memoizes scores by configuration so such
//! children reuse the earlier score.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::{
    architecture::Architecture,
    error::{EvolveError, Result},
    evolution::Evaluator,
};

/// A wrapper around an evaluator that caches scores by configuration.
///
/// The cache lives behind an `Arc<Mutex<_>>`, so clones of the wrapper and
/// rayon workers evaluating in parallel share it. The lock is not held while
/// the wrapped evaluator runs. Failed evaluations and non-finite scores are
/// not cached; a non-finite score is returned as an evaluation error.
///
/// # Example
///
/// ```
/// use hyperevo::architecture::layered::LayerWidths;
/// use hyperevo::caching::CachedEvaluator;
/// use hyperevo::error::Result;
/// use hyperevo::evolution::Evaluator;
///
/// let cached: CachedEvaluator<LayerWidths, _> =
///     CachedEvaluator::new(|net: &LayerWidths| -> Result<f64> { Ok(net.depth() as f64) });
///
/// let net = LayerWidths::new(vec![64, 64]).unwrap();
/// assert_eq!(cached.evaluate(&net).unwrap(), 2.0);
/// assert_eq!(cached.evaluate(&net).unwrap(), 2.0);
/// assert_eq!(cached.cache_size().unwrap(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CachedEvaluator<A, E>
where
    A: Architecture + Eq + Hash,
    E: Evaluator<A>,
{
    /// The wrapped evaluator
    evaluator: E,
    /// Scores keyed by configuration
    cache: Arc<Mutex<HashMap<A, f64>>>,
    _marker: PhantomData<fn(&A)>,
}

impl<A, E> CachedEvaluator<A, E>
where
    A: Architecture + Eq + Hash,
    E: Evaluator<A>,
{
    /// Creates a new cached evaluator wrapping the given evaluator.
    pub fn new(evaluator: E) -> Self {
        Self::with_cache(evaluator, HashMap::new())
    }

    /// Creates a new cached evaluator with a pre-populated cache, e.g. scores
    /// saved by an earlier run.
    pub fn with_cache(evaluator: E, cache: HashMap<A, f64>) -> Self {
        Self {
            evaluator,
            cache: Arc::new(Mutex::new(cache)),
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the wrapped evaluator.
    pub fn inner(&self) -> &E {
        &self.evaluator
    }

    /// Returns the number of cached scores.
    pub fn cache_size(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn clear_cache(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    /// Returns a copy of the cache.
    pub fn get_cache(&self) -> Result<HashMap<A, f64>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<A, f64>>> {
        self.cache
            .lock()
            .map_err(|_| EvolveError::Other("Score cache lock poisoned".to_string()))
    }
}

impl<A, E> Evaluator<A> for CachedEvaluator<A, E>
where
    A: Architecture + Eq + Hash,
    E: Evaluator<A>,
{
    fn evaluate(&self, architecture: &A) -> Result<f64> {
        if let Some(score) = self.lock()?.get(architecture) {
            debug!(?architecture, score, "Score cache hit");
            return Ok(*score);
        }

        let score = self.evaluator.evaluate(architecture)?;
        if !score.is_finite() {
            return Err(EvolveError::Evaluation(format!(
                "Non-finite fitness score encountered: {}",
                score
            )));
        }
        self.lock()?.insert(architecture.clone(), score);
        Ok(score)
    }
}
