use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyperevo::{
    architecture::layered::{LayerSpace, LayerWidths},
    caching::CachedEvaluator,
    error::Result,
    evolution::{EvolutionDriver, Evaluator, GenerationReport, LogLevel, SearchOptions},
    rng::RandomNumberGenerator,
};

fn counting_evaluator(
    calls: Arc<AtomicUsize>,
) -> impl Fn(&LayerWidths) -> Result<f64> + Clone + Send + Sync {
    move |net: &LayerWidths| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(net.widths().iter().sum::<u32>() as f64 / 1000.0)
    }
}

#[test]
fn test_cache_bounds_training_calls_by_distinct_configurations() {
    // Two widths and at most two layers: 2 + 4 distinct networks.
    let space = LayerSpace::new(vec![10, 20], 2).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let cached: CachedEvaluator<LayerWidths, _> =
        CachedEvaluator::new(counting_evaluator(Arc::clone(&calls)));
    let options = SearchOptions::builder()
        .population_size(10)
        .generations(6)
        .mutate_chance(0.3)
        .log_level(LogLevel::None)
        .build();
    let driver: EvolutionDriver<LayerWidths, _> =
        EvolutionDriver::new(space, cached.clone(), options);
    let mut rng = RandomNumberGenerator::from_seed(99);
    let mut requested = 0;

    let ranked = driver
        .run_with_observer(&mut rng, |report: &GenerationReport<'_, LayerWidths>| {
            requested += report.evaluations;
        })
        .unwrap();

    let trained = calls.load(Ordering::SeqCst);
    assert_eq!(ranked.len(), 10);
    assert!(trained <= 6);
    assert!(trained <= requested);
    assert_eq!(cached.cache_size().unwrap(), trained);
}

#[test]
fn test_cache_shared_with_parallel_workers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cached: CachedEvaluator<LayerWidths, _> =
        CachedEvaluator::new(counting_evaluator(Arc::clone(&calls)));
    let options = SearchOptions::builder()
        .population_size(16)
        .generations(3)
        .parallel_threshold(2)
        .log_level(LogLevel::None)
        .build();
    let driver: EvolutionDriver<LayerWidths, _> =
        EvolutionDriver::new(LayerSpace::default(), cached.clone(), options);
    let mut rng = RandomNumberGenerator::from_seed(31);

    let ranked = driver.run(&mut rng).unwrap();

    let cache = cached.get_cache().unwrap();
    for genome in &ranked {
        let cached_score = cache.get(genome.architecture()).copied();
        assert_eq!(cached_score, genome.fitness());
    }
    assert!(calls.load(Ordering::SeqCst) >= cache.len());
}

#[test]
fn test_cache_reused_across_runs() {
    let space = LayerSpace::new(vec![10, 20], 1).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let cached: CachedEvaluator<LayerWidths, _> =
        CachedEvaluator::new(counting_evaluator(Arc::clone(&calls)));

    for net in [vec![10], vec![20]] {
        cached.evaluate(&LayerWidths::new(net).unwrap()).unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let options = SearchOptions::builder()
        .population_size(8)
        .generations(3)
        .log_level(LogLevel::None)
        .build();
    let driver: EvolutionDriver<LayerWidths, _> =
        EvolutionDriver::new(space, cached.clone(), options);
    let mut rng = RandomNumberGenerator::from_seed(2);

    driver.run(&mut rng).unwrap();

    // Every configuration in this space was scored before the run started.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
