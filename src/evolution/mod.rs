pub mod driver;
pub mod evaluator;
pub mod options;
pub mod report;

pub use driver::{run, EvolutionDriver};
pub use evaluator::{Evaluator, FailurePolicy};
pub use options::{LogLevel, SearchOptions, SearchOptionsBuilder};
pub use report::{GenerationObserver, GenerationReport};
