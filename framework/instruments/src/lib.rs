mod collector;
pub mod report;

pub use collector::ResultsCollector;
