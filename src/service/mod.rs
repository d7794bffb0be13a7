pub mod aggregator;
pub mod export;
pub mod normalizer;
pub mod rationale;
pub mod reconciler;
pub mod scorer;
pub mod selector;

pub use reconciler::ReconcileService;
pub use scorer::PairwiseScorer;
pub use selector::MatchSelector;
