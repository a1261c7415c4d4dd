mod aggregator;

pub use aggregator::{aggregate, Contribution, ScopeAggregator, ScopeReport};
