mod aggregate;
mod empty_merge_policy;
mod pairwise_reducer;
mod reduction_scheduler;
mod ring_differencer;

pub use aggregate::{aggregate, reduce, AggregationOptions};
pub use empty_merge_policy::EmptyMergePolicy;
pub use pairwise_reducer::PairwiseOverlayReducer;
pub use reduction_scheduler::{ConcurrentReductionScheduler, ReductionSummary};
pub use ring_differencer::difference_rings;
