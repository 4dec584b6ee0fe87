// Overlap analysis — seed collection, per-author expansion, aggregation.

pub mod accumulator;
pub mod dates;
pub mod pipeline;
pub mod subreddit;
