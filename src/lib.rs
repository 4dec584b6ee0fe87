// subreddit-overlap: which subreddits does a community's crowd also post in?
//
// This is the library root. `pushshift` talks to the search API, `analysis`
// runs the seed/expansion pipeline, `output` ranks and renders the result.

pub mod analysis;
pub mod config;
pub mod output;
pub mod pushshift;
