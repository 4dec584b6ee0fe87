// Pushshift search client — submission search over HTTP with 429 retries.
//
// The client talks to the network through the `Transport` trait so the
// aggregation pipeline can be driven by a scripted transport in tests.

pub mod client;
pub mod error;
pub mod models;
pub mod retry;
pub mod transport;
