// Library root: scoring rules, score calculation, season aggregation, and the
// CSV/config plumbing around them.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod stats;
pub mod summary;
