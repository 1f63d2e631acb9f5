// Chaperone: risk profiling and audit trail for chat-safety review.
//
// This is the library root. Each module corresponds to a major subsystem
// of the profiling and audit pipeline.

pub mod audit;
pub mod config;
pub mod ingest;
pub mod output;
pub mod patterns;
pub mod pipeline;
pub mod query;
pub mod scoring;
pub mod sentiment;
