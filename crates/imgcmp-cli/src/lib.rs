//! Shared pieces of the imgcmp command-line tool.
//!
//! The binary itself stays thin; candidate resolution and the batch
//! loop live here so they can be exercised by tests without spawning a
//! process.

pub mod batch;

pub use batch::{BatchOutcome, CandidateSource, run, split_candidate_list};
