//! Mesh processing algorithms.
//!
//! - **Beautify**: greedy edge rotation driven by a triangle quality
//!   metric, for cleaning up skinny triangulations (e.g. after filling a
//!   polygon with a fan or ear clipping).
//! - **Progress**: callback plumbing for long-running operations.

pub mod beautify;
pub mod progress;
