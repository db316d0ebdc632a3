//! Candidate tracking for match peaks.
//!
//! The correlation scan keeps a single running maximum with an explicit,
//! well-ordered tie-break so sequential and parallel scans agree.

pub(crate) mod argmax;
