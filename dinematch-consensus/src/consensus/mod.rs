//! consensus
//!
//! Turns the raw like/dislike flags of a session into a ranked agreement list.
//!
//! Ranking is a pure function of a `SessionSnapshot`; the engine takes the
//! snapshot from the store and releases the lock before any computation, so
//! ranking never blocks writers.

mod engine;
pub mod evaluator;
pub mod export;

pub use engine::ConsensusEngine;
