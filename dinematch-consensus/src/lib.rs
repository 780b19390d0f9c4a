pub mod consensus;

pub use consensus::ConsensusEngine;
pub use consensus::evaluator::rank;
pub use consensus::export::{format_ranking, write_ranking};
