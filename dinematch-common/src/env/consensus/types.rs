use serde::{Deserialize, Serialize};

/// One row of a consensus report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlace {
    /// The candidate this row refers to.
    pub place_id: String,

    /// Display name of the candidate.
    pub name: String,

    /// Percentage of current members who liked the place.
    pub agreement: f64,

    /// Number of "like" flags.
    pub likes: usize,

    /// Number of members who voted on the place, liking or not.
    pub votes: usize,
}
