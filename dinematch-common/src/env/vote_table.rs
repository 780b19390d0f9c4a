use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Like/dislike flags of every member for every place they voted on.
///
/// A member holds at most one flag per place: a later vote replaces the earlier
/// one. Places nobody voted on have no entry.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteTable {
    // PlaceID -> MemberID -> liked
    votes: HashMap<String, HashMap<String, bool>>,
}

impl VoteTable {
    /// Creates an empty vote table.
    pub fn new() -> Self {
        Self {
            votes: HashMap::new(),
        }
    }

    /// Records the flag of `member_id` for `place_id`.
    /// Returns the flag it replaced, if the member had voted on this place before.
    pub fn record(&mut self, place_id: &str, member_id: &str, liked: bool) -> Option<bool> {
        self.votes
            .entry(place_id.to_string())
            .or_default()
            .insert(member_id.to_string(), liked)
    }

    /// Flags recorded for a place, if any.
    pub fn get_votes(&self, place_id: &str) -> Option<&HashMap<String, bool>> {
        self.votes.get(place_id)
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}
