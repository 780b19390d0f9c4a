use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    place::{Parameters, Place},
    vote_table::VoteTable,
};

/// One group decision: the candidates it was created with, who joined and how
/// they voted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Candidate list, fixed at creation time.
    pub places: Vec<Place>,

    pub parameters: Parameters,

    /// Member identifiers in join order. Joining twice adds a second entry.
    pub members: Vec<String>,

    pub votes: VoteTable,

    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(parameters: Parameters, places: Vec<Place>) -> Self {
        Self {
            places,
            parameters,
            members: Vec::new(),
            votes: VoteTable::new(),
            created_at: Utc::now(),
        }
    }

    /// Point-in-time copy of this session, detached from the store.
    pub fn snapshot(&self, id: &str) -> SessionSnapshot {
        SessionSnapshot {
            id: id.to_string(),
            places: self.places.clone(),
            parameters: self.parameters,
            members: self.members.clone(),
            votes: self.votes.clone(),
            created_at: self.created_at,
        }
    }
}

/// Read-only copy of a session handed to the consensus engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub places: Vec<Place>,
    pub parameters: Parameters,
    pub members: Vec<String>,
    pub votes: VoteTable,
    pub created_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Member count used as the agreement denominator.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_detached() {
        let params = Parameters { distance: 1000, price: 2, rating: 4.0 };
        let mut session = Session::new(params, vec![Place::new("p1", "Alpha")]);
        session.members.push("m1".into());

        let snap = session.snapshot("s1");
        session.members.push("m2".into());
        session.votes.record("p1", "m1", true);

        assert_eq!(snap.id, "s1");
        assert_eq!(snap.member_count(), 1);
        assert!(snap.votes.is_empty());
        assert_eq!(snap.places, vec![Place::new("p1", "Alpha")]);
    }
}
