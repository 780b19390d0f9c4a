use std::{path::Path, sync::Arc};

use dinematch_common::{env::consensus::types::RankedPlace, error::Result};
use dinematch_session::SessionStore;
use tracing::info;

use super::{evaluator, export};

/// Ranks sessions held by a shared `SessionStore`.
#[derive(Debug, Clone)]
pub struct ConsensusEngine {
    store: Arc<SessionStore>,
}

impl ConsensusEngine {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Current ranking of a session. The store lock is only held while the
    /// snapshot is taken.
    pub fn show_consensus(&self, session_id: &str) -> Result<Vec<RankedPlace>> {
        let snapshot = self.store.snapshot(session_id)?;
        let ranking = evaluator::rank(&snapshot)?;

        info!(
            "🗳️ Consensus for [{}]: {} ranked of {} candidates, {} members",
            session_id,
            ranking.len(),
            snapshot.places.len(),
            snapshot.member_count()
        );
        Ok(ranking)
    }

    /// Ranks a session and writes the text export to `path`.
    /// Returns the number of places written.
    pub fn save_list<P: AsRef<Path>>(&self, session_id: &str, path: P) -> Result<usize> {
        let ranking = self.show_consensus(session_id)?;
        export::write_ranking(path.as_ref(), &ranking)?;

        info!("💾 Consensus list for [{}] saved to {}", session_id, path.as_ref().display());
        Ok(ranking.len())
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }
}
