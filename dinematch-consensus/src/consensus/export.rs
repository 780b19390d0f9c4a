use std::{fs, path::Path};

use dinematch_common::{env::consensus::types::RankedPlace, error::Result};

/// Renders a ranking as text, one `"<name> - <n>% agreed"` line per place.
pub fn format_ranking(ranking: &[RankedPlace]) -> String {
    ranking
        .iter()
        .map(|r| format!("{} - {:.0}% agreed\n", r.name, r.agreement))
        .collect()
}

/// Writes the rendered ranking to `path`, replacing any existing file.
pub fn write_ranking<P: AsRef<Path>>(path: P, ranking: &[RankedPlace]) -> Result<()> {
    fs::write(path, format_ranking(ranking))?;
    Ok(())
}
