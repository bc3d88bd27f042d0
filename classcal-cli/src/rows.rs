//! Reading schedule rows exported from the spreadsheet.

use std::path::Path;

use anyhow::{Context, Result};
use classcal_core::RawRow;

/// Load a JSON array of rows. Cells may be missing or null.
pub fn load(path: &Path) -> Result<Vec<RawRow>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule from {}", path.display()))?;

    let rows = parse(&contents)
        .with_context(|| format!("Failed to parse schedule from {}", path.display()))?;
    log::debug!("Loaded {} rows from {}", rows.len(), path.display());

    Ok(rows)
}

fn parse(contents: &str) -> Result<Vec<RawRow>> {
    let rows: Vec<RawRow> = serde_json::from_str(contents)?;

    if rows.is_empty() {
        anyhow::bail!("The schedule has no rows");
    }

    Ok(rows)
}
