use super::types::SlotRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Get the default slot store path (~/.config/park2go/slots.json)
pub fn get_slots_path() -> PathBuf {
    crate::config::get_config_dir().join("slots.json")
}

/// Load the slot time-series from a JSON file holding an array of rows.
///
/// Unlike the config file, a missing store is an error: there is
/// nothing to recommend without it.
pub fn load_slots(path: &Path) -> Result<Vec<SlotRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open slot store at {}", path.display()))?;

    let slots: Vec<SlotRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse slot store at {}", path.display()))?;

    tracing::debug!(count = slots.len(), path = %path.display(), "loaded slot store");
    Ok(slots)
}
