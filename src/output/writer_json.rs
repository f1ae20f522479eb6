use std::fs;
use std::path::Path;

use crate::probe::ProbeResult;

/// Pretty-printed JSON array, in scan order.
pub fn write_json(path: &Path, items: &[ProbeResult]) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(items)?;
    fs::write(path, data)?;
    Ok(())
}
