use csv::Writer;
use std::fs::File;
use std::path::Path;

use crate::probe::ProbeResult;

/// Header row is derived from `ProbeResult`'s field order:
/// path,url,status,ok,redirected,final_url,elapsed_ms,content_length
pub fn write_csv(path: &Path, items: &[ProbeResult]) -> anyhow::Result<()> {
    let f = File::create(path)?;
    let mut w = Writer::from_writer(f);
    for it in items {
        w.serialize(it)?;
    }
    w.flush()?;
    Ok(())
}
