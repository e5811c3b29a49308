use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::stats::RunReport;
use crate::world::WorldSnapshot;

/// Writes the full per-tick snapshot (counts, severity map, firefighter
/// positions) as JSON every `interval_ticks` ticks. An interval of 0 turns
/// snapshotting off.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    pub fn maybe_write(&self, snapshot: &WorldSnapshot) -> Result<Option<PathBuf>> {
        if self.interval_ticks == 0 || snapshot.tick % self.interval_ticks != 0 {
            return Ok(None);
        }

        let dir = self.dir.join(&snapshot.scenario);
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{:06}.json", snapshot.tick));
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}

/// Write the end-of-run report consumed by the external plotting tool.
pub fn write_report(path: impl AsRef<Path>, report: &RunReport) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create report dir {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("failed to write report {}", path.display()))
}
