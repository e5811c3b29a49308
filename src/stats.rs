use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Counts taken from one consistent post-tick scan of the patch map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickCounts {
    pub forested: usize,
    pub bare: usize,
    pub ignited: usize,
    pub firefighters_alive: usize,
}

/// Tick-indexed time series for the whole run. Entry 0 is recorded right
/// after world building, before the first transition, so after N ticks each
/// series holds N + 1 values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsLog {
    pub forested: Vec<usize>,
    pub bare: Vec<usize>,
    pub ignited: Vec<usize>,
    pub firefighters_alive: Vec<usize>,
    /// Cumulative forested patches consumed by fire (Forested -> Bare).
    pub consumed_by_fire: u64,
    /// Cumulative bare patches that regrew (Bare -> Forested).
    pub regrown: u64,
    pub initial_firefighters: usize,
    pub dead_firefighters: usize,
}

impl StatsLog {
    pub fn record(&mut self, counts: TickCounts) {
        self.forested.push(counts.forested);
        self.bare.push(counts.bare);
        self.ignited.push(counts.ignited);
        self.firefighters_alive.push(counts.firefighters_alive);
    }

    /// Number of recorded entries, including the initial one.
    pub fn len(&self) -> usize {
        self.forested.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forested.is_empty()
    }

    pub fn alive_firefighters(&self) -> usize {
        self.initial_firefighters.saturating_sub(self.dead_firefighters)
    }

    pub fn latest(&self) -> Option<TickCounts> {
        let last = self.forested.len().checked_sub(1)?;
        Some(TickCounts {
            forested: self.forested[last],
            bare: self.bare[last],
            ignited: self.ignited[last],
            firefighters_alive: self.firefighters_alive[last],
        })
    }

    pub fn report(&self, scenario: &str, ticks: u64, total_patches: usize) -> RunReport {
        RunReport {
            scenario: scenario.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            ticks,
            total_patches,
            consumed_by_fire: self.consumed_by_fire,
            regrown: self.regrown,
            series: self.clone(),
        }
    }
}

/// Final artifact of a run, written as JSON for the external plotting tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario: String,
    pub generated_at: String,
    pub ticks: u64,
    pub total_patches: usize,
    pub consumed_by_fire: u64,
    pub regrown: u64,
    pub series: StatsLog,
}
