use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const TRANSLATION_TIME: &str = "translation_time";
pub const EXECUTION_TIME: &str = "execution_time";
pub const TOTAL_TIME: &str = "total_time";

/// Elapsed seconds per phase, in the order the phases ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Telemetry {
    phases: IndexMap<String, f64>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `elapsed` under `phase` and returns it in seconds.
    pub fn record(&mut self, phase: &str, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        self.phases.insert(phase.to_string(), secs);
        secs
    }

    /// Sets `total_time` once both measured phases are present.
    pub fn finish(&mut self) {
        if let (Some(translation), Some(execution)) =
            (self.translation_time(), self.execution_time())
        {
            self.phases.insert(TOTAL_TIME.to_string(), translation + execution);
        }
    }

    pub fn get(&self, phase: &str) -> Option<f64> {
        self.phases.get(phase).copied()
    }

    pub fn contains(&self, phase: &str) -> bool {
        self.phases.contains_key(phase)
    }

    pub fn translation_time(&self) -> Option<f64> {
        self.get(TRANSLATION_TIME)
    }

    pub fn execution_time(&self) -> Option<f64> {
        self.get(EXECUTION_TIME)
    }

    pub fn total_time(&self) -> Option<f64> {
        self.get(TOTAL_TIME)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.phases.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }
}
