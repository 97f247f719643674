//! Run diagnostics: grid warnings and per-stage timings

use crate::forest::GridWarning;
use pra_core::Result;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

/// Wall-clock time of one pipeline stage
#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub stage: &'static str,
    pub elapsed: Duration,
}

/// Non-fatal findings of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PraDiagnostics {
    pub warnings: Vec<GridWarning>,
    pub timings: Vec<StageTiming>,
}

impl PraDiagnostics {
    /// Run `f` as stage `stage`, recording and logging its duration on success
    pub fn time<T>(&mut self, stage: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let start = Instant::now();
        let out = f()?;
        let elapsed = start.elapsed();
        info!("{} finished in {:.2?}", stage, elapsed);
        self.timings.push(StageTiming { stage, elapsed });
        Ok(out)
    }

    /// Sum of all stage timings
    pub fn total(&self) -> Duration {
        self.timings.iter().map(|t| t.elapsed).sum()
    }
}
