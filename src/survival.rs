//! Repeated independent runs recording when the lattice dies out.

use crate::config::RunConfig;
use crate::error::SimError;
use crate::random::seeded_rng;
use crate::simulation::{GrowthSimulation, NullSink, DID_NOT_DIE};
use log::{debug, info, warn};

/// Death steps of all completed runs, in run order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurvivalReport {
    pub death_steps: Vec<i64>,
    /// Runs that failed and were skipped
    pub aborted: usize,
}

impl SurvivalReport {
    /// Runs that emptied the lattice before stopping
    pub fn extinct(&self) -> usize {
        self.death_steps.iter().filter(|&&d| d != DID_NOT_DIE).count()
    }
}

/// Run `config.simulation_count` independent growths.
///
/// Each run owns a fresh lattice and generator: with a fixed seed, run `i`
/// is seeded with `seed + i`. `on_run(i, death_step)` is called after every
/// completed run. A run that fails is logged and skipped without touching
/// later runs; an error from `on_run` stops the batch.
pub fn run_survival<F>(config: &RunConfig, mut on_run: F) -> Result<SurvivalReport, SimError>
where
    F: FnMut(usize, i64) -> Result<(), SimError>,
{
    config.validate()?;
    info!(
        "Survival batch: {} runs, L={}, {}D, N={}, {} steps",
        config.simulation_count,
        config.side_length,
        config.dimensions,
        config.species_count,
        config.step_budget
    );

    let mut report = SurvivalReport::default();
    for run in 0..config.simulation_count {
        let rng = seeded_rng(config.seed.map(|seed| seed.wrapping_add(run as u64)));
        let outcome = GrowthSimulation::new(config, rng).and_then(|mut sim| sim.run(&mut NullSink));
        match outcome {
            Ok(summary) => {
                debug!("Run {run}: {} with death step {}", summary.phase.name(), summary.death_step);
                report.death_steps.push(summary.death_step);
                on_run(run, summary.death_step)?;
            }
            Err(err) => {
                warn!("Run {run} aborted: {err}");
                report.aborted += 1;
            }
        }
    }

    info!(
        "Survival batch done: {} of {} runs died out",
        report.extinct(),
        report.death_steps.len()
    );
    Ok(report)
}

/// Fraction of runs still alive at each `t` in `0..steps`.
///
/// A run is alive at `t` when it never died or died after `t`.
pub fn survival_curve(death_steps: &[i64], steps: u64) -> Vec<f64> {
    let total = death_steps.len();
    if total == 0 {
        return Vec::new();
    }
    let steps = steps as usize;
    let mut deaths_at = vec![0usize; steps];
    for &d in death_steps {
        if d >= 0 && (d as usize) < steps {
            deaths_at[d as usize] += 1;
        }
    }

    let mut dead = 0;
    deaths_at
        .iter()
        .map(|&died| {
            dead += died;
            (total - dead) as f64 / total as f64
        })
        .collect()
}
