use crate::error::SimError;
use crate::settings::{BoundaryLayout, RunMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete description of a run (or batch of survival runs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// What the run records
    pub mode: RunMode,
    /// Lattice extent along every axis
    pub side_length: usize,
    /// Number of lattice axes
    pub dimensions: usize,
    /// Species ids are drawn from `1..=species_count`
    pub species_count: u32,
    /// Maximum number of growth steps per run
    pub step_budget: i64,
    /// Independent runs in survival mode
    pub simulation_count: usize,
    /// Boundary policy across axes
    #[serde(default)]
    pub boundary: BoundaryLayout,
    /// Fixed seed for reproducible runs; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Reject a configuration before any lattice is built
    pub fn validate(&self) -> Result<(), SimError> {
        if self.side_length < 1 {
            return Err(SimError::invalid("side length must be at least 1"));
        }
        if self.dimensions < 1 {
            return Err(SimError::invalid("dimension count must be at least 1"));
        }
        if self.species_count < 1 {
            return Err(SimError::invalid("species count must be at least 1"));
        }
        if self.step_budget < 0 {
            return Err(SimError::invalid(format!(
                "step budget must not be negative, got {}",
                self.step_budget
            )));
        }
        if self.mode == RunMode::Survival && self.simulation_count < 1 {
            return Err(SimError::invalid("simulation count must be at least 1"));
        }
        let fits = u32::try_from(self.dimensions)
            .ok()
            .and_then(|dims| self.side_length.checked_pow(dims))
            .is_some();
        if !fits {
            return Err(SimError::invalid(format!(
                "a lattice of side {} in {} dimensions is too large",
                self.side_length, self.dimensions
            )));
        }
        Ok(())
    }

    /// Step budget as an unsigned count; call after `validate`
    pub fn steps(&self) -> u64 {
        self.step_budget.max(0) as u64
    }

    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, SimError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            version: 1,
            mode: RunMode::Lattice,
            side_length: 32,
            dimensions: 2,
            species_count: 3,
            step_budget: 1024,
            simulation_count: 1,
            boundary: BoundaryLayout::Clamped,
            seed: None,
        }
    }
}
