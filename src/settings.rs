use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Neighbor policy along one lattice axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Boundary {
    /// Out-of-range neighbors are omitted
    #[default]
    Clamped,
    /// Coordinates wrap modulo the side length (toroidal)
    Periodic,
}

/// How boundaries are assigned across all axes of a lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryLayout {
    /// Every axis clamped (all growth variants)
    #[default]
    Clamped,
    /// Every axis periodic
    Periodic,
    /// Horizontal axes periodic, last (height) axis clamped
    PeriodicHorizontal,
}

impl BoundaryLayout {
    pub fn name(&self) -> &str {
        match self {
            BoundaryLayout::Clamped => "Clamped",
            BoundaryLayout::Periodic => "Periodic",
            BoundaryLayout::PeriodicHorizontal => "Periodic-Horizontal",
        }
    }

    /// Expand into one policy per axis
    pub fn axes(&self, dimensions: usize) -> Vec<Boundary> {
        match self {
            BoundaryLayout::Clamped => vec![Boundary::Clamped; dimensions],
            BoundaryLayout::Periodic => vec![Boundary::Periodic; dimensions],
            BoundaryLayout::PeriodicHorizontal => {
                let mut axes = vec![Boundary::Periodic; dimensions];
                if let Some(height) = axes.last_mut() {
                    *height = Boundary::Clamped;
                }
                axes
            }
        }
    }

    pub fn parse(s: &str) -> Result<Self, SimError> {
        match s.to_lowercase().as_str() {
            "clamped" | "clamp" | "free" => Ok(BoundaryLayout::Clamped),
            "periodic" | "wrap" | "toroidal" => Ok(BoundaryLayout::Periodic),
            "periodic-horizontal" | "horizontal" | "gravity" => {
                Ok(BoundaryLayout::PeriodicHorizontal)
            }
            other => Err(SimError::invalid(format!("unknown boundary layout '{other}'"))),
        }
    }
}

/// What a run records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunMode {
    /// One run, full lattice snapshot per step
    #[default]
    Lattice,
    /// One run, filled-cell count per step
    Mass,
    /// Many independent runs, time of death per run
    Survival,
}

impl RunMode {
    pub fn name(&self) -> &str {
        match self {
            RunMode::Lattice => "Lattice",
            RunMode::Mass => "Mass",
            RunMode::Survival => "Survival",
        }
    }

    /// Directory stem used under `outputs/`
    pub fn dir_name(&self) -> &str {
        match self {
            RunMode::Lattice => "lattice",
            RunMode::Mass => "mass",
            RunMode::Survival => "survival",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SimError> {
        match s.to_lowercase().as_str() {
            "lattice" | "snapshot" => Ok(RunMode::Lattice),
            "mass" | "density" => Ok(RunMode::Mass),
            "survival" | "death" => Ok(RunMode::Survival),
            other => Err(SimError::invalid(format!("unknown run mode '{other}'"))),
        }
    }
}
