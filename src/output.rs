//! Tab-separated result tables.
//!
//! Every table starts with a header row naming its columns, followed by
//! one row per record.

use crate::config::RunConfig;
use crate::error::SimError;
use crate::settings::RunMode;
use crate::simulation::{Observation, ObservationSink};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `step\tlattice` rows, the lattice flattened row-major and comma-separated
pub struct LatticeWriter<W: Write> {
    out: W,
}

impl<W: Write> LatticeWriter<W> {
    pub fn new(mut out: W) -> Result<Self, SimError> {
        writeln!(out, "step\tlattice")?;
        Ok(Self { out })
    }

    pub fn finish(mut self) -> Result<W, SimError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> ObservationSink for LatticeWriter<W> {
    fn observe(&mut self, observation: &Observation<'_>) -> Result<(), SimError> {
        write!(self.out, "{}\t", observation.step)?;
        for (i, value) in observation.lattice.cells().iter().enumerate() {
            if i > 0 {
                self.out.write_all(b",")?;
            }
            write!(self.out, "{value}")?;
        }
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

/// `step\tfilled\tcleared` rows
pub struct MassWriter<W: Write> {
    out: W,
}

impl<W: Write> MassWriter<W> {
    pub fn new(mut out: W) -> Result<Self, SimError> {
        writeln!(out, "step\tfilled\tcleared")?;
        Ok(Self { out })
    }

    pub fn finish(mut self) -> Result<W, SimError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> ObservationSink for MassWriter<W> {
    fn observe(&mut self, observation: &Observation<'_>) -> Result<(), SimError> {
        writeln!(
            self.out,
            "{}\t{}\t{}",
            observation.step,
            observation.lattice.filled(),
            observation.cleared
        )?;
        Ok(())
    }
}

/// `sim\tt_dead` rows, one per completed survival run
pub struct SurvivalWriter<W: Write> {
    out: W,
}

impl<W: Write> SurvivalWriter<W> {
    pub fn new(mut out: W) -> Result<Self, SimError> {
        writeln!(out, "sim\tt_dead")?;
        Ok(Self { out })
    }

    pub fn record(&mut self, run: usize, death_step: i64) -> Result<(), SimError> {
        writeln!(self.out, "{run}\t{death_step}")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W, SimError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Write a survival curve as `t\tsurvival` rows
pub fn write_survival_curve<W: Write>(mut out: W, curve: &[f64]) -> Result<(), SimError> {
    writeln!(out, "t\tsurvival")?;
    for (t, p) in curve.iter().enumerate() {
        writeln!(out, "{t}\t{p}")?;
    }
    out.flush()?;
    Ok(())
}

/// Conventional location of a run's table under `root`
///
/// `lattice<D>D/` and `mass<D>D/` for single runs, `survival/<D>D/` for
/// survival batches, file named after side, species and step budget.
pub fn default_output_path(root: &Path, config: &RunConfig) -> PathBuf {
    let dir = match config.mode {
        RunMode::Survival => root
            .join(config.mode.dir_name())
            .join(format!("{}D", config.dimensions)),
        RunMode::Lattice | RunMode::Mass => {
            root.join(format!("{}{}D", config.mode.dir_name(), config.dimensions))
        }
    };
    dir.join(format!(
        "L_{}_N_{}_steps_{}.tsv",
        config.side_length, config.species_count, config.step_budget
    ))
}

/// Open `path` for buffered writing, creating parent directories.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, SimError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Lattice;
    use crate::settings::BoundaryLayout;
    use tempfile::tempdir;

    fn small_lattice() -> Lattice {
        let mut l = Lattice::new(2, BoundaryLayout::Clamped.axes(2)).unwrap();
        l.set_at(&[0, 1], 3);
        l.set_at(&[1, 0], 1);
        l
    }

    #[test]
    fn test_lattice_rows() {
        let l = small_lattice();
        let mut w = LatticeWriter::new(Vec::new()).unwrap();
        w.observe(&Observation { step: 0, cleared: 0, lattice: &l }).unwrap();
        w.observe(&Observation { step: 1, cleared: 2, lattice: &l }).unwrap();
        let text = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(text, "step\tlattice\n0\t0,3,1,0\n1\t0,3,1,0\n");
    }

    #[test]
    fn test_mass_rows() {
        let l = small_lattice();
        let mut w = MassWriter::new(Vec::new()).unwrap();
        w.observe(&Observation { step: 4, cleared: 3, lattice: &l }).unwrap();
        let text = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(text, "step\tfilled\tcleared\n4\t2\t3\n");
    }

    #[test]
    fn test_survival_rows_and_curve() {
        let mut w = SurvivalWriter::new(Vec::new()).unwrap();
        w.record(0, 17).unwrap();
        w.record(1, -1).unwrap();
        let text = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(text, "sim\tt_dead\n0\t17\n1\t-1\n");

        let mut curve = Vec::new();
        write_survival_curve(&mut curve, &[1.0, 0.5]).unwrap();
        assert_eq!(String::from_utf8(curve).unwrap(), "t\tsurvival\n0\t1\n1\t0.5\n");
    }

    #[test]
    fn test_default_paths() {
        let root = Path::new("outputs");
        let lattice = RunConfig::default();
        assert_eq!(
            default_output_path(root, &lattice),
            Path::new("outputs/lattice2D/L_32_N_3_steps_1024.tsv")
        );
        let survival = RunConfig {
            mode: RunMode::Survival,
            side_length: 16,
            dimensions: 3,
            step_budget: 4096,
            ..Default::default()
        };
        assert_eq!(
            default_output_path(root, &survival),
            Path::new("outputs/survival/3D/L_16_N_3_steps_4096.tsv")
        );
    }

    #[test]
    fn test_create_output_makes_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("run.tsv");
        let mut w = SurvivalWriter::new(create_output(&path).unwrap()).unwrap();
        w.record(0, 5).unwrap();
        w.finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "sim\tt_dead\n0\t5\n");
    }
}
