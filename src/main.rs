mod cluster;
mod config;
mod error;
mod frontier;
mod lattice;
mod output;
mod presets;
mod random;
mod repair;
mod settings;
mod simulation;
mod survival;

use clap::Parser;
use config::RunConfig;
use error::SimError;
use log::info;
use output::{LatticeWriter, MassWriter, SurvivalWriter};
use presets::{Preset, PresetManager};
use settings::{BoundaryLayout, RunMode};
use simulation::{GrowthSimulation, Observation, ObservationSink};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "eden-annihilation")]
#[command(about = "Eden growth with same-species cluster annihilation on a D-dimensional lattice")]
struct Args {
    // === Base Configuration ===
    /// Start from a named preset (see --list-presets)
    #[arg(long)]
    preset: Option<String>,

    /// Start from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run mode (lattice, mass, survival)
    #[arg(long)]
    mode: Option<String>,

    // === Lattice Parameters ===
    /// Lattice side length L
    #[arg(short = 'L', long = "side")]
    side: Option<usize>,

    /// Number of lattice dimensions
    #[arg(short = 'd', long = "dims")]
    dims: Option<usize>,

    /// Boundary layout (clamped, periodic, periodic-horizontal)
    #[arg(long)]
    boundary: Option<String>,

    // === Process Parameters ===
    /// Number of species N
    #[arg(short = 'n', long)]
    species: Option<u32>,

    /// Step budget per run
    #[arg(short = 's', long, allow_negative_numbers = true)]
    steps: Option<i64>,

    /// Independent runs in survival mode
    #[arg(long)]
    sims: Option<usize>,

    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    // === Output ===
    /// Output TSV path (default: outputs/<mode>/L_<L>_N_<N>_steps_<S>.tsv)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Also write the survival curve to this TSV (survival mode)
    #[arg(long)]
    curve: Option<PathBuf>,

    /// Write the effective config as JSON and continue
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Store the effective config as a user preset and exit
    #[arg(long = "save-preset")]
    save_preset: Option<String>,

    /// Remove a user preset and exit
    #[arg(long = "delete-preset")]
    delete_preset: Option<String>,

    /// List available presets and exit
    #[arg(long = "list-presets")]
    list_presets: bool,

    /// Suppress progress output
    #[arg(short = 'q', long)]
    quiet: bool,
}

/// Merge preset, config file and explicit options, in that order.
fn resolve_config(args: &Args, presets: &PresetManager) -> Result<RunConfig, SimError> {
    let mut config = match (&args.config, &args.preset) {
        (Some(path), _) => RunConfig::load_from_file(path)?,
        (None, Some(name)) => presets.find(name)?.config.clone(),
        (None, None) => RunConfig::default(),
    };

    if let Some(mode) = &args.mode {
        config.mode = RunMode::parse(mode)?;
    }
    if let Some(boundary) = &args.boundary {
        config.boundary = BoundaryLayout::parse(boundary)?;
    }
    if let Some(side) = args.side {
        config.side_length = side;
    }
    if let Some(dims) = args.dims {
        config.dimensions = dims;
    }
    if let Some(species) = args.species {
        config.species_count = species;
    }
    if let Some(steps) = args.steps {
        config.step_budget = steps;
    }
    if let Some(sims) = args.sims {
        config.simulation_count = sims;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

/// Forwards observations and prints a best-effort progress line to stderr
struct Progress<'a, S> {
    inner: &'a mut S,
    total: u64,
    last_percent: u64,
    quiet: bool,
}

impl<S: ObservationSink> ObservationSink for Progress<'_, S> {
    fn observe(&mut self, observation: &Observation<'_>) -> Result<(), SimError> {
        self.inner.observe(observation)?;
        if !self.quiet && self.total > 0 {
            let percent = 100 * (observation.step + 1) / self.total;
            if percent != self.last_percent {
                self.last_percent = percent;
                eprint!("\rProgress: {percent}% ");
                let _ = std::io::stderr().flush();
            }
        }
        Ok(())
    }
}

fn run_single<S: ObservationSink>(config: &RunConfig, sink: &mut S, quiet: bool) -> Result<(), SimError> {
    let rng = random::seeded_rng(config.seed);
    let mut sim = GrowthSimulation::new(config, rng)?;
    let mut progress = Progress {
        inner: sink,
        total: config.steps(),
        last_percent: 0,
        quiet,
    };
    let summary = sim.run(&mut progress)?;
    if !quiet {
        eprintln!();
    }
    info!(
        "{} after {} steps, {} of {} cells filled, death step {}",
        summary.phase.name(),
        summary.steps,
        summary.filled,
        sim.lattice().cell_count(),
        summary.death_step
    );
    Ok(())
}

fn run_batch(config: &RunConfig, path: &Path, curve: Option<&Path>, quiet: bool) -> Result<(), SimError> {
    let mut writer = SurvivalWriter::new(output::create_output(path)?)?;
    let total = config.simulation_count;
    let report = survival::run_survival(config, |run, death_step| {
        writer.record(run, death_step)?;
        if !quiet {
            eprint!("\rSim {}/{}", run + 1, total);
            let _ = std::io::stderr().flush();
        }
        Ok(())
    })?;
    writer.finish()?;
    if !quiet {
        eprintln!();
    }

    if let Some(curve_path) = curve {
        let points = survival::survival_curve(&report.death_steps, config.steps());
        output::write_survival_curve(output::create_output(curve_path)?, &points)?;
        info!("Survival curve written to {}", curve_path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let mut presets = PresetManager::new();

    if args.list_presets {
        for preset in presets.all_presets() {
            let c = &preset.config;
            println!(
                "{:<14} {:<9} L={:<4} D={} N={} steps={} sims={} {:<20} {}",
                preset.name,
                c.mode.name(),
                c.side_length,
                c.dimensions,
                c.species_count,
                c.step_budget,
                c.simulation_count,
                c.boundary.name(),
                preset.description
            );
        }
        return Ok(());
    }

    if let Some(name) = &args.delete_preset {
        presets.delete_preset(name)?;
        info!("Preset '{name}' deleted");
        return Ok(());
    }

    let config = resolve_config(&args, &presets)?;

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        info!("Config written to {}", path.display());
    }
    if let Some(name) = &args.save_preset {
        let path = presets.save_preset(Preset::new(name.clone(), "user preset", config))?;
        info!("Preset '{name}' saved to {}", path.display());
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| output::default_output_path(Path::new("outputs"), &config));
    info!(
        "{} run: L={} D={} N={} steps={} boundary={} -> {}",
        config.mode.name(),
        config.side_length,
        config.dimensions,
        config.species_count,
        config.step_budget,
        config.boundary.name(),
        path.display()
    );

    match config.mode {
        RunMode::Lattice => {
            let mut writer = LatticeWriter::new(output::create_output(&path)?)?;
            run_single(&config, &mut writer, args.quiet)?;
            writer.finish()?;
        }
        RunMode::Mass => {
            let mut writer = MassWriter::new(output::create_output(&path)?)?;
            run_single(&config, &mut writer, args.quiet)?;
            writer.finish()?;
        }
        RunMode::Survival => {
            run_batch(&config, &path, args.curve.as_deref(), args.quiet)?;
        }
    }

    Ok(())
}
