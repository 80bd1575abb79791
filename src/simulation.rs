use crate::cluster::ClusterAnnihilator;
use crate::config::RunConfig;
use crate::error::SimError;
use crate::frontier::FrontierSet;
use crate::lattice::{Lattice, EMPTY};
use crate::random::RandomSource;
use crate::repair::repair_frontier;
use log::{debug, info};

/// Death step recorded when the lattice never emptied
pub const DID_NOT_DIE: i64 = -1;

/// Lifecycle of a growth run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Center cell filled, no growth step taken yet
    Seeded,
    /// At least one growth step taken
    Growing,
    /// No empty cell borders occupied matter
    FrontierExhausted,
    /// The configured number of steps ran
    StepBudgetReached,
    /// The run ended with every cell empty
    Extinguished,
}

impl Phase {
    pub fn name(&self) -> &str {
        match self {
            Phase::Seeded => "Seeded",
            Phase::Growing => "Growing",
            Phase::FrontierExhausted => "Frontier Exhausted",
            Phase::StepBudgetReached => "Step Budget Reached",
            Phase::Extinguished => "Extinguished",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Phase::FrontierExhausted | Phase::StepBudgetReached | Phase::Extinguished
        )
    }
}

/// What happened during one growth step
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Zero-based step index
    pub step: u64,
    /// Cell that was filled
    pub index: usize,
    /// Species deposited
    pub species: u32,
    /// Cells annihilated by this deposit (0 when none)
    pub cleared: usize,
}

/// State handed to an [`ObservationSink`] after every step
pub struct Observation<'a> {
    pub step: u64,
    pub cleared: usize,
    pub lattice: &'a Lattice,
}

/// Receives one observation per growth step
pub trait ObservationSink {
    fn observe(&mut self, observation: &Observation<'_>) -> Result<(), SimError>;
}

/// Sink that discards every observation
pub struct NullSink;

impl ObservationSink for NullSink {
    fn observe(&mut self, _observation: &Observation<'_>) -> Result<(), SimError> {
        Ok(())
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub phase: Phase,
    pub steps: u64,
    pub filled: usize,
    /// Last step index if the lattice ended empty, [`DID_NOT_DIE`] otherwise
    pub death_step: i64,
}

/// Eden growth with same-species cluster annihilation.
///
/// Owns the lattice, the frontier and the annihilator scratch for one run.
/// Each step picks a uniformly random frontier cell, fills it with a
/// random species, extends the frontier around it, annihilates the
/// deposit's cluster if it spans more than one cell and repairs the
/// frontier around whatever was cleared.
pub struct GrowthSimulation<R> {
    lattice: Lattice,
    frontier: FrontierSet,
    annihilator: ClusterAnnihilator,
    rng: R,
    species_count: u32,
    step_budget: u64,
    steps_taken: u64,
    last_fill_step: Option<u64>,
    phase: Phase,
}

impl<R: RandomSource> GrowthSimulation<R> {
    /// Validate `config`, build the lattice and seed its center cell.
    pub fn new(config: &RunConfig, rng: R) -> Result<Self, SimError> {
        config.validate()?;
        let lattice = Lattice::new(config.side_length, config.boundary.axes(config.dimensions))?;
        let cell_count = lattice.cell_count();

        let mut sim = Self {
            lattice,
            frontier: FrontierSet::new(cell_count),
            annihilator: ClusterAnnihilator::new(cell_count),
            rng,
            species_count: config.species_count,
            step_budget: config.steps(),
            steps_taken: 0,
            last_fill_step: None,
            phase: Phase::Seeded,
        };
        sim.seed();
        Ok(sim)
    }

    fn seed(&mut self) {
        let center = self.lattice.center();
        let species = self.rng.species(self.species_count);
        self.lattice.set(center, species);
        self.extend_frontier(center);
        self.phase = Phase::Seeded;
        debug!(
            "Seeded {:?} with species {species}, frontier {}",
            self.lattice.coord_of(center),
            self.frontier.len()
        );
    }

    fn extend_frontier(&mut self, index: usize) {
        for n in self.lattice.neighbors(index) {
            if self.lattice.get(n) == EMPTY {
                self.frontier.insert(n);
            }
        }
    }

    /// Advance one step.
    ///
    /// Returns `None` once the run has reached a terminal phase; an empty
    /// frontier takes precedence over an exhausted step budget.
    pub fn step(&mut self) -> Result<Option<StepReport>, SimError> {
        if self.phase.is_terminal() {
            return Ok(None);
        }
        if self.frontier.is_empty() {
            self.phase = Phase::FrontierExhausted;
            return Ok(None);
        }
        if self.steps_taken >= self.step_budget {
            self.phase = Phase::StepBudgetReached;
            return Ok(None);
        }
        self.phase = Phase::Growing;

        let step = self.steps_taken;
        let index = self.frontier.pick_random(&mut self.rng)?;
        self.frontier.remove(index);
        let species = self.rng.species(self.species_count);
        self.lattice.set(index, species);
        self.extend_frontier(index);

        let cleared = self.annihilator.find_and_clear(&mut self.lattice, index)?;
        if !cleared.is_empty() {
            repair_frontier(&self.lattice, &mut self.frontier, cleared);
        }
        let cleared = cleared.len();

        self.steps_taken += 1;
        self.last_fill_step = Some(step);
        Ok(Some(StepReport {
            step,
            index,
            species,
            cleared,
        }))
    }

    /// Step until a terminal phase, emitting one observation per step.
    pub fn run<S: ObservationSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary, SimError> {
        debug!(
            "Growing on {} cells ({}D, side {}), {} species, budget {}",
            self.lattice.cell_count(),
            self.lattice.dimensions(),
            self.lattice.side(),
            self.species_count,
            self.step_budget
        );
        while let Some(report) = self.step()? {
            sink.observe(&Observation {
                step: report.step,
                cleared: report.cleared,
                lattice: &self.lattice,
            })?;
        }
        if self.lattice.is_vacant() {
            self.phase = Phase::Extinguished;
        }

        let summary = self.summary();
        info!(
            "Run finished: {} after {} steps, {} cells filled",
            summary.phase.name(),
            summary.steps,
            summary.filled
        );
        Ok(summary)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            phase: self.phase,
            steps: self.steps_taken,
            filled: self.lattice.filled(),
            death_step: self.death_step(),
        }
    }

    /// Index of the last filling step if the lattice is now empty
    pub fn death_step(&self) -> i64 {
        match self.last_fill_step {
            Some(step) if self.lattice.is_vacant() => step as i64,
            _ => DID_NOT_DIE,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    #[allow(dead_code)]
    pub fn frontier(&self) -> &FrontierSet {
        &self.frontier
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[allow(dead_code)]
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded_rng;
    use crate::repair::frontier_oracle;
    use crate::settings::BoundaryLayout;
    use proptest::prelude::*;
    use rand::rngs::mock::StepRng;

    fn config(side: usize, dims: usize, species: u32, budget: i64) -> RunConfig {
        RunConfig {
            side_length: side,
            dimensions: dims,
            species_count: species,
            step_budget: budget,
            ..Default::default()
        }
    }

    fn sorted_frontier<R: RandomSource>(sim: &GrowthSimulation<R>) -> Vec<usize> {
        let mut m = sim.frontier().members().to_vec();
        m.sort_unstable();
        m
    }

    struct Recorder {
        steps: Vec<u64>,
        filled: Vec<usize>,
    }

    impl ObservationSink for Recorder {
        fn observe(&mut self, observation: &Observation<'_>) -> Result<(), SimError> {
            self.steps.push(observation.step);
            self.filled.push(observation.lattice.filled());
            Ok(())
        }
    }

    #[test]
    fn test_seeding_fills_center() {
        let sim = GrowthSimulation::new(&config(3, 2, 3, 10), seeded_rng(Some(1))).unwrap();
        let l = sim.lattice();
        assert_eq!(sim.phase(), Phase::Seeded);
        assert_eq!(l.filled(), 1);
        assert_ne!(l.get_at(&[1, 1]), EMPTY);
        let expected: Vec<usize> = [[0, 1], [1, 0], [1, 2], [2, 1]]
            .iter()
            .map(|c| l.index_of(c))
            .collect();
        assert_eq!(sorted_frontier(&sim), expected);
    }

    #[test]
    fn test_single_species_pair_annihilates() {
        let mut sim = GrowthSimulation::new(&config(3, 2, 1, 10), seeded_rng(Some(8))).unwrap();
        let report = sim.step().unwrap().unwrap();
        assert_eq!(report.step, 0);
        assert_eq!(report.species, 1);
        assert_eq!(report.cleared, 2);
        assert!(sim.lattice().is_vacant());
        assert_eq!(sorted_frontier(&sim), frontier_oracle(sim.lattice()));
        assert!(sim.frontier().is_empty());

        let mut sink = NullSink;
        let summary = sim.run(&mut sink).unwrap();
        assert_eq!(summary.phase, Phase::Extinguished);
        assert_eq!(summary.steps, 1);
        assert_eq!(summary.death_step, 0);
    }

    #[test]
    fn test_trivial_lattice_exhausts_immediately() {
        let mut sim = GrowthSimulation::new(&config(1, 3, 2, 100), seeded_rng(Some(4))).unwrap();
        assert!(sim.frontier().is_empty());
        let summary = sim.run(&mut NullSink).unwrap();
        assert_eq!(summary.phase, Phase::FrontierExhausted);
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.filled, 1);
        assert_eq!(summary.death_step, DID_NOT_DIE);
    }

    #[test]
    fn test_zero_budget_stops_after_seeding() {
        let mut sim = GrowthSimulation::new(&config(5, 2, 3, 0), seeded_rng(Some(4))).unwrap();
        let summary = sim.run(&mut NullSink).unwrap();
        assert_eq!(summary.phase, Phase::StepBudgetReached);
        assert_eq!(summary.steps, 0);
        assert_eq!(summary.death_step, DID_NOT_DIE);
    }

    #[test]
    fn test_budget_bounds_the_run() {
        let mut sim = GrowthSimulation::new(&config(32, 2, 3, 50), seeded_rng(Some(21))).unwrap();
        let mut recorder = Recorder {
            steps: Vec::new(),
            filled: Vec::new(),
        };
        let summary = sim.run(&mut recorder).unwrap();
        assert!(summary.steps <= 50);
        match summary.phase {
            Phase::StepBudgetReached => assert_eq!(summary.steps, 50),
            Phase::Extinguished => assert_eq!(summary.death_step, summary.steps as i64 - 1),
            other => panic!("unexpected phase {other:?}"),
        }
        assert_eq!(recorder.steps, (0..summary.steps).collect::<Vec<_>>());
        assert_eq!(recorder.filled.last().copied().unwrap_or(1), summary.filled);
        // terminal phase sticks
        assert!(sim.step().unwrap().is_none());
    }

    #[test]
    fn test_invalid_config_builds_nothing() {
        let result = GrowthSimulation::new(&config(4, 2, 0, 10), seeded_rng(Some(1)));
        assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
        let result = GrowthSimulation::new(&config(4, 2, 2, -3), seeded_rng(Some(1)));
        assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_fixed_seed_reproduces_run() {
        let cfg = config(16, 2, 3, 300);
        let mut a = GrowthSimulation::new(&cfg, seeded_rng(Some(1234))).unwrap();
        let mut b = GrowthSimulation::new(&cfg, seeded_rng(Some(1234))).unwrap();
        let sa = a.run(&mut NullSink).unwrap();
        let sb = b.run(&mut NullSink).unwrap();
        assert_eq!(sa, sb);
        assert_eq!(a.lattice().cells(), b.lattice().cells());
    }

    #[test]
    fn test_constant_draws_pick_first_member() {
        // zero draws: species 1 everywhere and always the first frontier slot
        let mut sim = GrowthSimulation::new(&config(5, 2, 4, 10), StepRng::new(0, 0)).unwrap();
        let first = sim.frontier().members()[0];
        let report = sim.step().unwrap().unwrap();
        assert_eq!(report.index, first);
        assert_eq!(report.species, 1);
        assert_eq!(report.cleared, 2);
    }

    #[test]
    fn test_small_line_runs_out_of_frontier() {
        let mut sim = GrowthSimulation::new(&config(3, 1, 1000, 1000), seeded_rng(Some(5))).unwrap();
        let summary = sim.run(&mut NullSink).unwrap();
        match summary.phase {
            Phase::FrontierExhausted => assert_eq!(summary.filled, 3),
            Phase::Extinguished => assert_eq!(summary.filled, 0),
            other => panic!("unexpected phase {other:?}"),
        }
        assert!(sim.frontier().is_empty());
    }

    fn arb_layout() -> impl Strategy<Value = BoundaryLayout> {
        prop_oneof![
            Just(BoundaryLayout::Clamped),
            Just(BoundaryLayout::Periodic),
            Just(BoundaryLayout::PeriodicHorizontal),
        ]
    }

    proptest! {
        #[test]
        fn prop_frontier_matches_oracle_every_step(
            seed in any::<u64>(),
            side in 1usize..7,
            dims in 1usize..4,
            species in 1u32..5,
            layout in arb_layout(),
        ) {
            let cfg = RunConfig {
                boundary: layout,
                ..config(side, dims, species, 60)
            };
            let mut sim = GrowthSimulation::new(&cfg, seeded_rng(Some(seed))).unwrap();
            prop_assert_eq!(sorted_frontier(&sim), frontier_oracle(sim.lattice()));
            while let Some(report) = sim.step().unwrap() {
                prop_assert!(report.cleared != 1);
                prop_assert!(sim.frontier().check_invariants().is_ok());
                prop_assert_eq!(sorted_frontier(&sim), frontier_oracle(sim.lattice()));
            }
            prop_assert!(sim.phase().is_terminal());
            prop_assert!(sim.steps_taken() <= 60);
        }
    }
}
