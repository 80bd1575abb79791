//! Same-species cluster detection and annihilation.

use crate::error::SimError;
use crate::lattice::{Lattice, EMPTY};
use std::collections::VecDeque;

/// Breadth-first flood fill over same-species neighbors.
///
/// Scratch state is reused across calls: `visited` stamps cells with the
/// current generation, so marking is reset by bumping the counter instead
/// of clearing the buffer.
#[derive(Debug, Clone)]
pub struct ClusterAnnihilator {
    visited: Vec<u32>,
    generation: u32,
    queue: VecDeque<usize>,
    cluster: Vec<usize>,
}

impl ClusterAnnihilator {
    pub fn new(cell_count: usize) -> Self {
        Self {
            visited: vec![0; cell_count],
            generation: 0,
            queue: VecDeque::new(),
            cluster: Vec::new(),
        }
    }

    /// Find the cluster containing the just-filled `origin` and clear it
    /// when it holds more than one cell.
    ///
    /// Returns the cleared cells, or an empty slice when the origin is an
    /// isolated deposit (the lattice is then left untouched). Fails with
    /// [`SimError::OriginNotFilled`] when `origin` is empty.
    pub fn find_and_clear(
        &mut self,
        lattice: &mut Lattice,
        origin: usize,
    ) -> Result<&[usize], SimError> {
        let species = lattice.get(origin);
        if species == EMPTY {
            return Err(SimError::OriginNotFilled { index: origin });
        }

        let mark = self.next_generation();
        self.cluster.clear();
        self.queue.clear();
        self.visited[origin] = mark;
        self.queue.push_back(origin);

        while let Some(cell) = self.queue.pop_front() {
            self.cluster.push(cell);
            for n in lattice.neighbors(cell) {
                if self.visited[n] != mark && lattice.get(n) == species {
                    self.visited[n] = mark;
                    self.queue.push_back(n);
                }
            }
        }

        if self.cluster.len() > 1 {
            for &cell in &self.cluster {
                lattice.set(cell, EMPTY);
            }
        } else {
            self.cluster.clear();
        }
        Ok(&self.cluster)
    }

    fn next_generation(&mut self) -> u32 {
        if self.generation == u32::MAX {
            self.visited.fill(0);
            self.generation = 0;
        }
        self.generation += 1;
        self.generation
    }
}
