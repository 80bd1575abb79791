//! Frontier repair after an annihilation event.

use crate::frontier::FrontierSet;
use crate::lattice::{Lattice, EMPTY};

/// Restore frontier membership around a just-cleared cluster.
///
/// Cleared cells that still touch occupied matter join the frontier; empty
/// neighbors of cleared cells whose last occupied neighbor vanished leave
/// it. Cells away from the cluster cannot change eligibility, so after
/// this call the frontier again equals the set of empty cells with an
/// occupied neighbor. Applying it twice with the same cluster is a no-op.
pub fn repair_frontier(lattice: &Lattice, frontier: &mut FrontierSet, cleared: &[usize]) {
    for &cell in cleared {
        if lattice.has_filled_neighbor(cell) {
            frontier.insert(cell);
        }
        for n in lattice.neighbors(cell) {
            if lattice.get(n) == EMPTY && frontier.contains(n) && !lattice.has_filled_neighbor(n) {
                frontier.remove(n);
            }
        }
    }
}

/// Brute-force frontier: every empty cell with an occupied neighbor.
#[cfg(test)]
pub(crate) fn frontier_oracle(lattice: &Lattice) -> Vec<usize> {
    (0..lattice.cell_count())
        .filter(|&i| lattice.get(i) == EMPTY && lattice.has_filled_neighbor(i))
        .collect()
}
