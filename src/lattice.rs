use crate::error::SimError;
use crate::settings::Boundary;

/// Cell value of an unoccupied site
pub const EMPTY: u32 = 0;

/// D-dimensional hypercubic lattice of side `L`, stored as one flat
/// row-major buffer (axis 0 varies slowest).
///
/// Cells hold `EMPTY` or a species id >= 1. Neighbors are the axis-aligned
/// cells at distance one; each axis carries its own [`Boundary`] policy.
#[derive(Debug, Clone)]
pub struct Lattice {
    side: usize,
    boundaries: Vec<Boundary>,
    strides: Vec<usize>,
    cells: Vec<u32>,
    filled: usize,
}

impl Lattice {
    /// Create an empty lattice with one boundary policy per axis.
    pub fn new(side: usize, boundaries: Vec<Boundary>) -> Result<Self, SimError> {
        if side == 0 {
            return Err(SimError::invalid("side length must be at least 1"));
        }
        if boundaries.is_empty() {
            return Err(SimError::invalid("lattice needs at least one dimension"));
        }
        let dims = u32::try_from(boundaries.len())
            .map_err(|_| SimError::invalid("too many dimensions"))?;
        let cell_count = side
            .checked_pow(dims)
            .ok_or_else(|| SimError::invalid(format!("{side}^{dims} cells do not fit in memory")))?;

        let mut strides = vec![1; boundaries.len()];
        for axis in (0..boundaries.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * side;
        }

        Ok(Self {
            side,
            boundaries,
            strides,
            cells: vec![EMPTY; cell_count],
            filled: 0,
        })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn dimensions(&self) -> usize {
        self.boundaries.len()
    }

    /// Total number of cells (`L^D`)
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of occupied cells
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// True when no cell holds a species
    pub fn is_vacant(&self) -> bool {
        self.filled == 0
    }

    /// Raw row-major cell values
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Linear index of the cell at `L/2` on every axis
    pub fn center(&self) -> usize {
        self.strides.iter().map(|stride| (self.side / 2) * stride).sum()
    }

    pub fn index_of(&self, coord: &[usize]) -> usize {
        debug_assert_eq!(coord.len(), self.dimensions());
        coord
            .iter()
            .zip(&self.strides)
            .map(|(c, stride)| c * stride)
            .sum()
    }

    pub fn coord_of(&self, index: usize) -> Vec<usize> {
        self.strides
            .iter()
            .map(|stride| (index / stride) % self.side)
            .collect()
    }

    pub fn get(&self, index: usize) -> u32 {
        self.cells[index]
    }

    /// Write a cell, keeping the filled count in step.
    pub fn set(&mut self, index: usize, value: u32) {
        let old = std::mem::replace(&mut self.cells[index], value);
        match (old == EMPTY, value == EMPTY) {
            (true, false) => self.filled += 1,
            (false, true) => self.filled -= 1,
            _ => {}
        }
    }

    #[allow(dead_code)]
    pub fn get_at(&self, coord: &[usize]) -> u32 {
        self.get(self.index_of(coord))
    }

    #[allow(dead_code)]
    pub fn set_at(&mut self, coord: &[usize], value: u32) {
        let index = self.index_of(coord);
        self.set(index, value);
    }

    /// Axis-aligned neighbors of `index` under the per-axis boundary policy.
    ///
    /// A cell is never its own neighbor and no neighbor is yielded twice:
    /// a periodic axis of side 1 contributes nothing and one of side 2
    /// contributes the single other cell.
    pub fn neighbors(&self, index: usize) -> Neighbors<'_> {
        Neighbors {
            lattice: self,
            index,
            axis: 0,
            upward: false,
        }
    }

    /// True when at least one neighbor of `index` is occupied
    pub fn has_filled_neighbor(&self, index: usize) -> bool {
        self.neighbors(index).any(|n| self.cells[n] != EMPTY)
    }

    fn offset(&self, index: usize, axis: usize, upward: bool) -> Option<usize> {
        let stride = self.strides[axis];
        let c = (index / stride) % self.side;
        let wraps = self.boundaries[axis] == Boundary::Periodic && self.side > 2;

        if upward {
            if c + 1 < self.side {
                Some(index + stride)
            } else if wraps {
                Some(index - c * stride)
            } else {
                None
            }
        } else if c > 0 {
            Some(index - stride)
        } else if wraps {
            Some(index + (self.side - 1) * stride)
        } else {
            None
        }
    }
}

/// Iterator over the neighbors of one cell, see [`Lattice::neighbors`]
pub struct Neighbors<'a> {
    lattice: &'a Lattice,
    index: usize,
    axis: usize,
    upward: bool,
}

impl Iterator for Neighbors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.axis < self.lattice.dimensions() {
            let (axis, upward) = (self.axis, self.upward);
            if upward {
                self.axis += 1;
                self.upward = false;
            } else {
                self.upward = true;
            }
            if let Some(n) = self.lattice.offset(self.index, axis, upward) {
                return Some(n);
            }
        }
        None
    }
}
