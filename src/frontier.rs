use crate::error::SimError;
use crate::random::RandomSource;

const NO_POSITION: usize = usize::MAX;

/// Set of empty cells adjacent to occupied matter, the only cells a
/// growth step may fill.
///
/// Membership, insertion, removal and uniform random picks are all O(1):
/// members live in a dense vector, `position_of` maps a cell back to its
/// slot in that vector, and removal swaps the target with the last member
/// before popping. Member order is therefore arbitrary.
#[derive(Debug, Clone)]
pub struct FrontierSet {
    members: Vec<usize>,
    position_of: Vec<usize>,
    is_member: Vec<bool>,
}

impl FrontierSet {
    /// Empty frontier over a lattice with `cell_count` cells
    pub fn new(cell_count: usize) -> Self {
        Self {
            members: Vec::new(),
            position_of: vec![NO_POSITION; cell_count],
            is_member: vec![false; cell_count],
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.is_member[index]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[allow(dead_code)]
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Add `index`; no-op when already a member.
    pub fn insert(&mut self, index: usize) {
        if self.is_member[index] {
            return;
        }
        self.position_of[index] = self.members.len();
        self.is_member[index] = true;
        self.members.push(index);
    }

    /// Drop `index`; no-op when not a member.
    pub fn remove(&mut self, index: usize) {
        if !self.is_member[index] {
            return;
        }
        let slot = self.position_of[index];
        let last = self.members.len() - 1;
        self.members.swap(slot, last);
        self.members.pop();
        if slot != last {
            let moved = self.members[slot];
            self.position_of[moved] = slot;
        }
        self.position_of[index] = NO_POSITION;
        self.is_member[index] = false;
    }

    /// Uniformly random member, left in place.
    ///
    /// Consumes exactly one draw from `rng` when the frontier is non-empty.
    pub fn pick_random<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<usize, SimError> {
        if self.members.is_empty() {
            return Err(SimError::EmptyFrontier);
        }
        Ok(self.members[rng.below(self.members.len())])
    }

    /// Check the internal bookkeeping, returning a description of the first
    /// inconsistency found.
    #[cfg(test)]
    pub fn check_invariants(&self) -> Result<(), String> {
        for (slot, &index) in self.members.iter().enumerate() {
            if !self.is_member[index] {
                return Err(format!("member {index} not flagged"));
            }
            if self.position_of[index] != slot {
                return Err(format!(
                    "member {index} recorded at {} but stored at {slot}",
                    self.position_of[index]
                ));
            }
        }
        let flagged = self.is_member.iter().filter(|&&m| m).count();
        if flagged != self.members.len() {
            return Err(format!(
                "{flagged} cells flagged but {} members stored",
                self.members.len()
            ));
        }
        Ok(())
    }
}
