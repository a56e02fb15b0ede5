//! Per-tick destination claims

use ahash::AHashSet;

use crate::core::types::GridPos;

/// Cells already claimed by units planned earlier this tick. Built empty at
/// the start of every tick; whoever is planned first wins a contested cell.
#[derive(Debug, Clone, Default)]
pub struct ReservationSet {
    claimed: AHashSet<GridPos>,
}

impl ReservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a cell. Returns false if it was already taken.
    pub fn claim(&mut self, pos: GridPos) -> bool {
        self.claimed.insert(pos)
    }

    pub fn is_claimed(&self, pos: GridPos) -> bool {
        self.claimed.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_claim_wins() {
        let mut reservations = ReservationSet::new();
        assert!(reservations.is_empty());
        assert!(reservations.claim(GridPos::new(1, 1)));
        assert!(!reservations.claim(GridPos::new(1, 1)));
        assert!(reservations.is_claimed(GridPos::new(1, 1)));
        assert!(!reservations.is_claimed(GridPos::new(2, 1)));
        assert_eq!(reservations.len(), 1);
    }
}
