use std::fmt;

/// Seats at a table packed into a `u16`.
///
/// The hand engine uses this to remember groups of seats, for example the
/// players who may no longer re-open the betting after a short all-in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerBitSet {
    set: u16,
}

impl PlayerBitSet {
    /// A set with the first `players` seats enabled.
    pub fn new(players: usize) -> Self {
        debug_assert!(players <= 16, "PlayerBitSet holds at most 16 seats");
        let set = if players >= 16 {
            u16::MAX
        } else {
            (1u16 << players) - 1
        };
        Self { set }
    }

    #[inline]
    pub fn enable(&mut self, idx: usize) {
        self.set |= 1 << idx;
    }

    #[inline]
    pub fn disable(&mut self, idx: usize) {
        self.set &= !(1 << idx);
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        idx < 16 && self.set & (1 << idx) != 0
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.set.count_ones() as usize
    }

    #[inline]
    pub fn empty(&self) -> bool {
        self.set == 0
    }

    /// Enabled seat indices, lowest first.
    pub fn ones(self) -> impl Iterator<Item = usize> {
        (0..16).filter(move |idx| self.get(*idx))
    }
}

impl fmt::Debug for PlayerBitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ones()).finish()
    }
}
