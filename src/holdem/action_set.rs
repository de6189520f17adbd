/// The discrete action indices open to the current player.
///
/// Indices are packed into a `u64`, which covers fold, check/call and up to
/// 62 raise sizes without allocating.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionSet {
    bits: u64,
}

impl ActionSet {
    #[inline]
    pub fn new() -> Self {
        Self { bits: 0 }
    }

    /// Returns `true` if the index was newly inserted.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `idx >= 64`.
    #[inline]
    pub fn insert(&mut self, idx: usize) -> bool {
        debug_assert!(idx < 64, "Action index must be < 64, got {}", idx);
        let mask = 1u64 << idx;
        let was_present = self.bits & mask != 0;
        self.bits |= mask;
        !was_present
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        idx < 64 && self.bits & (1u64 << idx) != 0
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..64).filter(move |idx| self.contains(*idx))
    }

    /// A boolean mask the width of the action space.
    pub fn to_mask(&self, num_actions: usize) -> Vec<bool> {
        (0..num_actions).map(|idx| self.contains(idx)).collect()
    }
}

impl std::fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<usize> for ActionSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = ActionSet::new();
        for idx in iter {
            set.insert(idx);
        }
        set
    }
}
