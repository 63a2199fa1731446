/*!
Capacity growth policy
*/

/// Maps a requested minimum slot count to the capacity to allocate.
///
/// Capacities are `floor * factor^k`. With the default policy that is `4, 8, 16, ..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrowthPolicy {
    floor: usize,
    factor: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            floor: Self::DEFAULT_FLOOR,
            factor: Self::DEFAULT_FACTOR,
        }
    }
}

impl GrowthPolicy {
    pub const DEFAULT_FLOOR: usize = 4;
    pub const DEFAULT_FACTOR: usize = 2;

    pub const fn new(floor: usize, factor: usize) -> Self {
        Self { floor, factor }
    }

    /// Smallest capacity ever allocated
    pub const fn floor(&self) -> usize {
        self.floor
    }

    pub const fn factor(&self) -> usize {
        self.factor
    }

    /// Smallest `floor * factor^k` that is `>= requested`. Returns `None` on overflow.
    ///
    /// ```
    /// use ivec_arena::GrowthPolicy;
    /// let policy = GrowthPolicy::default();
    /// assert_eq!(policy.capacity_for(0), Some(4));
    /// assert_eq!(policy.capacity_for(5), Some(8));
    /// assert_eq!(policy.capacity_for(usize::MAX), None);
    /// ```
    pub fn capacity_for(&self, requested: usize) -> Option<usize> {
        let mut cap = self.floor;
        while cap < requested {
            cap = cap.checked_mul(self.factor)?;
        }
        Some(cap)
    }

    /// Capacity after growing a full vector of `current` slots: at least double.
    pub(crate) fn grown(&self, current: usize) -> Option<usize> {
        let requested = current.checked_add(1)?;
        let doubled = current.checked_mul(2)?;
        Some(self.capacity_for(requested)?.max(doubled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_applies_to_small_requests() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.capacity_for(1), Some(4));
        assert_eq!(policy.capacity_for(4), Some(4));
        assert_eq!(policy.grown(0), Some(4));
    }

    #[test]
    fn growth_at_least_doubles() {
        let policy = GrowthPolicy::new(3, 3);
        // 3 -> 9 already doubles
        assert_eq!(policy.grown(3), Some(9));
        // capacity picked outside the policy sequence still doubles
        assert_eq!(policy.grown(10), Some(27));
        assert_eq!(GrowthPolicy::default().grown(6), Some(12));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(GrowthPolicy::default().grown(usize::MAX / 2 + 1), None);
    }
}
