//! Construction options for [`IndexedVector`](crate::IndexedVector).

use crate::{Error, GrowthPolicy, Result};

/// Options for creating an [`IndexedVector`](crate::IndexedVector).
///
/// Validated at construction and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    /// Number of slots allocated up front. Raised to the growth floor if smaller.
    pub initial_capacity: usize,
    /// Capacity growth once every slot is taken.
    pub growth: GrowthPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_capacity(GrowthPolicy::DEFAULT_FLOOR)
    }
}

impl Config {
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            growth: GrowthPolicy::default(),
        }
    }

    pub fn growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.growth.floor() == 0 {
            return Err(Error::InvalidConfig("growth floor must be non-zero"));
        }
        if self.growth.factor() < 2 {
            return Err(Error::InvalidConfig("growth factor must be at least 2"));
        }
        Ok(())
    }

    /// Capacity of the first allocation.
    pub fn effective_capacity(&self) -> usize {
        self.initial_capacity.max(self.growth.floor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_floored() {
        assert_eq!(Config::with_capacity(0).effective_capacity(), 4);
        assert_eq!(Config::with_capacity(100).effective_capacity(), 100);
        let config = Config::with_capacity(1).growth(GrowthPolicy::new(16, 2));
        assert_eq!(config.effective_capacity(), 16);
    }

    #[test]
    fn rejects_bad_growth() {
        let config = Config::default().growth(GrowthPolicy::new(4, 1));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        let config = Config::default().growth(GrowthPolicy::new(0, 2));
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        assert_eq!(Config::default().validate(), Ok(()));
    }
}
