use anyhow::anyhow;
use derive_more::Display;
use std::fmt::{Debug, Display};

/// A range between two values, inclusive on both ends. Used for things like
/// zoom limits and color components, where a value has to be kept within
/// fixed bounds.
#[derive(Copy, Clone, Debug, Display, PartialEq)]
#[display(fmt = "[{}, {}]", min, max)]
pub struct NumRange<T: Copy + Debug + Display + PartialOrd> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + Debug + Display + PartialOrd> NumRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Check if a value is in this range. Ranges are inclusive on both ends.
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Checks if the value is in this range. If it isn't, return an error.
    pub fn ensure_contains(&self, value: T) -> anyhow::Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(anyhow!("value {} is not in range {}", value, self))
        }
    }

    /// Force a value into this range. If it's already in the range, return
    /// that value. If it's outside the range, return the bound (lower or upper)
    /// that's closest to the value.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}
