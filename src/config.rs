//! Construction-time configuration for [`BiVec`](crate::BiVec).

/// Capacity given to a default-constructed sequence, and the floor used when
/// an empty shell grows.
pub const DEFAULT_MIN_CAPACITY: usize = 8;

/// Settings injected when a sequence is built.
///
/// ```rust
/// use bivec::{BiVec, BiVecConfig};
///
/// let config = BiVecConfig::new().with_min_capacity(2);
/// let v: BiVec<u8> = BiVec::with_config(config);
/// assert_eq!(v.capacity(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BiVecConfig {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_min_capacity"))]
    min_capacity: usize,
}

#[cfg(feature = "serde")]
fn deserialize_min_capacity<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let min_capacity = <usize as serde::Deserialize>::deserialize(deserializer)?;
    Ok(min_capacity.max(1))
}

impl BiVecConfig {
    /// Configuration with [`DEFAULT_MIN_CAPACITY`].
    pub const fn new() -> Self {
        Self {
            min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }

    /// Sets the minimum capacity. Zero is clamped to one so that doubling
    /// always makes progress.
    pub const fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = if min_capacity == 0 { 1 } else { min_capacity };
        self
    }

    #[inline(always)]
    pub const fn min_capacity(&self) -> usize {
        self.min_capacity
    }
}

impl Default for BiVecConfig {
    fn default() -> Self {
        Self::new()
    }
}
