//! src/config.rs
//!
//! Caller-facing configuration for signature generation and job buffering.

use crate::error::Error;

/// Capacity of each staging buffer when none is configured.
pub const DEFAULT_BUFFER_CAPACITY: usize = 16 * 1024;

/// Signature parameters.
///
/// Zero lengths stand for the engine defaults and are resolved by the engine
/// when the signature session starts.
///
/// # Examples
///
/// ```
/// use rdelta::SignatureConfig;
///
/// let config = SignatureConfig::new().with_block_len(1024).with_compat(true);
/// assert_eq!(config.block_len(), 1024);
/// assert_eq!(config.strong_len(), 0);
/// assert!(config.compat());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignatureConfig {
    block_len: u32,
    strong_len: u32,
    compat: bool,
}

impl SignatureConfig {
    /// Returns a configuration that uses every engine default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            block_len: 0,
            strong_len: 0,
            compat: false,
        }
    }

    /// Sets the block length; zero selects the default.
    #[must_use]
    pub const fn with_block_len(mut self, block_len: u32) -> Self {
        self.block_len = block_len;
        self
    }

    /// Sets the strong digest length; zero selects the default.
    #[must_use]
    pub const fn with_strong_len(mut self, strong_len: u32) -> Self {
        self.strong_len = strong_len;
        self
    }

    /// Selects the legacy signature format.
    #[must_use]
    pub const fn with_compat(mut self, compat: bool) -> Self {
        self.compat = compat;
        self
    }

    /// Returns the requested block length.
    #[must_use]
    pub const fn block_len(&self) -> u32 {
        self.block_len
    }

    /// Returns the requested strong digest length.
    #[must_use]
    pub const fn strong_len(&self) -> u32 {
        self.strong_len
    }

    /// Reports whether the legacy signature format is requested.
    #[must_use]
    pub const fn compat(&self) -> bool {
        self.compat
    }
}

/// Staging buffer capacities of a job.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BufferConfig {
    input_capacity: usize,
    output_capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            input_capacity: DEFAULT_BUFFER_CAPACITY,
            output_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl BufferConfig {
    /// Sets the number of bytes pulled from the source at a time.
    #[must_use]
    pub const fn with_input_capacity(mut self, capacity: usize) -> Self {
        self.input_capacity = capacity;
        self
    }

    /// Sets the number of bytes the engine may produce per iteration.
    #[must_use]
    pub const fn with_output_capacity(mut self, capacity: usize) -> Self {
        self.output_capacity = capacity;
        self
    }

    /// Returns the input staging capacity.
    #[must_use]
    pub const fn input_capacity(&self) -> usize {
        self.input_capacity
    }

    /// Returns the output staging capacity.
    #[must_use]
    pub const fn output_capacity(&self) -> usize {
        self.output_capacity
    }

    /// Rejects capacities a job cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`] when either capacity is zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.input_capacity == 0 || self.output_capacity == 0 {
            return Err(Error::AllocationFailure);
        }
        Ok(())
    }
}
