//! Rolling checksum used to locate candidate blocks during delta generation.
//!
//! The sum keeps two 16-bit components: `s1` is the plain byte sum and `s2`
//! the sum of the running `s1` values. Both can be updated in constant time
//! when the window advances by one byte, which is what makes a byte-by-byte
//! search over the new file affordable.

mod checksum;
mod digest;
mod error;

pub use checksum::RollingChecksum;
pub use digest::RollingDigest;
pub use error::RollingError;

#[cfg(test)]
mod tests;
