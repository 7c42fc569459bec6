//! crates/logging/src/verbosity.rs
//! Verbosity level to filter directive mapping.

/// Coarse verbosity selector, as a `-v` count would express it.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verbosity(u8);

impl Verbosity {
    /// Warnings only.
    pub const QUIET: Self = Self(0);

    /// Creates a verbosity from a level; levels above 3 behave like 3.
    #[must_use]
    pub const fn from_level(level: u8) -> Self {
        Self(if level > 3 { 3 } else { level })
    }

    /// Returns the clamped level.
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Returns an `EnvFilter`-style directive for this level.
    ///
    /// Other crates stay at `warn`; only the `rdelta` targets get louder.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self.0 {
            0 => "warn",
            1 => "warn,rdelta=info",
            2 => "warn,rdelta=debug",
            _ => "warn,rdelta=trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_directives() {
        assert_eq!(Verbosity::QUIET.directive(), "warn");
        assert_eq!(Verbosity::from_level(1).directive(), "warn,rdelta=info");
        assert_eq!(Verbosity::from_level(3).directive(), "warn,rdelta=trace");
    }

    #[test]
    fn high_levels_are_clamped() {
        assert_eq!(Verbosity::from_level(9), Verbosity::from_level(3));
        assert_eq!(Verbosity::from_level(9).level(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_plain_level() {
        let json = serde_json::to_string(&Verbosity::from_level(2)).unwrap();
        assert_eq!(json, "2");
    }
}
