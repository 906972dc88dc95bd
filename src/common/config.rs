//! Configuration constants and run configuration.

use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

/// Size of a page in bytes (4KB).
///
/// # Memory Layout
/// With 32-bit addresses and 4KB pages:
/// - Offset: low 12 bits
/// - Page number: high 20 bits (1,048,576 distinct pages)
pub const PAGE_SIZE: usize = 4096;

/// Number of offset bits discarded to get a page number.
pub const PAGE_SHIFT: u32 = PAGE_SIZE.trailing_zeros();

/// Seed used by the random policy when none is supplied.
pub const DEFAULT_RANDOM_SEED: u64 = 0x5eed;

/// The replacement policies the simulator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Belady's optimal policy (needs the whole trace up front).
    Optimal,
    /// Second-chance clock.
    Clock,
    /// Not Recently Used, with periodic reference-bit refresh.
    Nru,
    /// Uniform random victim.
    Random,
}

impl Algorithm {
    /// All policies, in reporting order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Optimal,
        Algorithm::Clock,
        Algorithm::Nru,
        Algorithm::Random,
    ];

    /// Canonical short name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Optimal => "opt",
            Algorithm::Clock => "clock",
            Algorithm::Nru => "nru",
            Algorithm::Random => "rand",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "opt" | "optimal" => Ok(Algorithm::Optimal),
            "clock" => Ok(Algorithm::Clock),
            "nru" => Ok(Algorithm::Nru),
            "rand" | "random" => Ok(Algorithm::Random),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Parameters for one simulation run.
///
/// # Example
/// ```
/// use vmsim::{Algorithm, SimConfig};
///
/// let config = SimConfig::new(8, Algorithm::Nru).with_refresh(16);
/// assert!(config.validate().is_ok());
///
/// let missing = SimConfig::new(8, Algorithm::Nru);
/// assert!(missing.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of physical frames.
    pub frames: usize,

    /// Replacement policy.
    pub algorithm: Algorithm,

    /// NRU reference-bit refresh interval, in accesses.
    pub refresh: Option<usize>,

    /// Seed for the random policy.
    pub seed: u64,
}

impl SimConfig {
    /// Config with no refresh interval and the default seed.
    pub fn new(frames: usize, algorithm: Algorithm) -> Self {
        Self {
            frames,
            algorithm,
            refresh: None,
            seed: DEFAULT_RANDOM_SEED,
        }
    }

    /// Set the NRU refresh interval.
    pub fn with_refresh(mut self, refresh: usize) -> Self {
        self.refresh = Some(refresh);
        self
    }

    /// Set the random policy seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the config before any access is processed.
    ///
    /// Side-effect free, so callers can check early and build later. A
    /// refresh interval given to a policy other than NRU passes.
    ///
    /// # Errors
    /// - `Error::InvalidFrameCount` if `frames == 0`
    /// - `Error::MissingRefresh` if NRU has no refresh interval
    /// - `Error::InvalidRefresh` if NRU's refresh interval is 0
    pub fn validate(&self) -> Result<()> {
        if self.frames == 0 {
            return Err(Error::InvalidFrameCount(self.frames));
        }

        match (self.algorithm, self.refresh) {
            (Algorithm::Nru, None) => Err(Error::MissingRefresh),
            (Algorithm::Nru, Some(0)) => Err(Error::InvalidRefresh(0)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_power_of_two() {
        assert!(PAGE_SIZE.is_power_of_two());
        assert_eq!(PAGE_SHIFT, 12);
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("opt".parse::<Algorithm>().unwrap(), Algorithm::Optimal);
        assert_eq!("Optimal".parse::<Algorithm>().unwrap(), Algorithm::Optimal);
        assert_eq!("CLOCK".parse::<Algorithm>().unwrap(), Algorithm::Clock);
        assert_eq!("nru".parse::<Algorithm>().unwrap(), Algorithm::Nru);
        assert_eq!("rand".parse::<Algorithm>().unwrap(), Algorithm::Random);
        assert_eq!("random".parse::<Algorithm>().unwrap(), Algorithm::Random);

        let err = "lru".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, Error::UnknownAlgorithm(ref name) if name == "lru"));
    }

    #[test]
    fn test_algorithm_name_round_trips() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_validate_frames() {
        let err = SimConfig::new(0, Algorithm::Clock).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidFrameCount(0)));
        assert!(SimConfig::new(1, Algorithm::Clock).validate().is_ok());
    }

    #[test]
    fn test_validate_nru_refresh() {
        let err = SimConfig::new(4, Algorithm::Nru).validate().unwrap_err();
        assert!(matches!(err, Error::MissingRefresh));

        let err = SimConfig::new(4, Algorithm::Nru)
            .with_refresh(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRefresh(0)));

        assert!(SimConfig::new(4, Algorithm::Nru)
            .with_refresh(8)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_refresh_ignored_for_other_policies() {
        let config = SimConfig::new(4, Algorithm::Random).with_refresh(8);
        assert!(config.validate().is_ok());
    }
}
