//! PMT id conventions and element categories.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First id of the auxiliary/reserved range.
///
/// Ids at or above this value do not address physical detector elements
/// and are dropped before any geometry lookup.
pub const AUX_ID_MIN: u32 = 50_000;

/// Returns true if the id addresses a physical detector element.
#[inline]
#[must_use]
pub fn is_detector_id(id: u32) -> bool {
    id < AUX_ID_MIN
}

/// The two PMT categories of the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PmtKind {
    /// Large (20-inch) PMTs.
    Large,
    /// Small (3-inch) PMTs.
    Small,
}

impl PmtKind {
    /// Short lowercase name, as used in CLI arguments and summaries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Small => "small",
        }
    }
}

impl fmt::Display for PmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PmtKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "large" => Ok(Self::Large),
            "small" => Ok(Self::Small),
            _ => Err(Error::UnknownPmtKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_id_range() {
        assert!(is_detector_id(0));
        assert!(is_detector_id(49_999));
        assert!(!is_detector_id(50_000));
        assert!(!is_detector_id(300_000));
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!("large".parse::<PmtKind>().unwrap(), PmtKind::Large);
        assert_eq!("Small".parse::<PmtKind>().unwrap(), PmtKind::Small);
        assert_eq!(PmtKind::Large.to_string(), "large");
        assert!("medium".parse::<PmtKind>().is_err());
    }
}
