//! Slot records and status values.

use serde::{Deserialize, Serialize};

use crate::error::{ParkwatchError, Result};

/// Occupancy state of a parking slot.
///
/// The wire representation is the historical token pair `"on"` (occupied) and
/// `"off"` (free); tokens are parsed case-insensitively at the boundary and
/// everything past it works with this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    #[serde(rename = "on")]
    Occupied,
    #[serde(rename = "off")]
    Free,
}

impl SlotStatus {
    /// Parse a wire token, case-insensitively.
    pub fn parse_token(token: &str) -> Result<Self> {
        match token.to_ascii_lowercase().as_str() {
            "on" => Ok(Self::Occupied),
            "off" => Ok(Self::Free),
            other => Err(ParkwatchError::invalid_input(format!(
                "status must be \"on\" or \"off\", got {other:?}"
            ))),
        }
    }

    /// Canonical wire token for this status.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Occupied => "on",
            Self::Free => "off",
        }
    }

    /// Map a sensor reading to a status (`true` means the bay is occupied).
    pub fn from_reading(occupied: bool) -> Self {
        if occupied {
            Self::Occupied
        } else {
            Self::Free
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A tracked parking slot.
///
/// `id` and `name` are immutable once registered; only `status` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i64,
    pub name: String,
    pub status: SlotStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_case_insensitively() {
        assert_eq!(SlotStatus::parse_token("on").unwrap(), SlotStatus::Occupied);
        assert_eq!(SlotStatus::parse_token("ON").unwrap(), SlotStatus::Occupied);
        assert_eq!(SlotStatus::parse_token("On").unwrap(), SlotStatus::Occupied);
        assert_eq!(SlotStatus::parse_token("off").unwrap(), SlotStatus::Free);
        assert_eq!(SlotStatus::parse_token("OFF").unwrap(), SlotStatus::Free);
    }

    #[test]
    fn rejects_unknown_tokens() {
        let err = SlotStatus::parse_token("maybe").unwrap_err();
        assert!(matches!(err, ParkwatchError::InvalidInput(_)));
    }

    #[test]
    fn tokens_round_trip() {
        assert_eq!(SlotStatus::Occupied.as_token(), "on");
        assert_eq!(SlotStatus::Free.as_token(), "off");
        assert_eq!(SlotStatus::Occupied.to_string(), "on");
    }
}
