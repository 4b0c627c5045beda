//! Turns raw host return values into typed outcomes.
//!
//! Every host call reports through a bool, an integer status or a sentinel
//! string. The helpers here are the only place those conventions are decoded,
//! so handle code reads as `status::ensure(host.call(..), ..)?`.

use std::time::Duration;

use crate::error::{EntityKind, Error, Result};
use crate::host::{EntityId, DISCONNECTED_IP};

/// Map a bool host result onto the entity it targeted
pub fn ensure(ok: bool, kind: EntityKind, id: EntityId) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::invalid(kind, id))
    }
}

/// Map a bool host result for calls whose failure is not about validity
pub fn ensure_op(ok: bool, operation: &'static str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::OperationFailed { operation })
    }
}

/// Map a freshly created id onto a result, given the family sentinel
pub fn created(id: EntityId, sentinel: EntityId, kind: EntityKind) -> Result<EntityId> {
    if id == sentinel || id < 0 {
        Err(Error::CreateFailed { kind })
    } else {
        Ok(id)
    }
}

/// Whole milliseconds to a duration; negatives clamp to zero
pub fn millis(ms: i32) -> Duration {
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}

/// Result of asking an object to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// The object is travelling and should arrive after this long
    Scheduled(Duration),
    /// The host reported no travel time, so nothing was started
    NotScheduled,
}

impl Motion {
    pub fn from_eta(eta_ms: i32) -> Self {
        if eta_ms > 0 {
            Motion::Scheduled(millis(eta_ms))
        } else {
            Motion::NotScheduled
        }
    }

    pub fn eta(self) -> Option<Duration> {
        match self {
            Motion::Scheduled(eta) => Some(eta),
            Motion::NotScheduled => None,
        }
    }

    pub fn is_scheduled(self) -> bool {
        matches!(self, Motion::Scheduled(_))
    }
}

/// Decode the tri-state returned when renaming a player
pub fn name_change(code: i32) -> Result<()> {
    match code {
        1 => Ok(()),
        0 => Err(Error::NameAlreadyAssigned),
        -1 => Err(Error::NameRejected),
        code => Err(Error::UnexpectedStatus {
            operation: "SetPlayerName",
            code,
        }),
    }
}

/// A string read back from the host; `written` is the length it reported
pub fn read_string(written: i32, value: String, kind: EntityKind, id: EntityId) -> Result<String> {
    if written > 0 {
        Ok(value)
    } else {
        Err(Error::invalid(kind, id))
    }
}

/// The host fills in the broadcast address instead of failing
pub fn read_ip(value: String, playerid: EntityId) -> Result<String> {
    if value.is_empty() || value == DISCONNECTED_IP {
        Err(Error::invalid(EntityKind::Player, playerid))
    } else {
        Ok(value)
    }
}

/// Counters the host reports as 0 for an unknown player
pub fn connected_time(ms: i32, playerid: EntityId) -> Result<Duration> {
    if ms > 0 {
        Ok(millis(ms))
    } else {
        Err(Error::invalid(EntityKind::Player, playerid))
    }
}

/// Ping is negative for an unknown player
pub fn ping(ms: i32, playerid: EntityId) -> Result<Duration> {
    if ms >= 0 {
        Ok(millis(ms))
    } else {
        Err(Error::invalid(EntityKind::Player, playerid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_from_eta() {
        assert_eq!(
            Motion::from_eta(1500),
            Motion::Scheduled(Duration::from_millis(1500))
        );
        assert_eq!(Motion::from_eta(0), Motion::NotScheduled);
        assert_eq!(Motion::from_eta(-3), Motion::NotScheduled);
        assert_eq!(Motion::from_eta(0).eta(), None);
    }

    #[test]
    fn test_name_change_codes() {
        assert_eq!(name_change(1), Ok(()));
        assert_eq!(name_change(0), Err(Error::NameAlreadyAssigned));
        assert_eq!(name_change(-1), Err(Error::NameRejected));
        assert_eq!(
            name_change(7),
            Err(Error::UnexpectedStatus {
                operation: "SetPlayerName",
                code: 7
            })
        );
    }

    #[test]
    fn test_ip_sentinel_is_invalid() {
        assert!(read_ip(DISCONNECTED_IP.to_string(), 3)
            .unwrap_err()
            .is_invalid_entity());
        assert_eq!(read_ip("10.0.0.1".to_string(), 3).unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_created_rejects_sentinel() {
        assert_eq!(
            created(0xFFFF, 0xFFFF, EntityKind::Object),
            Err(Error::CreateFailed {
                kind: EntityKind::Object
            })
        );
        assert_eq!(created(4, 0xFFFF, EntityKind::Object), Ok(4));
    }

    #[test]
    fn test_connected_time_zero_is_invalid() {
        assert!(connected_time(0, 1).is_err());
        assert_eq!(connected_time(2500, 1), Ok(Duration::from_millis(2500)));
    }

    #[test]
    fn test_millis_clamps_negative() {
        assert_eq!(millis(-5), Duration::ZERO);
    }
}
