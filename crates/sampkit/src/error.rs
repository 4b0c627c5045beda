use sampkit_events::RegistryError;
use strum_macros::Display;

use crate::host::EntityId;

/// Entity family an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EntityKind {
    #[strum(to_string = "player")]
    Player,
    #[strum(to_string = "object")]
    Object,
    #[strum(to_string = "player object")]
    PlayerObject,
    #[strum(to_string = "textdraw")]
    TextDraw,
    #[strum(to_string = "player textdraw")]
    PlayerTextDraw,
    #[strum(to_string = "vehicle")]
    Vehicle,
}

/// A caller-supplied argument outside a documented bound
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintViolation {
    #[error("name is {len} bytes, above the {max} byte limit")]
    NameTooLong { len: usize, max: usize },
    #[error("message is empty")]
    MessageEmpty,
    #[error("message is {len} bytes, above the {max} byte limit")]
    MessageTooLong { len: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid {kind} {id}")]
    InvalidEntity { kind: EntityKind, id: EntityId },

    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    #[error("duplicate registration for event {0}")]
    DuplicateRegistration(String),

    #[error("{operation} failed")]
    OperationFailed { operation: &'static str },

    #[error("player already has that name")]
    NameAlreadyAssigned,

    #[error("name can not be changed (already in use, too long or has invalid characters)")]
    NameRejected,

    #[error("player is not in a vehicle")]
    NotInVehicle,

    #[error("host could not create {kind}")]
    CreateFailed { kind: EntityKind },

    #[error("{operation} returned unexpected status {code}")]
    UnexpectedStatus { operation: &'static str, code: i32 },
}

impl Error {
    pub fn invalid(kind: EntityKind, id: EntityId) -> Self {
        Error::InvalidEntity { kind, id }
    }

    /// Whether this error means the targeted entity is gone
    pub fn is_invalid_entity(&self) -> bool {
        matches!(self, Error::InvalidEntity { .. })
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Duplicate(name) => Error::DuplicateRegistration(name),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_entity() {
        let err = Error::invalid(EntityKind::PlayerObject, 7);
        assert_eq!(err.to_string(), "invalid player object 7");
        assert!(err.is_invalid_entity());
    }

    #[test]
    fn test_registry_error_converts() {
        let err: Error = RegistryError::Duplicate("OnPlayerSpawn".into()).into();
        assert_eq!(err, Error::DuplicateRegistration("OnPlayerSpawn".into()));
    }

    #[test]
    fn test_constraint_is_transparent() {
        let err: Error = ConstraintViolation::MessageEmpty.into();
        assert_eq!(err.to_string(), "message is empty");
    }
}
