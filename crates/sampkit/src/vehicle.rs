use crate::capability::Entity;
use crate::host::EntityId;

/// A vehicle, known only by its id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vehicle {
    id: EntityId,
}

impl Vehicle {
    pub fn new(id: EntityId) -> Self {
        Self { id }
    }
}

impl Entity for Vehicle {
    fn id(&self) -> EntityId {
        self.id
    }
}
