//! # Converter
//!
//! The bridge between a storage entity and its wire shapes. A handler never looks
//! inside an entity; everything it needs goes through a [`Converter`].
//!
//! - `Data` is the outward DTO returned by reads and writes.
//! - `Edit` is the DTO accepted by `create` and `update`. It is validated with
//!   [`garde`] before it reaches the converter.

use garde::Validate;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Bidirectional mapping between an entity `E` and its DTOs.
pub trait Converter<E>: Send + Sync + 'static {
    /// Read shape.
    type Data: Serialize + Send + 'static;

    /// Write shape, validated before use.
    type Edit: DeserializeOwned + Validate<Context = ()> + Send + 'static;

    fn from_entity(&self, entity: &E) -> Self::Data;

    fn from_entities(&self, entities: &[E]) -> Vec<Self::Data> {
        entities.iter().map(|entity| self.from_entity(entity)).collect()
    }

    /// A fresh, not yet persisted entity.
    fn new_entity(&self, edit: Self::Edit) -> E;

    /// Apply `edit` to an existing entity in place.
    fn update_entity_from_edit(&self, edit: Self::Edit, entity: &mut E);
}
