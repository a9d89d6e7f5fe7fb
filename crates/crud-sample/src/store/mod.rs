//! # In-Memory Store
//!
//! One [`StoreActor`] per entity type owns that type's records and processes
//! requests sequentially on its own task, so the map needs no lock. A cloneable
//! [`StoreClient`] sends requests over the channel and implements the
//! framework's [`Storage`](crud_framework::Storage) capability.
//!
//! [`EmployeeStorage`] combines the employee and company clients into the
//! [`ChildStorage`](crud_framework::ChildStorage) used by the nested resource.

mod actor;
mod client;
mod employee;
mod entities;
mod message;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use employee::EmployeeStorage;
pub use message::{Filter, Response, StoreRequest};

use crud_framework::StorageError;
use std::fmt::Debug;

/// A record the store can keep.
pub trait StoreEntity: Clone + Debug + Send + Sync + 'static {
    /// Fields accepted in `sort` parameters.
    const SORT_FIELDS: &'static [&'static str];

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// Ordering key of `field`; only called with one of [`Self::SORT_FIELDS`].
    fn sort_value(&self, field: &str) -> SortValue<'_>;
}

/// Comparable field value. `Empty` sorts before any text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Empty,
    Text(&'a str),
}

impl<'a> From<Option<&'a str>> for SortValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(SortValue::Empty, SortValue::Text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store closed")]
    ActorClosed,
    #[error("Store dropped the request")]
    ActorDropped,
    #[error("Cannot sort by `{0}`")]
    UnknownSortField(String),
}

impl From<StoreError> for StorageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownSortField(_) => StorageError::InvalidQuery(err.to_string()),
            StoreError::ActorClosed | StoreError::ActorDropped => {
                StorageError::Unavailable(err.to_string())
            }
        }
    }
}
