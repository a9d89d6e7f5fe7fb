//! # Storage Capability
//!
//! What a handler needs from a backing store: lookup by id, a sorted page,
//! save and delete. [`ChildStorage`] adds the parent scoping used by
//! [`ChildResourceHandler`](crate::handler::ChildResourceHandler).
//!
//! Implementations are expected to give read-committed visibility and atomic
//! single-entity writes. Nothing here adds locking or versioning on top.

use crate::error::StorageError;
use crate::page::PageRequest;
use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// One page of entities as returned by the store, plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<E> {
    pub content: Vec<E>,
    pub total_elements: u64,
}

impl<E> Slice<E> {
    pub fn new(content: Vec<E>, total_elements: u64) -> Self {
        Self {
            content,
            total_elements,
        }
    }
}

/// Storage of a single entity type.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    type Entity: Send + Sync + 'static;
    type Id: Clone + Display + Debug + Send + Sync + 'static;

    async fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>, StorageError>;

    /// The entities of `request.page()` under `request.sort()`.
    async fn find_page(&self, request: &PageRequest) -> Result<Slice<Self::Entity>, StorageError>;

    /// Insert or overwrite; returns the stored entity (with its id assigned).
    async fn save(&self, entity: Self::Entity) -> Result<Self::Entity, StorageError>;

    async fn delete(&self, entity: &Self::Entity) -> Result<(), StorageError>;
}

/// Storage of an entity type owned by a parent entity.
#[async_trait]
pub trait ChildStorage: Storage {
    type ParentId: Clone + Display + Debug + Send + Sync + 'static;
    type Parent: Send + Sync + 'static;

    async fn find_parent(
        &self,
        parent_id: &Self::ParentId,
    ) -> Result<Option<Self::Parent>, StorageError>;

    /// Only matches when the entity belongs to `parent_id`.
    async fn find_by_parent_and_id(
        &self,
        parent_id: &Self::ParentId,
        id: &Self::Id,
    ) -> Result<Option<Self::Entity>, StorageError>;

    async fn find_page_by_parent(
        &self,
        parent_id: &Self::ParentId,
        request: &PageRequest,
    ) -> Result<Slice<Self::Entity>, StorageError>;

    /// Point a new entity at its parent before it is saved.
    fn attach_parent(&self, entity: &mut Self::Entity, parent: Self::Parent);
}
