//! # CRUD Framework
//!
//! Generic create/read/update/delete resources over HTTP, with both halves of the
//! contract in one crate:
//!
//! - **Server**: a [`ResourceHandler`] turns a [`Storage`] capability and a
//!   [`Converter`] into list/get/create/update/delete operations, and
//!   [`resource_router`] mounts it on an [`axum::Router`].
//! - **Client**: a [`RestResource`] speaks the same wire contract from the other
//!   side and maps error statuses back onto [`CrudError`].
//!
//! Child collections nested under a parent (`/api/company/{parentId}/person`) use
//! [`ChildResourceHandler`], [`child_resource_router`] and [`ChildRestResource`].
//!
//! ## Wire Contract
//!
//! - Lists are paged with `?page=0&pageSize=20&sort=name,asc` and answered with a
//!   [`PageResult`] JSON object.
//! - `POST` answers `201`, `DELETE` answers `204`.
//! - Failures carry an [`ErrorResponse`]: a status, a message and a map of field
//!   paths to validation messages.
//!
//! ## Example
//!
//! ```rust
//! use crud_framework::{
//!     resource_router, Converter, PageRequest, PagingConfig, ResourceHandler, RestResource,
//!     RouterTransport, Slice, Storage, StorageError,
//! };
//! use async_trait::async_trait;
//! use serde::{Deserialize, Serialize};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Clone)]
//! struct Tag { id: u32, label: String }
//!
//! #[derive(Serialize, Deserialize)]
//! struct TagData { id: u32, label: String }
//!
//! #[derive(Serialize, Deserialize, garde::Validate)]
//! struct TagEdit {
//!     #[garde(length(min = 1))]
//!     label: String,
//! }
//!
//! #[derive(Default)]
//! struct Tags(Mutex<Vec<Tag>>);
//!
//! #[async_trait]
//! impl Storage for Tags {
//!     type Entity = Tag;
//!     type Id = u32;
//!     async fn find_by_id(&self, id: &u32) -> Result<Option<Tag>, StorageError> {
//!         Ok(self.0.lock().unwrap().iter().find(|t| t.id == *id).cloned())
//!     }
//!     async fn find_page(&self, request: &PageRequest) -> Result<Slice<Tag>, StorageError> {
//!         let tags = self.0.lock().unwrap();
//!         let content = tags.iter().skip(request.offset() as usize)
//!             .take(request.page_size() as usize).cloned().collect();
//!         Ok(Slice::new(content, tags.len() as u64))
//!     }
//!     async fn save(&self, mut tag: Tag) -> Result<Tag, StorageError> {
//!         let mut tags = self.0.lock().unwrap();
//!         tags.retain(|t| t.id != tag.id);
//!         if tag.id == 0 { tag.id = tags.len() as u32 + 1; }
//!         tags.push(tag.clone());
//!         Ok(tag)
//!     }
//!     async fn delete(&self, tag: &Tag) -> Result<(), StorageError> {
//!         self.0.lock().unwrap().retain(|t| t.id != tag.id);
//!         Ok(())
//!     }
//! }
//!
//! struct TagConverter;
//!
//! impl Converter<Tag> for TagConverter {
//!     type Data = TagData;
//!     type Edit = TagEdit;
//!     fn from_entity(&self, tag: &Tag) -> TagData { TagData { id: tag.id, label: tag.label.clone() } }
//!     fn new_entity(&self, edit: TagEdit) -> Tag { Tag { id: 0, label: edit.label } }
//!     fn update_entity_from_edit(&self, edit: TagEdit, tag: &mut Tag) { tag.label = edit.label; }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let handler = ResourceHandler::new(Tags::default(), TagConverter, PagingConfig::new(20, 100));
//!     let router = resource_router(Arc::new(handler), "/api/tag");
//!
//!     let tags: RestResource<u32, TagData, TagEdit> =
//!         RestResource::new(Arc::new(RouterTransport::new(router)), "http://localhost/api/tag");
//!
//!     let created = tags.create(&TagEdit { label: "rust".into() }).await.unwrap();
//!     let page = tags.find(0, 10).await.unwrap();
//!     assert_eq!(page.total_elements(), 1);
//!     assert_eq!(page.content()[0].id, created.id);
//! }
//! ```
//!
//! ## Testing
//!
//! [`RouterTransport`] drives a router in-process, so a full client/server round trip
//! needs no socket. [`mock::MockTransport`] replays canned answers for unit tests of
//! code that sits on top of a proxy.

pub mod client;
pub mod entity;
pub mod error;
pub mod error_response;
pub mod handler;
pub mod mock;
pub mod page;
pub mod routes;
pub mod storage;
pub mod transport;
pub mod uri;
pub mod validation;

// Re-export core types for convenience
pub use client::{ChildRestResource, RestResource};
pub use entity::Converter;
pub use error::{CrudError, StorageError};
pub use error_response::{ErrorResponse, ErrorResponseBuilder};
pub use handler::{ChildResourceHandler, Created, ResourceHandler};
pub use page::{Direction, PageRequest, PageResult, PagingConfig, Sort};
pub use routes::{child_resource_router, resource_router};
pub use storage::{ChildStorage, Slice, Storage};
pub use transport::{ReqwestTransport, RouterTransport, Transport, TransportRequest, TransportResponse};
pub use validation::validate;
