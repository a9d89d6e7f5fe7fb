//! # Resource Handlers
//!
//! The server half of the CRUD contract. A [`ResourceHandler`] is assembled from a
//! [`Storage`] capability, a [`Converter`] and the deployment's [`PagingConfig`], and
//! offers `find`, `get_by_id`, `create`, `update` and `delete`.
//!
//! [`ChildResourceHandler`] wraps a `ResourceHandler` whose storage is a
//! [`ChildStorage`] and scopes every operation to a parent id. A child that exists
//! but belongs to another parent is reported exactly like a missing one.
//!
//! ## Concurrency
//!
//! Handlers keep no per-call state and can be shared behind an `Arc`. Concurrent
//! `update`/`delete` calls on the same id are ordered only by the storage; there
//! is no optimistic locking, so the last write wins.

use crate::entity::Converter;
use crate::error::CrudError;
use crate::page::{PageRequest, PageResult, PagingConfig};
use crate::storage::{ChildStorage, Slice, Storage};
use crate::validation::validate;

/// A successful `create`: the new DTO, answered with `201 Created`.
#[derive(Debug, Clone, PartialEq)]
pub struct Created<T>(pub T);

impl<T> Created<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Generic list/get/create/update/delete over a storage capability.
pub struct ResourceHandler<S, C> {
    storage: S,
    converter: C,
    paging: PagingConfig,
}

impl<S, C> ResourceHandler<S, C>
where
    S: Storage,
    C: Converter<S::Entity>,
{
    pub fn new(storage: S, converter: C, paging: PagingConfig) -> Self {
        Self {
            storage,
            converter,
            paging,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn paging(&self) -> &PagingConfig {
        &self.paging
    }

    /// Parse `page`, `pageSize` and `sort` from a raw query string.
    pub fn page_request(&self, query: Option<&str>) -> Result<PageRequest, CrudError> {
        PageRequest::from_query(query, &self.paging)
    }

    /// List from raw query parameters.
    pub async fn find(&self, query: Option<&str>) -> Result<PageResult<C::Data>, CrudError> {
        let request = self.page_request(query)?;
        self.find_page(&request).await
    }

    pub async fn find_page(
        &self,
        request: &PageRequest,
    ) -> Result<PageResult<C::Data>, CrudError> {
        let slice = self.storage.find_page(request).await?;
        Ok(self.to_page(slice, request))
    }

    pub async fn get_by_id(&self, id: &S::Id) -> Result<C::Data, CrudError> {
        let entity = self.get_entity(id).await?;
        Ok(self.converter.from_entity(&entity))
    }

    /// Validate, build a new entity and persist it.
    pub async fn create(&self, edit: C::Edit) -> Result<Created<C::Data>, CrudError> {
        validate(&edit)?;
        let entity = self.converter.new_entity(edit);
        let saved = self.storage.save(entity).await?;
        Ok(Created(self.converter.from_entity(&saved)))
    }

    /// Load, validate, apply `edit` in place and persist. Last write wins.
    pub async fn update(&self, id: &S::Id, edit: C::Edit) -> Result<C::Data, CrudError> {
        let entity = self.get_entity(id).await?;
        self.apply_and_save(entity, edit).await
    }

    pub async fn delete(&self, id: &S::Id) -> Result<(), CrudError> {
        let entity = self.get_entity(id).await?;
        self.storage.delete(&entity).await?;
        Ok(())
    }

    async fn get_entity(&self, id: &S::Id) -> Result<S::Entity, CrudError> {
        self.storage
            .find_by_id(id)
            .await?
            .ok_or_else(|| CrudError::not_found(format!("id {id}")))
    }

    async fn apply_and_save(
        &self,
        mut entity: S::Entity,
        edit: C::Edit,
    ) -> Result<C::Data, CrudError> {
        validate(&edit)?;
        self.converter.update_entity_from_edit(edit, &mut entity);
        let saved = self.storage.save(entity).await?;
        Ok(self.converter.from_entity(&saved))
    }

    fn to_page(&self, slice: Slice<S::Entity>, request: &PageRequest) -> PageResult<C::Data> {
        PageResult::new(
            self.converter.from_entities(&slice.content),
            request,
            slice.total_elements,
        )
    }
}

/// A [`ResourceHandler`] scoped to the children of one parent.
pub struct ChildResourceHandler<S, C> {
    inner: ResourceHandler<S, C>,
}

impl<S, C> ChildResourceHandler<S, C>
where
    S: ChildStorage,
    C: Converter<S::Entity>,
{
    pub fn new(storage: S, converter: C, paging: PagingConfig) -> Self {
        Self::from_handler(ResourceHandler::new(storage, converter, paging))
    }

    pub fn from_handler(inner: ResourceHandler<S, C>) -> Self {
        Self { inner }
    }

    pub fn handler(&self) -> &ResourceHandler<S, C> {
        &self.inner
    }

    pub async fn find(
        &self,
        parent_id: &S::ParentId,
        query: Option<&str>,
    ) -> Result<PageResult<C::Data>, CrudError> {
        let request = self.inner.page_request(query)?;
        self.find_page(parent_id, &request).await
    }

    pub async fn find_page(
        &self,
        parent_id: &S::ParentId,
        request: &PageRequest,
    ) -> Result<PageResult<C::Data>, CrudError> {
        self.get_parent(parent_id).await?;
        let slice = self
            .inner
            .storage()
            .find_page_by_parent(parent_id, request)
            .await?;
        Ok(self.inner.to_page(slice, request))
    }

    pub async fn get_by_id(
        &self,
        parent_id: &S::ParentId,
        id: &S::Id,
    ) -> Result<C::Data, CrudError> {
        let entity = self.get_entity(parent_id, id).await?;
        Ok(self.inner.converter().from_entity(&entity))
    }

    /// Validate, resolve the parent, attach it to the new entity and persist.
    pub async fn create(
        &self,
        parent_id: &S::ParentId,
        edit: C::Edit,
    ) -> Result<Created<C::Data>, CrudError> {
        validate(&edit)?;
        let parent = self.get_parent(parent_id).await?;

        let storage = self.inner.storage();
        let mut entity = self.inner.converter().new_entity(edit);
        storage.attach_parent(&mut entity, parent);
        let saved = storage.save(entity).await?;
        Ok(Created(self.inner.converter().from_entity(&saved)))
    }

    pub async fn update(
        &self,
        parent_id: &S::ParentId,
        id: &S::Id,
        edit: C::Edit,
    ) -> Result<C::Data, CrudError> {
        self.get_parent(parent_id).await?;
        let entity = self.get_entity(parent_id, id).await?;
        self.inner.apply_and_save(entity, edit).await
    }

    pub async fn delete(&self, parent_id: &S::ParentId, id: &S::Id) -> Result<(), CrudError> {
        let entity = self.get_entity(parent_id, id).await?;
        self.inner.storage().delete(&entity).await?;
        Ok(())
    }

    async fn get_parent(&self, parent_id: &S::ParentId) -> Result<S::Parent, CrudError> {
        self.inner
            .storage()
            .find_parent(parent_id)
            .await?
            .ok_or_else(|| CrudError::not_found(format!("parent {parent_id}")))
    }

    async fn get_entity(&self, parent_id: &S::ParentId, id: &S::Id) -> Result<S::Entity, CrudError> {
        self.inner
            .storage()
            .find_by_parent_and_id(parent_id, id)
            .await?
            .ok_or_else(|| CrudError::not_found(format!("id {id} in parent {parent_id}")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::page::Direction;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Note {
        pub id: Option<u32>,
        pub board: Option<u32>,
        pub title: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NoteData {
        pub id: u32,
        pub board: Option<u32>,
        pub title: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, garde::Validate)]
    pub struct NoteEdit {
        #[garde(length(min = 1))]
        pub title: String,
    }

    pub struct NoteConverter;

    impl Converter<Note> for NoteConverter {
        type Data = NoteData;
        type Edit = NoteEdit;

        fn from_entity(&self, entity: &Note) -> NoteData {
            NoteData {
                id: entity.id.unwrap_or_default(),
                board: entity.board,
                title: entity.title.clone(),
            }
        }

        fn new_entity(&self, edit: NoteEdit) -> Note {
            Note {
                id: None,
                board: None,
                title: edit.title,
            }
        }

        fn update_entity_from_edit(&self, edit: NoteEdit, entity: &mut Note) {
            entity.title = edit.title;
        }
    }

    /// Notes keyed by id, owned by one of a fixed set of boards.
    pub struct NoteStore {
        notes: Mutex<BTreeMap<u32, Note>>,
        boards: Vec<u32>,
        next_id: AtomicU32,
    }

    impl NoteStore {
        pub fn with_boards(boards: Vec<u32>) -> Self {
            Self {
                notes: Mutex::new(BTreeMap::new()),
                boards,
                next_id: AtomicU32::new(1),
            }
        }

        fn page_of(mut notes: Vec<Note>, request: &PageRequest) -> Slice<Note> {
            if let Some(sort) = request.sort().first() {
                if sort.field == "title" {
                    notes.sort_by(|a, b| a.title.cmp(&b.title));
                    if sort.direction == Direction::Desc {
                        notes.reverse();
                    }
                }
            }
            let total = notes.len() as u64;
            let content = notes
                .into_iter()
                .skip(request.offset() as usize)
                .take(request.page_size() as usize)
                .collect();
            Slice::new(content, total)
        }
    }

    #[async_trait]
    impl Storage for NoteStore {
        type Entity = Note;
        type Id = u32;

        async fn find_by_id(&self, id: &u32) -> Result<Option<Note>, StorageError> {
            Ok(self.notes.lock().unwrap().get(id).cloned())
        }

        async fn find_page(&self, request: &PageRequest) -> Result<Slice<Note>, StorageError> {
            let notes: Vec<Note> = self.notes.lock().unwrap().values().cloned().collect();
            Ok(Self::page_of(notes, request))
        }

        async fn save(&self, mut entity: Note) -> Result<Note, StorageError> {
            let id = match entity.id {
                Some(id) => id,
                None => self.next_id.fetch_add(1, Ordering::SeqCst),
            };
            entity.id = Some(id);
            self.notes.lock().unwrap().insert(id, entity.clone());
            Ok(entity)
        }

        async fn delete(&self, entity: &Note) -> Result<(), StorageError> {
            if let Some(id) = entity.id {
                self.notes.lock().unwrap().remove(&id);
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ChildStorage for NoteStore {
        type ParentId = u32;
        type Parent = u32;

        async fn find_parent(&self, parent_id: &u32) -> Result<Option<u32>, StorageError> {
            Ok(self.boards.contains(parent_id).then_some(*parent_id))
        }

        async fn find_by_parent_and_id(
            &self,
            parent_id: &u32,
            id: &u32,
        ) -> Result<Option<Note>, StorageError> {
            Ok(self
                .notes
                .lock()
                .unwrap()
                .get(id)
                .filter(|note| note.board == Some(*parent_id))
                .cloned())
        }

        async fn find_page_by_parent(
            &self,
            parent_id: &u32,
            request: &PageRequest,
        ) -> Result<Slice<Note>, StorageError> {
            let notes: Vec<Note> = self
                .notes
                .lock()
                .unwrap()
                .values()
                .filter(|note| note.board == Some(*parent_id))
                .cloned()
                .collect();
            Ok(Self::page_of(notes, request))
        }

        fn attach_parent(&self, entity: &mut Note, parent: u32) {
            entity.board = Some(parent);
        }
    }

    pub fn edit(title: &str) -> NoteEdit {
        NoteEdit {
            title: title.to_string(),
        }
    }

    fn handler() -> ResourceHandler<NoteStore, NoteConverter> {
        ResourceHandler::new(
            NoteStore::with_boards(vec![1, 2]),
            NoteConverter,
            PagingConfig::new(10, 50),
        )
    }

    fn child_handler() -> ChildResourceHandler<NoteStore, NoteConverter> {
        ChildResourceHandler::from_handler(handler())
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_keeps_values() {
        let handler = handler();

        let Created(note) = handler.create(edit("groceries")).await.unwrap();

        assert_eq!(note.id, 1);
        assert_eq!(note.title, "groceries");
        assert_eq!(handler.get_by_id(&1).await.unwrap(), note);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_edit() {
        let handler = handler();

        let err = handler.create(edit("")).await.unwrap_err();

        let response = err.error_response().expect("validation body");
        assert!(response.first_field_value("title").is_some());
        assert_eq!(handler.find(None).await.unwrap().total_elements(), 0);
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let handler = handler();
        let Created(note) = handler.create(edit("draft")).await.unwrap();

        let updated = handler.update(&note.id, edit("final")).await.unwrap();

        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "final");
        assert_eq!(handler.get_by_id(&note.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let handler = handler();

        assert!(matches!(handler.get_by_id(&9).await, Err(CrudError::NotFound(_))));
        assert!(matches!(
            handler.update(&9, edit("x")).await,
            Err(CrudError::NotFound(_))
        ));
        assert!(matches!(handler.delete(&9).await, Err(CrudError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_of_missing_id_wins_over_validation() {
        let handler = handler();
        assert!(matches!(
            handler.update(&9, edit("")).await,
            Err(CrudError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_entity() {
        let handler = handler();
        let Created(note) = handler.create(edit("temp")).await.unwrap();

        handler.delete(&note.id).await.unwrap();

        assert!(matches!(
            handler.get_by_id(&note.id).await,
            Err(CrudError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_pages_through_collection() {
        let handler = handler();
        for i in 0..25 {
            handler.create(edit(&format!("note {i:02}"))).await.unwrap();
        }

        let last = handler.find(Some("page=2&pageSize=10")).await.unwrap();

        assert_eq!(last.total_elements(), 25);
        assert_eq!(last.total_pages(), 3);
        assert_eq!(last.len(), 5);
        assert_eq!(last.page(), 2);

        let default_size = handler.find(None).await.unwrap();
        assert_eq!(default_size.page_size(), 10);
    }

    #[tokio::test]
    async fn test_find_rejects_malformed_query() {
        let handler = handler();
        assert!(matches!(
            handler.find(Some("pageSize=0")).await,
            Err(CrudError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_find_sorts_both_ways() {
        let handler = handler();
        handler.create(edit("b")).await.unwrap();
        handler.create(edit("a")).await.unwrap();

        let asc = handler.find(Some("sort=title,asc")).await.unwrap();
        let desc = handler.find(Some("sort=title,desc")).await.unwrap();

        let titles = |page: &PageResult<NoteData>| {
            page.content().iter().map(|n| n.title.clone()).collect::<Vec<_>>()
        };
        assert_eq!(titles(&asc), ["a", "b"]);
        assert_eq!(titles(&desc), ["b", "a"]);
        assert_eq!(asc.total_elements(), desc.total_elements());
        assert_eq!(asc.total_pages(), desc.total_pages());
    }

    #[tokio::test]
    async fn test_child_is_isolated_per_parent() {
        let handler = child_handler();
        let Created(note) = handler.create(&1, edit("board one")).await.unwrap();
        assert_eq!(note.board, Some(1));

        assert!(handler.get_by_id(&1, &note.id).await.is_ok());
        assert!(matches!(
            handler.get_by_id(&2, &note.id).await,
            Err(CrudError::NotFound(_))
        ));
        assert!(matches!(
            handler.update(&2, &note.id, edit("stolen")).await,
            Err(CrudError::NotFound(_))
        ));
        assert!(matches!(
            handler.delete(&2, &note.id).await,
            Err(CrudError::NotFound(_))
        ));

        assert_eq!(handler.find(&1, None).await.unwrap().total_elements(), 1);
        assert_eq!(handler.find(&2, None).await.unwrap().total_elements(), 0);
    }

    #[tokio::test]
    async fn test_child_create_requires_parent() {
        let handler = child_handler();

        let result = handler.create(&7, edit("orphan")).await;

        assert!(matches!(result, Err(CrudError::NotFound(_))));
        assert_eq!(handler.handler().find(None).await.unwrap().total_elements(), 0);
    }

    #[tokio::test]
    async fn test_child_listing_requires_parent() {
        let handler = child_handler();

        assert!(matches!(handler.find(&7, None).await, Err(CrudError::NotFound(_))));
        assert!(matches!(
            handler.find_page(&7, &PageRequest::of(0, 10)).await,
            Err(CrudError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_child_update_and_delete() {
        let handler = child_handler();
        let Created(note) = handler.create(&2, edit("before")).await.unwrap();

        let updated = handler.update(&2, &note.id, edit("after")).await.unwrap();
        assert_eq!(updated.title, "after");
        assert_eq!(updated.board, Some(2));

        handler.delete(&2, &note.id).await.unwrap();
        assert!(matches!(
            handler.get_by_id(&2, &note.id).await,
            Err(CrudError::NotFound(_))
        ));
    }
}
