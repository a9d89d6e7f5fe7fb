use super::{Filter, StoreEntity, StoreError, StoreRequest};
use async_trait::async_trait;
use crud_framework::{PageRequest, Slice, Storage, StorageError};
use tokio::sync::{mpsc, oneshot};

/// Cloneable handle to a [`StoreActor`](super::StoreActor).
pub struct StoreClient<T: StoreEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: StoreEntity> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: StoreEntity> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        request: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> StoreRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>, StoreError> {
        let id = id.to_string();
        self.call(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    pub async fn page(
        &self,
        request: PageRequest,
        filter: Option<Filter<T>>,
    ) -> Result<Slice<T>, StoreError> {
        self.call(|respond_to| StoreRequest::Page {
            request,
            filter,
            respond_to,
        })
        .await
    }

    pub async fn save(&self, entity: T) -> Result<T, StoreError> {
        self.call(|respond_to| StoreRequest::Save { entity, respond_to })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.call(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }
}

#[async_trait]
impl<T: StoreEntity> Storage for StoreClient<T> {
    type Entity = T;
    type Id = String;

    async fn find_by_id(&self, id: &String) -> Result<Option<T>, StorageError> {
        Ok(self.get(id).await?)
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Slice<T>, StorageError> {
        Ok(self.page(request.clone(), None).await?)
    }

    async fn save(&self, entity: T) -> Result<T, StorageError> {
        Ok(StoreClient::save(self, entity).await?)
    }

    async fn delete(&self, entity: &T) -> Result<(), StorageError> {
        match entity.id() {
            Some(id) => Ok(StoreClient::delete(self, id).await?),
            None => Ok(()),
        }
    }
}
