use super::{StoreEntity, StoreError};
use crud_framework::{PageRequest, Slice};
use tokio::sync::oneshot;

/// One-shot reply channel of a store request.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Restricts a page query to matching records.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send>;

/// Requests understood by a [`StoreActor`](super::StoreActor).
pub enum StoreRequest<T: StoreEntity> {
    Get {
        id: String,
        respond_to: Response<Option<T>>,
    },
    Page {
        request: PageRequest,
        filter: Option<Filter<T>>,
        respond_to: Response<Slice<T>>,
    },
    /// Insert when the record has no id yet, overwrite otherwise.
    Save { entity: T, respond_to: Response<T> },
    Delete {
        id: String,
        respond_to: Response<()>,
    },
}
