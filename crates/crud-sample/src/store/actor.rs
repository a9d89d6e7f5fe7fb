use super::{Filter, StoreClient, StoreEntity, StoreError, StoreRequest};
use crud_framework::{PageRequest, Slice, Sort};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Owns the records of one entity type.
///
/// Requests are handled one at a time in [`run`](Self::run), so a save or delete
/// is atomic with respect to every other request. Records remember their
/// insertion sequence, which is the order of an unsorted page.
pub struct StoreActor<T: StoreEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    store: HashMap<String, (u64, T)>,
    next_sequence: u64,
    next_id: Box<dyn FnMut() -> String + Send>,
}

impl<T: StoreEntity> StoreActor<T> {
    /// Creates the actor and its client. `next_id` produces the id of every
    /// inserted record.
    pub fn new(
        buffer_size: usize,
        next_id: impl FnMut() -> String + Send + 'static,
    ) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_sequence: 0,
            next_id: Box::new(next_id),
        };
        (actor, StoreClient::new(sender))
    }

    /// Processes requests until every client is dropped.
    pub async fn run(mut self) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).map(|(_, item)| item.clone());
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::Page {
                    request,
                    filter,
                    respond_to,
                } => {
                    let result = self.page(&request, filter.as_ref());
                    if let Ok(slice) = &result {
                        debug!(
                            entity_type,
                            page = request.page(),
                            total = slice.total_elements,
                            "Page"
                        );
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Save { entity, respond_to } => {
                    let saved = self.save(entity);
                    info!(
                        entity_type,
                        id = saved.id().unwrap_or_default(),
                        size = self.store.len(),
                        "Saved"
                    );
                    let _ = respond_to.send(Ok(saved));
                }
                StoreRequest::Delete { id, respond_to } => {
                    let removed = self.store.remove(&id).is_some();
                    info!(entity_type, %id, removed, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn save(&mut self, mut entity: T) -> T {
        let id = match entity.id() {
            Some(id) => id.to_string(),
            None => {
                let id = (self.next_id)();
                entity.set_id(id.clone());
                id
            }
        };

        let sequence = match self.store.get(&id) {
            Some((sequence, _)) => *sequence,
            None => {
                self.next_sequence += 1;
                self.next_sequence
            }
        };
        self.store.insert(id, (sequence, entity.clone()));
        entity
    }

    fn page(
        &self,
        request: &PageRequest,
        filter: Option<&Filter<T>>,
    ) -> Result<Slice<T>, StoreError> {
        if let Some(unknown) = request
            .sort()
            .iter()
            .find(|sort| !T::SORT_FIELDS.contains(&sort.field.as_str()))
        {
            return Err(StoreError::UnknownSortField(unknown.field.clone()));
        }

        let mut matches: Vec<&(u64, T)> = self
            .store
            .values()
            .filter(|(_, item)| filter.map_or(true, |keep| keep(item)))
            .collect();
        matches.sort_by(|(seq_a, a), (seq_b, b)| {
            compare(a, b, request.sort()).then(seq_a.cmp(seq_b))
        });

        let total_elements = matches.len() as u64;
        let content = matches
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(request.page_size() as usize)
            .map(|(_, item)| item.clone())
            .collect();
        Ok(Slice::new(content, total_elements))
    }
}

fn compare<T: StoreEntity>(a: &T, b: &T, sort: &[Sort]) -> Ordering {
    sort.iter()
        .map(|criterion| {
            let ordering = a
                .sort_value(&criterion.field)
                .cmp(&b.sort_value(&criterion.field));
            if criterion.direction.is_descending() {
                ordering.reverse()
            } else {
                ordering
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
