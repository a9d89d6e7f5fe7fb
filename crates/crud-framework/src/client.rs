//! # Resource Proxies
//!
//! Client-side counterparts of the handlers. A [`RestResource`] addresses a
//! collection at `{base}` and its items at `{base}/{id}`; a [`ChildRestResource`]
//! addresses `{parent_base}/{parent_id}/{child_path}[/{id}]`. Ids are
//! percent-encoded, so they always address exactly one path segment.
//!
//! Responses are mapped back onto [`CrudError`]:
//!
//! | Status        | Result                                                  |
//! |---------------|---------------------------------------------------------|
//! | 2xx           | the decoded body                                        |
//! | 400           | `Validation` when the body names fields, else `BadRequest` |
//! | 404           | `NotFound` (`get_by_id` answers `Ok(None)` instead)     |
//! | anything else | `Upstream` carrying the status and body text            |
//!
//! Proxies are cheap to clone and safe to share across tasks.

use crate::error::CrudError;
use crate::error_response::ErrorResponse;
use crate::page::{PageRequest, PageResult};
use crate::transport::{Transport, TransportRequest, TransportResponse};
use crate::uri;
use http::header::{HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Shared plumbing of both proxies: headers, status mapping, decoding.
#[derive(Clone)]
struct ResourceCore {
    transport: Arc<dyn Transport>,
    language: Option<HeaderValue>,
}

impl ResourceCore {
    fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            language: None,
        }
    }

    fn request(&self, method: Method, url: String) -> TransportRequest {
        let request = TransportRequest::new(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        match &self.language {
            Some(language) => request.header(ACCEPT_LANGUAGE, language.clone()),
            None => request,
        }
    }

    fn request_with_body<W: Serialize>(
        &self,
        method: Method,
        url: String,
        data: &W,
    ) -> Result<TransportRequest, CrudError> {
        let body = serde_json::to_vec(data)
            .map_err(|e| CrudError::BadRequest(format!("Cannot encode body: {e}")))?;
        Ok(self.request(method, url).json(body))
    }

    /// Send and require a 2xx answer.
    async fn send(&self, request: TransportRequest) -> Result<String, CrudError> {
        let TransportResponse { status, body } = self.transport.exchange(request).await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(error_from_response(status, body))
        }
    }

    async fn find<D: DeserializeOwned>(
        &self,
        url: &str,
        request: &PageRequest,
    ) -> Result<PageResult<D>, CrudError> {
        let url = format!("{url}?{}", request.to_query_string());
        let body = self.send(self.request(Method::GET, url)).await?;
        PageResult::decode(&body, |value| serde_json::from_value(value).map_err(CrudError::from))
    }

    async fn get<D: DeserializeOwned>(&self, url: String) -> Result<Option<D>, CrudError> {
        let TransportResponse { status, body } =
            self.transport.exchange(self.request(Method::GET, url)).await?;
        match status {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => Ok(Some(decode(&body)?)),
            status => Err(error_from_response(status, body)),
        }
    }

    async fn write<W: Serialize, D: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        data: &W,
    ) -> Result<D, CrudError> {
        let request = self.request_with_body(method, url, data)?;
        let body = self.send(request).await?;
        decode(&body)
    }

    async fn delete(&self, url: String) -> Result<(), CrudError> {
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    /// Walk every page from 0 and feed each element to `consumer`.
    async fn execute_all<D, F>(
        &self,
        url: &str,
        page_size: u32,
        mut consumer: F,
    ) -> Result<u64, CrudError>
    where
        D: DeserializeOwned,
        F: FnMut(D),
    {
        if page_size == 0 {
            return Err(CrudError::BadRequest("page size must be positive".to_string()));
        }

        let mut request = PageRequest::of(0, page_size);
        let mut count = 0u64;
        loop {
            let page: PageResult<D> = self.find(url, &request).await?;
            let fetched = page.len();
            let has_next = page.has_next();
            // The server may clamp the size; continue with the one it served.
            let served = match page.page_size() {
                0 => request.page_size(),
                size => size,
            };

            for item in page {
                consumer(item);
                count += 1;
            }

            if fetched == 0 || fetched < served as usize || !has_next {
                return Ok(count);
            }
            request = PageRequest::of(request.page().saturating_add(1), served);
        }
    }
}

fn decode<D: DeserializeOwned>(body: &str) -> Result<D, CrudError> {
    Ok(serde_json::from_str(body)?)
}

fn error_from_response(status: StatusCode, body: String) -> CrudError {
    match status {
        StatusCode::BAD_REQUEST => match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(response) if response.has_fields() => CrudError::Validation(response),
            Ok(response) => CrudError::BadRequest(response.message().map_or(body, str::to_string)),
            Err(_) => CrudError::BadRequest(body),
        },
        StatusCode::NOT_FOUND => CrudError::NotFound(body),
        status => CrudError::Upstream {
            status: Some(status.as_u16()),
            body,
        },
    }
}

/// Proxy for a top-level collection.
///
/// `Id` addresses items, `D` is the read DTO and `W` the write DTO.
pub struct RestResource<Id, D, W> {
    core: ResourceCore,
    base_url: String,
    _marker: PhantomData<fn() -> (Id, D, W)>,
}

impl<Id, D, W> Clone for RestResource<Id, D, W> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            base_url: self.base_url.clone(),
            _marker: PhantomData,
        }
    }
}

impl<Id, D, W> RestResource<Id, D, W>
where
    Id: Display + Debug + Send + Sync,
    D: DeserializeOwned + Send,
    W: Serialize + Sync,
{
    /// `base_url` is the collection URL, e.g. `http://host/api/company`.
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            core: ResourceCore::new(transport),
            base_url: uri::join::<&str>(base_url, &[]),
            _marker: PhantomData,
        }
    }

    /// Send `Accept-Language` with every request.
    pub fn with_language(mut self, language: HeaderValue) -> Self {
        self.core.language = Some(language);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &Id) -> String {
        uri::join(&self.base_url, &[uri::encode_segment(&id.to_string())])
    }

    pub async fn find(&self, page: u32, page_size: u32) -> Result<PageResult<D>, CrudError> {
        self.find_with(&PageRequest::of(page, page_size)).await
    }

    /// List with an explicit request, sort included.
    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn find_with(&self, request: &PageRequest) -> Result<PageResult<D>, CrudError> {
        debug!("Sending request");
        self.core.find(&self.base_url, request).await
    }

    /// `Ok(None)` when the server answers 404 or 204.
    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn get_by_id(&self, id: &Id) -> Result<Option<D>, CrudError> {
        debug!("Sending request");
        self.core.get(self.item_url(id)).await
    }

    #[instrument(skip(self, data), fields(url = %self.base_url))]
    pub async fn create(&self, data: &W) -> Result<D, CrudError> {
        debug!("Sending request");
        self.core
            .write(Method::POST, self.base_url.clone(), data)
            .await
    }

    #[instrument(skip(self, data), fields(url = %self.base_url))]
    pub async fn update(&self, id: &Id, data: &W) -> Result<D, CrudError> {
        debug!("Sending request");
        self.core.write(Method::PUT, self.item_url(id), data).await
    }

    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn delete(&self, id: &Id) -> Result<(), CrudError> {
        debug!("Sending request");
        self.core.delete(self.item_url(id)).await
    }

    /// Feed every element of the collection to `consumer`, page by page in
    /// server order. Returns how many elements were consumed.
    ///
    /// Pages are fetched sequentially; the walk stops after a short page or the
    /// last page. Writes made concurrently may be skipped or seen twice.
    #[instrument(skip(self, consumer), fields(url = %self.base_url))]
    pub async fn execute_all<F>(&self, page_size: u32, consumer: F) -> Result<u64, CrudError>
    where
        F: FnMut(D) + Send,
    {
        debug!("Walking collection");
        self.core
            .execute_all(&self.base_url, page_size, consumer)
            .await
    }
}

/// Proxy for a collection nested under a parent resource.
pub struct ChildRestResource<PId, Id, D, W> {
    core: ResourceCore,
    parent_base_url: String,
    child_path: String,
    _marker: PhantomData<fn() -> (PId, Id, D, W)>,
}

impl<PId, Id, D, W> Clone for ChildRestResource<PId, Id, D, W> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            parent_base_url: self.parent_base_url.clone(),
            child_path: self.child_path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<PId, Id, D, W> ChildRestResource<PId, Id, D, W>
where
    PId: Display + Debug + Send + Sync,
    Id: Display + Debug + Send + Sync,
    D: DeserializeOwned + Send,
    W: Serialize + Sync,
{
    /// `parent_base_url` is the parent collection (`http://host/api/company`),
    /// `child_path` the segment after the parent id (`person`).
    pub fn new(transport: Arc<dyn Transport>, parent_base_url: &str, child_path: &str) -> Self {
        Self {
            core: ResourceCore::new(transport),
            parent_base_url: uri::join::<&str>(parent_base_url, &[]),
            child_path: child_path.trim_matches('/').to_string(),
            _marker: PhantomData,
        }
    }

    pub fn with_language(mut self, language: HeaderValue) -> Self {
        self.core.language = Some(language);
        self
    }

    /// Collection URL of the children of `parent_id`.
    pub fn collection_url(&self, parent_id: &PId) -> String {
        uri::join(
            &self.parent_base_url,
            &[uri::encode_segment(&parent_id.to_string()), self.child_path.clone()],
        )
    }

    fn item_url(&self, parent_id: &PId, id: &Id) -> String {
        uri::join(
            &self.collection_url(parent_id),
            &[uri::encode_segment(&id.to_string())],
        )
    }

    pub async fn find(
        &self,
        parent_id: &PId,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult<D>, CrudError> {
        self.find_with(parent_id, &PageRequest::of(page, page_size))
            .await
    }

    #[instrument(skip(self), fields(url = %self.parent_base_url, child = %self.child_path))]
    pub async fn find_with(
        &self,
        parent_id: &PId,
        request: &PageRequest,
    ) -> Result<PageResult<D>, CrudError> {
        debug!("Sending request");
        self.core
            .find(&self.collection_url(parent_id), request)
            .await
    }

    #[instrument(skip(self), fields(url = %self.parent_base_url, child = %self.child_path))]
    pub async fn get_by_id(&self, parent_id: &PId, id: &Id) -> Result<Option<D>, CrudError> {
        debug!("Sending request");
        self.core.get(self.item_url(parent_id, id)).await
    }

    #[instrument(skip(self, data), fields(url = %self.parent_base_url, child = %self.child_path))]
    pub async fn create(&self, parent_id: &PId, data: &W) -> Result<D, CrudError> {
        debug!("Sending request");
        self.core
            .write(Method::POST, self.collection_url(parent_id), data)
            .await
    }

    #[instrument(skip(self, data), fields(url = %self.parent_base_url, child = %self.child_path))]
    pub async fn update(&self, parent_id: &PId, id: &Id, data: &W) -> Result<D, CrudError> {
        debug!("Sending request");
        self.core
            .write(Method::PUT, self.item_url(parent_id, id), data)
            .await
    }

    #[instrument(skip(self), fields(url = %self.parent_base_url, child = %self.child_path))]
    pub async fn delete(&self, parent_id: &PId, id: &Id) -> Result<(), CrudError> {
        debug!("Sending request");
        self.core.delete(self.item_url(parent_id, id)).await
    }

    #[instrument(skip(self, consumer), fields(url = %self.parent_base_url, child = %self.child_path))]
    pub async fn execute_all<F>(
        &self,
        parent_id: &PId,
        page_size: u32,
        consumer: F,
    ) -> Result<u64, CrudError>
    where
        F: FnMut(D) + Send,
    {
        debug!("Walking collection");
        self.core
            .execute_all(&self.collection_url(parent_id), page_size, consumer)
            .await
    }
}
