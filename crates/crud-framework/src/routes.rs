//! # HTTP Routes
//!
//! Mounts a handler on an [`axum::Router`]:
//!
//! | Method | Path                 | Success        |
//! |--------|----------------------|----------------|
//! | GET    | `{path}?page=..`     | 200, a page    |
//! | GET    | `{path}/{id}`        | 200, the DTO   |
//! | POST   | `{path}`             | 201, the DTO   |
//! | PUT    | `{path}/{id}`        | 200, the DTO   |
//! | DELETE | `{path}/{id}`        | 204            |
//!
//! Child resources live under `{parent_path}/{parent_id}/{child_path}`.
//! Every failure is answered with an [`ErrorResponse`](crate::ErrorResponse) body.

use crate::entity::Converter;
use crate::error::CrudError;
use crate::handler::{ChildResourceHandler, Created, ResourceHandler};
use crate::page::PageResult;
use crate::storage::{ChildStorage, Storage};
use crate::uri;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use std::sync::Arc;

impl<T: serde::Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// Routes for a top-level collection mounted at `path` (e.g. `/api/company`).
pub fn resource_router<S, C>(handler: Arc<ResourceHandler<S, C>>, path: &str) -> Router
where
    S: Storage,
    S::Id: DeserializeOwned,
    C: Converter<S::Entity>,
{
    let collection = uri::join("", &[path]);
    let item = format!("{collection}/{{id}}");

    Router::new()
        .route(&collection, get(find::<S, C>).post(create::<S, C>))
        .route(
            &item,
            get(get_by_id::<S, C>)
                .put(update::<S, C>)
                .delete(delete::<S, C>),
        )
        .with_state(handler)
}

/// Routes for a child collection at `{parent_path}/{parent_id}/{child_path}`.
pub fn child_resource_router<S, C>(
    handler: Arc<ChildResourceHandler<S, C>>,
    parent_path: &str,
    child_path: &str,
) -> Router
where
    S: ChildStorage,
    S::Id: DeserializeOwned,
    S::ParentId: DeserializeOwned,
    C: Converter<S::Entity>,
{
    // The parent id sits where the parent's own item routes put `{id}`; the router
    // rejects two parameter names at one position.
    let collection = uri::join("", &[parent_path, "{id}", child_path]);
    let item = format!("{collection}/{{child_id}}");

    Router::new()
        .route(
            &collection,
            get(find_children::<S, C>).post(create_child::<S, C>),
        )
        .route(
            &item,
            get(get_child::<S, C>)
                .put(update_child::<S, C>)
                .delete(delete_child::<S, C>),
        )
        .with_state(handler)
}

fn decode_edit<T: DeserializeOwned>(body: &Bytes) -> Result<T, CrudError> {
    serde_json::from_slice(body).map_err(|e| CrudError::BadRequest(format!("Invalid body: {e}")))
}

fn path_value<T>(path: Result<Path<T>, PathRejection>) -> Result<T, CrudError> {
    path.map(|Path(value)| value)
        .map_err(|rejection| CrudError::BadRequest(rejection.body_text()))
}

type Shared<S, C> = State<Arc<ResourceHandler<S, C>>>;
type SharedChild<S, C> = State<Arc<ChildResourceHandler<S, C>>>;

async fn find<S, C>(
    State(handler): Shared<S, C>,
    RawQuery(query): RawQuery,
) -> Result<Json<PageResult<C::Data>>, CrudError>
where
    S: Storage,
    C: Converter<S::Entity>,
{
    handler.find(query.as_deref()).await.map(Json)
}

async fn get_by_id<S, C>(
    State(handler): Shared<S, C>,
    path: Result<Path<S::Id>, PathRejection>,
) -> Result<Json<C::Data>, CrudError>
where
    S: Storage,
    S::Id: DeserializeOwned,
    C: Converter<S::Entity>,
{
    let id = path_value(path)?;
    handler.get_by_id(&id).await.map(Json)
}

async fn create<S, C>(
    State(handler): Shared<S, C>,
    body: Bytes,
) -> Result<Created<C::Data>, CrudError>
where
    S: Storage,
    C: Converter<S::Entity>,
{
    let edit = decode_edit(&body)?;
    handler.create(edit).await
}

async fn update<S, C>(
    State(handler): Shared<S, C>,
    path: Result<Path<S::Id>, PathRejection>,
    body: Bytes,
) -> Result<Json<C::Data>, CrudError>
where
    S: Storage,
    S::Id: DeserializeOwned,
    C: Converter<S::Entity>,
{
    let id = path_value(path)?;
    let edit = decode_edit(&body)?;
    handler.update(&id, edit).await.map(Json)
}

async fn delete<S, C>(
    State(handler): Shared<S, C>,
    path: Result<Path<S::Id>, PathRejection>,
) -> Result<StatusCode, CrudError>
where
    S: Storage,
    S::Id: DeserializeOwned,
    C: Converter<S::Entity>,
{
    let id = path_value(path)?;
    handler.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn find_children<S, C>(
    State(handler): SharedChild<S, C>,
    path: Result<Path<S::ParentId>, PathRejection>,
    RawQuery(query): RawQuery,
) -> Result<Json<PageResult<C::Data>>, CrudError>
where
    S: ChildStorage,
    S::ParentId: DeserializeOwned,
    C: Converter<S::Entity>,
{
    let parent_id = path_value(path)?;
    handler.find(&parent_id, query.as_deref()).await.map(Json)
}

async fn get_child<S, C>(
    State(handler): SharedChild<S, C>,
    path: Result<Path<(S::ParentId, S::Id)>, PathRejection>,
) -> Result<Json<C::Data>, CrudError>
where
    S: ChildStorage,
    S::Id: DeserializeOwned,
    S::ParentId: DeserializeOwned,
    C: Converter<S::Entity>,
{
    let (parent_id, id) = path_value(path)?;
    handler.get_by_id(&parent_id, &id).await.map(Json)
}

async fn create_child<S, C>(
    State(handler): SharedChild<S, C>,
    path: Result<Path<S::ParentId>, PathRejection>,
    body: Bytes,
) -> Result<Created<C::Data>, CrudError>
where
    S: ChildStorage,
    S::ParentId: DeserializeOwned,
    C: Converter<S::Entity>,
{
    let parent_id = path_value(path)?;
    let edit = decode_edit(&body)?;
    handler.create(&parent_id, edit).await
}

async fn update_child<S, C>(
    State(handler): SharedChild<S, C>,
    path: Result<Path<(S::ParentId, S::Id)>, PathRejection>,
    body: Bytes,
) -> Result<Json<C::Data>, CrudError>
where
    S: ChildStorage,
    S::Id: DeserializeOwned,
    S::ParentId: DeserializeOwned,
    C: Converter<S::Entity>,
{
    let (parent_id, id) = path_value(path)?;
    let edit = decode_edit(&body)?;
    handler.update(&parent_id, &id, edit).await.map(Json)
}

async fn delete_child<S, C>(
    State(handler): SharedChild<S, C>,
    path: Result<Path<(S::ParentId, S::Id)>, PathRejection>,
) -> Result<StatusCode, CrudError>
where
    S: ChildStorage,
    S::Id: DeserializeOwned,
    S::ParentId: DeserializeOwned,
    C: Converter<S::Entity>,
{
    let (parent_id, id) = path_value(path)?;
    handler.delete(&parent_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
