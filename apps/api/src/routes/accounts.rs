//! `/api/v1/roles` and `/api/v1/users`: staff accounts.
//!
//! Users don't go through the generic create/read handlers: their bodies
//! carry a plain password and their responses must never carry the hash.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use digicheese_core::{Role, User, UserCreate, UserPatch, UserPublic, UserWithRoles};

use super::{accept, crud_routes, path_id, JsonBody, ListParams, PathParams, QueryParams};
use crate::error::ApiResult;
use crate::AppState;

const ROLES: &str = "/api/v1/roles";
const USERS: &str = "/api/v1/users";

pub fn routes() -> Router<AppState> {
    crud_routes::<Role>(ROLES)
        .route(USERS, get(list_users).post(create_user))
        .route(
            &format!("{USERS}/{{id}}"),
            get(get_user).patch(patch_user).delete(super::delete::<User>),
        )
        .route(&format!("{USERS}/{{id}}/roles"), get(user_roles))
        .route(
            &format!("{USERS}/{{id}}/roles/{{role_id}}"),
            put(assign_role).delete(revoke_role),
        )
}

/// GET /api/v1/users
async fn list_users(
    State(state): State<AppState>,
    params: QueryParams<ListParams>,
) -> ApiResult<Json<Vec<UserPublic>>> {
    let Query(params) = accept(params)?;
    let limit = params.resolve(&state)?;

    Ok(Json(state.services.users().list_public(limit).await?))
}

/// GET /api/v1/users/{id}
async fn get_user(State(state): State<AppState>, id: PathParams<i64>) -> ApiResult<Json<UserPublic>> {
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;

    Ok(Json(state.services.users().get_public(id).await?))
}

/// POST /api/v1/users
async fn create_user(
    State(state): State<AppState>,
    body: JsonBody<UserCreate>,
) -> ApiResult<(StatusCode, Json<UserPublic>)> {
    let Json(data) = accept(body)?;
    let created = state.services.users().create_user(data).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/v1/users/{id}
async fn patch_user(
    State(state): State<AppState>,
    id: PathParams<i64>,
    body: JsonBody<UserPatch>,
) -> ApiResult<Json<UserPublic>> {
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;
    let Json(changes) = accept(body)?;

    Ok(Json(state.services.users().patch_user(id, changes).await?))
}

/// GET /api/v1/users/{id}/roles
async fn user_roles(State(state): State<AppState>, id: PathParams<i64>) -> ApiResult<Json<UserWithRoles>> {
    let Path(id) = accept(id)?;
    let id = path_id("id", id)?;

    Ok(Json(state.services.users().with_roles(id).await?))
}

fn link_path(params: PathParams<(i64, i64)>) -> ApiResult<(i64, i64)> {
    let Path((user_id, role_id)) = accept(params)?;
    Ok((path_id("id", user_id)?, path_id("role_id", role_id)?))
}

/// PUT /api/v1/users/{id}/roles/{role_id}
async fn assign_role(
    State(state): State<AppState>,
    params: PathParams<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let (user_id, role_id) = link_path(params)?;

    state.services.users().assign_role(user_id, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/{id}/roles/{role_id}
async fn revoke_role(
    State(state): State<AppState>,
    params: PathParams<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let (user_id, role_id) = link_path(params)?;

    state.services.users().revoke_role(user_id, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
