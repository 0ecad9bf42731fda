use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppPath};
use crate::models::class::*;
use crate::models::shared::MessageResponse;
use crate::services::class::ClassStore;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/classes",
    tag = "Classes",
    operation_id = "createClass",
    summary = "Create a new class",
    description = "Creates a class. `name` (3-100 characters) and `instructor` are required. `status` defaults to `active`.",
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class created", body = ClassResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_class(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateClassRequest>,
) -> Result<impl IntoResponse, AppError> {
    let model = ClassStore::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(ClassResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/classes",
    tag = "Classes",
    operation_id = "listClasses",
    summary = "List all classes",
    description = "Returns every class, newest first. Not paginated.",
    responses(
        (status = 200, description = "List of classes", body = Vec<ClassResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassResponse>>, AppError> {
    let classes = ClassStore::new(&state.db).list().await?;
    Ok(Json(classes.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/classes/{id}",
    tag = "Classes",
    operation_id = "getClass",
    summary = "Get a class by ID",
    description = "Returns the class together with its enrollments, each including the enrolled participant.",
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = ClassDetailResponse),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_class(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ClassDetailResponse>, AppError> {
    let detail = ClassStore::new(&state.db).get(id).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    patch,
    path = "/classes/{id}",
    tag = "Classes",
    operation_id = "updateClass",
    summary = "Update a class",
    description = "Partially updates a class. Omitted fields keep their values; `description: null` clears the description.",
    params(("id" = i32, Path, description = "Class ID")),
    request_body = UpdateClassRequest,
    responses(
        (status = 200, description = "Class updated", body = ClassResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_class(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateClassRequest>,
) -> Result<Json<ClassResponse>, AppError> {
    let model = ClassStore::new(&state.db).update(id, payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/classes/{id}",
    tag = "Classes",
    operation_id = "deleteClass",
    summary = "Delete a class",
    description = "Permanently deletes a class and cascade-deletes its enrollments.",
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_class(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    ClassStore::new(&state.db).remove(id).await?;
    Ok(Json(MessageResponse::new("Class deleted successfully")))
}
