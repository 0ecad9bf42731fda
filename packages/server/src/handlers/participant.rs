use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppPath};
use crate::models::participant::*;
use crate::models::shared::MessageResponse;
use crate::services::participant::ParticipantStore;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/participants",
    tag = "Participants",
    operation_id = "createParticipant",
    summary = "Register a new participant",
    description = "Creates a participant. `nim`, `full_name`, `email` and `phone` are required; every missing field is listed in the error message. Returns 409 if the NIM or email is already registered.",
    request_body = CreateParticipantRequest,
    responses(
        (status = 201, description = "Participant created", body = ParticipantResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "NIM or email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_participant(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateParticipantRequest>,
) -> Result<impl IntoResponse, AppError> {
    let model = ParticipantStore::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(ParticipantResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/participants",
    tag = "Participants",
    operation_id = "listParticipants",
    summary = "List all participants",
    description = "Returns every participant, newest first. Not paginated.",
    responses(
        (status = 200, description = "List of participants", body = Vec<ParticipantResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<ParticipantResponse>>, AppError> {
    let participants = ParticipantStore::new(&state.db).list().await?;
    Ok(Json(participants.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/participants/{id}",
    tag = "Participants",
    operation_id = "getParticipant",
    summary = "Get a participant by ID",
    description = "Returns the participant together with its enrollments, each including the enrolled class.",
    params(("id" = i32, Path, description = "Participant ID")),
    responses(
        (status = 200, description = "Participant details", body = ParticipantDetailResponse),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Participant not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_participant(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ParticipantDetailResponse>, AppError> {
    let detail = ParticipantStore::new(&state.db).get(id).await?;
    Ok(Json(detail.into()))
}

#[utoipa::path(
    patch,
    path = "/participants/{id}",
    tag = "Participants",
    operation_id = "updateParticipant",
    summary = "Update a participant",
    description = "Partially updates a participant using PATCH semantics. The merged record must still have every required field. An empty payload returns the current resource unchanged.",
    params(("id" = i32, Path, description = "Participant ID")),
    request_body = UpdateParticipantRequest,
    responses(
        (status = 200, description = "Participant updated", body = ParticipantResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Participant not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "NIM or email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_participant(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateParticipantRequest>,
) -> Result<Json<ParticipantResponse>, AppError> {
    let model = ParticipantStore::new(&state.db).update(id, payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/participants/{id}",
    tag = "Participants",
    operation_id = "deleteParticipant",
    summary = "Delete a participant",
    description = "Permanently deletes a participant and cascade-deletes its enrollments.",
    params(("id" = i32, Path, description = "Participant ID")),
    responses(
        (status = 200, description = "Participant deleted", body = MessageResponse),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Participant not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_participant(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    ParticipantStore::new(&state.db).remove(id).await?;
    Ok(Json(MessageResponse::new("Participant deleted successfully")))
}
