use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::{AppJson, AppPath};
use crate::models::enrollment::*;
use crate::models::shared::MessageResponse;
use crate::services::enrollment::EnrollmentCoordinator;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/enrollments",
    tag = "Enrollments",
    operation_id = "createEnrollment",
    summary = "Enroll a participant in a class",
    description = "Creates an enrollment with status `registered`. The participant is checked first, then the class, then the pair; only the first failure is reported. Returns 409 if the participant is already enrolled in the class.",
    request_body = CreateEnrollmentRequest,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Participant or class not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already enrolled (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(participant_id = payload.participant_id, class_id = payload.class_id))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEnrollmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let detail = EnrollmentCoordinator::new(&state.db).enroll(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse::with_both(
            detail.enrollment,
            detail.participant,
            detail.class,
        )),
    ))
}

#[utoipa::path(
    delete,
    path = "/enrollments/{id}",
    tag = "Enrollments",
    operation_id = "deleteEnrollment",
    summary = "Delete an enrollment",
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment deleted", body = MessageResponse),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Enrollment not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    EnrollmentCoordinator::new(&state.db).remove(id).await?;
    Ok(Json(MessageResponse::new("Enrollment deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/enrollments/participant/{id}",
    tag = "Enrollments",
    operation_id = "listParticipantEnrollments",
    summary = "List the classes a participant is enrolled in",
    description = "Returns the participant's enrollments, each including its class. An unknown participant yields an empty list.",
    params(("id" = i32, Path, description = "Participant ID")),
    responses(
        (status = 200, description = "Enrollments with class", body = Vec<EnrollmentResponse>),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn list_participant_enrollments(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Vec<EnrollmentResponse>>, AppError> {
    let rows = EnrollmentCoordinator::new(&state.db)
        .list_classes_for_participant(id)
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|(enrollment, class)| EnrollmentResponse::with_class(enrollment, class))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/enrollments/class/{id}",
    tag = "Enrollments",
    operation_id = "listClassEnrollments",
    summary = "List the participants enrolled in a class",
    description = "Returns the class's enrollments, each including its participant. An unknown class yields an empty list.",
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Enrollments with participant", body = Vec<EnrollmentResponse>),
        (status = 400, description = "Invalid ID (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn list_class_enrollments(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Vec<EnrollmentResponse>>, AppError> {
    let rows = EnrollmentCoordinator::new(&state.db)
        .list_participants_for_class(id)
        .await?;
    Ok(Json(
        rows.into_iter()
            .map(|(enrollment, participant)| {
                EnrollmentResponse::with_participant(enrollment, participant)
            })
            .collect(),
    ))
}
