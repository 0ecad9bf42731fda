use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::enrollment::EnrollmentResponse;
use super::shared::{require_fields, validate_length};
use crate::entity::participant;
use crate::error::AppError;
use crate::services::participant::ParticipantWithEnrollments;

/// Request body for creating a participant.
///
/// Fields are optional at the serde level so that absent and blank values are
/// both reported together as missing.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateParticipantRequest {
    /// Student identification number (NIM). Must be unique.
    #[schema(example = "A1")]
    pub nim: Option<String>,
    /// Full name, 3-100 characters.
    #[schema(example = "Budi Santoso")]
    pub full_name: Option<String>,
    /// Email address. Must be unique.
    #[schema(example = "budi@example.com")]
    pub email: Option<String>,
    /// Phone number, 8-15 digits with an optional leading `+`.
    #[schema(example = "+6281234567")]
    pub phone: Option<String>,
}

/// Request body for partially updating a participant.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateParticipantRequest {
    pub nim: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ParticipantResponse {
    pub id: i32,
    pub nim: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// A participant together with the classes it is enrolled in.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ParticipantDetailResponse {
    pub id: i32,
    pub nim: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    /// Enrollments, each with its class resolved.
    pub enrollments: Vec<EnrollmentResponse>,
}

impl From<participant::Model> for ParticipantResponse {
    fn from(m: participant::Model) -> Self {
        Self {
            id: m.id,
            nim: m.nim,
            full_name: m.full_name,
            email: m.email,
            phone: m.phone,
            created_at: m.created_at,
        }
    }
}

impl From<ParticipantWithEnrollments> for ParticipantDetailResponse {
    fn from(detail: ParticipantWithEnrollments) -> Self {
        let p = detail.participant;
        Self {
            id: p.id,
            nim: p.nim,
            full_name: p.full_name,
            email: p.email,
            phone: p.phone,
            created_at: p.created_at,
            enrollments: detail
                .enrollments
                .into_iter()
                .map(|(enrollment, class)| EnrollmentResponse::with_class(enrollment, class))
                .collect(),
        }
    }
}

pub fn validate_create_participant(req: &CreateParticipantRequest) -> Result<(), AppError> {
    require_fields(&[
        ("nim", req.nim.as_deref()),
        ("full_name", req.full_name.as_deref()),
        ("email", req.email.as_deref()),
        ("phone", req.phone.as_deref()),
    ])?;
    validate_participant_formats(
        req.full_name.as_deref(),
        req.email.as_deref(),
        req.phone.as_deref(),
    )
}

/// Validate the format of whichever fields are supplied in a patch. Blank
/// values are caught later, against the merged record.
pub fn validate_update_participant(req: &UpdateParticipantRequest) -> Result<(), AppError> {
    validate_participant_formats(
        present(&req.full_name),
        present(&req.email),
        present(&req.phone),
    )
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn validate_participant_formats(
    full_name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<(), AppError> {
    if let Some(full_name) = full_name {
        validate_length(full_name, "full_name", 3, 100)?;
    }
    if let Some(email) = email
        && !is_valid_email(email.trim())
    {
        return Err(AppError::Validation("email must be a valid email address".into()));
    }
    if let Some(phone) = phone
        && !is_valid_phone(phone.trim())
    {
        return Err(AppError::Validation(
            "phone must be a valid phone number".into(),
        ));
    }
    Ok(())
}

/// Address syntax per `validator`, with a dotted domain on top.
fn is_valid_email(email: &str) -> bool {
    email.validate_email()
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}

/// 8-15 digits, optional leading `+`, spaces and hyphens allowed as separators.
fn is_valid_phone(phone: &str) -> bool {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    if !rest.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-') {
        return false;
    }
    let digits = rest.chars().filter(char::is_ascii_digit).count();
    (8..=15).contains(&digits)
}
