use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enrollment::EnrollmentResponse;
use super::shared::{double_option, require_fields, validate_length};
use crate::entity::class;
use crate::error::AppError;
use crate::services::class::ClassWithEnrollments;

pub const DEFAULT_CLASS_STATUS: &str = "active";

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateClassRequest {
    /// Class name, 3-100 characters.
    #[schema(example = "Web Programming")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(example = "Pak Joko")]
    pub instructor: Option<String>,
    /// Defaults to "active" when omitted.
    #[schema(example = "active")]
    pub status: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub instructor: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ClassResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub instructor: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A class together with its enrolled participants.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ClassDetailResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub instructor: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    /// Enrollments, each with its participant resolved.
    pub enrollments: Vec<EnrollmentResponse>,
}

impl From<class::Model> for ClassResponse {
    fn from(m: class::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            instructor: m.instructor,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

impl From<ClassWithEnrollments> for ClassDetailResponse {
    fn from(detail: ClassWithEnrollments) -> Self {
        let c = detail.class;
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            instructor: c.instructor,
            status: c.status,
            created_at: c.created_at,
            enrollments: detail
                .enrollments
                .into_iter()
                .map(|(enrollment, participant)| {
                    EnrollmentResponse::with_participant(enrollment, participant)
                })
                .collect(),
        }
    }
}

pub fn validate_create_class(req: &CreateClassRequest) -> Result<(), AppError> {
    require_fields(&[
        ("name", req.name.as_deref()),
        ("instructor", req.instructor.as_deref()),
    ])?;
    if let Some(ref name) = req.name {
        validate_length(name, "name", 3, 100)?;
    }
    validate_status(req.status.as_deref())
}

pub fn validate_update_class(req: &UpdateClassRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_length(name, "name", 3, 100)?;
    }
    if let Some(ref instructor) = req.instructor
        && instructor.trim().is_empty()
    {
        return Err(AppError::Validation("instructor must not be empty".into()));
    }
    validate_status(req.status.as_deref())
}

fn validate_status(status: Option<&str>) -> Result<(), AppError> {
    if let Some(status) = status
        && status.trim().is_empty()
    {
        return Err(AppError::Validation("status must not be empty".into()));
    }
    Ok(())
}
