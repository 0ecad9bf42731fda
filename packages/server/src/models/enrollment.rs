use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::class::ClassResponse;
use super::participant::ParticipantResponse;
use crate::entity::{class, enrollment, participant};

pub const DEFAULT_ENROLLMENT_STATUS: &str = "registered";

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateEnrollmentRequest {
    #[schema(example = 1)]
    pub participant_id: i32,
    #[schema(example = 1)]
    pub class_id: i32,
}

/// An enrollment row. Depending on the endpoint, the participant, the class,
/// or both are resolved; unresolved sides are omitted from the JSON.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EnrollmentResponse {
    pub id: i32,
    pub participant_id: i32,
    pub class_id: i32,
    #[schema(example = "registered")]
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassResponse>,
}

impl EnrollmentResponse {
    fn bare(m: enrollment::Model) -> Self {
        Self {
            id: m.id,
            participant_id: m.participant_id,
            class_id: m.class_id,
            status: m.status,
            enrolled_at: m.enrolled_at,
            participant: None,
            class: None,
        }
    }

    pub fn with_class(m: enrollment::Model, class: Option<class::Model>) -> Self {
        Self {
            class: class.map(Into::into),
            ..Self::bare(m)
        }
    }

    pub fn with_participant(m: enrollment::Model, participant: Option<participant::Model>) -> Self {
        Self {
            participant: participant.map(Into::into),
            ..Self::bare(m)
        }
    }

    pub fn with_both(m: enrollment::Model, participant: participant::Model, class: class::Model) -> Self {
        Self {
            participant: Some(participant.into()),
            class: Some(class.into()),
            ..Self::bare(m)
        }
    }
}
