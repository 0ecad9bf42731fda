use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::{info, warn};

use crate::entity::{class, enrollment, participant};
use crate::error::AppError;
use crate::models::enrollment::{CreateEnrollmentRequest, DEFAULT_ENROLLMENT_STATUS};

const ALREADY_ENROLLED: &str = "Participant already enrolled in this class";

/// A freshly created enrollment with both sides resolved.
#[derive(Debug, Clone)]
pub struct EnrollmentDetail {
    pub enrollment: enrollment::Model,
    pub participant: participant::Model,
    pub class: class::Model,
}

/// Coordinates the participant/class join relation.
pub struct EnrollmentCoordinator<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> EnrollmentCoordinator<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Enroll a participant in a class.
    ///
    /// Checks run in a fixed order and the first failure wins: participant
    /// existence, class existence, then the duplicate pair. The lookups run
    /// outside a transaction and the single insert is the only write: the
    /// composite unique key on `(participant_id, class_id)` is the actual
    /// guard, so a concurrent insert that slips past the pre-check still
    /// ends in `Conflict`, and a parent deleted in between ends in
    /// `NotFound`.
    pub async fn enroll(&self, req: CreateEnrollmentRequest) -> Result<EnrollmentDetail, AppError> {
        let participant = participant::Entity::find_by_id(req.participant_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Participant not found".into()))?;

        let class = class::Entity::find_by_id(req.class_id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Class not found".into()))?;

        let existing = enrollment::Entity::find()
            .filter(enrollment::Column::ParticipantId.eq(participant.id))
            .filter(enrollment::Column::ClassId.eq(class.id))
            .one(self.conn)
            .await?;
        if let Some(existing) = existing {
            warn!(
                enrollment_id = existing.id,
                participant_id = participant.id,
                class_id = class.id,
                "Duplicate enrollment rejected"
            );
            return Err(AppError::Conflict(ALREADY_ENROLLED.into()));
        }

        let new_enrollment = enrollment::ActiveModel {
            participant_id: Set(participant.id),
            class_id: Set(class.id),
            status: Set(DEFAULT_ENROLLMENT_STATUS.to_string()),
            enrolled_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = match new_enrollment.insert(self.conn).await {
            Ok(model) => model,
            Err(e) => {
                return Err(match e.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        AppError::Conflict(ALREADY_ENROLLED.into())
                    }
                    Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                        AppError::NotFound("Participant or class not found".into())
                    }
                    _ => e.into(),
                });
            }
        };

        info!(
            id = model.id,
            participant_id = model.participant_id,
            class_id = model.class_id,
            "Participant enrolled"
        );
        Ok(EnrollmentDetail {
            enrollment: model,
            participant,
            class,
        })
    }

    pub async fn remove(&self, id: i32) -> Result<(), AppError> {
        let existing = enrollment::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound("Enrollment not found".into()))?;

        enrollment::Entity::delete_by_id(existing.id)
            .exec(self.conn)
            .await?;
        info!(id, "Enrollment deleted");
        Ok(())
    }

    /// Enrollments of a participant with their classes. An unknown
    /// participant simply has none.
    pub async fn list_classes_for_participant(
        &self,
        participant_id: i32,
    ) -> Result<Vec<(enrollment::Model, Option<class::Model>)>, AppError> {
        let rows = enrollment::Entity::find()
            .filter(enrollment::Column::ParticipantId.eq(participant_id))
            .find_also_related(class::Entity)
            .order_by_asc(enrollment::Column::Id)
            .all(self.conn)
            .await?;
        Ok(rows)
    }

    /// Enrollments of a class with their participants.
    pub async fn list_participants_for_class(
        &self,
        class_id: i32,
    ) -> Result<Vec<(enrollment::Model, Option<participant::Model>)>, AppError> {
        let rows = enrollment::Entity::find()
            .filter(enrollment::Column::ClassId.eq(class_id))
            .find_also_related(participant::Entity)
            .order_by_asc(enrollment::Column::Id)
            .all(self.conn)
            .await?;
        Ok(rows)
    }
}
