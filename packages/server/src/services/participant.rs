use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionSession, TransactionTrait,
};
use tracing::info;

use crate::entity::{class, enrollment, participant};
use crate::error::{AppError, conflict_on_unique};
use crate::models::participant::{
    CreateParticipantRequest, UpdateParticipantRequest, validate_create_participant,
    validate_update_participant,
};
use crate::models::shared::require_fields;

const DUPLICATE_PARTICIPANT: &str = "NIM or email is already registered";

/// A participant with its enrollments, each paired with the enrolled class.
#[derive(Debug, Clone)]
pub struct ParticipantWithEnrollments {
    pub participant: participant::Model,
    pub enrollments: Vec<(enrollment::Model, Option<class::Model>)>,
}

pub struct ParticipantStore<'a, C: ConnectionTrait + TransactionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> ParticipantStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        req: CreateParticipantRequest,
    ) -> Result<participant::Model, AppError> {
        validate_create_participant(&req)?;

        let new_participant = participant::ActiveModel {
            nim: Set(trimmed(req.nim)),
            full_name: Set(trimmed(req.full_name)),
            email: Set(trimmed(req.email)),
            phone: Set(trimmed(req.phone)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = new_participant
            .insert(self.conn)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_PARTICIPANT))?;

        info!(id = model.id, nim = %model.nim, "Participant created");
        Ok(model)
    }

    /// All participants, newest first.
    pub async fn list(&self) -> Result<Vec<participant::Model>, AppError> {
        let participants = participant::Entity::find()
            .order_by_desc(participant::Column::Id)
            .all(self.conn)
            .await?;
        Ok(participants)
    }

    pub async fn get(&self, id: i32) -> Result<ParticipantWithEnrollments, AppError> {
        let participant = find_participant(self.conn, id).await?;

        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::ParticipantId.eq(id))
            .find_also_related(class::Entity)
            .order_by_asc(enrollment::Column::Id)
            .all(self.conn)
            .await?;

        Ok(ParticipantWithEnrollments {
            participant,
            enrollments,
        })
    }

    /// Merge the supplied fields over the stored record. The merged record
    /// must still carry every required field.
    pub async fn update(
        &self,
        id: i32,
        req: UpdateParticipantRequest,
    ) -> Result<participant::Model, AppError> {
        validate_update_participant(&req)?;

        if req == UpdateParticipantRequest::default() {
            return find_participant(self.conn, id).await;
        }

        let txn = self.conn.begin().await?;
        let existing = find_participant(&txn, id).await?;

        require_fields(&[
            ("nim", Some(req.nim.as_deref().unwrap_or(&existing.nim))),
            (
                "full_name",
                Some(req.full_name.as_deref().unwrap_or(&existing.full_name)),
            ),
            ("email", Some(req.email.as_deref().unwrap_or(&existing.email))),
            ("phone", Some(req.phone.as_deref().unwrap_or(&existing.phone))),
        ])?;

        let mut active: participant::ActiveModel = existing.into();
        if let Some(nim) = req.nim {
            active.nim = Set(nim.trim().to_string());
        }
        if let Some(full_name) = req.full_name {
            active.full_name = Set(full_name.trim().to_string());
        }
        if let Some(email) = req.email {
            active.email = Set(email.trim().to_string());
        }
        if let Some(phone) = req.phone {
            active.phone = Set(phone.trim().to_string());
        }

        let model = active
            .update(&txn)
            .await
            .map_err(|e| conflict_on_unique(e, DUPLICATE_PARTICIPANT))?;
        txn.commit().await?;

        Ok(model)
    }

    /// Delete a participant together with all of its enrollments.
    pub async fn remove(&self, id: i32) -> Result<(), AppError> {
        let txn = self.conn.begin().await?;
        find_participant(&txn, id).await?;

        let removed = enrollment::Entity::delete_many()
            .filter(enrollment::Column::ParticipantId.eq(id))
            .exec(&txn)
            .await?;
        participant::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(
            id,
            enrollments_removed = removed.rows_affected,
            "Participant deleted"
        );
        Ok(())
    }
}

pub(crate) async fn find_participant<D: ConnectionTrait>(
    db: &D,
    id: i32,
) -> Result<participant::Model, AppError> {
    participant::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Participant with id {id} not found")))
}

fn trimmed(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_string()
}
