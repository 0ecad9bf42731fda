use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionSession, TransactionTrait,
};
use tracing::info;

use crate::entity::{class, enrollment, participant};
use crate::error::AppError;
use crate::models::class::{
    CreateClassRequest, DEFAULT_CLASS_STATUS, UpdateClassRequest, validate_create_class,
    validate_update_class,
};

/// A class with its enrollments, each paired with the enrolled participant.
#[derive(Debug, Clone)]
pub struct ClassWithEnrollments {
    pub class: class::Model,
    pub enrollments: Vec<(enrollment::Model, Option<participant::Model>)>,
}

pub struct ClassStore<'a, C: ConnectionTrait + TransactionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait + TransactionTrait> ClassStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn create(&self, req: CreateClassRequest) -> Result<class::Model, AppError> {
        validate_create_class(&req)?;

        let new_class = class::ActiveModel {
            name: Set(req.name.unwrap_or_default().trim().to_string()),
            description: Set(req.description),
            instructor: Set(req.instructor.unwrap_or_default().trim().to_string()),
            status: Set(req
                .status
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_CLASS_STATUS.to_string())),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = new_class.insert(self.conn).await?;
        info!(id = model.id, name = %model.name, "Class created");
        Ok(model)
    }

    /// All classes, newest first.
    pub async fn list(&self) -> Result<Vec<class::Model>, AppError> {
        let classes = class::Entity::find()
            .order_by_desc(class::Column::Id)
            .all(self.conn)
            .await?;
        Ok(classes)
    }

    pub async fn get(&self, id: i32) -> Result<ClassWithEnrollments, AppError> {
        let class = find_class(self.conn, id).await?;

        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::ClassId.eq(id))
            .find_also_related(participant::Entity)
            .order_by_asc(enrollment::Column::Id)
            .all(self.conn)
            .await?;

        Ok(ClassWithEnrollments { class, enrollments })
    }

    /// Apply the supplied fields; omitted fields keep their stored values.
    pub async fn update(&self, id: i32, req: UpdateClassRequest) -> Result<class::Model, AppError> {
        validate_update_class(&req)?;

        if req == UpdateClassRequest::default() {
            return find_class(self.conn, id).await;
        }

        let txn = self.conn.begin().await?;
        let existing = find_class(&txn, id).await?;

        let mut active: class::ActiveModel = existing.into();
        if let Some(name) = req.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = req.description {
            active.description = Set(description);
        }
        if let Some(instructor) = req.instructor {
            active.instructor = Set(instructor.trim().to_string());
        }
        if let Some(status) = req.status {
            active.status = Set(status.trim().to_string());
        }

        let model = active.update(&txn).await?;
        txn.commit().await?;

        Ok(model)
    }

    /// Delete a class together with all of its enrollments.
    pub async fn remove(&self, id: i32) -> Result<(), AppError> {
        let txn = self.conn.begin().await?;
        find_class(&txn, id).await?;

        let removed = enrollment::Entity::delete_many()
            .filter(enrollment::Column::ClassId.eq(id))
            .exec(&txn)
            .await?;
        class::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        info!(
            id,
            enrollments_removed = removed.rows_affected,
            "Class deleted"
        );
        Ok(())
    }
}

pub(crate) async fn find_class<D: ConnectionTrait>(db: &D, id: i32) -> Result<class::Model, AppError> {
    class::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Class with id {id} not found")))
}
