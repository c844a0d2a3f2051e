// src/db/institution_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::institutions::{Institution, InstitutionPayload},
};

#[derive(Clone, Default)]
pub struct InstitutionRepository;

impl InstitutionRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_by_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<Institution>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let institutions = sqlx::query_as::<_, Institution>(
            "SELECT * FROM institutions WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(institutions)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Institution>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let institution = sqlx::query_as::<_, Institution>(
            "SELECT * FROM institutions WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(institution)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        input: &InstitutionPayload,
    ) -> Result<Institution, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let institution = sqlx::query_as::<_, Institution>(
            r#"
            INSERT INTO institutions (user_id, name, address, phone, email, notes, color)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(input.name.trim())
        .bind(input.address.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .bind(input.notes.as_deref())
        .bind(input.color_or_default())
        .fetch_one(executor)
        .await?;

        Ok(institution)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        input: &InstitutionPayload,
    ) -> Result<Institution, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Institution>(
            r#"
            UPDATE institutions SET
                name = $3,
                address = $4,
                phone = $5,
                email = $6,
                notes = $7,
                color = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(input.name.trim())
        .bind(input.address.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .bind(input.notes.as_deref())
        .bind(input.color_or_default())
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::InstitutionNotFound)
    }

    // Os plantões ligados continuam com o institution_id antigo
    pub async fn delete<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM institutions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::InstitutionNotFound);
        }

        Ok(())
    }
}
