// src/db/shift_repo.rs

use sqlx::{Executor, PgConnection, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::shifts::{NewShift, Shift},
};

// Sem pool próprio: as consultas rodam na transação com RLS aberta pelo handler
#[derive(Clone, Default)]
pub struct ShiftRepository;

impl ShiftRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_by_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<Shift>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT * FROM shifts
            WHERE user_id = $1
            ORDER BY date DESC, start_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(shifts)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Shift>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let shift = sqlx::query_as::<_, Shift>(
            "SELECT * FROM shifts WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(shift)
    }

    // Inserção em lote (repetição de plantões). Roda dentro da transação
    // do chamador: ou entram todos, ou nenhum.
    pub async fn insert_many(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        shifts: &[NewShift],
    ) -> Result<Vec<Shift>, AppError> {
        let mut inserted = Vec::with_capacity(shifts.len());

        for shift in shifts {
            let row = sqlx::query_as::<_, Shift>(
                r#"
                INSERT INTO shifts (
                    user_id, institution_id, date, start_time, end_time,
                    amount, payment_status, payment_method, payment_date, notes
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
                "#,
            )
            .bind(user_id)
            .bind(shift.institution_id)
            .bind(shift.date)
            .bind(shift.start_time)
            .bind(shift.end_time)
            .bind(shift.amount)
            .bind(shift.payment_status)
            .bind(shift.payment_method)
            .bind(shift.payment_date)
            .bind(shift.notes.as_deref())
            .fetch_one(&mut *conn)
            .await?;

            inserted.push(row);
        }

        Ok(inserted)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        shift: &NewShift,
    ) -> Result<Shift, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Shift>(
            r#"
            UPDATE shifts SET
                institution_id = $3,
                date = $4,
                start_time = $5,
                end_time = $6,
                amount = $7,
                payment_status = $8,
                payment_method = $9,
                payment_date = $10,
                notes = $11,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(shift.institution_id)
        .bind(shift.date)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .bind(shift.amount)
        .bind(shift.payment_status)
        .bind(shift.payment_method)
        .bind(shift.payment_date)
        .bind(shift.notes.as_deref())
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ShiftNotFound)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM shifts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(executor)
            .await?;

        // Nenhuma linha: não existe ou pertence a outro usuário
        if result.rows_affected() == 0 {
            return Err(AppError::ShiftNotFound);
        }

        Ok(())
    }
}
