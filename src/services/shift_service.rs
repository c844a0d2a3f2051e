// src/services/shift_service.rs

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InstitutionRepository, ShiftRepository},
    models::shifts::{NewShift, RepeatRule, Shift, ShiftFilter, ShiftPayload, ShiftView},
    services::{aggregation, recurrence},
};

/// Filtro da listagem: status exato e busca sem diferenciar maiúsculas
/// no nome da instituição ou nas observações.
pub fn matches_filter(view: &ShiftView, filter: &ShiftFilter) -> bool {
    if let Some(status) = filter.status {
        if view.shift.payment_status != status {
            return false;
        }
    }

    match filter.search.as_deref().map(str::trim) {
        Some(term) if !term.is_empty() => {
            let term = term.to_lowercase();
            let in_name = view
                .institution_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&term));
            let in_notes = view
                .shift
                .notes
                .as_deref()
                .is_some_and(|notes| notes.to_lowercase().contains(&term));
            in_name || in_notes
        }
        _ => true,
    }
}

#[derive(Clone)]
pub struct ShiftService {
    repo: ShiftRepository,
    institution_repo: InstitutionRepository,
}

impl ShiftService {
    pub fn new(repo: ShiftRepository, institution_repo: InstitutionRepository) -> Self {
        Self { repo, institution_repo }
    }

    pub async fn list(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        filter: &ShiftFilter,
    ) -> Result<Vec<ShiftView>, AppError> {
        let shifts = self.repo.list_by_user(&mut *conn, user_id).await?;
        let institutions = self.institution_repo.list_by_user(&mut *conn, user_id).await?;

        Ok(aggregation::join_institutions(shifts, &institutions)
            .into_iter()
            .filter(|view| matches_filter(view, filter))
            .collect())
    }

    /// Cria um plantão ou a série inteira de repetições (tudo ou nada,
    /// dentro da transação do chamador).
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        payload: &ShiftPayload,
    ) -> Result<Vec<Shift>, AppError> {
        let template = payload.to_new_shift()?;
        self.ensure_institution(conn, user_id, template.institution_id).await?;

        let batch = match &payload.repeat {
            Some(repeat) => recurrence::expand(&template, repeat.rule, repeat.count),
            None => recurrence::expand(&template, RepeatRule::None, 1),
        };

        let created = self.repo.insert_many(conn, user_id, &batch).await?;
        tracing::info!("🩺 {} plantão(ões) registrado(s) para o usuário {}", created.len(), user_id);
        Ok(created)
    }

    pub async fn update(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        id: Uuid,
        payload: &ShiftPayload,
    ) -> Result<Shift, AppError> {
        let shift = payload.to_new_shift()?;
        self.ensure_institution(conn, user_id, shift.institution_id).await?;

        self.repo.update(&mut *conn, user_id, id, &shift).await
    }

    pub async fn delete(&self, conn: &mut PgConnection, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(&mut *conn, user_id, id).await
    }

    // Cópia com os mesmos dados (inclusive data e status)
    pub async fn duplicate(&self, conn: &mut PgConnection, user_id: Uuid, id: Uuid) -> Result<Shift, AppError> {
        let original = self
            .repo
            .find_by_id(&mut *conn, user_id, id)
            .await?
            .ok_or(AppError::ShiftNotFound)?;

        let copy = NewShift::from(&original);
        self.repo
            .insert_many(conn, user_id, std::slice::from_ref(&copy))
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("Inserção não retornou o plantão")))
    }

    // Só aceita instituições do próprio usuário
    async fn ensure_institution(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        institution_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(id) = institution_id {
            self.institution_repo
                .find_by_id(&mut *conn, user_id, id)
                .await?
                .ok_or(AppError::InstitutionNotFound)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal::Decimal;
    use crate::models::shifts::PaymentStatus;

    fn view(status: PaymentStatus, institution: Option<&str>, notes: Option<&str>) -> ShiftView {
        ShiftView {
            shift: Shift {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                institution_id: None,
                date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                amount: Decimal::from(1500),
                payment_status: status,
                payment_method: None,
                payment_date: None,
                notes: notes.map(str::to_string),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            institution_name: institution.map(str::to_string),
            institution_color: None,
        }
    }

    fn filter(status: Option<PaymentStatus>, search: Option<&str>) -> ShiftFilter {
        ShiftFilter {
            status,
            search: search.map(str::to_string),
        }
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let v = view(PaymentStatus::Paid, None, None);
        assert!(matches_filter(&v, &ShiftFilter::default()));
        assert!(matches_filter(&v, &filter(None, Some("   "))));
    }

    #[test]
    fn status_must_match_exactly() {
        let v = view(PaymentStatus::Overdue, Some("Santa Casa"), None);
        assert!(matches_filter(&v, &filter(Some(PaymentStatus::Overdue), None)));
        assert!(!matches_filter(&v, &filter(Some(PaymentStatus::Paid), None)));
    }

    #[test]
    fn search_looks_at_institution_and_notes_ignoring_case() {
        let v = view(PaymentStatus::Pending, Some("Hospital Santa Casa"), Some("Cobertura UTI"));
        assert!(matches_filter(&v, &filter(None, Some("santa"))));
        assert!(matches_filter(&v, &filter(None, Some("uti"))));
        assert!(!matches_filter(&v, &filter(None, Some("pronto-socorro"))));

        let orphan = view(PaymentStatus::Pending, None, None);
        assert!(!matches_filter(&orphan, &filter(None, Some("santa"))));
    }

    #[test]
    fn status_and_search_combine() {
        let v = view(PaymentStatus::Pending, Some("Hospital Santa Casa"), None);
        assert!(!matches_filter(&v, &filter(Some(PaymentStatus::Paid), Some("santa"))));
    }
}
