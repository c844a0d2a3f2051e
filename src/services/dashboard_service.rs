// src/services/dashboard_service.rs

use chrono::NaiveDate;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InstitutionRepository, ShiftRepository},
    models::{
        dashboard::{DashboardReport, FinancialSummary, Period, DEFAULT_MONTHS},
        shifts::ShiftView,
    },
    services::aggregation,
};

/// Monta o relatório a partir dos registros já unidos às instituições.
/// A série mensal usa todos os registros; o resto respeita o período.
pub fn build_report(records: &[ShiftView], period: Period, months: u32, today: NaiveDate) -> DashboardReport {
    let in_period = aggregation::filter_by_window(records, period.window_start(today));

    DashboardReport {
        period,
        summary: aggregation::summarize(&in_period),
        by_institution: aggregation::earnings_by_institution(&in_period),
        monthly: aggregation::monthly_series(records, months, today),
        status_distribution: aggregation::status_distribution(&in_period),
    }
}

#[derive(Clone)]
pub struct DashboardService {
    shift_repo: ShiftRepository,
    institution_repo: InstitutionRepository,
}

impl DashboardService {
    pub fn new(shift_repo: ShiftRepository, institution_repo: InstitutionRepository) -> Self {
        Self { shift_repo, institution_repo }
    }

    // Carrega as duas coleções e faz o join uma única vez
    async fn load_records(&self, conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<ShiftView>, AppError> {
        let shifts = self.shift_repo.list_by_user(&mut *conn, user_id).await?;
        let institutions = self.institution_repo.list_by_user(&mut *conn, user_id).await?;
        Ok(aggregation::join_institutions(shifts, &institutions))
    }

    pub async fn summary(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        period: Period,
        today: NaiveDate,
    ) -> Result<FinancialSummary, AppError> {
        let records = self.load_records(conn, user_id).await?;
        let in_period = aggregation::filter_by_window(&records, period.window_start(today));
        Ok(aggregation::summarize(&in_period))
    }

    pub async fn report(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        period: Period,
        months: Option<u32>,
        today: NaiveDate,
    ) -> Result<DashboardReport, AppError> {
        let records = self.load_records(conn, user_id).await?;
        let report = build_report(&records, period, months.unwrap_or(DEFAULT_MONTHS), today);

        tracing::debug!(
            "📊 Relatório {:?}: {} plantões no período",
            period,
            report.summary.shift_count
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};
    use rust_decimal::Decimal;
    use crate::models::shifts::{PaymentStatus, Shift};

    fn record(date: NaiveDate, amount: i64, status: PaymentStatus, institution: Option<&str>) -> ShiftView {
        ShiftView {
            shift: Shift {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                institution_id: None,
                date,
                start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                amount: Decimal::from(amount),
                payment_status: status,
                payment_method: None,
                payment_date: None,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            institution_name: institution.map(str::to_string),
            institution_color: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn report_filters_everything_but_the_monthly_series() {
        let today = date(2025, 3, 20);
        let records = vec![
            record(date(2025, 3, 2), 1000, PaymentStatus::Paid, Some("Santa Casa")),
            record(date(2025, 3, 15), 500, PaymentStatus::Pending, Some("UPA Norte")),
            record(date(2025, 1, 10), 2000, PaymentStatus::Paid, Some("Santa Casa")),
        ];

        let report = build_report(&records, Period::ThisMonth, 3, today);

        assert_eq!(report.summary.shift_count, 2);
        assert_eq!(report.summary.total_gross, Decimal::from(1500));
        assert_eq!(report.by_institution.len(), 2);
        assert_eq!(report.by_institution[0].name, "Santa Casa");
        assert_eq!(report.status_distribution.len(), 2);

        // Janeiro fica fora do período, mas aparece na série
        let labels: Vec<&str> = report.monthly.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["jan/25", "fev/25", "mar/25"]);
        assert_eq!(report.monthly[0].paid, Decimal::from(2000));
        assert_eq!(report.monthly[1].shift_count, 0);
        assert_eq!(report.monthly[2].pending, Decimal::from(500));
    }

    #[test]
    fn all_time_report_keeps_every_record() {
        let today = date(2025, 3, 20);
        let records = vec![
            record(date(2019, 6, 1), 300, PaymentStatus::Overdue, None),
            record(date(2025, 3, 1), 700, PaymentStatus::Paid, None),
        ];

        let report = build_report(&records, Period::AllTime, DEFAULT_MONTHS, today);

        assert_eq!(report.summary.shift_count, 2);
        assert_eq!(report.summary.total_outstanding, Decimal::from(300));
        assert_eq!(report.monthly.len(), 12);
        assert_eq!(report.by_institution[0].name, aggregation::NO_INSTITUTION);
    }
}
