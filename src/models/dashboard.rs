// src/models/dashboard.rs

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::shifts::PaymentStatus;

// Seletor de período da carteira
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    ThisMonth,
    #[serde(rename = "last_3_months")]
    Last3Months,
    #[serde(rename = "last_6_months")]
    Last6Months,
    ThisYear,
    AllTime,
}

impl Period {
    /// Primeiro dia incluído no período. `None` = sem limite inferior.
    pub fn window_start(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::ThisMonth => today.with_day(1),
            Period::Last3Months => today.checked_sub_months(Months::new(3)),
            Period::Last6Months => today.checked_sub_months(Months::new(6)),
            Period::ThisYear => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            Period::AllTime => None,
        }
    }
}

// 1. Os cards do topo
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    #[schema(example = "5600.00")]
    pub total_gross: Decimal,
    #[schema(example = "2400.00")]
    pub total_paid: Decimal,
    #[schema(example = "3200.00")]
    pub total_outstanding: Decimal,
    #[schema(example = 2)]
    pub shift_count: usize,
    #[schema(example = "24")]
    pub worked_hours: Decimal,
    #[schema(example = "2800.00")]
    pub average_per_shift: Decimal,
    #[schema(example = "233.33")]
    pub average_per_hour: Decimal,
}

// 2. Ganhos por instituição (ranking)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionEarnings {
    #[schema(example = "Hospital Santa Casa")]
    pub name: String,
    #[schema(example = "#3B82F6")]
    pub color: Option<String>,
    #[schema(example = "4800.00")]
    pub total: Decimal,
    #[schema(example = 3)]
    pub shift_count: usize,
}

// 3. Série mensal (gráfico de barras pago x pendente)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEntry {
    #[schema(example = "jan/25")]
    pub label: String,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 1)]
    pub month: u32,
    pub paid: Decimal,
    pub pending: Decimal,
    pub total: Decimal,
    pub shift_count: usize,
}

// 4. Distribuição por status de pagamento
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusTotal {
    pub status: PaymentStatus,
    pub total: Decimal,
    pub shift_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub period: Period,
    pub summary: FinancialSummary,
    pub by_institution: Vec<InstitutionEarnings>,
    pub monthly: Vec<MonthlyEntry>,
    pub status_distribution: Vec<StatusTotal>,
}

pub const DEFAULT_MONTHS: u32 = 12;

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// this_month, last_3_months, last_6_months, this_year ou all_time
    #[serde(default)]
    pub period: Period,
    /// Quantidade de meses da série mensal (padrão 12)
    #[validate(range(min = 1, max = 60, message = "invalid_months"))]
    pub months: Option<u32>,
}
