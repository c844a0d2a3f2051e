// src/services/aggregation.rs
//
// Motor de agregação da carteira. Funções puras: recebem os plantões já
// carregados e devolvem os números do dashboard. Nada aqui falha; divisões
// por zero viram zero.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::models::{
    dashboard::{FinancialSummary, InstitutionEarnings, MonthlyEntry, StatusTotal},
    institutions::Institution,
    shifts::{PaymentStatus, Shift, ShiftView},
};

pub const NO_INSTITUTION: &str = "Sem instituição";

const MONTH_ABBR_PT: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Junta cada plantão com a instituição (nome e cor). Executado uma única
/// vez, depois que as duas coleções foram carregadas.
pub fn join_institutions(shifts: Vec<Shift>, institutions: &[Institution]) -> Vec<ShiftView> {
    let by_id: HashMap<Uuid, &Institution> = institutions.iter().map(|i| (i.id, i)).collect();

    shifts
        .into_iter()
        .map(|shift| {
            let institution = shift.institution_id.and_then(|id| by_id.get(&id));
            ShiftView {
                institution_name: institution.map(|i| i.name.clone()),
                institution_color: institution.map(|i| i.color.clone()),
                shift,
            }
        })
        .collect()
}

/// Mantém os plantões com `date >= window_start` (limite incluso).
pub fn filter_by_window(records: &[ShiftView], window_start: Option<NaiveDate>) -> Vec<ShiftView> {
    match window_start {
        Some(start) => records
            .iter()
            .filter(|r| r.shift.date >= start)
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}

pub fn total_gross(records: &[ShiftView]) -> Decimal {
    records.iter().map(|r| r.shift.amount).sum()
}

pub fn total_paid(records: &[ShiftView]) -> Decimal {
    records
        .iter()
        .filter(|r| r.shift.payment_status == PaymentStatus::Paid)
        .map(|r| r.shift.amount)
        .sum()
}

// Calculado pela diferença para garantir gross == paid + outstanding
pub fn total_outstanding(records: &[ShiftView]) -> Decimal {
    total_gross(records) - total_paid(records)
}

/// Duração em horas decimais. Fim "antes" do início = virou a meia-noite.
pub fn shift_hours(start: NaiveTime, end: NaiveTime) -> Decimal {
    let mut dh = i64::from(end.hour()) - i64::from(start.hour());
    let mut dm = i64::from(end.minute()) - i64::from(start.minute());

    if dm < 0 {
        dm += 60;
        dh -= 1;
    }
    if dh < 0 {
        dh += 24;
    }

    Decimal::from(dh) + Decimal::from(dm) / Decimal::from(60)
}

pub fn worked_hours(records: &[ShiftView]) -> Decimal {
    records
        .iter()
        .map(|r| shift_hours(r.shift.start_time, r.shift.end_time))
        .sum()
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn average_per_shift(records: &[ShiftView]) -> Decimal {
    if records.is_empty() {
        return Decimal::ZERO;
    }
    round_money(total_gross(records) / Decimal::from(records.len()))
}

pub fn average_per_hour(records: &[ShiftView]) -> Decimal {
    let hours = worked_hours(records);
    if hours.is_zero() {
        return Decimal::ZERO;
    }
    round_money(total_gross(records) / hours)
}

pub fn summarize(records: &[ShiftView]) -> FinancialSummary {
    let total_gross = total_gross(records);
    let total_paid = total_paid(records);

    FinancialSummary {
        total_gross,
        total_paid,
        total_outstanding: total_gross - total_paid,
        shift_count: records.len(),
        // Arredondado só na saída; a média por hora usa o valor exato
        worked_hours: round_money(worked_hours(records)),
        average_per_shift: average_per_shift(records),
        average_per_hour: average_per_hour(records),
    }
}

/// Ranking por instituição, do maior total para o menor.
/// Empates mantêm a ordem em que a instituição apareceu primeiro.
pub fn earnings_by_institution(records: &[ShiftView]) -> Vec<InstitutionEarnings> {
    let mut groups: Vec<InstitutionEarnings> = Vec::new();

    for record in records {
        let name = record
            .institution_name
            .as_deref()
            .unwrap_or(NO_INSTITUTION);

        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => {
                group.total += record.shift.amount;
                group.shift_count += 1;
            }
            None => groups.push(InstitutionEarnings {
                name: name.to_string(),
                color: record.institution_color.clone(),
                total: record.shift.amount,
                shift_count: 1,
            }),
        }
    }

    // sort_by é estável
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

/// Os últimos `month_count` meses até o mês de `today` (incluso), do mais
/// antigo para o mais recente. Meses sem plantão aparecem zerados.
pub fn monthly_series(records: &[ShiftView], month_count: u32, today: NaiveDate) -> Vec<MonthlyEntry> {
    let current = i64::from(today.year()) * 12 + i64::from(today.month0());

    (0..i64::from(month_count))
        .rev()
        .map(|offset| {
            let index = current - offset;
            let year = index.div_euclid(12) as i32;
            let month = index.rem_euclid(12) as u32 + 1;

            let mut entry = MonthlyEntry {
                label: format!(
                    "{}/{:02}",
                    MONTH_ABBR_PT[(month - 1) as usize],
                    year.rem_euclid(100)
                ),
                year,
                month,
                paid: Decimal::ZERO,
                pending: Decimal::ZERO,
                total: Decimal::ZERO,
                shift_count: 0,
            };

            for record in records
                .iter()
                .filter(|r| r.shift.date.year() == year && r.shift.date.month() == month)
            {
                if record.shift.payment_status == PaymentStatus::Paid {
                    entry.paid += record.shift.amount;
                } else {
                    entry.pending += record.shift.amount;
                }
                entry.shift_count += 1;
            }
            entry.total = entry.paid + entry.pending;
            entry
        })
        .collect()
}

/// Soma por status de pagamento, na ordem em que cada status aparece.
pub fn status_distribution(records: &[ShiftView]) -> Vec<StatusTotal> {
    let mut totals: Vec<StatusTotal> = Vec::new();

    for record in records {
        let status = record.shift.payment_status;
        match totals.iter_mut().find(|t| t.status == status) {
            Some(total) => {
                total.total += record.shift.amount;
                total.shift_count += 1;
            }
            None => totals.push(StatusTotal {
                status,
                total: record.shift.amount,
                shift_count: 1,
            }),
        }
    }

    totals
}
