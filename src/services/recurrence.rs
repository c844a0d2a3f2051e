// src/services/recurrence.rs
//
// Datas dos plantões repetidos. Todos os plantões gerados compartilham
// horário, valor, status e instituição; só a data muda.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::shifts::{NewShift, RepeatRule};

// Avança dia a dia até cair no dia da semana pedido (inclui o próprio dia)
fn next_on_or_after(mut date: NaiveDate, weekday: Weekday) -> NaiveDate {
    while date.weekday() != weekday {
        date = date + Duration::days(1);
    }
    date
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

impl RepeatRule {
    fn fixed_weekday(self) -> Option<Weekday> {
        match self {
            RepeatRule::Monday => Some(Weekday::Mon),
            RepeatRule::Tuesday => Some(Weekday::Tue),
            RepeatRule::Wednesday => Some(Weekday::Wed),
            RepeatRule::Thursday => Some(Weekday::Thu),
            RepeatRule::Friday => Some(Weekday::Fri),
            RepeatRule::Saturday => Some(Weekday::Sat),
            RepeatRule::Sunday => Some(Weekday::Sun),
            RepeatRule::None | RepeatRule::Weekends | RepeatRule::Weekdays => None,
        }
    }
}

/// Gera `count` datas a partir de `start` segundo a regra.
/// `RepeatRule::None` devolve só a data inicial.
pub fn generate_dates(start: NaiveDate, rule: RepeatRule, count: u32) -> Vec<NaiveDate> {
    if rule == RepeatRule::None {
        return vec![start];
    }

    (0..i64::from(count))
        .map(|i| match rule {
            RepeatRule::Weekends => {
                // i par = sábado, i ímpar = domingo da mesma semana-base
                let base = start + Duration::weeks(i / 2);
                let target = if i % 2 == 0 { Weekday::Sat } else { Weekday::Sun };
                next_on_or_after(base, target)
            }
            RepeatRule::Weekdays => {
                let mut date = start;
                let mut found = 0;
                while found < i {
                    date = date + Duration::days(1);
                    if is_weekday(date) {
                        found += 1;
                    }
                }
                date
            }
            _ => {
                let base = start + Duration::weeks(i);
                match rule.fixed_weekday() {
                    Some(weekday) => next_on_or_after(base, weekday),
                    None => base,
                }
            }
        })
        .collect()
}

/// Replica o modelo para cada data gerada.
pub fn expand(template: &NewShift, rule: RepeatRule, count: u32) -> Vec<NewShift> {
    generate_dates(template.date, rule, count)
        .into_iter()
        .map(|date| NewShift {
            date,
            ..template.clone()
        })
        .collect()
}
