// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived statistics over expense records. Nothing here touches storage.

use chrono::{Datelike, NaiveDate};
use log::warn;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Expense;
use crate::utils::{month_name, previous_month};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
    /// Category totals in order of first appearance.
    pub by_category: Vec<(String, Decimal)>,
    pub by_date: BTreeMap<String, Decimal>,
}

impl Summary {
    pub fn category_total(&self, category: &str) -> Option<Decimal> {
        self.by_category
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, amt)| *amt)
    }
}

/// `None` means there was nothing to summarize.
///
/// A record whose amount would push any running total past what `Decimal`
/// holds is left out of every figure, count included.
pub fn summarize(records: &[Expense]) -> Option<Summary> {
    let mut total = Decimal::ZERO;
    let mut count = 0usize;
    let mut by_category: Vec<(String, Decimal)> = Vec::new();
    let mut by_date: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in records {
        let cat = by_category.iter().position(|(c, _)| *c == e.category);
        let sums = (
            total.checked_add(e.amount),
            match cat {
                Some(i) => by_category[i].1.checked_add(e.amount),
                None => Some(e.amount),
            },
            by_date
                .get(&e.date)
                .copied()
                .unwrap_or(Decimal::ZERO)
                .checked_add(e.amount),
        );
        let (Some(new_total), Some(cat_sum), Some(date_sum)) = sums else {
            warn!("expense {} overflows the totals, leaving it out", e.id);
            continue;
        };
        total = new_total;
        match cat {
            Some(i) => by_category[i].1 = cat_sum,
            None => by_category.push((e.category.clone(), cat_sum)),
        }
        by_date.insert(e.date.clone(), date_sum);
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Summary {
        total,
        count,
        average: total / Decimal::from(count),
        by_category,
        by_date,
    })
}

/// Totals per calendar month name. Years are not distinguished: March 2023
/// and March 2024 land in the same bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTotals {
    by_month: BTreeMap<u32, Decimal>,
}

impl MonthlyTotals {
    pub fn get(&self, month: u32) -> Option<Decimal> {
        self.by_month.get(&month).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<Decimal> {
        self.by_month
            .iter()
            .find(|(m, _)| month_name(**m) == Some(name))
            .map(|(_, amt)| *amt)
    }

    pub fn contains(&self, month: u32) -> bool {
        self.by_month.contains_key(&month)
    }

    pub fn is_empty(&self) -> bool {
        self.by_month.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_month.len()
    }

    /// (month number, month name, total) in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &'static str, Decimal)> + '_ {
        self.by_month
            .iter()
            .filter_map(|(m, amt)| month_name(*m).map(|name| (*m, name, *amt)))
    }
}

impl Serialize for MonthlyTotals {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = s.serialize_map(Some(self.by_month.len()))?;
        for (_, name, amt) in self.iter() {
            map.serialize_entry(name, &amt)?;
        }
        map.end()
    }
}

/// Records with an unreadable date are ignored, as are records that would
/// overflow their month's total.
pub fn monthly_totals(records: &[Expense]) -> MonthlyTotals {
    let mut totals = MonthlyTotals::default();
    for e in records {
        let Some(d) = e.parsed_date() else { continue };
        let slot = totals.by_month.entry(d.month()).or_insert(Decimal::ZERO);
        match slot.checked_add(e.amount) {
            Some(sum) => *slot = sum,
            None => warn!("expense {} overflows the {} total, leaving it out", e.id, d.format("%B")),
        }
    }
    totals
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Increase,
    Decrease,
    Same,
    NoPrevData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub current_month: String,
    pub previous_month: String,
    pub current_total: Decimal,
    pub previous_total: Decimal,
    pub difference: Decimal,
    /// Absent when the previous month totals zero or the ratio is out of range.
    pub percent_change: Option<Decimal>,
    pub previous_exists: bool,
    pub status: ChangeStatus,
}

/// Compare the month containing `today` with the month before it.
pub fn compare_current_to_previous(totals: &MonthlyTotals, today: NaiveDate) -> Comparison {
    let current = today.month();
    let previous = previous_month(today).month();

    let current_total = totals.get(current).unwrap_or(Decimal::ZERO);
    let previous_total = totals.get(previous).unwrap_or(Decimal::ZERO);
    let previous_exists = totals.contains(previous);

    // Saturates only with hand-edited negative amounts.
    let exact = current_total.checked_sub(previous_total);
    let difference = exact.unwrap_or(if current_total > previous_total {
        Decimal::MAX
    } else {
        Decimal::MIN
    });
    let percent_change = if previous_total.is_zero() {
        None
    } else {
        exact
            .and_then(|d| d.checked_div(previous_total))
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
    };

    let status = if !previous_exists && previous_total.is_zero() {
        ChangeStatus::NoPrevData
    } else if difference > Decimal::ZERO {
        ChangeStatus::Increase
    } else if difference < Decimal::ZERO {
        ChangeStatus::Decrease
    } else {
        ChangeStatus::Same
    };

    Comparison {
        current_month: month_name(current).unwrap_or_default().to_string(),
        previous_month: month_name(previous).unwrap_or_default().to_string(),
        current_total,
        previous_total,
        difference,
        percent_change,
        previous_exists,
        status,
    }
}
