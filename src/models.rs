// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use csv::ByteRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::HEADER;
use crate::utils::{fmt_amount, parse_decimal, parse_iso_date};

pub const SUGGESTED_CATEGORIES: [&str; 10] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Travel",
    "Groceries",
    "Other",
];

/// One row of a ledger file exactly as stored. Values stay textual so rows
/// edited by hand survive a rewrite untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRow {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Expense_Type")]
    pub category: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Date")]
    pub date: String,
}

impl ExpenseRow {
    /// A record with exactly the ledger's five UTF-8 fields.
    pub fn from_record(rec: &ByteRecord) -> Option<Self> {
        if rec.len() != HEADER.len() {
            return None;
        }
        let field = |i: usize| std::str::from_utf8(rec.get(i)?).ok().map(str::to_string);
        Some(ExpenseRow {
            id: field(0)?,
            description: field(1)?,
            category: field(2)?,
            amount: field(3)?,
            date: field(4)?,
        })
    }

    /// Best-effort read of any record, by position.
    pub fn from_record_lossy(rec: &ByteRecord) -> Self {
        let field = |i: usize| {
            rec.get(i)
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default()
        };
        ExpenseRow {
            id: field(0),
            description: field(1),
            category: field(2),
            amount: field(3),
            date: field(4),
        }
    }

    pub fn to_record(&self) -> ByteRecord {
        ByteRecord::from(vec![
            self.id.as_str(),
            self.description.as_str(),
            self.category.as_str(),
            self.amount.as_str(),
            self.date.as_str(),
        ])
    }

    pub fn parsed_id(&self) -> Option<i64> {
        self.id.trim().parse().ok()
    }

    /// Key used to drop duplicates while merging legacy files.
    pub fn dedup_key(&self) -> (String, String, String, String) {
        let amount = match parse_decimal(&self.amount) {
            Some(d) => fmt_amount(&d),
            None => self.amount.trim().to_string(),
        };
        (
            self.description.trim().to_string(),
            self.category.trim().to_string(),
            amount,
            self.date.trim().to_string(),
        )
    }
}

/// A ledger record with a usable id and amount. The date is kept as written;
/// use [`Expense::parsed_date`] before relying on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub date: String,
}

impl Expense {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_iso_date(&self.date)
    }

    pub fn in_period(&self, year: i32, month: u32) -> bool {
        self.parsed_date()
            .map(|d| d.year() == year && d.month() == month)
            .unwrap_or(false)
    }

    pub fn to_row(&self) -> ExpenseRow {
        ExpenseRow {
            id: self.id.to_string(),
            description: self.description.clone(),
            category: self.category.clone(),
            amount: fmt_amount(&self.amount),
            date: self.date.clone(),
        }
    }
}

impl TryFrom<&ExpenseRow> for Expense {
    type Error = String;

    fn try_from(row: &ExpenseRow) -> Result<Self, Self::Error> {
        let id = row
            .parsed_id()
            .ok_or_else(|| format!("bad id '{}'", row.id))?;
        let amount =
            parse_decimal(&row.amount).ok_or_else(|| format!("bad amount '{}'", row.amount))?;
        Ok(Expense {
            id,
            description: row.description.clone(),
            category: row.category.clone(),
            amount,
            date: row.date.trim().to_string(),
        })
    }
}

/// Raw user input for a new expense; validated by the store.
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

/// Field changes for an existing expense. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}
