// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Expense, ExpensePatch, NewExpense};
use crate::store::LedgerStore;
use crate::utils::{fmt_amount, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;

pub fn add(store: &LedgerStore, sub: &clap::ArgMatches, today: NaiveDate) -> Result<Expense> {
    let input = NewExpense {
        description: arg(sub, "description"),
        amount: arg(sub, "amount"),
        category: arg(sub, "category"),
        date: sub
            .get_one::<String>("date")
            .cloned()
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
    };
    let expense = store.save(&input)?;
    println!(
        "Expense added successfully (id {}: {} {} on {})",
        expense.id,
        fmt_amount(&expense.amount),
        expense.category,
        expense.date
    );
    Ok(expense)
}

pub fn list(store: &LedgerStore, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub, today)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.clone(),
                    e.description.clone(),
                    e.category.clone(),
                    fmt_amount(&e.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Description", "Category", "Amount"], rows)
        );
    }
    Ok(())
}

/// Records selected by `list`'s period flags, in ledger order.
pub fn query_rows(
    store: &LedgerStore,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<Expense>> {
    if let Some(month) = sub.get_one::<String>("month") {
        let (y, m) = parse_month(month)?;
        return Ok(store.load_for_period(y, m)?);
    }
    if sub.get_flag("current") {
        return Ok(store.load_current_period(today)?);
    }
    Ok(store.load_all()?)
}

pub fn remove(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    store.delete(id)?;
    println!("Expense ID {} deleted successfully", id);
    Ok(())
}

pub fn edit(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = ExpensePatch {
        description: sub.get_one::<String>("description").cloned(),
        amount: sub.get_one::<String>("amount").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        date: sub.get_one::<String>("date").cloned(),
    };
    store.update(id, &patch)?;
    println!("Expense updated successfully");
    Ok(())
}

fn arg(sub: &clap::ArgMatches, name: &str) -> String {
    sub.get_one::<String>(name).cloned().unwrap_or_default()
}
