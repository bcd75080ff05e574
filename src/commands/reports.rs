// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::summary::{self, ChangeStatus, Comparison, Summary};
use crate::utils::{fmt_amount, fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// Summary for the period picked by `--month`/`--all`, current month otherwise.
pub fn query_summary(
    store: &LedgerStore,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Option<Summary>> {
    let records = if sub.get_flag("all") {
        store.load_all()?
    } else if let Some(month) = sub.get_one::<String>("month") {
        let (y, m) = parse_month(month)?;
        store.load_for_period(y, m)?
    } else {
        store.load_current_period(today)?
    };
    Ok(summary::summarize(&records))
}

pub fn summary(store: &LedgerStore, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let Some(s) = query_summary(store, sub, today)? else {
        println!("No expenses for this period");
        return Ok(());
    };
    if maybe_print_json(json_flag, jsonl_flag, &s)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Total", "Count", "Average"],
            vec![vec![
                fmt_money(&s.total),
                s.count.to_string(),
                fmt_money(&s.average),
            ]],
        )
    );
    let cats = s
        .by_category
        .iter()
        .map(|(c, amt)| vec![c.clone(), fmt_amount(amt), share(*amt, s.total)])
        .collect();
    println!("{}", pretty_table(&["Category", "Amount", "Share"], cats));
    let days = s
        .by_date
        .iter()
        .map(|(d, amt)| vec![d.clone(), fmt_amount(amt)])
        .collect();
    println!("{}", pretty_table(&["Date", "Amount"], days));
    Ok(())
}

pub fn monthly(store: &LedgerStore, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let totals = summary::monthly_totals(&store.load_all()?);
    if maybe_print_json(json_flag, jsonl_flag, &totals)? {
        return Ok(());
    }
    if totals.is_empty() {
        println!("No data available yet");
        return Ok(());
    }
    let rows = totals
        .iter()
        .map(|(m, name, amt)| {
            let marker = if m == today.month() { "*" } else { "" };
            vec![format!("{}{}", name, marker), fmt_amount(&amt)]
        })
        .collect();
    println!("{}", pretty_table(&["Month", "Total"], rows));
    Ok(())
}

pub fn query_comparison(store: &LedgerStore, today: NaiveDate) -> Result<Comparison> {
    let totals = summary::monthly_totals(&store.load_all()?);
    Ok(summary::compare_current_to_previous(&totals, today))
}

pub fn compare(store: &LedgerStore, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let c = query_comparison(store, today)?;
    if maybe_print_json(json_flag, jsonl_flag, &c)? {
        return Ok(());
    }
    let previous = if c.status == ChangeStatus::NoPrevData {
        "No data".to_string()
    } else {
        fmt_money(&c.previous_total)
    };
    let change = match (c.percent_change, c.status) {
        (Some(p), ChangeStatus::Increase) => format!("+{:.1}%", p),
        (Some(p), ChangeStatus::Decrease) => format!("{:.1}%", p),
        (Some(_), _) => "0%".to_string(),
        (None, _) => "N/A".to_string(),
    };
    let current_hdr = format!("{} (current)", c.current_month);
    let previous_hdr = format!("{} (previous)", c.previous_month);
    println!(
        "{}",
        pretty_table(
            &[current_hdr.as_str(), previous_hdr.as_str(), "Difference", "Change"],
            vec![vec![
                fmt_money(&c.current_total),
                previous,
                fmt_money(&c.difference),
                change,
            ]],
        )
    );
    Ok(())
}

fn share(part: Decimal, total: Decimal) -> String {
    part.checked_div(total)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| format!("{:.1}%", p))
        .unwrap_or_else(|| "-".into())
}
