// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendbook::commands::{expenses, exporter, reports};
use spendbook::models::NewExpense;
use spendbook::{LedgerError, LedgerStore, cli};
use tempfile::{TempDir, tempdir};

fn setup() -> (TempDir, LedgerStore) {
    let dir = tempdir().unwrap();
    let store = LedgerStore::open(dir.path());
    store.ensure_initialized().unwrap();
    for (d, amt, c, date) in [
        ("Groceries", "42.10", "Groceries", "2025-01-03"),
        ("Cinema", "12", "Entertainment", "2025-02-14"),
        ("Bus pass", "55", "Transportation", "2025-02-01"),
    ] {
        store
            .save(&NewExpense {
                description: d.into(),
                amount: amt.into(),
                category: c.into(),
                date: date.into(),
            })
            .unwrap();
    }
    (dir, store)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 20).unwrap()
}

fn sub_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args);
    let (_, sub) = matches.subcommand().expect("subcommand");
    sub.clone()
}

#[test]
fn list_filters_by_month_and_current() {
    let (_dir, store) = setup();

    let m = sub_matches(&["spendbook", "list", "--month", "2025-01"]);
    let rows = expenses::query_rows(&store, &m, today()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Groceries");

    let m = sub_matches(&["spendbook", "list", "--current"]);
    let rows = expenses::query_rows(&store, &m, today()).unwrap();
    let ids: Vec<i64> = rows.iter().map(|e| e.id).collect();
    assert_eq!(ids, [2, 3]);

    let m = sub_matches(&["spendbook", "list"]);
    assert_eq!(expenses::query_rows(&store, &m, today()).unwrap().len(), 3);
}

#[test]
fn add_defaults_date_to_today() {
    let (_dir, store) = setup();
    let m = sub_matches(&[
        "spendbook", "add", "-d", "Snack", "-a", "2.5", "-c", "Food & Dining",
    ]);
    let e = expenses::add(&store, &m, today()).unwrap();
    assert_eq!(e.id, 4);
    assert_eq!(e.date, "2025-02-20");
}

#[test]
fn add_negative_amount_reports_validation() {
    let (_dir, store) = setup();
    let m = sub_matches(&["spendbook", "add", "-d", "Refund", "-a", "-5", "-c", "Other"]);
    let err = expenses::add(&store, &m, today()).unwrap_err();
    let ledger_err = err.downcast_ref::<LedgerError>().unwrap();
    assert_eq!(ledger_err.to_string(), "Amount must be greater than 0");
    assert_eq!(store.load_all().unwrap().len(), 3);
}

#[test]
fn rm_and_edit_go_through_store() {
    let (_dir, store) = setup();
    let m = sub_matches(&["spendbook", "edit", "--id", "2", "--amount", "15"]);
    expenses::edit(&store, &m).unwrap();
    let m = sub_matches(&["spendbook", "rm", "--id", "3"]);
    expenses::remove(&store, &m).unwrap();
    let m = sub_matches(&["spendbook", "rm", "--id", "3"]);
    assert!(expenses::remove(&store, &m).is_err());

    let all = store.load_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].amount, Decimal::from(15));
}

#[test]
fn summary_periods() {
    let (_dir, store) = setup();

    let m = sub_matches(&["spendbook", "summary"]);
    let s = reports::query_summary(&store, &m, today()).unwrap().unwrap();
    assert_eq!(s.total, Decimal::from(67));
    assert_eq!(s.count, 2);

    let m = sub_matches(&["spendbook", "summary", "--all"]);
    let s = reports::query_summary(&store, &m, today()).unwrap().unwrap();
    assert_eq!(s.total, Decimal::new(10910, 2));

    let m = sub_matches(&["spendbook", "summary", "--month", "2024-12"]);
    assert!(reports::query_summary(&store, &m, today()).unwrap().is_none());
}

#[test]
fn comparison_from_store() {
    let (_dir, store) = setup();
    let c = reports::query_comparison(&store, today()).unwrap();
    assert_eq!(c.current_total, Decimal::from(67));
    assert_eq!(c.previous_total, Decimal::new(4210, 2));
}

#[test]
fn export_writes_every_row() {
    let (dir, store) = setup();
    let out = dir.path().join("out.csv");
    let out_str = out.to_string_lossy().to_string();
    let m = sub_matches(&["spendbook", "export", "--out", &out_str]);
    let written = exporter::handle(&store, &m).unwrap();
    assert_eq!(written, out);

    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Id,Description,Expense_Type,Amount,Date");
    assert_eq!(lines[1], "1,Groceries,Groceries,42.10,2025-01-03");
}

#[test]
fn export_empty_ledger_fails() {
    let dir = tempdir().unwrap();
    let store = LedgerStore::open(dir.path());
    store.ensure_initialized().unwrap();
    let out = dir.path().join("out.csv");
    let err = store.export_all(&out).unwrap_err();
    assert_eq!(err.to_string(), "No expenses to export");
    assert!(!out.exists());
}

#[test]
fn period_flags_conflict() {
    let res = cli::build_cli().try_get_matches_from([
        "spendbook", "summary", "--all", "--month", "2025-01",
    ]);
    assert!(res.is_err());
}
