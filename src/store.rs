// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable storage for expense records.
//!
//! The master ledger (`all_expenses.csv`) is the source of truth. Every saved
//! record is also appended to a per-month backup file (`January.csv`, ...).
//! Backups are append-only history: deletes and updates rewrite the master
//! ledger only and never touch them.

use chrono::{Datelike, NaiveDate};
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::config::{self, HEADER, Settings};
use crate::errors::{LedgerError, Result};
use crate::models::{Expense, ExpensePatch, ExpenseRow, NewExpense};
use crate::utils::{fmt_amount, month_name, parse_decimal, parse_iso_date, round_money};

const TMP_SUFFIX: &str = "tmp";

/// Largest amount a single expense may carry.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

/// A legacy per-month file considered during migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacySource {
    pub label: String,
    pub path: PathBuf,
}

impl LegacySource {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// False when the master ledger already had records.
    pub attempted: bool,
    pub sources_read: usize,
    pub rows_seen: usize,
    pub rows_imported: usize,
}

/// A master-ledger row that the loaders will skip or misread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    /// 1-based data row, header excluded.
    pub row: usize,
    pub id: String,
    pub problem: String,
}

#[derive(Debug, Clone)]
pub struct LedgerStore {
    dir: PathBuf,
    master: PathBuf,
}

impl LedgerStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let master = config::master_path_in(&dir);
        Self { dir, master }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::open(settings.data_dir.clone())
    }

    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    pub fn master_path(&self) -> &Path {
        &self.master
    }

    pub fn monthly_path(&self, month: u32) -> Option<PathBuf> {
        config::monthly_path_in(&self.dir, month)
    }

    /// Create the master ledger with its header row if it is missing or empty.
    pub fn ensure_initialized(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let needs_header = match fs::metadata(&self.master) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if needs_header {
            write_rows(&self.master, &[])?;
            info!("created master ledger at {}", self.master.display());
        }
        Ok(())
    }

    /// The twelve monthly files, January through December.
    pub fn default_legacy_sources(&self) -> Vec<LegacySource> {
        (1..=12)
            .filter_map(|m| {
                let name = month_name(m)?;
                let path = self.monthly_path(m)?;
                Some(LegacySource::new(name, path))
            })
            .collect()
    }

    /// Fill an empty master ledger from legacy files.
    ///
    /// Runs only while the master ledger holds no data rows, so once it has
    /// imported anything a second call is a no-op. Sources are scanned in the
    /// order given; a row whose (description, category, amount, date) key was
    /// already seen is dropped. Survivors are sorted by date and renumbered
    /// from 1.
    pub fn migrate_if_needed(&self, sources: &[LegacySource]) -> Result<MigrationReport> {
        if !read_records(&self.master)?.is_empty() {
            debug!("master ledger already populated, skipping migration");
            return Ok(MigrationReport::default());
        }

        let mut report = MigrationReport {
            attempted: true,
            ..Default::default()
        };
        let mut seen = HashSet::new();
        let mut merged: Vec<ExpenseRow> = Vec::new();
        for source in sources {
            if !source.path.exists() {
                continue;
            }
            let rows = match read_rows(&source.path) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("error reading {} ({}): {}", source.label, source.path.display(), e);
                    continue;
                }
            };
            report.sources_read += 1;
            report.rows_seen += rows.len();
            for row in rows {
                if seen.insert(row.dedup_key()) {
                    merged.push(row);
                }
            }
        }

        if merged.is_empty() {
            return Ok(report);
        }

        // ISO dates sort chronologically as plain strings.
        merged.sort_by(|a, b| a.date.trim().cmp(b.date.trim()));
        for (i, row) in merged.iter_mut().enumerate() {
            row.id = (i + 1).to_string();
        }
        write_rows(&self.master, &merged)?;
        report.rows_imported = merged.len();
        info!(
            "migrated {} expenses from {} legacy files",
            report.rows_imported, report.sources_read
        );
        Ok(report)
    }

    /// Every usable record in file order. Rows with an unreadable id or amount
    /// are skipped.
    pub fn load_all(&self) -> Result<Vec<Expense>> {
        let rows = read_rows(&self.master)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            match Expense::try_from(row) {
                Ok(e) => out.push(e),
                Err(why) => debug!("skipping master row: {}", why),
            }
        }
        Ok(out)
    }

    pub fn load_for_period(&self, year: i32, month: u32) -> Result<Vec<Expense>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|e| e.in_period(year, month))
            .collect())
    }

    pub fn load_current_period(&self, today: NaiveDate) -> Result<Vec<Expense>> {
        self.load_for_period(today.year(), today.month())
    }

    pub fn validate_date(text: &str) -> Result<NaiveDate> {
        parse_iso_date(text)
            .ok_or_else(|| LedgerError::validation("Invalid date format. Please use YYYY-MM-DD"))
    }

    /// Parse a positive amount, rounded to cents.
    pub fn validate_amount(text: &str) -> Result<Decimal> {
        let amount = parse_decimal(text)
            .ok_or_else(|| LedgerError::validation("Amount must be a valid number"))?;
        let amount = round_money(amount);
        if amount <= Decimal::ZERO {
            return Err(LedgerError::validation("Amount must be greater than 0"));
        }
        if amount > Decimal::from(MAX_AMOUNT) {
            return Err(LedgerError::validation(format!(
                "Amount must not exceed {}",
                MAX_AMOUNT
            )));
        }
        Ok(amount)
    }

    /// Validate and append a new expense to the backup file for its month and
    /// to the master ledger. Nothing is written if validation fails.
    ///
    /// The backup is written first: if the master append then fails, a retry
    /// duplicates only the history row, never a ledger record.
    pub fn save(&self, input: &NewExpense) -> Result<Expense> {
        let description = required(&input.description, "Description")?;
        let category = required(&input.category, "Category")?;
        let date = Self::validate_date(&input.date)?;
        let amount = Self::validate_amount(&input.amount)?;

        let records = read_records(&self.master)?;
        let next_id = records.iter().filter_map(record_id).max().unwrap_or(0) + 1;

        let expense = Expense {
            id: next_id,
            description,
            category,
            amount,
            date: date.format("%Y-%m-%d").to_string(),
        };
        let row = expense.to_row();
        if let Some(backup) = self.monthly_path(date.month()) {
            append_row(&backup, &row)?;
        }
        append_row(&self.master, &row)?;
        info!("saved expense {} ({} on {})", expense.id, row.amount, row.date);
        Ok(expense)
    }

    /// Remove a record from the master ledger. Monthly backups keep it.
    /// Every other row is written back byte for byte.
    pub fn delete(&self, id: i64) -> Result<()> {
        let records = read_records(&self.master)?;
        let before = records.len();
        let kept: Vec<ByteRecord> = records
            .into_iter()
            .filter(|r| record_id(r) != Some(id))
            .collect();
        if kept.len() == before {
            return Err(LedgerError::NotFound(id));
        }
        write_records(&self.master, &kept)?;
        info!("deleted expense {}", id);
        Ok(())
    }

    /// Apply `patch` to the record with `id` and rewrite the master ledger.
    /// Supplied fields are validated like in [`LedgerStore::save`]; only the
    /// target row changes.
    pub fn update(&self, id: i64, patch: &ExpensePatch) -> Result<ExpenseRow> {
        if patch.is_empty() {
            return Err(LedgerError::validation("Nothing to update"));
        }
        let description = patch
            .description
            .as_deref()
            .map(|d| required(d, "Description"))
            .transpose()?;
        let category = patch
            .category
            .as_deref()
            .map(|c| required(c, "Category"))
            .transpose()?;
        let date = patch.date.as_deref().map(Self::validate_date).transpose()?;
        let amount = patch.amount.as_deref().map(Self::validate_amount).transpose()?;

        let mut records = read_records(&self.master)?;
        let target = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or(LedgerError::NotFound(id))?;
        let mut row = ExpenseRow::from_record_lossy(target);
        if let Some(d) = description {
            row.description = d;
        }
        if let Some(c) = category {
            row.category = c;
        }
        if let Some(d) = date {
            row.date = d.format("%Y-%m-%d").to_string();
        }
        if let Some(a) = amount {
            row.amount = fmt_amount(&a);
        }
        *target = row.to_record();
        write_records(&self.master, &records)?;
        info!("updated expense {}", id);
        Ok(row)
    }

    /// Copy every master row to `dest` unchanged; returns how many were written.
    pub fn export_all(&self, dest: &Path) -> Result<usize> {
        let records = read_records(&self.master)?;
        if records.is_empty() {
            return Err(LedgerError::NothingToExport);
        }
        write_records(dest, &records)?;
        Ok(records.len())
    }

    /// Report master rows that loaders skip or that date filters ignore.
    pub fn inspect(&self) -> Result<Vec<RowIssue>> {
        let records = read_records(&self.master)?;
        let mut ids = HashSet::new();
        let mut issues = Vec::new();
        for (i, rec) in records.iter().enumerate() {
            let Some(row) = ExpenseRow::from_record(rec) else {
                let problem = if rec.len() != HEADER.len() {
                    format!("expected {} fields, found {}", HEADER.len(), rec.len())
                } else {
                    "not valid UTF-8".to_string()
                };
                issues.push(RowIssue {
                    row: i + 1,
                    id: ExpenseRow::from_record_lossy(rec).id,
                    problem,
                });
                continue;
            };
            let mut push = |problem: String| {
                issues.push(RowIssue {
                    row: i + 1,
                    id: row.id.clone(),
                    problem,
                })
            };
            match row.parsed_id() {
                None => push(format!("unreadable id '{}'", row.id)),
                Some(id) if !ids.insert(id) => push(format!("duplicate id {}", id)),
                Some(_) => {}
            }
            match parse_decimal(&row.amount) {
                None => push(format!("unreadable amount '{}'", row.amount)),
                Some(a) if a <= Decimal::ZERO => push(format!("non-positive amount {}", a)),
                Some(_) => {}
            }
            if parse_iso_date(&row.date).is_none() {
                push(format!("unreadable date '{}'", row.date));
            }
        }
        Ok(issues)
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(LedgerError::validation(format!("{} cannot be empty", field)));
    }
    Ok(v.to_string())
}

fn record_id(rec: &ByteRecord) -> Option<i64> {
    std::str::from_utf8(rec.get(0)?).ok()?.trim().parse().ok()
}

/// Data records of a ledger-format file, as raw bytes and with any number of
/// fields. A missing file reads as empty.
fn read_records(path: &Path) -> Result<Vec<ByteRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut records = Vec::new();
    for rec in rdr.byte_records() {
        records.push(rec?);
    }
    Ok(records)
}

/// Rows with the ledger's shape. Irregular records are skipped here but kept
/// by [`read_records`].
fn read_rows(path: &Path) -> Result<Vec<ExpenseRow>> {
    let records = read_records(path)?;
    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        match ExpenseRow::from_record(rec) {
            Some(row) => rows.push(row),
            None => warn!("{}: skipping irregular row {}", path.display(), i + 1),
        }
    }
    Ok(rows)
}

/// Replace `path` with a header plus `records`, via a temp file and rename.
fn write_records(path: &Path, records: &[ByteRecord]) -> Result<()> {
    let tmp = tmp_path(path);
    {
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&tmp)?;
        wtr.write_record(HEADER)?;
        for rec in records {
            wtr.write_byte_record(rec)?;
        }
        wtr.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn write_rows(path: &Path, rows: &[ExpenseRow]) -> Result<()> {
    let records: Vec<ByteRecord> = rows.iter().map(ExpenseRow::to_record).collect();
    write_records(path, &records)
}

/// Append one row, writing the header first when the file is new or empty.
fn append_row(path: &Path, row: &ExpenseRow) -> Result<()> {
    let file: File = OpenOptions::new().create(true).append(true).open(path)?;
    let empty = file.metadata()?.len() == 0;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
    if empty {
        wtr.write_record(HEADER)?;
    }
    wtr.write_byte_record(&row.to_record())?;
    wtr.flush()?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}", TMP_SUFFIX));
    path.with_file_name(name)
}
